//! Supporting-document requirements per loan type.
//!
//! Only names and kinds are tracked; file bytes, previews and upload
//! encoding belong to the front end.

use serde::{Deserialize, Serialize};

use crate::types::LoanType;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DocumentKind {
    Id,
    Income,
    Asset,
    Photo,
}

impl DocumentKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            DocumentKind::Id => "id",
            DocumentKind::Income => "income",
            DocumentKind::Asset => "asset",
            DocumentKind::Photo => "photo",
        }
    }
}

impl std::fmt::Display for DocumentKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DocumentRequirement {
    pub kind: DocumentKind,
    pub label: &'static str,
    pub description: &'static str,
    /// Accepted media types, in file-input `accept` syntax.
    pub accepts: &'static str,
    pub required: bool,
    pub multiple: bool,
}

/// An uploaded file, by name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DocumentRef {
    pub kind: DocumentKind,
    pub file_name: String,
}

const NATIONAL_ID: DocumentRequirement = DocumentRequirement {
    kind: DocumentKind::Id,
    label: "National ID",
    description: "Front and back of your ID card",
    accepts: "image/*,.pdf",
    required: true,
    multiple: false,
};

const PROOF_OF_INCOME: DocumentRequirement = DocumentRequirement {
    kind: DocumentKind::Income,
    label: "Proof of Income",
    description: "Payslip, bank statement, or M-Pesa statement",
    accepts: "image/*,.pdf",
    required: true,
    multiple: false,
};

const ASSET_DOCUMENTS: DocumentRequirement = DocumentRequirement {
    kind: DocumentKind::Asset,
    label: "Asset Documents",
    description: "Logbook, title deed, or ownership proof",
    accepts: "image/*,.pdf",
    required: true,
    multiple: false,
};

const ASSET_PHOTOS: DocumentRequirement = DocumentRequirement {
    kind: DocumentKind::Photo,
    label: "Asset Photos",
    description: "Clear photos of the asset",
    accepts: "image/*",
    required: true,
    multiple: true,
};

pub fn required_documents(loan_type: LoanType) -> Vec<DocumentRequirement> {
    match loan_type {
        LoanType::Unsecured => vec![NATIONAL_ID, PROOF_OF_INCOME],
        LoanType::Secured => vec![NATIONAL_ID, PROOF_OF_INCOME, ASSET_DOCUMENTS, ASSET_PHOTOS],
    }
}

/// Replace every document of `kind` with `file_names`.
pub fn replace_documents(
    existing: &[DocumentRef],
    kind: DocumentKind,
    file_names: &[String],
) -> Vec<DocumentRef> {
    existing
        .iter()
        .filter(|d| d.kind != kind)
        .cloned()
        .chain(file_names.iter().map(|name| DocumentRef {
            kind,
            file_name: name.clone(),
        }))
        .collect()
}

/// Required kinds with no uploaded file yet.
pub fn missing_documents(loan_type: LoanType, documents: &[DocumentRef]) -> Vec<DocumentKind> {
    required_documents(loan_type)
        .into_iter()
        .filter(|req| req.required && !documents.iter().any(|d| d.kind == req.kind))
        .map(|req| req.kind)
        .collect()
}

pub fn documents_complete(loan_type: LoanType, documents: &[DocumentRef]) -> bool {
    missing_documents(loan_type, documents).is_empty()
}
