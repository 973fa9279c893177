pub mod csv_out;
pub mod json;
pub mod minimal;
pub mod table;

use crate::OutputFormat;
use rust_decimal::Decimal;
use serde_json::{Map, Value};

use loan_desk_core::format::format_kes;

/// Fields carrying KES amounts; rendered with `format_kes` in human-facing formats.
const MONEY_KEYS: &[&str] = &[
    "principal",
    "raw_interest",
    "capped_interest",
    "total_repayment",
    "monthly_installment",
    "max_principal",
    "asset_value",
    "amount",
    "loanAmount",
    "assetValue",
    "monthlyInstallment",
    "totalRepayment",
    "total_volume",
    "pending_volume",
];

/// Dispatch output to the appropriate formatter.
pub fn format_output(format: &OutputFormat, value: &Value) {
    match format {
        OutputFormat::Json => json::print_json(value),
        OutputFormat::Table => table::print_table(value),
        OutputFormat::Csv => csv_out::print_csv(value),
        OutputFormat::Minimal => minimal::print_minimal(value),
    }
}

/// Flatten nested objects into dotted keys, leaving arrays as leaves.
pub(crate) fn flatten(map: &Map<String, Value>) -> Vec<(String, Value)> {
    let mut out = Vec::new();
    flatten_into("", map, &mut out);
    out
}

fn flatten_into(prefix: &str, map: &Map<String, Value>, out: &mut Vec<(String, Value)>) {
    for (key, val) in map {
        let full = if prefix.is_empty() {
            key.clone()
        } else {
            format!("{prefix}.{key}")
        };
        match val {
            Value::Object(inner) if !inner.is_empty() => flatten_into(&full, inner, out),
            _ => out.push((full, val.clone())),
        }
    }
}

/// Render a scalar for people: money keys as `KES 12,345`, everything else as-is.
pub(crate) fn display_value(key: &str, value: &Value) -> String {
    let leaf = key.rsplit('.').next().unwrap_or(key);
    if MONEY_KEYS.contains(&leaf) {
        if let Some(amount) = as_decimal(value) {
            return format_kes(amount);
        }
    }
    match value {
        Value::String(s) => s.clone(),
        Value::Number(n) => n.to_string(),
        Value::Bool(b) => b.to_string(),
        Value::Null => "-".to_string(),
        Value::Array(arr) => arr
            .iter()
            .map(|v| display_value("", v))
            .collect::<Vec<_>>()
            .join(", "),
        Value::Object(_) => serde_json::to_string(value).unwrap_or_default(),
    }
}

fn as_decimal(value: &Value) -> Option<Decimal> {
    match value {
        Value::String(s) => s.parse().ok(),
        Value::Number(n) => n.to_string().parse().ok(),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_flatten_nested_terms() {
        let value = json!({"loan_type": "secured", "terms": {"principal": "100000", "term_months": 3}});
        let flat = flatten(value.as_object().unwrap());
        let keys: Vec<&str> = flat.iter().map(|(k, _)| k.as_str()).collect();
        assert_eq!(keys, vec!["loan_type", "terms.principal", "terms.term_months"]);
    }

    #[test]
    fn test_money_keys_render_as_kes() {
        assert_eq!(display_value("terms.total_repayment", &json!("160000")), "KES 160,000");
        assert_eq!(display_value("term_months", &json!(3)), "3");
        assert_eq!(display_value("collateral", &Value::Null), "-");
    }
}
