use serde_json::Value;

use super::{display_value, flatten};

/// Headline fields, most specific first. Matched against the last segment
/// of the flattened key so nested terms are found too.
const PRIORITY_KEYS: &[&str] = &[
    "step",
    "monthly_installment",
    "max_principal",
    "total_repayment",
    "pending",
    "status",
];

/// Print just the key answer value from the output.
pub fn print_minimal(value: &Value) {
    let result_obj = value
        .as_object()
        .and_then(|m| m.get("result"))
        .unwrap_or(value);

    let Value::Object(map) = result_obj else {
        println!("{}", display_value("", result_obj));
        return;
    };

    let fields = flatten(map);
    for key in PRIORITY_KEYS {
        let hit = fields.iter().find(|(k, v)| {
            !v.is_null() && k.rsplit('.').next() == Some(*key)
        });
        if let Some((k, v)) = hit {
            println!("{}", display_value(k, v));
            return;
        }
    }

    if let Some((key, val)) = fields.first() {
        println!("{}: {}", key, display_value(key, val));
    }
}
