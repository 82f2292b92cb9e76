use serde_json::Value;

/// Print just the headline answer from the output.
///
/// Heuristic: look for well-known result fields in order of priority
/// (checking the rent-vs-buy summary sub-object first), then fall back
/// to the first scalar field.
pub fn print_minimal(value: &Value) {
    let result_obj = value
        .as_object()
        .and_then(|m| m.get("result"))
        .unwrap_or(value);

    // Priority list of headline output fields across the calculators
    let priority_keys = [
        "recommendation",
        "max_home_price",
        "cash_on_cash_percent",
        "total_monthly",
        "monthly_payment",
        "total_interest",
    ];

    if let Value::Object(map) = result_obj {
        // Rent-vs-buy carries its headline fields in the summary
        let search_map = match map.get("summary") {
            Some(Value::Object(summary)) => summary,
            _ => map,
        };

        for key in &priority_keys {
            if let Some(val) = search_map.get(*key) {
                if !val.is_null() {
                    println!("{}", format_minimal(val));
                    return;
                }
            }
        }

        if let Some((key, val)) = search_map.iter().find(|(_, v)| !v.is_array()) {
            println!("{}: {}", key, format_minimal(val));
            return;
        }
    }

    println!("{}", format_minimal(result_obj));
}

fn format_minimal(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Number(n) => n.to_string(),
        Value::Bool(b) => b.to_string(),
        Value::Null => "null".to_string(),
        _ => serde_json::to_string(value).unwrap_or_default(),
    }
}
