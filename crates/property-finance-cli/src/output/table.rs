use serde_json::Value;
use tabled::{builder::Builder, Table};

use super::ROW_FIELDS;

/// Format output as tables using the tabled crate.
///
/// Scalar result fields render as a field/value table; schedule and
/// year row arrays render as their own row tables underneath.
pub fn print_table(value: &Value) {
    match value {
        Value::Object(map) => {
            if let Some(result) = map.get("result") {
                print_result_tables(result, map);
            } else {
                print_flat_object(value);
            }
        }
        Value::Array(arr) => print_array_table(arr),
        _ => println!("{}", value),
    }
}

fn print_result_tables(result: &Value, envelope: &serde_json::Map<String, Value>) {
    if let Value::Object(res_map) = result {
        let mut builder = Builder::default();
        builder.push_record(["Field", "Value"]);
        for (key, val) in res_map {
            if ROW_FIELDS.contains(&key.as_str()) {
                continue;
            }
            // Sub-objects (summary, totals_over_term) flatten to dotted keys
            if let Value::Object(nested) = val {
                for (sub_key, sub_val) in nested {
                    builder.push_record([format!("{key}.{sub_key}"), format_value(sub_val)]);
                }
            } else {
                builder.push_record([key.to_string(), format_value(val)]);
            }
        }
        println!("{}", Table::from(builder));

        for field in ROW_FIELDS {
            if let Some(Value::Array(rows)) = res_map.get(field) {
                if !rows.is_empty() {
                    println!("\n{}:", field);
                    print_array_table(rows);
                }
            }
        }
    } else {
        print_flat_object(result);
    }

    if let Some(Value::Array(warnings)) = envelope.get("warnings") {
        if !warnings.is_empty() {
            println!("\nWarnings:");
            for w in warnings {
                if let Value::String(s) = w {
                    println!("  - {}", s);
                }
            }
        }
    }

    if let Some(Value::String(methodology)) = envelope.get("methodology") {
        println!("\nMethodology: {}", methodology);
    }
}

fn print_flat_object(value: &Value) {
    if let Value::Object(map) = value {
        let mut builder = Builder::default();
        builder.push_record(["Field", "Value"]);
        for (key, val) in map {
            builder.push_record([key.to_string(), format_value(val)]);
        }
        println!("{}", Table::from(builder));
    }
}

fn print_array_table(arr: &[Value]) {
    if arr.is_empty() {
        println!("(empty)");
        return;
    }

    if let Some(Value::Object(first)) = arr.first() {
        let headers: Vec<String> = first.keys().cloned().collect();
        let mut builder = Builder::default();
        builder.push_record(&headers);

        for item in arr {
            if let Value::Object(map) = item {
                let row: Vec<String> = headers
                    .iter()
                    .map(|h| map.get(h.as_str()).map(format_value).unwrap_or_default())
                    .collect();
                builder.push_record(row);
            }
        }

        println!("{}", Table::from(builder));
    } else {
        for item in arr {
            println!("{}", format_value(item));
        }
    }
}

fn format_value(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Number(n) => n.to_string(),
        Value::Bool(b) => b.to_string(),
        Value::Null => "null".to_string(),
        Value::Array(arr) => {
            let items: Vec<String> = arr.iter().map(format_value).collect();
            items.join(", ")
        }
        Value::Object(_) => serde_json::to_string(value).unwrap_or_default(),
    }
}
