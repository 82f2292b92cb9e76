use serde_json::Value;
use std::io;

use super::ROW_FIELDS;

/// Write output as CSV to stdout.
///
/// A result carrying schedule or year rows emits the row array; scalar
/// results emit field,value pairs with sub-objects on dotted keys.
pub fn print_csv(value: &Value) {
    let stdout = io::stdout();
    let mut wtr = csv::Writer::from_writer(stdout.lock());

    match value {
        Value::Object(map) => {
            let result = map.get("result").unwrap_or(value);
            if let Some(rows) = first_row_array(result) {
                write_array_csv(&mut wtr, rows);
            } else if let Value::Object(res_map) = result {
                let _ = wtr.write_record(["field", "value"]);
                for (key, val) in res_map {
                    if ROW_FIELDS.contains(&key.as_str()) {
                        continue;
                    }
                    if let Value::Object(nested) = val {
                        for (sub_key, sub_val) in nested {
                            let _ = wtr
                                .write_record([format!("{key}.{sub_key}"), format_csv_value(sub_val)]);
                        }
                    } else {
                        let _ = wtr.write_record([key.to_string(), format_csv_value(val)]);
                    }
                }
            }
        }
        Value::Array(arr) => {
            write_array_csv(&mut wtr, arr);
        }
        _ => {
            let _ = wtr.write_record([&format_csv_value(value)]);
        }
    }

    let _ = wtr.flush();
}

fn first_row_array(result: &Value) -> Option<&Vec<Value>> {
    let map = result.as_object()?;
    ROW_FIELDS.iter().find_map(|field| match map.get(*field) {
        Some(Value::Array(rows)) if !rows.is_empty() => Some(rows),
        _ => None,
    })
}

fn write_array_csv(wtr: &mut csv::Writer<io::StdoutLock<'_>>, arr: &[Value]) {
    if arr.is_empty() {
        return;
    }

    if let Some(Value::Object(first)) = arr.first() {
        let headers: Vec<&str> = first.keys().map(|k| k.as_str()).collect();
        let _ = wtr.write_record(&headers);

        for item in arr {
            if let Value::Object(map) = item {
                let row: Vec<String> = headers
                    .iter()
                    .map(|h| map.get(*h).map(format_csv_value).unwrap_or_default())
                    .collect();
                let _ = wtr.write_record(&row);
            }
        }
    } else {
        for item in arr {
            let _ = wtr.write_record([&format_csv_value(item)]);
        }
    }
}

fn format_csv_value(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Number(n) => n.to_string(),
        Value::Bool(b) => b.to_string(),
        Value::Null => String::new(),
        _ => serde_json::to_string(value).unwrap_or_default(),
    }
}
