use serde_json::{Map, Value};
use tabled::{builder::Builder, Table};

use super::{flatten, record_rows, scalar};

/// Format output as tables using the tabled crate.
pub fn print_table(value: &Value) {
    match value {
        Value::Object(map) => match map.get("result") {
            Some(Value::Object(result)) => print_result(result, map),
            _ => print_fields(map),
        },
        Value::Array(arr) => print_array_table(arr),
        _ => println!("{}", value),
    }
}

fn print_result(result: &Map<String, Value>, envelope: &Map<String, Value>) {
    // A bare scoring record prints as one row per column.
    if let Some(rows) = record_rows(result) {
        print_pairs(["Column", "Value"], &rows);
    } else {
        let mut scalars = Vec::new();
        let mut sections: Vec<(&str, &Value)> = Vec::new();
        for (key, val) in result {
            match val {
                Value::Object(_) if key == "record" => sections.push((key.as_str(), val)),
                Value::Object(inner) => flatten(key, inner, &mut scalars),
                Value::Array(_) => sections.push((key.as_str(), val)),
                other => scalars.push((key.clone(), other.clone())),
            }
        }
        print_pairs(["Field", "Value"], &scalars);

        for (name, section) in sections {
            println!("\n{}:", name);
            match section {
                Value::Object(inner) => match record_rows(inner) {
                    Some(rows) => print_pairs(["Column", "Value"], &rows),
                    None => print_fields(inner),
                },
                Value::Array(arr) => print_array_table(arr),
                _ => {}
            }
        }
    }

    if let Some(Value::Array(warnings)) = envelope.get("warnings") {
        if !warnings.is_empty() {
            println!("\nWarnings:");
            for w in warnings.iter().filter_map(|w| w.as_str()) {
                println!("  - {}", w);
            }
        }
    }

    if let Some(Value::String(meth)) = envelope.get("methodology") {
        println!("\nMethodology: {}", meth);
    }
}

fn print_pairs(headers: [&str; 2], rows: &[(String, Value)]) {
    let mut builder = Builder::default();
    builder.push_record(headers);
    for (key, val) in rows {
        builder.push_record([key.as_str(), &scalar(val)]);
    }
    println!("{}", Table::from(builder));
}

fn print_fields(map: &Map<String, Value>) {
    let mut rows = Vec::new();
    flatten("", map, &mut rows);
    print_pairs(["Field", "Value"], &rows);
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

        for item in arr.iter().filter_map(|v| v.as_object()) {
            let row: Vec<String> = headers
                .iter()
                .map(|h| item.get(h.as_str()).map(scalar).unwrap_or_default())
                .collect();
            builder.push_record(row);
        }

        println!("{}", Table::from(builder));
    } else {
        let items: Vec<String> = arr.iter().map(scalar).collect();
        println!("{}", items.join(", "));
    }
}
