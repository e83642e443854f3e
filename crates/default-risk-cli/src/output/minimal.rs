use serde_json::{Map, Value};

use super::scalar;

/// Print just the key answer value from the output.
///
/// Looks for well-known result fields in order of priority, then falls
/// back to the first field in the result object. Mock probabilities are
/// always labelled as such.
pub fn print_minimal(value: &Value) {
    let result_obj = value
        .as_object()
        .and_then(|m| m.get("result"))
        .unwrap_or(value);

    let priority_keys = ["probability_label", "emi_to_income"];

    if let Value::Object(map) = result_obj {
        for key in &priority_keys {
            if let Some(val) = map.get(*key) {
                if !val.is_null() {
                    println!("{}{}", scalar(val), mock_suffix(map));
                    return;
                }
            }
        }

        if map.contains_key("probability") {
            println!("unavailable");
            return;
        }

        if let Some((key, val)) = map.iter().next() {
            println!("{}: {}", key, scalar(val));
            return;
        }
    }

    println!("{}", scalar(result_obj));
}

fn mock_suffix(map: &Map<String, Value>) -> &'static str {
    let is_mock = map
        .get("probability")
        .and_then(|p| p.get("source"))
        .and_then(|s| s.as_str())
        == Some("mock");
    if is_mock {
        " (mock)"
    } else {
        ""
    }
}
