use serde_json::{Map, Value};

/// Merge flat overrides into `base`.
///
/// Dotted keys (`"device.meta.serial"`) walk into nested objects, creating
/// them when missing. An intermediate that exists but is not an object is
/// replaced by an empty object. Keys without dots are assigned directly.
pub fn apply_overrides(base: &mut Value, overrides: &Map<String, Value>) {
    for (key, value) in overrides {
        let parts: Vec<&str> = key.split('.').collect();
        set_path(base, &parts, value.clone());
    }
}

fn set_path(node: &mut Value, parts: &[&str], value: Value) {
    if !node.is_object() {
        *node = Value::Object(Map::new());
    }
    let Value::Object(map) = node else {
        return;
    };

    match parts {
        [] => {}
        [last] => {
            map.insert(last.to_string(), value);
        }
        [head, rest @ ..] => {
            let child = map.entry(head.to_string()).or_insert(Value::Null);
            set_path(child, rest, value);
        }
    }
}
