use log::*;
use serde_json::Value;

pub fn json_is_subset_of(part: &str, complete: &str) -> bool {
    let part: Value = serde_json::from_str(part).expect("Invalid JSON");
    let complete: Value = serde_json::from_str(complete).expect("Invalid JSON");
    value_is_subset_of(&part, &complete)
}

pub fn value_is_subset_of(part: &Value, complete: &Value) -> bool {
    if part.is_null() {
        debug!("given value is null, which is always a subset of any value");
        return true;
    }
    if part.is_object() {
        for (key, value) in part.as_object().expect("Not an object") {
            match complete.get(key) {
                Some(complete_value) => {
                    if !value_is_subset_of(value, complete_value) {
                        error!("Value mismatch: {} != {}", value, complete_value);
                        return false;
                    }
                },
                None => {
                    error!("Key not found: {}", key);
                    return false;
                },
            }
        }
        true
    } else if part.is_array() {
        if !complete.is_array() {
            error!("Given object is an array, but we do not expect an array");
            return false;
        }
        let arr_p = part.as_array().expect("Not an array");
        let arr_c = complete.as_array().expect("Not an array");
        if arr_p.len() != arr_c.len() {
            error!("Array length mismatch: {} != {}", arr_p.len(), arr_c.len());
            return false;
        }
        arr_p.iter().zip(arr_c.iter()).all(|(p, c)| value_is_subset_of(p, c))
    } else {
        part == complete
    }
}
