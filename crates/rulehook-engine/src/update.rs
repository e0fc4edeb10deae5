//! Path-based writes into JSON documents.

use serde_json::{Map, Value};

use rulehook_core::{AppError, AppResult};

/// Writes `value` into `target` at the dot-separated path `key`.
///
/// Object segments create missing intermediate objects. Array segments must
/// be an index no greater than the array length; an index equal to the
/// length appends. Any other shape fails with an invalid-target error and
/// leaves `target` untouched.
///
/// Applying the same `(target, key, value)` twice leaves the same state as
/// applying it once.
///
/// ```
/// use rulehook_engine::update_value;
/// use serde_json::json;
///
/// let mut doc = json!({"user": {"tags": ["a"]}});
/// update_value(&mut doc, "user.tags.1", json!("b")).unwrap();
/// update_value(&mut doc, "user.name", json!("alice")).unwrap();
/// assert_eq!(doc, json!({"user": {"tags": ["a", "b"], "name": "alice"}}));
/// ```
pub fn update_value(target: &mut Value, key: &str, value: Value) -> AppResult<()> {
    let segments: Vec<&str> = key.split('.').collect();
    if segments.iter().any(|s| s.is_empty()) {
        return Err(AppError::invalid_target(format!(
            "Invalid path '{key}': empty segment"
        )));
    }

    check_path(target, key, &segments)?;

    let (last, parents) = segments
        .split_last()
        .ok_or_else(|| AppError::invalid_target("Empty path"))?;

    let mut current = target;
    for segment in parents {
        current = descend(current, key, segment)?;
    }
    assign(current, key, last, value)
}

/// Walks the path without mutating so a failing write leaves no partial
/// intermediate objects behind.
fn check_path(target: &Value, key: &str, segments: &[&str]) -> AppResult<()> {
    let mut current = Some(target);
    for segment in segments {
        let Some(node) = current else {
            // Missing object entries are created on write.
            return Ok(());
        };
        current = match node {
            Value::Object(map) => map.get(*segment),
            Value::Array(items) => {
                let index = parse_index(key, segment)?;
                if index > items.len() {
                    return Err(out_of_bounds(key, index, items.len()));
                }
                items.get(index)
            }
            other => return Err(not_a_container(key, segment, other)),
        };
    }
    Ok(())
}

fn descend<'a>(node: &'a mut Value, key: &str, segment: &str) -> AppResult<&'a mut Value> {
    match node {
        Value::Object(map) => Ok(map
            .entry(segment.to_string())
            .or_insert_with(|| Value::Object(Map::new()))),
        Value::Array(items) => {
            let index = parse_index(key, segment)?;
            let len = items.len();
            if index == len {
                items.push(Value::Object(Map::new()));
            }
            items
                .get_mut(index)
                .ok_or_else(|| out_of_bounds(key, index, len))
        }
        other => Err(not_a_container(key, segment, other)),
    }
}

fn assign(node: &mut Value, key: &str, segment: &str, value: Value) -> AppResult<()> {
    match node {
        Value::Object(map) => {
            map.insert(segment.to_string(), value);
            Ok(())
        }
        Value::Array(items) => {
            let index = parse_index(key, segment)?;
            let len = items.len();
            match index.cmp(&len) {
                std::cmp::Ordering::Less => items[index] = value,
                std::cmp::Ordering::Equal => items.push(value),
                std::cmp::Ordering::Greater => return Err(out_of_bounds(key, index, len)),
            }
            Ok(())
        }
        other => Err(not_a_container(key, segment, other)),
    }
}

fn parse_index(key: &str, segment: &str) -> AppResult<usize> {
    segment.parse::<usize>().map_err(|_| {
        AppError::invalid_target(format!(
            "Invalid path '{key}': '{segment}' is not an array index"
        ))
    })
}

fn out_of_bounds(key: &str, index: usize, len: usize) -> AppError {
    AppError::invalid_target(format!(
        "Invalid path '{key}': index {index} is beyond array length {len}"
    ))
}

fn not_a_container(key: &str, segment: &str, node: &Value) -> AppError {
    let kind = match node {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    };
    AppError::invalid_target(format!(
        "Invalid path '{key}': cannot write '{segment}' into {kind}"
    ))
}
