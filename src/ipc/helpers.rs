use serde_json::json;

use crate::session::Student;

/// Read-only roster view included with every mutation, undo, or redo
/// response so the front end can re-render without a follow-up list call.
pub fn roster_view(students: &[Student]) -> serde_json::Value {
    json!(students)
}

pub fn param_str<'a>(params: &'a serde_json::Value, key: &str) -> Option<&'a str> {
    params.get(key).and_then(|v| v.as_str())
}

pub fn param_usize(params: &serde_json::Value, key: &str) -> Option<usize> {
    params
        .get(key)
        .and_then(|v| v.as_u64())
        .map(|v| v as usize)
}

pub fn param_f64(params: &serde_json::Value, key: &str) -> Option<f64> {
    params.get(key).and_then(|v| v.as_f64())
}
