use serde::Serialize;
use serde_json::Value;
use sha2::{Digest, Sha256};

/// Content hash of a desired child-object spec, used to detect drift without
/// comparing full structures field by field. Object keys are sorted before
/// hashing so two semantically identical specs with differently-ordered
/// fields hash the same.
pub fn compute_desired_hash<T: Serialize>(value: &T) -> String {
    let json = serde_json::to_value(value).expect("value must serialize to JSON");
    let canonical = canonicalize(&json);
    let mut hasher = Sha256::new();
    hasher.update(canonical.as_bytes());
    format!("{:x}", hasher.finalize())
}

fn canonicalize(value: &Value) -> String {
    match value {
        Value::Object(map) => {
            let mut entries: Vec<_> = map.iter().collect();
            entries.sort_by(|a, b| a.0.cmp(b.0));
            let body = entries
                .into_iter()
                .map(|(k, v)| format!("{}:{}", serde_json::to_string(k).unwrap(), canonicalize(v)))
                .collect::<Vec<_>>()
                .join(",");
            format!("{{{}}}", body)
        }
        Value::Array(items) => {
            let body = items.iter().map(canonicalize).collect::<Vec<_>>().join(",");
            format!("[{}]", body)
        }
        other => other.to_string(),
    }
}
