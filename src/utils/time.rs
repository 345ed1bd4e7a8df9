use std::time::{SystemTime, UNIX_EPOCH};

pub fn current_unix_seconds() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or(0)
}

/// Unix seconds as Gate.io expects in the `Timestamp` header
pub fn current_unix_seconds_string() -> String {
    current_unix_seconds().to_string()
}
