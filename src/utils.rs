//! Small shared helpers.

/// Current username, used to scope the cache file and to compose the
/// i2c-group remediation hint. Falls back to "unknown" outside a login
/// session.
pub fn current_user() -> String {
    std::env::var("USER").unwrap_or_else(|_| "unknown".to_string())
}
