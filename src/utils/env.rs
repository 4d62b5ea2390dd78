/// Get environment variable with MAILWAY_ prefix, falling back to unprefixed version
///
/// This helper function checks for `MAILWAY_{key}` first, then falls back to `{key}`
/// for compatibility with standard environment variable naming.
///
/// # Examples
///
/// ```rust
/// use mailway::utils::get_env_with_prefix;
///
/// // Checks MAILWAY_WORKER_COUNT first, then WORKER_COUNT
/// let workers = get_env_with_prefix("WORKER_COUNT");
/// ```
pub fn get_env_with_prefix(key: &str) -> Option<String> {
    std::env::var(format!("MAILWAY_{}", key))
        .or_else(|_| std::env::var(key))
        .ok()
}
