//! Environment variable parsing helpers shared by pool and service config.

use std::str::FromStr;

/// Parse an environment variable, falling back to `default` when the variable
/// is missing or does not parse.
///
/// # Example
/// ```ignore
/// let max: u32 = parse_env_with_default("DB_MAX_CONNECTIONS", 10);
/// ```
pub fn parse_env_with_default<T: FromStr>(key: &str, default: T) -> T {
    parse_env_optional(key).unwrap_or(default)
}

/// Parse an environment variable, returning `None` if missing or invalid.
pub fn parse_env_optional<T: FromStr>(key: &str) -> Option<T> {
    std::env::var(key).ok().and_then(|v| v.trim().parse().ok())
}

/// Return the first non-empty value among `keys`.
///
/// Used where a variable has a legacy alias (e.g. `DATABASE_URL` / `DB_URL`).
pub fn first_non_empty(keys: &[&str]) -> Option<String> {
    keys.iter()
        .filter_map(|key| std::env::var(key).ok())
        .find(|value| !value.trim().is_empty())
}
