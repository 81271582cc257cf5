//! Cleanup and validation of caller supplied keys and namespace ids.
//!
//! Validation returns booleans; callers decide whether to refuse the input.

use crate::config::RedirectConfig;
use crate::sort_key::DELIMITER;

/// Checks that `key` has an allowed length and only uses charset symbols.
pub fn validate_url_key(config: &RedirectConfig, key: &str) -> bool {
    let len = key.chars().count();
    len >= config.key_min_length
        && len <= config.key_max_length
        && key.chars().all(|c| config.is_key_char(c))
}

/// Strips every symbol outside the charset.
///
/// A symbol missing from the charset is kept in lowercase when that form
/// is a charset symbol.
pub fn sanitize_url_key(config: &RedirectConfig, key: &str) -> String {
    let mut sanitized = String::with_capacity(key.len());
    for c in key.chars() {
        if config.is_key_char(c) {
            sanitized.push(c);
        } else {
            sanitized.extend(c.to_lowercase().filter(|l| config.is_key_char(*l)));
        }
    }
    sanitized
}

/// Checks that a namespace id can be embedded in a sort key.
pub fn validate_namespace_id(namespace_id: &str) -> bool {
    !namespace_id.contains(DELIMITER)
}
