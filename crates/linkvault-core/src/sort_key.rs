//! Composite sort key combining a short key and a namespace id.
//!
//! A record lives at `key&namespace_id` inside its domain partition, so one
//! partition can hold the same key for several namespaces. Looking a key up
//! without knowing its namespace is a `begins_with` query on [`key_prefix`].
//! No escaping is performed: neither part may contain [`DELIMITER`].

use crate::error::{CoreError, Result};

/// Separator between the key and the namespace id.
pub const DELIMITER: char = '&';

/// Joins `key` and `namespace_id` with the delimiter.
///
/// Callers writing records should go through [`encode_checked`], which
/// refuses parts that would make the result ambiguous.
pub fn encode(key: &str, namespace_id: &str) -> String {
    let mut sort_key = String::with_capacity(key.len() + namespace_id.len() + 1);
    sort_key.push_str(key);
    sort_key.push(DELIMITER);
    sort_key.push_str(namespace_id);
    sort_key
}

/// Like [`encode`], but fails if either part contains the delimiter.
pub fn encode_checked(key: &str, namespace_id: &str) -> Result<String> {
    check_part(key)?;
    check_part(namespace_id)?;
    Ok(encode(key, namespace_id))
}

/// Splits a sort key back into `(key, namespace_id)`.
///
/// Exactly one delimiter must be present.
pub fn decode(sort_key: &str) -> Result<(String, String)> {
    let mut parts = sort_key.split(DELIMITER);
    match (parts.next(), parts.next(), parts.next()) {
        (Some(key), Some(namespace_id), None) => Ok((key.to_owned(), namespace_id.to_owned())),
        _ => Err(CoreError::MalformedSortKey(sort_key.to_owned())),
    }
}

/// Prefix matching every namespace's record for `key`.
pub fn key_prefix(key: &str) -> String {
    encode(key, "")
}

/// Rejects a key or namespace id containing the delimiter.
pub fn check_part(part: &str) -> Result<()> {
    if part.contains(DELIMITER) {
        return Err(CoreError::InvalidSortKeyPart {
            part: part.to_owned(),
            delimiter: DELIMITER,
        });
    }
    Ok(())
}
