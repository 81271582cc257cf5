use linkvault_core::SupplementaryData;
use serde::Serialize;
use typed_builder::TypedBuilder;

/// Parameters for creating a short URL.
#[derive(Debug, Clone, TypedBuilder)]
pub struct CreateParams {
    #[builder(setter(into))]
    pub namespace_id: String,
    #[builder(setter(into))]
    pub domain: String,
    /// The URL the short key points to.
    #[builder(setter(into))]
    pub original_link: String,
    /// Length of a generated key; the configured default when `None`.
    #[builder(default, setter(strip_option))]
    pub key_length: Option<usize>,
    /// Caller chosen key. Skips generation and overwrites any record at
    /// the same `(domain, key, namespace_id)`.
    #[builder(default, setter(strip_option, into))]
    pub key: Option<String>,
    /// Minutes until the link expires.
    #[builder(default, setter(strip_option))]
    pub expiry: Option<i64>,
    #[builder(default, setter(strip_option))]
    pub supplementary_data: Option<SupplementaryData>,
}

/// Parameters for a partial update of an existing short URL.
#[derive(Debug, Clone, TypedBuilder)]
pub struct UpdateParams {
    #[builder(setter(into))]
    pub namespace_id: String,
    #[builder(setter(into))]
    pub domain: String,
    #[builder(setter(into))]
    pub key: String,
    /// New expiry in minutes from the request time.
    #[builder(default, setter(strip_option))]
    pub expiry: Option<i64>,
    /// Drops the expiry entirely. Takes precedence over `expiry`.
    #[builder(default)]
    pub remove_expiry: bool,
    /// Replaces the stored supplementary data.
    #[builder(default, setter(strip_option))]
    pub supplementary_data: Option<SupplementaryData>,
}

/// What a redirect needs to know about a key.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RedirectTarget {
    pub original_link: String,
    pub supplementary_data: Option<SupplementaryData>,
}
