//! URL redirect service implementation.
//!
//! This crate composes the key generator and a storage collaborator into the
//! [`RedirectService`]: key resolution with collision avoidance on create,
//! lookups by key across namespaces, partial updates and deletes. Core types
//! are re-exported from `linkvault_core`.

mod lookup;

pub mod error;
pub mod params;
pub mod resolver;
pub mod service;

pub use error::{RedirectError, Result};
pub use linkvault_core::{RedirectConfig, RequestContext, UrlRecord};
pub use params::{CreateParams, RedirectTarget, UpdateParams};
pub use resolver::UniqueKeyResolver;
pub use service::RedirectService;
