//! Document-store-backed key-value memory.
//!
//! Documents are addressed by entity key (`user::<id>` or `url::<url>`) and
//! hold a mapping from category name to an ordered array of previously seen
//! values. Values are appended only if not already present; documents are
//! never deleted.

pub mod preferences;
pub mod store;

pub use preferences::PreferenceStore;
pub use store::{DocumentStore, MemoryDocumentStore, PgDocumentStore};

/// Document key for a user's preference memory.
pub fn user_entity(user_id: &str) -> String {
    format!("user::{user_id}")
}

/// Document key for a URL's compliance memory.
pub fn url_entity(url: &str) -> String {
    format!("url::{url}")
}
