//! Client-side persistence.
//!
//! Two scopes exist: a durable store that survives restarts (tokens, profile,
//! queued survey data) and a tab store that lives only as long as one
//! [`SessionContext`]'s owner keeps it. Flows never touch the stores directly;
//! they go through the typed accessors on [`SessionContext`].

pub mod session;
pub mod store;

pub use session::SessionContext;
pub use store::{FileStore, KeyValueStore, MemoryStore, StorageKey};
