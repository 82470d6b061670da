//! Storage abstractions for service layer
//!
//! One JSON file per resource key, written atomically, with a per-key lock
//! serialising writers and deleters of the same key.

pub mod document_store;
pub mod key;
pub mod locks;

pub use document_store::DocumentStore;
pub use key::{ProfileKey, ResourceKey, ScenarioKey};
