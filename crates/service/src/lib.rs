//! Service layer for the sync backend.
//! - Token store and role checks, independent of the web framework.
//! - File-backed JSON document storage for scenarios and profiles.

pub mod errors;
pub mod auth;
pub mod storage;
pub mod file;
