//! Auth module: static bearer tokens mapped to roles.
//!
//! The token map is loaded once at startup and never mutated; handlers only
//! ever see it through a shared `Arc<TokenStore>`.

pub mod domain;
pub mod errors;
pub mod guard;
pub mod token_store;

pub use domain::Role;
pub use errors::AuthError;
pub use guard::{require_editor, resolve_role};
pub use token_store::TokenStore;
