use serde::{Deserialize, Serialize};

pub const EDITOR: &str = "editor";

/// Privilege level attached to a token.
///
/// Only `"editor"` may write; every other value (including unknown strings)
/// is treated as read-only.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Role(String);

impl Role {
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    pub fn editor() -> Self {
        Self::new(EDITOR)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_editor(&self) -> bool {
        self.0 == EDITOR
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}
