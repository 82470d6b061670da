use crate::errors::ServiceError;

const MAX_COMPONENT_LEN: usize = 128;

/// Addressing for a resource kind: maps a validated key to its file name.
pub trait ResourceKey: Send + Sync {
    /// Human label used in messages, e.g. `Scenario`.
    const KIND: &'static str;

    /// File name relative to the kind's directory. Must be injective.
    fn file_name(&self) -> String;

    /// Key as shown in not-found messages.
    fn describe(&self) -> String;

    /// Key used for write serialisation; defaults to the file name.
    fn lock_key(&self) -> String {
        self.file_name()
    }
}

/// `(id, version)` address of one scenario version.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ScenarioKey {
    id: String,
    version: String,
}

impl ScenarioKey {
    /// Versions may not contain `_`, so `{id}_v{version}` splits unambiguously
    /// at the last `_v`.
    pub fn new(id: impl Into<String>, version: impl Into<String>) -> Result<Self, ServiceError> {
        let id = id.into();
        let version = version.into();
        validate_component("scenario id", &id, true)?;
        validate_component("scenario version", &version, false)?;
        Ok(Self { id, version })
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn version(&self) -> &str {
        &self.version
    }
}

impl ResourceKey for ScenarioKey {
    const KIND: &'static str = "Scenario";

    fn file_name(&self) -> String {
        format!("{}_v{}.json", self.id, self.version)
    }

    fn describe(&self) -> String {
        format!("{} v{}", self.id, self.version)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ProfileKey {
    id: String,
}

impl ProfileKey {
    pub fn new(id: impl Into<String>) -> Result<Self, ServiceError> {
        let id = id.into();
        validate_component("profile id", &id, true)?;
        Ok(Self { id })
    }

    pub fn id(&self) -> &str {
        &self.id
    }
}

impl ResourceKey for ProfileKey {
    const KIND: &'static str = "Profile";

    fn file_name(&self) -> String {
        format!("{}.json", self.id)
    }

    fn describe(&self) -> String {
        self.id.clone()
    }
}

/// Reject anything that could escape the data directory or alias another key.
///
/// Allowed: ASCII alphanumerics, `-`, `.`, and `_` when `allow_underscore`.
/// Leading dots (`.`, `..`, hidden files) are refused.
pub fn validate_component(field: &'static str, value: &str, allow_underscore: bool) -> Result<(), ServiceError> {
    let ok_char = |c: char| c.is_ascii_alphanumeric() || c == '-' || c == '.' || (allow_underscore && c == '_');
    let valid = !value.is_empty()
        && value.len() <= MAX_COMPONENT_LEN
        && !value.starts_with('.')
        && value.chars().all(ok_char);
    if valid {
        Ok(())
    } else {
        Err(ServiceError::invalid_key(field, value))
    }
}
