use crate::binding::Lifetime;
use serde::Deserialize;

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct RegistryConfig {
    /// Label attached to every log line emitted by the registry.
    pub name: String,
    /// Lifetime used by `bind` and `rebind` when none is given.
    pub default_lifetime: Lifetime,
    /// Maximum number of snapshots held at once. `None` means unbounded.
    pub snapshot_limit: Option<usize>,
}

impl RegistryConfig {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            default_lifetime: Lifetime::Singleton,
            snapshot_limit: None,
        }
    }

    pub fn transient() -> Self {
        Self::default().with_default_lifetime(Lifetime::Transient)
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    pub fn with_default_lifetime(mut self, lifetime: Lifetime) -> Self {
        self.default_lifetime = lifetime;
        self
    }

    pub fn with_snapshot_limit(mut self, limit: usize) -> Self {
        self.snapshot_limit = Some(limit);
        self
    }
}

impl Default for RegistryConfig {
    fn default() -> Self {
        Self::new("default")
    }
}
