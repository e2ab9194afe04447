//! Service identifiers.

use std::fmt;
use std::sync::Arc;
use uuid::Uuid;

/// Opaque key naming a service in a [`Registry`](crate::Registry).
///
/// Identifiers are either plain names or unique tokens. Two names are equal
/// when their text is equal; two tokens are equal only when they were minted
/// by the same [`Token`](crate::Token), whatever their names.
///
/// The empty name is representable but rejected by every registry operation.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ServiceId {
    Name(Arc<str>),
    Token { id: Uuid, name: Arc<str> },
}

impl ServiceId {
    pub fn name(name: impl Into<Arc<str>>) -> Self {
        ServiceId::Name(name.into())
    }

    /// Mints a new identifier that is distinct from every other identifier.
    pub fn unique(name: impl Into<Arc<str>>) -> Self {
        ServiceId::Token {
            id: Uuid::new_v4(),
            name: name.into(),
        }
    }

    pub(crate) fn is_valid(&self) -> bool {
        match self {
            ServiceId::Name(name) => !name.is_empty(),
            ServiceId::Token { .. } => true,
        }
    }
}

impl fmt::Display for ServiceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ServiceId::Name(name) => f.write_str(name),
            ServiceId::Token { name, .. } => write!(f, "Token({})", name),
        }
    }
}

impl From<&str> for ServiceId {
    fn from(name: &str) -> Self {
        ServiceId::name(name)
    }
}

impl From<String> for ServiceId {
    fn from(name: String) -> Self {
        ServiceId::name(name)
    }
}

impl From<&ServiceId> for ServiceId {
    fn from(id: &ServiceId) -> Self {
        id.clone()
    }
}
