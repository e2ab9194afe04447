//! Typed tokens: unique identifiers tied to the type of the value they name.

use crate::binding::BindOptions;
use crate::error::Result;
use crate::id::ServiceId;
use crate::registry::Registry;
use std::any::Any;
use std::fmt;
use std::marker::PhantomData;
use std::sync::Arc;

/// A unique [`ServiceId`] that remembers the type of its service.
///
/// Tokens created with the same name are still different identifiers.
///
/// ```
/// use service_registry::{BindOptions, Registry, Token};
///
/// # fn main() -> service_registry::Result<()> {
/// let greeting: Token<String> = Token::new("greeting");
/// let mut registry = Registry::new();
/// greeting.bind(&mut registry, || "hello".to_string(), BindOptions::singleton())?;
///
/// assert_eq!(greeting.resolve(&registry)?.as_str(), "hello");
/// # Ok(())
/// # }
/// ```
pub struct Token<T> {
    id: ServiceId,
    _value: PhantomData<fn() -> T>,
}

impl<T> Token<T> {
    pub fn new(name: &str) -> Self {
        Self {
            id: ServiceId::unique(name),
            _value: PhantomData,
        }
    }

    pub fn id(&self) -> &ServiceId {
        &self.id
    }

    pub fn name(&self) -> &str {
        match &self.id {
            ServiceId::Name(name) | ServiceId::Token { name, .. } => name.as_ref(),
        }
    }
}

impl<T: Any + Send + Sync> Token<T> {
    pub fn bind<F>(&self, registry: &mut Registry, factory: F, options: BindOptions) -> Result<()>
    where
        F: Fn() -> T + Send + Sync + 'static,
    {
        registry.bind_with(self, factory, options)?;
        Ok(())
    }

    pub fn resolve(&self, registry: &Registry) -> Result<Arc<T>> {
        registry.resolve::<T>(self)
    }
}

impl<T> Clone for Token<T> {
    fn clone(&self) -> Self {
        Self {
            id: self.id.clone(),
            _value: PhantomData,
        }
    }
}

impl<T> fmt::Debug for Token<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Token").field(&self.id).finish()
    }
}

impl<T> From<&Token<T>> for ServiceId {
    fn from(token: &Token<T>) -> Self {
        token.id.clone()
    }
}
