//! Binding records: a factory, its creation mode and the singleton cache.

use crate::error::BoxError;
use serde::Deserialize;
use std::any::Any;
use std::fmt;
use std::sync::{Arc, Mutex, PoisonError};

/// A value produced by a factory, before it is downcast to its concrete type.
pub type Instance = Arc<dyn Any + Send + Sync>;

type Factory = Box<dyn Fn() -> Result<Instance, BoxError> + Send + Sync>;

/// How often a binding's factory runs.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Lifetime {
    /// The factory runs once and its value is shared by every resolution.
    #[default]
    Singleton,
    /// The factory runs on every resolution.
    Transient,
}

/// Options accepted by [`Registry::bind_with`](crate::Registry::bind_with).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BindOptions {
    pub lifetime: Lifetime,
    pub locked: bool,
}

impl BindOptions {
    pub fn singleton() -> Self {
        Self::default()
    }

    pub fn transient() -> Self {
        Self {
            lifetime: Lifetime::Transient,
            ..Self::default()
        }
    }

    pub fn with_lifetime(mut self, lifetime: Lifetime) -> Self {
        self.lifetime = lifetime;
        self
    }

    /// Locked bindings reject unbind, rebind and overriding binds.
    pub fn locked(mut self) -> Self {
        self.locked = true;
        self
    }
}

/// A factory together with its lifetime and, for singletons, the cached value.
///
/// The cache slot is filled the first time the factory succeeds and is never
/// cleared. Whether a value was already produced is decided by the slot being
/// filled, so values such as `0`, `false` or `()` are cached like any other.
pub struct Binding {
    factory: Factory,
    lifetime: Lifetime,
    cached: Mutex<Option<Instance>>,
}

impl Binding {
    pub fn new<T, F>(factory: F, lifetime: Lifetime) -> Self
    where
        T: Any + Send + Sync,
        F: Fn() -> T + Send + Sync + 'static,
    {
        Self::from_factory(
            Box::new(move || Ok(Arc::new(factory()) as Instance)),
            lifetime,
        )
    }

    /// Creates a binding whose factory can fail.
    ///
    /// A failure is returned from [`Binding::value`] as is and leaves the
    /// singleton cache empty, so the next call runs the factory again.
    pub fn fallible<T, E, F>(factory: F, lifetime: Lifetime) -> Self
    where
        T: Any + Send + Sync,
        E: Into<BoxError>,
        F: Fn() -> Result<T, E> + Send + Sync + 'static,
    {
        Self::from_factory(
            Box::new(move || {
                factory()
                    .map(|value| Arc::new(value) as Instance)
                    .map_err(Into::into)
            }),
            lifetime,
        )
    }

    fn from_factory(factory: Factory, lifetime: Lifetime) -> Self {
        Self {
            factory,
            lifetime,
            cached: Mutex::new(None),
        }
    }

    pub fn lifetime(&self) -> Lifetime {
        self.lifetime
    }

    /// Returns true once a singleton value has been produced.
    pub fn is_cached(&self) -> bool {
        self.cached
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .is_some()
    }

    /// Produces the bound value.
    ///
    /// Transient bindings call the factory every time. Singleton bindings call
    /// it at most once successfully and hand out the same `Arc` afterwards.
    pub fn value(&self) -> Result<Instance, BoxError> {
        match self.lifetime {
            Lifetime::Transient => (self.factory)(),
            Lifetime::Singleton => {
                // Held across the factory call so concurrent resolvers can't both run it.
                let mut cached = self.cached.lock().unwrap_or_else(PoisonError::into_inner);
                if let Some(instance) = cached.as_ref() {
                    return Ok(Arc::clone(instance));
                }

                let instance = (self.factory)()?;
                *cached = Some(Arc::clone(&instance));
                Ok(instance)
            }
        }
    }
}

impl fmt::Debug for Binding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Binding")
            .field("lifetime", &self.lifetime)
            .field("cached", &self.is_cached())
            .finish_non_exhaustive()
    }
}
