//! A registry handle that can be shared between tasks and threads.

use crate::binding::{BindOptions, Lifetime};
use crate::config::RegistryConfig;
use crate::error::{BoxError, Result};
use crate::id::ServiceId;
use crate::registry::Registry;
use std::any::Any;
use std::sync::Arc;
use tokio::sync::RwLock;

/// Cloneable handle around a [`Registry`].
///
/// The bindings, locks and snapshot stack sit behind one `RwLock`, so every
/// operation runs in a single critical section and no caller can observe a
/// registry halfway through a `restore`. `resolve` only takes the read lock.
#[derive(Clone, Default)]
pub struct SharedRegistry {
    inner: Arc<RwLock<Registry>>,
}

impl SharedRegistry {
    pub fn new(registry: Registry) -> Self {
        Self {
            inner: Arc::new(RwLock::new(registry)),
        }
    }

    pub fn with_config(config: RegistryConfig) -> Self {
        Self::new(Registry::with_config(config))
    }

    pub async fn bind<T, F>(&self, id: impl Into<ServiceId>, factory: F) -> Result<()>
    where
        T: Any + Send + Sync,
        F: Fn() -> T + Send + Sync + 'static,
    {
        let id = id.into();
        self.inner.write().await.bind(id, factory)?;
        Ok(())
    }

    pub async fn bind_with<T, F>(
        &self,
        id: impl Into<ServiceId>,
        factory: F,
        options: BindOptions,
    ) -> Result<()>
    where
        T: Any + Send + Sync,
        F: Fn() -> T + Send + Sync + 'static,
    {
        let id = id.into();
        self.inner.write().await.bind_with(id, factory, options)?;
        Ok(())
    }

    pub async fn try_bind_with<T, E, F>(
        &self,
        id: impl Into<ServiceId>,
        factory: F,
        options: BindOptions,
    ) -> Result<()>
    where
        T: Any + Send + Sync,
        E: Into<BoxError>,
        F: Fn() -> std::result::Result<T, E> + Send + Sync + 'static,
    {
        let id = id.into();
        self.inner.write().await.try_bind_with(id, factory, options)?;
        Ok(())
    }

    pub async fn unbind(&self, id: impl Into<ServiceId>) -> Result<()> {
        let id = id.into();
        self.inner.write().await.unbind(id)?;
        Ok(())
    }

    pub async fn rebind<T, F>(&self, id: impl Into<ServiceId>, factory: F) -> Result<()>
    where
        T: Any + Send + Sync,
        F: Fn() -> T + Send + Sync + 'static,
    {
        let id = id.into();
        self.inner.write().await.rebind(id, factory)?;
        Ok(())
    }

    pub async fn rebind_with<T, F>(
        &self,
        id: impl Into<ServiceId>,
        factory: F,
        lifetime: Lifetime,
    ) -> Result<()>
    where
        T: Any + Send + Sync,
        F: Fn() -> T + Send + Sync + 'static,
    {
        let id = id.into();
        self.inner.write().await.rebind_with(id, factory, lifetime)?;
        Ok(())
    }

    pub async fn resolve<T>(&self, id: impl Into<ServiceId>) -> Result<Arc<T>>
    where
        T: Any + Send + Sync,
    {
        let id = id.into();
        self.inner.read().await.resolve(id)
    }

    pub async fn snapshot(&self) -> Result<()> {
        self.inner.write().await.snapshot()?;
        Ok(())
    }

    pub async fn restore(&self) -> Result<()> {
        self.inner.write().await.restore()?;
        Ok(())
    }

    pub async fn contains(&self, id: impl Into<ServiceId>) -> bool {
        let id = id.into();
        self.inner.read().await.contains(id)
    }

    pub async fn is_locked(&self, id: impl Into<ServiceId>) -> bool {
        let id = id.into();
        self.inner.read().await.is_locked(id)
    }

    pub async fn snapshot_depth(&self) -> usize {
        self.inner.read().await.snapshot_depth()
    }
}

impl From<Registry> for SharedRegistry {
    fn from(registry: Registry) -> Self {
        Self::new(registry)
    }
}
