//! Registry state machine: bindings, locks and the snapshot stack.

use crate::binding::{BindOptions, Binding, Lifetime};
use crate::config::RegistryConfig;
use crate::error::{BoxError, Operation, RegistryError, Result};
use crate::id::ServiceId;
use std::any::{type_name, Any};
use std::collections::{HashMap, HashSet};
use std::sync::Arc;
use tracing::{debug, info, warn};

type BindingMap = HashMap<ServiceId, Arc<Binding>>;

/// The service registry.
///
/// Maps identifiers to [`Binding`]s, tracks which identifiers are locked and
/// keeps a stack of binding snapshots. Mutating operations return
/// `Result<&mut Self>` so calls can be chained with `?`:
///
/// ```
/// use service_registry::{BindOptions, Registry};
///
/// # fn main() -> service_registry::Result<()> {
/// let mut registry = Registry::new();
/// registry
///     .bind("port", || 8080u16)?
///     .bind_with("request-id", || 7u64, BindOptions::transient())?
///     .snapshot()?;
///
/// assert_eq!(*registry.resolve::<u16>("port")?, 8080);
/// # Ok(())
/// # }
/// ```
///
/// Snapshots copy the binding map, not the bindings. A singleton first
/// resolved after a snapshot stays cached once that snapshot is restored,
/// because both maps point at the same [`Binding`]. Locks live outside the
/// snapshot stack: `restore` never adds or removes a lock.
#[derive(Debug)]
pub struct Registry {
    config: RegistryConfig,
    bindings: BindingMap,
    locked: HashSet<ServiceId>,
    snapshots: Vec<BindingMap>,
}

impl Registry {
    pub fn new() -> Self {
        Self::with_config(RegistryConfig::default())
    }

    pub fn with_config(config: RegistryConfig) -> Self {
        info!(
            "Created registry {} (default lifetime: {:?})",
            config.name, config.default_lifetime
        );

        Self {
            config,
            bindings: HashMap::new(),
            locked: HashSet::new(),
            snapshots: Vec::new(),
        }
    }

    pub fn config(&self) -> &RegistryConfig {
        &self.config
    }

    /// Binds `id` to `factory` with the configured default lifetime, unlocked.
    pub fn bind<T, F>(&mut self, id: impl Into<ServiceId>, factory: F) -> Result<&mut Self>
    where
        T: Any + Send + Sync,
        F: Fn() -> T + Send + Sync + 'static,
    {
        let options = BindOptions::default().with_lifetime(self.config.default_lifetime);
        self.bind_with(id, factory, options)
    }

    /// Binds `id` to `factory`, replacing any unlocked binding for `id`.
    ///
    /// Fails with [`RegistryError::Locked`] if `id` is bound and locked. A
    /// lock requested through `options` is recorded even if `id` was never
    /// bound before.
    pub fn bind_with<T, F>(
        &mut self,
        id: impl Into<ServiceId>,
        factory: F,
        options: BindOptions,
    ) -> Result<&mut Self>
    where
        T: Any + Send + Sync,
        F: Fn() -> T + Send + Sync + 'static,
    {
        let id = Self::validate(id.into(), Operation::Bind)?;
        if self.bindings.contains_key(&id) {
            self.ensure_unlocked(&id, Operation::Bind)?;
        }

        self.insert(id, Binding::new(factory, options.lifetime), options.locked);
        Ok(self)
    }

    /// Like [`Registry::bind_with`] for a factory that can fail.
    ///
    /// The factory's error is returned from [`Registry::resolve`] as the
    /// source of [`RegistryError::Factory`].
    pub fn try_bind_with<T, E, F>(
        &mut self,
        id: impl Into<ServiceId>,
        factory: F,
        options: BindOptions,
    ) -> Result<&mut Self>
    where
        T: Any + Send + Sync,
        E: Into<BoxError>,
        F: Fn() -> std::result::Result<T, E> + Send + Sync + 'static,
    {
        let id = Self::validate(id.into(), Operation::Bind)?;
        if self.bindings.contains_key(&id) {
            self.ensure_unlocked(&id, Operation::Bind)?;
        }

        self.insert(id, Binding::fallible(factory, options.lifetime), options.locked);
        Ok(self)
    }

    /// Removes the binding for `id`. Unbinding an unknown identifier is a no-op.
    pub fn unbind(&mut self, id: impl Into<ServiceId>) -> Result<&mut Self> {
        let id = Self::validate(id.into(), Operation::Unbind)?;
        self.ensure_unlocked(&id, Operation::Unbind)?;

        self.remove(&id);
        Ok(self)
    }

    /// Replaces the binding for `id` with the configured default lifetime.
    pub fn rebind<T, F>(&mut self, id: impl Into<ServiceId>, factory: F) -> Result<&mut Self>
    where
        T: Any + Send + Sync,
        F: Fn() -> T + Send + Sync + 'static,
    {
        let lifetime = self.config.default_lifetime;
        self.rebind_with(id, factory, lifetime)
    }

    /// Replaces the binding for `id`. The new binding is always unlocked.
    pub fn rebind_with<T, F>(
        &mut self,
        id: impl Into<ServiceId>,
        factory: F,
        lifetime: Lifetime,
    ) -> Result<&mut Self>
    where
        T: Any + Send + Sync,
        F: Fn() -> T + Send + Sync + 'static,
    {
        let id = Self::validate(id.into(), Operation::Rebind)?;
        self.ensure_unlocked(&id, Operation::Rebind)?;

        self.remove(&id);
        self.insert(id, Binding::new(factory, lifetime), false);
        Ok(self)
    }

    /// Produces the value bound to `id`.
    ///
    /// Singleton bindings hand out clones of the same `Arc`; transient
    /// bindings run their factory on every call.
    pub fn resolve<T>(&self, id: impl Into<ServiceId>) -> Result<Arc<T>>
    where
        T: Any + Send + Sync,
    {
        let id = Self::validate(id.into(), Operation::Resolve)?;
        let binding = self
            .bindings
            .get(&id)
            .ok_or_else(|| RegistryError::Unbound { id: id.clone() })?;

        let instance = binding.value().map_err(|source| RegistryError::Factory {
            id: id.clone(),
            source,
        })?;

        instance
            .downcast::<T>()
            .map_err(|_| RegistryError::TypeMismatch {
                id,
                expected: type_name::<T>(),
            })
    }

    /// Pushes a copy of the current binding map onto the snapshot stack.
    pub fn snapshot(&mut self) -> Result<&mut Self> {
        if let Some(limit) = self.config.snapshot_limit {
            if self.snapshots.len() >= limit {
                warn!("{}: snapshot limit of {} reached", self.config.name, limit);
                return Err(RegistryError::SnapshotLimit { limit });
            }
        }

        self.snapshots.push(self.bindings.clone());
        debug!(
            "{}: took snapshot #{} of {} bindings",
            self.config.name,
            self.snapshots.len(),
            self.bindings.len()
        );
        Ok(self)
    }

    /// Pops the latest snapshot and makes it the live binding map.
    pub fn restore(&mut self) -> Result<&mut Self> {
        let bindings = self
            .snapshots
            .pop()
            .ok_or(RegistryError::EmptySnapshotStack)?;

        debug!(
            "{}: restored snapshot #{} ({} -> {} bindings)",
            self.config.name,
            self.snapshots.len() + 1,
            self.bindings.len(),
            bindings.len()
        );
        self.bindings = bindings;
        Ok(self)
    }

    pub fn contains(&self, id: impl Into<ServiceId>) -> bool {
        self.bindings.contains_key(&id.into())
    }

    pub fn is_locked(&self, id: impl Into<ServiceId>) -> bool {
        self.locked.contains(&id.into())
    }

    /// Number of live bindings.
    pub fn len(&self) -> usize {
        self.bindings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bindings.is_empty()
    }

    pub fn snapshot_depth(&self) -> usize {
        self.snapshots.len()
    }

    pub fn ids(&self) -> impl Iterator<Item = &ServiceId> {
        self.bindings.keys()
    }

    fn validate(id: ServiceId, operation: Operation) -> Result<ServiceId> {
        if id.is_valid() {
            Ok(id)
        } else {
            Err(RegistryError::InvalidIdentifier { operation })
        }
    }

    fn ensure_unlocked(&self, id: &ServiceId, operation: Operation) -> Result<()> {
        if self.locked.contains(id) {
            warn!(
                "{}: refused to {} locked service {}",
                self.config.name, operation, id
            );
            return Err(RegistryError::Locked {
                operation,
                id: id.clone(),
            });
        }
        Ok(())
    }

    fn insert(&mut self, id: ServiceId, binding: Binding, locked: bool) {
        debug!(
            "{}: bound {} ({:?}{})",
            self.config.name,
            id,
            binding.lifetime(),
            if locked { ", locked" } else { "" }
        );

        self.bindings.insert(id.clone(), Arc::new(binding));
        if locked {
            self.locked.insert(id);
        }
    }

    fn remove(&mut self, id: &ServiceId) {
        if self.bindings.remove(id).is_some() {
            debug!("{}: unbound {}", self.config.name, id);
        }
        self.locked.remove(id);
    }
}

impl Default for Registry {
    fn default() -> Self {
        Self::new()
    }
}
