//! StateRegistry: (state type, context key) -> StateStore
//!
//! The registry owns every [`StateStore`], indexed first by the state type's
//! `TypeId` and then by an arbitrary string context key. Stores are created
//! lazily with `T::default()` the first time a (type, key) pair is asked for.
//!
//! ## Locking
//!
//! One coarse `parking_lot::Mutex` protects the map-of-maps. It is held only
//! while looking up, creating or removing stores and is released before the
//! caller touches a store, so contention on one store never serializes
//! unrelated types or keys. `iterate` is the exception: its callback runs under
//! the registry lock and must not call back into the registry.
//!
//! Lock order is registry, then store. Store observers run under their
//! store's lock and therefore must not call into the registry.
//!
//! ## Ownership
//!
//! Stores are reference counted. `remove` and `clear` only drop the registry's
//! reference; handles taken earlier keep reading and writing the old store,
//! while later lookups build a fresh default one.
//!
//! ## Usage
//!
//! ```
//! use strata_state::StateRegistry;
//!
//! #[derive(Debug, Clone, Default)]
//! struct Validation {
//!     strict: bool,
//! }
//!
//! let registry = StateRegistry::new();
//! registry.for_context::<Validation>("tenant-a").access().strict = true;
//!
//! assert!(registry.for_context::<Validation>("tenant-a").read().strict);
//! assert!(!registry.for_context::<Validation>("tenant-b").read().strict);
//! ```

use crate::config::{ConfigError, RegistryConfig};
use crate::context;
use crate::handle::StateHandle;
use crate::store::StateStore;
use parking_lot::Mutex;
use rustc_hash::FxHashMap;
use std::any::{type_name, Any, TypeId};
use std::fmt;
use std::sync::Arc;
use tracing::{debug, info};

// =============================================================================
// Type-erased per-type maps
// =============================================================================

/// Operations the registry needs on a per-type map without knowing `T`
trait ErasedStores: Send {
    fn as_any_mut(&mut self) -> &mut dyn Any;
    fn as_any(&self) -> &dyn Any;
    fn len(&self) -> usize;
    fn remove_context(&mut self, context: &str) -> bool;
}

/// All stores of one state type, by context key
struct TypedStores<T> {
    by_context: FxHashMap<String, Arc<StateStore<T>>>,
}

impl<T> Default for TypedStores<T> {
    fn default() -> Self {
        Self {
            by_context: FxHashMap::default(),
        }
    }
}

impl<T: Send + 'static> ErasedStores for TypedStores<T> {
    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn len(&self) -> usize {
        self.by_context.len()
    }

    fn remove_context(&mut self, context: &str) -> bool {
        self.by_context.remove(context).is_some()
    }
}

type StoreMap = FxHashMap<TypeId, Box<dyn ErasedStores>>;

/// Typed view of the map for `T`, creating it if absent
fn typed_mut<T: Send + 'static>(stores: &mut StoreMap) -> &mut TypedStores<T> {
    stores
        .entry(TypeId::of::<T>())
        .or_insert_with(|| Box::new(TypedStores::<T>::default()) as Box<dyn ErasedStores>)
        .as_any_mut()
        .downcast_mut::<TypedStores<T>>()
        .expect("per-type maps are keyed by their own TypeId")
}

/// Typed view of the map for `T`, if any store of that type exists
fn typed_ref<T: Send + 'static>(stores: &StoreMap) -> Option<&TypedStores<T>> {
    stores
        .get(&TypeId::of::<T>())
        .and_then(|erased| erased.as_any().downcast_ref::<TypedStores<T>>())
}

// =============================================================================
// StateRegistry
// =============================================================================

/// Index of all state stores by type and context key
///
/// Construct one per process (or per test) and pass it by reference to
/// whatever needs state; pipelines hand it to every layer hook.
pub struct StateRegistry {
    config: RegistryConfig,
    stores: Mutex<StoreMap>,
}

impl StateRegistry {
    /// Registry with the default config (`"global"` default context)
    pub fn new() -> Self {
        Self::from_valid_config(RegistryConfig::default())
    }

    /// Registry with an explicit config
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Invalid`] if the config fails validation.
    pub fn with_config(config: RegistryConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self::from_valid_config(config))
    }

    /// Fluent builder
    pub fn builder() -> StateRegistryBuilder {
        StateRegistryBuilder::new()
    }

    fn from_valid_config(config: RegistryConfig) -> Self {
        let stores = FxHashMap::with_capacity_and_hasher(config.initial_capacity, Default::default());
        Self {
            config,
            stores: Mutex::new(stores),
        }
    }

    /// The config this registry was built with
    pub fn config(&self) -> &RegistryConfig {
        &self.config
    }

    /// Context key used by [`global`](Self::global)
    pub fn default_context(&self) -> &str {
        &self.config.default_context
    }

    // -------------------------------------------------------------------------
    // Store lookup
    // -------------------------------------------------------------------------

    /// The store for (`T`, `context`), created with `T::default()` if absent
    ///
    /// Lookup and construction happen under the registry lock, so concurrent
    /// callers racing on the same pair all get the same store.
    pub fn get_or_create<T>(&self, context: &str) -> Arc<StateStore<T>>
    where
        T: Default + Send + 'static,
    {
        let mut stores = self.stores.lock();
        let typed = typed_mut::<T>(&mut stores);
        if let Some(store) = typed.by_context.get(context) {
            return Arc::clone(store);
        }

        debug!(
            target: "strata::state",
            state = type_name::<T>(),
            context = context,
            "Creating state store"
        );
        let store = Arc::new(StateStore::<T>::default());
        typed
            .by_context
            .insert(context.to_string(), Arc::clone(&store));
        store
    }

    /// Handle for `T` in the configured default context
    pub fn global<T>(&self) -> StateHandle<T>
    where
        T: Default + Send + 'static,
    {
        self.for_context(&self.config.default_context)
    }

    /// Handle for `T` in an explicit context
    pub fn for_context<T>(&self, context: &str) -> StateHandle<T>
    where
        T: Default + Send + 'static,
    {
        StateHandle::new(self.get_or_create::<T>(context), context)
    }

    /// Handle for `T` in the calling thread's current context
    ///
    /// See [`set_current_context`](Self::set_current_context).
    pub fn current<T>(&self) -> StateHandle<T>
    where
        T: Default + Send + 'static,
    {
        let context = context::current_context();
        StateHandle::new(self.get_or_create::<T>(&context), context)
    }

    /// Whether a store exists for (`T`, `context`)
    pub fn contains<T>(&self, context: &str) -> bool
    where
        T: Send + 'static,
    {
        let stores = self.stores.lock();
        typed_ref::<T>(&stores).is_some_and(|typed| typed.by_context.contains_key(context))
    }

    /// Context keys holding a store of type `T`, in unspecified order
    pub fn contexts<T>(&self) -> Vec<String>
    where
        T: Send + 'static,
    {
        let stores = self.stores.lock();
        typed_ref::<T>(&stores)
            .map(|typed| typed.by_context.keys().cloned().collect())
            .unwrap_or_default()
    }

    /// Call `f` once per existing (context, store) pair of type `T`
    ///
    /// Order is unspecified. `f` runs under the registry lock and must not
    /// call back into this registry.
    ///
    /// Reading or writing a store from `f` takes that store's lock while the
    /// registry lock is held. An observer that looks up the registry takes the
    /// same two locks in the opposite order, so a concurrent `iterate` over
    /// the store it fires on can deadlock. Observers must only use handles
    /// resolved before they were registered.
    pub fn iterate<T>(&self, mut f: impl FnMut(&str, &StateStore<T>))
    where
        T: Send + 'static,
    {
        let stores = self.stores.lock();
        if let Some(typed) = typed_ref::<T>(&stores) {
            for (context, store) in &typed.by_context {
                f(context, store);
            }
        }
    }

    // -------------------------------------------------------------------------
    // Removal
    // -------------------------------------------------------------------------

    /// Drop the store for (`T`, `context`); no-op if there is none
    ///
    /// Returns whether a store was removed.
    pub fn remove<T>(&self, context: &str) -> bool
    where
        T: Send + 'static,
    {
        let key = TypeId::of::<T>();
        let mut stores = self.stores.lock();
        let Some(typed) = stores.get_mut(&key) else {
            return false;
        };
        let removed = typed.remove_context(context);
        if typed.len() == 0 {
            stores.remove(&key);
        }
        if removed {
            debug!(
                target: "strata::state",
                state = type_name::<T>(),
                context = context,
                "Removed state store"
            );
        }
        removed
    }

    /// Drop the store of every type held under `context`
    ///
    /// Returns the number of stores removed.
    pub fn remove_context(&self, context: &str) -> usize {
        let mut stores = self.stores.lock();
        let mut removed = 0;
        stores.retain(|_, typed| {
            if typed.remove_context(context) {
                removed += 1;
            }
            typed.len() > 0
        });
        debug!(target: "strata::state", context = context, removed, "Removed context");
        removed
    }

    /// Drop every store of every type
    ///
    /// Outstanding handles keep their (now detached) stores and observers.
    pub fn clear(&self) {
        let mut stores = self.stores.lock();
        let dropped: usize = stores.values().map(|typed| typed.len()).sum();
        stores.clear();
        info!(target: "strata::state", dropped, "Cleared state registry");
    }

    /// Number of stores across all types
    pub fn len(&self) -> usize {
        self.stores.lock().values().map(|typed| typed.len()).sum()
    }

    /// Whether the registry holds no stores
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    // -------------------------------------------------------------------------
    // Current context
    // -------------------------------------------------------------------------

    /// Set the calling thread's current context key
    pub fn set_current_context(context: impl Into<String>) {
        context::set_current_context(context);
    }

    /// The calling thread's current context key (empty if never set)
    pub fn current_context() -> String {
        context::current_context()
    }
}

impl Default for StateRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for StateRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let stores = self.stores.lock();
        f.debug_struct("StateRegistry")
            .field("default_context", &self.config.default_context)
            .field("state_types", &stores.len())
            .field("stores", &stores.values().map(|typed| typed.len()).sum::<usize>())
            .finish()
    }
}

// =============================================================================
// Builder
// =============================================================================

/// Builder for [`StateRegistry`]
///
/// ```
/// use strata_state::StateRegistry;
///
/// let registry = StateRegistry::builder()
///     .default_context("process")
///     .initial_capacity(32)
///     .build()
///     .unwrap();
/// assert_eq!(registry.default_context(), "process");
/// ```
#[derive(Debug, Clone, Default)]
pub struct StateRegistryBuilder {
    config: RegistryConfig,
}

impl StateRegistryBuilder {
    /// Builder starting from the default config
    pub fn new() -> Self {
        Self::default()
    }

    /// Start from an existing config
    pub fn config(mut self, config: RegistryConfig) -> Self {
        self.config = config;
        self
    }

    /// Context key used by `global::<T>()`
    pub fn default_context(mut self, context: impl Into<String>) -> Self {
        self.config.default_context = context.into();
        self
    }

    /// Number of state types to pre-size for
    pub fn initial_capacity(mut self, capacity: usize) -> Self {
        self.config.initial_capacity = capacity;
        self
    }

    /// Validate the config and build the registry
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Invalid`] if the config fails validation.
    pub fn build(self) -> Result<StateRegistry, ConfigError> {
        StateRegistry::with_config(self.config)
    }
}
