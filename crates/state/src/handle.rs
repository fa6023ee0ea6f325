//! StateHandle: user-facing accessor bound to one store

use crate::store::{StateGuard, StateStore};
use std::fmt;
use std::sync::Arc;

/// Shared reference to one [`StateStore`] plus the context key it was
/// resolved under
///
/// Handles are cheap to clone and may be used from many threads at once; all
/// access goes through the store's lock. A handle keeps its store alive, so a
/// store removed from the registry (or dropped by `clear()`) stays readable
/// through handles taken before the removal.
///
/// # Example
///
/// ```
/// use strata_state::StateRegistry;
///
/// #[derive(Debug, Clone, Default)]
/// struct Metrics {
///     calls: u64,
/// }
///
/// let registry = StateRegistry::new();
/// let metrics = registry.global::<Metrics>();
///
/// metrics.access().calls += 1;
/// metrics.modify(|m| m.calls += 1);
/// assert_eq!(metrics.read().calls, 2);
/// ```
pub struct StateHandle<T> {
    store: Arc<StateStore<T>>,
    context: Arc<str>,
}

impl<T> StateHandle<T> {
    /// Wrap a store resolved under `context`
    pub fn new(store: Arc<StateStore<T>>, context: impl Into<Arc<str>>) -> Self {
        Self {
            store,
            context: context.into(),
        }
    }

    /// Context key this handle was resolved under
    pub fn context(&self) -> &str {
        &self.context
    }

    /// Scoped exclusive access; observers fire when the guard drops
    pub fn access(&self) -> StateGuard<'_, T> {
        self.store.access()
    }

    /// Copy of the current value
    pub fn read(&self) -> T
    where
        T: Clone,
    {
        self.store.read()
    }

    /// Replace the value and notify observers
    pub fn write(&self, value: T) {
        self.store.write(value);
    }

    /// Mutate in place and notify observers
    pub fn modify<R>(&self, f: impl FnOnce(&mut T) -> R) -> R {
        self.store.modify(f)
    }

    /// Register an observer on the underlying store
    ///
    /// Same rules as [`StateStore::add_observer`]: the observer must not look
    /// up the registry, only use handles captured when it was built.
    pub fn add_observer(&self, observer: impl Fn(&T) + Send + Sync + 'static) {
        self.store.add_observer(observer);
    }

    /// The underlying store
    pub fn store(&self) -> &Arc<StateStore<T>> {
        &self.store
    }

    /// Whether both handles reach the same store
    pub fn same_store(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.store, &other.store)
    }
}

impl<T> Clone for StateHandle<T> {
    fn clone(&self) -> Self {
        Self {
            store: Arc::clone(&self.store),
            context: Arc::clone(&self.context),
        }
    }
}

impl<T> fmt::Debug for StateHandle<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StateHandle")
            .field("type", &std::any::type_name::<T>())
            .field("context", &self.context)
            .finish()
    }
}
