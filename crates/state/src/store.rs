//! StateStore: a lock-guarded value with change observers
//!
//! ## Design Principles
//!
//! 1. **One lock per store**: the value and its observer list live behind a
//!    single exclusive `parking_lot::Mutex`. Reads take it too; there is no
//!    reader/writer split.
//! 2. **Mutation and notification are coupled**: every `write`, `modify` and
//!    `access()` scope exit runs all observers, in registration order, with
//!    the post-mutation value, before the lock is released.
//! 3. **No raw access**: the value is only reachable through `read`, `write`,
//!    `modify` or a live [`StateGuard`].
//!
//! ## Reentrancy
//!
//! Observers run on the mutating thread while the store lock is held. An
//! observer that calls back into the same store deadlocks.
//!
//! An observer must not look up a `StateRegistry` either. The registry's
//! `iterate` holds the registry lock while its callback takes store locks, so
//! an observer taking the registry lock under a store lock inverts that order
//! and can deadlock against it. Resolve the handles an observer needs before
//! registering it and capture them.

use parking_lot::{Mutex, MutexGuard};
use std::fmt;
use std::ops::{Deref, DerefMut};

/// Callback invoked with the post-mutation value.
pub type Observer<T> = Box<dyn Fn(&T) + Send + Sync>;

/// Value and observers, guarded together.
struct Slot<T> {
    value: T,
    observers: Vec<Observer<T>>,
}

impl<T> Slot<T> {
    fn notify(&self) {
        for observer in &self.observers {
            observer(&self.value);
        }
    }
}

/// Lock-guarded container for one state value plus its observers
///
/// Stores are normally created lazily by
/// [`StateRegistry`](crate::StateRegistry) and reached through a
/// [`StateHandle`](crate::StateHandle), but they are usable standalone.
///
/// # Example
///
/// ```
/// use strata_state::StateStore;
///
/// let store = StateStore::new(0u32);
/// store.modify(|n| *n += 1);
/// *store.access() = 41;
/// assert_eq!(store.read(), 41);
/// ```
pub struct StateStore<T> {
    slot: Mutex<Slot<T>>,
}

impl<T> StateStore<T> {
    /// Create a store holding `value` with no observers
    pub fn new(value: T) -> Self {
        Self {
            slot: Mutex::new(Slot {
                value,
                observers: Vec::new(),
            }),
        }
    }

    /// Return a copy of the current value
    ///
    /// Takes the exclusive lock; does not notify observers.
    pub fn read(&self) -> T
    where
        T: Clone,
    {
        self.slot.lock().value.clone()
    }

    /// Replace the value wholesale, then notify observers
    pub fn write(&self, value: T) {
        let mut slot = self.slot.lock();
        slot.value = value;
        slot.notify();
    }

    /// Mutate the value in place, then notify observers
    ///
    /// The closure and the notification run under one lock acquisition, so
    /// concurrent readers never observe a partially applied update.
    pub fn modify<R>(&self, f: impl FnOnce(&mut T) -> R) -> R {
        let mut slot = self.slot.lock();
        let result = f(&mut slot.value);
        slot.notify();
        result
    }

    /// Lock the store for a scope of direct field access
    ///
    /// The returned guard dereferences to the value. Observers are notified
    /// exactly once when the guard drops, on every exit path including panic
    /// unwinding.
    pub fn access(&self) -> StateGuard<'_, T> {
        StateGuard {
            slot: self.slot.lock(),
        }
    }

    /// Append an observer
    ///
    /// Observers cannot be removed; they live as long as the store. They run
    /// under this store's lock, so they must not call back into this store or
    /// into a `StateRegistry`; capture pre-resolved handles instead.
    pub fn add_observer(&self, observer: impl Fn(&T) + Send + Sync + 'static) {
        self.slot.lock().observers.push(Box::new(observer));
    }

    /// Number of registered observers
    pub fn observer_count(&self) -> usize {
        self.slot.lock().observers.len()
    }
}

impl<T: Default> Default for StateStore<T> {
    fn default() -> Self {
        Self::new(T::default())
    }
}

impl<T> fmt::Debug for StateStore<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StateStore")
            .field("type", &std::any::type_name::<T>())
            .finish_non_exhaustive()
    }
}

// =============================================================================
// Scoped access
// =============================================================================

/// Exclusive, scoped access to a store's value
///
/// Holds the store lock until dropped; dropping notifies every observer with
/// the value as left by the scope.
#[must_use = "the store stays locked until the guard is dropped"]
pub struct StateGuard<'a, T> {
    slot: MutexGuard<'a, Slot<T>>,
}

impl<T> Deref for StateGuard<'_, T> {
    type Target = T;

    fn deref(&self) -> &T {
        &self.slot.value
    }
}

impl<T> DerefMut for StateGuard<'_, T> {
    fn deref_mut(&mut self) -> &mut T {
        &mut self.slot.value
    }
}

impl<T> Drop for StateGuard<'_, T> {
    fn drop(&mut self) {
        self.slot.notify();
    }
}

impl<T: fmt::Debug> fmt::Debug for StateGuard<'_, T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("StateGuard").field(&self.slot.value).finish()
    }
}
