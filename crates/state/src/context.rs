//! Thread-local "current context" selector
//!
//! Each OS thread carries one context key, empty by default. Operations that
//! want context-implicit state resolve it through
//! [`StateRegistry::current`](crate::StateRegistry::current) instead of
//! passing a key around.
//!
//! The value is per thread and is never shared: setting it on one thread has
//! no effect on any other, and it is not protected by the registry lock.

use std::cell::RefCell;
use std::marker::PhantomData;
use tracing::trace;

thread_local! {
    /// Current context key for this thread
    static CURRENT_CONTEXT: RefCell<String> = const { RefCell::new(String::new()) };
}

/// Set the calling thread's current context key
pub fn set_current_context(context: impl Into<String>) {
    let context = context.into();
    trace!(target: "strata::state", context = %context, "Switching current context");
    CURRENT_CONTEXT.with(|current| *current.borrow_mut() = context);
}

/// The calling thread's current context key (empty if never set)
pub fn current_context() -> String {
    CURRENT_CONTEXT.with(|current| current.borrow().clone())
}

/// Make `context` current until the returned scope drops
///
/// The previous context is restored when the scope ends, including on panic
/// unwinding.
///
/// ```
/// use strata_state::{current_context, enter_context, set_current_context};
///
/// set_current_context("outer");
/// {
///     let _scope = enter_context("inner");
///     assert_eq!(current_context(), "inner");
/// }
/// assert_eq!(current_context(), "outer");
/// ```
pub fn enter_context(context: impl Into<String>) -> ContextScope {
    let context = context.into();
    trace!(target: "strata::state", context = %context, "Entering context scope");
    let previous = CURRENT_CONTEXT.with(|current| current.replace(context));
    ContextScope {
        previous,
        _not_send: PhantomData,
    }
}

/// Restores the previous current context on drop
///
/// Created by [`enter_context`]. Not `Send`: the scope belongs to the thread
/// whose context it changed.
#[derive(Debug)]
#[must_use = "the previous context is restored as soon as the scope is dropped"]
pub struct ContextScope {
    previous: String,
    _not_send: PhantomData<*const ()>,
}

impl ContextScope {
    /// Context key that will be restored
    pub fn previous(&self) -> &str {
        &self.previous
    }
}

impl Drop for ContextScope {
    fn drop(&mut self) {
        let previous = std::mem::take(&mut self.previous);
        CURRENT_CONTEXT.with(|current| *current.borrow_mut() = previous);
    }
}
