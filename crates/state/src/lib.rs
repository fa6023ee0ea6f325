//! Context-scoped layer state for Strata
//!
//! This crate holds the state side of the layer framework:
//! - StateStore: one lock-guarded value plus change observers
//! - StateGuard: scoped exclusive access that notifies observers on drop
//! - StateHandle: cloneable accessor bound to one store
//! - StateRegistry: (state type, context key) -> store, created lazily
//! - Current context: a thread-local key for context-implicit lookups
//! - RegistryConfig: default context key and sizing, loadable from TOML
//!
//! The registry is an ordinary value. Create one at program start and pass it
//! by reference to whatever needs state; there is no hidden global instance.

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod config;
pub mod context;
pub mod handle;
pub mod registry;
pub mod store;

pub use config::{ConfigError, RegistryConfig, DEFAULT_CONTEXT, DEFAULT_INITIAL_CAPACITY};
pub use context::{current_context, enter_context, set_current_context, ContextScope};
pub use handle::StateHandle;
pub use registry::{StateRegistry, StateRegistryBuilder};
pub use store::{Observer, StateGuard, StateStore};
