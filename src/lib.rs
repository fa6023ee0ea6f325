//! Strata layers - composable interception with context-scoped state
//!
//! Wraps arbitrary functions in an ordered, build-time-fixed set of layers
//! (logging, metrics, validation, ...) without touching the wrapped function.
//! Each layer keeps its state in a [`StateRegistry`], keyed by state type and
//! context.
//!
//! # Quick Start
//!
//! ```
//! use strata_layers::{
//!     operation, Enabled, Intercept, Layer, LayerError, LayerFilter, LayerResult, StateRegistry,
//!     Strata,
//! };
//!
//! operation!(pub AddOp: fn(i32, i32) -> i32);
//!
//! #[derive(Debug, Clone, Default)]
//! struct CallCount(u64);
//!
//! struct Metrics;
//! impl Layer for Metrics {
//!     type Enabled = Enabled;
//! }
//! impl Intercept<AddOp> for Metrics {
//!     fn after(states: &StateRegistry, _out: &mut i32, _args: &(i32, i32)) -> LayerResult {
//!         states.global::<CallCount>().modify(|c| c.0 += 1);
//!         Ok(())
//!     }
//! }
//!
//! struct Validation;
//! impl Layer for Validation {
//!     type Enabled = Enabled;
//! }
//! impl Intercept<AddOp> for Validation {
//!     fn before(_states: &StateRegistry, &(a, b): &(i32, i32)) -> LayerResult {
//!         if a < 0 || b < 0 {
//!             return Err(LayerError::rejected::<Self, AddOp>("Negative numbers not allowed"));
//!         }
//!         Ok(())
//!     }
//! }
//!
//! type Pipeline = LayerFilter<(Metrics, Validation)>;
//!
//! let states = StateRegistry::new();
//! let add = |a: i32, b: i32| a + b;
//!
//! assert_eq!(<Pipeline as Strata>::exec::<AddOp, _>(&states, add, (5, 3)).unwrap(), 8);
//! assert!(<Pipeline as Strata>::exec::<AddOp, _>(&states, add, (-1, 3)).is_err());
//! assert_eq!(states.global::<CallCount>().read().0, 1);
//! ```
//!
//! # Architecture
//!
//! - [`strata_pipeline`]: operations, layers, pipelines and filtering
//! - [`strata_state`]: state stores, handles, the registry and the current
//!   context

pub use strata_pipeline;
pub use strata_state;

pub use strata_pipeline::*;
pub use strata_state::*;
