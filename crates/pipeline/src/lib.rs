//! Interception pipelines for Strata
//!
//! This crate composes independent layer types around arbitrary functions:
//! - Operation: descriptor of one call shape (argument tuple, output type)
//! - Layer / Intercept: per-operation "before" and "after" hooks, resolved at
//!   build time (specific hook, else generic hook, else nothing)
//! - Strata: a build-time list of layers (`Bedrock`, `Layered`) that executes
//!   an operation through every hook around the core call
//! - LayerFilter: drops disabled layers from a pipeline type
//! - LayerError: faults raised by hooks
//!
//! Hooks receive the [`StateRegistry`](strata_state::StateRegistry) passed to
//! `exec` and keep whatever state they need there.

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod error;
pub mod filter;
pub mod layer;
pub mod operation;
pub mod strata;

pub use error::{BoxError, LayerError, LayerResult};
pub use filter::{any_enabled, count_enabled, enablement, Filter, LayerFilter, LayerPack};
pub use layer::{is_layer_enabled, Disabled, Enabled, Enablement, Intercept, Layer, Switch};
pub use operation::{assert_conforms, Conforms, Invoke, Operation, TryConforms};
pub use strata::{Bedrock, HookChain, Layered, Strata};
