//! Layer Usage Test Suite
//!
//! End-to-end usage of the layer framework from the outside: realistic
//! layers (logging, metrics, validation, output rewriting) driven through
//! filtered pipelines, with their state kept in a `StateRegistry`.
//!
//! ## Modules
//!
//! - `basic_usage`: the add/print/concat operations through the full pipeline
//! - `filtering`: compile-time layer removal and enablement utilities
//! - `contexts`: context-specific state through the thread's current context
//! - `state_usage`: observers, removal, configuration and concurrency
//!
//! ## Running Tests
//!
//! ```bash
//! cargo test --test layer_usage
//!
//! # With hook traces
//! RUST_LOG=trace cargo test --test layer_usage -- --nocapture
//! ```

use std::sync::Once;

pub use strata_layers::{
    default_hooks, operation, Disabled, Enabled, Intercept, Layer, LayerError, LayerFilter,
    LayerResult, Operation, StateRegistry, Strata,
};

pub mod layers;
pub use layers::*;

pub mod contexts;
pub mod filtering;

// =============================================================================
// SHARED TEST UTILITIES
// =============================================================================

static INIT_TRACING: Once = Once::new();

/// Install a test-writer subscriber once per test binary
pub fn init_tracing() {
    INIT_TRACING.call_once(|| {
        tracing_subscriber::fmt()
            .with_test_writer()
            .with_max_level(tracing::Level::TRACE)
            .try_init()
            .ok();
    });
}

/// Registry with tracing installed
pub fn setup() -> StateRegistry {
    init_tracing();
    StateRegistry::new()
}

/// The core functions every suite wraps
pub fn add(a: i32, b: i32) -> i32 {
    a + b
}

pub fn concat(a: &str, b: &str) -> String {
    format!("{a}{b}")
}

/// Run `add` through the application pipeline
pub fn exec_add(states: &StateRegistry, a: i32, b: i32) -> LayerResult<i32> {
    <AppPipeline as Strata>::exec::<AddOp, _>(states, add, (a, b))
}
