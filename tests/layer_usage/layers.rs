//! Layers and operations shared by every suite

use std::collections::BTreeMap;

use super::*;

operation!(
    /// Adds two integers
    pub AddOp: fn(i32, i32) -> i32
);
operation!(
    /// Prints a message
    pub PrintOp<'a>: fn(&'a str)
);
operation!(
    /// Concatenates two strings
    pub ConcatOp<'a>: fn(&'a str, &'a str) -> String
);

/// Lines written by [`Logging`] in one context
#[derive(Debug, Clone, Default)]
pub struct LogState {
    pub lines: Vec<String>,
}

/// Call counters kept by [`Metrics`]
#[derive(Debug, Clone, Default)]
pub struct MetricsState {
    pub calls: u64,
    pub per_operation: BTreeMap<&'static str, u64>,
}

/// Messages refused by [`Validation`]
#[derive(Debug, Clone, Default)]
pub struct ValidationState {
    pub rejected: u64,
}

// =============================================================================
// Logging: operation-specific hooks, logs into the current context
// =============================================================================

pub struct Logging;

impl Layer for Logging {
    type Enabled = Enabled;

    fn name() -> &'static str {
        "Logging"
    }
}

fn log_line(states: &StateRegistry, line: String) {
    tracing::info!(target: "layers::logging", "{line}");
    states.current::<LogState>().access().lines.push(line);
}

impl Intercept<AddOp> for Logging {
    fn after(states: &StateRegistry, output: &mut i32, &(a, b): &(i32, i32)) -> LayerResult {
        log_line(states, format!("{a} + {b} = {output}"));
        Ok(())
    }
}

impl<'a> Intercept<PrintOp<'a>> for Logging {
    fn before(states: &StateRegistry, (message,): &(&'a str,)) -> LayerResult {
        log_line(states, format!("print: {message}"));
        Ok(())
    }
}

impl<'a> Intercept<ConcatOp<'a>> for Logging {
    fn after(states: &StateRegistry, output: &mut String, (a, b): &(&'a str, &'a str)) -> LayerResult {
        log_line(states, format!("{a:?} ++ {b:?} = {output:?}"));
        Ok(())
    }
}

// =============================================================================
// Metrics: generic hook only, counts every operation globally
// =============================================================================

pub struct Metrics;

impl Layer for Metrics {
    type Enabled = Enabled;

    fn name() -> &'static str {
        "Metrics"
    }

    fn after_any<Op: Operation>(
        states: &StateRegistry,
        _output: &mut Op::Output,
        _args: &Op::Args,
    ) -> LayerResult {
        states.global::<MetricsState>().modify(|m| {
            m.calls += 1;
            *m.per_operation.entry(Op::name()).or_default() += 1;
        });
        Ok(())
    }
}

impl<Op: Operation> Intercept<Op> for Metrics {}

// =============================================================================
// Validation: rejects bad input before the core runs
// =============================================================================

pub struct Validation;

impl Layer for Validation {
    type Enabled = Enabled;

    fn name() -> &'static str {
        "Validation"
    }
}

fn refuse<Op: Operation>(states: &StateRegistry, reason: &str) -> LayerResult {
    states.global::<ValidationState>().modify(|v| v.rejected += 1);
    Err(LayerError::rejected::<Validation, Op>(reason))
}

impl Intercept<AddOp> for Validation {
    fn before(states: &StateRegistry, &(a, b): &(i32, i32)) -> LayerResult {
        if a < 0 || b < 0 {
            return refuse::<AddOp>(states, "Negative numbers not allowed");
        }
        Ok(())
    }
}

impl<'a> Intercept<PrintOp<'a>> for Validation {
    fn before(states: &StateRegistry, (message,): &(&'a str,)) -> LayerResult {
        if message.is_empty() {
            return refuse::<PrintOp<'a>>(states, "Empty message");
        }
        Ok(())
    }
}

default_hooks!(Validation => ConcatOp<'_>);

// =============================================================================
// Shouting: rewrites concatenation results
// =============================================================================

pub struct Shouting;

impl Layer for Shouting {
    type Enabled = Enabled;
}

impl<'a> Intercept<ConcatOp<'a>> for Shouting {
    fn after(_states: &StateRegistry, output: &mut String, _args: &(&'a str, &'a str)) -> LayerResult {
        *output = output.to_uppercase();
        Ok(())
    }
}

default_hooks!(Shouting => AddOp, PrintOp<'_>);

// =============================================================================
// Profiling: switched off, never part of a filtered pipeline
// =============================================================================

pub struct Profiling;

impl Layer for Profiling {
    type Enabled = Disabled;

    fn before_any<Op: Operation>(_states: &StateRegistry, _args: &Op::Args) -> LayerResult {
        panic!("disabled layer must never run");
    }
}

impl<Op: Operation> Intercept<Op> for Profiling {}

/// The application pipeline: Logging, Metrics, Validation
pub type AppPipeline = LayerFilter<(Logging, Metrics, Profiling, Validation)>;
