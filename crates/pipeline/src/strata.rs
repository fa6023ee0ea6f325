//! Pipelines of layers
//!
//! A pipeline is a type-level list: [`Bedrock`] is the empty pipeline and
//! [`Layered<L, Below>`] puts layer `L` on top of the pipeline `Below`. The
//! [`strata!`](crate::strata) macro spells the list out in order, first layer
//! outermost:
//!
//! ```
//! use strata_pipeline::{default_hooks, operation, strata, Enabled, Layer, Strata};
//! use strata_state::StateRegistry;
//!
//! operation!(pub AddOp: fn(i32, i32) -> i32);
//!
//! struct Trace;
//! impl Layer for Trace {
//!     type Enabled = Enabled;
//! }
//! default_hooks!(Trace => AddOp);
//!
//! type Pipeline = strata![Trace];
//!
//! let states = StateRegistry::new();
//! let sum = Pipeline::exec::<AddOp, _>(&states, |a: i32, b: i32| a + b, (5, 3)).unwrap();
//! assert_eq!(sum, 8);
//! assert_eq!(Pipeline::DEPTH, 1);
//! ```
//!
//! ## Execution order
//!
//! For `strata![L1, L2, L3]`, "before" hooks run `L1, L2, L3`, then the core
//! function, then "after" hooks run `L3, L2, L1`. The first hook error stops
//! everything that has not run yet and is returned unchanged.
//!
//! Hooks and the core function see the same argument tuple. It is `Copy`, so
//! handing it to the core function after the "before" hooks and lending it to
//! the "after" hooks copies only the tuple itself, never data it points to.

use std::marker::PhantomData;

use strata_state::StateRegistry;
use tracing::{debug, trace};

use crate::error::{LayerError, LayerResult};
use crate::layer::{Intercept, Layer};
use crate::operation::{Conforms, Operation, TryConforms};

/// The empty pipeline
///
/// Executing through it is a direct call of the core function.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct Bedrock;

/// Layer `L` on top of pipeline `Below`
///
/// Never instantiated; it only exists as a type.
pub struct Layered<L, Below>(PhantomData<fn() -> (L, Below)>);

// =============================================================================
// Hook chains
// =============================================================================

/// Every layer of a pipeline takes part in `Op`
///
/// Implemented automatically when each layer implements [`Intercept<Op>`].
pub trait HookChain<Op: Operation> {
    /// Run all "before" hooks in list order
    fn before_all(states: &StateRegistry, args: &Op::Args) -> LayerResult;

    /// Run all "after" hooks in reverse list order
    fn after_all(states: &StateRegistry, output: &mut Op::Output, args: &Op::Args) -> LayerResult;
}

impl<Op: Operation> HookChain<Op> for Bedrock {
    #[inline(always)]
    fn before_all(_states: &StateRegistry, _args: &Op::Args) -> LayerResult {
        Ok(())
    }

    #[inline(always)]
    fn after_all(
        _states: &StateRegistry,
        _output: &mut Op::Output,
        _args: &Op::Args,
    ) -> LayerResult {
        Ok(())
    }
}

impl<Op, L, Below> HookChain<Op> for Layered<L, Below>
where
    Op: Operation,
    L: Intercept<Op>,
    Below: HookChain<Op>,
{
    #[inline]
    fn before_all(states: &StateRegistry, args: &Op::Args) -> LayerResult {
        L::before(states, args).map_err(|e| aborted::<L, Op>("before", e))?;
        Below::before_all(states, args)
    }

    #[inline]
    fn after_all(states: &StateRegistry, output: &mut Op::Output, args: &Op::Args) -> LayerResult {
        Below::after_all(states, output, args)?;
        L::after(states, output, args).map_err(|e| aborted::<L, Op>("after", e))
    }
}

fn aborted<L: Layer, Op: Operation>(phase: &'static str, err: LayerError) -> LayerError {
    debug!(
        target: "strata::pipeline",
        layer = L::name(),
        operation = Op::name(),
        phase,
        error = %err,
        "Hook aborted execution"
    );
    err
}

// =============================================================================
// Strata
// =============================================================================

/// An ordered, build-time-fixed list of layers
pub trait Strata: Sized + 'static {
    /// Number of layers
    const DEPTH: usize;

    /// Layer names, outermost first
    fn layer_names() -> Vec<&'static str>;

    /// Execute `func` for `Op` through every layer's hooks
    ///
    /// `func` must accept `Op::Args` and return something convertible into
    /// `Op::Output`; anything else is rejected at compile time.
    #[inline]
    fn exec<Op, F>(states: &StateRegistry, func: F, args: Op::Args) -> LayerResult<Op::Output>
    where
        Op: Operation,
        F: Conforms<Op>,
        Self: HookChain<Op>,
    {
        trace!(target: "strata::pipeline", operation = Op::name(), depth = Self::DEPTH, "exec");

        <Self as HookChain<Op>>::before_all(states, &args)?;
        let mut output = func.call(args);
        <Self as HookChain<Op>>::after_all(states, &mut output, &args)?;
        Ok(output)
    }

    /// Execute a fallible `func` for `Op` through every layer's hooks
    ///
    /// An `Err` from `func` skips every "after" hook and is returned as is.
    /// Hook errors are converted into `E`.
    #[inline]
    fn try_exec<Op, F, E>(states: &StateRegistry, func: F, args: Op::Args) -> Result<Op::Output, E>
    where
        Op: Operation,
        F: TryConforms<Op, E>,
        E: From<LayerError>,
        Self: HookChain<Op>,
    {
        trace!(target: "strata::pipeline", operation = Op::name(), depth = Self::DEPTH, "try_exec");

        <Self as HookChain<Op>>::before_all(states, &args)?;
        let mut output = func.try_call(args)?;
        <Self as HookChain<Op>>::after_all(states, &mut output, &args)?;
        Ok(output)
    }
}

impl Strata for Bedrock {
    const DEPTH: usize = 0;

    fn layer_names() -> Vec<&'static str> {
        Vec::new()
    }

    #[inline(always)]
    fn exec<Op, F>(_states: &StateRegistry, func: F, args: Op::Args) -> LayerResult<Op::Output>
    where
        Op: Operation,
        F: Conforms<Op>,
        Self: HookChain<Op>,
    {
        Ok(func.call(args))
    }

    #[inline(always)]
    fn try_exec<Op, F, E>(_states: &StateRegistry, func: F, args: Op::Args) -> Result<Op::Output, E>
    where
        Op: Operation,
        F: TryConforms<Op, E>,
        E: From<LayerError>,
        Self: HookChain<Op>,
    {
        func.try_call(args)
    }
}

impl<L: Layer, Below: Strata> Strata for Layered<L, Below> {
    const DEPTH: usize = 1 + Below::DEPTH;

    fn layer_names() -> Vec<&'static str> {
        let mut names = Vec::with_capacity(Self::DEPTH);
        names.push(L::name());
        names.extend(Below::layer_names());
        names
    }
}

/// Pipeline type from a list of layers, first layer outermost
///
/// `strata![A, B, C]` is `Layered<A, Layered<B, Layered<C, Bedrock>>>` and
/// `strata![]` is [`Bedrock`].
#[macro_export]
macro_rules! strata {
    () => { $crate::Bedrock };
    ($head:ty $(, $tail:ty)* $(,)?) => {
        $crate::Layered<$head, $crate::strata![$($tail),*]>
    };
}
