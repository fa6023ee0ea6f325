//! Layers and hook resolution
//!
//! A layer is a stateless type whose hooks are associated functions. For each
//! operation it takes part in, a layer implements [`Intercept<Op>`]; any hook
//! it leaves out falls back to the layer's generic hook
//! ([`Layer::before_any`] / [`Layer::after_any`]), which in turn defaults to a
//! no-op. The lookup happens entirely through trait resolution, so a hook the
//! layer never wrote costs nothing at run time.
//!
//! ```
//! use strata_pipeline::{default_hooks, operation, Enabled, Intercept, Layer, LayerResult};
//! use strata_state::StateRegistry;
//!
//! operation!(pub AddOp: fn(i32, i32) -> i32);
//! operation!(pub PrintOp<'a>: fn(&'a str));
//!
//! struct Audit;
//!
//! impl Layer for Audit {
//!     type Enabled = Enabled;
//! }
//!
//! // Specific "before" hook for AddOp, no "after" hook
//! impl Intercept<AddOp> for Audit {
//!     fn before(_states: &StateRegistry, args: &(i32, i32)) -> LayerResult {
//!         assert!(args.0 <= i32::MAX - args.1);
//!         Ok(())
//!     }
//! }
//!
//! // Participates in PrintOp without any hook
//! default_hooks!(Audit => PrintOp<'_>);
//! ```

use std::any::type_name;

use strata_state::StateRegistry;

use crate::error::LayerResult;
use crate::operation::Operation;
use crate::strata::{Layered, Strata};

// =============================================================================
// Enablement
// =============================================================================

mod sealed {
    pub trait Sealed {}
}

/// Build-time on/off switch for a layer
///
/// `Switch<{ cfg!(feature = "audit") }>` ties a layer to any compile-time
/// boolean.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct Switch<const ON: bool>;

/// Layer is part of every pipeline it is listed in
pub type Enabled = Switch<true>;

/// Layer is removed from every filtered pipeline
pub type Disabled = Switch<false>;

impl<const ON: bool> sealed::Sealed for Switch<ON> {}

/// Type-level enablement flag
///
/// Sealed: the only implementors are [`Enabled`] and [`Disabled`].
pub trait Enablement: sealed::Sealed + 'static {
    /// Flag value
    const ON: bool;

    /// Pipeline that results from putting layer `L` on top of `Below`:
    /// `Layered<L, Below>` when enabled, `Below` unchanged otherwise.
    type Include<L: Layer, Below: Strata>: Strata;
}

impl Enablement for Switch<true> {
    const ON: bool = true;
    type Include<L: Layer, Below: Strata> = Layered<L, Below>;
}

impl Enablement for Switch<false> {
    const ON: bool = false;
    type Include<L: Layer, Below: Strata> = Below;
}

/// Whether layer `L` is enabled
pub const fn is_layer_enabled<L: Layer>() -> bool {
    <L::Enabled as Enablement>::ON
}

// =============================================================================
// Layer / Intercept
// =============================================================================

/// A cross-cutting interceptor
///
/// Both generic hooks accept any operation and default to doing nothing.
/// Override them for behaviour that does not depend on the argument types,
/// such as counting calls per operation name.
pub trait Layer: 'static {
    /// Whether the layer takes part in filtered pipelines
    type Enabled: Enablement;

    /// Name used in errors and logs
    fn name() -> &'static str {
        type_name::<Self>()
    }

    /// Generic "before" hook
    fn before_any<Op: Operation>(_states: &StateRegistry, _args: &Op::Args) -> LayerResult {
        Ok(())
    }

    /// Generic "after" hook
    fn after_any<Op: Operation>(
        _states: &StateRegistry,
        _output: &mut Op::Output,
        _args: &Op::Args,
    ) -> LayerResult {
        Ok(())
    }
}

/// Participation of a layer in operation `Op`
///
/// Override `before` / `after` for operation-specific hooks. Methods left out
/// resolve to the layer's generic hooks.
pub trait Intercept<Op: Operation>: Layer {
    /// Runs before the core function; `Err` aborts the execution
    fn before(states: &StateRegistry, args: &Op::Args) -> LayerResult {
        Self::before_any::<Op>(states, args)
    }

    /// Runs after the core function and may rewrite its output in place
    fn after(states: &StateRegistry, output: &mut Op::Output, args: &Op::Args) -> LayerResult {
        Self::after_any::<Op>(states, output, args)
    }
}

/// Declare that a layer takes part in some operations using only its generic
/// hooks (or none)
///
/// `default_hooks!(Metrics => AddOp, PrintOp<'_>)` expands to one empty
/// `impl Intercept<_> for Metrics {}` per operation.
#[macro_export]
macro_rules! default_hooks {
    ($layer:ty => $($op:ty),+ $(,)?) => {
        $(impl $crate::Intercept<$op> for $layer {})+
    };
}
