//! Build-time layer filtering
//!
//! [`LayerFilter<P>`] turns a tuple of layers into the pipeline made of only
//! the enabled ones, in their original relative order. A disabled layer is
//! absent from the resulting type, so it costs no branch, no call and no
//! storage.
//!
//! ```
//! use std::marker::PhantomData;
//! use strata_pipeline::{default_hooks, operation, strata, Disabled, Enabled, Layer, LayerFilter};
//!
//! operation!(pub AddOp: fn(i32, i32) -> i32);
//!
//! struct Logging;
//! impl Layer for Logging {
//!     type Enabled = Enabled;
//! }
//!
//! struct Metrics;
//! impl Layer for Metrics {
//!     type Enabled = Disabled;
//! }
//!
//! default_hooks!(Logging => AddOp);
//! default_hooks!(Metrics => AddOp);
//!
//! fn same_type<T>(_: PhantomData<T>, _: PhantomData<T>) {}
//! same_type(
//!     PhantomData::<LayerFilter<(Logging, Metrics)>>,
//!     PhantomData::<strata![Logging]>,
//! );
//! ```

use crate::layer::{Enablement, Layer};
use crate::strata::{Bedrock, Layered, Strata};

/// Remove disabled layers from a pipeline type
pub trait Filter {
    /// The pipeline of enabled layers only
    type Output: Strata;
}

impl Filter for Bedrock {
    type Output = Bedrock;
}

impl<L: Layer, Below: Filter> Filter for Layered<L, Below> {
    type Output = <L::Enabled as Enablement>::Include<L, Below::Output>;
}

/// A tuple of layers
///
/// Implemented for tuples of up to twelve layers, including `()`.
pub trait LayerPack {
    /// The unfiltered pipeline, in tuple order
    type Stack: Filter;

    /// Number of layers in the pack
    const LEN: usize;

    /// Enablement of each layer, in tuple order
    const ENABLEMENT: &'static [bool];

    /// Number of enabled layers
    const ENABLED_COUNT: usize;

    /// Whether at least one layer is enabled
    const ANY_ENABLED: bool;
}

/// Pipeline of the enabled layers of pack `P`
pub type LayerFilter<P> = <<P as LayerPack>::Stack as Filter>::Output;

const fn count_true(flags: &[bool]) -> usize {
    let mut count = 0;
    let mut i = 0;
    while i < flags.len() {
        if flags[i] {
            count += 1;
        }
        i += 1;
    }
    count
}

macro_rules! impl_layer_pack {
    ($($layer:ident),*) => {
        impl<$($layer: Layer),*> LayerPack for ($($layer,)*) {
            type Stack = crate::strata![$($layer),*];

            const LEN: usize = Self::ENABLEMENT.len();
            const ENABLEMENT: &'static [bool] =
                &[$(<<$layer as Layer>::Enabled as Enablement>::ON),*];
            const ENABLED_COUNT: usize = count_true(Self::ENABLEMENT);
            const ANY_ENABLED: bool = Self::ENABLED_COUNT > 0;
        }
    };
}

impl_layer_pack!();
impl_layer_pack!(L1);
impl_layer_pack!(L1, L2);
impl_layer_pack!(L1, L2, L3);
impl_layer_pack!(L1, L2, L3, L4);
impl_layer_pack!(L1, L2, L3, L4, L5);
impl_layer_pack!(L1, L2, L3, L4, L5, L6);
impl_layer_pack!(L1, L2, L3, L4, L5, L6, L7);
impl_layer_pack!(L1, L2, L3, L4, L5, L6, L7, L8);
impl_layer_pack!(L1, L2, L3, L4, L5, L6, L7, L8, L9);
impl_layer_pack!(L1, L2, L3, L4, L5, L6, L7, L8, L9, L10);
impl_layer_pack!(L1, L2, L3, L4, L5, L6, L7, L8, L9, L10, L11);
impl_layer_pack!(L1, L2, L3, L4, L5, L6, L7, L8, L9, L10, L11, L12);

/// Number of enabled layers in `P`
pub const fn count_enabled<P: LayerPack>() -> usize {
    P::ENABLED_COUNT
}

/// Whether any layer in `P` is enabled
pub const fn any_enabled<P: LayerPack>() -> bool {
    P::ANY_ENABLED
}

/// Enablement of each layer in `P`, in pack order
pub const fn enablement<P: LayerPack>() -> &'static [bool] {
    P::ENABLEMENT
}

/// Filtered pipeline from individual layers
///
/// `layer_filter![A, B]` is the same type as `LayerFilter<(A, B)>` and also
/// accepts more than twelve layers.
#[macro_export]
macro_rules! layer_filter {
    ($($layer:ty),* $(,)?) => {
        <$crate::strata![$($layer),*] as $crate::Filter>::Output
    };
}
