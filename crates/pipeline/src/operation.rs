//! Operation descriptors
//!
//! An operation is a zero-sized marker type naming one call shape: an
//! argument tuple and an output type. Pipelines are driven per operation, and
//! layers attach hooks per operation.
//!
//! ## Build-time validation
//!
//! A core function is accepted for `Op` only if it satisfies [`Conforms<Op>`]:
//! callable with the elements of `Op::Args`, returning something that
//! converts into `Op::Output`. A mismatch is a compile error at the call site;
//! there is no runtime check.
//!
//! ## Arguments are passed, never copied deeply
//!
//! `Op::Args` must be `Copy`. Hooks borrow the tuple, the core function
//! receives it by value, and the pipeline keeps nothing else. Large or
//! non-`Clone` data travels as a reference, with the operation carrying the
//! lifetime:
//!
//! ```
//! use strata_pipeline::{operation, Operation};
//!
//! pub struct Frame(Vec<u8>);
//!
//! operation!(pub SendOp<'a>: fn(&'a Frame) -> usize);
//! operation!(pub LogOp<'a>: fn(&'a str));
//!
//! fn takes_send(_: <SendOp<'_> as Operation>::Args) {}
//! takes_send((&Frame(vec![0; 4]),));
//! ```
//!
//! Owned, non-`Copy` arguments are rejected where the operation is declared:
//!
//! ```compile_fail
//! use strata_pipeline::operation;
//!
//! operation!(TakeOp: fn(String));
//! ```
//!
//! ```compile_fail
//! use strata_pipeline::{operation, Bedrock, Strata};
//! use strata_state::StateRegistry;
//!
//! operation!(AddOp: fn(i32, i32) -> i32);
//!
//! fn shout(msg: String) -> String {
//!     msg.to_uppercase()
//! }
//!
//! let states = StateRegistry::new();
//! // `shout` does not take (i32, i32): rejected at build time.
//! let _ = Bedrock::exec::<AddOp, _>(&states, shout, (1, 2));
//! ```

use std::any::type_name;

/// Descriptor of one wrappable call shape
///
/// Usually declared with [`operation!`](crate::operation):
///
/// ```
/// use strata_pipeline::{operation, Operation};
///
/// operation!(pub AddOp: fn(i32, i32) -> i32);
/// operation!(pub PrintOp<'a>: fn(&'a str));
///
/// fn takes_add(_: <AddOp as Operation>::Args) {}
/// takes_add((1, 2));
/// let _: <PrintOp<'static> as Operation>::Output = ();
/// ```
pub trait Operation {
    /// Ordered argument types, as a tuple
    type Args: Copy;
    /// Return type (`()` for void operations)
    type Output;

    /// Human-readable name, used in errors and logs
    fn name() -> &'static str {
        type_name::<Self>()
    }
}

// =============================================================================
// Invocation with a tuple of arguments
// =============================================================================

/// A callable that accepts its arguments as one tuple
///
/// Implemented for every `FnOnce` of up to twelve arguments.
pub trait Invoke<Args> {
    /// What the callable returns
    type Output;

    /// Call with the tuple's elements as positional arguments
    fn invoke(self, args: Args) -> Self::Output;
}

macro_rules! impl_invoke {
    ($($arg:ident),*) => {
        impl<Func, Ret, $($arg),*> Invoke<($($arg,)*)> for Func
        where
            Func: FnOnce($($arg),*) -> Ret,
        {
            type Output = Ret;

            #[inline(always)]
            #[allow(non_snake_case)]
            fn invoke(self, ($($arg,)*): ($($arg,)*)) -> Ret {
                self($($arg),*)
            }
        }
    };
}

impl_invoke!();
impl_invoke!(A1);
impl_invoke!(A1, A2);
impl_invoke!(A1, A2, A3);
impl_invoke!(A1, A2, A3, A4);
impl_invoke!(A1, A2, A3, A4, A5);
impl_invoke!(A1, A2, A3, A4, A5, A6);
impl_invoke!(A1, A2, A3, A4, A5, A6, A7);
impl_invoke!(A1, A2, A3, A4, A5, A6, A7, A8);
impl_invoke!(A1, A2, A3, A4, A5, A6, A7, A8, A9);
impl_invoke!(A1, A2, A3, A4, A5, A6, A7, A8, A9, A10);
impl_invoke!(A1, A2, A3, A4, A5, A6, A7, A8, A9, A10, A11);
impl_invoke!(A1, A2, A3, A4, A5, A6, A7, A8, A9, A10, A11, A12);

// =============================================================================
// Conformance predicates
// =============================================================================

/// `F` is a valid core function for `Op`
///
/// Holds when `F` accepts `Op::Args` and its result converts into
/// `Op::Output`.
pub trait Conforms<Op: Operation> {
    /// Run the function and convert its result
    fn call(self, args: Op::Args) -> Op::Output;
}

impl<Op, F> Conforms<Op> for F
where
    Op: Operation,
    F: Invoke<Op::Args>,
    F::Output: Into<Op::Output>,
{
    #[inline(always)]
    fn call(self, args: Op::Args) -> Op::Output {
        self.invoke(args).into()
    }
}

/// `F` is a valid fallible core function for `Op`
///
/// Holds when `F` accepts `Op::Args` and returns `Result<T, E>` with
/// `T: Into<Op::Output>`.
pub trait TryConforms<Op: Operation, E> {
    /// Run the function, converting the success value
    fn try_call(self, args: Op::Args) -> Result<Op::Output, E>;
}

impl<Op, F, T, E> TryConforms<Op, E> for F
where
    Op: Operation,
    F: Invoke<Op::Args, Output = Result<T, E>>,
    T: Into<Op::Output>,
{
    #[inline(always)]
    fn try_call(self, args: Op::Args) -> Result<Op::Output, E> {
        self.invoke(args).map(Into::into)
    }
}

/// Compile-time check that `F` conforms to `Op`
///
/// A no-op at run time; useful in tests and for asserting a signature next to
/// its operation declaration.
#[inline(always)]
pub fn assert_conforms<Op: Operation, F: Conforms<Op>>(_func: &F) {}

/// Declare an [`Operation`] marker type from a signature
///
/// Operations over borrowed arguments name their lifetimes after the type.
///
/// ```
/// use strata_pipeline::operation;
///
/// operation!(
///     /// Concatenates two strings
///     pub ConcatOp<'a>: fn(&'a str, &'a str) -> String
/// );
/// operation!(pub(crate) LogOp<'a>: fn(&'a str));
/// operation!(pub ScaleOp: fn(f64, f64) -> f64);
/// ```
#[macro_export]
macro_rules! operation {
    (
        $(#[$meta:meta])* $vis:vis $name:ident < $($lt:lifetime),+ $(,)? >
        : fn($($arg:ty),* $(,)?) $(-> $ret:ty)?
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
        $vis struct $name<$($lt),+>(::core::marker::PhantomData<fn() -> ($(&$lt (),)+)>);

        impl<$($lt),+> $crate::Operation for $name<$($lt),+> {
            type Args = ($($arg,)*);
            type Output = $crate::__operation_output!($($ret)?);
        }
    };
    ($(#[$meta:meta])* $vis:vis $name:ident : fn($($arg:ty),* $(,)?) $(-> $ret:ty)?) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
        $vis struct $name;

        impl $crate::Operation for $name {
            type Args = ($($arg,)*);
            type Output = $crate::__operation_output!($($ret)?);
        }
    };
}

#[doc(hidden)]
#[macro_export]
macro_rules! __operation_output {
    () => {
        ()
    };
    ($ret:ty) => {
        $ret
    };
}
