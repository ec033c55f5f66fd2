//! Runtime composition of dynamically typed functions.
//!
//! Weave chains functions whose signatures are only known at runtime. The
//! outputs of each function become the inputs of the next, and the chain is
//! checked once, when it is built:
//!
//! - [`Function`]: a shareable callable paired with its runtime [`Signature`]
//! - [`Value`] and [`Type`]: the dynamically typed values that flow between
//!   functions and their runtime identity
//! - [`compose`], [`compose_values`], [`must_compose`]: build one function
//!   out of a chain
//! - [`Composition`] and [`Plan`]: the validated chain and the precomputed
//!   steps that run it
//! - [`Typed`]: a checked, statically typed view of a [`Function`]
//!
//! A variadic function takes a trailing `Vec<E>` as its variadic slot. When
//! the function before it returns loose `E` values, the composition collects
//! them into the slot before the call.
//!
//! ```
//! use weave_core::{Function, compose};
//!
//! fn split(s: String) -> (String, i32, i32) {
//!     (s, 1, 2)
//! }
//!
//! fn sum(label: String, values: Vec<i32>) -> String {
//!     format!("{label}: {}", values.iter().sum::<i32>())
//! }
//!
//! let function = compose([Function::tuple(split), Function::variadic(sum)]).unwrap();
//! let typed = function.typed::<(String,), (String,)>().unwrap();
//!
//! assert_eq!(typed.call(("total".into(),)).unwrap(), ("total: 3".into(),));
//! ```

mod compose;
mod error;
mod function;
mod plan;
mod signature;
mod validate;
mod value;

pub use compose::{Composition, compose, compose_values, must_compose};
pub use error::{CallError, ComposeError, SignatureError, SignatureMismatch};
pub use function::{CallMode, Function, Handler, Typed, VariadicArgs};
pub use plan::{Correction, Plan, Step};
pub use signature::{Signature, SignatureBuilder, VariadicSlot};
pub use value::{Type, Value, ValueList};

#[cfg(feature = "serde-derive")]
pub use {plan::StepDescription, signature::SignatureDescription};

#[cfg(feature = "macros")]
pub use weave_macros::reflect;
