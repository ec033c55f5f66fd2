mod reflect;
mod utils;

use proc_macro::TokenStream;
use syn::{Error, parse_macro_input};

/// Derives a reflective [`Function`] descriptor for a free function.
///
/// The function itself is kept unchanged. Next to it, the macro generates a
/// unit struct named after the function in `UpperCamelCase` that converts
/// into a [`Function`] with `From`/`Into`.
///
/// The constructor is chosen from the signature:
///
/// - A tuple return type, or none at all, gives one output per element.
///   Any other return type is a single output.
/// - A last parameter marked `#[variadic]` becomes the variadic slot. It must
///   have type `Vec<T>`.
///
/// ## Restrictions
///
/// - No generic parameters or `impl Trait` parameters.
/// - No `async`, `unsafe` or `extern` functions, and no methods.
/// - `#[variadic]` may only mark the last parameter.
///
/// ## Example
///
/// ### Input
///
/// ```ignore
/// #[reflect]
/// pub fn arg_vard(a: String, #[variadic] b: Vec<i32>) -> (String, i32) {
///     (a, b.iter().sum())
/// }
/// ```
///
/// ### Expanded
///
/// ```ignore
/// pub fn arg_vard(a: String, b: Vec<i32>) -> (String, i32) {
///     (a, b.iter().sum())
/// }
///
/// #[doc = " Reflective descriptor for [`arg_vard`]."]
/// #[derive(Debug, Clone, Copy, Default)]
/// pub struct ArgVard;
///
/// impl ::core::convert::From<ArgVard> for weave_core::Function {
///     fn from(_: ArgVard) -> Self {
///         weave_core::Function::variadic_tuple(arg_vard)
///     }
/// }
/// ```
///
/// [`Function`]: weave_core::Function
#[proc_macro_attribute]
pub fn reflect(attr: TokenStream, item: TokenStream) -> TokenStream {
    let attr = proc_macro2::TokenStream::from(attr);
    if !attr.is_empty() {
        return Error::new_spanned(attr, "`#[reflect]` does not take arguments.")
            .to_compile_error()
            .into();
    }

    let parsed = parse_macro_input!(item as reflect::Parsed);
    parsed.expand().into()
}
