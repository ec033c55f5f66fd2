use proc_macro2::TokenStream;
use quote::{format_ident, quote};
use syn::{
    Error, FnArg, GenericArgument, ItemFn, PathArguments, Result, ReturnType, Type,
    parse::{Parse, ParseStream},
};

use crate::utils::IdentExt;

/// The shape of a function's return type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Outputs {
    /// One output of the return type.
    Single,
    /// One output per tuple element; `()` or no return type means none.
    Tuple,
}

#[derive(Debug)]
pub(crate) struct Parsed {
    item: ItemFn,
    variadic: bool,
    outputs: Outputs,
}

impl Parse for Parsed {
    /// Parses a function item, strips `#[variadic]` markers and validates constraints.
    fn parse(input: ParseStream) -> Result<Self> {
        let mut item: ItemFn = input.parse()?;
        let sig = &item.sig;

        if let Some(asyncness) = &sig.asyncness {
            return Err(Error::new_spanned(
                asyncness,
                "Async functions are not supported. Remove `async` to use this macro.",
            ));
        }

        if let Some(unsafety) = &sig.unsafety {
            return Err(Error::new_spanned(
                unsafety,
                "Unsafe functions are not supported. Remove `unsafe` to use this macro.",
            ));
        }

        if let Some(abi) = &sig.abi {
            return Err(Error::new_spanned(
                abi,
                "Extern functions are not supported. Remove the ABI to use this macro.",
            ));
        }

        if !sig.generics.params.is_empty() {
            return Err(Error::new_spanned(
                &sig.generics,
                "Generic parameters are not allowed. Remove them to use this macro.",
            ));
        }

        if let Some(variadic) = &sig.variadic {
            return Err(Error::new_spanned(
                variadic,
                "C-variadic functions are not supported. Use `#[variadic]` on a `Vec<T>` parameter instead.",
            ));
        }

        let outputs = match &sig.output {
            ReturnType::Default => Outputs::Tuple,
            ReturnType::Type(_, ty) => match ty.as_ref() {
                Type::Tuple(_) => Outputs::Tuple,
                Type::ImplTrait(impl_trait) => {
                    return Err(Error::new_spanned(
                        impl_trait,
                        "`impl Trait` return types are not supported. Name the type to use this macro.",
                    ));
                }
                _ => Outputs::Single,
            },
        };

        let last = item.sig.inputs.len().saturating_sub(1);
        let mut variadic = false;

        for (index, input) in item.sig.inputs.iter_mut().enumerate() {
            let arg = match input {
                FnArg::Typed(arg) => arg,
                FnArg::Receiver(receiver) => {
                    return Err(Error::new_spanned(
                        receiver,
                        "Methods are not supported. This macro requires a free function.",
                    ));
                }
            };

            if let Type::ImplTrait(impl_trait) = arg.ty.as_ref() {
                return Err(Error::new_spanned(
                    impl_trait,
                    "`impl Trait` parameters are not supported. Name the type to use this macro.",
                ));
            }

            let before = arg.attrs.len();
            arg.attrs.retain(|attr| !attr.path().is_ident("variadic"));
            if arg.attrs.len() == before {
                continue;
            }

            if index != last {
                return Err(Error::new_spanned(
                    &arg.pat,
                    "`#[variadic]` is only allowed on the last parameter.",
                ));
            }

            if !is_vec(&arg.ty) {
                return Err(Error::new_spanned(
                    &arg.ty,
                    "A `#[variadic]` parameter must have type `Vec<T>`.",
                ));
            }

            variadic = true;
        }

        Ok(Parsed {
            item,
            variadic,
            outputs,
        })
    }
}

impl Parsed {
    /// Generates the full token stream for the macro expansion.
    pub fn expand(self) -> TokenStream {
        let descriptor = self.generate_descriptor();
        let item = &self.item;

        quote! {
            #item
            #descriptor
        }
    }

    /// Generates the descriptor struct and its conversion into a `Function`.
    fn generate_descriptor(&self) -> TokenStream {
        let vis = &self.item.vis;
        let fn_ident = &self.item.sig.ident;
        let struct_ident = fn_ident.upper_camel_case();
        let doc = format!(" Reflective descriptor for [`{fn_ident}`].");

        let constructor = match (self.variadic, self.outputs) {
            (false, Outputs::Single) => format_ident!("new"),
            (false, Outputs::Tuple) => format_ident!("tuple"),
            (true, Outputs::Single) => format_ident!("variadic"),
            (true, Outputs::Tuple) => format_ident!("variadic_tuple"),
        };

        quote! {
            #[doc = #doc]
            #[derive(Debug, Clone, Copy, Default)]
            #vis struct #struct_ident;

            impl ::core::convert::From<#struct_ident> for weave_core::Function {
                fn from(_: #struct_ident) -> Self {
                    weave_core::Function::#constructor(#fn_ident)
                }
            }
        }
    }
}

/// Returns `true` for a path type ending in `Vec<T>`.
fn is_vec(ty: &Type) -> bool {
    let Type::Path(path) = ty else {
        return false;
    };

    path.path.segments.last().is_some_and(|segment| {
        segment.ident == "Vec"
            && matches!(
                &segment.arguments,
                PathArguments::AngleBracketed(args)
                    if args.args.len() == 1
                        && matches!(args.args.first(), Some(GenericArgument::Type(_)))
            )
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    use syn::parse_str;

    #[test]
    fn generates_single_output_descriptor() {
        let input = "
            pub fn int_to_str(x: i32) -> String {
                x.to_string()
            }
        ";

        let parsed = parse_str::<Parsed>(input).expect("Parsing should succeed");
        let generated_code = parsed.expand();

        let expected_code = quote! {
            pub fn int_to_str(x: i32) -> String {
                x.to_string()
            }

            #[doc = " Reflective descriptor for [`int_to_str`]."]
            #[derive(Debug, Clone, Copy, Default)]
            pub struct IntToStr;

            impl ::core::convert::From<IntToStr> for weave_core::Function {
                fn from(_: IntToStr) -> Self {
                    weave_core::Function::new(int_to_str)
                }
            }
        };

        assert_eq!(generated_code.to_string(), expected_code.to_string());
    }

    #[test]
    fn generates_variadic_tuple_descriptor() {
        let input = "
            pub(crate) fn arg_vard(a: String, #[variadic] b: Vec<i32>) -> (String, i32) {
                (a, b.iter().sum())
            }
        ";

        let parsed = parse_str::<Parsed>(input).expect("Parsing should succeed");
        let generated_code = parsed.expand();

        let expected_code = quote! {
            pub(crate) fn arg_vard(a: String, b: Vec<i32>) -> (String, i32) {
                (a, b.iter().sum())
            }

            #[doc = " Reflective descriptor for [`arg_vard`]."]
            #[derive(Debug, Clone, Copy, Default)]
            pub(crate) struct ArgVard;

            impl ::core::convert::From<ArgVard> for weave_core::Function {
                fn from(_: ArgVard) -> Self {
                    weave_core::Function::variadic_tuple(arg_vard)
                }
            }
        };

        assert_eq!(generated_code.to_string(), expected_code.to_string());
    }

    #[test]
    fn missing_return_type_is_a_tuple() {
        let parsed = parse_str::<Parsed>("fn empty() {}").expect("Parsing should succeed");
        assert_eq!(parsed.outputs, Outputs::Tuple);
        assert!(!parsed.variadic);

        let parsed = parse_str::<Parsed>("fn just_vard(#[variadic] a: Vec<i32>) -> Vec<i32> { a }")
            .expect("Parsing should succeed");
        assert_eq!(parsed.outputs, Outputs::Single);
        assert!(parsed.variadic);
    }

    #[test]
    fn error_if_variadic_is_not_last() {
        let input = "fn f(#[variadic] a: Vec<i32>, b: i32) {}";

        let err = parse_str::<Parsed>(input).expect_err("Parsing should fail");

        assert!(
            err.to_string()
                .contains("only allowed on the last parameter"),
            "Unexpected error message: {err}"
        );
    }

    #[test]
    fn error_if_variadic_is_not_a_vec() {
        let input = "fn f(#[variadic] a: &[i32]) {}";

        let err = parse_str::<Parsed>(input).expect_err("Parsing should fail");

        assert!(
            err.to_string().contains("must have type `Vec<T>`"),
            "Unexpected error message: {err}"
        );
    }

    #[test]
    fn error_if_generics_are_present() {
        let input = "fn identity<T>(x: T) -> T { x }";

        let err = parse_str::<Parsed>(input).expect_err("Parsing should fail");

        assert!(
            err.to_string()
                .contains("Generic parameters are not allowed"),
            "Unexpected error message: {err}"
        );
    }

    #[test]
    fn error_if_async() {
        let input = "async fn fetch() -> u8 { 0 }";

        let err = parse_str::<Parsed>(input).expect_err("Parsing should fail");

        assert!(
            err.to_string().contains("Async functions are not supported"),
            "Unexpected error message: {err}"
        );
    }

    #[test]
    fn error_if_method() {
        let input = "fn get(&self) -> u8 { 0 }";

        let err = parse_str::<Parsed>(input).expect_err("Parsing should fail");

        assert!(
            err.to_string().contains("Methods are not supported"),
            "Unexpected error message: {err}"
        );
    }

    #[test]
    fn error_if_impl_trait_parameter() {
        let input = "fn show(x: impl ToString) -> String { x.to_string() }";

        let err = parse_str::<Parsed>(input).expect_err("Parsing should fail");

        assert!(
            err.to_string().contains("`impl Trait` parameters"),
            "Unexpected error message: {err}"
        );
    }
}
