use std::{any::Any, vec};

use crate::{CallError, Type, Value};

/// A Rust callable that can be invoked with dynamically typed arguments.
///
/// Implemented for every `Fn(A1, .., An) -> R` with up to eight parameters,
/// where each parameter type is `Any + Send`. `Args` is the tuple of parameter
/// types and only serves to keep the implementations for different arities
/// apart, so it is inferred at the call site.
///
/// Closures passed where a `Handler` is expected need annotated parameter
/// types; plain `fn` items work as they are.
pub trait Handler<Args>: Send + Sync + 'static {
    type Output;

    /// The parameter types, in order.
    fn params() -> Vec<Type>;

    /// Downcasts `args` and calls the function.
    ///
    /// # Errors
    ///
    /// Returns a [`CallError`] if `args` does not match [`Handler::params`].
    fn invoke(&self, args: Vec<Value>) -> Result<Self::Output, CallError>;
}

/// Argument tuples whose last element is a `Vec<E>` usable as a variadic slot.
pub trait VariadicArgs {
    type Element: Any + Send;
}

fn take_arg<T: Any>(args: &mut vec::IntoIter<Value>, position: &mut usize) -> Result<T, CallError> {
    let index = *position;
    *position += 1;

    let value = args.next().ok_or(CallError::ArgumentCount {
        expected: index + 1,
        found: index,
    })?;

    value.downcast::<T>().map_err(|value| CallError::ArgumentType {
        position: index,
        expected: Type::of::<T>(),
        found: value.ty(),
    })
}

macro_rules! impl_handler {
    ($($arg:ident),*) => {
        impl<Func, Ret, $($arg),*> Handler<($($arg,)*)> for Func
        where
            Func: Fn($($arg),*) -> Ret + Send + Sync + 'static,
            $($arg: Any + Send,)*
        {
            type Output = Ret;

            fn params() -> Vec<Type> {
                vec![$(Type::of::<$arg>()),*]
            }

            #[allow(non_snake_case, unused_mut, unused_variables)]
            fn invoke(&self, args: Vec<Value>) -> Result<Ret, CallError> {
                let expected = <[&str]>::len(&[$(stringify!($arg)),*]);
                if args.len() != expected {
                    return Err(CallError::ArgumentCount {
                        expected,
                        found: args.len(),
                    });
                }

                let mut args = args.into_iter();
                let mut position = 0;
                $(let $arg = take_arg::<$arg>(&mut args, &mut position)?;)*

                Ok((self)($($arg),*))
            }
        }
    };
}

impl_handler!();
impl_handler!(A);
impl_handler!(A, B);
impl_handler!(A, B, C);
impl_handler!(A, B, C, D);
impl_handler!(A, B, C, D, E);
impl_handler!(A, B, C, D, E, F);
impl_handler!(A, B, C, D, E, F, G);
impl_handler!(A, B, C, D, E, F, G, H);

macro_rules! impl_variadic_args {
    ($($arg:ident),*) => {
        impl<$($arg,)* Elem: Any + Send> VariadicArgs for ($($arg,)* Vec<Elem>,) {
            type Element = Elem;
        }
    };
}

impl_variadic_args!();
impl_variadic_args!(A);
impl_variadic_args!(A, B);
impl_variadic_args!(A, B, C);
impl_variadic_args!(A, B, C, D);
impl_variadic_args!(A, B, C, D, E);
impl_variadic_args!(A, B, C, D, E, F);
impl_variadic_args!(A, B, C, D, E, F, G);

#[cfg(test)]
mod tests {
    use super::*;

    fn add(a: i32, b: i32) -> i32 {
        a + b
    }

    fn params_of<Args, F: Handler<Args>>(_: &F) -> Vec<Type> {
        F::params()
    }

    #[test]
    fn reports_parameter_types() {
        assert_eq!(
            params_of(&add),
            vec![Type::of::<i32>(), Type::of::<i32>()]
        );
        assert!(params_of(&|| 1_u8).is_empty());
    }

    #[test]
    fn invokes_with_values() {
        let sum = Handler::invoke(&add, vec![Value::new(2_i32), Value::new(3_i32)]).unwrap();
        assert_eq!(sum, 5);
    }

    #[test]
    fn rejects_wrong_argument_count() {
        let error = Handler::invoke(&add, vec![Value::new(2_i32)]).unwrap_err();
        assert_eq!(
            error,
            CallError::ArgumentCount {
                expected: 2,
                found: 1
            }
        );
    }

    #[test]
    fn rejects_wrong_argument_type() {
        let error =
            Handler::invoke(&add, vec![Value::new(2_i32), Value::new(3_i64)]).unwrap_err();
        assert_eq!(
            error,
            CallError::ArgumentType {
                position: 1,
                expected: Type::of::<i32>(),
                found: Type::of::<i64>(),
            }
        );
    }
}
