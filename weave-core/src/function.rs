mod handler;
mod typed;

use std::{
    any::{Any, type_name},
    borrow::Cow,
    fmt,
    sync::Arc,
};

use crate::{
    CallError, Signature, SignatureMismatch, Type, Value, ValueList, VariadicSlot,
    value::short_name,
};

pub use handler::{Handler, VariadicArgs};
pub use typed::Typed;

type Body = dyn Fn(Vec<Value>) -> Result<Vec<Value>, CallError> + Send + Sync;

/// How a function receives its trailing arguments.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde-derive", derive(serde::Serialize))]
#[cfg_attr(feature = "serde-derive", serde(rename_all = "snake_case"))]
pub enum CallMode {
    /// Arguments are passed positionally, variadic values one by one.
    Direct,
    /// The last argument is an already built sequence for the variadic slot.
    Spread,
}

impl CallMode {
    /// The mode a composition uses to call a function with this signature.
    #[must_use]
    pub fn for_signature(signature: &Signature) -> Self {
        if signature.is_variadic() {
            Self::Spread
        } else {
            Self::Direct
        }
    }
}

/// A callable value with a runtime [`Signature`].
///
/// `Function` is the reflective handle the composition engine works with. It
/// pairs an erased body with the signature describing the values the body
/// accepts and returns. Handles are cheap to clone and can be shared across
/// threads; the body is never mutated.
///
/// A `Function` is usually built from a plain Rust function:
///
/// ```
/// use weave_core::{Function, Value};
///
/// fn double(x: i32) -> i32 {
///     x * 2
/// }
///
/// let function = Function::new(double);
/// assert_eq!(function.signature().to_string(), "fn(i32) -> i32");
///
/// let returned = function.call(vec![Value::new(21_i32)]).unwrap();
/// assert_eq!(returned[0].downcast_ref::<i32>(), Some(&42));
/// ```
#[derive(Clone)]
pub struct Function {
    inner: Arc<Inner>,
}

#[derive(Clone)]
struct Inner {
    name: Cow<'static, str>,
    signature: Signature,
    body: Arc<Body>,
}

impl Function {
    /// Wraps a function returning a single value.
    pub fn new<Args, F>(function: F) -> Self
    where
        F: Handler<Args>,
        F::Output: Any + Send,
    {
        let signature = Signature::from_parts(F::params(), None, vec![Type::of::<F::Output>()]);
        Self::from_body(handler_name::<F>(), signature, move |args| {
            function.invoke(args).map(|output| vec![Value::new(output)])
        })
    }

    /// Wraps a function returning a tuple, one output per element.
    ///
    /// A function returning `()` has no outputs.
    pub fn tuple<Args, F>(function: F) -> Self
    where
        F: Handler<Args>,
        F::Output: ValueList,
    {
        let signature = Signature::from_parts(F::params(), None, F::Output::types());
        Self::from_body(handler_name::<F>(), signature, move |args| {
            function.invoke(args).map(ValueList::into_values)
        })
    }

    /// Wraps a function whose last `Vec<E>` parameter is a variadic slot.
    pub fn variadic<Args, F>(function: F) -> Self
    where
        F: Handler<Args>,
        F::Output: Any + Send,
        Args: VariadicArgs,
    {
        let signature = Signature::from_parts(
            fixed_params::<Args, F>(),
            Some(VariadicSlot::of::<Args::Element>()),
            vec![Type::of::<F::Output>()],
        );
        Self::from_body(handler_name::<F>(), signature, move |args| {
            function.invoke(args).map(|output| vec![Value::new(output)])
        })
    }

    /// Wraps a variadic function returning a tuple.
    pub fn variadic_tuple<Args, F>(function: F) -> Self
    where
        F: Handler<Args>,
        F::Output: ValueList,
        Args: VariadicArgs,
    {
        let signature = Signature::from_parts(
            fixed_params::<Args, F>(),
            Some(VariadicSlot::of::<Args::Element>()),
            F::Output::types(),
        );
        Self::from_body(handler_name::<F>(), signature, move |args| {
            function.invoke(args).map(ValueList::into_values)
        })
    }

    /// Registers a body together with an explicit signature.
    ///
    /// The body receives the fixed arguments followed by the variadic sequence
    /// (if any), already checked against `signature`. The values it returns
    /// are checked against the declared outputs.
    pub fn from_raw<B>(signature: Signature, body: B) -> Self
    where
        B: Fn(Vec<Value>) -> Result<Vec<Value>, CallError> + Send + Sync + 'static,
    {
        let outputs = signature.outputs().to_vec();
        Self::from_body("raw", signature, move |args| {
            let returned = body(args)?;
            check_returns(&outputs, &returned)?;
            Ok(returned)
        })
    }

    pub(crate) fn from_body<B>(
        name: impl Into<Cow<'static, str>>,
        signature: Signature,
        body: B,
    ) -> Self
    where
        B: Fn(Vec<Value>) -> Result<Vec<Value>, CallError> + Send + Sync + 'static,
    {
        Self {
            inner: Arc::new(Inner {
                name: name.into(),
                signature,
                body: Arc::new(body),
            }),
        }
    }

    /// Replaces the name used in diagnostics.
    #[must_use]
    pub fn named(mut self, name: impl Into<Cow<'static, str>>) -> Self {
        Arc::make_mut(&mut self.inner).name = name.into();
        self
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.inner.name
    }

    #[must_use]
    pub fn signature(&self) -> &Signature {
        &self.inner.signature
    }

    /// Calls the function with positional arguments.
    ///
    /// For a variadic function the arguments after the fixed parameters are
    /// individual element values, collected into the slot before the call.
    ///
    /// # Errors
    ///
    /// Returns a [`CallError`] if the arguments do not fit the signature.
    pub fn call(&self, mut args: Vec<Value>) -> Result<Vec<Value>, CallError> {
        let signature = self.signature();
        let params = signature.params();

        match signature.variadic() {
            None => check_args(params, &args)?,
            Some(slot) => {
                if args.len() < params.len() {
                    return Err(CallError::TooFewArguments {
                        minimum: params.len(),
                        found: args.len(),
                    });
                }
                check_args(params, &args[..params.len()])?;
                let rest = args.split_off(params.len());
                args.push(slot.pack(rest, params.len())?);
            }
        }

        self.apply(args)
    }

    /// Calls a variadic function with its last argument as a ready sequence.
    ///
    /// # Errors
    ///
    /// Returns [`CallError::NotVariadic`] for a non-variadic function, or
    /// another [`CallError`] if the arguments do not fit the signature.
    pub fn call_spread(&self, args: Vec<Value>) -> Result<Vec<Value>, CallError> {
        let signature = self.signature();
        if !signature.is_variadic() {
            return Err(CallError::NotVariadic {
                signature: signature.to_string(),
            });
        }

        let inputs: Vec<Type> = signature.inputs().collect();
        check_args(&inputs, &args)?;

        self.apply(args)
    }

    /// Calls the function in the given mode.
    ///
    /// # Errors
    ///
    /// See [`Function::call`] and [`Function::call_spread`].
    pub fn call_with(&self, mode: CallMode, args: Vec<Value>) -> Result<Vec<Value>, CallError> {
        match mode {
            CallMode::Direct => self.call(args),
            CallMode::Spread => self.call_spread(args),
        }
    }

    /// Views this function through concrete argument and return tuples.
    ///
    /// This is the one place where a dynamically checked function becomes
    /// statically typed again. `Args` lists every input, with a `Vec<E>` for a
    /// variadic slot, and `Rets` lists every output.
    ///
    /// # Errors
    ///
    /// Returns [`SignatureMismatch`] unless the tuples match the signature
    /// exactly.
    pub fn typed<Args, Rets>(&self) -> Result<Typed<Args, Rets>, SignatureMismatch>
    where
        Args: ValueList,
        Rets: ValueList,
    {
        let signature = self.signature();
        let args = Args::types();
        let rets = Rets::types();

        if args.iter().copied().eq(signature.inputs()) && rets == signature.outputs() {
            Ok(Typed::new(self.clone()))
        } else {
            Err(SignatureMismatch {
                expected: Signature::from_parts(args, None, rets).to_string(),
                actual: signature.to_string(),
            })
        }
    }

    fn apply(&self, args: Vec<Value>) -> Result<Vec<Value>, CallError> {
        (self.inner.body)(args)
    }
}

impl fmt::Debug for Function {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Function")
            .field("name", &self.name())
            .field("signature", self.signature())
            .finish()
    }
}

fn handler_name<F>() -> String {
    let full = type_name::<F>();
    if full.contains("{{closure}}") {
        "closure".to_string()
    } else {
        short_name(full)
    }
}

fn fixed_params<Args, F: Handler<Args>>() -> Vec<Type> {
    let mut params = F::params();
    params.pop();
    params
}

fn check_args(expected: &[Type], args: &[Value]) -> Result<(), CallError> {
    if args.len() != expected.len() {
        return Err(CallError::ArgumentCount {
            expected: expected.len(),
            found: args.len(),
        });
    }

    for (position, (expected, arg)) in expected.iter().zip(args).enumerate() {
        if arg.ty() != *expected {
            return Err(CallError::ArgumentType {
                position,
                expected: *expected,
                found: arg.ty(),
            });
        }
    }

    Ok(())
}

fn check_returns(expected: &[Type], returned: &[Value]) -> Result<(), CallError> {
    if returned.len() != expected.len() {
        return Err(CallError::ReturnCount {
            expected: expected.len(),
            found: returned.len(),
        });
    }

    for (position, (expected, value)) in expected.iter().zip(returned).enumerate() {
        if value.ty() != *expected {
            return Err(CallError::ReturnType {
                position,
                expected: *expected,
                found: value.ty(),
            });
        }
    }

    Ok(())
}
