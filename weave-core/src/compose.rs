use std::sync::Arc;

use tracing::{debug, debug_span};

use crate::{
    ComposeError, Function, Signature, Value,
    plan::{Plan, Step},
    validate::{Link, link},
};

/// A validated chain of functions, ready to be called.
///
/// A composition owns the [`Plan`] that runs the chain and the signature of
/// the whole: the first function's inputs (including its variadic slot) and
/// the last function's outputs. Turn it into a [`Function`] with
/// [`Composition::into_function`] to call it or to compose it further.
#[derive(Debug, Clone)]
pub struct Composition {
    name: String,
    signature: Signature,
    plan: Arc<Plan>,
}

impl Composition {
    /// Validates `functions` as a chain and plans its execution.
    ///
    /// The outputs of each function must be accepted by the next one. For a
    /// variadic consumer, a trailing run of element values is collected into
    /// its slot, and a single trailing sequence is passed through as it is.
    ///
    /// # Errors
    ///
    /// Returns a [`ComposeError`] for fewer than two functions or for the
    /// first pair of functions that do not fit together.
    pub fn new<I>(functions: I) -> Result<Self, ComposeError>
    where
        I: IntoIterator<Item = Function>,
    {
        let functions: Vec<Function> = functions.into_iter().collect();

        let span = debug_span!("compose", functions = functions.len());
        let _enter = span.enter();

        let (first, rest) = match functions.split_first() {
            Some((first, rest)) if !rest.is_empty() => (first, rest),
            _ => {
                return Err(ComposeError::TooFewFunctions {
                    count: functions.len(),
                });
            }
        };

        let mut steps = Vec::with_capacity(2 * functions.len());
        steps.push(Step::call(first.clone()));

        let mut returns = first.signature().outputs();
        for (offset, function) in rest.iter().enumerate() {
            if let Link::Collect(correction) = link(offset + 1, returns, function.signature())? {
                steps.push(Step::Correct(correction));
            }
            steps.push(Step::call(function.clone()));
            returns = function.signature().outputs();
        }

        let signature = Signature::from_parts(
            first.signature().params().to_vec(),
            first.signature().variadic().copied(),
            returns.to_vec(),
        );

        let names: Vec<&str> = functions.iter().map(Function::name).collect();
        let name = format!("compose({})", names.join(", "));

        debug!(%signature, steps = steps.len(), "planned composition");

        Ok(Self {
            name,
            signature,
            plan: Arc::new(Plan::new(steps)),
        })
    }

    /// The signature of the composed chain.
    #[must_use]
    pub fn signature(&self) -> &Signature {
        &self.signature
    }

    #[must_use]
    pub fn plan(&self) -> &Plan {
        &self.plan
    }

    /// Wraps the composition in a [`Function`] that replays the plan.
    #[must_use]
    pub fn into_function(self) -> Function {
        let Self {
            name,
            signature,
            plan,
        } = self;

        Function::from_body(name, signature, move |values| plan.run(values))
    }
}

/// Composes `functions` left to right into one function.
///
/// # Example
///
/// ```
/// use weave_core::{Function, compose};
///
/// fn int_to_str(x: i32) -> String {
///     x.to_string()
/// }
///
/// fn str_len(s: String) -> usize {
///     s.len()
/// }
///
/// let digits = compose([Function::new(int_to_str), Function::new(str_len)])
///     .unwrap()
///     .typed::<(i32,), (usize,)>()
///     .unwrap();
///
/// assert_eq!(digits.call((1234,)).unwrap(), (4,));
/// ```
///
/// # Errors
///
/// See [`Composition::new`].
pub fn compose<I>(functions: I) -> Result<Function, ComposeError>
where
    I: IntoIterator<Item = Function>,
{
    Composition::new(functions).map(Composition::into_function)
}

/// Composes dynamically supplied values, each of which must hold a [`Function`].
///
/// # Errors
///
/// Returns [`ComposeError::NotAFunction`] for the first value that is not a
/// function, or any error of [`Composition::new`].
pub fn compose_values(values: Vec<Value>) -> Result<Function, ComposeError> {
    if values.len() < 2 {
        return Err(ComposeError::TooFewFunctions {
            count: values.len(),
        });
    }

    let functions = values
        .into_iter()
        .enumerate()
        .map(|(index, value)| {
            let found = value.ty();
            value
                .downcast::<Function>()
                .map_err(|_| ComposeError::NotAFunction { index, found })
        })
        .collect::<Result<Vec<_>, _>>()?;

    compose(functions)
}

/// Composes `functions` like [`compose`], panicking if they do not fit.
///
/// Meant for chains fixed at startup, where a mismatch is a programming error.
///
/// # Panics
///
/// Panics with the [`ComposeError`] message if composition fails.
#[must_use]
pub fn must_compose<I>(functions: I) -> Function
where
    I: IntoIterator<Item = Function>,
{
    match compose(functions) {
        Ok(function) => function,
        Err(error) => panic!("{error}"),
    }
}
