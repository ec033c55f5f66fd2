use std::{fmt, marker::PhantomData};

use crate::{CallError, Function, ValueList};

use super::CallMode;

/// A [`Function`] whose signature has been checked against concrete tuples.
///
/// Created by [`Function::typed`]. Calls move the argument tuple into values,
/// run the function (as a spread call when it is variadic), and move the
/// returned values back into the `Rets` tuple.
pub struct Typed<Args, Rets> {
    function: Function,
    mode: CallMode,
    _marker: PhantomData<fn(Args) -> Rets>,
}

impl<Args, Rets> Typed<Args, Rets>
where
    Args: ValueList,
    Rets: ValueList,
{
    pub(super) fn new(function: Function) -> Self {
        let mode = CallMode::for_signature(function.signature());
        Self {
            function,
            mode,
            _marker: PhantomData,
        }
    }

    /// Calls the underlying function.
    ///
    /// # Errors
    ///
    /// Only fails if a function inside breaks its own declared signature.
    pub fn call(&self, args: Args) -> Result<Rets, CallError> {
        let returned = self.function.call_with(self.mode, args.into_values())?;
        Rets::from_values(returned)
    }
}

impl<Args, Rets> Typed<Args, Rets> {
    #[must_use]
    pub fn function(&self) -> &Function {
        &self.function
    }

    #[must_use]
    pub fn into_inner(self) -> Function {
        self.function
    }
}

impl<Args, Rets> Clone for Typed<Args, Rets> {
    fn clone(&self) -> Self {
        Self {
            function: self.function.clone(),
            mode: self.mode,
            _marker: PhantomData,
        }
    }
}

impl<Args, Rets> fmt::Debug for Typed<Args, Rets> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Typed").field(&self.function).finish()
    }
}
