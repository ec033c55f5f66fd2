use std::{any::Any, fmt};

use crate::{CallError, SignatureError, Type, Value};

/// The trailing variadic parameter of a function.
///
/// A variadic slot accepts zero or more values of its element type `E`. Inside
/// a function the slot is always represented by one `Vec<E>`, its sequence
/// type. The slot also knows how to build that sequence from loose values,
/// which is what lets a composition collect trailing return values at runtime.
#[derive(Clone, Copy)]
pub struct VariadicSlot {
    element: Type,
    sequence: Type,
    pack: fn(Vec<Value>, usize) -> Result<Value, CallError>,
}

impl VariadicSlot {
    /// A slot collecting values of type `E` into a `Vec<E>`.
    #[must_use]
    pub fn of<E: Any + Send>() -> Self {
        Self {
            element: Type::of::<E>(),
            sequence: Type::of::<Vec<E>>(),
            pack: pack::<E>,
        }
    }

    #[must_use]
    pub fn element(&self) -> Type {
        self.element
    }

    #[must_use]
    pub fn sequence(&self) -> Type {
        self.sequence
    }

    /// Packs loose element values into one sequence value.
    ///
    /// `offset` is the argument position of the first value and only affects
    /// error reporting.
    ///
    /// # Errors
    ///
    /// Returns [`CallError::ArgumentType`] if a value is not of the element type.
    pub fn pack(&self, values: Vec<Value>, offset: usize) -> Result<Value, CallError> {
        (self.pack)(values, offset)
    }
}

fn pack<E: Any + Send>(values: Vec<Value>, offset: usize) -> Result<Value, CallError> {
    values
        .into_iter()
        .enumerate()
        .map(|(i, value)| {
            value.downcast::<E>().map_err(|value| CallError::ArgumentType {
                position: offset + i,
                expected: Type::of::<E>(),
                found: value.ty(),
            })
        })
        .collect::<Result<Vec<E>, _>>()
        .map(Value::new)
}

impl PartialEq for VariadicSlot {
    fn eq(&self, other: &Self) -> bool {
        self.element == other.element
    }
}

impl Eq for VariadicSlot {}

impl fmt::Debug for VariadicSlot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "...{:?}", self.element)
    }
}

/// The runtime signature of a function.
///
/// A signature lists the fixed parameter types, an optional trailing
/// [`VariadicSlot`] and the return types. The full input list seen by a
/// caller is the fixed parameters followed by the slot's sequence type.
#[derive(Clone, PartialEq, Eq)]
pub struct Signature {
    params: Vec<Type>,
    variadic: Option<VariadicSlot>,
    returns: Vec<Type>,
}

impl Signature {
    /// Starts building a signature by hand.
    ///
    /// # Example
    ///
    /// ```
    /// use weave_core::Signature;
    ///
    /// let signature = Signature::builder()
    ///     .param::<String>()
    ///     .variadic::<i32>()
    ///     .returns::<String>()
    ///     .returns::<i32>()
    ///     .build()
    ///     .unwrap();
    ///
    /// assert!(signature.is_variadic());
    /// assert_eq!(signature.to_string(), "fn(String, ...i32) -> (String, i32)");
    /// ```
    #[must_use]
    pub fn builder() -> SignatureBuilder {
        SignatureBuilder::default()
    }

    pub(crate) fn from_parts(
        params: Vec<Type>,
        variadic: Option<VariadicSlot>,
        returns: Vec<Type>,
    ) -> Self {
        Self {
            params,
            variadic,
            returns,
        }
    }

    /// The fixed parameter types, excluding the variadic slot.
    #[must_use]
    pub fn params(&self) -> &[Type] {
        &self.params
    }

    #[must_use]
    pub fn variadic(&self) -> Option<&VariadicSlot> {
        self.variadic.as_ref()
    }

    #[must_use]
    pub fn is_variadic(&self) -> bool {
        self.variadic.is_some()
    }

    /// All input types, with the variadic slot as its sequence type.
    pub fn inputs(&self) -> impl Iterator<Item = Type> + '_ {
        self.params
            .iter()
            .copied()
            .chain(self.variadic.map(|slot| slot.sequence()))
    }

    #[must_use]
    pub fn num_inputs(&self) -> usize {
        self.params.len() + usize::from(self.is_variadic())
    }

    #[must_use]
    pub fn outputs(&self) -> &[Type] {
        &self.returns
    }

    /// Returns a serializable description of this signature.
    #[cfg(feature = "serde-derive")]
    #[must_use]
    pub fn describe(&self) -> SignatureDescription {
        SignatureDescription {
            params: self.params.iter().map(ToString::to_string).collect(),
            variadic: self.variadic.map(|slot| slot.element().to_string()),
            returns: self.returns.iter().map(ToString::to_string).collect(),
        }
    }
}

impl fmt::Display for Signature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("fn(")?;
        for (i, param) in self.params.iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            write!(f, "{param}")?;
        }
        if let Some(slot) = &self.variadic {
            if !self.params.is_empty() {
                f.write_str(", ")?;
            }
            write!(f, "...{}", slot.element())?;
        }
        f.write_str(")")?;

        match self.returns.as_slice() {
            [] => Ok(()),
            [single] => write!(f, " -> {single}"),
            returns => {
                f.write_str(" -> (")?;
                for (i, ty) in returns.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{ty}")?;
                }
                f.write_str(")")
            }
        }
    }
}

impl fmt::Debug for Signature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Signature({self})")
    }
}

/// A serializable view of a [`Signature`] using short type names.
#[cfg(feature = "serde-derive")]
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize)]
pub struct SignatureDescription {
    pub params: Vec<String>,
    pub variadic: Option<String>,
    pub returns: Vec<String>,
}

/// Builds a [`Signature`] for [`Function::from_raw`](crate::Function::from_raw).
///
/// Parameters are declared in order. The variadic slot, if any, must come
/// after every fixed parameter.
#[derive(Debug, Default)]
pub struct SignatureBuilder {
    params: Vec<Type>,
    variadic: Option<VariadicSlot>,
    returns: Vec<Type>,
    error: Option<SignatureError>,
}

impl SignatureBuilder {
    #[must_use]
    pub fn param<T: Any + Send>(mut self) -> Self {
        let ty = Type::of::<T>();
        if self.variadic.is_some() {
            self.error.get_or_insert(SignatureError::ParamAfterVariadic { ty });
        }
        self.params.push(ty);
        self
    }

    /// Declares the trailing variadic slot with element type `E`.
    #[must_use]
    pub fn variadic<E: Any + Send>(mut self) -> Self {
        if self.variadic.is_some() {
            self.error.get_or_insert(SignatureError::DuplicateVariadic);
        }
        self.variadic = Some(VariadicSlot::of::<E>());
        self
    }

    #[must_use]
    pub fn returns<T: Any + Send>(mut self) -> Self {
        self.returns.push(Type::of::<T>());
        self
    }

    /// Finishes the signature.
    ///
    /// # Errors
    ///
    /// Returns the first ordering problem found while declaring parameters.
    pub fn build(self) -> Result<Signature, SignatureError> {
        match self.error {
            Some(error) => Err(error),
            None => Ok(Signature::from_parts(
                self.params,
                self.variadic,
                self.returns,
            )),
        }
    }
}
