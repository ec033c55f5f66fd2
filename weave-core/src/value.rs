use std::{
    any::{Any, TypeId, type_name},
    fmt,
    hash::{Hash, Hasher},
    vec,
};

use crate::CallError;

/// The runtime identity of a Rust type.
///
/// Two `Type`s are equal exactly when their [`TypeId`]s are equal. No
/// coercion of any kind is applied, so `i32` and `i64` are as different as
/// `String` and `&'static str`.
#[derive(Clone, Copy)]
pub struct Type {
    id: TypeId,
    name: &'static str,
}

impl Type {
    /// Returns the runtime type of `T`.
    #[must_use]
    pub fn of<T: ?Sized + 'static>() -> Self {
        Self {
            id: TypeId::of::<T>(),
            name: type_name::<T>(),
        }
    }

    #[must_use]
    pub fn id(&self) -> TypeId {
        self.id
    }

    /// The fully qualified type name, as reported by [`type_name`].
    #[must_use]
    pub fn name(&self) -> &'static str {
        self.name
    }

    /// Returns `true` if this is the type `T`.
    #[must_use]
    pub fn is<T: ?Sized + 'static>(&self) -> bool {
        self.id == TypeId::of::<T>()
    }
}

impl PartialEq for Type {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for Type {}

impl Hash for Type {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}

impl fmt::Debug for Type {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name)
    }
}

impl fmt::Display for Type {
    /// Writes the type name with module paths removed, e.g. `Vec<String>`.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&short_name(self.name))
    }
}

/// Strips the module path from every path segment of a type name.
pub(crate) fn short_name(full: &str) -> String {
    let mut short = String::with_capacity(full.len());
    let mut start = 0;

    for (i, c) in full.char_indices() {
        if matches!(c, '<' | '>' | ',' | ' ' | '(' | ')' | '[' | ']' | ';' | '&') {
            short.push_str(last_segment(&full[start..i]));
            short.push(c);
            start = i + c.len_utf8();
        }
    }
    short.push_str(last_segment(&full[start..]));

    short
}

fn last_segment(path: &str) -> &str {
    path.rsplit("::").next().unwrap_or(path)
}

/// An owned, dynamically typed value.
///
/// Values are what flows between functions in a composition. They remember
/// their [`Type`] and can be turned back into the concrete value with
/// [`Value::downcast`].
pub struct Value {
    ty: Type,
    inner: Box<dyn Any + Send>,
}

impl Value {
    /// Wraps a concrete value.
    pub fn new<T: Any + Send>(value: T) -> Self {
        Self {
            ty: Type::of::<T>(),
            inner: Box::new(value),
        }
    }

    #[must_use]
    pub fn ty(&self) -> Type {
        self.ty
    }

    #[must_use]
    pub fn is<T: Any>(&self) -> bool {
        self.ty.is::<T>()
    }

    /// Takes the concrete value out, or gives the value back if it is not a `T`.
    ///
    /// # Errors
    ///
    /// Returns `self` unchanged when the value does not hold a `T`.
    pub fn downcast<T: Any>(self) -> Result<T, Self> {
        let Self { ty, inner } = self;
        inner
            .downcast::<T>()
            .map(|boxed| *boxed)
            .map_err(|inner| Self { ty, inner })
    }

    #[must_use]
    pub fn downcast_ref<T: Any>(&self) -> Option<&T> {
        self.inner.downcast_ref::<T>()
    }
}

impl fmt::Debug for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Value({})", self.ty)
    }
}

/// A tuple whose elements can be moved in and out of a list of [`Value`]s.
///
/// Implemented for tuples of up to eight elements, including `()`. Argument
/// lists and return lists of typed functions are both described with it.
pub trait ValueList: Sized {
    /// The element types, in order.
    fn types() -> Vec<Type>;

    /// Wraps each element in a [`Value`].
    fn into_values(self) -> Vec<Value>;

    /// Rebuilds the tuple from the values a function returned.
    ///
    /// # Errors
    ///
    /// Returns [`CallError::ReturnCount`] or [`CallError::ReturnType`] when the
    /// values do not have exactly the tuple's shape.
    fn from_values(values: Vec<Value>) -> Result<Self, CallError>;
}

fn take_return<T: Any>(
    values: &mut vec::IntoIter<Value>,
    position: &mut usize,
) -> Result<T, CallError> {
    let index = *position;
    *position += 1;

    let value = values.next().ok_or(CallError::ReturnCount {
        expected: index + 1,
        found: index,
    })?;

    value.downcast::<T>().map_err(|value| CallError::ReturnType {
        position: index,
        expected: Type::of::<T>(),
        found: value.ty(),
    })
}

macro_rules! impl_value_list {
    ($($name:ident),*) => {
        impl<$($name: Any + Send),*> ValueList for ($($name,)*) {
            fn types() -> Vec<Type> {
                vec![$(Type::of::<$name>()),*]
            }

            #[allow(non_snake_case)]
            fn into_values(self) -> Vec<Value> {
                let ($($name,)*) = self;
                vec![$(Value::new($name)),*]
            }

            #[allow(non_snake_case, unused_mut, unused_variables)]
            fn from_values(values: Vec<Value>) -> Result<Self, CallError> {
                let expected = <[&str]>::len(&[$(stringify!($name)),*]);
                if values.len() != expected {
                    return Err(CallError::ReturnCount {
                        expected,
                        found: values.len(),
                    });
                }

                let mut values = values.into_iter();
                let mut position = 0;
                $(let $name = take_return::<$name>(&mut values, &mut position)?;)*

                Ok(($($name,)*))
            }
        }
    };
}

impl_value_list!();
impl_value_list!(A);
impl_value_list!(A, B);
impl_value_list!(A, B, C);
impl_value_list!(A, B, C, D);
impl_value_list!(A, B, C, D, E);
impl_value_list!(A, B, C, D, E, F);
impl_value_list!(A, B, C, D, E, F, G);
impl_value_list!(A, B, C, D, E, F, G, H);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn types_compare_by_identity() {
        assert_eq!(Type::of::<i32>(), Type::of::<i32>());
        assert_ne!(Type::of::<i32>(), Type::of::<i64>());
        assert_ne!(Type::of::<Vec<i32>>(), Type::of::<i32>());
        assert!(Type::of::<String>().is::<String>());
    }

    #[test]
    fn display_strips_module_paths() {
        assert_eq!(Type::of::<String>().to_string(), "String");
        assert_eq!(Type::of::<Vec<String>>().to_string(), "Vec<String>");
        assert_eq!(
            Type::of::<Option<(i32, Vec<u8>)>>().to_string(),
            "Option<(i32, Vec<u8>)>"
        );
        assert_eq!(Type::of::<&'static str>().to_string(), "&str");
    }

    #[test]
    fn downcast_returns_the_value_on_mismatch() {
        let value = Value::new(42_i32);
        assert!(value.is::<i32>());
        assert_eq!(value.downcast_ref::<i32>(), Some(&42));

        let value = value.downcast::<String>().unwrap_err();
        assert_eq!(value.ty(), Type::of::<i32>());
        assert_eq!(value.downcast::<i32>().unwrap(), 42);
    }

    #[test]
    fn tuples_move_through_values() {
        assert_eq!(
            <(String, i32)>::types(),
            vec![Type::of::<String>(), Type::of::<i32>()]
        );
        assert!(<()>::types().is_empty());

        let values = ("foo".to_string(), 7_i32).into_values();
        assert_eq!(values.len(), 2);
        assert_eq!(values[1].ty(), Type::of::<i32>());

        let (s, n) = <(String, i32)>::from_values(values).unwrap();
        assert_eq!(s, "foo");
        assert_eq!(n, 7);
    }

    #[test]
    fn from_values_reports_shape_errors() {
        let error = <(i32,)>::from_values(vec![]).unwrap_err();
        assert_eq!(
            error,
            CallError::ReturnCount {
                expected: 1,
                found: 0
            }
        );

        let error = <(i32, bool)>::from_values(vec![Value::new(1_i32), Value::new(1_u8)])
            .unwrap_err();
        assert_eq!(
            error,
            CallError::ReturnType {
                position: 1,
                expected: Type::of::<bool>(),
                found: Type::of::<u8>(),
            }
        );
    }
}
