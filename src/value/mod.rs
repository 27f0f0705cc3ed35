//! Dynamic values passed to and returned from mocked members.
//!
//! Mocked members receive their arguments as a list of [`Value`]s and return
//! a [`Value`]. Two equality modes are supported:
//!
//! - [`Value::strict_eq`] compares primitives by value and arrays, objects and
//!   opaque values by reference.
//! - [`Value::deep_eq`] compares arrays and objects field by field.
//!
//! # Example
//!
//! ```rust
//! use mockwright::Value;
//!
//! let a = Value::array([1, 2, 3]);
//! let b = Value::array([1, 2, 3]);
//!
//! assert!(a.deep_eq(&b));
//! assert!(!a.strict_eq(&b));
//! assert!(a.strict_eq(&a.clone()));
//! assert_eq!(a.to_string(), "[1, 2, 3]");
//! ```

use std::any::Any;
use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

use crate::error::{Error, Result};

/// A dynamically typed value.
///
/// Cloning an `Array`, `Object` or `Opaque` value shares the underlying
/// allocation, so a clone is strictly equal to its source.
#[derive(Clone, Default)]
pub enum Value {
    /// Absence of a value. Returned by members without an implementation.
    #[default]
    Undefined,
    /// Explicit null.
    Null,
    /// Boolean.
    Bool(bool),
    /// Integer number.
    Int(i64),
    /// Floating point number.
    Float(f64),
    /// String.
    Str(String),
    /// Ordered list of values.
    Array(Arc<Vec<Value>>),
    /// String-keyed map of values.
    Object(Arc<BTreeMap<String, Value>>),
    /// Any other Rust value, compared by reference only.
    Opaque(Arc<dyn Any + Send + Sync>),
}

impl Value {
    /// Build an array value.
    pub fn array<I, T>(items: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: Into<Value>,
    {
        Self::Array(Arc::new(items.into_iter().map(Into::into).collect()))
    }

    /// Build an object value from key/value pairs.
    ///
    /// ```rust
    /// use mockwright::Value;
    ///
    /// let user = Value::object([("name", Value::from("ada")), ("age", Value::from(36))]);
    /// assert_eq!(user.to_string(), "{age: 36, name: \"ada\"}");
    /// ```
    pub fn object<I, K, V>(fields: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<Value>,
    {
        Self::Object(Arc::new(
            fields
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        ))
    }

    /// Wrap an arbitrary Rust value.
    pub fn opaque<T: Any + Send + Sync>(value: T) -> Self {
        Self::Opaque(Arc::new(value))
    }

    /// Short name of the value's type, as used by [`is_type`](crate::assertions::matcher::is_type).
    #[must_use]
    pub fn type_name(&self) -> &'static str {
        match self {
            Self::Undefined => "undefined",
            Self::Null => "null",
            Self::Bool(_) => "boolean",
            Self::Int(_) | Self::Float(_) => "number",
            Self::Str(_) => "string",
            Self::Array(_) => "array",
            Self::Object(_) => "object",
            Self::Opaque(_) => "opaque",
        }
    }

    /// Returns `true` for [`Value::Undefined`].
    #[must_use]
    pub fn is_undefined(&self) -> bool {
        matches!(self, Self::Undefined)
    }

    /// The boolean payload, if any.
    #[must_use]
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Self::Bool(b) => Some(*b),
            _ => None,
        }
    }

    /// The integer payload, if any.
    #[must_use]
    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Self::Int(i) => Some(*i),
            _ => None,
        }
    }

    /// Any numeric payload widened to `f64`.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Self::Int(i) => Some(*i as f64),
            Self::Float(x) => Some(*x),
            _ => None,
        }
    }

    /// The string payload, if any.
    #[must_use]
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::Str(s) => Some(s),
            _ => None,
        }
    }

    /// The array items, if any.
    #[must_use]
    pub fn as_array(&self) -> Option<&[Value]> {
        match self {
            Self::Array(items) => Some(items),
            _ => None,
        }
    }

    /// Look up a field of an object value.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&Value> {
        match self {
            Self::Object(fields) => fields.get(key),
            _ => None,
        }
    }

    /// Borrow the payload of an opaque value as `T`.
    #[must_use]
    pub fn downcast_ref<T: Any>(&self) -> Option<&T> {
        match self {
            Self::Opaque(inner) => inner.downcast_ref::<T>(),
            _ => None,
        }
    }

    /// Identity-level equality.
    ///
    /// Primitives compare by value, `Int(2)` equals `Float(2.0)`, `NaN` equals
    /// nothing. Arrays, objects and opaque values are equal only when they
    /// share the same allocation.
    #[must_use]
    pub fn strict_eq(&self, other: &Value) -> bool {
        match (self, other) {
            (Self::Array(a), Self::Array(b)) => Arc::ptr_eq(a, b),
            (Self::Object(a), Self::Object(b)) => Arc::ptr_eq(a, b),
            (Self::Opaque(a), Self::Opaque(b)) => Arc::ptr_eq(a, b),
            _ => self.primitive_eq(other),
        }
    }

    /// Recursive structural equality. Opaque values still compare by reference.
    #[must_use]
    pub fn deep_eq(&self, other: &Value) -> bool {
        match (self, other) {
            (Self::Array(a), Self::Array(b)) => {
                Arc::ptr_eq(a, b)
                    || (a.len() == b.len() && a.iter().zip(b.iter()).all(|(x, y)| x.deep_eq(y)))
            }
            (Self::Object(a), Self::Object(b)) => {
                Arc::ptr_eq(a, b)
                    || (a.len() == b.len()
                        && a.iter()
                            .zip(b.iter())
                            .all(|((ka, va), (kb, vb))| ka == kb && va.deep_eq(vb)))
            }
            (Self::Opaque(a), Self::Opaque(b)) => Arc::ptr_eq(a, b),
            _ => self.primitive_eq(other),
        }
    }

    fn primitive_eq(&self, other: &Value) -> bool {
        match (self, other) {
            (Self::Undefined, Self::Undefined) | (Self::Null, Self::Null) => true,
            (Self::Bool(a), Self::Bool(b)) => a == b,
            (Self::Int(a), Self::Int(b)) => a == b,
            (Self::Str(a), Self::Str(b)) => a == b,
            (Self::Int(_) | Self::Float(_), Self::Int(_) | Self::Float(_)) => {
                match (self.as_f64(), other.as_f64()) {
                    (Some(a), Some(b)) => a == b,
                    _ => false,
                }
            }
            _ => false,
        }
    }
}

/// Structural equality, so `assert_eq!` works on values in tests.
impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        self.deep_eq(other)
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Undefined => f.write_str("undefined"),
            Self::Null => f.write_str("null"),
            Self::Bool(b) => write!(f, "{b}"),
            Self::Int(i) => write!(f, "{i}"),
            Self::Float(x) => write!(f, "{x}"),
            Self::Str(s) => write!(f, "{s:?}"),
            Self::Array(items) => f.write_str(&format_list(items.as_slice())),
            Self::Object(fields) => {
                f.write_str("{")?;
                for (i, (key, value)) in fields.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{key}: {value}")?;
                }
                f.write_str("}")
            }
            Self::Opaque(_) => f.write_str("<opaque>"),
        }
    }
}

impl fmt::Debug for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(self, f)
    }
}

/// Render a list of values the way failure messages show call arguments.
pub(crate) fn format_list<T: fmt::Display>(items: &[T]) -> String {
    let rendered: Vec<String> = items.iter().map(ToString::to_string).collect();
    format!("[{}]", rendered.join(", "))
}

/// Build a `Vec<Value>` argument list from heterogeneous expressions.
///
/// ```rust
/// use mockwright::{args, Value};
///
/// let list = args!["one", 123, true];
/// assert_eq!(list, vec![Value::from("one"), Value::from(123), Value::from(true)]);
/// ```
#[macro_export]
macro_rules! args {
    () => {
        ::std::vec::Vec::<$crate::Value>::new()
    };
    ($($arg:expr),+ $(,)?) => {
        ::std::vec![$($crate::Value::from($arg)),+]
    };
}

// =============================================================================
// Conversions into Value
// =============================================================================

impl From<()> for Value {
    fn from((): ()) -> Self {
        Self::Undefined
    }
}

impl From<bool> for Value {
    fn from(value: bool) -> Self {
        Self::Bool(value)
    }
}

macro_rules! from_small_int {
    ($($ty:ty),*) => {
        $(
            impl From<$ty> for Value {
                fn from(value: $ty) -> Self {
                    Self::Int(i64::from(value))
                }
            }
        )*
    };
}

from_small_int!(i8, i16, i32, i64, u8, u16, u32);

macro_rules! from_wide_int {
    ($($ty:ty),*) => {
        $(
            impl From<$ty> for Value {
                #[allow(clippy::cast_precision_loss)]
                fn from(value: $ty) -> Self {
                    i64::try_from(value).map_or(Self::Float(value as f64), Self::Int)
                }
            }
        )*
    };
}

from_wide_int!(u64, usize, isize);

impl From<f32> for Value {
    fn from(value: f32) -> Self {
        Self::Float(f64::from(value))
    }
}

impl From<f64> for Value {
    fn from(value: f64) -> Self {
        Self::Float(value)
    }
}

impl From<char> for Value {
    fn from(value: char) -> Self {
        Self::Str(value.to_string())
    }
}

impl From<&str> for Value {
    fn from(value: &str) -> Self {
        Self::Str(value.to_string())
    }
}

impl From<String> for Value {
    fn from(value: String) -> Self {
        Self::Str(value)
    }
}

impl From<&String> for Value {
    fn from(value: &String) -> Self {
        Self::Str(value.clone())
    }
}

impl From<&Value> for Value {
    fn from(value: &Value) -> Self {
        value.clone()
    }
}

impl<T: Into<Value>> From<Vec<T>> for Value {
    fn from(items: Vec<T>) -> Self {
        Self::array(items)
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(value: Option<T>) -> Self {
        value.map_or(Self::Null, Into::into)
    }
}

#[cfg(feature = "json")]
impl From<serde_json::Value> for Value {
    fn from(value: serde_json::Value) -> Self {
        match value {
            serde_json::Value::Null => Self::Null,
            serde_json::Value::Bool(b) => Self::Bool(b),
            serde_json::Value::Number(n) => n
                .as_i64()
                .map_or_else(|| Self::Float(n.as_f64().unwrap_or(f64::NAN)), Self::Int),
            serde_json::Value::String(s) => Self::Str(s),
            serde_json::Value::Array(items) => Self::array(items),
            serde_json::Value::Object(fields) => Self::object(fields),
        }
    }
}

// =============================================================================
// Conversions out of Value
// =============================================================================

/// Conversion from a [`Value`] returned by a mock into a concrete Rust type.
///
/// Used by interfaces generated with `#[mockable]` to turn the recorded
/// member's return value into the trait method's return type.
pub trait FromValue: Sized {
    /// Convert the value, failing with [`Error::TypeMismatch`] when the
    /// value has the wrong shape.
    ///
    /// # Errors
    ///
    /// Returns [`Error::TypeMismatch`] if the value cannot be represented as `Self`.
    fn from_value(value: Value) -> Result<Self>;
}

fn mismatch<T>(expected: &'static str, value: &Value) -> Result<T> {
    Err(Error::TypeMismatch {
        expected,
        actual: value.to_string(),
    })
}

impl FromValue for Value {
    fn from_value(value: Value) -> Result<Self> {
        Ok(value)
    }
}

impl FromValue for () {
    fn from_value(_value: Value) -> Result<Self> {
        Ok(())
    }
}

impl FromValue for bool {
    fn from_value(value: Value) -> Result<Self> {
        match value {
            Value::Bool(b) => Ok(b),
            other => mismatch("boolean", &other),
        }
    }
}

macro_rules! from_value_int {
    ($($ty:ty),*) => {
        $(
            impl FromValue for $ty {
                fn from_value(value: Value) -> Result<Self> {
                    match value {
                        Value::Int(i) => <$ty>::try_from(i).or_else(|_| mismatch(stringify!($ty), &value)),
                        other => mismatch(stringify!($ty), &other),
                    }
                }
            }
        )*
    };
}

from_value_int!(i8, i16, i32, i64, u8, u16, u32, u64, usize, isize);

impl FromValue for f64 {
    fn from_value(value: Value) -> Result<Self> {
        value.as_f64().map_or_else(|| mismatch("number", &value), Ok)
    }
}

impl FromValue for String {
    fn from_value(value: Value) -> Result<Self> {
        match value {
            Value::Str(s) => Ok(s),
            other => mismatch("string", &other),
        }
    }
}

impl<T: FromValue> FromValue for Option<T> {
    fn from_value(value: Value) -> Result<Self> {
        match value {
            Value::Undefined | Value::Null => Ok(None),
            other => T::from_value(other).map(Some),
        }
    }
}

impl<T: FromValue> FromValue for Vec<T> {
    fn from_value(value: Value) -> Result<Self> {
        match value {
            Value::Array(items) => items.iter().cloned().map(T::from_value).collect(),
            other => mismatch("array", &other),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_primitive_equality() {
        assert!(Value::from(1).strict_eq(&Value::from(1)));
        assert!(Value::from(2).strict_eq(&Value::from(2.0)));
        assert!(Value::from("a").strict_eq(&Value::from("a")));
        assert!(!Value::from("a").strict_eq(&Value::from(1)));
        assert!(!Value::from(f64::NAN).strict_eq(&Value::from(f64::NAN)));
        assert!(Value::Undefined.strict_eq(&Value::Undefined));
        assert!(!Value::Undefined.strict_eq(&Value::Null));
    }

    #[test]
    fn test_compound_strict_is_by_reference() {
        let a = Value::array([1, 2]);
        let b = Value::array([1, 2]);
        assert!(!a.strict_eq(&b));
        assert!(a.strict_eq(&a.clone()));
        assert!(a.deep_eq(&b));
    }

    #[test]
    fn test_object_deep_equality() {
        let a = Value::object([("x", Value::from(1)), ("y", Value::array(["z"]))]);
        let b = Value::object([("y", Value::array(["z"])), ("x", Value::from(1))]);
        let c = Value::object([("x", Value::from(2)), ("y", Value::array(["z"]))]);
        assert!(a.deep_eq(&b));
        assert!(!a.deep_eq(&c));
        assert!(!a.strict_eq(&b));
    }

    #[test]
    fn test_opaque_compares_by_reference() {
        let a = Value::opaque(5_u8);
        let b = Value::opaque(5_u8);
        assert!(!a.deep_eq(&b));
        assert!(a.deep_eq(&a.clone()));
        assert_eq!(a.downcast_ref::<u8>(), Some(&5));
    }

    #[test]
    fn test_display() {
        assert_eq!(Value::Undefined.to_string(), "undefined");
        assert_eq!(Value::Null.to_string(), "null");
        assert_eq!(Value::from("one").to_string(), "\"one\"");
        assert_eq!(Value::from(1.5).to_string(), "1.5");
        assert_eq!(
            Value::array([Value::from("a"), Value::from(1), Value::Null]).to_string(),
            "[\"a\", 1, null]"
        );
        assert_eq!(format_list(args!["one", 123, true].as_slice()), "[\"one\", 123, true]");
        assert_eq!(format_list::<Value>(&[]), "[]");
    }

    #[test]
    fn test_from_option_and_unit() {
        assert!(Value::from(None::<i32>).strict_eq(&Value::Null));
        assert!(Value::from(Some(3)).strict_eq(&Value::Int(3)));
        assert!(Value::from(()).is_undefined());
    }

    #[test]
    fn test_from_value() {
        assert_eq!(i32::from_value(Value::from(7)).unwrap(), 7);
        assert_eq!(String::from_value(Value::from("s")).unwrap(), "s");
        assert_eq!(Option::<bool>::from_value(Value::Undefined).unwrap(), None);
        assert_eq!(
            Vec::<i64>::from_value(Value::array([1, 2])).unwrap(),
            vec![1, 2]
        );
        let err = u8::from_value(Value::from(300)).unwrap_err();
        assert!(matches!(err, Error::TypeMismatch { expected: "u8", .. }));
        assert!(bool::from_value(Value::from("true")).is_err());
    }

    #[cfg(feature = "json")]
    #[test]
    fn test_from_json() {
        let value = Value::from(serde_json::json!({"a": [1, 2.5, "x"], "b": null}));
        let expected = Value::object([
            ("a", Value::array([Value::from(1), Value::from(2.5), Value::from("x")])),
            ("b", Value::Null),
        ]);
        assert_eq!(value, expected);
    }
}
