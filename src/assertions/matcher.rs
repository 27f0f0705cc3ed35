// Allow must_use_candidate for matcher factory functions since returning the matcher
// without using it is the common pattern for test setup
#![allow(clippy::must_use_candidate)]

//! Parameter matching for call verification.
//!
//! A verifier narrows recorded calls with a list of [`Parameter`]s, one per
//! argument position. Each parameter is one of:
//!
//! - a plain [`Value`], compared with the verifier's [`Equality`] mode,
//! - a [`ParameterMatcher`] such as [`gt`] or [`contains_str`],
//! - a bare predicate built with [`pred`].
//!
//! # Example
//!
//! ```rust
//! use mockwright::assertions::matcher::{gt, matches_all, pred, Equality};
//! use mockwright::{args, params};
//!
//! let call = args!["one", 123, true];
//! let pattern = params!["one", gt(100), pred(|v| v.as_bool() == Some(true))];
//!
//! assert!(matches_all(&call, &pattern, Equality::Strict));
//! ```

use std::cmp::Ordering;
use std::fmt;
use std::sync::Arc;

use crate::value::Value;

/// How plain values in a parameter list are compared with arguments.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Equality {
    /// Primitives by value, arrays and objects by reference.
    #[default]
    Strict,
    /// Recursive structural comparison.
    Deep,
}

impl Equality {
    /// Compare two values in this mode.
    #[must_use]
    pub fn compare(self, actual: &Value, expected: &Value) -> bool {
        match self {
            Self::Strict => actual.strict_eq(expected),
            Self::Deep => actual.deep_eq(expected),
        }
    }
}

/// A matcher for a single argument.
///
/// # Implementing Custom Matchers
///
/// ```rust
/// use mockwright::assertions::matcher::ParameterMatcher;
/// use mockwright::Value;
///
/// struct IsEven;
///
/// impl ParameterMatcher for IsEven {
///     fn matches(&self, value: &Value) -> bool {
///         value.as_i64().is_some_and(|i| i % 2 == 0)
///     }
///
///     fn describe(&self) -> String {
///         "is even".to_string()
///     }
/// }
///
/// assert!(IsEven.matches(&Value::from(4)));
/// assert!(!IsEven.matches(&Value::from(3)));
/// ```
pub trait ParameterMatcher: Send + Sync {
    /// Check if the value matches.
    fn matches(&self, value: &Value) -> bool;

    /// Describe what this matcher expects. Shown in failure messages in
    /// place of the parameter.
    fn describe(&self) -> String;
}

impl ParameterMatcher for Box<dyn ParameterMatcher> {
    fn matches(&self, value: &Value) -> bool {
        (**self).matches(value)
    }

    fn describe(&self) -> String {
        (**self).describe()
    }
}

type PredicateFn = dyn Fn(&Value) -> bool + Send + Sync;

/// Expected pattern for one argument position.
#[derive(Clone)]
pub enum Parameter {
    /// Literal value compared with the active [`Equality`].
    Value(Value),
    /// Custom matcher object.
    Matcher(Arc<dyn ParameterMatcher>),
    /// Plain predicate.
    Predicate(Arc<PredicateFn>),
}

impl Parameter {
    /// Wrap a matcher object.
    pub fn matcher<M: ParameterMatcher + 'static>(matcher: M) -> Self {
        Self::Matcher(Arc::new(matcher))
    }

    /// Wrap a predicate.
    pub fn predicate<F>(predicate: F) -> Self
    where
        F: Fn(&Value) -> bool + Send + Sync + 'static,
    {
        Self::Predicate(Arc::new(predicate))
    }

    /// Decide whether `actual` satisfies this parameter.
    #[must_use]
    pub fn matches(&self, actual: &Value, equality: Equality) -> bool {
        match self {
            Self::Value(expected) => equality.compare(actual, expected),
            Self::Matcher(matcher) => matcher.matches(actual),
            Self::Predicate(predicate) => predicate(actual),
        }
    }
}

impl fmt::Display for Parameter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Value(value) => write!(f, "{value}"),
            Self::Matcher(matcher) => f.write_str(&matcher.describe()),
            Self::Predicate(_) => f.write_str("<predicate>"),
        }
    }
}

impl fmt::Debug for Parameter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(self, f)
    }
}

/// Returns `true` when every pattern position matches the argument at the
/// same position.
///
/// Arguments beyond the pattern's length are not constrained. A call with
/// fewer arguments than the pattern never matches.
#[must_use]
pub fn matches_all(arguments: &[Value], patterns: &[Parameter], equality: Equality) -> bool {
    patterns.len() <= arguments.len()
        && patterns
            .iter()
            .zip(arguments)
            .all(|(pattern, actual)| pattern.matches(actual, equality))
}

/// Build a `Vec<Parameter>` from values, matchers and predicates.
///
/// ```rust
/// use mockwright::assertions::matcher::any;
/// use mockwright::params;
///
/// let pattern = params!["id", any()];
/// assert_eq!(pattern.len(), 2);
/// ```
#[macro_export]
macro_rules! params {
    () => {
        ::std::vec::Vec::<$crate::assertions::matcher::Parameter>::new()
    };
    ($($param:expr),+ $(,)?) => {
        ::std::vec![$($crate::assertions::matcher::Parameter::from($param)),+]
    };
}

macro_rules! parameter_from_value {
    ($($ty:ty),*) => {
        $(
            impl From<$ty> for Parameter {
                fn from(value: $ty) -> Self {
                    Self::Value(Value::from(value))
                }
            }
        )*
    };
}

parameter_from_value!(
    (),
    bool,
    i8,
    i16,
    i32,
    i64,
    u8,
    u16,
    u32,
    u64,
    usize,
    isize,
    f32,
    f64,
    char,
    &str,
    String,
    &String,
    &Value
);

impl From<Value> for Parameter {
    fn from(value: Value) -> Self {
        Self::Value(value)
    }
}

impl<T: Into<Value>> From<Vec<T>> for Parameter {
    fn from(items: Vec<T>) -> Self {
        Self::Value(Value::from(items))
    }
}

impl<T: Into<Value>> From<Option<T>> for Parameter {
    fn from(value: Option<T>) -> Self {
        Self::Value(Value::from(value))
    }
}

impl From<Box<dyn ParameterMatcher>> for Parameter {
    fn from(matcher: Box<dyn ParameterMatcher>) -> Self {
        Self::Matcher(Arc::from(matcher))
    }
}

macro_rules! parameter_from_matcher {
    ($($ty:ty),*) => {
        $(
            impl From<$ty> for Parameter {
                fn from(matcher: $ty) -> Self {
                    Self::matcher(matcher)
                }
            }
        )*
    };
}

parameter_from_matcher!(
    AnyMatcher,
    EqMatcher,
    CompareMatcher,
    StrMatcher,
    HasLengthMatcher,
    IsTypeMatcher,
    ContainsMatcher,
    AllOfMatcher,
    AnyOfMatcher,
    NotMatcher
);

impl<F> From<PredicateMatcher<F>> for Parameter
where
    F: Fn(&Value) -> bool + Send + Sync + 'static,
{
    fn from(matcher: PredicateMatcher<F>) -> Self {
        Self::matcher(matcher)
    }
}

// =============================================================================
// Built-in Matchers
// =============================================================================

/// Create a bare predicate parameter. Shown as `<predicate>` in messages;
/// use [`satisfies`] to give it a description.
pub fn pred<F>(predicate: F) -> Parameter
where
    F: Fn(&Value) -> bool + Send + Sync + 'static,
{
    Parameter::predicate(predicate)
}

/// Create a matcher that accepts any argument.
pub fn any() -> AnyMatcher {
    AnyMatcher
}

/// Matcher that matches anything.
#[derive(Debug, Clone, Copy)]
pub struct AnyMatcher;

impl ParameterMatcher for AnyMatcher {
    fn matches(&self, _value: &Value) -> bool {
        true
    }

    fn describe(&self) -> String {
        "anything".to_string()
    }
}

/// Create a strict equality matcher.
///
/// # Example
///
/// ```rust
/// use mockwright::assertions::matcher::{eq, ParameterMatcher};
/// use mockwright::Value;
///
/// let m = eq(42);
/// assert!(m.matches(&Value::from(42)));
/// assert!(!m.matches(&Value::from(0)));
/// ```
pub fn eq(expected: impl Into<Value>) -> EqMatcher {
    EqMatcher {
        expected: expected.into(),
        equality: Equality::Strict,
    }
}

/// Create a deep equality matcher, regardless of the verifier's mode.
///
/// ```rust
/// use mockwright::assertions::matcher::{deep_eq, ParameterMatcher};
/// use mockwright::Value;
///
/// let m = deep_eq(Value::array([1, 2]));
/// assert!(m.matches(&Value::array([1, 2])));
/// ```
pub fn deep_eq(expected: impl Into<Value>) -> EqMatcher {
    EqMatcher {
        expected: expected.into(),
        equality: Equality::Deep,
    }
}

/// Matcher for equality.
#[derive(Debug, Clone)]
pub struct EqMatcher {
    expected: Value,
    equality: Equality,
}

impl ParameterMatcher for EqMatcher {
    fn matches(&self, value: &Value) -> bool {
        self.equality.compare(value, &self.expected)
    }

    fn describe(&self) -> String {
        format!("equals {}", self.expected)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Comparison {
    Gt,
    Gte,
    Lt,
    Lte,
}

impl Comparison {
    fn accepts(self, ordering: Ordering) -> bool {
        match self {
            Self::Gt => ordering == Ordering::Greater,
            Self::Gte => ordering != Ordering::Less,
            Self::Lt => ordering == Ordering::Less,
            Self::Lte => ordering != Ordering::Greater,
        }
    }

    fn phrase(self) -> &'static str {
        match self {
            Self::Gt => "greater than",
            Self::Gte => "greater than or equal to",
            Self::Lt => "less than",
            Self::Lte => "less than or equal to",
        }
    }
}

fn compare(actual: &Value, threshold: &Value) -> Option<Ordering> {
    match (actual, threshold) {
        (Value::Str(a), Value::Str(b)) => Some(a.cmp(b)),
        _ => actual.as_f64()?.partial_cmp(&threshold.as_f64()?),
    }
}

fn comparison(threshold: impl Into<Value>, op: Comparison) -> CompareMatcher {
    CompareMatcher {
        threshold: threshold.into(),
        op,
    }
}

/// Create a greater-than matcher. Numbers compare numerically, strings
/// lexicographically; anything else never matches.
///
/// ```rust
/// use mockwright::assertions::matcher::{gt, ParameterMatcher};
/// use mockwright::Value;
///
/// let m = gt(10);
/// assert!(m.matches(&Value::from(20)));
/// assert!(!m.matches(&Value::from(5)));
/// assert!(!m.matches(&Value::from("20")));
/// ```
pub fn gt(threshold: impl Into<Value>) -> CompareMatcher {
    comparison(threshold, Comparison::Gt)
}

/// Create a greater-than-or-equal matcher.
pub fn gte(threshold: impl Into<Value>) -> CompareMatcher {
    comparison(threshold, Comparison::Gte)
}

/// Create a less-than matcher.
pub fn lt(threshold: impl Into<Value>) -> CompareMatcher {
    comparison(threshold, Comparison::Lt)
}

/// Create a less-than-or-equal matcher.
pub fn lte(threshold: impl Into<Value>) -> CompareMatcher {
    comparison(threshold, Comparison::Lte)
}

/// Matcher for ordered comparison.
#[derive(Debug, Clone)]
pub struct CompareMatcher {
    threshold: Value,
    op: Comparison,
}

impl ParameterMatcher for CompareMatcher {
    fn matches(&self, value: &Value) -> bool {
        compare(value, &self.threshold).is_some_and(|ordering| self.op.accepts(ordering))
    }

    fn describe(&self) -> String {
        format!("is {} {}", self.op.phrase(), self.threshold)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum StrOp {
    Contains,
    StartsWith,
    EndsWith,
}

/// Create a substring matcher for string arguments.
///
/// ```rust
/// use mockwright::assertions::matcher::{contains_str, ParameterMatcher};
/// use mockwright::Value;
///
/// let m = contains_str("world");
/// assert!(m.matches(&Value::from("hello world")));
/// assert!(!m.matches(&Value::from("hello")));
/// ```
pub fn contains_str(substring: &str) -> StrMatcher {
    StrMatcher {
        needle: substring.to_string(),
        op: StrOp::Contains,
    }
}

/// Create a prefix matcher for string arguments.
pub fn starts_with(prefix: &str) -> StrMatcher {
    StrMatcher {
        needle: prefix.to_string(),
        op: StrOp::StartsWith,
    }
}

/// Create a suffix matcher for string arguments.
pub fn ends_with(suffix: &str) -> StrMatcher {
    StrMatcher {
        needle: suffix.to_string(),
        op: StrOp::EndsWith,
    }
}

/// Matcher for string contents.
#[derive(Debug, Clone)]
pub struct StrMatcher {
    needle: String,
    op: StrOp,
}

impl StrMatcher {
    fn verb(&self) -> &'static str {
        match self.op {
            StrOp::Contains => "contains",
            StrOp::StartsWith => "starts with",
            StrOp::EndsWith => "ends with",
        }
    }
}

impl ParameterMatcher for StrMatcher {
    fn matches(&self, value: &Value) -> bool {
        value.as_str().is_some_and(|s| match self.op {
            StrOp::Contains => s.contains(&self.needle),
            StrOp::StartsWith => s.starts_with(&self.needle),
            StrOp::EndsWith => s.ends_with(&self.needle),
        })
    }

    fn describe(&self) -> String {
        format!("{} {:?}", self.verb(), self.needle)
    }
}

/// Create a length matcher for arrays and strings.
///
/// ```rust
/// use mockwright::assertions::matcher::{has_length, ParameterMatcher};
/// use mockwright::Value;
///
/// let m = has_length(3);
/// assert!(m.matches(&Value::array([1, 2, 3])));
/// assert!(m.matches(&Value::from("abc")));
/// assert!(!m.matches(&Value::array([1, 2])));
/// ```
pub fn has_length(length: usize) -> HasLengthMatcher {
    HasLengthMatcher { length }
}

/// Matcher for collection length.
#[derive(Debug, Clone, Copy)]
pub struct HasLengthMatcher {
    length: usize,
}

impl ParameterMatcher for HasLengthMatcher {
    fn matches(&self, value: &Value) -> bool {
        match value {
            Value::Array(items) => items.len() == self.length,
            Value::Str(s) => s.chars().count() == self.length,
            Value::Object(fields) => fields.len() == self.length,
            _ => false,
        }
    }

    fn describe(&self) -> String {
        format!("has length {}", self.length)
    }
}

/// Create a matcher on [`Value::type_name`].
///
/// ```rust
/// use mockwright::assertions::matcher::{is_type, ParameterMatcher};
/// use mockwright::Value;
///
/// assert!(is_type("number").matches(&Value::from(1.5)));
/// assert!(!is_type("number").matches(&Value::from("1.5")));
/// ```
pub fn is_type(type_name: &'static str) -> IsTypeMatcher {
    IsTypeMatcher { type_name }
}

/// Matcher for the dynamic type of an argument.
#[derive(Debug, Clone, Copy)]
pub struct IsTypeMatcher {
    type_name: &'static str,
}

impl ParameterMatcher for IsTypeMatcher {
    fn matches(&self, value: &Value) -> bool {
        value.type_name() == self.type_name
    }

    fn describe(&self) -> String {
        format!("is {}", self.type_name)
    }
}

/// Create a matcher for arrays containing a deeply equal element.
pub fn contains(element: impl Into<Value>) -> ContainsMatcher {
    ContainsMatcher {
        element: element.into(),
    }
}

/// Matcher for array contains element.
#[derive(Debug, Clone)]
pub struct ContainsMatcher {
    element: Value,
}

impl ParameterMatcher for ContainsMatcher {
    fn matches(&self, value: &Value) -> bool {
        value
            .as_array()
            .is_some_and(|items| items.iter().any(|item| item.deep_eq(&self.element)))
    }

    fn describe(&self) -> String {
        format!("contains {}", self.element)
    }
}

/// Create a predicate-based matcher with a description.
///
/// ```rust
/// use mockwright::assertions::matcher::{satisfies, ParameterMatcher};
/// use mockwright::Value;
///
/// let m = satisfies(|v| v.as_i64().is_some_and(|i| i % 2 == 0), "is even");
/// assert!(m.matches(&Value::from(4)));
/// assert_eq!(m.describe(), "is even");
/// ```
pub fn satisfies<F>(predicate: F, description: &str) -> PredicateMatcher<F>
where
    F: Fn(&Value) -> bool + Send + Sync,
{
    PredicateMatcher {
        predicate,
        description: description.to_string(),
    }
}

/// Matcher based on a predicate function.
pub struct PredicateMatcher<F> {
    predicate: F,
    description: String,
}

impl<F: Fn(&Value) -> bool + Send + Sync> ParameterMatcher for PredicateMatcher<F> {
    fn matches(&self, value: &Value) -> bool {
        (self.predicate)(value)
    }

    fn describe(&self) -> String {
        self.description.clone()
    }
}

// =============================================================================
// Combinators
// =============================================================================

/// Box a matcher for use in [`all_of`] and [`any_of`].
pub fn boxed<M: ParameterMatcher + 'static>(matcher: M) -> Box<dyn ParameterMatcher> {
    Box::new(matcher)
}

/// Create a matcher that matches when all matchers match.
///
/// ```rust
/// use mockwright::assertions::matcher::{all_of, boxed, gt, lt, ParameterMatcher};
/// use mockwright::Value;
///
/// let m = all_of(vec![boxed(gt(0)), boxed(lt(100))]);
/// assert!(m.matches(&Value::from(50)));
/// assert!(!m.matches(&Value::from(100)));
/// ```
pub fn all_of(matchers: Vec<Box<dyn ParameterMatcher>>) -> AllOfMatcher {
    AllOfMatcher { matchers }
}

/// Matcher that requires all inner matchers to match.
pub struct AllOfMatcher {
    matchers: Vec<Box<dyn ParameterMatcher>>,
}

impl ParameterMatcher for AllOfMatcher {
    fn matches(&self, value: &Value) -> bool {
        self.matchers.iter().all(|m| m.matches(value))
    }

    fn describe(&self) -> String {
        let descriptions: Vec<_> = self.matchers.iter().map(|m| m.describe()).collect();
        format!("all of [{}]", descriptions.join(", "))
    }
}

/// Create a matcher that matches when any matcher matches.
pub fn any_of(matchers: Vec<Box<dyn ParameterMatcher>>) -> AnyOfMatcher {
    AnyOfMatcher { matchers }
}

/// Matcher that requires at least one inner matcher to match.
pub struct AnyOfMatcher {
    matchers: Vec<Box<dyn ParameterMatcher>>,
}

impl ParameterMatcher for AnyOfMatcher {
    fn matches(&self, value: &Value) -> bool {
        self.matchers.iter().any(|m| m.matches(value))
    }

    fn describe(&self) -> String {
        let descriptions: Vec<_> = self.matchers.iter().map(|m| m.describe()).collect();
        format!("any of [{}]", descriptions.join(", "))
    }
}

/// Create a negating matcher.
pub fn not<M: ParameterMatcher + 'static>(matcher: M) -> NotMatcher {
    NotMatcher {
        inner: Box::new(matcher),
    }
}

/// Matcher that negates another matcher.
pub struct NotMatcher {
    inner: Box<dyn ParameterMatcher>,
}

impl ParameterMatcher for NotMatcher {
    fn matches(&self, value: &Value) -> bool {
        !self.inner.matches(value)
    }

    fn describe(&self) -> String {
        format!("not {}", self.inner.describe())
    }
}
