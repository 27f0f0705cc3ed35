//! Member configuration entries accepted by [`Mock::setup`](crate::mock::Mock::setup).
//!
//! | Entry                       | Creates                                  |
//! |-----------------------------|------------------------------------------|
//! | [`setup_function`]          | instance function                        |
//! | [`setup_static_function`]   | static function                          |
//! | [`setup_property`]          | instance getter + setter over a value    |
//! | [`setup_static_property`]   | static getter + setter over a value      |
//! | [`define_property`]         | instance getter (+ setter) over closures |
//! | [`define_static_property`]  | static getter (+ setter) over closures   |
//!
//! Entries of one kind can be passed as an array; mixed kinds go through
//! [`setups!`](crate::setups).
//!
//! # Example
//!
//! ```rust
//! use mockwright::mock::{define_property, setup_function, setup_property, Mock};
//! use mockwright::{args, Value};
//!
//! let mocked = Mock::create();
//! mocked
//!     .setup([setup_function("greet").implemented_by(|args| {
//!         Value::from(format!("hello {}", args[0].as_str().unwrap_or("?")))
//!     })])?
//!     .setup([setup_property("name", "ada")])?
//!     .setup([define_property("now", || Value::from(42))])?;
//!
//! let object = mocked.mock();
//! assert_eq!(object.call("greet", args!["bob"])?, Value::from("hello bob"));
//! assert_eq!(object.get("name")?, Value::from("ada"));
//! assert_eq!(object.get("now")?, Value::from(42));
//! # Ok::<(), mockwright::Error>(())
//! ```

use std::fmt;
use std::sync::Arc;

use crate::mock::kind::{Access, CallKind, Scope};
use crate::value::Value;

/// Implementation of a mocked function.
pub type FunctionImpl = Arc<dyn Fn(&[Value]) -> Value + Send + Sync>;
/// Supplier behind a dynamic property read.
pub type GetterImpl = Arc<dyn Fn() -> Value + Send + Sync>;
/// Receiver of a dynamic property write.
pub type SetterImpl = Arc<dyn Fn(Value) + Send + Sync>;

/// Configuration of a mocked function.
#[derive(Clone)]
pub struct FunctionSetup {
    pub(crate) name: String,
    pub(crate) scope: Scope,
    pub(crate) implementation: Option<FunctionImpl>,
}

impl FunctionSetup {
    /// Forward calls to `implementation` and return its result. Without an
    /// implementation the function returns [`Value::Undefined`].
    #[must_use]
    pub fn implemented_by<F>(mut self, implementation: F) -> Self
    where
        F: Fn(&[Value]) -> Value + Send + Sync + 'static,
    {
        self.implementation = Some(Arc::new(implementation));
        self
    }

    /// Always return `value`.
    #[must_use]
    pub fn returning(self, value: impl Into<Value>) -> Self {
        let value = value.into();
        self.implemented_by(move |_| value.clone())
    }
}

/// Configuration of a property backed by a stored value.
#[derive(Debug, Clone)]
pub struct PropertySetup {
    pub(crate) name: String,
    pub(crate) scope: Scope,
    pub(crate) initial: Value,
}

/// Configuration of a property backed by getter and setter closures.
#[derive(Clone)]
pub struct AccessorSetup {
    pub(crate) name: String,
    pub(crate) scope: Scope,
    pub(crate) getter: GetterImpl,
    pub(crate) setter: Option<SetterImpl>,
}

impl AccessorSetup {
    /// Forward property writes to `setter`. Without a setter the property is
    /// read-only and writes are configuration errors.
    #[must_use]
    pub fn with_setter<F>(mut self, setter: F) -> Self
    where
        F: Fn(Value) + Send + Sync + 'static,
    {
        self.setter = Some(Arc::new(setter));
        self
    }
}

/// Any member configuration.
#[derive(Clone)]
pub enum MemberSetup {
    /// Function member.
    Function(FunctionSetup),
    /// Property over a stored value.
    Property(PropertySetup),
    /// Property over closures.
    Accessor(AccessorSetup),
}

impl MemberSetup {
    /// Member name.
    #[must_use]
    pub fn name(&self) -> &str {
        match self {
            Self::Function(setup) => &setup.name,
            Self::Property(setup) => &setup.name,
            Self::Accessor(setup) => &setup.name,
        }
    }

    /// Instance or static.
    #[must_use]
    pub fn scope(&self) -> Scope {
        match self {
            Self::Function(setup) => setup.scope,
            Self::Property(setup) => setup.scope,
            Self::Accessor(setup) => setup.scope,
        }
    }

    /// The call kinds this entry creates member mocks for.
    #[must_use]
    pub fn kinds(&self) -> Vec<CallKind> {
        let scope = self.scope();
        match self {
            Self::Function(_) => vec![CallKind::new(scope, Access::Function)],
            Self::Property(_) => vec![
                CallKind::new(scope, Access::Getter),
                CallKind::new(scope, Access::Setter),
            ],
            Self::Accessor(setup) if setup.setter.is_none() => {
                vec![CallKind::new(scope, Access::Getter)]
            }
            Self::Accessor(_) => vec![
                CallKind::new(scope, Access::Getter),
                CallKind::new(scope, Access::Setter),
            ],
        }
    }
}

impl From<FunctionSetup> for MemberSetup {
    fn from(setup: FunctionSetup) -> Self {
        Self::Function(setup)
    }
}

impl From<PropertySetup> for MemberSetup {
    fn from(setup: PropertySetup) -> Self {
        Self::Property(setup)
    }
}

impl From<AccessorSetup> for MemberSetup {
    fn from(setup: AccessorSetup) -> Self {
        Self::Accessor(setup)
    }
}

impl fmt::Debug for MemberSetup {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let variant = match self {
            Self::Function(_) => "Function",
            Self::Property(_) => "Property",
            Self::Accessor(_) => "Accessor",
        };
        f.debug_struct("MemberSetup")
            .field("variant", &variant)
            .field("name", &self.name())
            .field("scope", &self.scope())
            .finish()
    }
}

/// Build a `Vec<MemberSetup>` from entries of different kinds, so functions
/// and properties can be set up in one call.
///
/// ```rust
/// use mockwright::mock::{define_property, setup_function, setup_static_property, Mock};
/// use mockwright::{setups, Value};
///
/// let mocked = Mock::create();
/// mocked.setup(setups![
///     setup_function("save"),
///     setup_static_property("count", 0),
///     define_property("now", || Value::from(1)),
/// ])?;
/// # Ok::<(), mockwright::Error>(())
/// ```
#[macro_export]
macro_rules! setups {
    () => {
        ::std::vec::Vec::<$crate::mock::MemberSetup>::new()
    };
    ($($setup:expr),+ $(,)?) => {
        ::std::vec![$($crate::mock::MemberSetup::from($setup)),+]
    };
}

fn function(name: &str, scope: Scope) -> FunctionSetup {
    FunctionSetup {
        name: name.to_string(),
        scope,
        implementation: None,
    }
}

fn property(name: &str, scope: Scope, initial: Value) -> PropertySetup {
    PropertySetup {
        name: name.to_string(),
        scope,
        initial,
    }
}

fn accessor(name: &str, scope: Scope, getter: GetterImpl) -> AccessorSetup {
    AccessorSetup {
        name: name.to_string(),
        scope,
        getter,
        setter: None,
    }
}

/// Set up an instance function.
pub fn setup_function(name: &str) -> FunctionSetup {
    function(name, Scope::Instance)
}

/// Set up a static function.
pub fn setup_static_function(name: &str) -> FunctionSetup {
    function(name, Scope::Static)
}

/// Set up an instance property holding `initial`. Pass `()` for an
/// initially undefined property.
pub fn setup_property(name: &str, initial: impl Into<Value>) -> PropertySetup {
    property(name, Scope::Instance, initial.into())
}

/// Set up a static property holding `initial`.
pub fn setup_static_property(name: &str, initial: impl Into<Value>) -> PropertySetup {
    property(name, Scope::Static, initial.into())
}

/// Define an instance property whose reads call `getter` every time.
pub fn define_property<G>(name: &str, getter: G) -> AccessorSetup
where
    G: Fn() -> Value + Send + Sync + 'static,
{
    accessor(name, Scope::Instance, Arc::new(getter))
}

/// Define a static property whose reads call `getter` every time.
pub fn define_static_property<G>(name: &str, getter: G) -> AccessorSetup
where
    G: Fn() -> Value + Send + Sync + 'static,
{
    accessor(name, Scope::Static, Arc::new(getter))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_function_kinds() {
        let setup = MemberSetup::from(setup_static_function("create"));
        assert_eq!(setup.name(), "create");
        assert_eq!(setup.scope(), Scope::Static);
        assert_eq!(
            setup.kinds(),
            vec![CallKind::new(Scope::Static, Access::Function)]
        );
    }

    #[test]
    fn test_property_kinds() {
        let setup = MemberSetup::from(setup_property("name", "x"));
        assert_eq!(
            setup.kinds(),
            vec![
                CallKind::new(Scope::Instance, Access::Getter),
                CallKind::new(Scope::Instance, Access::Setter),
            ]
        );
    }

    #[test]
    fn test_accessor_without_setter_is_read_only() {
        let read_only = MemberSetup::from(define_property("now", || Value::from(1)));
        assert_eq!(read_only.kinds().len(), 1);

        let read_write = MemberSetup::from(define_property("now", || Value::from(1)).with_setter(|_| {}));
        assert_eq!(read_write.kinds().len(), 2);
    }

    #[test]
    fn test_returning() {
        let setup = setup_function("answer").returning(42);
        let implementation = setup.implementation.unwrap();
        assert_eq!(implementation(&[]), Value::from(42));
    }

    #[test]
    fn test_setups_macro_accepts_mixed_kinds() {
        let entries = crate::setups![
            setup_function("run"),
            setup_property("name", "x"),
            define_static_property("now", || Value::from(1)),
        ];
        let names: Vec<_> = entries.iter().map(MemberSetup::name).collect();
        assert_eq!(names, vec!["run", "name", "now"]);
        assert_eq!(entries[2].scope(), Scope::Static);
        assert!(crate::setups![].is_empty());
    }

    #[test]
    fn test_debug() {
        let debug = format!("{:?}", MemberSetup::from(setup_function("run")));
        assert!(debug.contains("Function"));
        assert!(debug.contains("run"));
    }
}
