//! The mock container and the proxies handed to code under test.
//!
//! A [`Mock`] owns a registry mapping `(member name, call kind)` to
//! [`MemberMock`]. Code under test sees the registry through two proxies:
//!
//! - [`MockObject`] for instance members, and
//! - [`MockConstructor`] for static members, whose
//!   [`construct`](MockConstructor::construct) returns the mock object.
//!
//! All three handles share the same registry, so they are cheap to clone and
//! may be moved into the system under test freely.
//!
//! # Example
//!
//! ```rust
//! use mockwright::mock::{setup_function, setup_static_function, Mock};
//! use mockwright::args;
//!
//! let mocked = Mock::create();
//! mocked.setup([setup_function("load"), setup_static_function("load")])?;
//!
//! mocked.mock().call("load", args!["a.txt"])?;
//! mocked.mock_constructor().call("load", args![])?;
//! mocked.mock_constructor().call("load", args![])?;
//!
//! mocked.with_function("load")?.was_called_once()?;
//! mocked.with_static_function("load")?.was_called_times(2)?;
//! # Ok::<(), mockwright::Error>(())
//! ```

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use parking_lot::Mutex;

use crate::assertions::CallVerifier;
use crate::error::{Error, Result};
use crate::mock::kind::{Access, CallKind, Scope};
use crate::mock::member::MemberMock;
use crate::mock::recorder::SequenceSource;
use crate::mock::schema::MockSchema;
use crate::mock::setup::MemberSetup;
use crate::value::Value;

type Registry = HashMap<(String, CallKind), Arc<MemberMock>>;

struct Shared {
    registry: Mutex<Registry>,
    schema: Option<MockSchema>,
    sequence: SequenceSource,
}

impl Shared {
    fn lookup(&self, name: &str, kind: CallKind) -> Option<Arc<MemberMock>> {
        self.registry.lock().get(&(name.to_string(), kind)).cloned()
    }

    fn dispatch(&self, name: &str, kind: CallKind, arguments: Vec<Value>) -> Result<Value> {
        // Clone the member out so the registry lock is released before user code runs.
        let member = self.lookup(name, kind).ok_or_else(|| Error::NotConfigured {
            kind,
            name: name.to_string(),
        })?;
        Ok(member.handle(arguments))
    }
}

/// Container of member mocks for one mocked type.
#[derive(Clone)]
pub struct Mock {
    shared: Arc<Shared>,
}

impl Mock {
    /// Create a mock that accepts any member name.
    #[must_use]
    pub fn create() -> Self {
        Self::build(None)
    }

    /// Create a mock whose members must be declared by `schema`.
    #[must_use]
    pub fn with_schema(schema: MockSchema) -> Self {
        Self::build(Some(schema))
    }

    fn build(schema: Option<MockSchema>) -> Self {
        Self {
            shared: Arc::new(Shared {
                registry: Mutex::new(HashMap::new()),
                schema,
                sequence: SequenceSource::new(),
            }),
        }
    }

    /// The instance-facing proxy.
    #[must_use]
    pub fn mock(&self) -> MockObject {
        MockObject {
            shared: Arc::clone(&self.shared),
        }
    }

    /// The static-facing proxy.
    #[must_use]
    pub fn mock_constructor(&self) -> MockConstructor {
        MockConstructor {
            shared: Arc::clone(&self.shared),
        }
    }

    /// Apply member configurations in order.
    ///
    /// Returns `self` so calls can be chained.
    ///
    /// # Errors
    ///
    /// - [`Error::UnknownMember`] if the schema does not declare the member.
    /// - [`Error::AlreadySetup`] if a member with the same name already
    ///   exists in the same scope. Entries before the failing one stay
    ///   applied.
    pub fn setup<I>(&self, setups: I) -> Result<&Self>
    where
        I: IntoIterator,
        I::Item: Into<MemberSetup>,
    {
        for setup in setups {
            self.apply(setup.into())?;
        }
        Ok(self)
    }

    fn apply(&self, setup: MemberSetup) -> Result<()> {
        let kinds = setup.kinds();
        let primary = kinds[0];
        if let Some(schema) = &self.shared.schema {
            schema.check(setup.name(), primary)?;
        }

        let mut registry = self.shared.registry.lock();
        let taken = [Access::Function, Access::Getter, Access::Setter]
            .into_iter()
            .map(|access| CallKind::new(primary.scope, access))
            .find(|kind| registry.contains_key(&(setup.name().to_string(), *kind)));
        if let Some(kind) = taken {
            return Err(Error::AlreadySetup {
                kind,
                name: setup.name().to_string(),
            });
        }

        tracing::debug!(member = %setup.name(), kinds = ?kinds, "member setup");
        for member in MemberMock::from_setup(setup, &self.shared.sequence) {
            registry.insert((member.name().to_string(), member.kind()), Arc::new(member));
        }
        Ok(())
    }

    /// Returns `true` if a member mock exists for `name` and `kind`.
    #[must_use]
    pub fn is_setup(&self, name: &str, kind: CallKind) -> bool {
        self.shared.lookup(name, kind).is_some()
    }

    /// All configured members, sorted by name then kind.
    #[must_use]
    pub fn members(&self) -> Vec<(String, CallKind)> {
        let mut members: Vec<_> = self.shared.registry.lock().keys().cloned().collect();
        members.sort();
        members
    }

    fn verifier(&self, name: &str, kind: CallKind) -> Result<CallVerifier> {
        if let Some(member) = self.shared.lookup(name, kind) {
            return Ok(CallVerifier::new(member));
        }
        // A read-only accessor is set up but has nothing to verify on writes.
        let getter = CallKind::new(kind.scope, Access::Getter);
        if kind.access == Access::Setter && self.shared.lookup(name, getter).is_some() {
            return Err(Error::NotConfigured {
                kind,
                name: name.to_string(),
            });
        }
        Err(Error::SetupMissing {
            kind,
            name: name.to_string(),
        })
    }

    /// Verify calls to an instance function.
    ///
    /// # Errors
    ///
    /// [`Error::SetupMissing`] if the function was never set up.
    pub fn with_function(&self, name: &str) -> Result<CallVerifier> {
        self.verifier(name, CallKind::new(Scope::Instance, Access::Function))
    }

    /// Verify calls to a static function.
    ///
    /// # Errors
    ///
    /// [`Error::SetupMissing`] if the function was never set up.
    pub fn with_static_function(&self, name: &str) -> Result<CallVerifier> {
        self.verifier(name, CallKind::new(Scope::Static, Access::Function))
    }

    /// Verify reads of an instance property.
    ///
    /// # Errors
    ///
    /// [`Error::SetupMissing`] if the property was never set up.
    pub fn with_getter(&self, name: &str) -> Result<CallVerifier> {
        self.verifier(name, CallKind::new(Scope::Instance, Access::Getter))
    }

    /// Verify reads of a static property.
    ///
    /// # Errors
    ///
    /// [`Error::SetupMissing`] if the property was never set up.
    pub fn with_static_getter(&self, name: &str) -> Result<CallVerifier> {
        self.verifier(name, CallKind::new(Scope::Static, Access::Getter))
    }

    /// Verify writes of an instance property.
    ///
    /// # Errors
    ///
    /// - [`Error::SetupMissing`] if the property was never set up.
    /// - [`Error::NotConfigured`] if the property is a read-only accessor
    ///   defined without a setter.
    pub fn with_setter(&self, name: &str) -> Result<CallVerifier> {
        self.verifier(name, CallKind::new(Scope::Instance, Access::Setter))
    }

    /// Verify writes of a static property.
    ///
    /// # Errors
    ///
    /// - [`Error::SetupMissing`] if the property was never set up.
    /// - [`Error::NotConfigured`] if the property is a read-only accessor
    ///   defined without a setter.
    pub fn with_static_setter(&self, name: &str) -> Result<CallVerifier> {
        self.verifier(name, CallKind::new(Scope::Static, Access::Setter))
    }
}

impl Default for Mock {
    fn default() -> Self {
        Self::create()
    }
}

impl fmt::Debug for Mock {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Mock")
            .field("members", &self.members())
            .field("schema", &self.shared.schema)
            .finish()
    }
}

/// Instance-facing proxy of a [`Mock`].
#[derive(Clone)]
pub struct MockObject {
    shared: Arc<Shared>,
}

impl MockObject {
    /// Call an instance function.
    ///
    /// # Errors
    ///
    /// [`Error::NotConfigured`] if the function was never set up.
    pub fn call(&self, name: &str, arguments: Vec<Value>) -> Result<Value> {
        self.shared.dispatch(
            name,
            CallKind::new(Scope::Instance, Access::Function),
            arguments,
        )
    }

    /// Read an instance property.
    ///
    /// # Errors
    ///
    /// [`Error::NotConfigured`] if the property was never set up.
    pub fn get(&self, name: &str) -> Result<Value> {
        self.shared.dispatch(
            name,
            CallKind::new(Scope::Instance, Access::Getter),
            Vec::new(),
        )
    }

    /// Write an instance property.
    ///
    /// # Errors
    ///
    /// [`Error::NotConfigured`] if the property was never set up or is
    /// read-only.
    pub fn set(&self, name: &str, value: impl Into<Value>) -> Result<()> {
        self.shared
            .dispatch(
                name,
                CallKind::new(Scope::Instance, Access::Setter),
                vec![value.into()],
            )
            .map(drop)
    }
}

impl fmt::Debug for MockObject {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MockObject").finish_non_exhaustive()
    }
}

/// Static-facing proxy of a [`Mock`].
#[derive(Clone)]
pub struct MockConstructor {
    shared: Arc<Shared>,
}

impl MockConstructor {
    /// Construct an instance. Always returns the container's mock object.
    #[must_use]
    pub fn construct(&self) -> MockObject {
        MockObject {
            shared: Arc::clone(&self.shared),
        }
    }

    /// Call a static function.
    ///
    /// # Errors
    ///
    /// [`Error::NotConfigured`] if the function was never set up.
    pub fn call(&self, name: &str, arguments: Vec<Value>) -> Result<Value> {
        self.shared.dispatch(
            name,
            CallKind::new(Scope::Static, Access::Function),
            arguments,
        )
    }

    /// Read a static property.
    ///
    /// # Errors
    ///
    /// [`Error::NotConfigured`] if the property was never set up.
    pub fn get(&self, name: &str) -> Result<Value> {
        self.shared.dispatch(
            name,
            CallKind::new(Scope::Static, Access::Getter),
            Vec::new(),
        )
    }

    /// Write a static property.
    ///
    /// # Errors
    ///
    /// [`Error::NotConfigured`] if the property was never set up or is
    /// read-only.
    pub fn set(&self, name: &str, value: impl Into<Value>) -> Result<()> {
        self.shared
            .dispatch(
                name,
                CallKind::new(Scope::Static, Access::Setter),
                vec![value.into()],
            )
            .map(drop)
    }
}

impl fmt::Debug for MockConstructor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MockConstructor").finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mock::setup::{
        define_property, define_static_property, setup_function, setup_property,
        setup_static_function, setup_static_property,
    };
    use crate::{args, setups};

    #[test]
    fn test_unconfigured_member_is_configuration_error() {
        let mocked = Mock::create();

        let err = mocked.mock().call("missing", args![]).unwrap_err();
        assert!(matches!(err, Error::NotConfigured { .. }));
        assert!(err.is_configuration());

        let err = mocked.mock_constructor().get("missing").unwrap_err();
        assert_eq!(
            err.to_string(),
            "Static property \"missing\" getter has no mock configuration."
        );
    }

    #[test]
    fn test_double_setup_is_rejected() {
        let mocked = Mock::create();
        mocked.setup([setup_function("run")]).unwrap();

        let err = mocked.setup([setup_function("run")]).unwrap_err();
        assert_eq!(err.to_string(), "Function \"run\" has already been setup.");
    }

    #[test]
    fn test_function_and_property_names_collide_within_scope() {
        let mocked = Mock::create();
        mocked.setup([setup_property("value", 1)]).unwrap();

        let err = mocked.setup([setup_function("value")]).unwrap_err();
        assert!(matches!(err, Error::AlreadySetup { .. }));

        // the static surface is separate
        mocked.setup([setup_static_function("value")]).unwrap();
    }

    #[test]
    fn test_setup_batch_applies_until_failure() {
        let mocked = Mock::create();
        let result = mocked.setup([
            setup_function("a"),
            setup_function("b"),
            setup_function("a"),
            setup_function("c"),
        ]);

        assert!(result.is_err());
        let instance_function = CallKind::new(Scope::Instance, Access::Function);
        assert!(mocked.is_setup("a", instance_function));
        assert!(mocked.is_setup("b", instance_function));
        assert!(!mocked.is_setup("c", instance_function));
    }

    #[test]
    fn test_construct_returns_shared_instance() {
        let mocked = Mock::create();
        mocked.setup([setup_function("run")]).unwrap();

        mocked.mock_constructor().construct().call("run", args![]).unwrap();
        mocked.mock().call("run", args![]).unwrap();

        assert_eq!(
            mocked.with_function("run").unwrap().calls().len(),
            2
        );
    }

    #[test]
    fn test_static_properties() {
        let mocked = Mock::create();
        mocked
            .setup([setup_static_property("count", 0)])
            .unwrap()
            .setup([define_static_property("version", || Value::from("1.0"))])
            .unwrap();

        let constructor = mocked.mock_constructor();
        constructor.set("count", 3).unwrap();
        assert_eq!(constructor.get("count").unwrap(), Value::from(3));
        assert_eq!(constructor.get("version").unwrap(), Value::from("1.0"));

        let err = constructor.set("version", "2.0").unwrap_err();
        assert!(matches!(err, Error::NotConfigured { .. }));
    }

    #[test]
    fn test_verifying_writes_of_read_only_accessor() {
        let mocked = Mock::create();
        mocked
            .setup([define_static_property("version", || Value::from("1.0"))])
            .unwrap();

        let err = mocked.with_static_setter("version").unwrap_err();
        assert_eq!(
            err.to_string(),
            "Static property \"version\" setter has no mock configuration."
        );
        assert!(matches!(
            mocked.with_static_setter("missing"),
            Err(Error::SetupMissing { .. })
        ));
    }

    #[test]
    fn test_setup_mixes_functions_and_properties() {
        let mocked = Mock::create();
        mocked
            .setup(setups![
                setup_function("save"),
                setup_static_property("count", 0),
                define_property("now", || Value::from(1)),
            ])
            .unwrap();

        assert_eq!(mocked.members().len(), 4);
        assert!(mocked.is_setup("count", CallKind::new(Scope::Static, Access::Setter)));
    }

    #[test]
    fn test_implementation_may_reenter_mock() {
        let mocked = Mock::create();
        let inner = mocked.mock();
        mocked
            .setup([
                setup_function("outer").implemented_by(move |_| {
                    inner.call("inner", args![]).unwrap_or_default()
                }),
                setup_function("inner").returning("done"),
            ])
            .unwrap();

        assert_eq!(
            mocked.mock().call("outer", args![]).unwrap(),
            Value::from("done")
        );
    }

    #[test]
    fn test_members_listing() {
        let mocked = Mock::create();
        mocked
            .setup([setup_property("b", ())])
            .unwrap()
            .setup([setup_function("a")])
            .unwrap();

        let names: Vec<_> = mocked.members().into_iter().map(|(name, _)| name).collect();
        assert_eq!(names, vec!["a", "b", "b"]);
    }
}
