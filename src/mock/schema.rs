//! Declared member surface of a mocked type.
//!
//! A schema lists the member names a mock may configure. Setting up a member
//! the schema does not declare fails immediately with
//! [`Error::UnknownMember`], which catches misspelled member names at
//! configuration time instead of at verification time.
//!
//! ```rust
//! use mockwright::mock::{setup_function, Mock, MockSchema};
//! use mockwright::Error;
//!
//! let schema = MockSchema::new().function("save").static_function("open");
//! let mocked = Mock::with_schema(schema);
//!
//! assert!(mocked.setup([setup_function("save")]).is_ok());
//! assert!(matches!(
//!     mocked.setup([setup_function("sav")]),
//!     Err(Error::UnknownMember { .. })
//! ));
//! ```

use std::collections::BTreeSet;

use crate::error::{Error, Result};
use crate::mock::kind::{CallKind, Scope};

/// Member names of the instance and static surfaces.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MockSchema {
    functions: BTreeSet<String>,
    properties: BTreeSet<String>,
    static_functions: BTreeSet<String>,
    static_properties: BTreeSet<String>,
}

impl MockSchema {
    /// Create an empty schema.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Declare an instance function.
    #[must_use]
    pub fn function(mut self, name: &str) -> Self {
        self.functions.insert(name.to_string());
        self
    }

    /// Declare several instance functions.
    #[must_use]
    pub fn functions<'a>(mut self, names: impl IntoIterator<Item = &'a str>) -> Self {
        self.functions.extend(names.into_iter().map(str::to_string));
        self
    }

    /// Declare an instance property.
    #[must_use]
    pub fn property(mut self, name: &str) -> Self {
        self.properties.insert(name.to_string());
        self
    }

    /// Declare a static function.
    #[must_use]
    pub fn static_function(mut self, name: &str) -> Self {
        self.static_functions.insert(name.to_string());
        self
    }

    /// Declare a static property.
    #[must_use]
    pub fn static_property(mut self, name: &str) -> Self {
        self.static_properties.insert(name.to_string());
        self
    }

    /// Returns `true` if the schema declares `name` for `kind`.
    #[must_use]
    pub fn declares(&self, name: &str, kind: CallKind) -> bool {
        let names = match (kind.scope, kind.is_property()) {
            (Scope::Instance, false) => &self.functions,
            (Scope::Instance, true) => &self.properties,
            (Scope::Static, false) => &self.static_functions,
            (Scope::Static, true) => &self.static_properties,
        };
        names.contains(name)
    }

    pub(crate) fn check(&self, name: &str, kind: CallKind) -> Result<()> {
        if self.declares(name, kind) {
            Ok(())
        } else {
            Err(Error::UnknownMember {
                kind,
                name: name.to_string(),
            })
        }
    }
}
