//! # mockwright
//!
//! > Test doubles with recorded calls and fluent verification
//!
//! **mockwright** builds mock objects and constructors from declared
//! members, records every function call and property access, and verifies
//! call counts against parameter patterns with readable failure messages.
//!
//! ## Quick Start
//!
//! ```rust
//! use mockwright::prelude::*;
//!
//! let mocked = Mock::create();
//! mocked
//!     .setup([setup_function("fetch").returning("payload")])?
//!     .setup([setup_static_property("instances", 0)])?;
//!
//! let object = mocked.mock();
//! assert_eq!(object.call("fetch", args!["/users", 3])?, Value::from("payload"));
//!
//! mocked.with_function("fetch")?.with_parameters(params!["/users", gt(1)]).was_called_once()?;
//! mocked.with_static_getter("instances")?.was_not_called()?;
//! # Ok::<(), mockwright::Error>(())
//! ```
//!
//! ## Features
//!
//! - **Mock containers** - Instance and static surfaces over one member registry
//! - **Call recording** - Every function, getter and setter use, in order
//! - **Verification** - Exact counts, strict matching and call dumps on failure
//! - **Matchers** - Predicates and composable built-in parameter matchers
//! - **Binding replacement** - Scoped patches of shared collaborators

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod assertions;
pub mod error;
pub mod mock;
pub mod replace;
pub mod value;

/// Prelude for convenient imports
///
/// ```rust
/// use mockwright::prelude::*;
/// ```
pub mod prelude {
    pub use crate::assertions::matcher::{
        all_of, any, any_of, boxed, contains, contains_str, deep_eq, ends_with, eq, gt, gte,
        has_length, is_type, lt, lte, not, pred, satisfies, starts_with, Parameter,
        ParameterMatcher,
    };
    pub use crate::assertions::CallVerifier;
    pub use crate::error::{Error, Result};
    pub use crate::mock::{
        define_property, define_static_property, setup_function, setup_property,
        setup_static_function, setup_static_property, Mock, MockConstructor, MockObject,
        MockSchema,
    };
    pub use crate::replace::{replace_binding, Binding, ReplacementScope};
    pub use crate::value::{FromValue, Value};
    pub use crate::{args, assert_verified, params, setups};
}

// Re-exports
pub use error::{Error, Result};
pub use value::{FromValue, Value};

// Re-export the interface macro when macros feature is enabled
#[cfg(feature = "macros")]
pub use mockwright_macros::mockable;
