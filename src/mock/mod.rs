//! Mock construction and call recording.
//!
//! This module provides the pieces a test assembles a mock from:
//!
//! - [`Mock`] - Container owning every member mock of one mocked type
//! - [`MockObject`] / [`MockConstructor`] - Instance and static proxies
//! - [`setup_function`], [`setup_property`], [`define_property`], ... - Member configuration
//! - [`CallRecorder`] - Append-only call log behind each member
//! - [`MockSchema`] - Optional declared member surface
//!
//! # Example
//!
//! ```rust
//! use mockwright::mock::{setup_function, Mock};
//! use mockwright::{args, Value};
//!
//! let mocked = Mock::create();
//! mocked.setup([setup_function("double").implemented_by(|args| {
//!     Value::from(args[0].as_i64().unwrap_or(0) * 2)
//! })])?;
//!
//! let result = mocked.mock().call("double", args![21])?;
//! assert_eq!(result, Value::from(42));
//!
//! mocked.with_function("double")?.with_parameters([21]).was_called_once()?;
//! # Ok::<(), mockwright::Error>(())
//! ```

mod container;
mod kind;
mod member;
mod recorder;
mod schema;
mod setup;

pub use container::{Mock, MockConstructor, MockObject};
pub use kind::{Access, CallKind, Scope};
pub use member::MemberMock;
pub use recorder::{CallRecorder, RecordedCall, SequenceSource};
pub use schema::MockSchema;
pub use setup::{
    define_property, define_static_property, setup_function, setup_property,
    setup_static_function, setup_static_property, AccessorSetup, FunctionImpl, FunctionSetup,
    GetterImpl, MemberSetup, PropertySetup, SetterImpl,
};
