//! Call verification.
//!
//! This module provides the assertion side of a mock:
//!
//! - [`CallVerifier`] - Builder asserting call counts for one member
//! - [`matcher`] - Parameter patterns and built-in matchers
//! - [`assert_verified!`](crate::assert_verified) - Panic on a failed verification
//!
//! # Example
//!
//! ```rust
//! use mockwright::assertions::matcher::{any, starts_with};
//! use mockwright::mock::{setup_function, Mock};
//! use mockwright::{args, params};
//!
//! let mocked = Mock::create();
//! mocked.setup([setup_function("log")])?;
//! mocked.mock().call("log", args!["info: ready", 1])?;
//! mocked.mock().call("log", args!["warn: slow", 2])?;
//!
//! mocked
//!     .with_function("log")?
//!     .with_parameters(params![starts_with("info"), any()])
//!     .was_called_once()?;
//!
//! let err = mocked
//!     .with_function("log")?
//!     .with_parameters(params![starts_with("info"), any()])
//!     .strict()
//!     .was_called_once()
//!     .unwrap_err();
//! assert!(err.to_string().contains("and 2 times in total"));
//! # Ok::<(), mockwright::Error>(())
//! ```

pub mod matcher;
mod verifier;

pub use verifier::CallVerifier;
