//! Error definitions
//!
//! This module provides error types for mockwright. Errors fall into two
//! disjoint kinds:
//!
//! - **configuration errors** raised as soon as a member is used or verified
//!   without a matching setup (or set up twice), and
//! - **assertion failures** raised by a verifier whose expectation is not met.

use thiserror::Error;

use crate::mock::CallKind;

/// Main error type for mockwright
#[derive(Error, Debug, Clone, PartialEq)]
pub enum Error {
    /// A verifier was requested for a member that was never set up.
    #[error(
        "{} \"{}\" has not been setup. Please setup using Mock.{}() before verifying calls.",
        .kind.member_title(),
        .name,
        .kind.setup_entry()
    )]
    SetupMissing {
        /// Kind of member that was requested.
        kind: CallKind,
        /// Member name.
        name: String,
    },

    /// The same member was set up twice in the same scope.
    #[error("{} \"{}\" has already been setup.", .kind.member_title(), .name)]
    AlreadySetup {
        /// Kind of member that was set up.
        kind: CallKind,
        /// Member name.
        name: String,
    },

    /// The member is not declared by the mock's schema.
    #[error("{} \"{}\" is not declared by the mock schema.", .kind.member_title(), .name)]
    UnknownMember {
        /// Kind of member that was set up.
        kind: CallKind,
        /// Member name.
        name: String,
    },

    /// The code under test used a member that has no mock configuration.
    #[error(
        "{} \"{}\" {}has no mock configuration.",
        .kind.member_title(),
        .name,
        .kind.accessor_suffix()
    )]
    NotConfigured {
        /// How the member was accessed.
        kind: CallKind,
        /// Member name.
        name: String,
    },

    /// A mocked member returned a value of the wrong shape.
    #[error("Expected a value of type {expected} but the mock returned {actual}.")]
    TypeMismatch {
        /// Expected type.
        expected: &'static str,
        /// Rendering of the actual value.
        actual: String,
    },

    /// Assertion failed
    #[error("{0}")]
    AssertionFailed(String),
}

impl Error {
    /// Create an assertion failure.
    #[must_use]
    pub fn assertion_failed(message: impl Into<String>) -> Self {
        Self::AssertionFailed(message.into())
    }

    /// Returns `true` for every error except [`Error::AssertionFailed`].
    #[must_use]
    pub fn is_configuration(&self) -> bool {
        !matches!(self, Self::AssertionFailed(_))
    }
}

/// Result type alias
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mock::{Access, Scope};

    #[test]
    fn test_setup_missing_messages() {
        let cases = [
            (
                CallKind::new(Scope::Instance, Access::Function),
                "Function \"run\" has not been setup. Please setup using Mock.setupFunction() before verifying calls.",
            ),
            (
                CallKind::new(Scope::Static, Access::Function),
                "Static function \"run\" has not been setup. Please setup using Mock.setupStaticFunction() before verifying calls.",
            ),
            (
                CallKind::new(Scope::Instance, Access::Setter),
                "Property \"run\" has not been setup. Please setup using Mock.setupProperty() before verifying calls.",
            ),
            (
                CallKind::new(Scope::Static, Access::Getter),
                "Static property \"run\" has not been setup. Please setup using Mock.setupStaticProperty() before verifying calls.",
            ),
        ];

        for (kind, expected) in cases {
            let err = Error::SetupMissing {
                kind,
                name: "run".to_string(),
            };
            assert_eq!(err.to_string(), expected);
            assert!(err.is_configuration());
        }
    }

    #[test]
    fn test_assertion_failed_is_bare_message() {
        let err = Error::assertion_failed("Expected it");
        assert_eq!(err.to_string(), "Expected it");
        assert!(!err.is_configuration());
    }

    #[test]
    fn test_not_configured_message() {
        let err = Error::NotConfigured {
            kind: CallKind::new(Scope::Static, Access::Setter),
            name: "level".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "Static property \"level\" setter has no mock configuration."
        );
    }
}
