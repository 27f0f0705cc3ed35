//! Call count assertions over a member's recorded calls.
//!
//! A [`CallVerifier`] is obtained from [`Mock::with_function`] and friends.
//! It is immutable: every narrowing step returns a new verifier, so one
//! assertion never influences another.
//!
//! ```text
//! unfiltered ──with_parameters──────────▶ filtered ──strict──▶ filtered + strict
//!            ──with_parameters_equal_to─▶
//! ```
//!
//! Terminal operations ([`was_called`](CallVerifier::was_called),
//! [`was_called_times`](CallVerifier::was_called_times),
//! [`was_called_once`](CallVerifier::was_called_once),
//! [`was_not_called`](CallVerifier::was_not_called)) return
//! [`Error::AssertionFailed`] with a readable message when the expectation
//! does not hold.
//!
//! [`Mock::with_function`]: crate::mock::Mock::with_function

use std::sync::Arc;

use crate::assertions::matcher::{matches_all, Equality, Parameter};
use crate::error::{Error, Result};
use crate::mock::{MemberMock, RecordedCall};
use crate::value::format_list;

/// Query and assertion builder over one member's call log.
#[derive(Clone)]
pub struct CallVerifier {
    member: Arc<MemberMock>,
    patterns: Option<Arc<[Parameter]>>,
    equality: Equality,
    strict: bool,
}

impl CallVerifier {
    pub(crate) fn new(member: Arc<MemberMock>) -> Self {
        Self {
            member,
            patterns: None,
            equality: Equality::Strict,
            strict: false,
        }
    }

    /// Only count calls whose arguments match `parameters`, comparing plain
    /// values by identity (arrays and objects must be the same instance).
    #[must_use]
    pub fn with_parameters<I>(&self, parameters: I) -> Self
    where
        I: IntoIterator,
        I::Item: Into<Parameter>,
    {
        self.filtered(parameters, Equality::Strict)
    }

    /// Only count calls whose arguments match `parameters`, comparing plain
    /// values structurally.
    #[must_use]
    pub fn with_parameters_equal_to<I>(&self, parameters: I) -> Self
    where
        I: IntoIterator,
        I::Item: Into<Parameter>,
    {
        self.filtered(parameters, Equality::Deep)
    }

    fn filtered<I>(&self, parameters: I, equality: Equality) -> Self
    where
        I: IntoIterator,
        I::Item: Into<Parameter>,
    {
        Self {
            patterns: Some(parameters.into_iter().map(Into::<Parameter>::into).collect()),
            equality,
            ..self.clone()
        }
    }

    /// Additionally require that no call had any other parameters.
    #[must_use]
    pub fn strict(&self) -> Self {
        Self {
            strict: true,
            ..self.clone()
        }
    }

    /// All recorded calls of the member, ignoring any parameter filter.
    #[must_use]
    pub fn calls(&self) -> Vec<RecordedCall> {
        self.member.recorder().all_calls()
    }

    /// Recorded calls that pass the parameter filter.
    #[must_use]
    pub fn matching_calls(&self) -> Vec<RecordedCall> {
        self.member
            .recorder()
            .matching_calls(self.patterns.as_deref(), self.equality)
    }

    /// Matching and total counts taken from one snapshot of the call log.
    fn counts(&self) -> (usize, usize, Vec<RecordedCall>) {
        let calls = self.calls();
        let matching = match &self.patterns {
            None => calls.len(),
            Some(patterns) => calls
                .iter()
                .filter(|call| matches_all(&call.arguments, patterns, self.equality))
                .count(),
        };
        (matching, calls.len(), calls)
    }

    fn subject(&self) -> String {
        self.member.kind().subject(self.member.name())
    }

    fn params_clause(&self) -> String {
        self.patterns
            .as_deref()
            .map(|patterns| format!(" with params {}", format_list(patterns)))
            .unwrap_or_default()
    }

    fn fail(&self, message: String) -> Result<()> {
        tracing::debug!(
            member = %self.member.name(),
            kind = %self.member.kind(),
            %message,
            "verification failed"
        );
        Err(Error::AssertionFailed(message))
    }

    /// Assert the member was called at least once with matching parameters.
    /// In strict mode every call must also match.
    ///
    /// # Errors
    ///
    /// [`Error::AssertionFailed`] if no recorded call matches, or in strict
    /// mode if any call has other parameters.
    pub fn was_called(&self) -> Result<()> {
        let (matching, total, calls) = self.counts();
        if self.strict {
            if matching >= 1 && total == matching {
                return Ok(());
            }
            return self.fail(self.count_message("", matching, total, &calls));
        }
        if matching >= 1 {
            return Ok(());
        }
        self.fail(format!(
            "Expected {} to be called{} but it was not.",
            self.subject(),
            self.params_clause()
        ))
    }

    /// Assert the member was called exactly `expected` times with matching
    /// parameters. In strict mode every call must also match.
    ///
    /// # Errors
    ///
    /// [`Error::AssertionFailed`] if the counts differ.
    pub fn was_called_times(&self, expected: usize) -> Result<()> {
        let (matching, total, calls) = self.counts();
        let others = total - matching;
        if matching == expected && (!self.strict || others == 0) {
            return Ok(());
        }
        self.fail(self.count_message(
            &format!(" {expected} times"),
            matching,
            total,
            &calls,
        ))
    }

    fn count_message(
        &self,
        times: &str,
        matching: usize,
        total: usize,
        calls: &[RecordedCall],
    ) -> String {
        let mut message = format!(
            "Expected {} to be called{times}{}",
            self.subject(),
            self.params_clause()
        );
        if self.strict {
            message.push_str(" and 0 times with any other parameters");
        }
        message.push_str(&format!(
            " but it was called {matching} times with matching parameters and {total} times in total."
        ));
        for call in calls {
            message.push('\n');
            message.push_str(&format_list(call.arguments.as_slice()));
        }
        message
    }

    /// Same as `was_called_times(1)`.
    ///
    /// # Errors
    ///
    /// [`Error::AssertionFailed`] if the member was not called exactly once.
    pub fn was_called_once(&self) -> Result<()> {
        self.was_called_times(1)
    }

    /// Same as `was_called_times(0)`.
    ///
    /// # Errors
    ///
    /// [`Error::AssertionFailed`] if any matching call was recorded.
    pub fn was_not_called(&self) -> Result<()> {
        self.was_called_times(0)
    }
}

impl std::fmt::Debug for CallVerifier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CallVerifier")
            .field("member", &self.member.name())
            .field("kind", &self.member.kind())
            .field("patterns", &self.patterns)
            .field("equality", &self.equality)
            .field("strict", &self.strict)
            .finish()
    }
}

/// Panic with the failure message if a verification did not pass.
///
/// Accepts any `Result<(), mockwright::Error>`, so both configuration errors
/// and assertion failures end the test.
///
/// ```rust
/// use mockwright::mock::{setup_function, Mock};
/// use mockwright::{args, assert_verified};
///
/// let mocked = Mock::create();
/// mocked.setup([setup_function("ping")]).unwrap();
/// mocked.mock().call("ping", args![]).unwrap();
///
/// assert_verified!(mocked.with_function("ping").and_then(|v| v.was_called_once()));
/// ```
#[macro_export]
macro_rules! assert_verified {
    ($verification:expr) => {{
        let verification: $crate::Result<()> = $verification;
        if let ::std::result::Result::Err(err) = verification {
            panic!("{}", err);
        }
    }};
    ($verification:expr, $($arg:tt)+) => {{
        let verification: $crate::Result<()> = $verification;
        if let ::std::result::Result::Err(err) = verification {
            panic!("{}\n  message: {}", err, format_args!($($arg)+));
        }
    }};
}
