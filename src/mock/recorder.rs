//! Append-only call logs.
//!
//! Every member mock owns one [`CallRecorder`]. Recorders share a
//! [`SequenceSource`] with the rest of their container so recorded calls
//! can be ordered across members.
//!
//! # Example
//!
//! ```rust
//! use mockwright::mock::{CallRecorder, SequenceSource};
//! use mockwright::args;
//!
//! let recorder = CallRecorder::new(SequenceSource::new());
//! recorder.record(args!["a", 1]);
//! recorder.record(args!["b", 2]);
//!
//! assert_eq!(recorder.call_count(), 2);
//! assert_eq!(recorder.last_call().unwrap().arguments, args!["b", 2]);
//! ```

use std::fmt::Debug;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use parking_lot::Mutex;

use crate::assertions::matcher::{matches_all, Equality, Parameter};
use crate::value::Value;

/// A record of a single call.
#[derive(Debug, Clone, PartialEq)]
pub struct RecordedCall {
    /// The arguments passed to the call.
    pub arguments: Vec<Value>,
    /// Position of the call in the container-wide call order.
    pub sequence: u64,
}

/// Monotonic counter shared by the recorders of one container.
#[derive(Debug, Clone, Default)]
pub struct SequenceSource(Arc<AtomicU64>);

impl SequenceSource {
    /// Create a counter starting at zero.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn next(&self) -> u64 {
        self.0.fetch_add(1, Ordering::SeqCst)
    }
}

/// Ordered log of the calls made to one member.
///
/// Calls are never removed; a fresh container starts with fresh recorders.
pub struct CallRecorder {
    calls: Mutex<Vec<RecordedCall>>,
    sequence: SequenceSource,
}

impl CallRecorder {
    /// Create an empty recorder drawing sequence numbers from `sequence`.
    #[must_use]
    pub fn new(sequence: SequenceSource) -> Self {
        Self {
            calls: Mutex::new(Vec::new()),
            sequence,
        }
    }

    /// Record a call with the given arguments.
    pub fn record(&self, arguments: Vec<Value>) {
        let mut calls = self.calls.lock();
        let sequence = self.sequence.next();
        calls.push(RecordedCall {
            arguments,
            sequence,
        });
    }

    /// Get all recorded calls in insertion order.
    #[must_use]
    pub fn all_calls(&self) -> Vec<RecordedCall> {
        self.calls.lock().clone()
    }

    /// Get the calls whose arguments match every position of `patterns`.
    ///
    /// With no patterns every call matches.
    #[must_use]
    pub fn matching_calls(
        &self,
        patterns: Option<&[Parameter]>,
        equality: Equality,
    ) -> Vec<RecordedCall> {
        let calls = self.calls.lock();
        match patterns {
            None => calls.clone(),
            Some(patterns) => calls
                .iter()
                .filter(|call| matches_all(&call.arguments, patterns, equality))
                .cloned()
                .collect(),
        }
    }

    /// Get the number of recorded calls.
    #[must_use]
    pub fn call_count(&self) -> usize {
        self.calls.lock().len()
    }

    /// Get the Nth call (0-indexed).
    #[must_use]
    pub fn nth_call(&self, n: usize) -> Option<RecordedCall> {
        self.calls.lock().get(n).cloned()
    }

    /// Get the most recent call.
    #[must_use]
    pub fn last_call(&self) -> Option<RecordedCall> {
        self.calls.lock().last().cloned()
    }
}

impl Debug for CallRecorder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let calls = self.calls.lock();
        f.debug_struct("CallRecorder")
            .field("call_count", &calls.len())
            .field("calls", &*calls)
            .finish()
    }
}
