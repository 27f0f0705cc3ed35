//! Tracked stand-ins for single members.
//!
//! A [`MemberMock`] pairs one [`CallRecorder`] with the behaviour configured
//! for a function, a property getter or a property setter. The getter and
//! setter of one property share their backing state.

use std::fmt;
use std::sync::Arc;

use parking_lot::Mutex;

use crate::mock::kind::{Access, CallKind};
use crate::mock::recorder::{CallRecorder, SequenceSource};
use crate::mock::setup::{FunctionImpl, GetterImpl, MemberSetup, SetterImpl};
use crate::value::Value;

enum PropertyState {
    Stored(Mutex<Value>),
    Accessor {
        getter: GetterImpl,
        setter: Option<SetterImpl>,
    },
}

enum Behavior {
    Function(Option<FunctionImpl>),
    Getter(Arc<PropertyState>),
    Setter(Arc<PropertyState>),
}

/// One tracked function, getter or setter.
pub struct MemberMock {
    name: String,
    kind: CallKind,
    recorder: CallRecorder,
    behavior: Behavior,
}

impl MemberMock {
    /// Build the member mocks a setup entry describes: one for a function,
    /// a getter and optionally a setter for a property.
    pub(crate) fn from_setup(setup: MemberSetup, sequence: &SequenceSource) -> Vec<MemberMock> {
        let name = setup.name().to_string();
        let scope = setup.scope();
        let member = |access, behavior| MemberMock {
            name: name.clone(),
            kind: CallKind::new(scope, access),
            recorder: CallRecorder::new(sequence.clone()),
            behavior,
        };

        match setup {
            MemberSetup::Function(function) => {
                vec![member(Access::Function, Behavior::Function(function.implementation))]
            }
            MemberSetup::Property(property) => {
                let state = Arc::new(PropertyState::Stored(Mutex::new(property.initial)));
                vec![
                    member(Access::Getter, Behavior::Getter(Arc::clone(&state))),
                    member(Access::Setter, Behavior::Setter(state)),
                ]
            }
            MemberSetup::Accessor(accessor) => {
                let has_setter = accessor.setter.is_some();
                let state = Arc::new(PropertyState::Accessor {
                    getter: accessor.getter,
                    setter: accessor.setter,
                });
                let mut members = vec![member(Access::Getter, Behavior::Getter(Arc::clone(&state)))];
                if has_setter {
                    members.push(member(Access::Setter, Behavior::Setter(state)));
                }
                members
            }
        }
    }

    /// Member name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Scope and access of this member.
    #[must_use]
    pub fn kind(&self) -> CallKind {
        self.kind
    }

    /// The call log of this member.
    #[must_use]
    pub fn recorder(&self) -> &CallRecorder {
        &self.recorder
    }

    /// Record a use of the member, then run its behaviour.
    ///
    /// Functions receive `arguments` unchanged. Getters record no arguments.
    /// Setters record and store the first argument. No lock is held while
    /// user closures run, so they may call back into the mock.
    pub(crate) fn handle(&self, arguments: Vec<Value>) -> Value {
        match &self.behavior {
            Behavior::Function(implementation) => {
                self.record(arguments.clone());
                match implementation {
                    Some(implementation) => implementation(&arguments),
                    None => Value::Undefined,
                }
            }
            Behavior::Getter(state) => {
                self.record(Vec::new());
                match state.as_ref() {
                    PropertyState::Stored(value) => value.lock().clone(),
                    PropertyState::Accessor { getter, .. } => getter(),
                }
            }
            Behavior::Setter(state) => {
                let value = arguments.into_iter().next().unwrap_or_default();
                self.record(vec![value.clone()]);
                match state.as_ref() {
                    PropertyState::Stored(stored) => *stored.lock() = value,
                    PropertyState::Accessor {
                        setter: Some(setter),
                        ..
                    } => setter(value),
                    PropertyState::Accessor { setter: None, .. } => {}
                }
                Value::Undefined
            }
        }
    }

    fn record(&self, arguments: Vec<Value>) {
        tracing::trace!(
            member = %self.name,
            kind = %self.kind,
            arguments = ?arguments,
            "recorded call"
        );
        self.recorder.record(arguments);
    }
}

impl fmt::Debug for MemberMock {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MemberMock")
            .field("name", &self.name)
            .field("kind", &self.kind)
            .field("recorder", &self.recorder)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicI64, Ordering};

    use super::*;
    use crate::args;
    use crate::mock::setup::{define_property, setup_function, setup_property};

    fn build(setup: impl Into<MemberSetup>) -> Vec<MemberMock> {
        MemberMock::from_setup(setup.into(), &SequenceSource::new())
    }

    #[test]
    fn test_function_without_implementation_returns_undefined() {
        let members = build(setup_function("run"));
        assert_eq!(members.len(), 1);

        let result = members[0].handle(args![1, "a"]);
        assert!(result.is_undefined());
        assert_eq!(members[0].recorder().all_calls()[0].arguments, args![1, "a"]);
    }

    #[test]
    fn test_function_forwards_to_implementation() {
        let members = build(setup_function("sum").implemented_by(|args| {
            Value::from(args.iter().filter_map(Value::as_i64).sum::<i64>())
        }));

        assert_eq!(members[0].handle(args![1, 2, 3]), Value::from(6));
        assert_eq!(members[0].recorder().call_count(), 1);
    }

    #[test]
    fn test_stored_property_shares_state() {
        let members = build(setup_property("name", "ada"));
        let (getter, setter) = (&members[0], &members[1]);

        assert_eq!(getter.handle(Vec::new()), Value::from("ada"));
        setter.handle(args!["grace"]);
        assert_eq!(getter.handle(Vec::new()), Value::from("grace"));

        assert_eq!(getter.recorder().call_count(), 2);
        assert_eq!(setter.recorder().all_calls()[0].arguments, args!["grace"]);
    }

    #[test]
    fn test_accessor_reevaluates_getter() {
        let source = Arc::new(AtomicI64::new(1));
        let read = Arc::clone(&source);
        let written = Arc::new(AtomicI64::new(0));
        let write = Arc::clone(&written);

        let members = build(
            define_property("level", move || Value::from(read.load(Ordering::SeqCst)))
                .with_setter(move |value| write.store(value.as_i64().unwrap_or(-1), Ordering::SeqCst)),
        );

        assert_eq!(members[0].handle(Vec::new()), Value::from(1));
        source.store(5, Ordering::SeqCst);
        assert_eq!(members[0].handle(Vec::new()), Value::from(5));

        members[1].handle(args![9]);
        assert_eq!(written.load(Ordering::SeqCst), 9);
    }

    #[test]
    fn test_setter_without_argument_records_undefined() {
        let members = build(setup_property("name", ()));
        members[1].handle(Vec::new());
        assert!(members[1].recorder().all_calls()[0].arguments[0].is_undefined());
    }
}
