//! Identification of the member surface a recorder belongs to.

use std::fmt;

/// Whether a member lives on the instance or on the constructor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Scope {
    /// Member of the mock object.
    Instance,
    /// Member of the mock constructor.
    Static,
}

/// How a member is used.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Access {
    /// Function call.
    Function,
    /// Property read.
    Getter,
    /// Property write.
    Setter,
}

/// A `(scope, access)` pair. Every recorder is keyed by a member name and a
/// call kind, so instance and static members with the same name never share
/// counts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct CallKind {
    /// Instance or static.
    pub scope: Scope,
    /// Function, getter or setter.
    pub access: Access,
}

impl CallKind {
    /// Create a call kind.
    #[must_use]
    pub const fn new(scope: Scope, access: Access) -> Self {
        Self { scope, access }
    }

    /// Returns `true` for getters and setters.
    #[must_use]
    pub fn is_property(self) -> bool {
        self.access != Access::Function
    }

    /// Capitalized member category used in configuration errors.
    #[must_use]
    pub fn member_title(self) -> &'static str {
        match (self.scope, self.is_property()) {
            (Scope::Instance, false) => "Function",
            (Scope::Static, false) => "Static function",
            (Scope::Instance, true) => "Property",
            (Scope::Static, true) => "Static property",
        }
    }

    /// Name of the setup entry that configures this kind of member.
    #[must_use]
    pub fn setup_entry(self) -> &'static str {
        match (self.scope, self.is_property()) {
            (Scope::Instance, false) => "setupFunction",
            (Scope::Static, false) => "setupStaticFunction",
            (Scope::Instance, true) => "setupProperty",
            (Scope::Static, true) => "setupStaticProperty",
        }
    }

    /// `"getter "`, `"setter "` or nothing for functions.
    #[must_use]
    pub fn accessor_suffix(self) -> &'static str {
        match self.access {
            Access::Function => "",
            Access::Getter => "getter ",
            Access::Setter => "setter ",
        }
    }

    /// Subject of assertion messages, e.g. `static property "level" getter`.
    #[must_use]
    pub fn subject(self, name: &str) -> String {
        let scope = match self.scope {
            Scope::Instance => "",
            Scope::Static => "static ",
        };
        let category = if self.is_property() {
            "property"
        } else {
            "function"
        };
        format!(
            "{scope}{category} \"{name}\" {}",
            self.accessor_suffix()
        )
        .trim_end()
        .to_string()
    }
}

impl fmt::Display for CallKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let scope = match self.scope {
            Scope::Instance => "instance",
            Scope::Static => "static",
        };
        let access = match self.access {
            Access::Function => "function",
            Access::Getter => "getter",
            Access::Setter => "setter",
        };
        write!(f, "{scope} {access}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_subject() {
        assert_eq!(
            CallKind::new(Scope::Instance, Access::Function).subject("run"),
            "function \"run\""
        );
        assert_eq!(
            CallKind::new(Scope::Static, Access::Function).subject("run"),
            "static function \"run\""
        );
        assert_eq!(
            CallKind::new(Scope::Instance, Access::Getter).subject("name"),
            "property \"name\" getter"
        );
        assert_eq!(
            CallKind::new(Scope::Static, Access::Setter).subject("name"),
            "static property \"name\" setter"
        );
    }

    #[test]
    fn test_display() {
        assert_eq!(
            CallKind::new(Scope::Static, Access::Getter).to_string(),
            "static getter"
        );
    }
}
