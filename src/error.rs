//! Error taxonomy for the event book core.
//!
//! Every failure is local and leaves the graph exactly as it was before the
//! call. Wording here is for logs and the command layer; the core never
//! prints anything itself.

use std::fmt;

use thiserror::Error;

use crate::models::InvalidField;

/// Which kind of entity an error refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EntityKind {
    Person,
    Tag,
    EventTag,
}

impl EntityKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Person => "person",
            Self::Tag => "tag",
            Self::EventTag => "event tag",
        }
    }
}

impl fmt::Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BookError {
    /// A create/add collided with an existing identity.
    #[error("{kind} already exists: {name}")]
    DuplicateEntity { kind: EntityKind, name: String },

    /// A delete/select/get referenced an absent entity.
    #[error("{kind} not found: {name}")]
    NotFound { kind: EntityKind, name: String },

    /// An assign/filter referenced a tag name the registry does not hold.
    #[error("unknown {kind}: {name}")]
    UnknownTag { kind: EntityKind, name: String },

    #[error(transparent)]
    Invalid(#[from] InvalidField),
}

impl BookError {
    pub(crate) fn duplicate(kind: EntityKind, name: impl Into<String>) -> Self {
        Self::DuplicateEntity {
            kind,
            name: name.into(),
        }
    }

    pub(crate) fn not_found(kind: EntityKind, name: impl Into<String>) -> Self {
        Self::NotFound {
            kind,
            name: name.into(),
        }
    }

    pub(crate) fn unknown_tag(kind: EntityKind, name: impl Into<String>) -> Self {
        Self::UnknownTag {
            kind,
            name: name.into(),
        }
    }

    pub fn is_duplicate(&self) -> bool {
        matches!(self, Self::DuplicateEntity { .. })
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }

    pub fn is_unknown_tag(&self) -> bool {
        matches!(self, Self::UnknownTag { .. })
    }
}

pub type Result<T, E = BookError> = std::result::Result<T, E>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_messages_name_the_entity() {
        let err = BookError::duplicate(EntityKind::EventTag, "standup");
        assert_eq!(err.to_string(), "event tag already exists: standup");

        let err = BookError::unknown_tag(EntityKind::Tag, "friends");
        assert_eq!(err.to_string(), "unknown tag: friends");
        assert!(err.is_unknown_tag());
        assert!(!err.is_not_found());
    }
}
