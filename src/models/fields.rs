use std::fmt;
use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// A value that failed field validation.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("invalid {field} `{value}`: {constraint}")]
pub struct InvalidField {
    pub field: &'static str,
    pub value: String,
    pub constraint: &'static str,
}

impl InvalidField {
    pub fn new(field: &'static str, value: impl Into<String>, constraint: &'static str) -> Self {
        Self {
            field,
            value: value.into(),
            constraint,
        }
    }
}

static TAG_NAME_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Za-z0-9]+$").expect("tag name pattern"));
static NAME_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Za-z0-9][A-Za-z0-9 ]*$").expect("name pattern"));
static PHONE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\d{3,}$").expect("phone pattern"));
static EMAIL_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(concat!(
        r"^[A-Za-z0-9]([A-Za-z0-9+_.\-]*[A-Za-z0-9])?@",
        r"([A-Za-z0-9]([A-Za-z0-9\-]*[A-Za-z0-9])?\.)*",
        r"[A-Za-z0-9]([A-Za-z0-9\-]*[A-Za-z0-9])?$",
    ))
    .expect("email pattern")
});

/// Implements the string plumbing shared by every validated field:
/// accessors, `Display`, and the `String` conversions serde goes through.
macro_rules! string_field {
    ($ty:ident) => {
        impl $ty {
            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl fmt::Display for $ty {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(&self.0)
            }
        }

        impl TryFrom<String> for $ty {
            type Error = InvalidField;

            fn try_from(value: String) -> Result<Self, Self::Error> {
                Self::parse(&value)
            }
        }

        impl From<$ty> for String {
            fn from(value: $ty) -> Self {
                value.0
            }
        }

        impl AsRef<str> for $ty {
            fn as_ref(&self) -> &str {
                &self.0
            }
        }
    };
}

/// Name of a plain or event tag. Case-sensitive, alphanumeric, never empty.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct TagName(String);

impl TagName {
    pub const CONSTRAINT: &'static str = "tag names must be non-empty and alphanumeric";

    pub fn parse(s: &str) -> Result<Self, InvalidField> {
        let trimmed = s.trim();
        if !TAG_NAME_RE.is_match(trimmed) {
            return Err(InvalidField::new("tag name", s, Self::CONSTRAINT));
        }
        Ok(Self(trimmed.to_string()))
    }

    /// For names known to be valid at compile time.
    pub(super) fn from_static(s: &'static str) -> Self {
        Self(s.to_string())
    }
}

string_field!(TagName);

/// A person's full name; the person's identity for duplicate detection.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Name(String);

impl Name {
    pub const CONSTRAINT: &'static str =
        "names must contain only alphanumeric characters and spaces, and must not be blank";

    pub fn parse(s: &str) -> Result<Self, InvalidField> {
        let trimmed = s.trim();
        if !NAME_RE.is_match(trimmed) {
            return Err(InvalidField::new("name", s, Self::CONSTRAINT));
        }
        Ok(Self(trimmed.to_string()))
    }
}

string_field!(Name);

#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Phone(String);

impl Phone {
    pub const CONSTRAINT: &'static str =
        "phone numbers must contain only digits and be at least 3 digits long";

    pub fn parse(s: &str) -> Result<Self, InvalidField> {
        let trimmed = s.trim();
        if !PHONE_RE.is_match(trimmed) {
            return Err(InvalidField::new("phone", s, Self::CONSTRAINT));
        }
        Ok(Self(trimmed.to_string()))
    }
}

string_field!(Phone);

#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Email(String);

impl Email {
    pub const CONSTRAINT: &'static str = "emails must be of the form local-part@domain";

    pub fn parse(s: &str) -> Result<Self, InvalidField> {
        let trimmed = s.trim();
        let valid = EMAIL_RE.is_match(trimmed)
            && trimmed
                .rsplit_once('@')
                .and_then(|(_, domain)| domain.rsplit_once('.'))
                .is_some_and(|(_, last)| last.len() >= 2);
        if !valid {
            return Err(InvalidField::new("email", s, Self::CONSTRAINT));
        }
        Ok(Self(trimmed.to_string()))
    }
}

string_field!(Email);

#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Address(String);

impl Address {
    pub const CONSTRAINT: &'static str = "addresses can take any value, but must not be blank";

    pub fn parse(s: &str) -> Result<Self, InvalidField> {
        let trimmed = s.trim();
        if trimmed.is_empty() {
            return Err(InvalidField::new("address", s, Self::CONSTRAINT));
        }
        Ok(Self(trimmed.to_string()))
    }
}

string_field!(Address);
