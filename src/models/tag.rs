use std::fmt;

use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};

use super::{InvalidField, TagName};

/// Text format for event timestamps on the command line and in CSV files.
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Plain tags and event tags live in independent namespaces: a plain tag
/// `standup` and an event tag `standup` may coexist.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TagNamespace {
    Plain,
    Event,
}

impl TagNamespace {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Plain => "plain",
            Self::Event => "event",
        }
    }
}

/// Identity of a tag inside the registry.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct TagKey {
    pub namespace: TagNamespace,
    pub name: TagName,
}

impl TagKey {
    pub fn plain(name: TagName) -> Self {
        Self {
            namespace: TagNamespace::Plain,
            name,
        }
    }

    pub fn event(name: TagName) -> Self {
        Self {
            namespace: TagNamespace::Event,
            name,
        }
    }
}

/// Description and time window carried by an event tag.
///
/// No ordering is enforced between `start` and `end`.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct EventWindow {
    pub description: String,
    pub start: NaiveDateTime,
    pub end: NaiveDateTime,
}

#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum TagKind {
    Plain,
    Event(EventWindow),
}

/// A label attachable to persons: either a plain category or an event with
/// a description and time window.
///
/// Equality is structural: two event tags are equal only when name,
/// description and both timestamps match. Use [`Tag::is_same_tag`] for the
/// name-only comparison.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Tag {
    name: TagName,
    kind: TagKind,
}

impl Tag {
    pub fn plain(name: TagName) -> Self {
        Self {
            name,
            kind: TagKind::Plain,
        }
    }

    pub fn event(
        name: TagName,
        description: impl Into<String>,
        start: NaiveDateTime,
        end: NaiveDateTime,
    ) -> Self {
        Self {
            name,
            kind: TagKind::Event(EventWindow {
                description: description.into(),
                start,
                end,
            }),
        }
    }

    /// The "All" pseudo event used to label the unfiltered view.
    /// Never stored in the registry.
    pub fn all_contacts() -> Self {
        let at = NaiveDate::from_ymd_opt(2024, 4, 5)
            .and_then(|d| d.and_hms_opt(14, 0, 0))
            .unwrap_or_default();
        Self::event(
            TagName::from_static("All"),
            "All contacts in EventBook",
            at,
            at,
        )
    }

    pub fn name(&self) -> &TagName {
        &self.name
    }

    pub fn kind(&self) -> &TagKind {
        &self.kind
    }

    pub fn namespace(&self) -> TagNamespace {
        match self.kind {
            TagKind::Plain => TagNamespace::Plain,
            TagKind::Event(_) => TagNamespace::Event,
        }
    }

    pub fn key(&self) -> TagKey {
        TagKey {
            namespace: self.namespace(),
            name: self.name.clone(),
        }
    }

    pub fn is_event(&self) -> bool {
        matches!(self.kind, TagKind::Event(_))
    }

    pub fn window(&self) -> Option<&EventWindow> {
        match &self.kind {
            TagKind::Event(window) => Some(window),
            TagKind::Plain => None,
        }
    }

    /// Weak identity: same namespace and same name.
    pub fn is_same_tag(&self, other: &Tag) -> bool {
        self.namespace() == other.namespace() && self.name == other.name
    }

    pub(crate) fn matches(&self, key: &TagKey) -> bool {
        self.namespace() == key.namespace && self.name == key.name
    }
}

impl fmt::Display for Tag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.kind {
            TagKind::Plain => write!(f, "[{}]", self.name),
            TagKind::Event(w) => write!(
                f,
                "[{}] from {} to {}.\n{}",
                self.name,
                w.start.format(TIMESTAMP_FORMAT),
                w.end.format(TIMESTAMP_FORMAT),
                w.description
            ),
        }
    }
}

/// Parses `yyyy-MM-dd HH:mm:ss`, also accepting the ISO `T` separator.
pub fn parse_timestamp(s: &str) -> Result<NaiveDateTime, InvalidField> {
    let trimmed = s.trim();
    NaiveDateTime::parse_from_str(trimmed, TIMESTAMP_FORMAT)
        .or_else(|_| NaiveDateTime::parse_from_str(trimmed, "%Y-%m-%dT%H:%M:%S"))
        .or_else(|_| NaiveDateTime::parse_from_str(trimmed, "%Y-%m-%dT%H:%M"))
        .map_err(|_| {
            InvalidField::new(
                "timestamp",
                s,
                "timestamps must be of the form yyyy-MM-dd HH:mm:ss",
            )
        })
}
