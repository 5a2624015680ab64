//! Serializable mirror of the whole graph, handed to and from storage.

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use tracing::debug;

use super::EventBook;
use crate::error::Result;
use crate::models::{Address, Email, Name, Person, Phone, Tag, TagName, TagNamespace};

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Snapshot {
    #[serde(default)]
    pub persons: Vec<PersonRecord>,
    #[serde(default, rename = "tagList")]
    pub tags: Vec<TagName>,
    #[serde(default, rename = "eventTagList")]
    pub event_tags: Vec<EventTagRecord>,
}

/// A person with tag references by name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PersonRecord {
    pub name: Name,
    pub phone: Phone,
    pub email: Email,
    pub address: Address,
    #[serde(default)]
    pub tags: Vec<TagName>,
    #[serde(default)]
    pub event_tags: Vec<TagName>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EventTagRecord {
    pub tag_name: TagName,
    #[serde(default)]
    pub description: String,
    pub start_date: NaiveDateTime,
    pub end_date: NaiveDateTime,
}

impl From<&Person> for PersonRecord {
    fn from(p: &Person) -> Self {
        Self {
            name: p.name.clone(),
            phone: p.phone.clone(),
            email: p.email.clone(),
            address: p.address.clone(),
            tags: p.tags().map(|t| t.name().clone()).collect(),
            event_tags: p.event_tags().map(|t| t.name().clone()).collect(),
        }
    }
}

impl EventTagRecord {
    fn from_tag(tag: &Tag) -> Option<Self> {
        let window = tag.window()?;
        Some(Self {
            tag_name: tag.name().clone(),
            description: window.description.clone(),
            start_date: window.start,
            end_date: window.end,
        })
    }

    fn into_tag(self) -> Tag {
        Tag::event(self.tag_name, self.description, self.start_date, self.end_date)
    }
}

impl EventBook {
    pub fn snapshot(&self) -> Snapshot {
        Snapshot {
            persons: self.persons.iter().map(PersonRecord::from).collect(),
            tags: self.registry.tags().map(|t| t.name().clone()).collect(),
            event_tags: self
                .registry
                .event_tags()
                .filter_map(EventTagRecord::from_tag)
                .collect(),
        }
    }

    /// Rebuilds a book in the order tags, event tags, persons. Each person's
    /// tag names must already be registered (`UnknownTag` otherwise), and
    /// duplicates fail exactly as interactive creation would.
    pub fn from_snapshot(snapshot: Snapshot) -> Result<Self> {
        let mut book = EventBook::new();
        for name in snapshot.tags {
            book.registry.insert(Tag::plain(name))?;
        }
        for record in snapshot.event_tags {
            book.registry.insert(record.into_tag())?;
        }
        for record in snapshot.persons {
            let mut held = Vec::with_capacity(record.tags.len() + record.event_tags.len());
            for (namespace, names) in [
                (TagNamespace::Plain, &record.tags),
                (TagNamespace::Event, &record.event_tags),
            ] {
                for name in names {
                    let key = book.registry.require(namespace, name.as_str())?;
                    if let Some(tag) = book.registry.get(&key) {
                        held.push(tag.clone());
                    }
                }
            }
            let person = Person::new(record.name, record.phone, record.email, record.address)
                .with_tags(held);
            book.persons.add(person)?;
        }
        debug!(
            persons = book.persons.len(),
            tags = book.registry.len(),
            "rebuilt book from snapshot"
        );
        Ok(book)
    }
}
