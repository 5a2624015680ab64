//! The relationship graph: tag registry, person store, and the operations
//! that keep the two consistent.

use chrono::NaiveDateTime;
use tracing::info;

use crate::error::{BookError, EntityKind, Result};
use crate::models::{Name, Person, Tag};

mod persons;
mod registry;
mod relations;
mod snapshot;

pub use persons::PersonStore;
pub use registry::TagRegistry;
pub use snapshot::{EventTagRecord, PersonRecord, Snapshot};

/// Owns every person and every tag. All tags held by a stored person are
/// registered, and every mutation either completes or leaves the book
/// untouched.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EventBook {
    registry: TagRegistry,
    persons: PersonStore,
}

impl EventBook {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn registry(&self) -> &TagRegistry {
        &self.registry
    }

    pub fn persons(&self) -> &PersonStore {
        &self.persons
    }

    /// Replaces all data with `other`'s.
    pub fn reset(&mut self, other: EventBook) {
        *self = other;
    }

    pub fn create_tag(&mut self, name: &str) -> Result<Tag> {
        let tag = self.registry.create_tag(name)?;
        info!(tag = %tag.name(), "created tag");
        Ok(tag)
    }

    pub fn create_event_tag(
        &mut self,
        name: &str,
        description: &str,
        start: NaiveDateTime,
        end: NaiveDateTime,
    ) -> Result<Tag> {
        let tag = self.registry.create_event_tag(name, description, start, end)?;
        info!(event = %tag.name(), "created event tag");
        Ok(tag)
    }

    pub fn has_tag(&self, name: &str) -> bool {
        self.registry.has_tag(name)
    }

    pub fn has_event_tag(&self, name: &str) -> bool {
        self.registry.has_event_tag(name)
    }

    pub fn get_event_tag(&self, name: &str) -> Result<&Tag> {
        self.registry.get_event_tag(name)
    }

    pub fn has_person(&self, person: &Person) -> bool {
        self.persons.has(person)
    }

    pub fn person(&self, name: &Name) -> Option<&Person> {
        self.persons.get(name)
    }

    /// Stores `person`, registering any tag it holds that the registry has
    /// not seen. Tags whose identity is already registered are swapped for
    /// the registered entity, so the first definition of a name wins.
    pub fn add_person(&mut self, mut person: Person) -> Result<()> {
        if self.persons.has(&person) {
            return Err(BookError::duplicate(EntityKind::Person, person.name.as_str()));
        }
        let registered = self.adopt_tags(&mut person);
        info!(name = %person.name, registered, "added person");
        self.persons.add(person)
    }

    pub fn remove_person(&mut self, person: &Person) -> Result<Person> {
        let removed = self.persons.remove(person)?;
        info!(name = %removed.name, "removed person");
        Ok(removed)
    }

    /// Replaces `target` with `edited`; tags on `edited` follow the same
    /// registration rule as [`EventBook::add_person`].
    pub fn replace_person(&mut self, target: &Person, mut edited: Person) -> Result<()> {
        if !self.persons.has(target) {
            return Err(BookError::not_found(EntityKind::Person, target.name.as_str()));
        }
        if !target.is_same_person(&edited) && self.persons.has(&edited) {
            return Err(BookError::duplicate(EntityKind::Person, edited.name.as_str()));
        }
        self.adopt_tags(&mut edited);
        info!(from = %target.name, to = %edited.name, "edited person");
        self.persons.replace(target, edited)
    }

    /// Returns how many tags were newly registered.
    fn adopt_tags(&mut self, person: &mut Person) -> usize {
        let mut registered = 0;
        let registry = &mut self.registry;
        person.resolve_tags(|tag| match registry.get(&tag.key()) {
            Some(existing) => existing.clone(),
            None => {
                // Cannot collide: the key was just looked up.
                if registry.insert(tag.clone()).is_ok() {
                    registered += 1;
                }
                tag.clone()
            }
        });
        registered
    }
}
