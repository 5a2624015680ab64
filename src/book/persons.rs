//! Person Store: insertion-ordered persons, unique by name.

use tracing::debug;

use crate::error::{BookError, EntityKind, Result};
use crate::models::{Name, Person};

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PersonStore {
    persons: Vec<Person>,
}

impl PersonStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Weak identity: any stored person with the same name.
    pub fn has(&self, person: &Person) -> bool {
        self.persons.iter().any(|p| p.is_same_person(person))
    }

    pub fn get(&self, name: &Name) -> Option<&Person> {
        self.persons.iter().find(|p| &p.name == name)
    }

    pub(crate) fn get_mut(&mut self, name: &Name) -> Option<&mut Person> {
        self.persons.iter_mut().find(|p| &p.name == name)
    }

    pub fn add(&mut self, person: Person) -> Result<()> {
        if self.has(&person) {
            return Err(BookError::duplicate(EntityKind::Person, person.name.as_str()));
        }
        debug!(name = %person.name, "stored person");
        self.persons.push(person);
        Ok(())
    }

    /// Removes the person with `person`'s name.
    pub fn remove(&mut self, person: &Person) -> Result<Person> {
        let idx = self.position(person)?;
        Ok(self.persons.remove(idx))
    }

    /// Puts `edited` in `target`'s slot, keeping list order.
    pub fn replace(&mut self, target: &Person, edited: Person) -> Result<()> {
        let idx = self.position(target)?;
        if !target.is_same_person(&edited) && self.has(&edited) {
            return Err(BookError::duplicate(EntityKind::Person, edited.name.as_str()));
        }
        self.persons[idx] = edited;
        Ok(())
    }

    pub fn iter(&self) -> impl Iterator<Item = &Person> {
        self.persons.iter()
    }

    pub(crate) fn iter_mut(&mut self) -> impl Iterator<Item = &mut Person> {
        self.persons.iter_mut()
    }

    pub fn len(&self) -> usize {
        self.persons.len()
    }

    pub fn is_empty(&self) -> bool {
        self.persons.is_empty()
    }

    fn position(&self, person: &Person) -> Result<usize> {
        self.persons
            .iter()
            .position(|p| p.is_same_person(person))
            .ok_or_else(|| BookError::not_found(EntityKind::Person, person.name.as_str()))
    }
}
