//! Relationship engine: linking persons to tags and cascading tag deletion.

use tracing::{info, warn};

use super::registry::entity_kind;
use super::EventBook;
use crate::error::{BookError, EntityKind, Result};
use crate::models::{Name, Tag, TagKey, TagNamespace};

impl EventBook {
    /// Adds the named tags and event tags to `person`.
    ///
    /// Every name is checked before anything changes, so one unknown name
    /// fails the whole call with `UnknownTag`. Tags the person already holds
    /// are skipped. Returns how many tags were newly added.
    pub fn assign(
        &mut self,
        person: &Name,
        tag_names: &[&str],
        event_tag_names: &[&str],
    ) -> Result<usize> {
        let mut resolved: Vec<Tag> = Vec::with_capacity(tag_names.len() + event_tag_names.len());
        for (namespace, names) in [
            (TagNamespace::Plain, tag_names),
            (TagNamespace::Event, event_tag_names),
        ] {
            for name in names {
                let key = self.registry.require(namespace, name)?;
                if let Some(tag) = self.registry.get(&key) {
                    resolved.push(tag.clone());
                }
            }
        }

        let target = self
            .persons
            .get_mut(person)
            .ok_or_else(|| BookError::not_found(EntityKind::Person, person.as_str()))?;
        let added = target.add_tags(&resolved);
        info!(person = %person, added, "assigned tags");
        Ok(added)
    }

    pub fn delete_tag(&mut self, name: &str) -> Result<Tag> {
        let key = self.key_for_delete(TagNamespace::Plain, name)?;
        self.cascade_delete_key(&key)
    }

    pub fn delete_event_tag(&mut self, name: &str) -> Result<Tag> {
        let key = self.key_for_delete(TagNamespace::Event, name)?;
        self.cascade_delete_key(&key)
    }

    /// Removes `tag` from every person holding it, then from the registry.
    /// Only the tag's identity matters: a stale copy with an outdated
    /// description still deletes the registered entry.
    pub fn cascade_delete(&mut self, tag: &Tag) -> Result<Tag> {
        self.cascade_delete_key(&tag.key())
    }

    fn key_for_delete(&self, namespace: TagNamespace, name: &str) -> Result<TagKey> {
        self.registry
            .require(namespace, name)
            .map_err(|_| BookError::not_found(entity_kind(namespace), name))
    }

    fn cascade_delete_key(&mut self, key: &TagKey) -> Result<Tag> {
        if !self.registry.contains_key(key) {
            return Err(BookError::not_found(
                entity_kind(key.namespace),
                key.name.as_str(),
            ));
        }

        let mut detached = 0usize;
        for person in self.persons.iter_mut() {
            if person.remove_tag(key) {
                detached += 1;
            }
        }
        let removed = self.registry.remove(key)?;

        if detached > 0 {
            warn!(
                namespace = key.namespace.as_str(),
                tag = %key.name,
                detached,
                "deleted tag was still held by persons"
            );
        }
        info!(namespace = key.namespace.as_str(), tag = %key.name, "deleted tag");
        Ok(removed)
    }
}
