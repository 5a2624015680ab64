//! Tag Registry: the set of plain tags and the set of event tags.
//!
//! Both kinds sit in one map keyed by `(namespace, name)`, so uniqueness is
//! per namespace and a lookup by name finds at most one entry.

use std::collections::BTreeMap;

use chrono::NaiveDateTime;
use tracing::debug;

use crate::error::{BookError, EntityKind, Result};
use crate::models::{Tag, TagKey, TagName, TagNamespace};

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TagRegistry {
    entries: BTreeMap<TagKey, Tag>,
}

pub(crate) fn entity_kind(namespace: TagNamespace) -> EntityKind {
    match namespace {
        TagNamespace::Plain => EntityKind::Tag,
        TagNamespace::Event => EntityKind::EventTag,
    }
}

impl TagRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn create_tag(&mut self, name: &str) -> Result<Tag> {
        let tag = Tag::plain(TagName::parse(name)?);
        self.insert(tag.clone())?;
        Ok(tag)
    }

    /// Does not look at plain tag names; the namespaces are independent.
    pub fn create_event_tag(
        &mut self,
        name: &str,
        description: &str,
        start: NaiveDateTime,
        end: NaiveDateTime,
    ) -> Result<Tag> {
        let tag = Tag::event(TagName::parse(name)?, description, start, end);
        self.insert(tag.clone())?;
        Ok(tag)
    }

    /// Registers a ready-made tag of either kind.
    pub fn insert(&mut self, tag: Tag) -> Result<()> {
        let key = tag.key();
        if self.entries.contains_key(&key) {
            return Err(BookError::duplicate(
                entity_kind(key.namespace),
                key.name.as_str(),
            ));
        }
        debug!(namespace = key.namespace.as_str(), name = %key.name, "registered tag");
        self.entries.insert(key, tag);
        Ok(())
    }

    /// Name-based check. Malformed names are simply absent.
    pub fn has_tag(&self, name: &str) -> bool {
        self.lookup(TagNamespace::Plain, name).is_some()
    }

    pub fn has_event_tag(&self, name: &str) -> bool {
        self.lookup(TagNamespace::Event, name).is_some()
    }

    /// Structural check: the registered entry must equal `tag` in every field.
    pub fn contains(&self, tag: &Tag) -> bool {
        self.entries.get(&tag.key()) == Some(tag)
    }

    pub fn contains_key(&self, key: &TagKey) -> bool {
        self.entries.contains_key(key)
    }

    pub fn get(&self, key: &TagKey) -> Option<&Tag> {
        self.entries.get(key)
    }

    pub fn get_event_tag(&self, name: &str) -> Result<&Tag> {
        self.lookup(TagNamespace::Event, name)
            .ok_or_else(|| BookError::not_found(EntityKind::EventTag, name))
    }

    /// Resolves a name to its registry key, failing with `UnknownTag`.
    pub(crate) fn require(&self, namespace: TagNamespace, name: &str) -> Result<TagKey> {
        self.lookup(namespace, name)
            .map(Tag::key)
            .ok_or_else(|| BookError::unknown_tag(entity_kind(namespace), name))
    }

    /// Removes the entry only. Callers go through the cascade in
    /// [`EventBook`](super::EventBook) so no person keeps a dangling copy.
    pub(crate) fn remove(&mut self, key: &TagKey) -> Result<Tag> {
        self.entries
            .remove(key)
            .ok_or_else(|| BookError::not_found(entity_kind(key.namespace), key.name.as_str()))
    }

    pub fn tags(&self) -> impl Iterator<Item = &Tag> {
        self.in_namespace(TagNamespace::Plain)
    }

    pub fn event_tags(&self) -> impl Iterator<Item = &Tag> {
        self.in_namespace(TagNamespace::Event)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    fn in_namespace(&self, namespace: TagNamespace) -> impl Iterator<Item = &Tag> {
        self.entries
            .iter()
            .filter(move |(k, _)| k.namespace == namespace)
            .map(|(_, t)| t)
    }

    fn lookup(&self, namespace: TagNamespace, name: &str) -> Option<&Tag> {
        let name = TagName::parse(name).ok()?;
        self.entries.get(&TagKey { namespace, name })
    }
}
