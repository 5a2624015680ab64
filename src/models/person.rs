use std::collections::BTreeSet;

use super::{Address, Email, Name, Phone, Tag, TagKey, TagNamespace};

/// A contact record.
///
/// Two persons are "the same person" when their names match
/// ([`Person::is_same_person`]); `==` additionally compares every field and
/// both tag sets.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Person {
    pub name: Name,
    pub phone: Phone,
    pub email: Email,
    pub address: Address,
    // Plain and event tags share one set; `Tag` ordering keeps them apart.
    tags: BTreeSet<Tag>,
}

impl Person {
    pub fn new(name: Name, phone: Phone, email: Email, address: Address) -> Self {
        Self {
            name,
            phone,
            email,
            address,
            tags: BTreeSet::new(),
        }
    }

    pub fn with_tag(mut self, tag: Tag) -> Self {
        self.tags.insert(tag);
        self
    }

    pub fn with_tags(mut self, tags: impl IntoIterator<Item = Tag>) -> Self {
        self.tags.extend(tags);
        self
    }

    /// Every tag held, plain and event.
    pub fn all_tags(&self) -> impl Iterator<Item = &Tag> {
        self.tags.iter()
    }

    pub fn tags(&self) -> impl Iterator<Item = &Tag> {
        self.tags
            .iter()
            .filter(|t| t.namespace() == TagNamespace::Plain)
    }

    pub fn event_tags(&self) -> impl Iterator<Item = &Tag> {
        self.tags.iter().filter(|t| t.is_event())
    }

    /// Holds a tag with this namespace and name, whatever its payload.
    pub fn holds(&self, key: &TagKey) -> bool {
        self.tags.iter().any(|t| t.matches(key))
    }

    pub fn is_same_person(&self, other: &Person) -> bool {
        self.name == other.name
    }

    /// Adds tags, ignoring ones already held. Returns how many were new.
    pub(crate) fn add_tags<'a>(&mut self, tags: impl IntoIterator<Item = &'a Tag>) -> usize {
        tags.into_iter()
            .filter(|t| self.tags.insert((*t).clone()))
            .count()
    }

    /// Drops every held tag matching `key`. Returns whether anything went.
    pub(crate) fn remove_tag(&mut self, key: &TagKey) -> bool {
        let before = self.tags.len();
        self.tags.retain(|t| !t.matches(key));
        self.tags.len() != before
    }

    /// Swaps each held tag for the registry's entity of the same identity.
    pub(crate) fn resolve_tags(&mut self, mut resolve: impl FnMut(&Tag) -> Tag) {
        self.tags = self.tags.iter().map(|t| resolve(t)).collect();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{parse_timestamp, TagName};

    fn alice() -> Person {
        Person::new(
            Name::parse("Alice").unwrap(),
            Phone::parse("94351253").unwrap(),
            Email::parse("alice@example.com").unwrap(),
            Address::parse("123, Jurong West Ave 6").unwrap(),
        )
    }

    fn plain(s: &str) -> Tag {
        Tag::plain(TagName::parse(s).unwrap())
    }

    fn event(s: &str) -> Tag {
        let at = parse_timestamp("2024-01-01 09:00:00").unwrap();
        Tag::event(TagName::parse(s).unwrap(), "sync", at, at)
    }

    #[test]
    fn test_same_person_is_name_only() {
        let mut other = alice();
        other.phone = Phone::parse("999").unwrap();
        assert!(alice().is_same_person(&other));
        assert_ne!(alice(), other);
    }

    #[test]
    fn test_full_equality_includes_tags() {
        assert_ne!(alice(), alice().with_tag(plain("friends")));
        assert_eq!(
            alice().with_tag(plain("friends")),
            alice().with_tag(plain("friends"))
        );
    }

    #[test]
    fn test_tag_views_split_namespaces() {
        let person = alice().with_tags([plain("friends"), event("standup"), plain("standup")]);
        assert_eq!(person.tags().count(), 2);
        assert_eq!(person.event_tags().count(), 1);
        assert_eq!(person.all_tags().count(), 3);
    }

    #[test]
    fn test_add_tags_is_idempotent() {
        let mut person = alice();
        let friends = plain("friends");
        assert_eq!(person.add_tags([&friends]), 1);
        assert_eq!(person.add_tags([&friends]), 0);
        assert_eq!(person, alice().with_tag(plain("friends")));
    }

    #[test]
    fn test_remove_tag_by_key() {
        let mut person = alice().with_tags([plain("standup"), event("standup")]);
        assert!(person.remove_tag(&event("standup").key()));
        assert!(!person.holds(&event("standup").key()));
        assert!(person.holds(&plain("standup").key()));
        assert!(!person.remove_tag(&event("standup").key()));
    }
}
