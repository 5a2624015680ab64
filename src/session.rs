//! One running instance's graph plus its selection state.
//!
//! This is the surface the command layer drives. Mutations that reshape the
//! graph reset the view to everyone; deleting the selected event also drops
//! the selection in the same call.

use chrono::NaiveDateTime;

use crate::book::{EventBook, Snapshot};
use crate::error::{BookError, EntityKind, Result};
use crate::filter::{ActiveFilter, Selection};
use crate::models::{Name, Person, Tag};

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Session {
    book: EventBook,
    filter: ActiveFilter,
}

impl Session {
    pub fn new(book: EventBook) -> Self {
        Self {
            book,
            filter: ActiveFilter::new(),
        }
    }

    pub fn from_snapshot(snapshot: Snapshot) -> Result<Self> {
        Ok(Self::new(EventBook::from_snapshot(snapshot)?))
    }

    pub fn snapshot(&self) -> Snapshot {
        self.book.snapshot()
    }

    pub fn book(&self) -> &EventBook {
        &self.book
    }

    pub fn selection(&self) -> &Selection {
        self.filter.selection()
    }

    /// The persons currently shown, evaluated against live data.
    pub fn filtered_persons(&self) -> Vec<&Person> {
        self.filter.apply(&self.book)
    }

    pub fn event_tags(&self) -> impl Iterator<Item = &Tag> {
        self.book.registry().event_tags()
    }

    pub fn tags(&self) -> impl Iterator<Item = &Tag> {
        self.book.registry().tags()
    }

    pub fn create_tag(&mut self, name: &str) -> Result<Tag> {
        let tag = self.book.create_tag(name)?;
        self.filter.show_all();
        Ok(tag)
    }

    pub fn create_event_tag(
        &mut self,
        name: &str,
        description: &str,
        start: NaiveDateTime,
        end: NaiveDateTime,
    ) -> Result<Tag> {
        let tag = self.book.create_event_tag(name, description, start, end)?;
        self.filter.show_all();
        Ok(tag)
    }

    pub fn add_person(&mut self, person: Person) -> Result<()> {
        self.book.add_person(person)?;
        self.filter.show_all();
        Ok(())
    }

    pub fn edit_person(&mut self, target: &Name, edited: Person) -> Result<()> {
        let current = self.require_person(target)?.clone();
        self.book.replace_person(&current, edited)
    }

    pub fn delete_person(&mut self, target: &Name) -> Result<Person> {
        let current = self.require_person(target)?.clone();
        self.book.remove_person(&current)
    }

    pub fn assign(
        &mut self,
        person: &Name,
        tag_names: &[&str],
        event_tag_names: &[&str],
    ) -> Result<usize> {
        let added = self.book.assign(person, tag_names, event_tag_names)?;
        self.filter.show_all();
        Ok(added)
    }

    pub fn delete_tag(&mut self, name: &str) -> Result<Tag> {
        let removed = self.book.delete_tag(name)?;
        self.filter.show_all();
        Ok(removed)
    }

    /// Cascades the event tag out of the book and, if it was selected,
    /// returns the selection to `Unfiltered`.
    pub fn delete_event_tag(&mut self, name: &str) -> Result<Tag> {
        let removed = self.book.delete_event_tag(name)?;
        self.filter.forget_event(&removed.key());
        self.filter.show_all();
        Ok(removed)
    }

    pub fn select_event(&mut self, name: &str) -> Result<Tag> {
        self.filter.select_event(&self.book, name)
    }

    pub fn clear_selection(&mut self) {
        self.filter.clear_selection();
    }

    pub fn filter_by_tag(&mut self, name: &str) -> Result<()> {
        self.filter.filter_by_tag(&self.book, name)
    }

    pub fn show_all(&mut self) {
        self.filter.show_all();
    }

    /// Back to everyone, with no event selected.
    pub fn list(&mut self) {
        self.filter.clear_selection();
        self.filter.show_all();
    }

    /// Empties the book and resets the selection.
    pub fn clear(&mut self) {
        self.book.reset(EventBook::new());
        self.filter = ActiveFilter::new();
    }

    /// 1-based position in the current view.
    pub fn person_at(&self, index: usize) -> Result<&Person> {
        index
            .checked_sub(1)
            .and_then(|i| self.filtered_persons().get(i).copied())
            .ok_or_else(|| BookError::not_found(EntityKind::Person, format!("#{index}")))
    }

    /// Exact-name lookup restricted to the current view.
    pub fn find_shown(&self, name: &Name) -> Result<&Person> {
        self.filtered_persons()
            .into_iter()
            .find(|p| &p.name == name)
            .ok_or_else(|| BookError::not_found(EntityKind::Person, name.as_str()))
    }

    fn require_person(&self, name: &Name) -> Result<&Person> {
        self.book
            .person(name)
            .ok_or_else(|| BookError::not_found(EntityKind::Person, name.as_str()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{parse_timestamp, Address, Email, Phone, TagKey, TagName};

    fn person(name: &str) -> Person {
        Person::new(
            Name::parse(name).unwrap(),
            Phone::parse("12345678").unwrap(),
            Email::parse("person@example.com").unwrap(),
            Address::parse("1 Main St").unwrap(),
        )
    }

    fn name(s: &str) -> Name {
        Name::parse(s).unwrap()
    }

    fn shown(session: &Session) -> Vec<String> {
        session
            .filtered_persons()
            .into_iter()
            .map(|p| p.name.to_string())
            .collect()
    }

    fn session() -> Session {
        let mut session = Session::default();
        session.create_tag("friends").unwrap();
        session
            .create_event_tag(
                "standup",
                "daily sync",
                parse_timestamp("2024-01-01 09:00:00").unwrap(),
                parse_timestamp("2024-01-01 09:15:00").unwrap(),
            )
            .unwrap();
        session.add_person(person("Alice")).unwrap();
        session.add_person(person("Bob")).unwrap();
        session
    }

    #[test]
    fn test_deleting_selected_event_clears_selection() {
        let mut session = session();
        session.assign(&name("Alice"), &["friends"], &["standup"]).unwrap();
        session.assign(&name("Bob"), &["friends"], &[]).unwrap();
        session.select_event("standup").unwrap();
        assert_eq!(shown(&session), vec!["Alice"]);

        session.delete_event_tag("standup").unwrap();
        assert_eq!(session.selection(), &Selection::Unfiltered);
        assert_eq!(shown(&session), vec!["Alice", "Bob"]);

        // Tag filtering now behaves as unfiltered.
        session.filter_by_tag("friends").unwrap();
        assert_eq!(shown(&session), vec!["Alice", "Bob"]);
    }

    #[test]
    fn test_deleting_other_event_keeps_selection() {
        let mut session = session();
        session
            .create_event_tag(
                "retro",
                "",
                parse_timestamp("2024-01-05 16:00:00").unwrap(),
                parse_timestamp("2024-01-05 17:00:00").unwrap(),
            )
            .unwrap();
        session.select_event("standup").unwrap();
        session.delete_event_tag("retro").unwrap();
        assert_eq!(session.selection().event().unwrap().name().as_str(), "standup");
    }

    #[test]
    fn test_failed_filter_leaves_view() {
        let mut session = session();
        session.assign(&name("Alice"), &["friends"], &[]).unwrap();
        session.filter_by_tag("friends").unwrap();
        let err = session.filter_by_tag("colleagues").unwrap_err();
        assert!(err.is_unknown_tag());
        assert_eq!(shown(&session), vec!["Alice"]);
    }

    #[test]
    fn test_assign_resets_view_but_not_selection() {
        let mut session = session();
        session.select_event("standup").unwrap();
        assert!(session.filtered_persons().is_empty());
        session.assign(&name("Bob"), &[], &["standup"]).unwrap();
        assert_eq!(shown(&session), vec!["Alice", "Bob"]);
        assert!(session.selection().event().is_some());
    }

    #[test]
    fn test_list_clears_everything() {
        let mut session = session();
        session.assign(&name("Alice"), &[], &["standup"]).unwrap();
        session.select_event("standup").unwrap();
        session.list();
        assert_eq!(session.selection(), &Selection::Unfiltered);
        assert_eq!(shown(&session).len(), 2);
    }

    #[test]
    fn test_person_at_uses_current_view() {
        let mut session = session();
        session.assign(&name("Bob"), &["friends"], &[]).unwrap();
        session.filter_by_tag("friends").unwrap();
        assert_eq!(session.person_at(1).unwrap().name.as_str(), "Bob");
        assert!(session.person_at(2).unwrap_err().is_not_found());
        assert!(session.person_at(0).unwrap_err().is_not_found());
        assert!(session.find_shown(&name("Alice")).unwrap_err().is_not_found());
        assert!(session.find_shown(&name("Bob")).is_ok());
    }

    #[test]
    fn test_edit_and_delete_person() {
        let mut session = session();
        let mut edited = person("Alicia");
        edited.phone = Phone::parse("999").unwrap();
        session.edit_person(&name("Alice"), edited).unwrap();
        assert_eq!(shown(&session), vec!["Alicia", "Bob"]);

        assert!(session.edit_person(&name("Alice"), person("Al")).unwrap_err().is_not_found());
        assert!(session.edit_person(&name("Alicia"), person("Bob")).unwrap_err().is_duplicate());

        session.delete_person(&name("Bob")).unwrap();
        assert_eq!(shown(&session), vec!["Alicia"]);
        assert!(session.delete_person(&name("Bob")).unwrap_err().is_not_found());
    }

    #[test]
    fn test_delete_tag_cascades() {
        let mut session = session();
        session.assign(&name("Alice"), &["friends"], &[]).unwrap();
        session.filter_by_tag("friends").unwrap();
        session.delete_tag("friends").unwrap();
        assert_eq!(shown(&session).len(), 2);
        let key = TagKey::plain(TagName::parse("friends").unwrap());
        assert!(session.filtered_persons().iter().all(|p| !p.holds(&key)));
    }

    #[test]
    fn test_clear() {
        let mut session = session();
        session.select_event("standup").unwrap();
        session.clear();
        assert_eq!(session, Session::default());
    }
}
