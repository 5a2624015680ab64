//! Active-selection filter: which event (if any) is selected, and the
//! predicate that produces the live view of persons.
//!
//! The view is never cached. [`ActiveFilter::apply`] evaluates the current
//! predicate against the book every time, so tag changes made after the
//! predicate was set show up on the next read.

use tracing::debug;

use crate::book::EventBook;
use crate::error::Result;
use crate::models::{Person, Tag, TagKey, TagNamespace};

/// Selection state machine. Starts `Unfiltered`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum Selection {
    #[default]
    Unfiltered,
    EventSelected(Tag),
}

impl Selection {
    pub fn event(&self) -> Option<&Tag> {
        match self {
            Self::Unfiltered => None,
            Self::EventSelected(tag) => Some(tag),
        }
    }

    /// The selected event, or the "All" pseudo event when unfiltered.
    pub fn display_tag(&self) -> Tag {
        self.event().cloned().unwrap_or_else(Tag::all_contacts)
    }
}

/// Predicate over persons. Tag membership is by identity (namespace and
/// name), not by payload.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum PersonFilter {
    #[default]
    All,
    Holding(TagKey),
    HoldingBoth(TagKey, TagKey),
}

impl PersonFilter {
    pub fn matches(&self, person: &Person) -> bool {
        match self {
            Self::All => true,
            Self::Holding(key) => person.holds(key),
            Self::HoldingBoth(a, b) => person.holds(a) && person.holds(b),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ActiveFilter {
    selection: Selection,
    view: PersonFilter,
}

impl ActiveFilter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn selection(&self) -> &Selection {
        &self.selection
    }

    pub fn view(&self) -> &PersonFilter {
        &self.view
    }

    /// Selects the named event tag and narrows the view to its holders.
    /// Fails with `NotFound` and changes nothing if the event is unknown.
    pub fn select_event(&mut self, book: &EventBook, name: &str) -> Result<Tag> {
        let event = book.get_event_tag(name)?.clone();
        self.view = PersonFilter::Holding(event.key());
        self.selection = Selection::EventSelected(event.clone());
        debug!(event = %event.name(), "selected event");
        Ok(event)
    }

    pub fn clear_selection(&mut self) {
        self.selection = Selection::Unfiltered;
        self.view = PersonFilter::All;
    }

    /// Narrows to holders of the named plain tag, intersected with the
    /// selected event if there is one. Replaces any earlier tag filter.
    pub fn filter_by_tag(&mut self, book: &EventBook, name: &str) -> Result<()> {
        let tag = book.registry().require(TagNamespace::Plain, name)?;
        self.view = match &self.selection {
            Selection::Unfiltered => PersonFilter::Holding(tag),
            Selection::EventSelected(event) => PersonFilter::HoldingBoth(event.key(), tag),
        };
        debug!(view = ?self.view, "filtered by tag");
        Ok(())
    }

    /// Shows everyone without touching the selection.
    pub fn show_all(&mut self) {
        self.view = PersonFilter::All;
    }

    /// Drops the selection if it refers to `key`. Returns whether it did.
    pub fn forget_event(&mut self, key: &TagKey) -> bool {
        let selected = matches!(&self.selection, Selection::EventSelected(e) if &e.key() == key);
        if selected {
            self.clear_selection();
        }
        selected
    }

    /// Evaluates the current view against `book`.
    pub fn apply<'a>(&self, book: &'a EventBook) -> Vec<&'a Person> {
        book.persons()
            .iter()
            .filter(|p| self.view.matches(p))
            .collect()
    }
}
