//! CSV import and export of persons.
//!
//! Columns are fixed: `NAME,NUMBER,EMAIL,ADDRESS,EVENTS,TAGS`. EVENTS and
//! TAGS hold `|`-separated entries. An EVENTS entry is either an event name
//! or a full definition `E-<name> d/<description> st/<start> et/<end>`;
//! `N/A` means no event.

use std::fs::{self, File};
use std::path::Path;
use std::sync::LazyLock;

use chrono::NaiveDateTime;
use regex::Regex;
use serde::Deserialize;
use tracing::{info, warn};

use super::StorageError;
use crate::error::{BookError, EntityKind};
use crate::models::{
    parse_timestamp, Address, Email, InvalidField, Name, Person, Phone, Tag, TagName,
};
use crate::session::Session;

pub const CSV_FIELDS: [&str; 6] = ["NAME", "NUMBER", "EMAIL", "ADDRESS", "EVENTS", "TAGS"];

const MULTI_VALUE_SEPARATOR: char = '|';
const NO_EVENT: &str = "N/A";
const EVENT_PREFIX: &str = "E-";
const EVENT_DEFINITION_CONSTRAINT: &str =
    "event definitions must read `E-<name> d/<description> st/<start> et/<end>`";

static EVENT_DEFINITION_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"^E-(?P<name>\S+)\s+d/(?P<description>.*?)\s*st/(?P<start>.+?)\s+et/(?P<end>.+)$",
    )
    .expect("event definition pattern")
});

/// A CSV row, read positionally.
#[derive(Debug, Clone, Deserialize)]
struct CsvRow {
    name: String,
    phone: String,
    email: String,
    address: String,
    #[serde(default)]
    events: String,
    #[serde(default)]
    tags: String,
}

/// One entry of the EVENTS column.
#[derive(Debug, Clone, PartialEq, Eq)]
enum EventEntry {
    /// Refers to an event tag that must already exist.
    Named(TagName),
    /// Creates the event tag unless one with this name exists.
    Defined {
        name: TagName,
        description: String,
        start: NaiveDateTime,
        end: NaiveDateTime,
    },
}

impl EventEntry {
    fn parse(entry: &str) -> Result<Self, InvalidField> {
        if entry.split_whitespace().count() == 1 {
            let name = entry.strip_prefix(EVENT_PREFIX).unwrap_or(entry);
            return Ok(Self::Named(TagName::parse(name)?));
        }
        let caps = EVENT_DEFINITION_RE
            .captures(entry)
            .ok_or_else(|| InvalidField::new("event", entry, EVENT_DEFINITION_CONSTRAINT))?;
        Ok(Self::Defined {
            name: TagName::parse(&caps["name"])?,
            description: caps["description"].trim().to_string(),
            start: parse_timestamp(&caps["start"])?,
            end: parse_timestamp(&caps["end"])?,
        })
    }
}

/// A validated row, ready to apply.
struct PendingPerson {
    line: usize,
    person: Person,
    events: Vec<EventEntry>,
}

impl CsvRow {
    fn into_pending(self, line: usize) -> Result<PendingPerson, StorageError> {
        let row_err = |e: InvalidField| StorageError::Row {
            line,
            source: BookError::from(e),
        };
        let tags = split_multi(&self.tags)
            .into_iter()
            .map(|t| TagName::parse(&t).map(Tag::plain))
            .collect::<Result<Vec<_>, _>>()
            .map_err(row_err)?;
        let events = split_multi(&self.events)
            .into_iter()
            .filter(|e| e != NO_EVENT)
            .map(|e| EventEntry::parse(&e))
            .collect::<Result<Vec<_>, _>>()
            .map_err(row_err)?;
        let person = Person::new(
            Name::parse(&self.name).map_err(row_err)?,
            Phone::parse(&self.phone).map_err(row_err)?,
            Email::parse(&self.email).map_err(row_err)?,
            Address::parse(&self.address).map_err(row_err)?,
        )
        .with_tags(tags);
        Ok(PendingPerson {
            line,
            person,
            events,
        })
    }
}

fn split_multi(cell: &str) -> Vec<String> {
    cell.split(MULTI_VALUE_SEPARATOR)
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}

fn join_names<'a>(tags: impl Iterator<Item = &'a Tag>) -> String {
    tags.map(|t| t.name().as_str())
        .collect::<Vec<_>>()
        .join(&MULTI_VALUE_SEPARATOR.to_string())
}

/// Import results summary.
#[derive(Debug, Default, PartialEq, Eq)]
pub struct ImportStats {
    pub persons: usize,
    pub tags_registered: usize,
    pub events_created: usize,
}

/// Reads every row up front, then adds persons in file order.
///
/// Unregistered TAGS are registered on the fly. EVENTS names must exist,
/// while inline definitions create their event when it is new. The first
/// failing row stops the import; earlier rows stay.
pub fn import_csv(session: &mut Session, path: &Path) -> Result<ImportStats, StorageError> {
    let file = File::open(path).map_err(|source| StorageError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .trim(csv::Trim::All)
        .from_reader(file);

    check_header(reader.headers()?)?;

    let mut pending = Vec::new();
    for record in reader.records() {
        let record = record?;
        // Physical line where the record starts; blank lines are skipped.
        let line = record
            .position()
            .and_then(|p| usize::try_from(p.line()).ok())
            .unwrap_or_default();
        let row: CsvRow = record.deserialize(None)?;
        pending.push(row.into_pending(line)?);
    }

    let mut stats = ImportStats::default();
    for PendingPerson {
        line,
        person,
        events,
    } in pending
    {
        let tags_before = session.book().registry().tags().count();
        match apply_row(session, person, &events) {
            Ok(created) => stats.events_created += created,
            Err(source) => {
                warn!(line, error = %source, "import stopped");
                return Err(StorageError::Row { line, source });
            }
        }
        stats.tags_registered += session.book().registry().tags().count() - tags_before;
        stats.persons += 1;
    }
    info!(
        path = %path.display(),
        persons = stats.persons,
        events = stats.events_created,
        "imported CSV"
    );
    Ok(stats)
}

/// Adds one row's person. Returns how many event tags it created.
fn apply_row(
    session: &mut Session,
    person: Person,
    events: &[EventEntry],
) -> Result<usize, BookError> {
    if session.book().has_person(&person) {
        return Err(BookError::duplicate(EntityKind::Person, person.name.as_str()));
    }
    // Named events are checked before any definition is created.
    let defined_here = |name: &TagName| {
        events
            .iter()
            .any(|e| matches!(e, EventEntry::Defined { name: n, .. } if n == name))
    };
    for entry in events {
        if let EventEntry::Named(name) = entry {
            if !session.book().has_event_tag(name.as_str()) && !defined_here(name) {
                return Err(BookError::unknown_tag(EntityKind::EventTag, name.as_str()));
            }
        }
    }

    let mut created = 0;
    let mut held = Vec::with_capacity(events.len());
    for entry in events {
        let name = match entry {
            EventEntry::Named(name) => name,
            EventEntry::Defined {
                name,
                description,
                start,
                end,
            } => {
                if !session.book().has_event_tag(name.as_str()) {
                    session.create_event_tag(name.as_str(), description, *start, *end)?;
                    created += 1;
                }
                name
            }
        };
        held.push(session.book().get_event_tag(name.as_str())?.clone());
    }
    session.add_person(person.with_tags(held))?;
    Ok(created)
}

fn check_header(headers: &csv::StringRecord) -> Result<(), StorageError> {
    let found: Vec<String> = headers
        .iter()
        .map(|h| h.trim_start_matches('\u{feff}').trim().to_uppercase())
        .collect();
    if found != CSV_FIELDS {
        return Err(StorageError::Header {
            expected: CSV_FIELDS.join(","),
            found: headers.iter().collect::<Vec<_>>().join(","),
        });
    }
    Ok(())
}

/// Writes `persons` (normally the current view). Returns the row count.
pub fn export_csv(persons: &[&Person], path: &Path) -> Result<usize, StorageError> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent).map_err(|source| StorageError::Io {
                path: parent.to_path_buf(),
                source,
            })?;
        }
    }
    let mut writer = csv::Writer::from_path(path)?;
    writer.write_record(CSV_FIELDS)?;
    for person in persons {
        writer.write_record([
            person.name.as_str(),
            person.phone.as_str(),
            person.email.as_str(),
            person.address.as_str(),
            &join_names(person.event_tags()),
            &join_names(person.tags()),
        ])?;
    }
    writer.flush().map_err(|source| StorageError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    info!(path = %path.display(), rows = persons.len(), "exported CSV");
    Ok(persons.len())
}
