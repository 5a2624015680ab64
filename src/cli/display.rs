use std::fmt::Write;

use crate::models::{Person, Tag, TIMESTAMP_FORMAT};
use crate::session::Session;

/// One-line summary of a person.
pub fn format_person(person: &Person) -> String {
    let mut line = format!(
        "{}; Phone: {}; Email: {}; Address: {}",
        person.name, person.phone, person.email, person.address
    );
    let tags = join_tags(person.tags());
    if !tags.is_empty() {
        let _ = write!(line, "; Tags: {tags}");
    }
    let events = join_tags(person.event_tags());
    if !events.is_empty() {
        let _ = write!(line, "; Events: {events}");
    }
    line
}

fn join_tags<'a>(tags: impl Iterator<Item = &'a Tag>) -> String {
    tags.map(|t| format!("[{}]", t.name()))
        .collect::<Vec<_>>()
        .join("")
}

/// Event name with its window, e.g. `standup  2024-01-01 09:00:00 - 2024-01-01 09:15:00`.
pub fn format_event(tag: &Tag) -> String {
    match tag.window() {
        Some(w) => {
            let mut line = format!(
                "{}  {} - {}",
                tag.name(),
                w.start.format(TIMESTAMP_FORMAT),
                w.end.format(TIMESTAMP_FORMAT)
            );
            if !w.description.is_empty() {
                let _ = write!(line, "  {}", w.description);
            }
            line
        }
        None => tag.name().to_string(),
    }
}

/// The selected event header followed by the numbered current list.
pub fn render_view(session: &Session) -> String {
    let header = session.selection().display_tag();
    let persons = session.filtered_persons();
    let mut out = format_event(&header);
    if persons.is_empty() {
        out.push_str("\n\nNo persons.");
        return out;
    }
    out.push('\n');
    for (i, person) in persons.iter().enumerate() {
        let _ = write!(out, "\n{:>3}. {}", i + 1, format_person(person));
    }
    out
}
