use anyhow::{Context, Result};

use super::display::format_event;
use super::{CtagArgs, Outcome};
use crate::models::parse_timestamp;
use crate::session::Session;

pub fn run_ctag(session: &mut Session, args: CtagArgs) -> Result<Outcome> {
    if !args.event {
        let tag = session.create_tag(&args.name)?;
        return Ok(Outcome::changed(format!("New tag added: {tag}")));
    }
    let start = parse_timestamp(args.start.as_deref().context("--start is required")?)?;
    let end = parse_timestamp(args.end.as_deref().context("--end is required")?)?;
    let tag = session.create_event_tag(
        &args.name,
        args.description.as_deref().unwrap_or_default(),
        start,
        end,
    )?;
    Ok(Outcome::changed(format!("New event tag added: {tag}")))
}

pub fn run_dtag(session: &mut Session, name: &str) -> Result<Outcome> {
    let tag = session.delete_tag(name)?;
    Ok(Outcome::changed(format!("Deleted tag {tag}")))
}

pub fn run_devent(session: &mut Session, name: &str) -> Result<Outcome> {
    let tag = session.delete_event_tag(name)?;
    Ok(Outcome::changed(format!("Deleted event tag [{}]", tag.name())))
}

pub fn run_tags(session: &Session) -> Outcome {
    let names: Vec<String> = session.tags().map(|t| t.to_string()).collect();
    if names.is_empty() {
        return Outcome::unchanged("No tags.");
    }
    Outcome::unchanged(names.join(" "))
}

pub fn run_events(session: &Session) -> Outcome {
    let lines: Vec<String> = session.event_tags().map(format_event).collect();
    if lines.is_empty() {
        return Outcome::unchanged("No event tags.");
    }
    Outcome::unchanged(lines.join("\n"))
}
