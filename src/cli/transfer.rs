use std::path::Path;

use anyhow::{Context, Result};

use super::Outcome;
use crate::session::Session;
use crate::storage::{export_csv, import_csv};

pub fn run_import(session: &mut Session, path: &Path) -> Result<Outcome> {
    let stats = import_csv(session, path)
        .with_context(|| format!("Could not import {}", path.display()))?;
    Ok(Outcome::changed(format!(
        "Imported {} person(s), {} new tag(s), {} new event(s) from {}.",
        stats.persons,
        stats.tags_registered,
        stats.events_created,
        path.display()
    )))
}

pub fn run_export(session: &Session, path: &Path) -> Result<Outcome> {
    let rows = export_csv(&session.filtered_persons(), path)
        .with_context(|| format!("Could not export to {}", path.display()))?;
    Ok(Outcome::unchanged(format!(
        "Exported {rows} person(s) to {}.",
        path.display()
    )))
}
