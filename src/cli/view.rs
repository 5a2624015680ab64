use anyhow::Result;

use super::display::render_view;
use super::{Outcome, SearchArgs};
use crate::session::Session;

pub fn run_switch(session: &mut Session, name: &str) -> Result<Outcome> {
    session.select_event(name)?;
    Ok(Outcome::unchanged(render_view(session)))
}

pub fn run_search(session: &mut Session, args: SearchArgs) -> Result<Outcome> {
    match (args.tag, args.event) {
        (_, Some(event)) => run_switch(session, &event),
        (Some(tag), None) => {
            session.filter_by_tag(&tag)?;
            Ok(Outcome::unchanged(render_view(session)))
        }
        (None, None) => Ok(Outcome::unchanged(render_view(session))),
    }
}

pub fn run_list(session: &mut Session) -> Outcome {
    session.list();
    Outcome::unchanged(render_view(session))
}
