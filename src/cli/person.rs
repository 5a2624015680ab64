use anyhow::{bail, Context, Result};

use super::display::format_person;
use super::{AddArgs, AssignArgs, EditArgs, Outcome};
use crate::models::{Address, Email, Name, Person, Phone, Tag, TagName};
use crate::session::Session;

/// Resolves an INDEX (1-based, current list) or an exact NAME shown in the
/// current list.
///
/// A number that is a valid index wins over a shown person named by that
/// number. Out-of-range numbers fall back to a name lookup, so an all-digit
/// name stays reachable unless it collides with a shown position.
pub fn resolve_target(session: &Session, target: &str) -> Result<Name> {
    let target = target.trim();
    if target.is_empty() {
        bail!("Please provide either a name or index.");
    }
    let Ok(index) = target.parse::<usize>() else {
        return Ok(session.find_shown(&Name::parse(target)?)?.name.clone());
    };
    match session.person_at(index) {
        Ok(person) => Ok(person.name.clone()),
        Err(index_err) => match Name::parse(target).map(|n| session.find_shown(&n)) {
            Ok(Ok(person)) => Ok(person.name.clone()),
            _ => Err(index_err.into()),
        },
    }
}

fn parse_tags(names: &[String]) -> Result<Vec<Tag>> {
    names
        .iter()
        .map(|n| Ok(Tag::plain(TagName::parse(n)?)))
        .collect()
}

pub fn run_add(session: &mut Session, args: AddArgs) -> Result<Outcome> {
    let person = Person::new(
        Name::parse(&args.name)?,
        Phone::parse(&args.phone)?,
        Email::parse(&args.email)?,
        Address::parse(&args.address)?,
    )
    .with_tags(parse_tags(&args.tags)?);
    let message = format!("New person added: {}", format_person(&person));
    session.add_person(person)?;
    Ok(Outcome::changed(message))
}

pub fn run_edit(session: &mut Session, args: EditArgs) -> Result<Outcome> {
    let target = resolve_target(session, &args.target)?;
    if args.name.is_none()
        && args.phone.is_none()
        && args.email.is_none()
        && args.address.is_none()
        && args.tags.is_empty()
    {
        bail!("At least one field to edit must be provided.");
    }
    let current = session
        .book()
        .person(&target)
        .with_context(|| format!("person not found: {target}"))?;

    let mut edited = Person::new(
        match &args.name {
            Some(n) => Name::parse(n)?,
            None => current.name.clone(),
        },
        match &args.phone {
            Some(p) => Phone::parse(p)?,
            None => current.phone.clone(),
        },
        match &args.email {
            Some(e) => Email::parse(e)?,
            None => current.email.clone(),
        },
        match &args.address {
            Some(a) => Address::parse(a)?,
            None => current.address.clone(),
        },
    )
    .with_tags(current.event_tags().cloned());
    edited = if args.tags.is_empty() {
        edited.with_tags(current.tags().cloned())
    } else {
        edited.with_tags(parse_tags(&args.tags)?)
    };

    let message = format!("Edited Person: {}", format_person(&edited));
    session.edit_person(&target, edited)?;
    Ok(Outcome::changed(message))
}

pub fn run_delete(session: &mut Session, target: &str) -> Result<Outcome> {
    let target = resolve_target(session, target)?;
    let removed = session.delete_person(&target)?;
    Ok(Outcome::changed(format!(
        "Deleted Person: {}",
        format_person(&removed)
    )))
}

pub fn run_assign(session: &mut Session, args: AssignArgs) -> Result<Outcome> {
    if args.tags.is_empty() && args.events.is_empty() {
        bail!("Provide at least one --tag or --event to assign.");
    }
    let target = resolve_target(session, &args.target)?;
    let tags: Vec<&str> = args.tags.iter().map(String::as_str).collect();
    let events: Vec<&str> = args.events.iter().map(String::as_str).collect();
    session.assign(&target, &tags, &events)?;

    let person = session
        .book()
        .person(&target)
        .with_context(|| format!("person not found: {target}"))?;
    Ok(Outcome::changed(format!(
        "Assigned Person: {}",
        format_person(person)
    )))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::BookError;
    use crate::models::parse_timestamp;

    fn add_args(name: &str, tags: &[&str]) -> AddArgs {
        AddArgs {
            name: name.to_string(),
            phone: "94351253".to_string(),
            email: "someone@example.com".to_string(),
            address: "1 Main St".to_string(),
            tags: tags.iter().map(|t| t.to_string()).collect(),
        }
    }

    fn session() -> Session {
        let mut session = Session::default();
        session
            .create_event_tag(
                "standup",
                "daily sync",
                parse_timestamp("2024-01-01 09:00:00").unwrap(),
                parse_timestamp("2024-01-01 09:15:00").unwrap(),
            )
            .unwrap();
        run_add(&mut session, add_args("Alice", &["friends"])).unwrap();
        run_add(&mut session, add_args("Bob", &[])).unwrap();
        session
    }

    fn book_error(err: &anyhow::Error) -> &BookError {
        err.downcast_ref::<BookError>().unwrap()
    }

    #[test]
    fn test_add_registers_new_tags() {
        let session = session();
        assert!(session.book().has_tag("friends"));
        assert_eq!(session.book().persons().len(), 2);
    }

    #[test]
    fn test_add_duplicate_name() {
        let mut session = session();
        let err = run_add(&mut session, add_args("Alice", &[])).unwrap_err();
        assert!(book_error(&err).is_duplicate());
    }

    #[test]
    fn test_add_invalid_phone() {
        let mut session = Session::default();
        let mut args = add_args("Alice", &[]);
        args.phone = "12".to_string();
        let err = run_add(&mut session, args).unwrap_err();
        assert!(err.to_string().contains("phone"));
        assert!(session.book().persons().is_empty());
    }

    #[test]
    fn test_resolve_target_by_index_and_name() {
        let mut session = session();
        assert_eq!(resolve_target(&session, "2").unwrap().as_str(), "Bob");
        assert_eq!(resolve_target(&session, "Alice").unwrap().as_str(), "Alice");
        assert!(resolve_target(&session, "3").is_err());
        assert!(resolve_target(&session, "").is_err());

        session.filter_by_tag("friends").unwrap();
        assert_eq!(resolve_target(&session, "1").unwrap().as_str(), "Alice");
        assert!(resolve_target(&session, "Bob").is_err());
    }

    #[test]
    fn test_resolve_target_all_digit_name() {
        let mut session = session();
        run_add(&mut session, add_args("007", &[])).unwrap();
        assert_eq!(resolve_target(&session, "007").unwrap().as_str(), "007");
        assert_eq!(resolve_target(&session, "3").unwrap().as_str(), "007");

        run_add(&mut session, add_args("2", &[])).unwrap();
        assert_eq!(resolve_target(&session, "2").unwrap().as_str(), "Bob");
        assert_eq!(resolve_target(&session, "4").unwrap().as_str(), "2");

        let err = resolve_target(&session, "9").unwrap_err();
        assert!(book_error(&err).is_not_found());
        assert!(err.to_string().contains("#9"));
    }

    #[test]
    fn test_edit_keeps_events_and_tags() {
        let mut session = session();
        session
            .assign(&Name::parse("Alice").unwrap(), &[], &["standup"])
            .unwrap();
        run_edit(
            &mut session,
            EditArgs {
                target: "Alice".to_string(),
                name: None,
                phone: Some("99999999".to_string()),
                email: None,
                address: None,
                tags: vec![],
            },
        )
        .unwrap();
        let alice = session.book().person(&Name::parse("Alice").unwrap()).unwrap();
        assert_eq!(alice.phone.as_str(), "99999999");
        assert_eq!(alice.tags().count(), 1);
        assert_eq!(alice.event_tags().count(), 1);
    }

    #[test]
    fn test_edit_replaces_tags() {
        let mut session = session();
        run_edit(
            &mut session,
            EditArgs {
                target: "1".to_string(),
                name: Some("Alicia".to_string()),
                phone: None,
                email: None,
                address: None,
                tags: vec!["gym".to_string()],
            },
        )
        .unwrap();
        let alicia = session.book().person(&Name::parse("Alicia").unwrap()).unwrap();
        let tags: Vec<_> = alicia.tags().map(|t| t.name().as_str()).collect();
        assert_eq!(tags, vec!["gym"]);
        assert!(session.book().has_tag("gym"));
    }

    #[test]
    fn test_edit_requires_a_field() {
        let mut session = session();
        let err = run_edit(
            &mut session,
            EditArgs {
                target: "1".to_string(),
                name: None,
                phone: None,
                email: None,
                address: None,
                tags: vec![],
            },
        )
        .unwrap_err();
        assert!(err.to_string().contains("At least one field"));
    }

    #[test]
    fn test_delete_by_index() {
        let mut session = session();
        let outcome = run_delete(&mut session, "1").unwrap();
        assert!(outcome.changed);
        assert!(outcome.message.starts_with("Deleted Person: Alice"));
        assert_eq!(session.book().persons().len(), 1);
    }

    #[test]
    fn test_assign_unknown_event() {
        let mut session = session();
        let err = run_assign(
            &mut session,
            AssignArgs {
                target: "Bob".to_string(),
                tags: vec![],
                events: vec!["party".to_string()],
            },
        )
        .unwrap_err();
        assert!(book_error(&err).is_unknown_tag());
    }

    #[test]
    fn test_assign_requires_labels() {
        let mut session = session();
        let args = AssignArgs {
            target: "Bob".to_string(),
            tags: vec![],
            events: vec![],
        };
        assert!(run_assign(&mut session, args).is_err());
    }

    #[test]
    fn test_assign_event() {
        let mut session = session();
        let outcome = run_assign(
            &mut session,
            AssignArgs {
                target: "2".to_string(),
                tags: vec!["friends".to_string()],
                events: vec!["standup".to_string()],
            },
        )
        .unwrap();
        assert!(outcome.message.starts_with("Assigned Person: Bob"));
        session.select_event("standup").unwrap();
        assert_eq!(session.filtered_persons().len(), 1);
    }
}
