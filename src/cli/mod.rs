use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};

use crate::config::Config;
use crate::session::Session;
use crate::storage::JsonStorage;

pub mod display;
pub mod person;
pub mod shell;
pub mod tag;
pub mod transfer;
pub mod view;

pub use shell::{run_shell, tokenize};

#[derive(Parser)]
#[command(name = "eventbook")]
#[command(about = "Contacts organised by tags and events")]
#[command(version)]
pub struct Cli {
    /// Path to the data file
    #[arg(long, global = true, value_name = "PATH")]
    pub data: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// One line typed into the interactive shell.
#[derive(Parser)]
#[command(no_binary_name = true, disable_version_flag = true)]
pub struct ShellLine {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Add a person
    Add(AddArgs),
    /// Edit the person at INDEX (or with NAME) in the current list
    Edit(EditArgs),
    /// Delete the person at INDEX (or with NAME) in the current list
    Delete(TargetArgs),
    /// Create a tag, or an event tag with --event
    Ctag(CtagArgs),
    /// Delete a tag and remove it from every person
    Dtag(NameArgs),
    /// Delete an event tag and remove it from every person
    Devent(NameArgs),
    /// Assign existing tags and event tags to a person
    Assign(AssignArgs),
    /// Show only the persons in an event
    Switch(NameArgs),
    /// Filter by tag (within the current event), or switch with --event
    Search(SearchArgs),
    /// Show everyone and leave the current event
    List,
    /// List tags
    Tags,
    /// List event tags
    Events,
    /// Add persons from a CSV file
    Import(PathArgs),
    /// Write the current list to a CSV file
    Export(PathArgs),
    /// Remove all persons and tags
    Clear,
    /// Leave the shell
    #[command(alias = "quit")]
    Exit,
}

#[derive(Args)]
pub struct AddArgs {
    #[arg(short, long)]
    pub name: String,
    #[arg(short, long)]
    pub phone: String,
    #[arg(short, long)]
    pub email: String,
    #[arg(short, long)]
    pub address: String,
    /// Tag to attach; registered if new (repeatable)
    #[arg(short, long = "tag", value_name = "TAG")]
    pub tags: Vec<String>,
}

#[derive(Args)]
pub struct EditArgs {
    /// 1-based index or full name
    pub target: String,
    #[arg(short, long)]
    pub name: Option<String>,
    #[arg(short, long)]
    pub phone: Option<String>,
    #[arg(short, long)]
    pub email: Option<String>,
    #[arg(short, long)]
    pub address: Option<String>,
    /// Replaces the person's plain tags (repeatable)
    #[arg(short, long = "tag", value_name = "TAG")]
    pub tags: Vec<String>,
}

#[derive(Args)]
pub struct TargetArgs {
    /// 1-based index or full name
    pub target: String,
}

#[derive(Args)]
pub struct NameArgs {
    pub name: String,
}

#[derive(Args)]
pub struct CtagArgs {
    pub name: String,
    /// Create an event tag instead of a plain tag
    #[arg(long, requires_all = ["start", "end"])]
    pub event: bool,
    #[arg(short, long, requires = "event")]
    pub description: Option<String>,
    /// Start time, `yyyy-MM-dd HH:mm:ss`
    #[arg(short, long, requires = "event")]
    pub start: Option<String>,
    /// End time, `yyyy-MM-dd HH:mm:ss`
    #[arg(long, requires = "event")]
    pub end: Option<String>,
}

#[derive(Args)]
pub struct AssignArgs {
    /// 1-based index or full name
    pub target: String,
    #[arg(short, long = "tag", value_name = "TAG")]
    pub tags: Vec<String>,
    #[arg(short, long = "event", value_name = "EVENT")]
    pub events: Vec<String>,
}

#[derive(Args)]
pub struct SearchArgs {
    #[arg(required_unless_present = "event", conflicts_with = "event")]
    pub tag: Option<String>,
    #[arg(long, value_name = "EVENT")]
    pub event: Option<String>,
}

#[derive(Args)]
pub struct PathArgs {
    pub path: Option<PathBuf>,
}

/// What a command produced.
#[derive(Debug, Default, PartialEq, Eq)]
pub struct Outcome {
    pub message: String,
    /// The graph changed and should be saved.
    pub changed: bool,
}

impl Outcome {
    fn changed(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            changed: true,
        }
    }

    fn unchanged(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            changed: false,
        }
    }
}

/// Runs one command against the session. `Exit` is a no-op here; the
/// shell handles it before dispatch.
pub fn execute(session: &mut Session, command: Commands, config: &Config) -> Result<Outcome> {
    match command {
        Commands::Add(args) => person::run_add(session, args),
        Commands::Edit(args) => person::run_edit(session, args),
        Commands::Delete(args) => person::run_delete(session, &args.target),
        Commands::Assign(args) => person::run_assign(session, args),
        Commands::Ctag(args) => tag::run_ctag(session, args),
        Commands::Dtag(args) => tag::run_dtag(session, &args.name),
        Commands::Devent(args) => tag::run_devent(session, &args.name),
        Commands::Tags => Ok(tag::run_tags(session)),
        Commands::Events => Ok(tag::run_events(session)),
        Commands::Switch(args) => view::run_switch(session, &args.name),
        Commands::Search(args) => view::run_search(session, args),
        Commands::List => Ok(view::run_list(session)),
        Commands::Import(args) => {
            let path = args.path.unwrap_or_else(|| config.import_path.clone());
            transfer::run_import(session, &path)
        }
        Commands::Export(args) => {
            let path = args.path.unwrap_or_else(|| config.export_path.clone());
            transfer::run_export(session, &path)
        }
        Commands::Clear => {
            session.clear();
            Ok(Outcome::changed("Event book has been cleared!"))
        }
        Commands::Exit => Ok(Outcome::default()),
    }
}

/// Runs a command and saves the book when it changed. A failed import may
/// have applied earlier rows, so it is saved as well.
pub fn dispatch(
    session: &mut Session,
    command: Commands,
    storage: &JsonStorage,
    config: &Config,
) -> Result<Outcome> {
    let saves_on_error = matches!(command, Commands::Import(_));
    let result = execute(session, command, config);
    if matches!(&result, Ok(outcome) if outcome.changed) || (result.is_err() && saves_on_error) {
        storage
            .save(session.book())
            .with_context(|| format!("Could not save {}", storage.path().display()))?;
    }
    result
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(line: &str) -> Result<Commands, clap::Error> {
        ShellLine::try_parse_from(tokenize(line).unwrap()).map(|l| l.command)
    }

    #[test]
    fn test_parse_add() {
        let Commands::Add(args) = parse(concat!(
            r#"add -n "Alice Tan" -p 94351253 -e alice@example.com "#,
            r#"-a "1 Main St" -t friends -t gym"#,
        ))
        .unwrap() else {
            panic!("expected add");
        };
        assert_eq!(args.name, "Alice Tan");
        assert_eq!(args.address, "1 Main St");
        assert_eq!(args.tags, vec!["friends", "gym"]);
    }

    #[test]
    fn test_parse_ctag_event_needs_times() {
        assert!(parse("ctag standup --event --start \"2024-01-01 09:00:00\"").is_err());
        assert!(parse("ctag standup --start \"2024-01-01 09:00:00\"").is_err());
        let Commands::Ctag(args) = parse(concat!(
            r#"ctag standup --event -d "daily sync" "#,
            r#"--start "2024-01-01 09:00:00" --end "2024-01-01 09:15:00""#,
        ))
        .unwrap() else {
            panic!("expected ctag");
        };
        assert!(args.event);
        assert_eq!(args.description.as_deref(), Some("daily sync"));
        assert_eq!(args.end.as_deref(), Some("2024-01-01 09:15:00"));
    }

    #[test]
    fn test_parse_search_variants() {
        assert!(matches!(
            parse("search friends").unwrap(),
            Commands::Search(SearchArgs { tag: Some(_), event: None })
        ));
        assert!(matches!(
            parse("search --event standup").unwrap(),
            Commands::Search(SearchArgs { tag: None, event: Some(_) })
        ));
        assert!(parse("search").is_err());
        assert!(parse("search friends --event standup").is_err());
    }

    #[test]
    fn test_parse_exit_alias() {
        assert!(matches!(parse("quit").unwrap(), Commands::Exit));
        assert!(matches!(parse("exit").unwrap(), Commands::Exit));
    }

    #[test]
    fn test_parse_listing_commands() {
        assert!(matches!(parse("tags").unwrap(), Commands::Tags));
        assert!(matches!(parse("events").unwrap(), Commands::Events));
        assert!(parse("tags friends").is_err());
    }

    #[test]
    fn test_cli_global_data_flag() {
        let cli = Cli::try_parse_from(["eventbook", "list", "--data", "book.json"]).unwrap();
        assert_eq!(cli.data, Some(PathBuf::from("book.json")));
        assert!(matches!(cli.command, Some(Commands::List)));
    }
}
