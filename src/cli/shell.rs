//! Interactive shell for eventbook
//!
//! Reads one command per line with inquire and keeps the event selection
//! for as long as the shell runs.

use anyhow::{anyhow, bail, Result};
use clap::error::ErrorKind;
use clap::Parser;
use inquire::ui::{RenderConfig, Styled};
use inquire::Text;
use std::io::{self, IsTerminal};
use tracing::debug;

use super::display::render_view;
use super::{dispatch, Commands, ShellLine};
use crate::config::Config;
use crate::session::Session;
use crate::storage::JsonStorage;

const PROMPT: &str = "eventbook>";

#[derive(Debug, PartialEq, Eq)]
enum Step {
    Continue,
    Exit,
}

fn render_config() -> RenderConfig<'static> {
    RenderConfig::default_colored()
        .with_prompt_prefix(Styled::new(""))
        .with_answered_prompt_prefix(Styled::new(""))
}

/// Run the interactive shell until `exit`, Escape or Ctrl+C.
pub fn run_shell(session: &mut Session, storage: &JsonStorage, config: &Config) -> Result<()> {
    // TTY check: the shell requires a terminal
    if !io::stdin().is_terminal() {
        return Err(anyhow!(
            "Interactive shell requires a terminal. Use subcommands for non-interactive use:\n  \
            eventbook list\n  \
            eventbook switch <EVENT>\n  \
            eventbook search <TAG>\n  \
            Run 'eventbook --help' for all options."
        ));
    }

    println!("{}\n", render_view(session));

    loop {
        let line = Text::new(PROMPT)
            .with_render_config(render_config())
            .with_help_message("type `help` for commands, `exit` to leave")
            .prompt_skippable();

        // Ctrl+C, Escape or terminal errors all end the session
        let line = match line {
            Ok(Some(line)) => line,
            Ok(None) | Err(_) => return Ok(()),
        };

        match handle_line(session, storage, config, &line) {
            Ok(Step::Exit) => return Ok(()),
            Ok(Step::Continue) => {}
            Err(e) => eprintln!("Error: {e:#}"),
        }
        println!();
    }
}

fn handle_line(
    session: &mut Session,
    storage: &JsonStorage,
    config: &Config,
    line: &str,
) -> Result<Step> {
    let tokens = tokenize(line)?;
    if tokens.is_empty() {
        return Ok(Step::Continue);
    }
    let command = match ShellLine::try_parse_from(&tokens) {
        Ok(parsed) => parsed.command,
        Err(e)
            if matches!(
                e.kind(),
                ErrorKind::DisplayHelp | ErrorKind::DisplayHelpOnMissingArgumentOrSubcommand
            ) =>
        {
            let _ = e.print();
            return Ok(Step::Continue);
        }
        Err(e) => {
            let rendered = e.render().to_string();
            bail!("{}", rendered.trim_start_matches("error: ").trim_end())
        }
    };
    if matches!(command, Commands::Exit) {
        return Ok(Step::Exit);
    }
    debug!(line, "shell command");
    let outcome = dispatch(session, command, storage, config)?;
    if !outcome.message.is_empty() {
        println!("{}", outcome.message);
    }
    Ok(Step::Continue)
}

/// Splits a command line on whitespace. Double quotes group words and are
/// dropped from the token.
pub fn tokenize(line: &str) -> Result<Vec<String>> {
    let mut tokens = Vec::new();
    let mut current = String::new();
    let mut in_token = false;
    let mut quoted = false;

    for c in line.chars() {
        match c {
            '"' => {
                quoted = !quoted;
                in_token = true;
            }
            c if c.is_whitespace() && !quoted => {
                if in_token {
                    tokens.push(std::mem::take(&mut current));
                    in_token = false;
                }
            }
            c => {
                current.push(c);
                in_token = true;
            }
        }
    }
    if quoted {
        bail!("Unterminated quote in command.");
    }
    if in_token {
        tokens.push(current);
    }
    Ok(tokens)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    fn config(dir: &std::path::Path) -> Config {
        Config {
            data_path: dir.join("eventbook.json"),
            import_path: dir.join("import.csv"),
            export_path: dir.join("export.csv"),
        }
    }

    #[test]
    fn test_tokenize_plain_words() {
        assert_eq!(tokenize("  list   ").unwrap(), vec!["list"]);
        assert!(tokenize("   ").unwrap().is_empty());
    }

    #[test]
    fn test_tokenize_quotes_group_words() {
        assert_eq!(
            tokenize(r#"ctag standup --start "2024-01-01 09:00:00""#).unwrap(),
            vec!["ctag", "standup", "--start", "2024-01-01 09:00:00"]
        );
        assert_eq!(tokenize(r#"edit 1 -a "" "#).unwrap(), vec!["edit", "1", "-a", ""]);
        assert_eq!(tokenize(r#"add -n Al"ice T"an"#).unwrap(), vec!["add", "-n", "Alice Tan"]);
    }

    #[test]
    fn test_tokenize_unterminated_quote() {
        assert!(tokenize(r#"add -n "Alice"#).is_err());
    }

    #[test]
    fn test_handle_line_saves_changes() {
        let dir = tempdir().unwrap();
        let config = config(dir.path());
        let storage = JsonStorage::new(&config.data_path);
        let mut session = Session::default();

        let step = handle_line(&mut session, &storage, &config, "ctag friends").unwrap();
        assert_eq!(step, Step::Continue);
        assert!(storage.load().unwrap().has_tag("friends"));

        handle_line(&mut session, &storage, &config, "list").unwrap();
        assert_eq!(handle_line(&mut session, &storage, &config, "exit").unwrap(), Step::Exit);
    }

    #[test]
    fn test_handle_line_reports_errors() {
        let dir = tempdir().unwrap();
        let config = config(dir.path());
        let storage = JsonStorage::new(&config.data_path);
        let mut session = Session::default();

        assert!(handle_line(&mut session, &storage, &config, "switch party").is_err());
        assert!(handle_line(&mut session, &storage, &config, "frobnicate").is_err());
        assert_eq!(handle_line(&mut session, &storage, &config, "").unwrap(), Step::Continue);
    }
}
