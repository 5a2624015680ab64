use anyhow::Context;
use clap::Parser;
use eventbook::cli::{dispatch, run_shell, Cli};
use eventbook::config::Config;
use eventbook::{JsonStorage, Session};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

fn init_tracing() {
    let filter = tracing_subscriber::EnvFilter::new(
        std::env::var("RUST_LOG").unwrap_or_else(|_| "eventbook=info".into()),
    );

    // stdout is reserved for command output
    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

fn main() -> anyhow::Result<()> {
    init_tracing();

    let cli = Cli::parse();
    let config = Config::load(cli.data)?;
    let storage = JsonStorage::new(&config.data_path);
    let book = storage
        .load()
        .with_context(|| format!("Could not open {}", config.data_path.display()))?;
    let mut session = Session::new(book);

    match cli.command {
        None => {
            // No subcommand provided - start the interactive shell
            run_shell(&mut session, &storage, &config)?;
        }
        Some(command) => {
            let outcome = dispatch(&mut session, command, &storage, &config)?;
            if !outcome.message.is_empty() {
                println!("{}", outcome.message);
            }
        }
    }

    Ok(())
}
