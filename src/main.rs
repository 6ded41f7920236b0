use clap::Parser;
use std::{
    env,
    io::{self, IsTerminal},
    process,
};
use todo::config::{Cli, Settings};
use todo::error::Result;
use todo::ui::Session;
use tracing_subscriber::EnvFilter;

fn main() {
    // Logs go to stderr so they never mix with the session on stdout.
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_env("TODO_LOG").unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(io::stderr)
        .init();

    let cli = Cli::parse();
    if let Err(err) = run(&cli) {
        eprintln!("Error: {err}");
        process::exit(1);
    }
}

fn run(cli: &Cli) -> Result<()> {
    let mut settings = Settings::resolve(cli)?;
    if env::var_os("NO_COLOR").is_some() || !io::stdout().is_terminal() {
        settings.color = false;
    }

    let stdin = io::stdin();
    let mut session = Session::new(stdin.lock(), io::stdout(), &settings);
    session.run()?;
    tracing::debug!(remaining = session.tasks().len(), "session finished");
    Ok(())
}
