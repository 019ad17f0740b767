use std::{io, process::ExitCode};

use clap::Parser;

use tgctl_core::{config::CredentialsFile, errors::Error};

mod cli;
mod commands;

use cli::{Cli, Command};
use commands::App;

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    if let Err(e) = tgctl_core::logging::init("tgctl", cli.verbose) {
        eprintln!("logging disabled: {e}");
    }

    let app = App::new(CredentialsFile::locate(cli.env_file.as_deref()));
    let command = cli.command;
    let action = command.action();
    let hint = command.remote_hint();

    let mut out = io::stdout();
    match app.run(command, &mut out).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            report(action, hint, &e);
            ExitCode::FAILURE
        }
    }
}

fn report(action: &str, hint: Option<&str>, err: &anyhow::Error) {
    match err.downcast_ref::<Error>() {
        Some(e @ (Error::ContactNotFound(_) | Error::MissingTarget(_))) => {
            eprintln!("❌ {e}");
        }
        Some(e) if e.is_config() => {
            eprintln!("❌ Configuration Error: {e}");
            eprintln!("\n💡 Run 'tgctl init' to set up your bot");
        }
        _ => {
            eprintln!("❌ Failed to {action}: {err:#}");
            if let Some(h) = hint {
                eprintln!("\n💡 {h}");
            }
        }
    }
}
