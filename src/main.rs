//! flowsync - Sync and localize conversational Flow resources.
//!
//! A Flow lives on the platform as a chart of nodes plus a set of intents.
//! flowsync keeps local JSON snapshots of Flows in sync and drives the
//! per-locale text variants attached to them.

mod checks;
mod cli;
mod config;
mod platform;
mod utils;

use clap::Parser;
use cli::{Cli, Commands};
use colored::Colorize;
use platform::LocalizeOptions;
use std::process::ExitCode;

fn main() -> ExitCode {
    let cli = Cli::parse();

    // Initialize logging
    let log_level = if cli.verbose { "debug" } else { "warn" };
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(format!("flowsync={}", log_level).parse().unwrap()),
        )
        .with_target(false)
        .init();

    match run(cli) {
        Ok(code) => code,
        Err(err) => {
            eprintln!("{} {:#}", "✗".red(), err);
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> anyhow::Result<ExitCode> {
    match cli.command {
        Commands::Init => cli::commands::init(),
        Commands::Locales => cli::commands::locales(),
        Commands::Pull {
            resource_type,
            resource_name,
        } => cli::commands::pull(&resource_type, &resource_name),
        Commands::Localize {
            resource_type,
            resource_name,
            locale_name,
            force_yes,
            reverse,
        } => {
            let options = LocalizeOptions {
                locale_name: locale_name.unwrap_or_default(),
                force_yes,
                reverse,
            };
            cli::commands::localize(&resource_type, &resource_name, options)
        }
    }
}
