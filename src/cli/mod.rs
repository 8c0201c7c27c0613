//! CLI definitions and command implementations for flowsync.

pub mod commands;

use clap::{Parser, Subcommand};

/// flowsync - Sync and localize conversational Flow resources
#[derive(Parser)]
#[command(name = "flowsync")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Create the flowsync configuration interactively
    Init,

    /// List the locales known to the platform
    Locales,

    /// Download a Flow into the local flows directory
    Pull {
        /// Resource type to pull (only "flow" is supported)
        resource_type: String,

        /// Name of the resource
        resource_name: String,
    },

    /// Add or remove per-locale text variants on a Flow's nodes and intents
    Localize {
        /// Resource type to localize (only "flow" is supported)
        resource_type: String,

        /// Name of the resource
        resource_name: String,

        /// Name of the target locale (must exist on the platform)
        #[arg(short = 'l', long)]
        locale_name: Option<String>,

        /// Skip the interactive confirmation prompt
        #[arg(short = 'y', long)]
        force_yes: bool,

        /// Remove localizations instead of adding them
        #[arg(short, long)]
        reverse: bool,
    },
}
