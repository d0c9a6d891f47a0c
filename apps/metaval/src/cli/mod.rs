//! # Metaval CLI Module
//!
//! This module implements the CLI interface for Metaval.
//!
//! ## Available Commands
//!
//! - `shell` - Interactive dashboard session (default)
//! - `pages` - List navigable pages
//! - `stages` - Show a workflow's stage indicator
//! - `draft` - Validate form values and print the draft document
//! - `walk` - Step through the request workflow end to end
//! - `search` - Filter the contract repository

mod commands;
mod render;
pub mod shell;

use clap::{Parser, Subcommand};
use metaval_core::MetavalError;
use std::path::PathBuf;

pub use commands::*;

// =============================================================================
// CLI STRUCTURE
// =============================================================================

/// Metaval - Contract Lifecycle Dashboard
///
/// Drive the contract request workflow, generation, exit and search modules
/// from the terminal.
#[derive(Parser, Debug)]
#[command(name = "metaval")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Suppress banner output
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Configuration file (defaults to ./metaval.toml when present)
    #[arg(short = 'c', long, global = true)]
    pub config: Option<PathBuf>,

    /// Output in JSON format (for programmatic access)
    #[arg(long, global = true)]
    pub json_mode: bool,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Available CLI commands.
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Start an interactive session
    Shell {
        /// Page to open first (e.g. `requests:list`)
        #[arg(short, long, default_value = "dashboard")]
        page: String,

        /// Seed for assistant replies (random when omitted)
        #[arg(long)]
        seed: Option<u64>,
    },

    /// List navigable pages
    Pages,

    /// Show a stage indicator
    Stages {
        /// Workflow (request, lifecycle)
        #[arg(short, long, default_value = "request")]
        workflow: String,

        /// Current stage (1-based)
        #[arg(short = 'n', long, default_value = "1")]
        current: usize,
    },

    /// Validate form values and print the resulting draft
    Draft {
        /// Field assignment `key=value`, repeatable
        #[arg(short = 's', long = "set", value_name = "KEY=VALUE")]
        fields: Vec<String>,
    },

    /// Submit a request and step through every workflow stage
    Walk {
        /// Contract name
        #[arg(short, long)]
        name: String,

        /// Contract type
        #[arg(short = 't', long)]
        contract_type: String,
    },

    /// Search contracts and clauses
    Search {
        /// Saved view (all, my, expiring, high-risk, nda)
        #[arg(long, default_value = "all")]
        view: String,

        /// Free-text query
        #[arg(long, default_value = "")]
        query: String,

        /// Search the clause library instead of contracts
        #[arg(long)]
        clauses: bool,
    },
}

// =============================================================================
// COMMAND EXECUTION
// =============================================================================

/// Execute the CLI with parsed arguments.
pub async fn execute(cli: Cli) -> Result<(), MetavalError> {
    let config = load_config(cli.config.as_deref())?;
    let json_mode = cli.json_mode;

    match cli.command {
        Some(Commands::Shell { page, seed }) => cmd_shell(&config, json_mode, &page, seed).await,
        Some(Commands::Pages) => cmd_pages(json_mode),
        Some(Commands::Stages { workflow, current }) => {
            cmd_stages(json_mode, &workflow, current)
        }
        Some(Commands::Draft { fields }) => cmd_draft(&config, json_mode, &fields),
        Some(Commands::Walk {
            name,
            contract_type,
        }) => cmd_walk(&config, json_mode, cli.verbose, &name, &contract_type),
        Some(Commands::Search {
            view,
            query,
            clauses,
        }) => cmd_search(&config, json_mode, &view, &query, clauses),
        None => {
            // No subcommand - open the shell on the dashboard
            cmd_shell(&config, json_mode, "dashboard", None).await
        }
    }
}
