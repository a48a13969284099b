//! # tomgate CLI Module
//!
//! This module implements the CLI interface for tomgate.
//!
//! ## Available Commands
//!
//! - `serve` - Start the evaluation API
//! - `phases` - List the effective phases
//! - `derive` - Derive a phase from signals
//! - `readiness` - Readiness of an item in its phase
//! - `transition` - Check a proposed change for a phase transition
//! - `summary` - Count items per phase
//! - `validate` - Validate the configuration file
//! - `init` - Write the default configuration
//! - `hash` - Fingerprint the effective configuration

mod commands;

use crate::config::{DEFAULT_CONFIG_PATH, load_config};
use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;
use tomgate_core::{GovernanceGateInput, PhaseSignals, TomError};

pub use commands::*;

// =============================================================================
// CLI STRUCTURE
// =============================================================================

/// tomgate - lifecycle phase engine
///
/// Derives the lifecycle phase of a portfolio work item from its status,
/// deployment state, manual override and governance gates.
#[derive(Parser, Debug)]
#[command(name = "tomgate")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Suppress banner output
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Path to the configuration file (.toml or .json)
    #[arg(short, long, global = true, default_value = DEFAULT_CONFIG_PATH)]
    pub config: PathBuf,

    /// Evaluate against this preset instead of the configured one
    #[arg(long, global = true)]
    pub preset: Option<String>,

    /// Output in JSON format (for programmatic access)
    #[arg(long, global = true)]
    pub json_mode: bool,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Operating-model gate outcome given on the command line.
#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum GateArg {
    Passed,
    Failed,
}

impl GateArg {
    #[must_use]
    pub fn to_input(self) -> GovernanceGateInput {
        GovernanceGateInput::operating_model(self == GateArg::Passed)
    }
}

/// Available CLI commands.
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Start the HTTP evaluation server
    Serve {
        /// Host to bind to
        #[arg(short = 'H', long, default_value = "127.0.0.1")]
        host: String,

        /// Port to bind to
        #[arg(short, long, default_value = "8080")]
        port: u16,
    },

    /// List the effective phases in order
    Phases,

    /// Derive the phase for a status / deployment / override
    Derive {
        /// Use-case status label
        #[arg(short, long)]
        status: Option<String>,

        /// Deployment status label
        #[arg(short, long)]
        deployment: Option<String>,

        /// Manual override phase id
        #[arg(short = 'o', long = "override")]
        phase_override: Option<String>,

        /// Operating-model gate outcome
        #[arg(short, long, value_enum)]
        gate: Option<GateArg>,
    },

    /// Readiness of an item in its derived (or the given) phase
    Readiness {
        /// Path to the item JSON file
        #[arg(short, long)]
        input: PathBuf,

        /// Evaluate this phase instead of the derived one
        #[arg(long)]
        phase: Option<String>,
    },

    /// Check a proposed change to an item for a phase transition
    Transition {
        /// Path to the item JSON file (the current state)
        #[arg(short, long)]
        input: PathBuf,

        /// Proposed use-case status
        #[arg(short, long)]
        status: Option<String>,

        /// Proposed deployment status
        #[arg(short, long)]
        deployment: Option<String>,

        /// Proposed manual override phase id
        #[arg(short = 'o', long = "override")]
        phase_override: Option<String>,
    },

    /// Count items per derived phase
    Summary {
        /// Path to a JSON array of items
        #[arg(short, long)]
        input: PathBuf,
    },

    /// Validate the configuration file
    Validate,

    /// Write the default configuration to the config path
    Init {
        /// Overwrite an existing file
        #[arg(short, long)]
        force: bool,
    },

    /// Fingerprint the effective configuration
    Hash,
}

/// Proposed signals: the item's current ones with the given flags replacing them.
#[must_use]
pub fn proposed_signals(
    current: &PhaseSignals,
    status: Option<String>,
    deployment: Option<String>,
    phase_override: Option<String>,
) -> PhaseSignals {
    PhaseSignals {
        status: status.or_else(|| current.status.clone()),
        deployment: deployment.or_else(|| current.deployment.clone()),
        phase_override: phase_override.or_else(|| current.phase_override.clone()),
    }
}

// =============================================================================
// COMMAND EXECUTION
// =============================================================================

/// Execute the CLI with parsed arguments.
///
/// No subcommand lists the effective phases.
pub async fn execute(cli: Cli) -> Result<(), TomError> {
    let json_mode = cli.json_mode;
    let preset = cli.preset.as_deref();
    let command = cli.command.unwrap_or(Commands::Phases);
    let load = || load_config(&cli.config, preset);

    match command {
        Commands::Init { force } => cmd_init(&cli.config, force),
        Commands::Validate => cmd_validate(&cli.config, preset, json_mode),
        Commands::Serve { host, port } => cmd_serve(load()?, &host, port).await,
        Commands::Phases => cmd_phases(&load()?, json_mode, cli.verbose),
        Commands::Derive {
            status,
            deployment,
            phase_override,
            gate,
        } => {
            let signals = PhaseSignals {
                status,
                deployment,
                phase_override,
            };
            cmd_derive(&load()?, json_mode, &signals, gate.map(GateArg::to_input))
        }
        Commands::Readiness { input, phase } => {
            cmd_readiness(&load()?, json_mode, &input, phase.as_deref())
        }
        Commands::Transition {
            input,
            status,
            deployment,
            phase_override,
        } => cmd_transition(
            &load()?,
            json_mode,
            &input,
            status,
            deployment,
            phase_override,
        ),
        Commands::Summary { input } => cmd_summary(&load()?, json_mode, &input),
        Commands::Hash => cmd_hash(&load()?, json_mode),
    }
}

// =============================================================================
// TESTS
// =============================================================================
