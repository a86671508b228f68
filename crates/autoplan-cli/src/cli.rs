use clap::{Args, Parser, Subcommand, ValueEnum, ValueHint};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "autoplan", author, version, about = "Quarterly production and distribution planner", long_about = None)]
pub struct Cli {
    /// Set the logging level
    #[arg(long, default_value = "info", global = true)]
    pub log_level: tracing::Level,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Build and solve the quarterly plan
    Solve {
        #[command(flatten)]
        input: InputArgs,

        /// Solver settings file (TOML)
        #[arg(long, value_hint = ValueHint::FilePath)]
        config: Option<PathBuf>,

        /// MILP backend (overrides the config file)
        #[arg(long)]
        solver: Option<String>,

        /// Solver time limit in seconds
        #[arg(long)]
        time_limit: Option<f64>,

        /// Relative MIP gap
        #[arg(long)]
        mip_gap: Option<f64>,

        /// Output format for stdout
        #[arg(long, value_enum, default_value_t = OutputFormat::Plain)]
        format: OutputFormat,

        /// Write the JSON result to this file
        #[arg(short, long, value_hint = ValueHint::FilePath)]
        out: Option<PathBuf>,
    },
    /// Check network data (and an optional scenario) for inconsistencies
    Validate {
        #[command(flatten)]
        input: InputArgs,
    },
    /// Show model dimensions per constraint family without solving
    Inspect {
        #[command(flatten)]
        input: InputArgs,

        /// List every constraint
        #[arg(long)]
        constraints: bool,
    },
    /// Write the built-in reference quarter to a data file
    Baseline {
        /// Destination (.json, .yaml or .toml)
        #[arg(short, long, value_hint = ValueHint::FilePath)]
        out: PathBuf,
    },
}

#[derive(Args, Debug, Clone)]
pub struct InputArgs {
    /// Network data file; the built-in reference quarter when omitted
    #[arg(long, value_hint = ValueHint::FilePath)]
    pub network: Option<PathBuf>,

    /// Scenario file (YAML or JSON)
    #[arg(long, value_hint = ValueHint::FilePath)]
    pub scenario: Option<PathBuf>,
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    Plain,
    Json,
}
