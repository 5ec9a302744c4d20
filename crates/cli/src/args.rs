//! Command-line arguments.

use std::path::PathBuf;

use bh_protocol::script_models::ScriptKind;
use clap::{Args, Parser, Subcommand, ValueEnum};

#[derive(Debug, Parser)]
#[command(name = "bench", version, about = "Run and inspect load tests")]
pub struct Cli {
    /// Show engine output and debug logs.
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Run a load-test script locally or on the configured runner.
    Run(RunArgs),
    /// Report whether a JMeter results file contains failed samples.
    Classify(ClassifyArgs),
    /// Show how a target host is split into protocol, host and port.
    Target(TargetArgs),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum KindArg {
    Locust,
    Jmeter,
}

impl From<KindArg> for ScriptKind {
    fn from(kind: KindArg) -> Self {
        match kind {
            KindArg::Locust => ScriptKind::Locust,
            KindArg::Jmeter => ScriptKind::JMeter,
        }
    }
}

/// Arguments for `bench run`.
#[derive(Debug, Args)]
pub struct RunArgs {
    /// Script file (locustfile or .jmx plan).
    #[arg(long)]
    pub script: PathBuf,

    /// Engine; inferred from the file extension when omitted.
    #[arg(long, value_enum)]
    pub kind: Option<KindArg>,

    #[arg(short, long, default_value_t = 10, value_parser = clap::value_parser!(u32).range(1..))]
    pub users: u32,

    #[arg(short = 'r', long, default_value_t = 1, value_parser = clap::value_parser!(u32).range(1..))]
    pub spawn_rate: u32,

    /// Run time in seconds.
    #[arg(short, long, default_value_t = 60, value_parser = clap::value_parser!(u32).range(1..))]
    pub duration: u32,

    /// Target host; defaults to the configured host.
    #[arg(long)]
    pub host: Option<String>,

    /// Transactions per minute passed to JMeter plans.
    #[arg(long)]
    pub tpm: Option<u32>,

    /// Task name used in report names; defaults to the script file stem.
    #[arg(long)]
    pub name: Option<String>,

    /// Delegate to this runner instead of running locally.
    #[arg(long)]
    pub runner_url: Option<String>,

    /// Directory containing `.bench-hub/config.toml`.
    #[arg(long, default_value = ".")]
    pub config_root: PathBuf,

    /// Print the final task as JSON.
    #[arg(long)]
    pub json: bool,
}

/// Arguments for `bench classify`.
#[derive(Debug, Args)]
pub struct ClassifyArgs {
    /// Results file with a `success` column.
    pub file: PathBuf,
}

/// Arguments for `bench target`.
#[derive(Debug, Args)]
pub struct TargetArgs {
    /// Host URL, e.g. `https://api.example.com:8443`.
    pub host: String,

    /// Used when `host` is blank.
    #[arg(long, default_value = bh_protocol::config_models::DEFAULT_TARGET_HOST)]
    pub default: String,
}
