use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

#[derive(Parser)]
#[command(
    name = "rdv",
    about = "Worker rendezvous — simulate name registration and barriers over a shared store",
    version,
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[arg(long, global = true, default_value = "text")]
    pub format: OutputFormat,

    /// Agent configuration file (TOML)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Key prefix for the simulated group
    #[arg(long, global = true)]
    pub prefix: Option<String>,

    /// Give up blocking store calls after this many milliseconds
    #[arg(long, global = true)]
    pub timeout_ms: Option<u64>,
}

#[derive(Clone, Debug, clap::ValueEnum)]
pub enum OutputFormat {
    Text,
    Json,
}

#[derive(Subcommand)]
pub enum Command {
    /// Register a fixed-size group, one thread per worker
    Static(StaticArgs),
    /// Register workers one after another through the roster
    Dynamic(DynamicArgs),
    /// Run call-count barriers across a group
    Barrier(BarrierArgs),
    /// Show the effective configuration
    Config(ConfigArgs),
}

#[derive(Args)]
pub struct StaticArgs {
    /// Number of workers; defaults to the number of names, or 2
    #[arg(short = 'n', long)]
    pub world_size: Option<u32>,
    /// Worker names in id order, comma separated
    #[arg(long, value_delimiter = ',')]
    pub names: Vec<String>,
}

#[derive(Args)]
pub struct DynamicArgs {
    /// Worker names in registration order, comma separated
    #[arg(long, value_delimiter = ',', required = true)]
    pub names: Vec<String>,
    /// Id of the first worker; later workers count up from it
    #[arg(long, default_value = "0")]
    pub first_id: u32,
}

#[derive(Args)]
pub struct BarrierArgs {
    /// One in-flight call count per worker, comma separated
    #[arg(long, value_delimiter = ',', required = true, allow_negative_numbers = true)]
    pub contributions: Vec<i64>,
    /// Number of back-to-back barrier sessions
    #[arg(short, long, default_value = "1")]
    pub rounds: u32,
}

#[derive(Args)]
pub struct ConfigArgs {}
