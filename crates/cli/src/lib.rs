use clap::{Args, Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "ballots")]
#[command(about = "Ballots - an HTTP resource server for polls")]
#[command(version = "0.1.0")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Start the polls API server
    Start(StartArgs),

    /// Validate configuration without starting the server
    Validate {
        /// Path to the configuration file
        #[arg(short, long, default_value = "ballots.yaml")]
        config: PathBuf,
    },

    /// Initialize a new configuration file with all defaults
    Init {
        /// Output path for the new configuration file
        #[arg(short, long, default_value = "ballots.yaml")]
        output: PathBuf,
    },
}

/// Options for `start`. Anything given here wins over the config file.
#[derive(Args, Debug)]
pub struct StartArgs {
    /// Path to the configuration file (defaults are used if it is missing)
    #[arg(short, long, default_value = "ballots.yaml")]
    pub config: PathBuf,

    /// Listen address, `host:port` or `:port`
    #[arg(long)]
    pub addr: Option<String>,

    /// Poll store backend
    #[arg(long, value_enum)]
    pub store: Option<StoreBackend>,

    /// MongoDB host or connection string
    #[arg(long)]
    pub mongo: Option<String>,

    /// API key clients must pass as `?key=`
    #[arg(long, env = "BALLOTS_API_KEY", hide_env_values = true)]
    pub api_key: Option<String>,

    /// Log output format
    #[arg(long, value_enum)]
    pub log_format: Option<LogFormatArg>,
}

#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
pub enum StoreBackend {
    /// Process-local store, lost on restart
    Memory,

    /// MongoDB collection
    Mongo,
}

impl StoreBackend {
    pub fn as_str(&self) -> &'static str {
        match self {
            StoreBackend::Memory => "memory",
            StoreBackend::Mongo => "mongo",
        }
    }
}

#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
pub enum LogFormatArg {
    Pretty,
    Json,
    Compact,
}

impl LogFormatArg {
    pub fn as_str(&self) -> &'static str {
        match self {
            LogFormatArg::Pretty => "pretty",
            LogFormatArg::Json => "json",
            LogFormatArg::Compact => "compact",
        }
    }
}

impl Cli {
    pub fn parse_args() -> Self {
        Self::parse()
    }
}
