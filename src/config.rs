//! Configuration Module
//!
//! Parses command-line arguments (with environment fallbacks) into an
//! immutable server configuration.

use std::path::PathBuf;

use clap::{ArgAction, Parser};

/// Command-line arguments.
///
/// `-h` is taken by the host, so help is only reachable through `--help`.
#[derive(Debug, Clone, Parser)]
#[command(
    name = "http_cat_cache",
    about = "Caching proxy for HTTP status code images",
    version,
    disable_help_flag = true
)]
pub struct Args {
    #[arg(short = 'h', long, env = "CAT_CACHE_HOST", help = "Server host")]
    pub host: String,

    #[arg(short = 'p', long, env = "CAT_CACHE_PORT", help = "Server port")]
    pub port: u16,

    #[arg(
        short = 'c',
        long = "cache",
        env = "CAT_CACHE_DIR",
        value_name = "DIR",
        help = "Cache directory"
    )]
    pub cache_dir: PathBuf,

    #[arg(long, action = ArgAction::Help, help = "Print help")]
    help: Option<bool>,
}

/// Server configuration parameters.
///
/// Built once at startup and passed by reference: the store needs the
/// cache directory, the listener needs host and port.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// Listening host name or address
    pub host: String,
    /// Listening port
    pub port: u16,
    /// Root directory of the image store
    pub cache_dir: PathBuf,
}

impl Config {
    /// Parses the process arguments into a Config, exiting with usage on error.
    pub fn from_args() -> Self {
        Args::parse().into()
    }

    /// Host and port the listener binds to; host names are resolved at bind time.
    pub fn bind_target(&self) -> (&str, u16) {
        (self.host.as_str(), self.port)
    }
}

impl From<Args> for Config {
    fn from(args: Args) -> Self {
        Self {
            host: args.host,
            port: args.port,
            cache_dir: args.cache_dir,
        }
    }
}
