//! Command line arguments for the front desk binary
//!
//! Every flag is optional; anything not given falls back to the
//! configuration file and then to built-in defaults.

use clap::Parser;
use std::path::PathBuf;

#[derive(Parser, Debug, Clone, Default, PartialEq)]
#[command(name = "clinic-queue")]
#[command(about = "Front desk console for the clinic service queue")]
#[command(version)]
pub struct Args {
    /// Configuration file path
    #[arg(short = 'c', long = "config-file", value_name = "FILE")]
    pub config_file: Option<PathBuf>,

    /// Log level
    #[arg(short = 'l', long = "log-level", value_name = "LEVEL", value_parser = ["trace", "debug", "info", "warn", "error", "off"])]
    pub log_level: Option<String>,

    /// Log file path (use 'none' to disable file logging)
    #[arg(
        short = 'f',
        long = "log-file",
        value_name = "FILE",
        help = "Log file path (use 'none' to disable file logging)"
    )]
    pub log_file: Option<PathBuf>,

    /// Log output format
    #[arg(short = 'o', long = "log-format", value_name = "FORMAT", value_parser = ["text", "ext", "json"])]
    pub log_format: Option<String>,

    /// Disable coloured output
    #[arg(long = "no-color")]
    pub no_color: bool,

    /// Minutes assumed per client when estimating waits
    #[arg(short = 'm', long = "service-minutes", value_name = "MINUTES")]
    pub service_minutes: Option<u64>,

    /// Booked clients served before each walk-in
    #[arg(short = 'b', long = "booked-per-walk-in", value_name = "COUNT")]
    pub booked_per_walk_in: Option<usize>,

    /// Category for clients registered without one
    #[arg(long = "default-category", value_name = "NAME")]
    pub default_category: Option<String>,

    /// Base URL of the public tracking page
    #[arg(short = 't', long = "tracking-url", value_name = "URL")]
    pub tracking_base_url: Option<String>,

    /// SMS gateway endpoint (omit to disable client messages)
    #[arg(short = 's', long = "sms-gateway", value_name = "URL")]
    pub sms_gateway: Option<String>,
}

impl Args {
    /// Parse from an explicit argument list, program name first
    pub fn parse_from_list(args: &[String]) -> Result<Self, clap::Error> {
        Self::try_parse_from(args)
    }

    /// Parse the process arguments, exiting with usage on error
    pub fn from_env() -> Self {
        Self::parse()
    }
}
