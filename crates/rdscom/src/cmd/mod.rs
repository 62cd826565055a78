use clap::{Args, Subcommand};

use crate::exit::CliResult;
use crate::output::OutputFormat;

pub mod describe;
pub mod ping;
pub mod serve;
pub mod version;

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Answer ping requests on a TCP address.
    Serve(ServeArgs),
    /// Send ping requests and print round-trip times.
    Ping(PingArgs),
    /// Show the demo prototype layout.
    Describe(DescribeArgs),
    /// Show version information.
    Version(VersionArgs),
}

pub fn run(command: Command, format: OutputFormat) -> CliResult<i32> {
    match command {
        Command::Serve(args) => serve::run(args, format),
        Command::Ping(args) => ping::run(args, format),
        Command::Describe(args) => describe::run(args, format),
        Command::Version(args) => version::run(args),
    }
}

#[derive(Args, Debug)]
pub struct ServeArgs {
    /// TCP address to bind (e.g. 127.0.0.1:7400).
    pub addr: String,
    /// Exit after answering N requests.
    #[arg(long)]
    pub count: Option<u64>,
    /// Drop an idle connection after this many milliseconds of silence.
    #[arg(long, default_value = "10000")]
    pub idle_timeout_ms: u64,
}

#[derive(Args, Debug)]
pub struct PingArgs {
    /// TCP address to connect to (e.g. 127.0.0.1:7400).
    pub addr: String,
    /// Number of pings to send.
    #[arg(long, short = 'n', default_value = "1")]
    pub count: u32,
    /// Silence on a pending ping before it is retransmitted.
    #[arg(long, default_value = "1000")]
    pub retry_timeout_ms: u64,
    /// Retransmissions allowed per ping.
    #[arg(long, default_value = "3")]
    pub max_retries: u8,
    /// Give up on the whole run after this many milliseconds.
    #[arg(long, default_value = "10000")]
    pub deadline_ms: u64,
}

#[derive(Args, Debug)]
pub struct DescribeArgs {
    /// Also print the schema exchange bytes as hex.
    #[arg(long)]
    pub hex: bool,
}

#[derive(Args, Debug, Default)]
pub struct VersionArgs {}
