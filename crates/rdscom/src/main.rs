mod cmd;
mod demo;
mod exit;
mod output;

use clap::Parser;
use tracing::Level;

use crate::cmd::Command;
use crate::output::OutputFormat;

#[derive(Parser, Debug)]
#[command(name = "rdscom", version, about = "Reliable framed messaging CLI")]
struct Cli {
    /// Output format.
    #[arg(long, value_name = "FORMAT", global = true)]
    format: Option<OutputFormat>,

    /// Minimum level for stderr logs (error, warn, info, debug, trace).
    #[arg(long, value_name = "LEVEL", default_value = "info", global = true)]
    log_level: Level,

    /// Emit stderr logs as JSON instead of text.
    #[arg(long, global = true)]
    log_json: bool,

    #[command(subcommand)]
    command: Command,
}

// Logs go to stderr so command output stays pipeable.
fn init_logging(level: Level, json: bool) {
    let logs = tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_max_level(level)
        .with_target(false)
        .with_ansi(false);

    let _ = if json {
        logs.json().try_init()
    } else {
        logs.try_init()
    };
}

fn main() {
    let cli = Cli::parse();
    init_logging(cli.log_level, cli.log_json);

    let format = cli.format.unwrap_or_else(OutputFormat::default_for_stdout);
    let code = cmd::run(cli.command, format).unwrap_or_else(|err| {
        eprintln!("error: {err}");
        err.code
    });
    std::process::exit(code);
}
