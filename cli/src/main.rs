use std::process::exit;
use std::time::Duration;

use clap::{CommandFactory, Parser};
use hourglass_core::{duration_from_secs, parse_duration, parse_signal, utils, Supervisor};
use tokio::process::Command;

/// Run a command under a bounded wall-clock lifetime, GNU timeout style.
#[derive(Parser)]
#[command(name = "hourglass")]
#[command(version)]
#[command(about = "Run a command, signaling it at DURATION and force-killing it after a grace period")]
struct Cli {
    /// Termination signal sent at duration expiry (default TERM)
    #[arg(short = 's', long = "signal", value_name = "NAME|NUM")]
    signal: Option<String>,

    /// Forced-kill grace after the termination signal
    #[arg(
        short = 'k',
        long = "kill-after",
        value_name = "DURATION",
        allow_hyphen_values = true
    )]
    kill_after: Option<String>,

    /// Do not signal the whole process group, only the child (Unix)
    #[arg(short = 'f', long)]
    foreground: bool,

    /// Return the child's own exit code even on timeout
    #[arg(long)]
    preserve_status: bool,

    /// Wall-clock lifetime, e.g. 10, 0.5s, 2m, 1h, 1d; non-positive
    /// values disable the timer
    #[arg(value_name = "DURATION", allow_hyphen_values = true)]
    duration: Option<String>,

    /// Command to run and its arguments
    #[arg(value_name = "COMMAND", trailing_var_arg = true, allow_hyphen_values = true)]
    command: Vec<String>,
}

#[tokio::main]
async fn main() {
    utils::init_tracing("warn");

    let cli = Cli::parse();
    let (Some(duration_raw), [program, args @ ..]) = (&cli.duration, &cli.command[..]) else {
        eprintln!("{}", Cli::command().render_usage());
        exit(1);
    };

    let duration = parse_interval(duration_raw);
    let kill_after = match cli.kill_after.as_deref() {
        Some(raw) => parse_interval(raw),
        None => Duration::ZERO,
    };
    let signal = match parse_signal(cli.signal.as_deref().unwrap_or_default()) {
        Ok(signal) => signal,
        Err(err) => {
            eprintln!("{err}");
            exit(err.exit_code());
        }
    };

    let mut command = Command::new(program);
    command.args(args);

    let mut supervisor = Supervisor::new(command);
    supervisor.duration = duration;
    supervisor.kill_after = kill_after;
    supervisor.signal = signal;
    supervisor.foreground = cli.foreground;

    exit(supervisor.run_simple(cli.preserve_status).await);
}

fn parse_interval(raw: &str) -> Duration {
    match parse_duration(raw) {
        Ok(secs) => duration_from_secs(secs),
        Err(err) => {
            eprintln!("{err}");
            exit(err.exit_code());
        }
    }
}
