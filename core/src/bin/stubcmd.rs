//! Test-support child process
//!
//! Traps the requested signals, optionally exits with a fixed code when one
//! arrives (a zero trap-exit swallows the signal and keeps running), sleeps
//! a fractional interval, then exits. Integration tests resolve this binary
//! through `CARGO_BIN_EXE_stubcmd`.

use std::time::Duration;

use clap::Parser;

#[derive(Parser)]
#[command(name = "stubcmd", about = "Test-support child process")]
struct Args {
    /// Comma-separated signal names to trap (SIG prefix tolerated)
    #[arg(long)]
    trap: Option<String>,

    /// Exit status used when a trapped signal arrives; 0 swallows the signal
    #[arg(long, default_value_t = 0)]
    trap_exit: i32,

    /// Final exit status
    #[arg(long, default_value_t = 0)]
    exit: i32,

    /// Seconds to sleep before exiting
    #[arg(long, default_value_t = 0.0)]
    sleep: f64,
}

#[cfg(unix)]
#[tokio::main(flavor = "current_thread")]
async fn main() {
    use tokio::signal::unix::{signal, SignalKind};

    let args = Args::parse();

    if let Some(spec) = &args.trap {
        for name in spec.split(',') {
            let token = name.trim().to_ascii_uppercase();
            let kind = match token.trim_start_matches("SIG") {
                "TERM" => SignalKind::terminate(),
                "INT" => SignalKind::interrupt(),
                "HUP" => SignalKind::hangup(),
                "QUIT" => SignalKind::quit(),
                other => {
                    eprintln!("unknown signal name: {other}");
                    std::process::exit(1);
                }
            };
            let mut stream = match signal(kind) {
                Ok(stream) => stream,
                Err(err) => {
                    eprintln!("failed to trap {token}: {err}");
                    std::process::exit(1);
                }
            };
            let trap_exit = args.trap_exit;
            tokio::spawn(async move {
                while stream.recv().await.is_some() {
                    if trap_exit > 0 {
                        std::process::exit(trap_exit);
                    }
                }
            });
        }
    }

    if args.sleep > 0.0 {
        tokio::time::sleep(Duration::from_secs_f64(args.sleep)).await;
    }
    std::process::exit(args.exit);
}

#[cfg(not(unix))]
#[tokio::main(flavor = "current_thread")]
async fn main() {
    let args = Args::parse();

    if args.trap.is_some() {
        eprintln!("signal trapping is not supported on this platform");
        std::process::exit(1);
    }
    if args.sleep > 0.0 {
        tokio::time::sleep(Duration::from_secs_f64(args.sleep)).await;
    }
    std::process::exit(args.exit);
}
