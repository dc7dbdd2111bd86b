//! Run an external command under a bounded wall-clock lifetime
//!
//! `hourglass-core` emulates GNU `timeout(1)`: a child process is granted a
//! duration; at expiry a configurable termination signal is delivered to its
//! whole process group (with a foreground mode that narrows delivery to the
//! child itself), and an optional grace period later the tree is
//! force-killed. Cooperative cancellation through a
//! [`CancellationToken`](tokio_util::sync::CancellationToken) drives the
//! same machinery with its own grace timer.
//!
//! ## Example
//!
//! ```rust,no_run
//! use std::time::Duration;
//!
//! use hourglass_core::Supervisor;
//! use tokio::process::Command;
//!
//! # async fn demo() -> hourglass_core::Result<()> {
//! let mut sleepy = Command::new("sleep");
//! sleepy.arg("30");
//!
//! let mut supervisor = Supervisor::new(sleepy);
//! supervisor.duration = Duration::from_secs(1);
//! supervisor.kill_after = Duration::from_secs(5);
//!
//! let output = supervisor.run().await?;
//! assert!(output.status.is_timed_out());
//! # Ok(())
//! # }
//! ```

#![deny(unsafe_code)]

pub mod duration;
pub mod error;
pub mod process;
pub mod signal;
pub mod status;
pub mod supervisor;

pub use duration::{duration_from_secs, parse_duration};
pub use error::{HourglassError, Result};
pub use signal::{default_signal, parse_signal, TermSignal};
pub use status::{ExitKind, ExitStatus};
pub use supervisor::{RunOutput, Supervisor, DEFAULT_KILL_AFTER_CANCEL};

/// Core utilities and helper functions
pub mod utils {
    /// Initialize tracing for the application.
    ///
    /// Honors `RUST_LOG` when set, otherwise falls back to `default_level`.
    /// Logs go to stderr so supervised output on stdout stays clean.
    pub fn init_tracing(default_level: &str) {
        use tracing_subscriber::{fmt, EnvFilter};

        let filter =
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

        let _ = fmt()
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .try_init();
    }
}
