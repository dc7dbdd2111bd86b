//! Child-process supervision under a bounded wall-clock lifetime
//!
//! [`Supervisor`] owns one child for the duration of a `run_*` call and
//! multiplexes four event sources until the child is reaped:
//!
//! ```text
//! child exit ──────► terminal: resolve code/signaled, leave the loop
//! duration timer ──► deliver termination signal, arm the kill timer
//! kill timer ──────► force-kill the whole tree (idempotent)
//! cancellation ────► deliver termination signal, arm the post-cancel kill
//! ```
//!
//! The blocking `wait` runs on its own task and surfaces the wait-status
//! through a one-shot channel; every other arm acts on the child by PID, so
//! no arm needs the child handle. The loop exits only on the child-exit
//! event. That keeps the child reaped on every path and lets the
//! preserve-status rule observe the child's real exit code after the
//! termination signal was delivered.

use std::io;
use std::process::Stdio;
use std::time::Duration;

use tokio::io::{AsyncBufReadExt, AsyncRead, AsyncReadExt, AsyncWrite, AsyncWriteExt, BufReader};
use tokio::process::{Child, Command};
use tokio::sync::oneshot;
use tokio::time::{self, Instant};
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};

use crate::error::{HourglassError, Result};
use crate::process;
use crate::signal::{default_signal, TermSignal};
use crate::status::{resolve_wait_status, ExitKind, ExitStatus};

/// Grace window between cancellation and the forced kill when the
/// configuration leaves `kill_after_cancel` at zero.
pub const DEFAULT_KILL_AFTER_CANCEL: Duration = Duration::from_secs(3);

/// Configuration for supervising one child command.
///
/// A `Supervisor` is a plain value consumed by [`run`](Self::run),
/// [`run_simple`](Self::run_simple) or [`run_context`](Self::run_context);
/// the child's lifetime is strictly contained within that call.
pub struct Supervisor {
    /// The program to execute and its arguments.
    pub command: Command,
    /// Wall-clock lifetime measured from spawn. Zero disables the timer and
    /// lets the child run until it exits on its own or is canceled.
    pub duration: Duration,
    /// Grace between the termination signal and a forced kill of the whole
    /// tree. Zero disables the forced-kill path on duration expiry.
    pub kill_after: Duration,
    /// Signal delivered at duration expiry. `None` selects the platform
    /// default (SIGTERM on Unix, interrupt on Windows).
    pub signal: Option<TermSignal>,
    /// On Unix, deliver the termination signal to the child PID only
    /// instead of its process group. No effect on Windows.
    pub foreground: bool,
    /// Grace between external cancellation and a forced kill. Zero selects
    /// [`DEFAULT_KILL_AFTER_CANCEL`].
    pub kill_after_cancel: Duration,
    /// Report the child's own exit code even when the duration timer fired,
    /// as long as no force kill intervened.
    pub preserve_status: bool,
}

/// Captured result of [`Supervisor::run`] and [`Supervisor::run_context`].
#[derive(Debug)]
pub struct RunOutput {
    /// Terminal status attributed by the supervisor.
    pub status: ExitStatus,
    /// Everything the child wrote to stdout.
    pub stdout: Vec<u8>,
    /// Everything the child wrote to stderr.
    pub stderr: Vec<u8>,
}

impl Supervisor {
    /// Create a supervisor for `command` with no duration timer and default
    /// signaling.
    pub fn new(command: Command) -> Self {
        Self {
            command,
            duration: Duration::ZERO,
            kill_after: Duration::ZERO,
            signal: None,
            foreground: false,
            kill_after_cancel: Duration::ZERO,
            preserve_status: false,
        }
    }

    /// Run the child with stdout and stderr captured into buffers.
    pub async fn run(self) -> Result<RunOutput> {
        self.run_with(CancellationToken::new()).await
    }

    /// As [`run`](Self::run), with an external cancellation token feeding
    /// the cancel event source. Token activity after the call has returned
    /// is ignored.
    pub async fn run_context(self, cancel: CancellationToken) -> Result<RunOutput> {
        self.run_with(cancel).await
    }

    /// Run the child with stdout and stderr passed through line by line,
    /// collapsing every outcome to the final integer exit code. Start
    /// failures are reported on stderr and encoded per the exit-code
    /// contract.
    pub async fn run_simple(mut self, preserve_status: bool) -> i32 {
        self.preserve_status = preserve_status;
        self.command.stdout(Stdio::piped()).stderr(Stdio::piped());

        let (mut child, pid) = match self.spawn() {
            Ok(spawned) => spawned,
            Err(err) => {
                eprintln!("{err}");
                return err.exit_code();
            }
        };
        let (stdout, stderr) = match (child.stdout.take(), child.stderr.take()) {
            (Some(out), Some(err)) => (out, err),
            _ => {
                let _ = child.start_kill();
                let err = HourglassError::Pipe("child streams were not captured".to_string());
                eprintln!("{err}");
                return err.exit_code();
            }
        };
        let out_task = tokio::spawn(forward_lines(stdout, tokio::io::stdout()));
        let err_task = tokio::spawn(forward_lines(stderr, tokio::io::stderr()));

        let status = self.supervise(child, pid, CancellationToken::new()).await;

        let _ = out_task.await;
        let _ = err_task.await;
        status.code
    }

    async fn run_with(mut self, cancel: CancellationToken) -> Result<RunOutput> {
        self.command.stdout(Stdio::piped()).stderr(Stdio::piped());

        let (mut child, pid) = self.spawn()?;
        let (stdout, stderr) = match (child.stdout.take(), child.stderr.take()) {
            (Some(out), Some(err)) => (out, err),
            _ => {
                let _ = child.start_kill();
                return Err(HourglassError::Pipe(
                    "child streams were not captured".to_string(),
                ));
            }
        };
        let out_task = tokio::spawn(read_to_end(stdout));
        let err_task = tokio::spawn(read_to_end(stderr));

        let status = self.supervise(child, pid, cancel).await;

        let stdout = out_task.await.unwrap_or_default();
        let stderr = err_task.await.unwrap_or_default();
        Ok(RunOutput {
            status,
            stdout,
            stderr,
        })
    }

    fn spawn(&mut self) -> Result<(Child, i32)> {
        process::configure_command(&mut self.command, self.foreground);
        let child = self.command.spawn().map_err(HourglassError::from_spawn)?;
        let pid = child
            .id()
            .map(|id| id as i32)
            .ok_or_else(|| HourglassError::Spawn(io::Error::other("spawned child has no PID")))?;
        debug!("Spawned child process {}", pid);
        Ok((child, pid))
    }

    /// Drive the lifecycle state machine until the child is reaped, then
    /// rewrite the exit code into its reason-encoded form.
    async fn supervise(&self, mut child: Child, pid: i32, cancel: CancellationToken) -> ExitStatus {
        let signal = self.termination_signal();

        let (exit_tx, mut exit_rx) = oneshot::channel();
        tokio::spawn(async move {
            let result = child.wait().await;
            let _ = exit_tx.send(result);
        });

        let mut status = ExitStatus::default();
        let mut cancel_seen = false;

        // One-shot timers. The armed flags gate the select arms so a fired
        // or unarmed timer is never polled again; the kill timer may be
        // re-armed by the cancellation path.
        let duration_timer = time::sleep_until(deadline_after(self.duration));
        tokio::pin!(duration_timer);
        let mut duration_armed = !self.duration.is_zero();

        let kill_timer = time::sleep_until(Instant::now());
        tokio::pin!(kill_timer);
        let mut kill_armed = false;

        loop {
            tokio::select! {
                result = &mut exit_rx => {
                    let (code, signaled) = match result {
                        Ok(Ok(wait_status)) => resolve_wait_status(wait_status),
                        Ok(Err(err)) => {
                            warn!("Failed to wait for process {}: {}", pid, err);
                            (-1, false)
                        }
                        Err(_) => (-1, false),
                    };
                    status.code = code;
                    status.signaled = signaled;
                    break;
                }
                () = &mut duration_timer, if duration_armed => {
                    duration_armed = false;
                    debug!("Duration expired for process {}", pid);
                    if let Err(err) = process::terminate(pid, signal, self.foreground) {
                        warn!("Failed to signal process {}: {}", pid, err);
                    }
                    if status.kind != ExitKind::Canceled {
                        status.kind = ExitKind::TimedOut;
                    }
                    if !self.kill_after.is_zero() && !kill_armed {
                        kill_timer.as_mut().reset(deadline_after(self.kill_after));
                        kill_armed = true;
                    }
                }
                () = &mut kill_timer, if kill_armed => {
                    kill_armed = false;
                    debug!("Kill grace expired for process {}", pid);
                    if let Err(err) = process::killall(pid) {
                        warn!("Failed to force-kill process group {}: {}", pid, err);
                    }
                    let _ = process::kill_direct(pid);
                    status.killed = true;
                    if status.kind != ExitKind::Canceled {
                        status.kind = ExitKind::Killed;
                    }
                }
                () = cancel.cancelled(), if !cancel_seen => {
                    cancel_seen = true;
                    debug!("Cancellation requested for process {}", pid);
                    if let Err(err) = process::terminate(pid, signal, self.foreground) {
                        warn!("Failed to signal process {}: {}", pid, err);
                    }
                    status.kind = ExitKind::Canceled;
                    kill_timer.as_mut().reset(deadline_after(self.cancel_grace()));
                    kill_armed = true;
                }
            }
        }

        status.into_final(self.preserve_status)
    }

    fn termination_signal(&self) -> TermSignal {
        self.signal.unwrap_or_else(default_signal)
    }

    fn cancel_grace(&self) -> Duration {
        if self.kill_after_cancel.is_zero() {
            DEFAULT_KILL_AFTER_CANCEL
        } else {
            self.kill_after_cancel
        }
    }
}

fn deadline_after(interval: Duration) -> Instant {
    Instant::now()
        .checked_add(interval)
        .unwrap_or_else(|| Instant::now() + Duration::from_secs(86400 * 365 * 30))
}

async fn read_to_end<R>(mut reader: R) -> Vec<u8>
where
    R: AsyncRead + Unpin,
{
    let mut buf = Vec::new();
    let _ = reader.read_to_end(&mut buf).await;
    buf
}

async fn forward_lines<R, W>(reader: R, mut writer: W)
where
    R: AsyncRead + Unpin,
    W: AsyncWrite + Unpin,
{
    let mut lines = BufReader::new(reader).lines();
    while let Ok(Some(mut line)) = lines.next_line().await {
        line.push('\n');
        if writer.write_all(line.as_bytes()).await.is_err() {
            break;
        }
    }
    let _ = writer.flush().await;
}

#[cfg(test)]
mod tests {
    use super::*;

    fn idle_supervisor() -> Supervisor {
        Supervisor::new(Command::new("true"))
    }

    #[test]
    fn cancel_grace_defaults_to_three_seconds() {
        let mut sup = idle_supervisor();
        assert_eq!(sup.cancel_grace(), DEFAULT_KILL_AFTER_CANCEL);

        sup.kill_after_cancel = Duration::from_millis(10);
        assert_eq!(sup.cancel_grace(), Duration::from_millis(10));
    }

    #[test]
    fn unset_signal_falls_back_to_the_platform_default() {
        let sup = idle_supervisor();
        assert_eq!(sup.termination_signal(), default_signal());
    }

    #[test]
    fn far_deadlines_saturate() {
        // A Duration::MAX timer must clamp instead of panicking.
        let _ = deadline_after(Duration::MAX);
    }
}
