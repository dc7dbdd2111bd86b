//! Process-group behavior of the platform adaptor
//!
//! Verifies that spawned children lead their own process group, that a group
//! kill tears down the whole tree, and that signaling an already-reaped
//! target is not an error.

#![cfg(unix)]
#![allow(unsafe_code)] // libc probes

use std::time::Duration;

use hourglass_core::process::{configure_command, kill_direct, killall, terminate};
use hourglass_core::TermSignal;
use tokio::process::{Child, Command};

fn spawn_group(script: &str) -> (Child, i32) {
    let mut cmd = Command::new("/bin/sh");
    cmd.arg("-c").arg(script);
    configure_command(&mut cmd, false);
    let child = cmd.spawn().expect("spawn should succeed");
    let pid = child.id().expect("child should have a PID") as i32;
    (child, pid)
}

fn group_exists(pgid: i32) -> bool {
    unsafe { libc::killpg(pgid, 0) == 0 }
}

#[tokio::test]
async fn spawned_children_lead_their_own_group() {
    let (mut child, pid) = spawn_group("sleep 5");

    let child_pgid = unsafe { libc::getpgid(pid) };
    assert_eq!(child_pgid, pid);

    let our_pgid = unsafe { libc::getpgrp() };
    assert_ne!(child_pgid, our_pgid);

    killall(pid).unwrap();
    let _ = child.wait().await;
}

#[tokio::test]
async fn a_group_kill_tears_down_the_whole_tree() {
    let (mut child, pid) = spawn_group("sleep 30 & sleep 30 & wait");

    // Give the shell a moment to fork its background children.
    tokio::time::sleep(Duration::from_millis(200)).await;
    assert!(group_exists(pid));

    killall(pid).unwrap();
    let status = child.wait().await.unwrap();
    assert!(!status.success());

    // The background sleeps shared the group and must be gone too.
    let mut attempts = 0;
    while group_exists(pid) {
        attempts += 1;
        assert!(attempts < 20, "process group {pid} survived SIGKILL");
        tokio::time::sleep(Duration::from_millis(50)).await;
    }
}

#[tokio::test]
async fn a_group_terminate_reaches_a_stopped_child() {
    let (mut child, pid) = spawn_group("kill -STOP $$; sleep 5");

    // Wait for the shell to stop itself.
    tokio::time::sleep(Duration::from_millis(300)).await;

    terminate(pid, TermSignal::SIGTERM, false).unwrap();
    let status = child.wait().await.unwrap();

    use std::os::unix::process::ExitStatusExt;
    assert_eq!(status.signal(), Some(libc::SIGTERM));
}

#[tokio::test]
async fn signaling_a_reaped_target_is_not_an_error() {
    let (mut child, pid) = spawn_group("exit 0");
    let _ = child.wait().await;

    assert!(terminate(pid, TermSignal::SIGTERM, false).is_ok());
    assert!(terminate(pid, TermSignal::SIGTERM, true).is_ok());
    assert!(killall(pid).is_ok());
    assert!(kill_direct(pid).is_ok());
}
