//! Black-box tests of the hourglass binary

use assert_cmd::Command;

fn hourglass() -> Command {
    Command::new(assert_cmd::cargo::cargo_bin!("hourglass"))
}

#[test]
fn passes_a_quick_command_through() {
    hourglass()
        .args(["10", "sh", "-c", "echo ok"])
        .assert()
        .success()
        .stdout("ok\n");
}

#[test]
fn propagates_the_child_exit_code() {
    hourglass()
        .args(["10", "sh", "-c", "exit 7"])
        .assert()
        .code(7);
}

#[cfg(unix)]
#[test]
fn times_out_with_124() {
    hourglass().args(["0.3", "sleep", "5"]).assert().code(124);
}

#[cfg(unix)]
#[test]
fn preserve_status_reports_the_fatal_signal() {
    hourglass()
        .args(["--preserve-status", "0.2", "sh", "-c", "sleep 5"])
        .assert()
        .code(128 + 15);
}

#[cfg(unix)]
#[test]
fn kill_after_forces_137_for_a_stubborn_child() {
    hourglass()
        .args(["-f", "-k", "0.3", "0.2", "sh", "-c", "trap '' TERM; sleep 5"])
        .assert()
        .code(137);
}

#[test]
fn a_negative_duration_disables_the_timer() {
    hourglass()
        .args(["-3", "sh", "-c", "echo ok"])
        .assert()
        .success()
        .stdout("ok\n");
}

#[test]
fn a_negative_kill_after_is_accepted() {
    hourglass()
        .args(["-k", "-1", "10", "sh", "-c", "echo ok"])
        .assert()
        .success()
        .stdout("ok\n");
}

#[test]
fn rejects_a_malformed_duration() {
    let output = hourglass().args(["1x", "sleep", "1"]).output().unwrap();
    assert_eq!(output.status.code(), Some(125));
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(
        stderr.contains("duration format invalid"),
        "stderr should carry the diagnostic: {stderr}"
    );
}

#[test]
fn rejects_an_unknown_signal() {
    let output = hourglass()
        .args(["-s", "WINCH", "1", "sleep", "1"])
        .output()
        .unwrap();
    assert_eq!(output.status.code(), Some(125));
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(
        stderr.contains("invalid signal"),
        "stderr should carry the diagnostic: {stderr}"
    );
}

#[test]
fn missing_arguments_print_usage() {
    let output = hourglass().output().unwrap();
    assert_eq!(output.status.code(), Some(1));
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("Usage"), "expected usage text: {stderr}");
}

#[test]
fn a_duration_without_a_command_prints_usage() {
    let output = hourglass().args(["10"]).output().unwrap();
    assert_eq!(output.status.code(), Some(1));
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("Usage"), "expected usage text: {stderr}");
}
