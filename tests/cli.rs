//! End-to-end tests driving the `msh` binary.

use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::process::{Command, Output, Stdio};

use tempfile::TempDir;

const ERROR: &str = "An error has occurred\n";

fn msh(dir: &Path) -> Command {
    let mut command = Command::new(env!("CARGO_BIN_EXE_msh"));
    command.current_dir(dir).env_remove("MSH_LOG");
    command
}

/// Runs a batch script written into a fresh directory.
fn batch(script: &str) -> (TempDir, Output) {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("script.msh");
    fs::write(&path, script).unwrap();
    let output = msh(dir.path()).arg(&path).output().unwrap();
    (dir, output)
}

/// Feeds `input` to an interactive shell on a pipe.
fn interactive(input: &str) -> (TempDir, Output) {
    let dir = tempfile::tempdir().unwrap();
    let mut child = msh(dir.path())
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()
        .unwrap();
    child
        .stdin
        .take()
        .unwrap()
        .write_all(input.as_bytes())
        .unwrap();
    let output = child.wait_with_output().unwrap();
    (dir, output)
}

fn stdout(output: &Output) -> String {
    String::from_utf8_lossy(&output.stdout).into_owned()
}

fn stderr(output: &Output) -> String {
    String::from_utf8_lossy(&output.stderr).into_owned()
}

fn real(dir: &TempDir) -> PathBuf {
    dir.path().canonicalize().unwrap()
}

#[test]
fn prompt_is_printed_before_every_read() {
    let (_dir, output) = interactive("echo hi\n");
    assert_eq!(stdout(&output), "msh> hi\nmsh> ");
    assert!(output.status.success());
}

#[test]
fn interactive_exit_ends_cleanly() {
    let (dir, output) = interactive("exit\ntouch never\n");
    assert_eq!(output.status.code(), Some(0));
    assert!(!dir.path().join("never").exists());
    assert_eq!(stderr(&output), "");
}

#[test]
fn redirect_leaves_shell_output_alone() {
    let (dir, output) = interactive("echo hi > out.txt\n");
    assert_eq!(fs::read_to_string(dir.path().join("out.txt")).unwrap(), "hi\n");
    assert_eq!(stdout(&output), "msh> msh> ");
}

#[test]
fn operator_first_terminates_interactive_session() {
    let (dir, output) = interactive("> out.txt\ntouch after\n");
    assert_eq!(stderr(&output), ERROR);
    assert_eq!(output.status.code(), Some(0));
    assert!(!dir.path().join("after").exists());
}

#[test]
fn batch_runs_every_line() {
    let (dir, output) = batch("echo one > one.txt\n\ttouch two  \n");
    assert!(output.status.success());
    assert_eq!(fs::read_to_string(dir.path().join("one.txt")).unwrap(), "one\n");
    assert!(dir.path().join("two").exists());
    assert_eq!(stdout(&output), "");
}

#[test]
fn batch_reports_two_targets_and_continues() {
    let (dir, output) = batch("echo hi > a.txt b.txt\ntouch after\n");
    assert_eq!(stderr(&output), ERROR);
    assert!(!dir.path().join("a.txt").exists());
    assert!(dir.path().join("after").exists());
}

#[test]
fn batch_cd_is_seen_by_later_commands() {
    let dir = tempfile::tempdir().unwrap();
    let sub = real(&dir).join("sub");
    fs::create_dir(&sub).unwrap();
    let script = dir.path().join("script.msh");
    fs::write(&script, "cd sub\npwd > where\n").unwrap();

    let output = msh(dir.path()).arg(&script).output().unwrap();

    assert!(output.status.success());
    let printed = fs::read_to_string(sub.join("where")).unwrap();
    assert_eq!(printed.trim_end(), sub.to_str().unwrap());
}

#[test]
fn batch_cd_without_path_terminates() {
    let (dir, output) = batch("cd\ntouch after\n");
    assert_eq!(stderr(&output), ERROR);
    assert_eq!(output.status.code(), Some(0));
    assert!(!dir.path().join("after").exists());
}

#[test]
fn batch_exit_with_argument_terminates() {
    let (dir, output) = batch("exit extra\ntouch after\n");
    assert_eq!(stderr(&output), ERROR);
    assert_eq!(output.status.code(), Some(0));
    assert!(!dir.path().join("after").exists());
}

#[test]
fn batch_exit_stops_cleanly() {
    let (dir, output) = batch("exit\ntouch after\n");
    assert_eq!(stderr(&output), "");
    assert_eq!(output.status.code(), Some(0));
    assert!(!dir.path().join("after").exists());
}

#[test]
fn unknown_program_does_not_stop_the_script() {
    let (dir, output) = batch("msh-no-such-program\ntouch after\n");
    assert_eq!(stderr(&output), ERROR);
    assert_eq!(output.status.code(), Some(0));
    assert!(dir.path().join("after").exists());
}

#[test]
fn long_lines_are_split_into_commands() {
    let long = format!("touch {}\n", "a".repeat(300));
    let (dir, output) = batch(&long);
    // The first piece runs `touch` on a truncated name, the rest is a command
    // of its own that does not exist.
    assert!(dir.path().join("a".repeat(248)).exists());
    assert_eq!(stderr(&output), ERROR);
}

#[test]
fn missing_script_fails_with_status_one() {
    let dir = tempfile::tempdir().unwrap();
    let output = msh(dir.path()).arg("no-such-script").output().unwrap();
    assert_eq!(stderr(&output), ERROR);
    assert_eq!(output.status.code(), Some(1));
}

#[test]
fn too_many_operands_fail_with_status_one() {
    let dir = tempfile::tempdir().unwrap();
    let output = msh(dir.path()).args(["a", "b"]).output().unwrap();
    assert_eq!(stderr(&output), ERROR);
    assert_eq!(output.status.code(), Some(1));
}

#[test]
fn exit_and_cd_operands_return_at_once() {
    let dir = tempfile::tempdir().unwrap();
    for operand in ["exit", "cd"] {
        let output = msh(dir.path())
            .arg(operand)
            .stdin(Stdio::null())
            .output()
            .unwrap();
        assert_eq!(output.status.code(), Some(0));
        assert_eq!(stdout(&output), "");
        assert_eq!(stderr(&output), "");
    }
}
