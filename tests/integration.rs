//! End-to-end tests that drive the compiled shell binary over a pipe, the
//! way a scripted terminal session would.

use std::fs;
use std::io::Write;
use std::path::PathBuf;
use std::process::{Command, Stdio};
use std::time::{SystemTime, UNIX_EPOCH};

fn run_shell(script: &str) -> String {
    let mut child = Command::new(env!("CARGO_BIN_EXE_rshell"))
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()
        .expect("spawn shell binary");
    child
        .stdin
        .as_mut()
        .expect("child stdin")
        .write_all(script.as_bytes())
        .expect("feed script");
    let output = child.wait_with_output().expect("wait for shell");
    assert!(output.status.success(), "shell exited with {}", output.status);
    String::from_utf8_lossy(&output.stdout).into_owned()
}

fn temp_file(tag: &str) -> PathBuf {
    let nanos = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap()
        .as_nanos();
    std::env::temp_dir().join(format!(
        "rshell_it_{}_{}_{}",
        tag,
        std::process::id(),
        nanos
    ))
}

#[test]
fn echoes_plain_words() {
    let out = run_shell("echo hello world\nexit\n");
    assert!(out.contains("hello world\n"), "output: {:?}", out);
}

#[test]
fn quoting_collapses_only_unquoted_whitespace() {
    let out = run_shell("echo 'a  b'   \"c\"\nexit\n");
    assert!(out.contains("a  b c\n"), "output: {:?}", out);
}

#[test]
fn exits_on_eof_without_explicit_exit() {
    let out = run_shell("echo done\n");
    assert!(out.contains("done\n"), "output: {:?}", out);
}

#[test]
fn type_classifies_builtins_and_misses() {
    let out = run_shell("type echo\ntype qwertyuiop_nope\nexit\n");
    assert!(out.contains("echo is a shell builtin\n"), "output: {:?}", out);
    assert!(out.contains("qwertyuiop_nope: not found\n"), "output: {:?}", out);
}

#[test]
#[cfg(unix)]
fn type_resolves_path_executables() {
    let out = run_shell("type sh\nexit\n");
    assert!(out.contains("sh is /"), "output: {:?}", out);
}

#[test]
fn unknown_commands_are_reported_and_survivable() {
    let out = run_shell("qwertyuiop_nope\necho still here\nexit\n");
    assert!(
        out.contains("qwertyuiop_nope: command not found\n"),
        "output: {:?}",
        out
    );
    assert!(out.contains("still here\n"), "output: {:?}", out);
}

#[test]
fn empty_pipeline_stage_is_diagnosed() {
    let out = run_shell("echo a | | echo b\necho alive\nexit\n");
    assert!(out.contains("invalid pipeline\n"), "output: {:?}", out);
    assert!(out.contains("alive\n"), "output: {:?}", out);
}

#[test]
fn redirects_truncate_and_append() {
    let file = temp_file("redir");
    let path = file.to_string_lossy();
    run_shell(&format!("echo hi > {p}\necho hi >> {p}\nexit\n", p = path));
    assert_eq!(fs::read_to_string(&file).unwrap(), "hi\nhi\n");
    let _ = fs::remove_file(&file);
}

#[test]
#[cfg(unix)]
fn pipelines_mix_builtins_and_externals() {
    let out = run_shell("echo pipe-flow | cat\nexit\n");
    assert!(out.contains("pipe-flow\n"), "output: {:?}", out);
}

#[test]
#[cfg(unix)]
fn cd_then_pwd_reflects_the_new_directory() {
    let out = run_shell("cd /\npwd\nexit\n");
    assert!(out.contains("/\n"), "output: {:?}", out);
}

#[test]
fn history_numbers_submitted_lines() {
    let out = run_shell("echo aa\nhistory\nexit\n");
    assert!(out.contains("    1  echo aa\n"), "output: {:?}", out);
    assert!(out.contains("    2  history\n"), "output: {:?}", out);
}

#[test]
fn cd_failure_keeps_the_session_alive() {
    let out = run_shell("cd /nonexistent_rshell_dir\necho ok\nexit\n");
    assert!(
        out.contains("cd: /nonexistent_rshell_dir: No such file or directory\n"),
        "output: {:?}",
        out
    );
    assert!(out.contains("ok\n"), "output: {:?}", out);
}
