use std::io::Write;
use std::path::PathBuf;
use std::process::{Command, Output, Stdio};

use serde_json::Value;

/// Repo root, so `demos/*.json` paths resolve the same in every test.
pub fn workspace_root() -> PathBuf {
    let manifest = PathBuf::from(env!("CARGO_MANIFEST_DIR"));
    manifest
        .ancestors()
        .nth(2)
        .map(PathBuf::from)
        .unwrap_or(manifest)
}

/// The `sat` binary with logging left at its default level.
pub fn sat_bin() -> Command {
    let mut cmd = Command::new(env!("CARGO_BIN_EXE_sat"));
    cmd.current_dir(workspace_root()).env_remove("SAT_LOG");
    cmd
}

/// Every helper funnels through here; stdin is closed when `input` is `None`.
fn run(args: &[&str], input: Option<&str>) -> Output {
    let mut cmd = sat_bin();
    cmd.args(args)
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .stdin(if input.is_some() {
            Stdio::piped()
        } else {
            Stdio::null()
        });
    let mut child = cmd
        .spawn()
        .unwrap_or_else(|e| panic!("cannot spawn sat {}: {e}", args.join(" ")));
    if let (Some(text), Some(mut stdin)) = (input, child.stdin.take()) {
        stdin.write_all(text.as_bytes()).expect("stdin closed early");
    }
    child.wait_with_output().expect("sat did not exit")
}

fn describe(args: &[&str], out: &Output) -> String {
    format!(
        "sat {} (exit {})\n--- stdout\n{}\n--- stderr\n{}",
        args.join(" "),
        out.status.code().unwrap_or(-1),
        String::from_utf8_lossy(&out.stdout),
        String::from_utf8_lossy(&out.stderr)
    )
}

/// Parsed stdout of a run that must exit with `expected_exit`.
#[allow(dead_code)]
pub fn sat_json(args: &[&str], expected_exit: i32) -> Value {
    let out = run(args, None);
    assert_eq!(out.status.code(), Some(expected_exit), "{}", describe(args, &out));
    serde_json::from_slice(&out.stdout)
        .unwrap_or_else(|e| panic!("stdout is not JSON ({e}): {}", describe(args, &out)))
}

/// Stdout of a run that must succeed.
#[allow(dead_code)]
pub fn sat_stdout(args: &[&str]) -> String {
    let out = run(args, None);
    assert!(out.status.success(), "{}", describe(args, &out));
    String::from_utf8_lossy(&out.stdout).into_owned()
}

/// Raw output of a run fed `input`; callers check the exit status.
#[allow(dead_code)]
pub fn sat_with_stdin(args: &[&str], input: &str) -> Output {
    run(args, Some(input))
}
