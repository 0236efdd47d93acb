#![cfg(unix)]

use std::{
    io,
    path::{Path, PathBuf},
    time::{Duration, Instant},
};

use quill::interpreter::host::{PythonRunner, ScriptRunner};

fn script(name: &str) -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR")).join("tests/sh").join(name)
}

fn args(values: &[&str]) -> Vec<String> {
    values.iter().map(ToString::to_string).collect()
}

#[test]
fn captures_standard_output() {
    let runner = PythonRunner::new("sh", None);
    let output = runner.run(&script("echo_args.sh"), &args(&["4", "two words"]))
                       .unwrap();

    assert!(output.success());
    assert_eq!(output.stdout, "4\ntwo words\n");
    assert_eq!(output.stderr, "");
}

#[test]
fn captures_standard_output_with_a_timeout() {
    let runner = PythonRunner::new("sh", Some(Duration::from_secs(10)));
    let output = runner.run(&script("echo_args.sh"), &args(&["a", "b"])).unwrap();

    assert_eq!(output.exit_code, Some(0));
    assert_eq!(output.stdout, "a\nb\n");
}

#[test]
fn reports_exit_code_and_stderr() {
    for timeout in [None, Some(Duration::from_secs(10))] {
        let runner = PythonRunner::new("sh", timeout);
        let output = runner.run(&script("fail.sh"), &[]).unwrap();

        assert!(!output.success());
        assert_eq!(output.exit_code, Some(3));
        assert_eq!(output.stdout, "partial\n");
        assert_eq!(output.stderr, "oops\n");
    }
}

#[test]
fn kills_scripts_that_overrun_the_timeout() {
    let runner = PythonRunner::new("sh", Some(Duration::from_secs(1)));
    let started = Instant::now();
    let e = runner.run(&script("sleep.sh"), &[]).unwrap_err();

    assert_eq!(e.kind(), io::ErrorKind::TimedOut);
    assert!(started.elapsed() < Duration::from_secs(4));
}

#[test]
fn missing_interpreter_is_a_spawn_error() {
    let runner = PythonRunner::new("quill-no-such-interpreter", Some(Duration::from_secs(1)));
    let e = runner.run(&script("echo_args.sh"), &[]).unwrap_err();

    assert_eq!(e.kind(), io::ErrorKind::NotFound);
}
