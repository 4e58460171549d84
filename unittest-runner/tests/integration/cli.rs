// Copyright (c) The nextest Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

use crate::{
    IA32_REPORT, X64_REPORT, serial,
    temp_workspace::{BUILD_DIR_NAME, BUILD_TARGET, FakeHost, TOOL_CHAIN_TAG, TempWorkspace},
};
use std::process::Output;
use unittest_runner::{LOG_ENV, arch::Arch, exit_codes::RunnerExitCode};

static RUNNER_BIN: &str = env!("CARGO_BIN_EXE_unittest-runner");

fn runner(args: &[&str]) -> duct::Expression {
    duct::cmd(RUNNER_BIN, args)
        .env_remove("BUILD_DIR_NAME")
        .env_remove("BUILD_TARGET")
        .env_remove("TOOL_CHAIN_TAG")
        .env_remove(LOG_ENV)
        .stdout_capture()
        .stderr_capture()
        .unchecked()
}

// duct applies inner settings last, so the build variables must be set on the
// innermost expression to take effect over `runner`'s removals.
fn with_build_env(args: &[&str]) -> duct::Expression {
    duct::cmd(RUNNER_BIN, args)
        .env("BUILD_DIR_NAME", BUILD_DIR_NAME)
        .env("BUILD_TARGET", BUILD_TARGET)
        .env("TOOL_CHAIN_TAG", TOOL_CHAIN_TAG)
        .env_remove(LOG_ENV)
        .stdout_capture()
        .stderr_capture()
        .unchecked()
}

fn stdout(output: &Output) -> String {
    String::from_utf8_lossy(&output.stdout).into_owned()
}

fn stderr(output: &Output) -> String {
    String::from_utf8_lossy(&output.stderr).into_owned()
}

#[test]
fn cli_run() {
    let _guard = serial();
    let ws = TempWorkspace::new(
        FakeHost::Report(IA32_REPORT.to_owned()),
        FakeHost::Report(X64_REPORT.to_owned()),
    )
    .unwrap();

    let output = with_build_env(&["--color", "never", "-C", ws.workspace_dir().as_str()])
        .run()
        .unwrap();
    assert_eq!(output.status.code(), Some(RunnerExitCode::OK), "{}", stderr(&output));
    assert!(
        stdout(&output).ends_with("3 tests run, 1 tests failed, 66.67% Passing\n"),
        "{}",
        stdout(&output)
    );
}

#[test]
fn cli_missing_variable() {
    let _guard = serial();
    let ws = TempWorkspace::new(FakeHost::NoReport, FakeHost::NoReport).unwrap();

    let output = runner(&["run", "--color", "never", "-C", ws.workspace_dir().as_str()])
        .env("BUILD_TARGET", BUILD_TARGET)
        .env("TOOL_CHAIN_TAG", TOOL_CHAIN_TAG)
        .run()
        .unwrap();
    assert_eq!(output.status.code(), Some(RunnerExitCode::SETUP_ERROR));
    assert!(
        stderr(&output).contains("error: `BUILD_DIR_NAME` is not set"),
        "{}",
        stderr(&output)
    );
    assert!(!ws.host_ran(Arch::Ia32));
}

#[test]
fn cli_failing_host() {
    let _guard = serial();
    let ws = TempWorkspace::new(FakeHost::NoReport, FakeHost::Fail(2)).unwrap();

    let output = with_build_env(&[
        "--color",
        "never",
        "-C",
        ws.workspace_dir().as_str(),
        "--build-dir-name",
        BUILD_DIR_NAME,
    ])
    .run()
    .unwrap();
    assert_eq!(output.status.code(), Some(RunnerExitCode::TEST_HOST_FAILED));
    assert!(
        stderr(&output).contains("X64 test host"),
        "{}",
        stderr(&output)
    );
}

#[test]
fn cli_show() {
    let _guard = serial();
    let ws = TempWorkspace::new(FakeHost::NoReport, FakeHost::NoReport).unwrap();
    let ia32 = ws.root().join("TestResults32.xml");
    fs_err::write(&ia32, IA32_REPORT).unwrap();

    let output = runner(&["show", "--color", "never", ia32.as_str()])
        .run()
        .unwrap();
    assert_eq!(output.status.code(), Some(RunnerExitCode::OK), "{}", stderr(&output));
    assert!(
        stdout(&output).starts_with("Test Suite: MockIoUnitTestsPei\n"),
        "{}",
        stdout(&output)
    );
    assert!(
        stdout(&output).ends_with("6 tests run, 2 tests failed, 66.67% Passing\n"),
        "{}",
        stdout(&output)
    );
    assert!(!ws.host_ran(Arch::Ia32), "show never runs a host");

    let missing = ws.root().join("missing.xml");
    let output = runner(&["show", missing.as_str()]).run().unwrap();
    assert_eq!(output.status.code(), Some(RunnerExitCode::REPORT_ERROR));
}
