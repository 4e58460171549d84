// Copyright (c) The nextest Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Integration tests
//!
//! These drive the pipeline and the binary against fake test hosts: shell scripts that check the
//! staged image and copy a canned report into place.

#![cfg(unix)]

use pretty_assertions::assert_eq;
use std::sync::{Mutex, MutexGuard};
use unittest_report::{ParsedReport, ResultStats};
use unittest_runner::{
    arch::Arch,
    console::TermConsole,
    errors::{PipelineError, TestHostError},
    pipeline::{Pipeline, RunSummary},
};

mod cli;
mod temp_workspace;

use temp_workspace::{FakeHost, TempWorkspace};

static IA32_REPORT: &str = include_str!("../../../fixtures/reports/TestResults.xml");

static X64_REPORT: &str = r#"<?xml version="1.0" encoding="utf-8"?>
<testsuite name="UnitTests" tests="2" failures="1" errors="0">
  <testcase name="SampleTestSuitePei.TestCase1.Case1_Test3"></testcase>
  <testcase name="X64Only.Case.Check">
    <failure>x64 only</failure>
  </testcase>
</testsuite>
"#;

// Writing an executable while another thread forks can make exec fail with ETXTBSY.
static SERIAL: Mutex<()> = Mutex::new(());

fn serial() -> MutexGuard<'static, ()> {
    SERIAL.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

fn run(ws: &TempWorkspace) -> (Result<RunSummary, PipelineError>, String) {
    let config = ws.config();
    let mut console = TermConsole::new(Vec::new());
    let result = Pipeline::new(&config).run(&mut console);
    (result, String::from_utf8(console.into_inner()).unwrap())
}

#[test]
fn full_run() {
    let _guard = serial();
    let ws = TempWorkspace::new(
        FakeHost::Report(IA32_REPORT.to_owned()),
        FakeHost::Report(X64_REPORT.to_owned()),
    )
    .unwrap();

    let (result, output) = run(&ws);
    let summary = result.unwrap();

    assert_eq!(summary.reports, vec![Arch::Ia32, Arch::X64]);
    assert_eq!(
        summary.stats,
        ResultStats {
            total: 3,
            failures: 1
        }
    );
    assert!(
        output.ends_with("3 tests run, 1 tests failed, 66.67% Passing\n"),
        "{output}"
    );
    // The X64 report replaces the suite both architectures ran, IA32-only suites are kept.
    assert!(!output.contains("Case1_Test1"), "{output}");
    assert!(!output.contains("Unit Test 3 in Test Case 1"), "{output}");
    assert!(output.contains("Test Suite: MockIoUnitTestsPei\n"), "{output}");
    assert!(output.contains("      x64 only\n"), "{output}");

    for arch in Arch::ALL {
        assert!(ws.host_ran(arch), "{arch} host ran");
        assert!(
            !ws.arch_dir(arch).join("UNITTEST.fd").exists(),
            "{arch} staged image was cleaned up"
        );
        assert!(
            !ws.arch_dir(arch).join("TestResults.xml").exists(),
            "{arch} result file was moved"
        );

        let report = ParsedReport::from_path(ws.workspace_dir().join(arch.report_file_name()))
            .unwrap();
        assert_eq!(report.suite_name.as_deref(), Some(arch.suite_name()));
    }

    // The prebuilt images are copied, not moved.
    assert!(
        ws.root()
            .join("Build/UnitTestPkg/DEBUG_GCC5/FV/UNITTEST32.fd")
            .exists()
    );
}

#[test]
fn missing_x64_report_is_tolerated() {
    let _guard = serial();
    let ws = TempWorkspace::new(FakeHost::Report(IA32_REPORT.to_owned()), FakeHost::NoReport)
        .unwrap();

    let (result, output) = run(&ws);
    let summary = result.unwrap();

    let ia32_alone = ParsedReport::parse_str(IA32_REPORT).unwrap();
    assert_eq!(summary.reports, vec![Arch::Ia32]);
    assert_eq!(summary.stats, ia32_alone.results.stats());
    assert!(
        output.ends_with("6 tests run, 2 tests failed, 66.67% Passing\n"),
        "{output}"
    );
    assert!(!ws.workspace_dir().join("TestResults64.xml").exists());
    assert!(!ws.arch_dir(Arch::X64).join("UNITTEST.fd").exists());
}

#[test]
fn failing_host_aborts_run() {
    let _guard = serial();
    let ws =
        TempWorkspace::new(FakeHost::Fail(7), FakeHost::Report(X64_REPORT.to_owned())).unwrap();

    let (result, output) = run(&ws);
    match result.unwrap_err() {
        PipelineError::TestHost(TestHostError::Failed { arch, status, .. }) => {
            assert_eq!(arch, Arch::Ia32);
            assert_eq!(status.code(), Some(7));
        }
        other => panic!("unexpected error: {other:?}"),
    }

    assert_eq!(output, "", "nothing is printed");
    assert!(!ws.host_ran(Arch::X64), "X64 host never ran");
    for arch in Arch::ALL {
        assert!(
            ws.arch_dir(arch).join("UNITTEST.fd").exists(),
            "{arch} staged image is left behind"
        );
    }
}

#[test]
fn missing_test_host() {
    let _guard = serial();
    let ws = TempWorkspace::new(FakeHost::NoReport, FakeHost::NoReport).unwrap();
    let config = ws.config().with_test_host_name("NoSuchHost");

    let err = Pipeline::new(&config)
        .run(&mut TermConsole::new(Vec::new()))
        .unwrap_err();
    assert!(
        matches!(
            err,
            PipelineError::TestHost(TestHostError::Exec {
                arch: Arch::Ia32,
                ..
            })
        ),
        "unexpected error: {err:?}"
    );
}

#[test]
fn missing_image() {
    let _guard = serial();
    let ws = TempWorkspace::new(FakeHost::NoReport, FakeHost::NoReport).unwrap();
    fs_err::remove_file(
        ws.root()
            .join("Build/UnitTestPkg/DEBUG_GCC5/FV")
            .join(Arch::X64.source_image_name()),
    )
    .unwrap();

    let (result, _) = run(&ws);
    match result.unwrap_err() {
        PipelineError::StageImage { from, .. } => {
            assert_eq!(from.file_name(), Some("UNITTEST64.fd"));
        }
        other => panic!("unexpected error: {other:?}"),
    }
    assert!(!ws.host_ran(Arch::Ia32), "no host runs before staging completes");
}
