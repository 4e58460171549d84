// Copyright (c) The nextest Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

/// Documented exit codes for `unittest-runner` failures.
///
/// Test outcomes never affect the exit code: a run in which assertions fail still exits with
/// [`OK`](Self::OK). The codes below are for the runner itself failing.
///
/// Unknown/unexpected failures will always result in exit code 1.
pub enum RunnerExitCode {}

impl RunnerExitCode {
    /// No errors occurred and the runner exited normally.
    pub const OK: i32 = 0;

    /// The runner could not be set up: a required variable was missing, the host platform is
    /// unsupported, or the workspace directory is unusable.
    pub const SETUP_ERROR: i32 = 96;

    /// A test host exited with a nonzero status.
    pub const TEST_HOST_FAILED: i32 = 100;

    /// A test host could not be started, for example because the executable is missing.
    pub const TEST_HOST_EXEC_FAILED: i32 = 101;

    /// Copying, moving or deleting a file failed.
    pub const FILE_OPERATION_FAILED: i32 = 103;

    /// A report could not be read, parsed or rewritten.
    pub const REPORT_ERROR: i32 = 104;

    /// Writing data to stdout or stderr produced an error.
    pub const WRITE_OUTPUT_ERROR: i32 = 110;
}
