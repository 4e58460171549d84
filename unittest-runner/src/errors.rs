// Copyright (c) The nextest Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Errors produced by the runner.

use crate::{arch::Arch, exit_codes::RunnerExitCode};
use camino::Utf8PathBuf;
use std::{error::Error, io, path::PathBuf, process::ExitStatus};
use thiserror::Error;
use tracing::error;
use unittest_report::{ReportReadError, SetSuiteNameError};

/// A required configuration value was not provided.
#[derive(Clone, Debug, Eq, PartialEq, Error)]
#[non_exhaustive]
pub enum ConfigError {
    /// Neither the command-line option nor the environment variable was set.
    #[error("`{env_var}` is not set (pass `--{option}` or set the `{env_var}` environment variable)")]
    MissingVariable {
        /// The command-line option, without leading dashes.
        option: &'static str,

        /// The environment variable.
        env_var: &'static str,
    },
}

/// The runner does not know how to drive test hosts on this operating system.
#[derive(Clone, Debug, Eq, PartialEq, Error)]
#[error("unsupported host platform `{os}`")]
pub struct UnsupportedHostPlatform {
    os: String,
}

impl UnsupportedHostPlatform {
    pub(crate) fn new(os: impl Into<String>) -> Self {
        Self { os: os.into() }
    }
}

/// An error that occurs while running a test host.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum TestHostError {
    /// The test host could not be started.
    #[error("failed to execute {arch} test host `{program}`")]
    Exec {
        /// The architecture being run.
        arch: Arch,

        /// The test host executable.
        program: Utf8PathBuf,

        /// The underlying error.
        #[source]
        err: io::Error,
    },

    /// The test host exited unsuccessfully.
    #[error("{arch} test host `{program}` failed with {status}")]
    Failed {
        /// The architecture being run.
        arch: Arch,

        /// The test host executable.
        program: Utf8PathBuf,

        /// The exit status.
        status: ExitStatus,
    },
}

/// An error that aborts a pipeline run.
///
/// Staged images are not cleaned up when one of these occurs.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum PipelineError {
    /// A firmware image could not be copied into a run directory.
    #[error("failed to stage firmware image `{from}` to `{to}`")]
    StageImage {
        /// The prebuilt image.
        from: Utf8PathBuf,

        /// The staged copy.
        to: Utf8PathBuf,

        /// The underlying error.
        #[source]
        err: io::Error,
    },

    /// A test host failed.
    #[error(transparent)]
    TestHost(#[from] TestHostError),

    /// A result file could not be moved to its suite-specific name.
    #[error("failed to move test results `{from}` to `{to}`")]
    MoveReport {
        /// The result file written by the test host.
        from: Utf8PathBuf,

        /// The relocated report.
        to: Utf8PathBuf,

        /// The underlying error.
        #[source]
        err: io::Error,
    },

    /// The suite name of a relocated report could not be set.
    #[error(transparent)]
    SetSuiteName(#[from] SetSuiteNameError),

    /// A relocated report could not be read.
    #[error(transparent)]
    ReadReport(#[from] ReportReadError),

    /// The summary could not be written.
    #[error("failed to write test summary")]
    WriteOutput(#[source] io::Error),

    /// A staged firmware image could not be deleted.
    #[error("failed to delete staged firmware image `{path}`")]
    DeleteImage {
        /// The staged image.
        path: Utf8PathBuf,

        /// The underlying error.
        #[source]
        err: io::Error,
    },
}

impl PipelineError {
    fn process_exit_code(&self) -> i32 {
        match self {
            Self::StageImage { .. } | Self::MoveReport { .. } | Self::DeleteImage { .. } => {
                RunnerExitCode::FILE_OPERATION_FAILED
            }
            Self::TestHost(TestHostError::Exec { .. }) => RunnerExitCode::TEST_HOST_EXEC_FAILED,
            Self::TestHost(TestHostError::Failed { .. }) => RunnerExitCode::TEST_HOST_FAILED,
            Self::SetSuiteName(SetSuiteNameError::Write { .. }) => {
                RunnerExitCode::FILE_OPERATION_FAILED
            }
            Self::SetSuiteName(_) | Self::ReadReport(_) => RunnerExitCode::REPORT_ERROR,
            Self::WriteOutput(_) => RunnerExitCode::WRITE_OUTPUT_ERROR,
        }
    }
}

// Note that the #[error()] strings are mostly placeholder messages -- the expected way to print out
// errors is with the display_to_stderr method, which colorizes errors.

/// An error that the runner expects and reports with a dedicated exit code.
#[derive(Debug, Error)]
#[doc(hidden)]
pub enum ExpectedError {
    #[error("could not determine the current directory")]
    CurrentDirFailed {
        #[source]
        err: io::Error,
    },
    #[error("workspace directory is not valid UTF-8")]
    WorkspaceDirInvalidUtf8 { path: PathBuf },
    #[error("configuration error")]
    ConfigError {
        #[from]
        err: ConfigError,
    },
    #[error("unsupported host platform")]
    UnsupportedHostPlatform {
        #[from]
        err: UnsupportedHostPlatform,
    },
    #[error("pipeline failed")]
    PipelineFailed {
        #[from]
        err: PipelineError,
    },
    #[error("failed to read report")]
    ReadReportFailed {
        #[from]
        err: ReportReadError,
    },
    #[error("failed to write output")]
    WriteOutputFailed {
        #[source]
        err: io::Error,
    },
}

impl ExpectedError {
    /// Returns the exit code for the process.
    pub fn process_exit_code(&self) -> i32 {
        match self {
            Self::CurrentDirFailed { .. }
            | Self::WorkspaceDirInvalidUtf8 { .. }
            | Self::ConfigError { .. }
            | Self::UnsupportedHostPlatform { .. } => RunnerExitCode::SETUP_ERROR,
            Self::PipelineFailed { err } => err.process_exit_code(),
            Self::ReadReportFailed { .. } => RunnerExitCode::REPORT_ERROR,
            Self::WriteOutputFailed { .. } => RunnerExitCode::WRITE_OUTPUT_ERROR,
        }
    }

    /// Displays this error to stderr.
    pub fn display_to_stderr(&self) {
        let mut next_error = match &self {
            Self::CurrentDirFailed { err } => {
                error!("could not determine the current directory");
                Some(err as &dyn Error)
            }
            Self::WorkspaceDirInvalidUtf8 { path } => {
                error!("workspace directory `{}` is not valid UTF-8", path.display());
                None
            }
            Self::ConfigError { err } => {
                error!("{err}");
                err.source()
            }
            Self::UnsupportedHostPlatform { err } => {
                error!("{err}");
                err.source()
            }
            Self::PipelineFailed { err } => {
                error!("{err}");
                err.source()
            }
            Self::ReadReportFailed { err } => {
                error!("{err}");
                err.source()
            }
            Self::WriteOutputFailed { err } => {
                error!("failed to write output");
                Some(err as &dyn Error)
            }
        };

        while let Some(err) = next_error {
            error!(target: "unittest_runner::no_heading", "\nCaused by:\n  {}", err);
            next_error = err.source();
        }
    }
}
