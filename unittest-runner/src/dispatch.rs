// Copyright (c) The nextest Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

use crate::{
    ExpectedError,
    config::{
        BUILD_DIR_NAME_ENV, BUILD_TARGET_ENV, BuildSelection, RunnerConfig, TOOL_CHAIN_TAG_ENV,
    },
    exit_codes::RunnerExitCode,
    output::{OutputContext, OutputOpts, clap_styles},
    pipeline::{Pipeline, log_count_mismatches},
    platform::HostOs,
    reporter::SummaryReporter,
};
use camino::Utf8PathBuf;
use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;
use tracing::info;
use unittest_report::{ParsedReport, TestResults};

/// Runs firmware unit tests on the host and summarizes their results.
///
/// Without a subcommand, `run` is assumed.
#[derive(Debug, Parser)]
#[command(
    version,
    styles = clap_styles::style(),
    args_conflicts_with_subcommands = true
)]
pub struct UnitTestRunnerApp {
    #[command(flatten)]
    output: OutputOpts,

    #[command(subcommand)]
    command: Option<Command>,

    #[command(flatten)]
    run_opts: RunOpts,
}

impl UnitTestRunnerApp {
    /// Initializes the output context.
    pub fn init_output(&self) -> OutputContext {
        self.output.init()
    }

    /// Executes the app, returning the process exit code.
    pub fn exec(self, output: OutputContext) -> Result<i32, ExpectedError> {
        match self.command {
            Some(Command::Run(opts)) => opts.exec(output),
            Some(Command::Show(opts)) => opts.exec(output),
            None => self.run_opts.exec(output),
        }
    }
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Stage the firmware images, run the test hosts and summarize their reports
    ///
    /// This is the default when no subcommand is given.
    Run(RunOpts),

    /// Summarize existing reports without running anything
    Show(ShowOpts),
}

#[derive(Debug, Args)]
struct RunOpts {
    /// Directory holding the IA32 and X64 run directories [default: current directory]
    #[arg(long, short = 'C', value_name = "DIR")]
    workspace_dir: Option<PathBuf>,

    /// Build output directory name
    #[arg(long, value_name = "NAME", env = BUILD_DIR_NAME_ENV)]
    build_dir_name: Option<String>,

    /// Build target, e.g. DEBUG
    #[arg(long, value_name = "TARGET", env = BUILD_TARGET_ENV)]
    build_target: Option<String>,

    /// Toolchain tag, e.g. GCC5
    #[arg(long, value_name = "TAG", env = TOOL_CHAIN_TAG_ENV)]
    tool_chain_tag: Option<String>,

    /// Test host executable name [default: SecMain.exe]
    #[arg(long, value_name = "NAME")]
    test_host: Option<String>,
}

impl RunOpts {
    fn make_config(self) -> Result<RunnerConfig, ExpectedError> {
        let host_os = HostOs::current()?;
        let build =
            BuildSelection::new(self.build_dir_name, self.build_target, self.tool_chain_tag)?;

        let current_dir =
            std::env::current_dir().map_err(|err| ExpectedError::CurrentDirFailed { err })?;
        let workspace_dir = match self.workspace_dir {
            Some(dir) => current_dir.join(dir),
            None => current_dir,
        };
        let workspace_dir = Utf8PathBuf::try_from(workspace_dir).map_err(|err| {
            ExpectedError::WorkspaceDirInvalidUtf8 {
                path: err.into_path_buf(),
            }
        })?;

        let config = RunnerConfig::new(workspace_dir, build, host_os);
        Ok(match self.test_host {
            Some(name) => config.with_test_host_name(name),
            None => config,
        })
    }

    fn exec(self, output: OutputContext) -> Result<i32, ExpectedError> {
        let config = self.make_config()?;
        info!("running unit tests in `{}`", config.workspace_dir());

        let mut console = output.stdout_console();
        let summary = Pipeline::new(&config).run(&mut console)?;
        info!(
            "summarized {} assertions from {} report(s)",
            summary.stats.total,
            summary.reports.len()
        );
        Ok(RunnerExitCode::OK)
    }
}

#[derive(Debug, Args)]
struct ShowOpts {
    /// Report files, merged in the order given
    #[arg(required = true, value_name = "REPORT")]
    reports: Vec<Utf8PathBuf>,
}

impl ShowOpts {
    fn exec(self, output: OutputContext) -> Result<i32, ExpectedError> {
        let mut results = TestResults::new();
        for path in &self.reports {
            let report = ParsedReport::from_path(path)?;
            log_count_mismatches(path, &report);
            results.merge(report.results);
        }

        let mut console = output.stdout_console();
        SummaryReporter::new()
            .write_summary(&results, &mut console)
            .map_err(|err| ExpectedError::WriteOutputFailed { err })?;
        Ok(RunnerExitCode::OK)
    }
}
