// Copyright (c) The nextest Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! The five-stage run: stage images, run test hosts, relocate reports, summarize, clean up.
//!
//! Stages run strictly in order. The first error aborts the run and nothing staged so far is
//! cleaned up.

use crate::{
    arch::Arch,
    config::RunnerConfig,
    console::Console,
    errors::PipelineError,
    reporter::SummaryReporter,
    test_host::TestHostCli,
};
use camino::Utf8Path;
use tracing::{debug, info, warn};
use unittest_report::{CountMismatch, ParsedReport, ResultStats, TestResults, set_testsuite_name};

/// What a completed run printed.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct RunSummary {
    /// The totals written at the end of the summary.
    pub stats: ResultStats,

    /// The architectures whose relocated reports were aggregated, in run order.
    pub reports: Vec<Arch>,
}

/// Drives a run for a [`RunnerConfig`].
#[derive(Debug)]
pub struct Pipeline<'cfg> {
    config: &'cfg RunnerConfig,
}

impl<'cfg> Pipeline<'cfg> {
    /// Creates a new pipeline.
    pub fn new(config: &'cfg RunnerConfig) -> Self {
        Self { config }
    }

    /// Runs every stage, writing the summary to `console`.
    ///
    /// Failing assertions do not make the run fail.
    pub fn run(&self, console: &mut dyn Console) -> Result<RunSummary, PipelineError> {
        self.stage_images()?;
        self.run_test_hosts()?;
        self.relocate_reports()?;
        let (results, reports) = self.aggregate_reports()?;

        let stats = SummaryReporter::new()
            .write_summary(&results, console)
            .map_err(PipelineError::WriteOutput)?;

        self.cleanup_images()?;
        Ok(RunSummary { stats, reports })
    }

    /// Copies each prebuilt image into its run directory, replacing any earlier copy.
    pub fn stage_images(&self) -> Result<(), PipelineError> {
        for arch in Arch::ALL {
            let from = self.config.source_image(arch);
            let to = self.config.staged_image(arch);
            debug!("staging {arch} image `{from}` to `{to}`");
            fs_err::copy(&from, &to).map_err(|err| PipelineError::StageImage {
                from: from.clone(),
                to: to.clone(),
                err,
            })?;
        }
        info!("staged firmware images from `{}`", self.config.fv_dir());
        Ok(())
    }

    /// Runs the test host for each architecture, one after the other.
    pub fn run_test_hosts(&self) -> Result<(), PipelineError> {
        for arch in Arch::ALL {
            let cli = TestHostCli::new(self.config, arch);
            info!(
                "running {arch} test host `{}`",
                self.config.test_host_path(arch)
            );
            cli.run()?;
        }
        Ok(())
    }

    /// Moves each result file to its suite-specific name and renames its suite.
    ///
    /// An architecture without a result file is skipped.
    pub fn relocate_reports(&self) -> Result<(), PipelineError> {
        for arch in Arch::ALL {
            let from = self.config.result_file(arch);
            if !from.is_file() {
                warn!("{arch} test host did not write `{from}`, skipping");
                continue;
            }

            let to = self.config.relocated_report(arch);
            debug!("moving {arch} results `{from}` to `{to}`");
            fs_err::rename(&from, &to).map_err(|err| PipelineError::MoveReport {
                from: from.clone(),
                to: to.clone(),
                err,
            })?;
            set_testsuite_name(&to, arch.suite_name())?;
        }
        Ok(())
    }

    /// Parses and merges the relocated reports that exist, IA32 first.
    ///
    /// A suite reported by both architectures is taken from the X64 report as a whole.
    pub fn aggregate_reports(&self) -> Result<(TestResults, Vec<Arch>), PipelineError> {
        let mut results = TestResults::new();
        let mut reports = Vec::new();
        for arch in Arch::ALL {
            let path = self.config.relocated_report(arch);
            if !path.is_file() {
                debug!("no {arch} report at `{path}`");
                continue;
            }

            let report = ParsedReport::from_path(&path)?;
            log_count_mismatches(&path, &report);
            debug!(
                "read {} test cases ({} failed) from `{path}`",
                report.testcases, report.failed_testcases
            );
            results.merge(report.results);
            reports.push(arch);
        }
        Ok((results, reports))
    }

    /// Deletes the staged images.
    pub fn cleanup_images(&self) -> Result<(), PipelineError> {
        for arch in Arch::ALL {
            let path = self.config.staged_image(arch);
            debug!("deleting staged {arch} image `{path}`");
            fs_err::remove_file(&path)
                .map_err(|err| PipelineError::DeleteImage { path: path.clone(), err })?;
        }
        Ok(())
    }
}

/// Warns about root-element counts that disagree with the report's contents.
pub(crate) fn log_count_mismatches(path: &Utf8Path, report: &ParsedReport) {
    for mismatch in report.count_mismatches() {
        match mismatch {
            CountMismatch::Tests { declared, observed } => warn!(
                "`{path}` declares {declared} tests but contains {observed} test cases"
            ),
            CountMismatch::Failures { declared, observed } => warn!(
                "`{path}` declares {declared} failures but contains {observed} failed test cases"
            ),
        }
    }
}
