// Copyright (c) The nextest Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Renders merged test results as an indented pass/fail tree.

use crate::console::{Console, ConsoleColor};
use std::io;
use unittest_report::{ResultStats, TestResults};

/// The column assertion names are padded to, not counting the indent and the `: ` separator.
const STATUS_COLUMN: usize = 67;

/// Writes a summary of [`TestResults`] to a [`Console`].
#[derive(Debug, Default)]
pub struct SummaryReporter {
    _private: (),
}

impl SummaryReporter {
    /// Creates a new reporter.
    pub fn new() -> Self {
        Self::default()
    }

    /// Writes every suite, case and assertion in sorted order, followed by the totals.
    pub fn write_summary(
        &self,
        results: &TestResults,
        console: &mut dyn Console,
    ) -> io::Result<ResultStats> {
        let mut stats = ResultStats::default();

        for suite in results.suites() {
            console.write_plain(&format!("Test Suite: {}\n", suite.name()))?;
            for case in suite.cases() {
                console.write_plain(&format!("  Test Case: {}\n", case.name()))?;
                for (assertion, result) in case.assertions() {
                    stats.total += 1;
                    let padding = STATUS_COLUMN.saturating_sub(assertion.chars().count());
                    console.write_plain(&format!("    {assertion}: {:padding$}", ""))?;
                    if result.passed {
                        console.write_colored("Passed", ConsoleColor::Green)?;
                        console.write_plain("\n")?;
                    } else {
                        stats.failures += 1;
                        console.write_colored("Failed", ConsoleColor::Red)?;
                        console.write_plain(&format!("\n      {}\n", result.message))?;
                    }
                }
            }
        }

        console.write_plain(&format!(
            "{} tests run, {} tests failed, {:.2}% Passing\n",
            stats.total,
            stats.failures,
            stats.pass_percentage(),
        ))?;
        console.flush()?;

        Ok(stats)
    }
}
