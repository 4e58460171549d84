// Copyright (c) The nextest Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

use crate::errors::AssertionNameParseError;
use std::{collections::BTreeMap, fmt, str::FromStr};

/// The three segments of a dotted test case name: `<suite>.<case>.<assertion>`.
#[derive(Clone, Debug, Eq, PartialEq, Ord, PartialOrd, Hash)]
pub struct AssertionName {
    /// The suite, the first segment.
    pub suite: String,

    /// The case, the second segment.
    pub case: String,

    /// The assertion, the third segment.
    pub assertion: String,
}

impl AssertionName {
    /// Creates a new `AssertionName` from its segments.
    pub fn new(
        suite: impl Into<String>,
        case: impl Into<String>,
        assertion: impl Into<String>,
    ) -> Self {
        Self {
            suite: suite.into(),
            case: case.into(),
            assertion: assertion.into(),
        }
    }
}

impl FromStr for AssertionName {
    type Err = AssertionNameParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let parts: Vec<&str> = s.split('.').collect();
        match parts.as_slice() {
            [suite, case, assertion] => Ok(Self::new(*suite, *case, *assertion)),
            _ => Err(AssertionNameParseError::new(s, parts.len())),
        }
    }
}

impl fmt::Display for AssertionName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}.{}", self.suite, self.case, self.assertion)
    }
}

/// The outcome of a single assertion.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct AssertionResult {
    /// Whether the assertion passed.
    pub passed: bool,

    /// The failure detail. Empty for passing assertions.
    pub message: String,
}

impl AssertionResult {
    /// A passing result.
    pub fn pass() -> Self {
        Self {
            passed: true,
            message: String::new(),
        }
    }

    /// A failing result with the given detail.
    pub fn fail(message: impl Into<String>) -> Self {
        Self {
            passed: false,
            message: message.into(),
        }
    }
}

type CaseMap = BTreeMap<String, AssertionResult>;
type SuiteMap = BTreeMap<String, CaseMap>;

/// Assertion results grouped by suite, then by case.
///
/// Every level is kept sorted, so iteration always yields suites, cases and assertions in
/// lexicographic order.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct TestResults {
    suites: BTreeMap<String, SuiteMap>,
}

impl TestResults {
    /// Creates an empty result set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Records a result. A later result for the same name replaces the earlier one.
    pub fn insert(&mut self, name: AssertionName, result: AssertionResult) -> &mut Self {
        let AssertionName {
            suite,
            case,
            assertion,
        } = name;
        self.suites
            .entry(suite)
            .or_default()
            .entry(case)
            .or_default()
            .insert(assertion, result);
        self
    }

    /// Folds `other` into this result set.
    ///
    /// A suite present in both is replaced as a whole by the one from `other`: none of this
    /// set's cases or assertions for that suite are kept.
    pub fn merge(&mut self, other: TestResults) -> &mut Self {
        self.suites.extend(other.suites);
        self
    }

    /// Looks up a single result.
    pub fn get(&self, suite: &str, case: &str, assertion: &str) -> Option<&AssertionResult> {
        self.suites.get(suite)?.get(case)?.get(assertion)
    }

    /// Returns true if no results have been recorded.
    pub fn is_empty(&self) -> bool {
        self.suites.is_empty()
    }

    /// Iterates over suites in sorted order.
    pub fn suites(&self) -> impl Iterator<Item = SuiteResults<'_>> + '_ {
        self.suites
            .iter()
            .map(|(name, cases)| SuiteResults { name, cases })
    }

    /// Counts the recorded assertions and failures.
    pub fn stats(&self) -> ResultStats {
        let mut stats = ResultStats::default();
        for result in self
            .suites
            .values()
            .flat_map(|cases| cases.values())
            .flat_map(|assertions| assertions.values())
        {
            stats.total += 1;
            if !result.passed {
                stats.failures += 1;
            }
        }
        stats
    }
}

/// A view over the cases of one suite.
#[derive(Clone, Copy, Debug)]
pub struct SuiteResults<'a> {
    name: &'a str,
    cases: &'a SuiteMap,
}

impl<'a> SuiteResults<'a> {
    /// The suite name.
    pub fn name(&self) -> &'a str {
        self.name
    }

    /// Iterates over cases in sorted order.
    pub fn cases(self) -> impl Iterator<Item = CaseResults<'a>> + 'a {
        self.cases
            .iter()
            .map(|(name, assertions)| CaseResults { name, assertions })
    }
}

/// A view over the assertions of one case.
#[derive(Clone, Copy, Debug)]
pub struct CaseResults<'a> {
    name: &'a str,
    assertions: &'a CaseMap,
}

impl<'a> CaseResults<'a> {
    /// The case name.
    pub fn name(&self) -> &'a str {
        self.name
    }

    /// Iterates over `(assertion name, result)` pairs in sorted order.
    pub fn assertions(self) -> impl Iterator<Item = (&'a str, &'a AssertionResult)> + 'a {
        self.assertions
            .iter()
            .map(|(name, result)| (name.as_str(), result))
    }
}

/// Assertion counts over a result set.
#[derive(Copy, Clone, Debug, Default, Eq, PartialEq)]
pub struct ResultStats {
    /// The number of assertions.
    pub total: usize,

    /// The number of failed assertions.
    pub failures: usize,
}

impl ResultStats {
    /// The number of passed assertions.
    pub fn passed(&self) -> usize {
        self.total - self.failures
    }

    /// The share of passing assertions, as a percentage.
    ///
    /// A run with no assertions counts as fully passing.
    pub fn pass_percentage(&self) -> f64 {
        if self.total == 0 {
            100.0
        } else {
            (1.0 - self.failures as f64 / self.total as f64) * 100.0
        }
    }
}
