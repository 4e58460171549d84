// Copyright (c) The nextest Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Read and rewrite the XML reports produced by firmware unit-test hosts.
//!
//! A report is a single `testsuite` element holding a flat list of `testcase` elements. Each case
//! is named `<suite>.<case>.<assertion>` and fails if it has at least one `failure` child. Parsing
//! a report produces a [`TestResults`] tree keyed by those three segments.

mod errors;
mod parse;
mod rename;
mod results;

pub use errors::*;
pub use parse::*;
pub use rename::*;
pub use results::*;

pub(crate) static TESTSUITE_TAG: &str = "testsuite";
pub(crate) static TESTCASE_TAG: &str = "testcase";
pub(crate) static FAILURE_TAG: &str = "failure";
pub(crate) static NAME_ATTR: &str = "name";
pub(crate) static TESTS_ATTR: &str = "tests";
pub(crate) static FAILURES_ATTR: &str = "failures";
