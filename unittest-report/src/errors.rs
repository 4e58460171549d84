// Copyright (c) The nextest Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Errors produced while reading or rewriting reports.

use camino::Utf8PathBuf;
use std::io;
use thiserror::Error;

/// An error that occurs while splitting a dotted test case name into its three segments.
#[derive(Clone, Debug, Eq, PartialEq, Error)]
#[error(
    "test case name `{input}` has {part_count} dot-separated part(s), \
     expected 3 (<suite>.<case>.<assertion>)"
)]
pub struct AssertionNameParseError {
    input: String,
    part_count: usize,
}

impl AssertionNameParseError {
    pub(crate) fn new(input: impl Into<String>, part_count: usize) -> Self {
        Self {
            input: input.into(),
            part_count,
        }
    }

    /// Returns the name that failed to parse.
    pub fn input(&self) -> &str {
        &self.input
    }

    /// Returns the number of dot-separated parts that were found.
    pub fn part_count(&self) -> usize {
        self.part_count
    }
}

/// Malformed XML, along with the byte offset at which the reader gave up.
#[derive(Debug, Error)]
#[error("malformed XML at byte offset {position}")]
pub struct XmlError {
    position: usize,
    #[source]
    err: quick_xml::Error,
}

impl XmlError {
    pub(crate) fn new(position: usize, err: impl Into<quick_xml::Error>) -> Self {
        Self {
            position,
            err: err.into(),
        }
    }

    /// Returns the byte offset into the document.
    pub fn position(&self) -> usize {
        self.position
    }
}

/// An error that occurs while parsing a report document.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum ReportParseError {
    /// The document is not well-formed XML.
    #[error(transparent)]
    Xml(#[from] XmlError),

    /// The document does not contain any element.
    #[error("report does not contain a root element")]
    NoRootElement,

    /// The document ended with elements still open.
    #[error("report ended with {open_elements} element(s) still open")]
    UnexpectedEof {
        /// The number of elements that were never closed.
        open_elements: usize,
    },

    /// A `testcase` element has no `name` attribute.
    #[error("test case at index {index} has no `name` attribute")]
    MissingTestcaseName {
        /// The 0-based index of the test case within the root element.
        index: usize,
    },

    /// A `testcase` name is not of the form `<suite>.<case>.<assertion>`.
    #[error("test case at index {index} has an invalid name")]
    InvalidTestcaseName {
        /// The 0-based index of the test case within the root element.
        index: usize,

        /// The underlying error.
        #[source]
        err: AssertionNameParseError,
    },
}

/// An error that occurs while reading a report from disk.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum ReportReadError {
    /// The file could not be read.
    #[error("failed to read report `{path}`")]
    Read {
        /// The report path.
        path: Utf8PathBuf,

        /// The underlying error.
        #[source]
        err: io::Error,
    },

    /// The file was read but could not be parsed.
    #[error("failed to parse report `{path}`")]
    Parse {
        /// The report path.
        path: Utf8PathBuf,

        /// The underlying error.
        #[source]
        err: ReportParseError,
    },
}

/// An error that occurs while rewriting the root element of a report in memory.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum ReportRenameError {
    /// The root element is not a `testsuite`.
    #[error("root tag is `{found}`, expected `{expected}`")]
    RootTagMismatch {
        /// The tag that was expected.
        expected: &'static str,

        /// The tag that was found.
        found: String,
    },

    /// The document does not contain any element.
    #[error("report does not contain a root element")]
    NoRootElement,

    /// The document ended with elements still open.
    #[error("report ended with {open_elements} element(s) still open")]
    UnexpectedEof {
        /// The number of elements that were never closed.
        open_elements: usize,
    },

    /// The document is not well-formed XML.
    #[error(transparent)]
    Xml(#[from] XmlError),
}

/// An error that occurs while setting the suite name of a report on disk.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum SetSuiteNameError {
    /// The file could not be read.
    #[error("failed to read report `{path}`")]
    Read {
        /// The report path.
        path: Utf8PathBuf,

        /// The underlying error.
        #[source]
        err: io::Error,
    },

    /// The document could not be rewritten. The file was left untouched.
    #[error("failed to rename test suite in `{path}`")]
    Rename {
        /// The report path.
        path: Utf8PathBuf,

        /// The underlying error.
        #[source]
        err: ReportRenameError,
    },

    /// The rewritten document could not be persisted.
    #[error("failed to write report `{path}`")]
    Write {
        /// The report path.
        path: Utf8PathBuf,

        /// The underlying error.
        #[source]
        err: io::Error,
    },
}
