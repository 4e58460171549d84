// Copyright (c) The nextest Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Parse a report document into [`TestResults`].

use crate::{
    AssertionName, AssertionResult, FAILURE_TAG, FAILURES_ATTR, NAME_ATTR, TESTCASE_TAG,
    TESTS_ATTR, TestResults,
    errors::{ReportParseError, ReportReadError, XmlError},
};
use camino::Utf8Path;
use quick_xml::{
    Reader,
    events::{BytesStart, Event},
};

/// A parsed report document.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct ParsedReport {
    /// The `name` attribute of the root element, if any.
    pub suite_name: Option<String>,

    /// The counts the producer wrote on the root element.
    pub declared: DeclaredCounts,

    /// The number of `testcase` elements seen.
    pub testcases: usize,

    /// The number of `testcase` elements with at least one `failure` child.
    pub failed_testcases: usize,

    /// The assertion results.
    pub results: TestResults,
}

/// Counts declared through the `tests` and `failures` attributes of the root element.
///
/// Attributes that are absent or not a number are `None`.
#[derive(Copy, Clone, Debug, Default, Eq, PartialEq)]
pub struct DeclaredCounts {
    /// The declared number of test cases.
    pub tests: Option<usize>,

    /// The declared number of failed test cases.
    pub failures: Option<usize>,
}

/// A root-element count that disagrees with the contents of the report.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum CountMismatch {
    /// The `tests` attribute disagrees with the number of `testcase` elements.
    Tests {
        /// The value of the attribute.
        declared: usize,
        /// The number of elements.
        observed: usize,
    },

    /// The `failures` attribute disagrees with the number of failed `testcase` elements.
    Failures {
        /// The value of the attribute.
        declared: usize,
        /// The number of elements.
        observed: usize,
    },
}

impl ParsedReport {
    /// Reads and parses the report at `path`.
    pub fn from_path(path: impl AsRef<Utf8Path>) -> Result<Self, ReportReadError> {
        let path = path.as_ref();
        let contents = fs_err::read_to_string(path).map_err(|err| ReportReadError::Read {
            path: path.to_owned(),
            err,
        })?;
        Self::parse_str(&contents).map_err(|err| ReportReadError::Parse {
            path: path.to_owned(),
            err,
        })
    }

    /// Parses a report document.
    pub fn parse_str(xml: &str) -> Result<Self, ReportParseError> {
        let mut reader = Reader::from_str(xml);
        let mut parser = ReportParser::default();

        loop {
            let event = reader
                .read_event()
                .map_err(|err| XmlError::new(reader.buffer_position(), err))?;
            let position = reader.buffer_position();
            match event {
                Event::Start(start) => {
                    parser.depth += 1;
                    parser.open(&start, false, position)?;
                }
                Event::Empty(start) => {
                    parser.depth += 1;
                    parser.open(&start, true, position)?;
                    parser.close();
                    parser.depth -= 1;
                }
                Event::End(_) => {
                    parser.close();
                    parser.depth = parser.depth.saturating_sub(1);
                }
                Event::Text(text) => {
                    if let Some(failure) = parser.failure_text() {
                        let text = text
                            .unescape()
                            .map_err(|err| XmlError::new(position, err))?;
                        failure.push_str(&text);
                    }
                }
                Event::CData(cdata) => {
                    if let Some(failure) = parser.failure_text() {
                        failure.push_str(&String::from_utf8_lossy(&cdata.into_inner()));
                    }
                }
                Event::Eof => {
                    if parser.depth != 0 {
                        return Err(ReportParseError::UnexpectedEof {
                            open_elements: parser.depth,
                        });
                    }
                    break;
                }
                _ => {}
            }
        }

        parser.finish()
    }

    /// Compares the declared counts with what the report actually contains.
    pub fn count_mismatches(&self) -> Vec<CountMismatch> {
        let mut mismatches = Vec::new();
        if let Some(declared) = self.declared.tests
            && declared != self.testcases
        {
            mismatches.push(CountMismatch::Tests {
                declared,
                observed: self.testcases,
            });
        }
        if let Some(declared) = self.declared.failures
            && declared != self.failed_testcases
        {
            mismatches.push(CountMismatch::Failures {
                declared,
                observed: self.failed_testcases,
            });
        }
        mismatches
    }
}

#[derive(Debug)]
struct PendingTestcase {
    name: AssertionName,
    // Some once a failure child has been seen; holds the text of the latest one.
    failure: Option<String>,
}

#[derive(Debug, Default)]
struct ReportParser {
    // Number of currently open elements, counting the one being processed.
    depth: usize,
    report: Option<ParsedReport>,
    current: Option<PendingTestcase>,
    in_failure: bool,
}

impl ReportParser {
    fn open(
        &mut self,
        start: &BytesStart<'_>,
        is_empty: bool,
        position: usize,
    ) -> Result<(), ReportParseError> {
        match self.depth {
            1 if self.report.is_none() => {
                let declared = DeclaredCounts {
                    tests: attribute_value(start, TESTS_ATTR, position)?
                        .and_then(|value| value.trim().parse().ok()),
                    failures: attribute_value(start, FAILURES_ATTR, position)?
                        .and_then(|value| value.trim().parse().ok()),
                };
                self.report = Some(ParsedReport {
                    suite_name: attribute_value(start, NAME_ATTR, position)?,
                    declared,
                    ..Default::default()
                });
            }
            2 if start.name().as_ref() == TESTCASE_TAG.as_bytes() => {
                let Some(report) = self.report.as_mut() else {
                    return Ok(());
                };
                let index = report.testcases;
                report.testcases += 1;

                let name = attribute_value(start, NAME_ATTR, position)?
                    .ok_or(ReportParseError::MissingTestcaseName { index })?;
                let name = name
                    .parse::<AssertionName>()
                    .map_err(|err| ReportParseError::InvalidTestcaseName { index, err })?;
                self.current = Some(PendingTestcase {
                    name,
                    failure: None,
                });
            }
            3 if start.name().as_ref() == FAILURE_TAG.as_bytes() => {
                if let Some(current) = &mut self.current {
                    // The last failure element wins.
                    current.failure = Some(String::new());
                    self.in_failure = !is_empty;
                }
            }
            _ => {}
        }
        Ok(())
    }

    fn close(&mut self) {
        match self.depth {
            3 => self.in_failure = false,
            2 => {
                if let Some(PendingTestcase { name, failure }) = self.current.take()
                    && let Some(report) = self.report.as_mut()
                {
                    let result = match failure {
                        Some(text) => {
                            report.failed_testcases += 1;
                            AssertionResult::fail(text.trim())
                        }
                        None => AssertionResult::pass(),
                    };
                    report.results.insert(name, result);
                }
            }
            _ => {}
        }
    }

    fn failure_text(&mut self) -> Option<&mut String> {
        if self.in_failure && self.depth == 3 {
            self.current.as_mut()?.failure.as_mut()
        } else {
            None
        }
    }

    fn finish(self) -> Result<ParsedReport, ReportParseError> {
        self.report.ok_or(ReportParseError::NoRootElement)
    }
}

fn attribute_value(
    start: &BytesStart<'_>,
    key: &str,
    position: usize,
) -> Result<Option<String>, XmlError> {
    for attr in start.attributes() {
        let attr = attr.map_err(|err| XmlError::new(position, err))?;
        if attr.key.as_ref() == key.as_bytes() {
            let value = attr
                .unescape_value()
                .map_err(|err| XmlError::new(position, err))?;
            return Ok(Some(value.into_owned()));
        }
    }
    Ok(None)
}
