// Copyright (c) The nextest Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Rewrite the suite name on the root element of a report.
//!
//! The document is streamed through a reader and a writer so that everything other than the root
//! `name` attribute comes out byte-for-byte as it went in.

use crate::{
    NAME_ATTR, TESTSUITE_TAG,
    errors::{ReportRenameError, SetSuiteNameError, XmlError},
};
use atomicwrites::{AtomicFile, OverwriteBehavior};
use camino::Utf8Path;
use quick_xml::{
    Reader, Writer,
    events::{BytesStart, Event},
};
use std::io::Write;

/// Sets the `name` attribute of the root `testsuite` element of the report at `path`.
///
/// The file is replaced atomically. If the root element is not a `testsuite`, or the document is
/// malformed, an error is returned and the file is left as it was.
pub fn set_testsuite_name(path: impl AsRef<Utf8Path>, name: &str) -> Result<(), SetSuiteNameError> {
    let path = path.as_ref();
    let contents = fs_err::read_to_string(path).map_err(|err| SetSuiteNameError::Read {
        path: path.to_owned(),
        err,
    })?;
    let renamed = rename_testsuite(&contents, name).map_err(|err| SetSuiteNameError::Rename {
        path: path.to_owned(),
        err,
    })?;

    AtomicFile::new(path, OverwriteBehavior::AllowOverwrite)
        .write(|file| file.write_all(renamed.as_bytes()))
        .map_err(|err| SetSuiteNameError::Write {
            path: path.to_owned(),
            err: match err {
                atomicwrites::Error::Internal(err) | atomicwrites::Error::User(err) => err,
            },
        })
}

/// Returns `xml` with the root `testsuite` element's `name` attribute set to `name`.
///
/// An existing `name` attribute keeps its position among the other attributes. If there is none,
/// it is appended.
pub fn rename_testsuite(xml: &str, name: &str) -> Result<String, ReportRenameError> {
    let mut reader = Reader::from_str(xml);
    let mut writer = Writer::new(Vec::with_capacity(xml.len()));
    let mut seen_root = false;
    let mut depth = 0_usize;

    loop {
        let event = reader
            .read_event()
            .map_err(|err| XmlError::new(reader.buffer_position(), err))?;
        let position = reader.buffer_position();
        let event = match event {
            Event::Start(start) if !seen_root => {
                seen_root = true;
                depth += 1;
                Event::Start(renamed_root(&start, name, position)?)
            }
            Event::Empty(start) if !seen_root => {
                seen_root = true;
                Event::Empty(renamed_root(&start, name, position)?)
            }
            Event::Start(start) => {
                depth += 1;
                Event::Start(start)
            }
            Event::End(end) => {
                depth = depth.saturating_sub(1);
                Event::End(end)
            }
            Event::Eof => {
                if depth != 0 {
                    return Err(ReportRenameError::UnexpectedEof {
                        open_elements: depth,
                    });
                }
                break;
            }
            other => other,
        };
        writer
            .write_event(event)
            .map_err(|err| XmlError::new(position, err))?;
    }

    if !seen_root {
        return Err(ReportRenameError::NoRootElement);
    }

    // The input was a str and every event is written back verbatim or built from strs.
    Ok(String::from_utf8_lossy(&writer.into_inner()).into_owned())
}

fn renamed_root(
    start: &BytesStart<'_>,
    name: &str,
    position: usize,
) -> Result<BytesStart<'static>, ReportRenameError> {
    let tag = start.name();
    if tag.as_ref() != TESTSUITE_TAG.as_bytes() {
        return Err(ReportRenameError::RootTagMismatch {
            expected: TESTSUITE_TAG,
            found: String::from_utf8_lossy(tag.as_ref()).into_owned(),
        });
    }

    let mut renamed = BytesStart::new(TESTSUITE_TAG);
    let mut replaced = false;
    for attr in start.attributes() {
        let attr = attr.map_err(|err| XmlError::new(position, err))?;
        if attr.key.as_ref() == NAME_ATTR.as_bytes() {
            renamed.push_attribute((NAME_ATTR, name));
            replaced = true;
        } else {
            renamed.push_attribute(attr);
        }
    }
    if !replaced {
        renamed.push_attribute((NAME_ATTR, name));
    }
    Ok(renamed)
}
