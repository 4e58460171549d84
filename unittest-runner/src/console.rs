// Copyright (c) The nextest Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! The console the summary is printed to.

use owo_colors::{OwoColorize, Style};
use std::io::{self, Write};

/// A color used for highlighted console output.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum ConsoleColor {
    /// Used for passing results.
    Green,

    /// Used for failing results.
    Red,
}

/// Something the summary can be written to.
pub trait Console {
    /// Returns true if colored text is rendered as color.
    fn supports_color(&self) -> bool;

    /// Writes text without any styling.
    fn write_plain(&mut self, text: &str) -> io::Result<()>;

    /// Writes text in `color`, or plainly if the console doesn't support color.
    fn write_colored(&mut self, text: &str, color: ConsoleColor) -> io::Result<()>;

    /// Flushes buffered output.
    fn flush(&mut self) -> io::Result<()>;
}

/// A [`Console`] backed by any writer, emitting ANSI escapes when colorized.
#[derive(Debug)]
pub struct TermConsole<W> {
    writer: W,
    styles: Box<Styles>,
}

impl<W: Write> TermConsole<W> {
    /// Creates a new, uncolorized console.
    pub fn new(writer: W) -> Self {
        Self {
            writer,
            styles: Box::default(),
        }
    }

    /// Turns on colorized output.
    pub fn colorize(&mut self) {
        self.styles.colorize();
    }

    /// Returns the underlying writer.
    pub fn into_inner(self) -> W {
        self.writer
    }
}

impl<W: Write> Console for TermConsole<W> {
    fn supports_color(&self) -> bool {
        self.styles.is_colorized
    }

    fn write_plain(&mut self, text: &str) -> io::Result<()> {
        self.writer.write_all(text.as_bytes())
    }

    fn write_colored(&mut self, text: &str, color: ConsoleColor) -> io::Result<()> {
        if !self.styles.is_colorized {
            return self.write_plain(text);
        }
        let style = match color {
            ConsoleColor::Green => self.styles.pass,
            ConsoleColor::Red => self.styles.fail,
        };
        write!(self.writer, "{}", text.style(style))
    }

    fn flush(&mut self) -> io::Result<()> {
        self.writer.flush()
    }
}

#[derive(Debug, Default)]
struct Styles {
    is_colorized: bool,
    pass: Style,
    fail: Style,
}

impl Styles {
    fn colorize(&mut self) {
        self.is_colorized = true;
        self.pass = Style::new().bright_green();
        self.fail = Style::new().bright_red();
    }
}
