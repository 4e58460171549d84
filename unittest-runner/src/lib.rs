// Copyright (c) The nextest Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Runs firmware unit-test hosts for IA32 and X64 and summarizes their reports.
//!
//! A run stages the prebuilt test images into the `IA32` and `X64` run directories, runs the test
//! host in each, moves the reports next to the run directories under suite-specific names, and
//! prints a merged pass/fail summary. The staged images are deleted afterwards.

#![warn(missing_docs)]

pub mod arch;
pub mod config;
pub mod console;
mod dispatch;
pub mod errors;
pub mod exit_codes;
mod output;
pub mod pipeline;
pub mod platform;
pub mod reporter;
pub mod test_host;

#[doc(hidden)]
pub use dispatch::*;
#[doc(hidden)]
pub use errors::ExpectedError;
pub use output::{Color, LOG_ENV, OutputContext};
