// Copyright (c) The nextest Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Host platform detection.

use crate::errors::UnsupportedHostPlatform;
use tracing::warn;

/// The operating system the runner is executing on.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum HostOs {
    /// Windows.
    Windows,

    /// macOS.
    MacOs,

    /// Linux, and other Unix systems treated like it.
    Linux,
}

impl HostOs {
    /// Detects the current host.
    ///
    /// Unix systems other than Linux and macOS are treated as Linux, with a warning.
    pub fn current() -> Result<Self, UnsupportedHostPlatform> {
        Self::detect(std::env::consts::OS, cfg!(unix))
    }

    fn detect(os: &str, is_unix: bool) -> Result<Self, UnsupportedHostPlatform> {
        match os {
            "windows" => Ok(HostOs::Windows),
            "macos" => Ok(HostOs::MacOs),
            "linux" => Ok(HostOs::Linux),
            other if is_unix => {
                warn!("unrecognized Unix OS `{other}`, treating it as Linux");
                Ok(HostOs::Linux)
            }
            other => Err(UnsupportedHostPlatform::new(other)),
        }
    }
}
