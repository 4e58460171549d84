// Copyright (c) The nextest Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

use std::fmt;

/// The file name a firmware image is staged under, inside each run directory.
pub static STAGED_IMAGE_NAME: &str = "UNITTEST.fd";

/// The file name a test host writes its report to, inside its run directory.
pub static RESULT_FILE_NAME: &str = "TestResults.xml";

/// A firmware architecture with its own run directory and test host.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash, Ord, PartialOrd)]
pub enum Arch {
    /// 32-bit x86.
    Ia32,

    /// 64-bit x86.
    X64,
}

impl Arch {
    /// All architectures, in the order they are run and reported.
    pub const ALL: [Arch; 2] = [Arch::Ia32, Arch::X64];

    /// The run directory, relative to the workspace directory.
    pub fn dir_name(self) -> &'static str {
        match self {
            Arch::Ia32 => "IA32",
            Arch::X64 => "X64",
        }
    }

    /// The name of the prebuilt image in the FV directory.
    pub fn source_image_name(self) -> &'static str {
        match self {
            Arch::Ia32 => "UNITTEST32.fd",
            Arch::X64 => "UNITTEST64.fd",
        }
    }

    /// The name the report is moved to, relative to the workspace directory.
    pub fn report_file_name(self) -> &'static str {
        match self {
            Arch::Ia32 => "TestResults32.xml",
            Arch::X64 => "TestResults64.xml",
        }
    }

    /// The suite name written to the root element of the relocated report.
    pub fn suite_name(self) -> &'static str {
        match self {
            Arch::Ia32 => "IA32-UnitTests",
            Arch::X64 => "X64-UnitTests",
        }
    }
}

impl fmt::Display for Arch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.dir_name())
    }
}
