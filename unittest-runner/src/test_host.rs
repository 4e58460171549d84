// Copyright (c) The nextest Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

use crate::{arch::Arch, config::RunnerConfig, errors::TestHostError};
use camino::Utf8PathBuf;
use tracing::{debug, trace};

/// A test host invocation for one architecture.
///
/// The test host runs in its architecture's run directory with inherited stdio, and takes no
/// arguments.
#[derive(Clone, Debug)]
pub struct TestHostCli {
    arch: Arch,
    program: Utf8PathBuf,
    cwd: Utf8PathBuf,
}

impl TestHostCli {
    /// Creates the invocation for `arch` as described by `config`.
    pub fn new(config: &RunnerConfig, arch: Arch) -> Self {
        Self {
            arch,
            program: config.test_host_path(arch),
            cwd: config.arch_dir(arch),
        }
    }

    /// Convert the command to a [`duct::Expression`].
    pub fn to_expression(&self) -> duct::Expression {
        duct::cmd(self.program.as_str(), std::iter::empty::<&str>())
            .dir(self.cwd.as_std_path())
            .unchecked()
    }

    /// Runs the test host to completion.
    pub fn run(&self) -> Result<(), TestHostError> {
        let expression = self.to_expression();
        trace!("executing command: {:?}", expression);
        let output = expression.run().map_err(|err| TestHostError::Exec {
            arch: self.arch,
            program: self.program.clone(),
            err,
        })?;

        if !output.status.success() {
            return Err(TestHostError::Failed {
                arch: self.arch,
                program: self.program.clone(),
                status: output.status,
            });
        }
        debug!("{} test host exited with {}", self.arch, output.status);
        Ok(())
    }
}
