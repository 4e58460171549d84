// Copyright (c) The nextest Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Runner configuration, resolved once at startup.

use crate::{
    arch::{Arch, RESULT_FILE_NAME, STAGED_IMAGE_NAME},
    errors::ConfigError,
    platform::HostOs,
};
use camino::{Utf8Path, Utf8PathBuf};

/// Environment variable naming the build output directory.
pub const BUILD_DIR_NAME_ENV: &str = "BUILD_DIR_NAME";

/// Environment variable naming the build target, e.g. `DEBUG`.
pub const BUILD_TARGET_ENV: &str = "BUILD_TARGET";

/// Environment variable naming the toolchain tag, e.g. `GCC5`.
pub const TOOL_CHAIN_TAG_ENV: &str = "TOOL_CHAIN_TAG";

/// The test host executable name used when none is configured, on every host.
pub const DEFAULT_TEST_HOST_NAME: &str = "SecMain.exe";

/// The three values that locate the prebuilt firmware images.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct BuildSelection {
    build_dir_name: String,
    build_target: String,
    tool_chain_tag: String,
}

impl BuildSelection {
    /// Creates a new `BuildSelection`, failing on the first missing value.
    pub fn new(
        build_dir_name: Option<String>,
        build_target: Option<String>,
        tool_chain_tag: Option<String>,
    ) -> Result<Self, ConfigError> {
        Ok(Self {
            build_dir_name: required(build_dir_name, "build-dir-name", BUILD_DIR_NAME_ENV)?,
            build_target: required(build_target, "build-target", BUILD_TARGET_ENV)?,
            tool_chain_tag: required(tool_chain_tag, "tool-chain-tag", TOOL_CHAIN_TAG_ENV)?,
        })
    }

    /// The build output directory name.
    pub fn build_dir_name(&self) -> &str {
        &self.build_dir_name
    }

    /// The build target.
    pub fn build_target(&self) -> &str {
        &self.build_target
    }

    /// The toolchain tag.
    pub fn tool_chain_tag(&self) -> &str {
        &self.tool_chain_tag
    }
}

fn required(
    value: Option<String>,
    option: &'static str,
    env_var: &'static str,
) -> Result<String, ConfigError> {
    value
        .filter(|value| !value.is_empty())
        .ok_or(ConfigError::MissingVariable { option, env_var })
}

/// Everything a pipeline run needs to know.
#[derive(Clone, Debug)]
pub struct RunnerConfig {
    workspace_dir: Utf8PathBuf,
    build: BuildSelection,
    host_os: HostOs,
    test_host_name: String,
}

impl RunnerConfig {
    /// Creates a new config using [`DEFAULT_TEST_HOST_NAME`].
    pub fn new(workspace_dir: Utf8PathBuf, build: BuildSelection, host_os: HostOs) -> Self {
        Self {
            workspace_dir,
            build,
            host_os,
            test_host_name: DEFAULT_TEST_HOST_NAME.to_owned(),
        }
    }

    /// Overrides the test host executable name.
    pub fn with_test_host_name(mut self, name: impl Into<String>) -> Self {
        self.test_host_name = name.into();
        self
    }

    /// The directory holding the per-architecture run directories.
    pub fn workspace_dir(&self) -> &Utf8Path {
        &self.workspace_dir
    }

    /// The build selection.
    pub fn build(&self) -> &BuildSelection {
        &self.build
    }

    /// The detected host operating system.
    pub fn host_os(&self) -> HostOs {
        self.host_os
    }

    /// The test host executable name.
    pub fn test_host_name(&self) -> &str {
        &self.test_host_name
    }

    /// The firmware-volume directory holding the prebuilt images.
    pub fn fv_dir(&self) -> Utf8PathBuf {
        self.workspace_dir
            .join("..")
            .join("..")
            .join("Build")
            .join(&self.build.build_dir_name)
            .join(format!(
                "{}_{}",
                self.build.build_target, self.build.tool_chain_tag
            ))
            .join("FV")
    }

    /// The run directory for `arch`.
    pub fn arch_dir(&self, arch: Arch) -> Utf8PathBuf {
        self.workspace_dir.join(arch.dir_name())
    }

    /// The prebuilt image for `arch`.
    pub fn source_image(&self, arch: Arch) -> Utf8PathBuf {
        self.fv_dir().join(arch.source_image_name())
    }

    /// Where the image for `arch` is staged.
    pub fn staged_image(&self, arch: Arch) -> Utf8PathBuf {
        self.arch_dir(arch).join(STAGED_IMAGE_NAME)
    }

    /// The test host executable for `arch`.
    pub fn test_host_path(&self, arch: Arch) -> Utf8PathBuf {
        self.arch_dir(arch).join(&self.test_host_name)
    }

    /// The report the test host for `arch` writes.
    pub fn result_file(&self, arch: Arch) -> Utf8PathBuf {
        self.arch_dir(arch).join(RESULT_FILE_NAME)
    }

    /// Where the report for `arch` is moved to.
    pub fn relocated_report(&self, arch: Arch) -> Utf8PathBuf {
        self.workspace_dir.join(arch.report_file_name())
    }
}
