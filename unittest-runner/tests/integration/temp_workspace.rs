// Copyright (c) The nextest Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

use camino::{Utf8Path, Utf8PathBuf};
use camino_tempfile::Utf8TempDir;
use fs_err as fs;
use std::os::unix::fs::PermissionsExt;
use unittest_runner::{
    arch::Arch,
    config::{BuildSelection, DEFAULT_TEST_HOST_NAME, RunnerConfig},
    platform::HostOs,
};

pub(crate) static BUILD_DIR_NAME: &str = "UnitTestPkg";
pub(crate) static BUILD_TARGET: &str = "DEBUG";
pub(crate) static TOOL_CHAIN_TAG: &str = "GCC5";

/// What a fake test host does when run.
#[derive(Clone, Debug)]
pub(crate) enum FakeHost {
    /// Checks that the image was staged, then writes `report` as the result file.
    Report(String),

    /// Checks that the image was staged, then exits successfully without writing a report.
    NoReport,

    /// Exits with the given status.
    Fail(i32),
}

/// A firmware tree in a temporary directory:
///
/// ```text
/// <root>/Build/UnitTestPkg/DEBUG_GCC5/FV/UNITTEST{32,64}.fd
/// <root>/UnitTestPkg/Test/{IA32,X64}/SecMain.exe
/// ```
#[derive(Debug)]
pub(crate) struct TempWorkspace {
    _temp_dir: Utf8TempDir,
    root: Utf8PathBuf,
    workspace_dir: Utf8PathBuf,
}

impl TempWorkspace {
    pub(crate) fn new(ia32: FakeHost, x64: FakeHost) -> color_eyre::Result<Self> {
        let temp_dir = camino_tempfile::Builder::new()
            .prefix("unittest-runner-")
            .tempdir()?;
        let root = temp_dir.path().to_owned();
        let workspace_dir = root.join("UnitTestPkg").join("Test");

        let fv_dir = root
            .join("Build")
            .join(BUILD_DIR_NAME)
            .join(format!("{BUILD_TARGET}_{TOOL_CHAIN_TAG}"))
            .join("FV");
        fs::create_dir_all(&fv_dir)?;

        let ws = Self {
            _temp_dir: temp_dir,
            root,
            workspace_dir,
        };
        for (arch, host) in [(Arch::Ia32, ia32), (Arch::X64, x64)] {
            fs::write(
                fv_dir.join(arch.source_image_name()),
                format!("{arch} firmware"),
            )?;
            ws.write_host(arch, &host)?;
        }
        Ok(ws)
    }

    pub(crate) fn root(&self) -> &Utf8Path {
        &self.root
    }

    pub(crate) fn workspace_dir(&self) -> &Utf8Path {
        &self.workspace_dir
    }

    pub(crate) fn arch_dir(&self, arch: Arch) -> Utf8PathBuf {
        self.workspace_dir.join(arch.dir_name())
    }

    pub(crate) fn config(&self) -> RunnerConfig {
        let build = BuildSelection::new(
            Some(BUILD_DIR_NAME.to_owned()),
            Some(BUILD_TARGET.to_owned()),
            Some(TOOL_CHAIN_TAG.to_owned()),
        )
        .expect("all values are set");
        RunnerConfig::new(self.workspace_dir.clone(), build, HostOs::Linux)
    }

    /// Returns true if the test host for `arch` ran.
    pub(crate) fn host_ran(&self, arch: Arch) -> bool {
        self.arch_dir(arch).join("ran").exists()
    }

    fn write_host(&self, arch: Arch, host: &FakeHost) -> color_eyre::Result<()> {
        let dir = self.arch_dir(arch);
        fs::create_dir_all(&dir)?;

        let body = match host {
            FakeHost::Report(report) => {
                fs::write(dir.join("report.xml"), report)?;
                "test -f UNITTEST.fd || exit 3\ncp report.xml TestResults.xml\n".to_owned()
            }
            FakeHost::NoReport => "test -f UNITTEST.fd || exit 3\n".to_owned(),
            FakeHost::Fail(status) => format!("exit {status}\n"),
        };

        let script = dir.join(DEFAULT_TEST_HOST_NAME);
        fs::write(&script, format!("#!/bin/sh\ntouch ran\n{body}"))?;
        fs::set_permissions(&script, std::fs::Permissions::from_mode(0o755))?;
        Ok(())
    }
}
