//! Build information health check

use crate::build_info;
use crate::health::check::{CheckResult, Findings, SystemCheck};

/// Checks that build information is accessible and valid
pub struct BuildInfoCheck;

impl BuildInfoCheck {
    pub fn new() -> Self {
        Self
    }
}

impl Default for BuildInfoCheck {
    fn default() -> Self {
        Self::new()
    }
}

impl SystemCheck for BuildInfoCheck {
    fn name(&self) -> &'static str {
        "Build Info"
    }

    fn description(&self) -> Option<&'static str> {
        Some("Validates build metadata (git, rustc, timestamps)")
    }

    fn check(&self) -> CheckResult {
        let mut findings = Findings::new();

        findings.expect(
            !build_info::BUILD_TIMESTAMP.is_empty(),
            format!("Build time: {}", build_info::BUILD_TIMESTAMP),
        );
        findings.expect(
            !build_info::RUSTC_SEMVER.is_empty(),
            format!(
                "Rustc: {} ({})",
                build_info::RUSTC_SEMVER,
                build_info::RUSTC_CHANNEL
            ),
        );
        findings.ok(format!("Version: {}", build_info::version_string()));

        match build_info::git_sha_short() {
            Some(sha) => findings.ok(format!(
                "Git: {}@{} (dirty: {})",
                build_info::GIT_BRANCH.unwrap_or("detached"),
                sha,
                build_info::is_git_dirty()
            )),
            None => findings.note("Git: not built from a repository"),
        }

        findings.finish("Build metadata accessible")
    }
}
