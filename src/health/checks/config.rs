//! Configuration system health check

use crate::app::AppConfig;
use crate::health::check::{CheckResult, Findings, SystemCheck};

/// Checks that every profile loads and passes validation
pub struct ConfigCheck {
    profiles: Vec<&'static str>,
}

impl ConfigCheck {
    /// Creates a config check over the shipped profiles
    pub fn new() -> Self {
        Self {
            profiles: AppConfig::PROFILES.to_vec(),
        }
    }

    /// Creates a config check with custom profiles
    pub fn with_profiles(profiles: Vec<&'static str>) -> Self {
        Self { profiles }
    }
}

impl Default for ConfigCheck {
    fn default() -> Self {
        Self::new()
    }
}

impl SystemCheck for ConfigCheck {
    fn name(&self) -> &'static str {
        "Configuration"
    }

    fn description(&self) -> Option<&'static str> {
        Some("Validates configuration loading from files and environment")
    }

    fn check(&self) -> CheckResult {
        let mut findings = Findings::new();

        for profile in &self.profiles {
            match AppConfig::load(profile) {
                Ok(config) => match config.validate() {
                    Ok(()) => findings.ok(format!(
                        "Profile '{}': {}x{}, gravity {}, vsync {}",
                        profile,
                        config.window.width,
                        config.window.height,
                        config.physics.gravity,
                        config.render.vsync
                    )),
                    Err(e) => findings.fail(format!("Profile '{profile}': {e}")),
                },
                Err(e) => findings.fail(format!("Profile '{profile}': failed to load - {e}")),
            }
        }

        findings.expect(
            AppConfig::default().validate().is_ok(),
            "Built-in defaults are valid",
        );

        match AppConfig::load_from_env() {
            Ok(config) => findings.ok(format!(
                "Environment config: profile '{}' loaded",
                config.profile
            )),
            Err(e) => findings.warn(format!("Environment config: {e}")),
        }

        findings.finish(format!("{} profiles validated", self.profiles.len()))
    }
}
