//! System information health check

use sysinfo::System;

use crate::health::check::{CheckResult, Findings, SystemCheck};

/// Checks the host can run the physics and render threads side by side
pub struct SystemInfoCheck;

impl SystemInfoCheck {
    pub fn new() -> Self {
        Self
    }
}

impl Default for SystemInfoCheck {
    fn default() -> Self {
        Self::new()
    }
}

impl SystemCheck for SystemInfoCheck {
    fn name(&self) -> &'static str {
        "System Info"
    }

    fn description(&self) -> Option<&'static str> {
        Some("Validates OS, CPU, and memory information gathering")
    }

    fn check(&self) -> CheckResult {
        let mut sys = System::new_all();
        sys.refresh_all();

        let mut findings = Findings::new();
        let unknown = || "Unknown".to_string();

        findings.note(format!(
            "OS: {} {}",
            System::name().unwrap_or_else(unknown),
            System::os_version().unwrap_or_else(unknown)
        ));
        findings.note(format!(
            "Kernel: {}",
            System::kernel_version().unwrap_or_else(unknown)
        ));

        let logical_cores = sys.cpus().len();
        match logical_cores {
            0 => findings.warn("Unable to detect CPU cores"),
            1 => findings.warn("Single CPU core: physics and rendering will share it"),
            n => findings.ok(format!(
                "CPU cores: {} physical, {} logical",
                System::physical_core_count().unwrap_or(0),
                n
            )),
        }

        let total_memory_gb = sys.total_memory() as f64 / 1_073_741_824.0;
        if total_memory_gb < 1.0 {
            findings.warn(format!("Low memory: {total_memory_gb:.1} GB total"));
        } else {
            findings.ok(format!("Memory: {total_memory_gb:.1} GB total"));
        }

        if let Some(hostname) = System::host_name() {
            findings.note(format!("Hostname: {hostname}"));
        }

        findings.finish("System info gathered successfully")
    }
}
