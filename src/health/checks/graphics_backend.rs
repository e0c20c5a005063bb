//! Graphics backend health check

use std::collections::BTreeSet;

use crate::app::renderer::pick_sample_count;
use crate::health::check::{CheckResult, Findings, SystemCheck};

/// Checks that wgpu finds an adapter that can draw the ball
///
/// Needs a GPU or a software adapter, so it only runs from the command
/// line.
pub struct GraphicsBackendCheck {
    msaa_samples: u32,
}

impl GraphicsBackendCheck {
    pub fn new(msaa_samples: u32) -> Self {
        Self { msaa_samples }
    }
}

impl Default for GraphicsBackendCheck {
    fn default() -> Self {
        Self::new(8)
    }
}

impl SystemCheck for GraphicsBackendCheck {
    fn name(&self) -> &'static str {
        "Graphics Backend"
    }

    fn description(&self) -> Option<&'static str> {
        Some("Validates wgpu instance creation and adapter availability")
    }

    fn check(&self) -> CheckResult {
        let mut findings = Findings::new();

        let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor {
            backends: wgpu::Backends::all(),
            ..Default::default()
        });
        let adapters: Vec<wgpu::Adapter> = instance
            .enumerate_adapters(wgpu::Backends::all())
            .into_iter()
            .collect();

        if adapters.is_empty() {
            findings.fail("No graphics adapters found");
            return findings.finish("no adapters");
        }
        findings.ok(format!("Found {} adapter(s)", adapters.len()));

        let mut backends = BTreeSet::new();
        let mut hardware = false;
        for (i, adapter) in adapters.iter().enumerate() {
            let info = adapter.get_info();
            backends.insert(format!("{:?}", info.backend));
            hardware |= matches!(
                info.device_type,
                wgpu::DeviceType::DiscreteGpu | wgpu::DeviceType::IntegratedGpu
            );

            let flags = adapter
                .get_texture_format_features(wgpu::TextureFormat::Bgra8UnormSrgb)
                .flags;
            let samples = pick_sample_count(self.msaa_samples, |count| {
                flags.sample_count_supported(count)
            });
            findings.note(format!(
                "[{i}] {} - {:?} ({:?}), MSAA x{samples} of x{} requested",
                info.name, info.device_type, info.backend, self.msaa_samples
            ));
        }

        findings.note(format!(
            "Backends available: {}",
            backends.into_iter().collect::<Vec<_>>().join(", ")
        ));

        if !hardware {
            findings.warn("No hardware GPU detected, rendering falls back to software");
        }

        findings.finish(format!("{} adapter(s) usable", adapters.len()))
    }
}
