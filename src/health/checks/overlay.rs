//! FPS overlay health check

use crate::app::renderer::overlay::{Overlay, label_text};
use crate::health::check::{CheckResult, Findings, SystemCheck};

/// Lays out the FPS label with egui, without a GPU
pub struct OverlayCheck {
    font: Option<Vec<u8>>,
}

impl OverlayCheck {
    pub fn new() -> Self {
        Self { font: None }
    }

    /// Checks the label with a custom font
    pub fn with_font(font: Vec<u8>) -> Self {
        Self { font: Some(font) }
    }
}

impl Default for OverlayCheck {
    fn default() -> Self {
        Self::new()
    }
}

impl SystemCheck for OverlayCheck {
    fn name(&self) -> &'static str {
        "Overlay"
    }

    fn description(&self) -> Option<&'static str> {
        Some("Validates egui layout and tessellation of the FPS label")
    }

    fn check(&self) -> CheckResult {
        let mut findings = Findings::new();
        let overlay = Overlay::new(self.font.clone(), 13.0, [5.0, 5.0]);
        findings.ok(if self.font.is_some() {
            "egui context created with custom font"
        } else {
            "egui context created with built-in fonts"
        });

        // The first frame only measures the new area
        overlay.run([1024, 768], 60.0);
        let output = overlay.run([1024, 768], 60.0);
        findings.expect(!output.shapes.is_empty(), "Label produces shapes");

        let primitives = overlay
            .context()
            .tessellate(output.shapes, output.pixels_per_point);
        findings.expect(!primitives.is_empty(), "Label tessellates into meshes");
        findings.note(format!(
            "{} primitive(s) for \"{}\"",
            primitives.len(),
            label_text(60.0)
        ));

        findings.finish("FPS label lays out")
    }
}
