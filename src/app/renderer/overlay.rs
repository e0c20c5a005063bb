//! FPS label drawn with egui
//!
//! The render thread has no winit event stream, so egui is fed a minimal
//! `RawInput` that only carries the screen rectangle.

use std::path::Path;
use std::sync::Arc;

use egui::{Color32, Context, FontData, FontDefinitions, FontFamily, RichText};

use crate::error::StartupError;

const FONT_NAME: &str = "label";

/// Leading bytes of the font containers egui can parse
const FONT_MAGICS: [&[u8; 4]; 4] = [b"\x00\x01\x00\x00", b"OTTO", b"true", b"ttcf"];

/// Reads a TTF/OTF file for the label
///
/// Called before the event loop starts so a bad path fails fast.
pub fn load_font(path: &Path) -> Result<Vec<u8>, StartupError> {
    let bytes = std::fs::read(path).map_err(|source| StartupError::Font {
        path: path.to_path_buf(),
        source,
    })?;

    if !is_font(&bytes) {
        return Err(StartupError::FontFormat {
            path: path.to_path_buf(),
        });
    }

    Ok(bytes)
}

fn is_font(bytes: &[u8]) -> bool {
    bytes.len() >= 4 && FONT_MAGICS.iter().any(|magic| bytes[..4] == magic[..])
}

/// Text for a given frame rate
pub fn label_text(fps: f32) -> String {
    format!("Renderer FPS: {:.0}", fps)
}

/// Lays out the FPS label
pub struct Overlay {
    ctx: Context,
    font_size: f32,
    label_position: [f32; 2],
}

impl Overlay {
    pub fn new(font: Option<Vec<u8>>, font_size: f32, label_position: [f32; 2]) -> Self {
        let ctx = Context::default();

        if let Some(bytes) = font {
            let mut fonts = FontDefinitions::default();
            fonts
                .font_data
                .insert(FONT_NAME.to_owned(), Arc::new(FontData::from_owned(bytes)));
            fonts
                .families
                .entry(FontFamily::Proportional)
                .or_default()
                .insert(0, FONT_NAME.to_owned());
            ctx.set_fonts(fonts);
        }

        Self {
            ctx,
            font_size,
            label_position,
        }
    }

    pub fn context(&self) -> &Context {
        &self.ctx
    }

    /// Runs one egui frame showing `fps` on a screen of `screen_size` pixels
    pub fn run(&self, screen_size: [u32; 2], fps: f32) -> egui::FullOutput {
        let raw_input = egui::RawInput {
            screen_rect: Some(egui::Rect::from_min_size(
                egui::Pos2::ZERO,
                egui::vec2(screen_size[0] as f32, screen_size[1] as f32),
            )),
            ..Default::default()
        };

        let text = label_text(fps);
        let [x, y] = self.label_position;
        self.ctx.run(raw_input, |ctx| {
            egui::Area::new(egui::Id::new("fps_label"))
                .fixed_pos(egui::pos2(x, y))
                .show(ctx, |ui| {
                    ui.label(
                        RichText::new(&text)
                            .size(self.font_size)
                            .color(Color32::WHITE),
                    );
                });
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_label_text() {
        assert_eq!(label_text(59.7), "Renderer FPS: 60");
        assert_eq!(label_text(0.0), "Renderer FPS: 0");
    }

    #[test]
    fn test_font_magic() {
        assert!(is_font(b"\x00\x01\x00\x00rest"));
        assert!(is_font(b"OTTO...."));
        assert!(!is_font(b"<html>"));
        assert!(!is_font(b"OT"));
    }

    #[test]
    fn test_missing_font_is_an_error() {
        let err = load_font(Path::new("no/such/font.ttf")).unwrap_err();
        assert!(matches!(err, StartupError::Font { .. }));
    }

    #[test]
    fn test_label_produces_shapes() {
        let overlay = Overlay::new(None, 13.0, [5.0, 5.0]);
        // new areas are measured on their first frame
        overlay.run([1024, 768], 60.0);
        let output = overlay.run([1024, 768], 60.0);
        assert!(!output.shapes.is_empty());
    }
}
