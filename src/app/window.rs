//! Window configuration and management

use super::config::WindowConfig;
use winit::dpi::{PhysicalPosition, PhysicalSize};
use winit::window::WindowAttributes;

/// Creates window attributes from configuration
///
/// The inner size is physical so the playfield matches the configured
/// pixel dimensions at any scale factor.
pub fn window_attributes_from_config(
    config: &WindowConfig,
    position: Option<[i32; 2]>,
) -> WindowAttributes {
    let mut attrs = WindowAttributes::default()
        .with_title(config.title.clone())
        .with_inner_size(PhysicalSize::new(config.width, config.height))
        .with_resizable(config.resizable)
        .with_decorations(config.decorated);

    if let Some([x, y]) = position {
        attrs = attrs.with_position(PhysicalPosition::new(x, y));
    }

    attrs
}

/// What a window move means for the physics loop
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WindowMove {
    /// Position unchanged
    Still,
    /// First move after creation, from the initial placement
    Placed,
    /// The user dragged the window by this offset
    Dragged([i32; 2]),
}

/// Tracks the last known window position to tell drags apart from the
/// initial placement
#[derive(Debug, Clone, Default)]
pub struct DragTracker {
    last: Option<[i32; 2]>,
    placed: bool,
}

impl DragTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records a new window position
    pub fn update(&mut self, position: [i32; 2]) -> WindowMove {
        let Some(last) = self.last.replace(position) else {
            return WindowMove::Still;
        };

        let offset = [position[0] - last[0], position[1] - last[1]];
        if offset == [0, 0] {
            WindowMove::Still
        } else if !self.placed {
            self.placed = true;
            WindowMove::Placed
        } else {
            WindowMove::Dragged(offset)
        }
    }

    pub fn last_position(&self) -> Option<[i32; 2]> {
        self.last
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_first_offset_is_placement() {
        let mut tracker = DragTracker::new();
        assert_eq!(tracker.update([0, 0]), WindowMove::Still);
        assert_eq!(tracker.update([0, 0]), WindowMove::Still);
        assert_eq!(tracker.update([448, 156]), WindowMove::Placed);
        assert_eq!(tracker.update([458, 150]), WindowMove::Dragged([10, -6]));
        assert_eq!(tracker.last_position(), Some([458, 150]));
    }
}
