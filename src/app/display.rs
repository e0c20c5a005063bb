//! Primary display geometry
//!
//! Queried once at startup to place the window in the middle of the
//! primary monitor.

use tracing::{debug, warn};
use winit::event_loop::ActiveEventLoop;
use winit::monitor::MonitorHandle;

use crate::error::DisplayError;

/// Screen-space rectangle of one monitor in physical pixels
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct MonitorGeometry {
    /// Top-left corner in the virtual desktop
    pub origin: [i32; 2],
    pub size: [u32; 2],
}

impl MonitorGeometry {
    fn from_handle(monitor: &MonitorHandle) -> Self {
        let position = monitor.position();
        let size = monitor.size();
        Self {
            origin: [position.x, position.y],
            size: [size.width, size.height],
        }
    }

    /// Window position that puts a window of `window_size` in the middle
    /// of this monitor
    pub fn centered_position(&self, window_size: [u32; 2]) -> [i32; 2] {
        let axis = |i: usize| {
            let offset = (self.size[i] as i64 - window_size[i] as i64) / 2;
            (self.origin[i] as i64 + offset) as i32
        };
        [axis(0), axis(1)]
    }
}

/// Looks up the primary monitor
///
/// Platforms without a primary monitor concept (Wayland) fall back to the
/// first monitor reported.
pub fn primary_geometry(event_loop: &ActiveEventLoop) -> Result<MonitorGeometry, DisplayError> {
    let monitor = match event_loop.primary_monitor() {
        Some(monitor) => monitor,
        None => {
            debug!("No primary monitor reported, trying the first available one");
            event_loop
                .available_monitors()
                .next()
                .ok_or(DisplayError::NoMonitors)?
        }
    };

    let geometry = MonitorGeometry::from_handle(&monitor);
    if geometry.size[0] == 0 || geometry.size[1] == 0 {
        return Err(DisplayError::EmptyGeometry);
    }

    debug!(
        monitor.name = monitor.name().as_deref().unwrap_or("<unnamed>"),
        monitor.x = geometry.origin[0],
        monitor.y = geometry.origin[1],
        monitor.width = geometry.size[0],
        monitor.height = geometry.size[1],
        "Primary monitor"
    );
    Ok(geometry)
}

/// Initial window position, or the desktop origin when the display query
/// fails
pub fn initial_window_position(event_loop: &ActiveEventLoop, window_size: [u32; 2]) -> [i32; 2] {
    match primary_geometry(event_loop) {
        Ok(geometry) => geometry.centered_position(window_size),
        Err(e) => {
            warn!(error = %e, "Could not query primary display, placing window at the origin");
            [0, 0]
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_centered_on_single_monitor() {
        let monitor = MonitorGeometry {
            origin: [0, 0],
            size: [1920, 1080],
        };
        assert_eq!(monitor.centered_position([1024, 768]), [448, 156]);
    }

    #[test]
    fn test_centered_on_offset_monitor() {
        let monitor = MonitorGeometry {
            origin: [1920, -200],
            size: [2560, 1440],
        };
        assert_eq!(monitor.centered_position([1024, 768]), [2688, 136]);
    }

    #[test]
    fn test_window_larger_than_monitor() {
        let monitor = MonitorGeometry {
            origin: [0, 0],
            size: [800, 600],
        };
        assert_eq!(monitor.centered_position([1024, 768]), [-112, -84]);
    }
}
