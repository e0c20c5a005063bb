//! The ball drawn by the renderer and moved by the physics loop

use super::physics::Playfield;

/// A filled circle in playfield coordinates
///
/// `position` is the top-left corner of the circle's bounding box, so the
/// circle occupies `position..position + 2 * radius` on both axes.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Shape {
    pub position: [f32; 2],
    pub radius: f32,
    pub color: [f32; 3],
}

impl Shape {
    /// Creates a shape at an explicit position
    pub fn new(position: [f32; 2], radius: f32, color: [f32; 3]) -> Self {
        Self {
            position,
            radius,
            color,
        }
    }

    /// Creates a shape whose center sits at the center of the playfield
    pub fn centered(playfield: Playfield, radius: f32, color: [f32; 3]) -> Self {
        Self::new(
            [
                playfield.width / 2.0 - radius,
                playfield.height / 2.0 - radius,
            ],
            radius,
            color,
        )
    }

    /// Diameter of the circle (edge length of its bounding box)
    pub fn diameter(&self) -> f32 {
        self.radius * 2.0
    }

    /// Center of the circle
    pub fn center(&self) -> [f32; 2] {
        [self.position[0] + self.radius, self.position[1] + self.radius]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_centered_shape() {
        let shape = Shape::centered(Playfield::new(1024.0, 768.0), 10.0, [0.0, 1.0, 0.0]);
        assert_eq!(shape.position, [502.0, 374.0]);
        assert_eq!(shape.center(), [512.0, 384.0]);
        assert_eq!(shape.diameter(), 20.0);
    }
}
