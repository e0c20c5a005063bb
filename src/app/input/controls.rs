//! Maps polled key state to what the game should do this tick

use super::keys::Key;
use super::state::InputState;
use crate::sim::Intent;

/// Per-tick decision derived from the keyboard
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Controls {
    /// Escape was held: close the window
    pub close: bool,
    pub intent: Intent,
}

impl Controls {
    /// Reads the held keys
    ///
    /// Nothing is produced while the window lacks focus. Escape wins over
    /// every other key. With gravity, A/D walk and Space asks for a jump;
    /// without it, W/S walk vertically and Space does nothing.
    pub fn from_state(state: &InputState, gravity: bool) -> Self {
        if !state.focused {
            return Self::default();
        }

        let keys = &state.keyboard;
        if keys.is_down(Key::Escape) {
            return Self {
                close: true,
                intent: Intent::default(),
            };
        }

        let axis = |negative: Key, positive: Key| {
            keys.is_down(positive) as i8 as f32 - keys.is_down(negative) as i8 as f32
        };

        let horizontal = axis(Key::A, Key::D);
        let intent = if gravity {
            Intent {
                direction: [horizontal, 0.0],
                jump: keys.is_down(Key::Space),
            }
        } else {
            Intent {
                direction: [horizontal, axis(Key::W, Key::S)],
                jump: false,
            }
        };

        Self {
            close: false,
            intent,
        }
    }
}
