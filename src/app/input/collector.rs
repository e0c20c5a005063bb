//! Raw input collection from winit events

use super::keys::Key;
use super::state::InputState;
use winit::event::{ElementState, WindowEvent};
use winit::keyboard::PhysicalKey;

/// Collects raw input from winit events and maintains InputState
pub struct InputCollector {
    state: InputState,
}

impl InputCollector {
    /// Creates a new input collector
    ///
    /// The window is assumed focused until winit says otherwise.
    pub fn new() -> Self {
        Self {
            state: InputState {
                focused: true,
                ..InputState::default()
            },
        }
    }

    /// Handle a winit window event
    pub fn handle_window_event(&mut self, event: &WindowEvent) {
        match event {
            WindowEvent::KeyboardInput { event, .. } => {
                if let PhysicalKey::Code(code) = event.physical_key
                    && let Some(key) = Key::from_key_code(code)
                {
                    match event.state {
                        ElementState::Pressed => self.press(key),
                        ElementState::Released => self.release(key),
                    }
                }
            }

            WindowEvent::Focused(focused) => self.set_focused(*focused),

            _ => {}
        }
    }

    /// Records a key press; ignored while unfocused
    pub fn press(&mut self, key: Key) {
        if self.state.focused {
            self.state.keyboard.set(key, true);
        }
    }

    pub fn release(&mut self, key: Key) {
        self.state.keyboard.set(key, false);
    }

    /// Updates focus; losing it drops held keys since their release
    /// events go to another window
    pub fn set_focused(&mut self, focused: bool) {
        self.state.focused = focused;
        if !focused {
            self.state.keyboard.release_all();
        }
    }

    /// Get current input state
    pub fn state(&self) -> &InputState {
        &self.state
    }
}

impl Default for InputCollector {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_focus_loss_drops_held_keys() {
        let mut collector = InputCollector::new();
        collector.press(Key::D);
        assert!(collector.state().keyboard.is_down(Key::D));

        collector.handle_window_event(&WindowEvent::Focused(false));
        assert!(!collector.state().focused);
        assert!(!collector.state().keyboard.any_down());

        collector.press(Key::A);
        assert!(!collector.state().keyboard.is_down(Key::A));

        collector.set_focused(true);
        collector.press(Key::A);
        assert!(collector.state().keyboard.is_down(Key::A));
        collector.release(Key::A);
        assert!(!collector.state().keyboard.any_down());
    }
}
