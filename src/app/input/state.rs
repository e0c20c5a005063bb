//! Raw input state

use super::keys::Key;

/// Raw input state polled once per tick
#[derive(Debug, Clone, Default)]
pub struct InputState {
    pub keyboard: KeyboardState,
    /// Whether the window currently has keyboard focus
    pub focused: bool,
}

/// Keyboard input state
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct KeyboardState {
    held: [bool; Key::ALL.len()],
}

impl KeyboardState {
    /// Returns true while `key` is held down
    pub fn is_down(&self, key: Key) -> bool {
        self.held[key.index()]
    }

    pub fn set(&mut self, key: Key, down: bool) {
        self.held[key.index()] = down;
    }

    /// Forgets every held key
    pub fn release_all(&mut self) {
        self.held = [false; Key::ALL.len()];
    }

    /// Returns true if any key is held
    pub fn any_down(&self) -> bool {
        self.held.iter().any(|down| *down)
    }
}

impl InputState {
    /// Creates a new empty input state
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a focused state with the given keys held
    pub fn focused_with(keys: &[Key]) -> Self {
        let mut state = Self {
            focused: true,
            ..Self::default()
        };
        for key in keys {
            state.keyboard.set(*key, true);
        }
        state
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_set_and_release_all() {
        let mut keyboard = KeyboardState::default();
        assert!(!keyboard.any_down());
        keyboard.set(Key::A, true);
        keyboard.set(Key::Space, true);
        assert!(keyboard.is_down(Key::A));
        assert!(!keyboard.is_down(Key::D));
        keyboard.release_all();
        assert!(!keyboard.any_down());
    }
}
