//! Keys the game reacts to

/// Gameplay key identifier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Key {
    Escape,
    Space,
    W,
    A,
    S,
    D,
}

impl Key {
    /// Every key the game polls, in a stable order
    pub const ALL: [Key; 6] = [Key::Escape, Key::Space, Key::W, Key::A, Key::S, Key::D];

    /// Maps a physical winit key, returning `None` for keys the game ignores
    pub fn from_key_code(code: winit::keyboard::KeyCode) -> Option<Self> {
        use winit::keyboard::KeyCode as WK;
        match code {
            WK::Escape => Some(Self::Escape),
            WK::Space => Some(Self::Space),
            WK::KeyW => Some(Self::W),
            WK::KeyA => Some(Self::A),
            WK::KeyS => Some(Self::S),
            WK::KeyD => Some(Self::D),
            _ => None,
        }
    }

    pub(super) fn index(self) -> usize {
        self as usize
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use winit::keyboard::KeyCode;

    #[test]
    fn test_from_key_code() {
        assert_eq!(Key::from_key_code(KeyCode::Space), Some(Key::Space));
        assert_eq!(Key::from_key_code(KeyCode::KeyD), Some(Key::D));
        assert_eq!(Key::from_key_code(KeyCode::KeyQ), None);
    }

    #[test]
    fn test_indices_are_dense() {
        for (i, key) in Key::ALL.iter().enumerate() {
            assert_eq!(key.index(), i);
        }
    }
}
