//! Keyboard key codes and edge events.
//!
//! This module defines [`KeyEdge`], produced when a key changes state between
//! two polls. The [`KeyCode`] enum is the closed set of keys the engine
//! recognizes; every one of them is polled and diffed the same way by
//! [`KeyEdgeDetector`](crate::systems::input::KeyEdgeDetector).

use std::fmt;

/// Keys recognized by the engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum KeyCode {
    /// Move up.
    W,
    /// Move left.
    A,
    /// Move down.
    S,
    /// Move right.
    D,
    /// Back/quit.
    Esc,
    /// Primary action.
    Space,
}

impl KeyCode {
    /// Every recognized key, in polling order.
    pub const ALL: [KeyCode; 6] = [
        KeyCode::W,
        KeyCode::A,
        KeyCode::S,
        KeyCode::D,
        KeyCode::Esc,
        KeyCode::Space,
    ];

    /// Platform-neutral numeric code. Zero is reserved for "unknown".
    pub fn native_code(self) -> i32 {
        match self {
            KeyCode::W => 1,
            KeyCode::A => 2,
            KeyCode::S => 3,
            KeyCode::D => 4,
            KeyCode::Esc => 5,
            KeyCode::Space => 6,
        }
    }

    /// Map a numeric code back to a key, rejecting anything unrecognized.
    pub fn from_native(code: i32) -> Result<KeyCode, InputError> {
        KeyCode::ALL
            .into_iter()
            .find(|key| key.native_code() == code)
            .ok_or(InputError::InvalidKeyCode(code))
    }

    pub fn name(self) -> &'static str {
        match self {
            KeyCode::W => "W",
            KeyCode::A => "A",
            KeyCode::S => "S",
            KeyCode::D => "D",
            KeyCode::Esc => "ESC",
            KeyCode::Space => "SPACE",
        }
    }
}

impl fmt::Display for KeyCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Direction of a key transition.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Edge {
    Pressed,
    Released,
}

/// A key changed state between two consecutive polls.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct KeyEdge {
    pub code: KeyCode,
    pub edge: Edge,
}

impl KeyEdge {
    pub fn pressed(code: KeyCode) -> Self {
        Self {
            code,
            edge: Edge::Pressed,
        }
    }

    pub fn released(code: KeyCode) -> Self {
        Self {
            code,
            edge: Edge::Released,
        }
    }
}

/// Keyboard polling failure.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum InputError {
    #[error("invalid key code {0}")]
    InvalidKeyCode(i32),
}
