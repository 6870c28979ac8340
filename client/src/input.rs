//! Keyboard input handling

/// Paddle control keys
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Key {
    Up,
    Down,
}

impl Key {
    /// Map a host key name to a control key
    pub fn from_name(key: &str) -> Option<Key> {
        match key {
            "ArrowUp" | "w" | "W" | "up" => Some(Key::Up),
            "ArrowDown" | "s" | "S" | "down" => Some(Key::Down),
            _ => None,
        }
    }
}

/// Currently held control keys
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct KeysPressed {
    pub up: bool,
    pub down: bool,
}

impl KeysPressed {
    pub fn press(&mut self, key: Key) {
        match key {
            Key::Up => self.up = true,
            Key::Down => self.down = true,
        }
    }

    pub fn release(&mut self, key: Key) {
        match key {
            Key::Up => self.up = false,
            Key::Down => self.down = false,
        }
    }

    pub fn any(&self) -> bool {
        self.up || self.down
    }
}
