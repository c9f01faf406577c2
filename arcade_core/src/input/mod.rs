//! Keyboard input of the game.
//!
//! The engine has no window, so keys come from an [`InputSource`].
//! [`ScriptedInput`] replays key presses at predefined frames,
//! which makes game runs reproducible.

use std::collections::BTreeMap;
use std::fmt;

/// Keys which the game reacts to.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum Key {
    Up,
    Right,
    Down,
    Left,
    Space,
    Escape,
}

impl fmt::Display for Key {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        fmt::Debug::fmt(self, f)
    }
}

/// Source of key presses, polled once per frame.
pub trait InputSource {
    /// Keys pressed since the previous poll, in order of pressing.
    fn poll(&mut self, frame: u64) -> Vec<Key>;
}

/// Input source which presses keys at predefined frames.
#[derive(Debug, Default, Clone)]
pub struct ScriptedInput {
    presses: BTreeMap<u64, Vec<Key>>,
}

impl ScriptedInput {
    /// Creates script without any key presses.
    pub fn new() -> Self {
        Self::default()
    }

    /// Presses the key at given frame.
    pub fn press(mut self, frame: u64, key: Key) -> Self {
        self.presses.entry(frame).or_default().push(key);
        self
    }

    /// Count of key presses which were not polled yet.
    pub fn remaining(&self) -> usize {
        self.presses.values().map(Vec::len).sum()
    }
}

impl InputSource for ScriptedInput {
    fn poll(&mut self, frame: u64) -> Vec<Key> {
        let later = self.presses.split_off(&(frame + 1));
        let due = std::mem::replace(&mut self.presses, later);
        due.into_values().flatten().collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scripted_input() {
        let mut input = ScriptedInput::new()
            .press(2, Key::Up)
            .press(0, Key::Left)
            .press(2, Key::Space)
            .press(5, Key::Escape);
        assert_eq!(input.remaining(), 4);

        assert_eq!(input.poll(0), [Key::Left]);
        assert!(input.poll(1).is_empty());
        assert_eq!(input.poll(2), [Key::Up, Key::Space]);
        assert!(input.poll(2).is_empty());
        // skipped frames are delivered late
        assert_eq!(input.poll(7), [Key::Escape]);
        assert_eq!(input.remaining(), 0);
    }
}
