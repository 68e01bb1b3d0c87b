//! Key bindings.
//!
//! [`ActionTable`] maps a key symbol to the [`Command`] it triggers. It is
//! built once at startup and only read afterwards; keys without a binding
//! resolve to `None` and are ignored by the navigator.
//!
//! | Key | Command |
//! |-----|---------|
//! | `d` | step one frame forward |
//! | `a` | step one frame backward |
//! | `D` | skip forward by the coarse step |
//! | `A` | skip backward by the coarse step |
//! | `s` | save the current frame |
//! | `r` | select a region, label it and save it |
//! | `p` | toggle playback |
//! | `q` | quit |

use std::collections::HashMap;

/// Default magnitude of a coarse skip.
pub const DEFAULT_COARSE_STEP: u32 = 10;

/// An action the navigator can perform on the session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    /// Move by a signed number of frames relative to the displayed frame.
    Step(i64),
    /// Write the current frame to a timestamped PNG.
    SaveFrame,
    /// Select a region, prompt for a label, draw both and save the result.
    SelectRegionAndAnnotate,
    /// Flip between playing and paused.
    TogglePlay,
    /// Leave the navigation loop.
    Quit,
}

/// Immutable mapping from key symbol to [`Command`].
#[derive(Debug, Clone)]
pub struct ActionTable {
    bindings: HashMap<char, Command>,
}

impl ActionTable {
    /// Build the standard key map with the given coarse step.
    pub fn new(coarse_step: u32) -> Self {
        let coarse = i64::from(coarse_step);
        let bindings = HashMap::from([
            ('d', Command::Step(1)),
            ('a', Command::Step(-1)),
            ('D', Command::Step(coarse)),
            ('A', Command::Step(-coarse)),
            ('s', Command::SaveFrame),
            ('r', Command::SelectRegionAndAnnotate),
            ('p', Command::TogglePlay),
            ('q', Command::Quit),
        ]);
        Self { bindings }
    }

    /// Look up the command bound to `key`.
    pub fn lookup(&self, key: char) -> Option<Command> {
        self.bindings.get(&key).copied()
    }

    /// Bound keys and their commands, sorted by key.
    pub fn bindings(&self) -> Vec<(char, Command)> {
        let mut bindings: Vec<_> = self.bindings.iter().map(|(k, c)| (*k, *c)).collect();
        bindings.sort_by_key(|(key, _)| *key);
        bindings
    }
}

impl Default for ActionTable {
    fn default() -> Self {
        Self::new(DEFAULT_COARSE_STEP)
    }
}
