//! Input edge detection.
//!
//! [`KeyEdgeDetector`] polls every [`KeyCode`] once per frame through a
//! [`KeyPoller`] and diffs the snapshot against the previous one. Each
//! transition is reported exactly once, on the update during which it is
//! first observed.
use log::debug;
use rustc_hash::FxHashSet;
use smallvec::SmallVec;

use crate::events::input::{InputError, KeyCode, KeyEdge};
use crate::native::KeyPoller;

/// Edges produced by one update. At most one per recognized key.
pub type KeyEdges = SmallVec<[KeyEdge; 6]>;

#[derive(Debug, Clone, Default)]
pub struct KeyEdgeDetector {
    previous: FxHashSet<KeyCode>,
}

impl KeyEdgeDetector {
    pub fn new() -> Self {
        Self::default()
    }

    /// Poll all keys and return the presses and releases since the last call.
    ///
    /// A polling failure aborts the update before anything is emitted and
    /// leaves the previous snapshot untouched, so no transition is lost.
    pub fn update<P: KeyPoller + ?Sized>(&mut self, poller: &P) -> Result<KeyEdges, InputError> {
        let mut current = FxHashSet::default();
        for code in KeyCode::ALL {
            if poller.key_poll(code)? {
                current.insert(code);
            }
        }

        let mut edges = KeyEdges::new();
        for code in KeyCode::ALL {
            match (self.previous.contains(&code), current.contains(&code)) {
                (false, true) => {
                    debug!("{} pressed", code);
                    edges.push(KeyEdge::pressed(code));
                }
                (true, false) => {
                    debug!("{} released", code);
                    edges.push(KeyEdge::released(code));
                }
                _ => {}
            }
        }

        self.previous = current;
        Ok(edges)
    }

    /// Whether `code` was down at the last successful update.
    pub fn is_down(&self, code: KeyCode) -> bool {
        self.previous.contains(&code)
    }

    /// Forget the stored snapshot; keys held at the next update report as pressed.
    pub fn reset(&mut self) {
        self.previous.clear();
    }
}
