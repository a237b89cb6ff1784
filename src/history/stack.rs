use std::collections::VecDeque;

use crate::raster::mask::{MaskRaster, MaskSnapshot};

/// Default number of undo steps retained.
pub const DEFAULT_HISTORY_DEPTH: usize = 20;

/// Bounded undo deque plus redo stack of mask snapshots.
///
/// Undo and redo both capture the mask's current contents *before* overwriting it with
/// the popped snapshot, and push that capture onto the opposite stack.
#[derive(Clone, Debug)]
pub struct HistoryManager {
    undo: VecDeque<MaskSnapshot>,
    redo: Vec<MaskSnapshot>,
    depth: usize,
}

impl HistoryManager {
    pub fn new(depth: usize) -> Self {
        let depth = depth.max(1);
        Self {
            undo: VecDeque::with_capacity(depth + 1),
            redo: Vec::new(),
            depth,
        }
    }

    /// Record the state preceding a new edit. Evicts the oldest entry past the depth limit
    /// and invalidates forward history.
    pub fn push_undo(&mut self, snapshot: MaskSnapshot) {
        self.undo.push_back(snapshot);
        while self.undo.len() > self.depth {
            self.undo.pop_front();
        }
        if !self.redo.is_empty() {
            tracing::debug!(dropped = self.redo.len(), "new edit invalidates redo history");
            self.redo.clear();
        }
    }

    /// Step back one edit. Returns `false` when there is nothing to undo.
    pub fn undo(&mut self, mask: &mut MaskRaster) -> bool {
        let Some(snapshot) = self.undo.pop_back() else {
            return false;
        };
        let current = mask.snapshot();
        if let Err(err) = mask.restore(&snapshot) {
            tracing::warn!(%err, "discarding undo snapshot");
            return false;
        }
        self.redo.push(current);
        true
    }

    /// Step forward one undone edit. Returns `false` when there is nothing to redo.
    ///
    /// The undo push on this path skips eviction: redo depth is bounded by prior undos.
    pub fn redo(&mut self, mask: &mut MaskRaster) -> bool {
        let Some(snapshot) = self.redo.pop() else {
            return false;
        };
        let current = mask.snapshot();
        if let Err(err) = mask.restore(&snapshot) {
            tracing::warn!(%err, "discarding redo snapshot");
            return false;
        }
        self.undo.push_back(current);
        true
    }

    pub fn can_undo(&self) -> bool {
        !self.undo.is_empty()
    }

    pub fn can_redo(&self) -> bool {
        !self.redo.is_empty()
    }

    pub fn undo_len(&self) -> usize {
        self.undo.len()
    }

    pub fn redo_len(&self) -> usize {
        self.redo.len()
    }

    /// Bytes held by all retained snapshots.
    pub fn retained_bytes(&self) -> usize {
        self.undo
            .iter()
            .chain(self.redo.iter())
            .map(MaskSnapshot::byte_len)
            .sum()
    }

    pub fn clear(&mut self) {
        self.undo.clear();
        self.redo.clear();
    }
}

impl Default for HistoryManager {
    fn default() -> Self {
        Self::new(DEFAULT_HISTORY_DEPTH)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/history/stack.rs"]
mod tests;
