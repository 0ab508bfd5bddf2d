//! Snapshot-based undo/redo history for catalog edits
//!
//! History holds whole `{rows, columns}` snapshots. The cursor is `None` while
//! the user is looking at the live state and `Some(i)` while viewing entry `i`.
//!
//! Applying a snapshot runs through the same pipeline as a live edit, which
//! would normally record it. `undo`/`redo` therefore move the history into
//! [`HistoryPhase::ApplyingHistory`]; `record_edit` is refused until the caller
//! ends the apply with [`History::finish_apply`].

use crate::model::Snapshot;

pub const DEFAULT_MAX_ENTRIES: usize = 100;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum HistoryPhase {
    #[default]
    Idle,
    ApplyingHistory,
}

#[derive(Debug, Clone)]
pub struct History {
    entries: Vec<Snapshot>,
    cursor: Option<usize>,
    phase: HistoryPhase,
    max_entries: usize,
}

impl Default for History {
    fn default() -> Self {
        Self::new()
    }
}

impl History {
    pub fn new() -> Self {
        Self::with_max_entries(DEFAULT_MAX_ENTRIES)
    }

    pub fn with_max_entries(max_entries: usize) -> Self {
        Self {
            entries: Vec::new(),
            cursor: None,
            phase: HistoryPhase::Idle,
            max_entries: max_entries.max(1),
        }
    }

    pub fn entries(&self) -> &[Snapshot] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// `None` = viewing the live state.
    pub fn cursor(&self) -> Option<usize> {
        self.cursor
    }

    pub fn phase(&self) -> HistoryPhase {
        self.phase
    }

    /// Record the state as it was before an edit that changed at least one row.
    ///
    /// Returns false (and records nothing) while a snapshot is being applied.
    /// When viewing an older entry, everything after it is discarded first.
    pub fn record_edit(&mut self, pre_edit: Snapshot) -> bool {
        if self.phase == HistoryPhase::ApplyingHistory {
            log::debug!("history: edit ignored while applying a snapshot");
            return false;
        }

        if let Some(cursor) = self.cursor.take() {
            self.entries.truncate(cursor + 1);
        }
        self.entries.push(pre_edit);

        if self.entries.len() > self.max_entries {
            let overflow = self.entries.len() - self.max_entries;
            self.entries.drain(..overflow);
        }
        true
    }

    /// Step back. `live` is the state currently on screen; it is saved when
    /// leaving the live state so that redo can return to it.
    ///
    /// Returns the snapshot to apply, or `None` if there is nothing to undo.
    pub fn undo(&mut self, live: Snapshot) -> Option<Snapshot> {
        if self.phase == HistoryPhase::ApplyingHistory {
            log::warn!("history: undo requested while applying a snapshot");
            return None;
        }

        let target = match self.cursor {
            None => {
                // The entry just before the live state we are about to push.
                let target = self.entries.len().checked_sub(1)?;
                self.entries.push(live);
                target
            }
            Some(cursor) => cursor.checked_sub(1)?,
        };

        self.cursor = Some(target);
        self.phase = HistoryPhase::ApplyingHistory;
        Some(self.entries[target].clone())
    }

    /// Step forward. Reaching the last entry returns to the live state.
    pub fn redo(&mut self) -> Option<Snapshot> {
        if self.phase == HistoryPhase::ApplyingHistory {
            log::warn!("history: redo requested while applying a snapshot");
            return None;
        }

        let cursor = self.cursor?;
        let target = cursor + 1;
        let last = self.entries.len().checked_sub(1)?;
        if target > last {
            return None;
        }

        let snapshot = if target == last {
            // The last entry is the live state saved by `undo`; it is live again.
            self.cursor = None;
            self.entries.pop()?
        } else {
            self.cursor = Some(target);
            self.entries[target].clone()
        };

        self.phase = HistoryPhase::ApplyingHistory;
        Some(snapshot)
    }

    /// End a snapshot apply started by `undo` or `redo`.
    pub fn finish_apply(&mut self) {
        match self.phase {
            HistoryPhase::ApplyingHistory => self.phase = HistoryPhase::Idle,
            HistoryPhase::Idle => log::debug!("history: finish_apply with no apply in progress"),
        }
    }

    pub fn can_undo(&self) -> bool {
        match self.cursor {
            None => !self.entries.is_empty(),
            Some(cursor) => cursor > 0,
        }
    }

    pub fn can_redo(&self) -> bool {
        match self.cursor {
            None => false,
            Some(cursor) => cursor + 1 < self.entries.len(),
        }
    }

    /// Drop all history. Used when the active sheet changes or after an import.
    pub fn clear(&mut self) {
        self.entries.clear();
        self.cursor = None;
        self.phase = HistoryPhase::Idle;
    }
}
