// Navigation state - ordered history of visited folders and a cursor
use crate::api::FolderId;

/// Browser-style back/forward history over folder ids.
///
/// The cursor is `None` exactly when no navigation has happened yet. State
/// transitions here are unconditional and purely in-memory; whether the
/// subsequent folder load succeeds is the caller's problem and never rolls
/// anything back.
#[derive(Debug, Default)]
pub struct NavigationState {
    history: Vec<FolderId>,
    cursor: Option<usize>,
}

impl NavigationState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records a navigation event and reports whether state changed.
    ///
    /// Re-visiting the folder under the cursor is a no-op: folder tiles and
    /// the breadcrumb both land here, and without the guard a click on the
    /// already-active folder would duplicate history entries. Visiting from
    /// the middle of the history discards the abandoned forward branch.
    pub fn visit(&mut self, folder: FolderId) -> bool {
        if self.current() == Some(folder) {
            return false;
        }
        if let Some(cursor) = self.cursor {
            self.history.truncate(cursor + 1);
        }
        self.history.push(folder);
        self.cursor = Some(self.history.len() - 1);
        true
    }

    /// Steps the cursor back and returns the folder to load in replay
    /// mode, or `None` (state untouched) when there is nothing behind.
    pub fn back(&mut self) -> Option<FolderId> {
        let cursor = self.cursor?;
        if cursor == 0 {
            return None;
        }
        self.cursor = Some(cursor - 1);
        Some(self.history[cursor - 1])
    }

    /// Symmetric to `back`.
    pub fn forward(&mut self) -> Option<FolderId> {
        let cursor = self.cursor?;
        if cursor + 1 >= self.history.len() {
            return None;
        }
        self.cursor = Some(cursor + 1);
        Some(self.history[cursor + 1])
    }

    /// The folder under the cursor, if any navigation has happened.
    pub fn current(&self) -> Option<FolderId> {
        self.cursor.map(|cursor| self.history[cursor])
    }

    pub fn can_go_back(&self) -> bool {
        self.cursor.map_or(false, |cursor| cursor > 0)
    }

    pub fn can_go_forward(&self) -> bool {
        self.cursor
            .map_or(false, |cursor| cursor + 1 < self.history.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const A: FolderId = FolderId(1);
    const B: FolderId = FolderId(2);
    const C: FolderId = FolderId(3);
    const D: FolderId = FolderId(4);

    #[test]
    fn visits_record_in_order() {
        let mut nav = NavigationState::new();
        assert!(nav.visit(A));
        assert!(nav.visit(B));
        assert!(nav.visit(C));
        assert_eq!(nav.history, vec![A, B, C]);
        assert_eq!(nav.cursor, Some(2));
        assert_eq!(nav.current(), Some(C));
    }

    #[test]
    fn revisiting_current_folder_is_a_noop() {
        let mut nav = NavigationState::new();
        assert!(nav.visit(A));
        assert!(!nav.visit(A));
        assert_eq!(nav.history, vec![A]);
        assert_eq!(nav.cursor, Some(0));
    }

    #[test]
    fn back_walks_history_and_stops_at_the_start() {
        let mut nav = NavigationState::new();
        nav.visit(A);
        nav.visit(B);
        nav.visit(C);

        assert_eq!(nav.back(), Some(B));
        assert_eq!(nav.cursor, Some(1));
        assert_eq!(nav.back(), Some(A));
        assert_eq!(nav.cursor, Some(0));

        assert_eq!(nav.back(), None);
        assert_eq!(nav.cursor, Some(0));
        assert_eq!(nav.history, vec![A, B, C]);
    }

    #[test]
    fn visiting_from_the_middle_discards_forward_history() {
        let mut nav = NavigationState::new();
        nav.visit(A);
        nav.visit(B);
        nav.visit(C);
        nav.back();
        nav.back();

        assert!(nav.visit(D));
        assert_eq!(nav.history, vec![A, D]);
        assert_eq!(nav.cursor, Some(1));
        assert_eq!(nav.forward(), None);
    }

    #[test]
    fn affordances_track_the_cursor() {
        let mut nav = NavigationState::new();
        assert!(!nav.can_go_back());
        assert!(!nav.can_go_forward());
        assert_eq!(nav.current(), None);

        nav.visit(A);
        assert!(!nav.can_go_back());
        assert!(!nav.can_go_forward());

        nav.visit(B);
        assert!(nav.can_go_back());
        assert!(!nav.can_go_forward());

        nav.back();
        assert!(!nav.can_go_back());
        assert!(nav.can_go_forward());
    }

    #[test]
    fn back_then_forward_round_trips() {
        let mut nav = NavigationState::new();
        nav.visit(A);
        nav.visit(B);
        nav.visit(C);

        // Both traversals report a folder to load; replay loads are never
        // deduplicated against each other.
        assert_eq!(nav.back(), Some(B));
        assert_eq!(nav.forward(), Some(C));
        assert_eq!(nav.cursor, Some(2));
        assert_eq!(nav.current(), Some(C));
    }
}
