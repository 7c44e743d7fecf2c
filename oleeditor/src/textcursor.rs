/// Which of the two panes last received input
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub enum Pane {
    #[default]
    Hex,
    Ascii,
}

/// Position in hex-pane column space. Ordered by line first, then column.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct CursorPos {
    pub line: usize,
    pub col: usize,
}

impl CursorPos {
    pub const fn new(line: usize, col: usize) -> Self {
        Self { line, col }
    }
}

/// Caret and selection over the virtual text grid of the hex view.
///
/// The anchor is where the selection started (set by `move_to`), the extent
/// follows the pointer (set by `select_to`). Either both are set or the
/// cursor is cleared.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct TextCursor {
    /// Anchor and extent
    ends: Option<(CursorPos, CursorPos)>,
    active_pane: Pane,
}

impl TextCursor {
    pub const fn clear(&mut self) {
        self.ends = None;
    }

    pub const fn is_valid(&self) -> bool {
        self.ends.is_some()
    }

    pub fn has_selection(&self) -> bool {
        self.ends.is_some_and(|(anchor, extent)| anchor != extent)
    }

    pub fn has_multi_lines(&self) -> bool {
        self.ends
            .is_some_and(|(anchor, extent)| anchor.line != extent.line)
    }

    /// Check if `line` is part of the current selection
    pub fn within(&self, line: usize) -> bool {
        self.has_selection()
            && self
                .begin_line()
                .zip(self.end_line())
                .is_some_and(|(begin, end)| (begin..=end).contains(&line))
    }

    /// Collapse to a caret at `(line, col)`
    pub const fn move_to(&mut self, line: usize, col: usize) {
        let pos = CursorPos::new(line, col);
        self.ends = Some((pos, pos));
    }

    /// Move the extent only. A cleared cursor starts a selection at `(line, col)`.
    pub fn select_to(&mut self, line: usize, col: usize) {
        let pos = CursorPos::new(line, col);
        match &mut self.ends {
            Some((_, extent)) => *extent = pos,
            None => self.ends = Some((pos, pos)),
        }
    }

    pub const fn set_active_pane(&mut self, pane: Pane) {
        self.active_pane = pane;
    }

    pub const fn active_pane(&self) -> Pane {
        self.active_pane
    }

    /// Where the current selection started
    pub fn anchor(&self) -> Option<CursorPos> {
        self.ends.map(|(anchor, _)| anchor)
    }

    /// Logically first endpoint, independent of drag direction
    pub fn begin(&self) -> Option<CursorPos> {
        self.ends.map(|(anchor, extent)| anchor.min(extent))
    }

    /// Logically last endpoint, independent of drag direction
    pub fn end(&self) -> Option<CursorPos> {
        self.ends.map(|(anchor, extent)| anchor.max(extent))
    }

    pub fn begin_line(&self) -> Option<usize> {
        self.begin().map(|pos| pos.line)
    }

    pub fn end_line(&self) -> Option<usize> {
        self.end().map(|pos| pos.line)
    }

    pub fn begin_pos(&self) -> Option<usize> {
        self.begin().map(|pos| pos.col)
    }

    pub fn end_pos(&self) -> Option<usize> {
        self.end().map(|pos| pos.col)
    }

    /// Rewrite the column of the logically first endpoint
    pub fn set_begin_pos(&mut self, col: usize) {
        if let Some((first, _)) = self.ordered_mut() {
            first.col = col;
        }
    }

    /// Rewrite the column of the logically last endpoint
    pub fn set_end_pos(&mut self, col: usize) {
        if let Some((_, last)) = self.ordered_mut() {
            last.col = col;
        }
    }

    fn ordered_mut(&mut self) -> Option<(&mut CursorPos, &mut CursorPos)> {
        let (anchor, extent) = self.ends.as_mut()?;
        if *anchor <= *extent {
            Some((anchor, extent))
        } else {
            Some((extent, anchor))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::Rng;

    #[test]
    fn test_created_cleared() {
        let cursor = TextCursor::default();
        assert!(!cursor.is_valid());
        assert!(!cursor.has_selection());
        assert!(!cursor.has_multi_lines());
        assert_eq!(cursor.begin_line(), None);
        assert_eq!(cursor.active_pane(), Pane::Hex);
    }

    #[test]
    fn test_move_to_collapses_to_caret() {
        // Arrange
        let mut cursor = TextCursor::default();
        cursor.move_to(1, 3);
        cursor.select_to(4, 9);

        // Act
        cursor.move_to(2, 6);

        // Assert
        assert!(cursor.is_valid());
        assert!(!cursor.has_selection());
        assert_eq!(cursor.begin(), Some(CursorPos::new(2, 6)));
        assert_eq!(cursor.end(), Some(CursorPos::new(2, 6)));
    }

    #[test]
    fn test_select_to_orders_endpoints() {
        let mut rng = rand::rng();

        for _ in 0..200 {
            // Arrange
            let (l1, c1) = (rng.random_range(0..50), rng.random_range(0..48));
            let (l2, c2) = (rng.random_range(0..50), rng.random_range(0..48));
            if (l1, c1) == (l2, c2) {
                continue;
            }
            let mut cursor = TextCursor::default();

            // Act
            cursor.move_to(l1, c1);
            cursor.select_to(l2, c2);

            // Assert
            assert!(cursor.has_selection());
            assert_eq!(cursor.begin_line(), Some(l1.min(l2)));
            assert_eq!(cursor.end_line(), Some(l1.max(l2)));
            assert_eq!(cursor.has_multi_lines(), l1 != l2);
        }
    }

    #[test]
    fn test_positions_follow_earlier_line() {
        // Arrange: drag backwards from (5, 3) to (2, 40)
        let mut cursor = TextCursor::default();
        cursor.move_to(5, 3);

        // Act
        cursor.select_to(2, 40);

        // Assert
        assert_eq!(cursor.begin_pos(), Some(40));
        assert_eq!(cursor.end_pos(), Some(3));
    }

    #[test]
    fn test_positions_on_same_line_are_min_max() {
        let mut cursor = TextCursor::default();
        cursor.move_to(7, 30);
        cursor.select_to(7, 12);

        assert_eq!(cursor.begin_pos(), Some(12));
        assert_eq!(cursor.end_pos(), Some(30));
        assert!(!cursor.has_multi_lines());
    }

    #[test]
    fn test_within() {
        // Arrange
        let mut cursor = TextCursor::default();
        cursor.move_to(3, 0);

        // Caret only: no line is within
        assert!(!cursor.within(3));

        // Act
        cursor.select_to(1, 5);

        // Assert
        assert!(!cursor.within(0));
        assert!(cursor.within(1));
        assert!(cursor.within(2));
        assert!(cursor.within(3));
        assert!(!cursor.within(4));
    }

    #[test]
    fn test_set_begin_and_end_pos_follow_logical_order() {
        // Arrange: anchor is the logical end
        let mut cursor = TextCursor::default();
        cursor.move_to(4, 10);
        cursor.select_to(2, 20);

        // Act
        cursor.set_begin_pos(18);
        cursor.set_end_pos(11);

        // Assert
        assert_eq!(cursor.begin(), Some(CursorPos::new(2, 18)));
        assert_eq!(cursor.end(), Some(CursorPos::new(4, 11)));
    }

    #[test]
    fn test_clear_and_select_on_cleared_cursor() {
        let mut cursor = TextCursor::default();
        cursor.move_to(0, 0);
        cursor.select_to(0, 5);
        cursor.clear();
        assert!(!cursor.is_valid());

        cursor.select_to(1, 1);
        assert!(cursor.is_valid());
        assert!(!cursor.has_selection());
    }

    #[test]
    fn test_active_pane() {
        let mut cursor = TextCursor::default();
        cursor.set_active_pane(Pane::Ascii);
        assert_eq!(cursor.active_pane(), Pane::Ascii);

        // Clearing keeps the pane
        cursor.clear();
        assert_eq!(cursor.active_pane(), Pane::Ascii);
    }
}
