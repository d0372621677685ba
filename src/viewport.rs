use serde::Serialize;

/// Widths at or below this use the overlay ("sheet") filter panel.
pub const SHEET_BREAKPOINT: u32 = 700;
const DEFAULT_WIDTH: u32 = 1024;

/// Page scroll position and the scroll lock taken by overlays.
///
/// The dialog and the filter sheet can both hold the lock; the offset
/// captured by the first holder is restored when the last one releases it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Viewport {
    width: u32,
    scroll_y: u32,
    locked_at: Option<u32>,
    holders: u32,
}

impl Default for Viewport {
    fn default() -> Self {
        Self::new(DEFAULT_WIDTH)
    }
}

impl Viewport {
    pub fn new(width: u32) -> Self {
        Self {
            width,
            scroll_y: 0,
            locked_at: None,
            holders: 0,
        }
    }

    pub fn scroll_y(&self) -> u32 {
        self.scroll_y
    }

    pub fn resize(&mut self, width: u32) {
        self.width = width;
    }

    pub fn is_sheet_layout(&self) -> bool {
        self.width <= SHEET_BREAKPOINT
    }

    /// Scrolling is ignored while the page is locked.
    pub fn scroll_to(&mut self, y: u32) {
        if !self.is_locked() {
            self.scroll_y = y;
        }
    }

    pub fn is_locked(&self) -> bool {
        self.locked_at.is_some()
    }

    pub fn lock(&mut self) {
        if self.locked_at.is_none() {
            self.locked_at = Some(self.scroll_y);
        }
        self.holders += 1;
    }

    /// Releases one hold; returns the restored offset once the page is free.
    pub fn unlock(&mut self) -> Option<u32> {
        if self.holders == 0 {
            return None;
        }
        self.holders -= 1;
        if self.holders > 0 {
            return None;
        }
        let offset = self.locked_at.take()?;
        self.scroll_y = offset;
        Some(offset)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unlock_restores_captured_offset() {
        let mut viewport = Viewport::new(1200);
        viewport.scroll_to(840);
        viewport.lock();
        viewport.scroll_to(10);
        assert_eq!(viewport.scroll_y(), 840);
        assert_eq!(viewport.unlock(), Some(840));
        assert!(!viewport.is_locked());
    }

    #[test]
    fn nested_locks_keep_first_offset() {
        let mut viewport = Viewport::new(400);
        viewport.scroll_to(300);
        viewport.lock();
        viewport.lock();
        assert_eq!(viewport.unlock(), None);
        assert!(viewport.is_locked());
        assert_eq!(viewport.unlock(), Some(300));
        assert_eq!(viewport.unlock(), None);
    }

    #[test]
    fn sheet_layout_breakpoint() {
        assert!(Viewport::new(700).is_sheet_layout());
        assert!(!Viewport::new(701).is_sheet_layout());
    }
}
