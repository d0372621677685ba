//! Filter panel visibility.
//!
//! On wide layouts the panel is shown inline. At or below the sheet
//! breakpoint it slides over the page with a scrim and holds the scroll lock
//! until closed.

use crate::viewport::Viewport;
use serde::Serialize;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct FilterSheet {
    visible: bool,
    overlay: bool,
}

impl FilterSheet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_visible(&self) -> bool {
        self.visible
    }

    /// True while shown as an overlay sheet (scrim visible, scroll locked).
    pub fn is_overlay(&self) -> bool {
        self.overlay
    }

    pub fn aria_expanded(&self) -> bool {
        self.visible
    }

    pub fn scrim_visible(&self) -> bool {
        self.overlay
    }

    pub fn open(&mut self, viewport: &mut Viewport) {
        if self.visible {
            return;
        }
        self.visible = true;
        if viewport.is_sheet_layout() {
            self.overlay = true;
            viewport.lock();
        }
    }

    /// Hides the panel and releases the lock an overlay sheet took.
    pub fn close(&mut self, viewport: &mut Viewport) -> Option<u32> {
        if !self.visible {
            return None;
        }
        self.visible = false;
        if std::mem::take(&mut self.overlay) {
            viewport.unlock()
        } else {
            None
        }
    }

    pub fn toggle(&mut self, viewport: &mut Viewport) {
        if self.visible {
            self.close(viewport);
        } else {
            self.open(viewport);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn inline_layout_does_not_lock() {
        let mut viewport = Viewport::new(1280);
        let mut sheet = FilterSheet::new();
        sheet.open(&mut viewport);
        assert!(sheet.is_visible());
        assert!(!sheet.scrim_visible());
        assert!(!viewport.is_locked());
        sheet.toggle(&mut viewport);
        assert!(!sheet.is_visible());
    }

    #[test]
    fn sheet_layout_locks_until_closed() {
        let mut viewport = Viewport::new(390);
        viewport.scroll_to(64);
        let mut sheet = FilterSheet::new();
        sheet.toggle(&mut viewport);
        assert!(sheet.is_overlay());
        assert!(sheet.aria_expanded());
        assert!(viewport.is_locked());
        assert_eq!(sheet.close(&mut viewport), Some(64));
        assert!(!sheet.scrim_visible());
        assert_eq!(sheet.close(&mut viewport), None);
    }
}
