//! Viewport primitives: reading and writing the document's vertical scroll offset

use std::cell::RefCell;
use std::rc::Rc;

use serde::Serialize;

use crate::ScrollBehavior;

/// Read/write access to the document scroll offset, in whole pixels
pub trait ViewportPort {
    /// Current vertical scroll offset
    fn scroll_y(&self) -> u32;

    /// Request a new vertical scroll offset. Hosts clamp the request to what
    /// the document can currently scroll to.
    fn scroll_to(&self, y: u32, behavior: ScrollBehavior);
}

/// One write issued through `ViewportPort::scroll_to`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ScrollWrite {
    pub requested: u32,
    pub applied: u32,
    pub behavior: ScrollBehavior,
}

#[derive(Debug)]
struct ViewportState {
    offset: u32,
    viewport_height: u32,
    content_height: u32,
    writes: Vec<ScrollWrite>,
}

impl ViewportState {
    fn max_scroll(&self) -> u32 {
        self.content_height.saturating_sub(self.viewport_height)
    }
}

/// Document model kept in memory.
///
/// The document can only be scrolled to `content_height - viewport_height`.
/// Growing the content extends that range; shrinking it clamps the current
/// offset the way a browser does. Writes made through the port are logged,
/// user scrolls are not.
#[derive(Debug, Clone)]
pub struct MemoryViewport {
    state: Rc<RefCell<ViewportState>>,
}

impl MemoryViewport {
    pub fn new(viewport_height: u32) -> Self {
        Self::with_content(viewport_height, viewport_height)
    }

    pub fn with_content(viewport_height: u32, content_height: u32) -> Self {
        MemoryViewport {
            state: Rc::new(RefCell::new(ViewportState {
                offset: 0,
                viewport_height,
                content_height,
                writes: Vec::new(),
            })),
        }
    }

    pub fn viewport_height(&self) -> u32 {
        self.state.borrow().viewport_height
    }

    pub fn content_height(&self) -> u32 {
        self.state.borrow().content_height
    }

    pub fn max_scroll(&self) -> u32 {
        self.state.borrow().max_scroll()
    }

    /// Change the document height (content mounted, streamed in, or removed)
    pub fn set_content_height(&self, height: u32) {
        let mut s = self.state.borrow_mut();
        s.content_height = height;
        let max = s.max_scroll();
        if s.offset > max {
            s.offset = max;
        }
    }

    /// Simulate the user scrolling; not recorded in the write log
    pub fn user_scroll(&self, y: u32) -> u32 {
        let mut s = self.state.borrow_mut();
        s.offset = y.min(s.max_scroll());
        s.offset
    }

    /// Writes issued through the port, oldest first
    pub fn writes(&self) -> Vec<ScrollWrite> {
        self.state.borrow().writes.clone()
    }

    pub fn clear_writes(&self) {
        self.state.borrow_mut().writes.clear();
    }
}

impl Default for MemoryViewport {
    fn default() -> Self {
        Self::new(720)
    }
}

impl ViewportPort for MemoryViewport {
    fn scroll_y(&self) -> u32 {
        self.state.borrow().offset
    }

    fn scroll_to(&self, y: u32, behavior: ScrollBehavior) {
        let mut s = self.state.borrow_mut();
        // Smooth scrolling settles within the frame for the in-memory document
        let applied = y.min(s.max_scroll());
        s.offset = applied;
        s.writes.push(ScrollWrite {
            requested: y,
            applied,
            behavior,
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn scroll_to_clamps_to_content() {
        let v = MemoryViewport::with_content(720, 1000);
        v.scroll_to(1200, ScrollBehavior::Instant);
        assert_eq!(v.scroll_y(), 280);
        let w = v.writes();
        assert_eq!(w.len(), 1);
        assert_eq!(w[0].requested, 1200);
        assert_eq!(w[0].applied, 280);
    }

    #[test]
    fn shrinking_content_clamps_offset() {
        let v = MemoryViewport::with_content(720, 3000);
        v.user_scroll(2000);
        assert_eq!(v.scroll_y(), 2000);
        v.set_content_height(1000);
        assert_eq!(v.scroll_y(), 280);
        // user scrolls never show up in the write log
        assert!(v.writes().is_empty());
    }

    #[test]
    fn short_document_cannot_scroll() {
        let v = MemoryViewport::new(720);
        assert_eq!(v.max_scroll(), 0);
        assert_eq!(v.user_scroll(50), 0);
    }
}
