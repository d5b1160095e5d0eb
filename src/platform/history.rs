//! History primitives: the host's native scroll restoration switch

use std::cell::Cell;
use std::rc::Rc;

use serde::{Deserialize, Serialize};

/// Native scroll restoration mode (`history.scrollRestoration`)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScrollRestoration {
    /// The host restores positions on its own during traversals
    #[default]
    Auto,
    /// The application owns scroll positions
    Manual,
}

pub trait HistoryPort {
    fn scroll_restoration(&self) -> ScrollRestoration;
    fn set_scroll_restoration(&self, mode: ScrollRestoration);
}

/// In-memory history that counts mode writes
#[derive(Debug, Clone, Default)]
pub struct MemoryHistory {
    mode: Rc<Cell<ScrollRestoration>>,
    writes: Rc<Cell<u32>>,
}

impl MemoryHistory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of times the mode was written
    pub fn write_count(&self) -> u32 {
        self.writes.get()
    }
}

impl HistoryPort for MemoryHistory {
    fn scroll_restoration(&self) -> ScrollRestoration {
        self.mode.get()
    }

    fn set_scroll_restoration(&self, mode: ScrollRestoration) {
        self.mode.set(mode);
        self.writes.set(self.writes.get() + 1);
    }
}
