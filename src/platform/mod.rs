//! Platform ports: viewport, session store, history, scheduler
//!
//! This module contains the traits the controller talks to instead of browser
//! globals, plus deterministic in-memory implementations used by the `Host`
//! driver, the CLI and tests.
//!
//! Everything here lives on the host's single UI thread, so the in-memory
//! implementations share state through `Rc<RefCell<_>>` handles rather than
//! locks. Cloning a handle gives a second view of the same state.

pub mod history;
pub mod scheduler;
pub mod session_store;
pub mod viewport;

pub use history::{HistoryPort, MemoryHistory, ScrollRestoration};
pub use scheduler::{CallbackHandle, FrameClock, Scheduler};
pub use session_store::{MemorySessionStore, SessionStore};
pub use viewport::{MemoryViewport, ScrollWrite, ViewportPort};

/// A small composite trait giving the controller typed access to every port it
/// depends on.
pub trait PlatformApi {
    fn viewport(&self) -> &dyn ViewportPort;
    fn session_store(&self) -> &dyn SessionStore;
    fn history(&self) -> &dyn HistoryPort;
    fn scheduler(&self) -> &dyn Scheduler;
}

/// In-memory platform bundling the deterministic port implementations.
#[derive(Clone)]
pub struct MemoryPlatform {
    pub viewport: MemoryViewport,
    pub store: MemorySessionStore,
    pub history: MemoryHistory,
    pub clock: FrameClock,
}

impl MemoryPlatform {
    /// A platform whose viewport is `viewport_height` pixels tall and whose
    /// document initially fits in it exactly.
    pub fn new(viewport_height: u32) -> Self {
        MemoryPlatform {
            viewport: MemoryViewport::new(viewport_height),
            store: MemorySessionStore::new(),
            history: MemoryHistory::new(),
            clock: FrameClock::new(),
        }
    }

    /// Replace the session store, e.g. with one that has a quota.
    pub fn with_store(mut self, store: MemorySessionStore) -> Self {
        self.store = store;
        self
    }
}

impl Default for MemoryPlatform {
    fn default() -> Self {
        Self::new(720)
    }
}

impl PlatformApi for MemoryPlatform {
    fn viewport(&self) -> &dyn ViewportPort {
        &self.viewport
    }

    fn session_store(&self) -> &dyn SessionStore {
        &self.store
    }

    fn history(&self) -> &dyn HistoryPort {
        &self.history
    }

    fn scheduler(&self) -> &dyn Scheduler {
        &self.clock
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ScrollBehavior;

    #[test]
    fn memory_platform_handles_share_state() {
        let p = MemoryPlatform::default();
        let view = p.viewport.clone();
        view.set_content_height(3000);

        p.viewport().scroll_to(500, ScrollBehavior::Instant);
        assert_eq!(view.scroll_y(), 500);

        p.session_store().set_item("k", "v").unwrap();
        assert_eq!(p.store.get_item("k").as_deref(), Some("v"));

        assert_eq!(p.history().scroll_restoration(), ScrollRestoration::Auto);
    }
}
