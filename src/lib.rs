//! RFox Scroll Restoration
//!
//! Decides the scroll position of a single-page application on every
//! client-side navigation: reset to the top for fresh navigations, restore a
//! recorded position (retrying frame by frame while content is still growing)
//! for back/forward traversals.
//!
//! # Features
//!
//! - **Port-based design**: the viewport, session store, history and scheduler
//!   are traits, so the state machine runs against real hosts or in-memory fakes
//! - **Cooperative cancellation**: every scheduled continuation carries the
//!   generation it was scheduled under and is dropped once a newer navigation
//!   arrives
//! - **Never fails a navigation**: missing or corrupt records fall back to the top
//!
//! # Example
//!
//! ```
//! use rfscroll::{ControllerConfig, Host, NavigationEvent};
//!
//! # fn main() -> rfscroll::Result<()> {
//! let mut host = Host::new(ControllerConfig::default(), 720)?;
//! host.set_content("/portfolio", rfscroll::ContentModel::fixed(4000));
//!
//! host.navigate(NavigationEvent::fresh("/portfolio"));
//! host.scroll_to(1200);
//! host.navigate(NavigationEvent::fresh("/contact"));
//! host.navigate(NavigationEvent::back_forward("/portfolio"));
//! host.run_until_idle(30);
//!
//! assert_eq!(host.scroll_offset(), 1200);
//! # Ok(())
//! # }
//! ```

use serde::{Deserialize, Serialize};

pub mod error;
pub use error::{Error, Result};

pub mod controller;
pub mod host;
pub mod platform;
pub mod records;
pub mod scenario;

pub use controller::{
    Continuation, ControllerStats, RestoreAttempt, RestoreOutcome, ScrollRestorationController,
};
pub use host::{ContentModel, Host};
pub use platform::{MemoryPlatform, PlatformApi};
pub use records::ScrollRecords;
pub use scenario::{Scenario, ScenarioReport, Step};

/// Configuration for the scroll restoration controller
///
/// The defaults mirror what a browser-hosted application wants out of the box:
/// records are namespaced under `scroll-pos:`, restores retry for up to 15
/// animation frames, and fresh navigations get one corrective reset on the next
/// task turn.
///
/// # Examples
///
/// ```
/// let cfg = rfscroll::ControllerConfig::default();
/// assert_eq!(cfg.max_restore_attempts, 15);
/// assert!(cfg.validate().is_ok());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ControllerConfig {
    /// Prefix prepended to the route path to form the session store key
    pub key_prefix: String,
    /// Upper bound on animation frames spent restoring a recorded offset
    pub max_restore_attempts: u32,
    /// A restore is complete once the viewport is less than this many pixels short
    pub tolerance_px: u32,
    /// Behavior requested for restore writes (fresh resets are always instant)
    pub restore_behavior: ScrollBehavior,
    /// Re-apply the top-of-page reset once on the next task turn after a fresh navigation
    pub fresh_correction: bool,
    /// Write the outgoing path's offset unconditionally when a navigation replaces it
    pub persist_on_leave: bool,
}

impl Default for ControllerConfig {
    fn default() -> Self {
        Self {
            key_prefix: "scroll-pos:".to_string(),
            max_restore_attempts: 15,
            tolerance_px: 1,
            restore_behavior: ScrollBehavior::Instant,
            fresh_correction: true,
            persist_on_leave: true,
        }
    }
}

impl ControllerConfig {
    /// Check the configuration for values the controller cannot work with
    pub fn validate(&self) -> Result<()> {
        if self.key_prefix.is_empty() {
            return Err(Error::ConfigError("key_prefix must not be empty".to_string()));
        }
        if self.max_restore_attempts == 0 {
            return Err(Error::ConfigError(
                "max_restore_attempts must be at least 1".to_string(),
            ));
        }
        if self.tolerance_px == 0 {
            return Err(Error::ConfigError("tolerance_px must be at least 1".to_string()));
        }
        Ok(())
    }

    /// Parse a (possibly partial) JSON configuration; missing fields take defaults
    pub fn from_json(json: &str) -> Result<Self> {
        let cfg: ControllerConfig = serde_json::from_str(json)?;
        cfg.validate()?;
        Ok(cfg)
    }

    /// Read a JSON configuration file
    pub fn load(path: impl AsRef<std::path::Path>) -> Result<Self> {
        let text = std::fs::read_to_string(path)?;
        Self::from_json(&text)
    }
}

/// How the router classified a committed navigation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NavigationKind {
    /// A new history entry was pushed or the current one replaced
    Fresh,
    /// The user traversed existing session history
    BackForward,
}

/// A committed route change reported by the router
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NavigationEvent {
    pub path: String,
    pub kind: NavigationKind,
}

impl NavigationEvent {
    pub fn fresh(path: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            kind: NavigationKind::Fresh,
        }
    }

    pub fn back_forward(path: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            kind: NavigationKind::BackForward,
        }
    }
}

/// Requested application mode for a scroll write
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScrollBehavior {
    #[default]
    Instant,
    Smooth,
}

/// Last known scroll offset for a route path within the browsing session
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScrollRecord {
    pub path: String,
    pub offset: u32,
}

/// Validate `config` and install a controller on `platform`
///
/// Installation performs the one-time bootstrap step of switching the host's
/// native scroll restoration to manual.
pub fn install<P: PlatformApi>(
    config: ControllerConfig,
    platform: P,
) -> Result<ScrollRestorationController<P>> {
    ScrollRestorationController::install(config, platform)
}
