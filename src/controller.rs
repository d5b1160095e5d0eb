//! Scroll restoration controller: the per-navigation scroll state machine.
//!
//! On every committed navigation the controller:
//!
//! 1. invalidates whatever the previous navigation left scheduled (the
//!    generation counter is bumped and pending callbacks are cancelled),
//! 2. writes the outgoing path's final offset, unless that page was still
//!    being restored,
//! 3. resets to the top for `Fresh` navigations (plus one corrective reset on
//!    the next task turn), or starts a frame-by-frame `RestoreAttempt` for
//!    `BackForward` navigations that have a record.
//!
//! Scheduled work is expressed as `Continuation` values stamped with the
//! generation they were created under. `resume` drops any continuation whose
//! generation is no longer current, so a superseded navigation can never move
//! the viewport once a newer one has started.

use log::{debug, info, trace, warn};
use serde::Serialize;

use crate::platform::{CallbackHandle, PlatformApi, ScrollRestoration};
use crate::records::ScrollRecords;
use crate::{ControllerConfig, NavigationEvent, NavigationKind, Result, ScrollBehavior};

/// Work item handed to the scheduler
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Continuation {
    /// Re-apply the top-of-page reset after a fresh navigation
    ResetToTop { generation: u64 },
    /// One frame of an in-flight restore
    RestoreTick { generation: u64 },
}

impl Continuation {
    pub fn generation(&self) -> u64 {
        match *self {
            Continuation::ResetToTop { generation } => generation,
            Continuation::RestoreTick { generation } => generation,
        }
    }
}

/// Bounded attempt to bring the viewport to a recorded offset
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RestoreAttempt {
    pub target_offset: u32,
    pub attempts_made: u32,
    pub max_attempts: u32,
}

impl RestoreAttempt {
    pub fn new(target_offset: u32, max_attempts: u32) -> Self {
        Self {
            target_offset,
            attempts_made: 0,
            max_attempts,
        }
    }

    pub fn exhausted(&self) -> bool {
        self.attempts_made >= self.max_attempts
    }
}

/// How a restore attempt ended
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum RestoreOutcome {
    /// The viewport got within tolerance of the target
    Reached { offset: u32, attempts: u32 },
    /// The page never grew tall enough; the closest offset was kept
    Exhausted { achieved: u32, target: u32, attempts: u32 },
    /// A newer navigation took over before the attempt finished
    Superseded { target: u32, attempts: u32 },
}

/// Counters describing what the controller has done so far
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ControllerStats {
    pub navigations: u64,
    pub fresh_resets: u64,
    pub corrections_applied: u64,
    pub missing_records: u64,
    pub restores_started: u64,
    pub restores_reached: u64,
    pub restores_exhausted: u64,
    pub restores_superseded: u64,
    pub records_written: u64,
    /// Leave writes skipped because the page was torn down mid-restore
    pub records_kept: u64,
    pub store_failures: u64,
    pub stale_continuations: u64,
}

#[derive(Debug)]
struct ActiveRestore {
    attempt: RestoreAttempt,
    pending: Option<CallbackHandle>,
}

/// Owns the scroll position of the application across navigations.
///
/// Exactly one instance should exist per application; create it with
/// [`ScrollRestorationController::install`] during bootstrap.
pub struct ScrollRestorationController<P: PlatformApi> {
    config: ControllerConfig,
    platform: P,
    generation: u64,
    current_path: Option<String>,
    active: Option<ActiveRestore>,
    pending_correction: Option<CallbackHandle>,
    last_outcome: Option<RestoreOutcome>,
    native_disabled: bool,
    stats: ControllerStats,
}

impl<P: PlatformApi> ScrollRestorationController<P> {
    /// Validate `config`, take over scroll restoration from the host and
    /// return an idle controller.
    pub fn install(config: ControllerConfig, platform: P) -> Result<Self> {
        config.validate()?;
        let mut controller = Self {
            config,
            platform,
            generation: 0,
            current_path: None,
            active: None,
            pending_correction: None,
            last_outcome: None,
            native_disabled: false,
            stats: ControllerStats::default(),
        };
        controller.disable_native_restoration();
        Ok(controller)
    }

    /// Switch the host's native scroll restoration to manual.
    ///
    /// Idempotent: returns `true` only when the mode actually changed.
    pub fn disable_native_restoration(&mut self) -> bool {
        let history = self.platform.history();
        self.native_disabled = true;
        if history.scroll_restoration() == ScrollRestoration::Manual {
            return false;
        }
        history.set_scroll_restoration(ScrollRestoration::Manual);
        info!("native scroll restoration disabled");
        true
    }

    /// React to a committed navigation.
    pub fn handle_navigation(&mut self, event: NavigationEvent) {
        let interrupted = self.supersede();
        if let Some(prev) = self.current_path.take() {
            if self.config.persist_on_leave {
                self.leave_path(&prev, interrupted);
            }
        }

        self.stats.navigations += 1;
        debug!(
            "navigation #{} {:?} -> {}",
            self.generation, event.kind, event.path
        );
        match event.kind {
            NavigationKind::Fresh => self.reset_to_top(),
            NavigationKind::BackForward => self.begin_restore(&event.path),
        }
        self.current_path = Some(event.path);
    }

    /// Record the current offset for the current path after a scroll event.
    ///
    /// Offset 0 is never recorded here so a momentary reset cannot clobber a
    /// meaningful position; `leave` covers deliberate returns to the top.
    pub fn on_scroll(&mut self) {
        let y = self.platform.viewport().scroll_y();
        if y == 0 {
            return;
        }
        if let Some(path) = self.current_path.clone() {
            self.write_record(&path, y);
        }
    }

    /// Tear down the current page: cancel pending work and write the current
    /// offset for the current path, even when it is 0.
    ///
    /// A page torn down while its restore is still running keeps its record:
    /// the viewport has not reached a position the user chose.
    pub fn leave(&mut self) {
        let interrupted = self.supersede();
        if let Some(path) = self.current_path.take() {
            self.leave_path(&path, interrupted);
        }
    }

    /// Run a continuation handed out through the scheduler.
    pub fn resume(&mut self, continuation: Continuation) {
        if continuation.generation() != self.generation {
            self.stats.stale_continuations += 1;
            trace!(
                "dropping stale {:?} (current generation {})",
                continuation,
                self.generation
            );
            return;
        }
        match continuation {
            Continuation::ResetToTop { .. } => {
                self.pending_correction = None;
                self.platform.viewport().scroll_to(0, ScrollBehavior::Instant);
                self.stats.corrections_applied += 1;
            }
            Continuation::RestoreTick { .. } => self.restore_tick(),
        }
    }

    pub fn config(&self) -> &ControllerConfig {
        &self.config
    }

    pub fn platform(&self) -> &P {
        &self.platform
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn current_path(&self) -> Option<&str> {
        self.current_path.as_deref()
    }

    pub fn active_attempt(&self) -> Option<&RestoreAttempt> {
        self.active.as_ref().map(|a| &a.attempt)
    }

    pub fn last_outcome(&self) -> Option<RestoreOutcome> {
        self.last_outcome
    }

    pub fn native_restoration_disabled(&self) -> bool {
        self.native_disabled
    }

    pub fn stats(&self) -> &ControllerStats {
        &self.stats
    }

    pub fn records(&self) -> ScrollRecords<'_> {
        ScrollRecords::new(self.platform.session_store(), &self.config.key_prefix)
    }

    /// Invalidate scheduled work. Returns the target of a restore that was
    /// still running.
    fn supersede(&mut self) -> Option<u32> {
        self.generation = self.generation.wrapping_add(1);
        let scheduler = self.platform.scheduler();
        if let Some(handle) = self.pending_correction.take() {
            scheduler.cancel(handle);
        }
        if let Some(active) = self.active.take() {
            if let Some(handle) = active.pending {
                scheduler.cancel(handle);
            }
            debug!(
                "restore to {} superseded after {} attempts",
                active.attempt.target_offset, active.attempt.attempts_made
            );
            self.stats.restores_superseded += 1;
            self.last_outcome = Some(RestoreOutcome::Superseded {
                target: active.attempt.target_offset,
                attempts: active.attempt.attempts_made,
            });
            return Some(active.attempt.target_offset);
        }
        None
    }

    fn leave_path(&mut self, path: &str, interrupted: Option<u32>) {
        if let Some(target) = interrupted {
            debug!("keeping record {} for {}, restore never settled", target, path);
            self.stats.records_kept += 1;
            return;
        }
        let y = self.platform.viewport().scroll_y();
        self.write_record(path, y);
    }

    fn reset_to_top(&mut self) {
        self.platform.viewport().scroll_to(0, ScrollBehavior::Instant);
        self.stats.fresh_resets += 1;
        if self.config.fresh_correction {
            let handle = self.platform.scheduler().queue_task(Continuation::ResetToTop {
                generation: self.generation,
            });
            self.pending_correction = Some(handle);
        }
    }

    fn begin_restore(&mut self, path: &str) {
        let record = self.records().load(path);
        let target = match record {
            Some(r) if r.offset > 0 => r.offset,
            Some(_) => {
                debug!("record for {} is 0, restoring to top", path);
                self.platform.viewport().scroll_to(0, ScrollBehavior::Instant);
                return;
            }
            None => {
                debug!("no scroll record for {}, falling back to top", path);
                self.stats.missing_records += 1;
                self.platform.viewport().scroll_to(0, ScrollBehavior::Instant);
                return;
            }
        };

        let attempt = RestoreAttempt::new(target, self.config.max_restore_attempts);
        let handle = self
            .platform
            .scheduler()
            .request_animation_frame(Continuation::RestoreTick {
                generation: self.generation,
            });
        debug!("restoring {} to {}", path, target);
        self.stats.restores_started += 1;
        self.active = Some(ActiveRestore {
            attempt,
            pending: Some(handle),
        });
    }

    fn restore_tick(&mut self) {
        let Some(mut active) = self.active.take() else {
            self.stats.stale_continuations += 1;
            return;
        };
        let target = active.attempt.target_offset;
        let viewport = self.platform.viewport();
        viewport.scroll_to(target, self.config.restore_behavior);
        active.attempt.attempts_made += 1;
        let current = viewport.scroll_y();
        let short = target.saturating_sub(current) >= self.config.tolerance_px;
        trace!(
            "restore tick {}/{}: target {} current {}",
            active.attempt.attempts_made,
            active.attempt.max_attempts,
            target,
            current
        );

        if short && !active.attempt.exhausted() {
            let handle = self
                .platform
                .scheduler()
                .request_animation_frame(Continuation::RestoreTick {
                    generation: self.generation,
                });
            active.pending = Some(handle);
            self.active = Some(active);
            return;
        }

        let attempts = active.attempt.attempts_made;
        let outcome = if short {
            debug!(
                "restore gave up at {} of {} after {} attempts",
                current, target, attempts
            );
            self.stats.restores_exhausted += 1;
            RestoreOutcome::Exhausted {
                achieved: current,
                target,
                attempts,
            }
        } else {
            debug!("restored {} after {} attempts", current, attempts);
            self.stats.restores_reached += 1;
            RestoreOutcome::Reached {
                offset: current,
                attempts,
            }
        };
        self.last_outcome = Some(outcome);
    }

    fn write_record(&mut self, path: &str, offset: u32) {
        let result = self.records().save(path, offset);
        match result {
            Ok(()) => self.stats.records_written += 1,
            Err(e) => {
                warn!("failed to record scroll offset for {}: {}", path, e);
                self.stats.store_failures += 1;
            }
        }
    }
}
