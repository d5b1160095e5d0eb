//! Deterministic host driver.
//!
//! `Host` plays the part of the browser around a controller: it mounts page
//! content, lets the "user" scroll, and advances the event loop one task turn
//! or one animation frame at a time. Each frame first applies that frame's
//! content growth and then runs the frame callbacks, so a restore that is
//! waiting for a tall enough page sees the page grow exactly as it would while
//! images and fetched lists stream in.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::controller::ScrollRestorationController;
use crate::platform::{MemoryPlatform, ViewportPort};
use crate::{ControllerConfig, NavigationEvent, Result};

/// How tall a page's document is, frame by frame after it is mounted
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContentModel {
    /// Height when the page first renders
    pub initial_height: u32,
    /// Height once everything has loaded; values below `initial_height` mean "no growth"
    #[serde(default)]
    pub final_height: u32,
    /// Pixels added per animation frame until `final_height` is reached
    #[serde(default)]
    pub growth_per_frame: u32,
}

impl ContentModel {
    pub fn fixed(height: u32) -> Self {
        Self {
            initial_height: height,
            final_height: height,
            growth_per_frame: 0,
        }
    }

    pub fn streaming(initial_height: u32, final_height: u32, growth_per_frame: u32) -> Self {
        Self {
            initial_height,
            final_height,
            growth_per_frame,
        }
    }

    /// Document height `frames` frames after mounting
    pub fn height_after(&self, frames: u32) -> u32 {
        let ceiling = self.final_height.max(self.initial_height);
        let grown = self
            .initial_height
            .saturating_add(self.growth_per_frame.saturating_mul(frames));
        grown.min(ceiling)
    }
}

pub struct Host {
    controller: ScrollRestorationController<MemoryPlatform>,
    platform: MemoryPlatform,
    pages: HashMap<String, ContentModel>,
    default_page: ContentModel,
    frames_on_page: u32,
}

impl Host {
    /// Host with a fresh in-memory platform whose viewport is `viewport_height` tall
    pub fn new(config: ControllerConfig, viewport_height: u32) -> Result<Self> {
        Self::with_platform(config, MemoryPlatform::new(viewport_height))
    }

    pub fn with_platform(config: ControllerConfig, platform: MemoryPlatform) -> Result<Self> {
        let default_page = ContentModel::fixed(platform.viewport.viewport_height());
        let controller = ScrollRestorationController::install(config, platform.clone())?;
        Ok(Self {
            controller,
            platform,
            pages: HashMap::new(),
            default_page,
            frames_on_page: 0,
        })
    }

    pub fn set_content(&mut self, path: impl Into<String>, model: ContentModel) {
        self.pages.insert(path.into(), model);
    }

    /// Content used for paths without their own model
    pub fn set_default_content(&mut self, model: ContentModel) {
        self.default_page = model;
    }

    /// Deliver a committed navigation, then mount the new page's initial content
    pub fn navigate(&mut self, event: NavigationEvent) {
        let model = self.page_model(Some(&event.path));
        self.controller.handle_navigation(event);
        self.frames_on_page = 0;
        self.platform
            .viewport
            .set_content_height(model.height_after(0));
    }

    /// The user scrolls to `y`; returns the offset the document allowed
    pub fn scroll_to(&mut self, y: u32) -> u32 {
        let applied = self.platform.viewport.user_scroll(y);
        self.controller.on_scroll();
        applied
    }

    /// Tear the current page down
    pub fn leave(&mut self) {
        self.controller.leave();
    }

    /// Run every task queued so far; returns how many ran
    pub fn run_task_turn(&mut self) -> usize {
        let tasks = self.platform.clock.take_tasks();
        let n = tasks.len();
        for c in tasks {
            self.controller.resume(c);
        }
        n
    }

    /// Advance one animation frame; returns how many frame callbacks ran
    pub fn run_frame(&mut self) -> usize {
        self.frames_on_page = self.frames_on_page.saturating_add(1);
        let model = self.page_model(self.controller.current_path());
        self.platform
            .viewport
            .set_content_height(model.height_after(self.frames_on_page));

        let callbacks = self.platform.clock.take_frame();
        let n = callbacks.len();
        for c in callbacks {
            self.controller.resume(c);
        }
        n
    }

    pub fn run_frames(&mut self, count: u32) {
        for _ in 0..count {
            self.run_task_turn();
            self.run_frame();
        }
    }

    /// Alternate task turns and frames until nothing is scheduled or
    /// `max_frames` frames have run; returns the number of frames run.
    pub fn run_until_idle(&mut self, max_frames: u32) -> u32 {
        let mut frames = 0;
        loop {
            self.run_task_turn();
            if self.platform.clock.is_idle() || frames >= max_frames {
                break;
            }
            self.run_frame();
            frames += 1;
        }
        frames
    }

    pub fn scroll_offset(&self) -> u32 {
        self.platform.viewport.scroll_y()
    }

    pub fn controller(&self) -> &ScrollRestorationController<MemoryPlatform> {
        &self.controller
    }

    pub fn controller_mut(&mut self) -> &mut ScrollRestorationController<MemoryPlatform> {
        &mut self.controller
    }

    pub fn platform(&self) -> &MemoryPlatform {
        &self.platform
    }

    fn page_model(&self, path: Option<&str>) -> ContentModel {
        path.and_then(|p| self.pages.get(p))
            .copied()
            .unwrap_or(self.default_page)
    }
}
