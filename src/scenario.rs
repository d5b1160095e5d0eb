//! Scripted navigation scenarios
//!
//! A scenario describes pages, their content growth, and an ordered list of
//! user and event-loop steps. `run_scenario` replays it through a `Host` and
//! returns a serializable report. The CLI is a thin wrapper around this.

use std::collections::{BTreeMap, HashMap};
use std::path::Path;

use log::debug;
use serde::{Deserialize, Serialize};

use crate::controller::{ControllerStats, RestoreOutcome};
use crate::host::{ContentModel, Host};
use crate::platform::ScrollWrite;
use crate::{ControllerConfig, Error, NavigationEvent, NavigationKind, Result};

fn default_viewport_height() -> u32 {
    720
}

fn default_max_frames() -> u32 {
    120
}

/// One step of a scenario
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum Step {
    /// The router commits a navigation
    Navigate { path: String, kind: NavigationKind },
    /// The user scrolls
    Scroll { offset: u32 },
    /// Run one task turn
    Tasks,
    /// Run `count` task turns and frames
    Frames { count: u32 },
    /// Run until nothing is scheduled (bounded)
    Idle {
        #[serde(default = "default_max_frames")]
        max_frames: u32,
    },
    /// The current page is torn down
    Leave,
    /// Fail the replay unless the viewport is within `tolerance` of `offset`
    Expect {
        offset: u32,
        #[serde(default)]
        tolerance: u32,
    },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Scenario {
    #[serde(default = "default_viewport_height")]
    pub viewport_height: u32,
    /// Content model per route path
    #[serde(default)]
    pub pages: HashMap<String, ContentModel>,
    /// Content model for paths missing from `pages`; defaults to the viewport height
    #[serde(default)]
    pub default_page: Option<ContentModel>,
    pub steps: Vec<Step>,
}

impl Scenario {
    pub fn from_json(json: &str) -> Result<Self> {
        let scenario: Scenario = serde_json::from_str(json)?;
        scenario.validate()?;
        Ok(scenario)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let text = std::fs::read_to_string(path)?;
        Self::from_json(&text)
    }

    pub fn validate(&self) -> Result<()> {
        if self.viewport_height == 0 {
            return Err(Error::ScenarioError("viewport_height must be positive".into()));
        }
        for (i, step) in self.steps.iter().enumerate() {
            if let Step::Navigate { path, .. } = step {
                if path.is_empty() {
                    return Err(Error::ScenarioError(format!("step {}: empty path", i)));
                }
            }
        }
        Ok(())
    }
}

/// Result of replaying a scenario
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ScenarioReport {
    pub final_path: Option<String>,
    pub final_offset: u32,
    pub frames: u64,
    pub writes: Vec<ScrollWrite>,
    pub last_outcome: Option<RestoreOutcome>,
    pub stats: ControllerStats,
    /// Session store contents at the end of the replay
    pub records: BTreeMap<String, String>,
}

/// Replay `scenario` on a fresh in-memory host.
///
/// Returns `Error::ScenarioError` when an `expect` step does not hold.
pub fn run_scenario(scenario: &Scenario, config: ControllerConfig) -> Result<ScenarioReport> {
    scenario.validate()?;
    let mut host = Host::new(config, scenario.viewport_height)?;
    if let Some(model) = scenario.default_page {
        host.set_default_content(model);
    }
    for (path, model) in &scenario.pages {
        host.set_content(path.clone(), *model);
    }

    for (i, step) in scenario.steps.iter().enumerate() {
        debug!("step {}: {:?}", i, step);
        match step {
            Step::Navigate { path, kind } => host.navigate(NavigationEvent {
                path: path.clone(),
                kind: *kind,
            }),
            Step::Scroll { offset } => {
                host.scroll_to(*offset);
            }
            Step::Tasks => {
                host.run_task_turn();
            }
            Step::Frames { count } => host.run_frames(*count),
            Step::Idle { max_frames } => {
                host.run_until_idle(*max_frames);
            }
            Step::Leave => host.leave(),
            Step::Expect { offset, tolerance } => {
                let actual = host.scroll_offset();
                if actual.abs_diff(*offset) > *tolerance {
                    return Err(Error::ScenarioError(format!(
                        "step {}: expected offset {} (±{}), found {}",
                        i, offset, tolerance, actual
                    )));
                }
            }
        }
    }

    let platform = host.platform();
    let controller = host.controller();
    Ok(ScenarioReport {
        final_path: controller.current_path().map(str::to_string),
        final_offset: host.scroll_offset(),
        frames: platform.clock.frame_count(),
        writes: platform.viewport.writes(),
        last_outcome: controller.last_outcome(),
        stats: controller.stats().clone(),
        records: platform.store.snapshot(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    const PORTFOLIO: &str = r#"{
        "pages": {
            "/portfolio": { "initial_height": 720, "final_height": 4000, "growth_per_frame": 400 }
        },
        "default_page": { "initial_height": 3000 },
        "steps": [
            { "op": "navigate", "path": "/portfolio", "kind": "fresh" },
            { "op": "frames", "count": 10 },
            { "op": "scroll", "offset": 1200 },
            { "op": "navigate", "path": "/contact", "kind": "fresh" },
            { "op": "idle" },
            { "op": "expect", "offset": 0 },
            { "op": "navigate", "path": "/portfolio", "kind": "back_forward" },
            { "op": "idle", "max_frames": 30 },
            { "op": "expect", "offset": 1200, "tolerance": 1 }
        ]
    }"#;

    #[test]
    fn replays_back_navigation_scenario() {
        let scenario = Scenario::from_json(PORTFOLIO).expect("scenario parses");
        assert_eq!(scenario.viewport_height, 720);
        let report = run_scenario(&scenario, ControllerConfig::default()).expect("replay");
        assert_eq!(report.final_path.as_deref(), Some("/portfolio"));
        assert_eq!(report.final_offset, 1200);
        assert_eq!(report.records.get("scroll-pos:/portfolio").map(String::as_str), Some("1200"));
        assert_eq!(report.records.get("scroll-pos:/contact").map(String::as_str), Some("0"));
        assert_eq!(report.stats.restores_reached, 1);
    }

    #[test]
    fn failed_expectation_is_reported() {
        let json = r#"{ "steps": [
            { "op": "navigate", "path": "/", "kind": "fresh" },
            { "op": "expect", "offset": 100 }
        ] }"#;
        let scenario = Scenario::from_json(json).unwrap();
        let err = run_scenario(&scenario, ControllerConfig::default()).unwrap_err();
        assert!(matches!(err, Error::ScenarioError(ref m) if m.contains("step 1")));
    }

    #[test]
    fn rejects_bad_input() {
        assert!(matches!(
            Scenario::from_json(r#"{ "steps": [], "bogus": 1 }"#),
            Err(Error::Json(_))
        ));
        assert!(matches!(
            Scenario::from_json(r#"{ "viewport_height": 0, "steps": [] }"#),
            Err(Error::ScenarioError(_))
        ));
        assert!(matches!(
            Scenario::from_json(r#"{ "steps": [{ "op": "navigate", "path": "", "kind": "fresh" }] }"#),
            Err(Error::ScenarioError(_))
        ));
    }
}
