//! Shared switch-panel fixture for the integration tests.
//!
//! A panel of named switches with a cap on how many may be on at once and a
//! ban list. Turning on a switch past the cap evicts the oldest one; the
//! validator rejects any state where a banned switch is on.

// Not every test binary uses every fixture item.
#![allow(dead_code)]

use lodestone_state::{Action, Validator};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SwitchPanel {
    pub switches_on: Vec<String>,
    pub max_switches: usize,
    pub banned_switches: Vec<String>,
}

impl SwitchPanel {
    pub fn with_max(max: usize) -> Self {
        Self {
            max_switches: max,
            ..Self::default()
        }
    }
}

#[derive(Debug)]
pub enum SwitchAction {
    TurnOn(String),
    TurnOff(String),
}

impl SwitchAction {
    pub fn on(id: &str) -> Self {
        SwitchAction::TurnOn(id.to_string())
    }

    pub fn off(id: &str) -> Self {
        SwitchAction::TurnOff(id.to_string())
    }
}

impl Action<SwitchPanel> for SwitchAction {
    fn reduce(&self, mut state: SwitchPanel) -> SwitchPanel {
        match self {
            SwitchAction::TurnOn(id) => {
                state.switches_on.push(id.clone());
                let overflow = state.switches_on.len().saturating_sub(state.max_switches);
                state.switches_on.drain(..overflow);
            }
            SwitchAction::TurnOff(id) => {
                state.switches_on.retain(|on| on != id);
            }
        }
        state
    }
}

#[derive(Debug)]
pub enum ControlAction {
    SetMax(usize),
    BanSwitches,
    LiftBan,
}

impl Action<SwitchPanel> for ControlAction {
    fn reduce(&self, mut state: SwitchPanel) -> SwitchPanel {
        match self {
            ControlAction::SetMax(max) => state.max_switches = *max,
            ControlAction::BanSwitches => {
                for id in state.switches_on.drain(..) {
                    if !state.banned_switches.contains(&id) {
                        state.banned_switches.push(id);
                    }
                }
            }
            ControlAction::LiftBan => state.banned_switches.clear(),
        }
        state
    }
}

/// Rejects any state where a banned switch is on.
pub struct PanelRules;

impl Validator<SwitchPanel> for PanelRules {
    fn validate(&self, state: &SwitchPanel) -> bool {
        state
            .switches_on
            .iter()
            .all(|id| !state.banned_switches.contains(id))
    }
}
