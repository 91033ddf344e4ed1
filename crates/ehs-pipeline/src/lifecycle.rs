//! Stage tracking for one action invocation.

use std::fmt;

use serde::{Deserialize, Serialize};

#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum ActionStage {
    /// Nothing has happened yet.
    Idle,
    /// Checking caller input against the input schema.
    Validating,
    /// Waiting on the generation service.
    Invoking,
    /// Checking the model reply against the output schema.
    Normalizing,
    Succeeded,
    Failed,
}

impl ActionStage {
    pub fn is_terminal(self) -> bool {
        matches!(self, ActionStage::Succeeded | ActionStage::Failed)
    }

    pub fn can_transition_to(self, next: ActionStage) -> bool {
        use ActionStage::*;

        matches!(
            (self, next),
            (Idle, Validating)
                | (Validating, Invoking)
                | (Validating, Failed)
                | (Invoking, Normalizing)
                | (Invoking, Failed)
                | (Normalizing, Succeeded)
                | (Normalizing, Failed)
        )
    }
}

impl fmt::Display for ActionStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ActionStage::Idle => "idle",
            ActionStage::Validating => "validating",
            ActionStage::Invoking => "invoking",
            ActionStage::Normalizing => "normalizing",
            ActionStage::Succeeded => "succeeded",
            ActionStage::Failed => "failed",
        };
        f.write_str(name)
    }
}

/// Per-invocation stage tracker. Created fresh for every call.
#[derive(Debug, Clone)]
pub struct Lifecycle {
    label: &'static str,
    stage: ActionStage,
    history: Vec<ActionStage>,
}

impl Lifecycle {
    pub fn new(label: &'static str) -> Self {
        Self {
            label,
            stage: ActionStage::Idle,
            history: vec![ActionStage::Idle],
        }
    }

    pub fn stage(&self) -> ActionStage {
        self.stage
    }

    pub fn history(&self) -> &[ActionStage] {
        &self.history
    }

    /// Move to `next`. Re-entering the current stage is a no-op; an illegal move is
    /// logged and ignored.
    pub fn advance(&mut self, next: ActionStage) -> ActionStage {
        if next == self.stage {
            return self.stage;
        }

        if !self.stage.can_transition_to(next) {
            log::warn!(
                "[{}] ignoring illegal stage transition {} -> {}",
                self.label,
                self.stage,
                next
            );
            return self.stage;
        }

        log::debug!("[{}] {} -> {}", self.label, self.stage, next);
        self.stage = next;
        self.history.push(next);
        self.stage
    }
}
