use serde::Serialize;

use crate::domain::{AppError, Phase, Step};

/// The author-declared, append-only sequence of steps.
#[derive(Debug, Clone, Default, Serialize)]
pub struct StepRegistry {
    steps: Vec<Step>,
}

impl StepRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a step, assigning its ordinal.
    ///
    /// Rejects duplicate names, a phase earlier than the last registered step, and a second
    /// install step.
    pub fn register(&mut self, mut step: Step) -> Result<(), AppError> {
        if self.steps.iter().any(|s| s.name == step.name) {
            return Err(AppError::DuplicateStep(step.name));
        }
        if let Some(last) = self.steps.last()
            && step.phase < last.phase
        {
            return Err(AppError::PhaseOrder {
                step: step.name,
                phase: step.phase.to_string(),
                previous: last.phase.to_string(),
            });
        }
        if step.phase == Phase::Install
            && let Some(existing) = self.install_step()
        {
            return Err(AppError::DuplicateInstallStep {
                step: step.name,
                existing: existing.name.clone(),
            });
        }

        step.ordinal = self.steps.len() + 1;
        self.steps.push(step);
        Ok(())
    }

    /// Steps in registration order.
    pub fn all(&self) -> &[Step] {
        &self.steps
    }

    pub fn len(&self) -> usize {
        self.steps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    pub fn get(&self, name: &str) -> Option<&Step> {
        self.steps.iter().find(|s| s.name == name)
    }

    /// The distinguished dependency-installation step, if registered.
    pub fn install_step(&self) -> Option<&Step> {
        self.steps.iter().find(|s| s.phase == Phase::Install)
    }
}
