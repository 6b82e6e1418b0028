use std::collections::BTreeSet;

use crate::scaling::{self, ScaledIngredient};
use crate::{DomainError, Recipe, StepId};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum TimerState {
    #[default]
    Idle,
    Running {
        step_id: StepId,
        remaining_seconds: u32,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickOutcome {
    /// No timer was running; the tick changed nothing.
    Idle,
    Running {
        step_id: StepId,
        remaining_seconds: u32,
    },
    /// The countdown reached zero and the timer is idle again.
    Completed { step_id: StepId },
}

/// Transient interaction state for one open recipe.
#[derive(Debug, Clone)]
pub struct RecipeSession {
    recipe: Recipe,
    servings: u32,
    completed: BTreeSet<StepId>,
    timer: TimerState,
}

impl RecipeSession {
    pub fn new(recipe: Recipe) -> Self {
        Self {
            servings: recipe.servings.max(1),
            recipe,
            completed: BTreeSet::new(),
            timer: TimerState::Idle,
        }
    }

    pub fn recipe(&self) -> &Recipe {
        &self.recipe
    }

    pub fn servings(&self) -> u32 {
        self.servings
    }

    pub fn increment_servings(&mut self) -> u32 {
        self.servings = self.servings.saturating_add(1);
        self.servings
    }

    pub fn decrement_servings(&mut self) -> u32 {
        self.set_servings(self.servings.saturating_sub(1))
    }

    /// Values below one are clamped to one.
    pub fn set_servings(&mut self, servings: u32) -> u32 {
        self.servings = servings.max(1);
        self.servings
    }

    pub fn multiplier(&self) -> f64 {
        scaling::multiplier(self.recipe.servings, self.servings)
    }

    pub fn multiplier_label(&self) -> String {
        scaling::multiplier_label(self.recipe.servings, self.servings)
    }

    pub fn scaled_ingredients(&self) -> Vec<ScaledIngredient<'_>> {
        scaling::scale_ingredients(&self.recipe, self.servings)
    }

    /// Returns whether the step is completed after the toggle.
    pub fn toggle_step(&mut self, step_id: StepId) -> Result<bool, DomainError> {
        self.ensure_step(step_id)?;
        if self.completed.remove(&step_id) {
            return Ok(false);
        }
        self.completed.insert(step_id);
        Ok(true)
    }

    pub fn is_step_completed(&self, step_id: StepId) -> bool {
        self.completed.contains(&step_id)
    }

    pub fn completed_count(&self) -> usize {
        self.completed.len()
    }

    pub fn progress_percent(&self) -> f64 {
        if self.recipe.steps.is_empty() {
            return 0.0;
        }
        self.completed.len() as f64 / self.recipe.steps.len() as f64 * 100.0
    }

    /// Whole percent, halves rounded up.
    pub fn rounded_progress(&self) -> u32 {
        self.progress_percent().round() as u32
    }

    pub fn timer(&self) -> TimerState {
        self.timer
    }

    /// Replaces any running timer.
    pub fn start_timer(&mut self, step_id: StepId, minutes: u32) -> Result<u32, DomainError> {
        self.ensure_step(step_id)?;
        if minutes == 0 {
            return Err(DomainError::EmptyTimer);
        }
        let remaining_seconds = minutes.saturating_mul(60);
        self.timer = TimerState::Running {
            step_id,
            remaining_seconds,
        };
        Ok(remaining_seconds)
    }

    /// Starts the countdown configured on the step itself.
    pub fn start_step_timer(&mut self, step_id: StepId) -> Result<u32, DomainError> {
        let step = self
            .recipe
            .step(step_id)
            .ok_or(DomainError::UnknownStep {
                recipe_id: self.recipe.id.get(),
                step_id: step_id.0,
            })?;
        let minutes = step
            .timer
            .ok_or(DomainError::StepHasNoTimer { step_id: step_id.0 })?;
        self.start_timer(step_id, minutes)
    }

    pub fn stop_timer(&mut self) {
        self.timer = TimerState::Idle;
    }

    pub fn tick(&mut self) -> TickOutcome {
        match self.timer {
            TimerState::Idle => TickOutcome::Idle,
            TimerState::Running {
                step_id,
                remaining_seconds,
            } if remaining_seconds <= 1 => {
                self.timer = TimerState::Idle;
                TickOutcome::Completed { step_id }
            }
            TimerState::Running {
                step_id,
                remaining_seconds,
            } => {
                let remaining_seconds = remaining_seconds - 1;
                self.timer = TimerState::Running {
                    step_id,
                    remaining_seconds,
                };
                TickOutcome::Running {
                    step_id,
                    remaining_seconds,
                }
            }
        }
    }

    fn ensure_step(&self, step_id: StepId) -> Result<(), DomainError> {
        if self.recipe.has_step(step_id) {
            return Ok(());
        }
        Err(DomainError::UnknownStep {
            recipe_id: self.recipe.id.get(),
            step_id: step_id.0,
        })
    }
}
