use recipe_book_domain::{RecipeSession, ScaledIngredient, StepId, TickOutcome};
use tracing::{debug, info};

use crate::{
    ApplicationError, HostActions, ShareRequest, TimerHandle, TimerScheduler, TimerToken,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickReport {
    /// The tick belongs to a cancelled or replaced timer.
    Ignored,
    Running {
        step_id: StepId,
        remaining_seconds: u32,
    },
    Completed {
        step_id: StepId,
    },
}

struct ActiveTimer {
    token: TimerToken,
    handle: Box<dyn TimerHandle>,
}

/// Binds a [`RecipeSession`] to the host's timer facility and actions.
///
/// At most one tick source is alive at a time. It is cancelled when the
/// timer is stopped, completes, is replaced, or the controller is dropped.
pub struct SessionController {
    session: RecipeSession,
    scheduler: Box<dyn TimerScheduler>,
    host: Box<dyn HostActions>,
    next_token: u64,
    active: Option<ActiveTimer>,
}

impl SessionController {
    pub fn new(
        session: RecipeSession,
        scheduler: Box<dyn TimerScheduler>,
        host: Box<dyn HostActions>,
    ) -> Self {
        Self {
            session,
            scheduler,
            host,
            next_token: 1,
            active: None,
        }
    }

    pub fn session(&self) -> &RecipeSession {
        &self.session
    }

    pub fn active_token(&self) -> Option<TimerToken> {
        self.active.as_ref().map(|active| active.token)
    }

    pub fn increment_servings(&mut self) -> u32 {
        self.session.increment_servings()
    }

    pub fn decrement_servings(&mut self) -> u32 {
        self.session.decrement_servings()
    }

    pub fn set_servings(&mut self, servings: u32) -> u32 {
        self.session.set_servings(servings)
    }

    pub fn scaled_ingredients(&self) -> Vec<ScaledIngredient<'_>> {
        self.session.scaled_ingredients()
    }

    pub fn toggle_step(&mut self, step_id: StepId) -> Result<bool, ApplicationError> {
        Ok(self.session.toggle_step(step_id)?)
    }

    pub fn progress_percent(&self) -> f64 {
        self.session.progress_percent()
    }

    pub fn start_timer(
        &mut self,
        step_id: StepId,
        minutes: u32,
    ) -> Result<TimerToken, ApplicationError> {
        self.session.start_timer(step_id, minutes)?;
        self.schedule(step_id)
    }

    /// Starts the countdown configured on the step.
    pub fn start_step_timer(&mut self, step_id: StepId) -> Result<TimerToken, ApplicationError> {
        self.session.start_step_timer(step_id)?;
        self.schedule(step_id)
    }

    pub fn stop_timer(&mut self) {
        self.cancel_active();
        self.session.stop_timer();
    }

    pub fn on_tick(&mut self, token: TimerToken) -> TickReport {
        if self.active_token() != Some(token) {
            debug!(%token, "ignoring tick from inactive timer");
            return TickReport::Ignored;
        }

        match self.session.tick() {
            TickOutcome::Idle => {
                self.cancel_active();
                TickReport::Ignored
            }
            TickOutcome::Running {
                step_id,
                remaining_seconds,
            } => TickReport::Running {
                step_id,
                remaining_seconds,
            },
            TickOutcome::Completed { step_id } => {
                self.cancel_active();
                info!(step = %step_id, "step timer finished");
                if let Err(error) = self.host.notify_timer_done(step_id) {
                    debug!(%error, "timer notification failed");
                }
                TickReport::Completed { step_id }
            }
        }
    }

    pub fn share(&self) {
        let recipe = self.session.recipe();
        let request = ShareRequest {
            title: recipe.title.clone(),
            text: recipe.description.clone(),
        };
        if let Err(error) = self.host.share(&request) {
            debug!(%error, "share failed");
        }
    }

    pub fn print(&self) {
        if let Err(error) = self.host.print(&self.session) {
            debug!(%error, "print failed");
        }
    }

    /// Tears the session down, cancelling any running tick source.
    pub fn close(mut self) {
        self.cancel_active();
    }

    fn schedule(&mut self, step_id: StepId) -> Result<TimerToken, ApplicationError> {
        self.cancel_active();

        let token = TimerToken(self.next_token);
        self.next_token += 1;

        match self.scheduler.schedule_ticks(token) {
            Ok(handle) => {
                debug!(%token, step = %step_id, "timer scheduled");
                self.active = Some(ActiveTimer { token, handle });
                Ok(token)
            }
            Err(error) => {
                self.session.stop_timer();
                Err(error)
            }
        }
    }

    fn cancel_active(&mut self) {
        if let Some(active) = self.active.take() {
            active.handle.cancel();
            debug!(token = %active.token, "timer cancelled");
        }
    }
}

impl Drop for SessionController {
    fn drop(&mut self) {
        self.cancel_active();
    }
}
