use std::fmt::{Display, Formatter};

use recipe_book_domain::{Recipe, RecipeSession, StepId};

use crate::ApplicationError;

/// Read-only supplier of the recipe catalog.
pub trait RecipeSource {
    fn load_recipes(&self) -> Result<Vec<Recipe>, ApplicationError>;
}

/// Textual key-value storage for user data.
pub trait PreferenceStore {
    fn initialize(&self) -> Result<(), ApplicationError>;

    /// Returns `None` when the key was never written.
    fn load(&self, key: &str) -> Result<Option<String>, ApplicationError>;

    fn save(&self, key: &str, value: &str) -> Result<(), ApplicationError>;
}

/// Identifies one scheduled tick source. Ticks are delivered back to the
/// session tagged with the token they were scheduled under.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TimerToken(pub u64);

impl Display for TimerToken {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "timer#{}", self.0)
    }
}

pub trait TimerHandle {
    /// Stops the tick source. Must be idempotent.
    fn cancel(&self);
}

pub trait TimerScheduler {
    /// Starts delivering one tick per second for `token` until cancelled.
    fn schedule_ticks(&self, token: TimerToken) -> Result<Box<dyn TimerHandle>, ApplicationError>;
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShareRequest {
    pub title: String,
    pub text: String,
}

/// Fire-and-forget capabilities of the host environment.
pub trait HostActions {
    fn notify_timer_done(&self, step_id: StepId) -> Result<(), ApplicationError>;

    fn share(&self, request: &ShareRequest) -> Result<(), ApplicationError>;

    fn print(&self, session: &RecipeSession) -> Result<(), ApplicationError>;
}

pub trait Clock {
    fn now_timestamp_string(&self) -> String;
}
