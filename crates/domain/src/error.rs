use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DomainError {
    #[error("recipe id must be positive, got {0}")]
    InvalidRecipeId(i64),
    #[error("rating must be between 1 and 5, got {0}")]
    InvalidRating(i64),
    #[error("recipe {recipe_id} must serve at least one person")]
    InvalidServings { recipe_id: i64 },
    #[error("recipe {recipe_id} has no step {step_id}")]
    UnknownStep { recipe_id: i64, step_id: u32 },
    #[error("recipe {recipe_id} lists step {step_id} more than once")]
    DuplicateStep { recipe_id: i64, step_id: u32 },
    #[error("step {step_id} has no timer")]
    StepHasNoTimer { step_id: u32 },
    #[error("timer duration must be at least one minute")]
    EmptyTimer,
    #[error("ingredient {0} has a non-finite amount")]
    NonFiniteAmount(String),
    #[error("unknown sort key: {0}")]
    UnknownSortKey(String),
    #[error("unknown difficulty: {0}")]
    UnknownDifficulty(String),
}
