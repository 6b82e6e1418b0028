mod error;
mod filter;
mod query;
mod recipe;
mod scaling;
mod session;

pub use error::DomainError;
pub use filter::{
    CategoryFilter, FilterOptions, SortKey, ALL_CATEGORIES_LABEL, DIETARY_TAGS, MAX_TIME_CAP,
    MIN_TIME_CAP, TIME_CAP_STEP,
};
pub use query::{categories, pick_random, query};
pub use recipe::{Difficulty, Ingredient, Rating, Recipe, RecipeId, Step, StepId};
pub use scaling::{
    decimals_for_unit, format_clock, multiplier, multiplier_label, round_to, scale_ingredients,
    ScaledIngredient,
};
pub use session::{RecipeSession, TickOutcome, TimerState};
