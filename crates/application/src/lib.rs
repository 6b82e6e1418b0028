mod error;
mod ports;
mod preferences;
mod service;
mod session;
mod use_cases;

pub use error::ApplicationError;
pub use ports::{
    Clock, HostActions, PreferenceStore, RecipeSource, ShareRequest, TimerHandle,
    TimerScheduler, TimerToken,
};
pub use preferences::{UserPreferences, FAVORITES_KEY, RATINGS_KEY};
pub use service::{ApplicationService, RecipeDetails};
pub use session::{SessionController, TickReport};
pub use use_cases::{
    BootstrapCommand, ListCategoriesQuery, ListFavoritesQuery, OpenSessionCommand,
    RandomRecipeQuery, RateRecipeCommand, SearchRecipesQuery, ShowRecipeQuery,
    ToggleFavoriteCommand,
};
