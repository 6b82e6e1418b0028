pub mod catalog;
pub mod fs;
pub mod host;
pub mod migrations;
pub mod presenters;
pub mod sqlite;
pub mod timer;

pub use catalog::{parse_recipes, BundledRecipeSource};
pub use fs::{DirectoryRecipeSource, SystemClock};
pub use host::TerminalHost;
pub use presenters::{
    present_filter_badge, present_recipe_details, present_recipe_row, present_session,
    present_stars, present_tag_options,
};
pub use sqlite::SqlitePreferenceStore;
pub use timer::{ThreadTimerScheduler, TICK_INTERVAL};
