mod config;
mod cook;
mod logging;

use std::collections::BTreeSet;
use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Args, Parser, Subcommand};
use config::AppConfig;
use recipe_book_adapters::{
    present_filter_badge, present_recipe_details, present_recipe_row, present_session,
    present_stars, present_tag_options, BundledRecipeSource, DirectoryRecipeSource,
    SqlitePreferenceStore, SystemClock,
};
use recipe_book_application::{
    ApplicationService, BootstrapCommand, ListCategoriesQuery, ListFavoritesQuery,
    RandomRecipeQuery, RateRecipeCommand, RecipeSource, SearchRecipesQuery, ShowRecipeQuery,
    ToggleFavoriteCommand,
};
use recipe_book_domain::{
    CategoryFilter, Difficulty, FilterOptions, Rating, RecipeId, RecipeSession, SortKey,
    ALL_CATEGORIES_LABEL, MAX_TIME_CAP, MIN_TIME_CAP, TIME_CAP_STEP,
};

#[derive(Debug, Parser)]
#[command(
    name = "recipe-book",
    version,
    about = "Browse a recipe catalog and cook along step by step",
    arg_required_else_help = true
)]
struct Cli {
    /// Path to a TOML config file.
    #[arg(long, env = "RECIPE_BOOK_CONFIG", global = true)]
    config: Option<PathBuf>,
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Search and filter the catalog.
    List(ListArgs),
    Show {
        id: i64,
        /// Scale ingredients to this many servings.
        #[arg(long)]
        servings: Option<u32>,
    },
    Random,
    Categories,
    /// Known dietary tags accepted by `list --tag`.
    Tags,
    Favorites,
    /// Toggle a recipe in favorites.
    Favorite { id: i64 },
    Rate { id: i64, stars: i64 },
    /// Interactive session with servings, a step checklist and a timer.
    Cook {
        id: i64,
        #[arg(long)]
        servings: Option<u32>,
    },
}

#[derive(Debug, Args)]
struct ListArgs {
    #[arg(short, long, default_value = "")]
    search: String,
    #[arg(short, long, default_value = "all")]
    category: String,
    /// Maximum cooking time in minutes, 15..=180 in steps of 15.
    #[arg(long, default_value_t = MAX_TIME_CAP)]
    max_time: u32,
    #[arg(long = "difficulty")]
    difficulties: Vec<Difficulty>,
    /// Dietary tag; see `recipe-book tags`. Repeat to match any of several.
    #[arg(long = "tag")]
    tags: Vec<String>,
    #[arg(long, default_value = "rating")]
    sort: SortKey,
}

impl ListArgs {
    fn to_query(&self) -> Result<SearchRecipesQuery, CommandError> {
        if !(MIN_TIME_CAP..=MAX_TIME_CAP).contains(&self.max_time)
            || self.max_time % TIME_CAP_STEP != 0
        {
            return Err(CommandError::Usage(format!(
                "invalid max time: {} (expected {}..={} in steps of {})",
                self.max_time, MIN_TIME_CAP, MAX_TIME_CAP, TIME_CAP_STEP
            )));
        }

        Ok(SearchRecipesQuery {
            search_text: self.search.clone(),
            category: CategoryFilter::from(self.category.as_str()),
            filters: FilterOptions {
                max_time: self.max_time,
                difficulty: self.difficulties.iter().copied().collect(),
                tags: self.tags.iter().cloned().collect(),
                sort_by: self.sort,
            },
        })
    }
}

#[derive(Debug, Clone)]
enum CommandError {
    Usage(String),
    Runtime(String),
}

fn main() -> ExitCode {
    logging::init_logging();
    let cli = Cli::parse();

    let config = match AppConfig::load(cli.config.as_deref()) {
        Ok(config) => config,
        Err(error) => {
            eprintln!("{error}");
            return ExitCode::from(1);
        }
    };

    let mut service = build_application_service(&config);
    if let Err(error) = service.bootstrap(BootstrapCommand) {
        eprintln!("failed to bootstrap recipe-book: {error}");
        return ExitCode::from(1);
    }

    match run_command(cli.command, &mut service, &config) {
        Ok(()) => ExitCode::SUCCESS,
        Err(CommandError::Usage(msg)) => {
            eprintln!("{msg}");
            ExitCode::from(2)
        }
        Err(CommandError::Runtime(msg)) => {
            eprintln!("{msg}");
            ExitCode::from(1)
        }
    }
}

fn build_application_service(config: &AppConfig) -> ApplicationService {
    let source: Box<dyn RecipeSource> = match &config.recipes_dir {
        Some(dir) => Box::new(DirectoryRecipeSource::new(dir)),
        None => Box::new(BundledRecipeSource),
    };
    ApplicationService::new(
        source,
        Box::new(SqlitePreferenceStore::new(
            config.store_path.clone(),
            Box::new(SystemClock),
        )),
    )
}

fn recipe_id(raw: i64) -> Result<RecipeId, CommandError> {
    RecipeId::new(raw).map_err(|error| CommandError::Usage(format!("invalid recipe id: {error}")))
}

fn run_command(
    command: Command,
    service: &mut ApplicationService,
    config: &AppConfig,
) -> Result<(), CommandError> {
    match command {
        Command::List(args) => {
            let query = args.to_query()?;
            if let Some(badge) = present_filter_badge(&query.filters) {
                println!("{badge}");
            }
            let recipes = service.search(&query);
            if recipes.is_empty() {
                println!("ничего не найдено");
                return Ok(());
            }
            for recipe in recipes {
                let favorite = service.preferences().is_favorite(recipe.id);
                println!("{}", present_recipe_row(recipe, favorite));
            }
            Ok(())
        }
        Command::Show { id, servings } => {
            let recipe_id = recipe_id(id)?;
            let details = service
                .show_recipe(ShowRecipeQuery { recipe_id })
                .map_err(|error| CommandError::Runtime(format!("show failed: {error}")))?;
            println!("{}", present_recipe_details(&details).trim_end());

            let mut session = RecipeSession::new(details.recipe.clone());
            if let Some(servings) = servings {
                session.set_servings(servings);
            }
            println!();
            println!("{}", present_session(&session).trim_end());
            Ok(())
        }
        Command::Random => {
            match service.random_recipe(RandomRecipeQuery) {
                Some(details) => println!("{}", present_recipe_details(&details).trim_end()),
                None => println!("каталог пуст"),
            }
            Ok(())
        }
        Command::Categories => {
            println!("{ALL_CATEGORIES_LABEL}");
            for category in service.categories(ListCategoriesQuery) {
                println!("{category}");
            }
            Ok(())
        }
        Command::Tags => {
            print!("{}", present_tag_options(&BTreeSet::new()));
            Ok(())
        }
        Command::Favorites => {
            let favorites = service.list_favorites(ListFavoritesQuery);
            if favorites.is_empty() {
                println!("в избранном пусто");
                return Ok(());
            }
            for recipe in favorites {
                println!("{}", present_recipe_row(recipe, true));
            }
            Ok(())
        }
        Command::Favorite { id } => {
            let recipe_id = recipe_id(id)?;
            let favorite = service
                .toggle_favorite(ToggleFavoriteCommand { recipe_id })
                .map_err(|error| CommandError::Runtime(format!("favorite failed: {error}")))?;
            if favorite {
                println!("♥ рецепт {recipe_id} добавлен в избранное");
            } else {
                println!("рецепт {recipe_id} убран из избранного");
            }
            Ok(())
        }
        Command::Rate { id, stars } => {
            let recipe_id = recipe_id(id)?;
            let rating = Rating::new(stars)
                .map_err(|error| CommandError::Usage(format!("invalid rating: {error}")))?;
            service
                .rate_recipe(RateRecipeCommand { recipe_id, rating })
                .map_err(|error| CommandError::Runtime(format!("rate failed: {error}")))?;
            println!("рецепт {recipe_id}: {}", present_stars(Some(rating)));
            Ok(())
        }
        Command::Cook { id, servings } => {
            let recipe_id = recipe_id(id)?;
            cook::run_cook(service, recipe_id, servings, config.tick_interval())
                .map_err(|error| CommandError::Runtime(format!("cook failed: {error}")))
        }
    }
}

#[cfg(test)]
mod tests {
    use clap::CommandFactory;

    use super::*;

    fn parse(args: &[&str]) -> Command {
        Cli::try_parse_from(args).expect("arguments should parse").command
    }

    #[test]
    fn cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn parse_list_filters() {
        let command = parse(&[
            "recipe-book",
            "list",
            "--search",
            "корица",
            "--max-time",
            "60",
            "--difficulty",
            "легко",
            "--difficulty",
            "medium",
            "--tag",
            "без глютена",
            "--sort",
            "time",
        ]);
        let Command::List(args) = command else {
            panic!("expected list");
        };
        let query = args.to_query().expect("valid filters");
        assert_eq!(query.search_text, "корица");
        assert_eq!(query.category, CategoryFilter::All);
        assert_eq!(query.filters.max_time, 60);
        assert_eq!(query.filters.sort_by, SortKey::Time);
        assert_eq!(query.filters.active_count(), 4);
    }

    #[test]
    fn list_rejects_time_off_the_step_grid() {
        let Command::List(args) = parse(&["recipe-book", "list", "--max-time", "50"]) else {
            panic!("expected list");
        };
        assert!(matches!(args.to_query(), Err(CommandError::Usage(_))));
    }

    #[test]
    fn parse_rejects_unknown_sort_and_difficulty() {
        assert!(Cli::try_parse_from(["recipe-book", "list", "--sort", "alphabet"]).is_err());
        assert!(Cli::try_parse_from(["recipe-book", "list", "--difficulty", "extreme"]).is_err());
    }

    #[test]
    fn parse_tags_command() {
        assert!(matches!(parse(&["recipe-book", "tags"]), Command::Tags));
    }

    #[test]
    fn parse_cook_with_servings() {
        let command = parse(&["recipe-book", "cook", "3", "--servings", "4"]);
        assert!(matches!(
            command,
            Command::Cook {
                id: 3,
                servings: Some(4)
            }
        ));
    }

    #[test]
    fn rejects_non_positive_recipe_id() {
        assert!(matches!(recipe_id(0), Err(CommandError::Usage(_))));
        assert_eq!(recipe_id(5).map(RecipeId::get).ok(), Some(5));
    }
}
