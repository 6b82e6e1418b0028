use std::collections::BTreeSet;

use recipe_book_domain::{Rating, Recipe, RecipeId, RecipeSession};
use tracing::{debug, info};

use crate::{
    ApplicationError, BootstrapCommand, HostActions, ListCategoriesQuery, ListFavoritesQuery,
    OpenSessionCommand, PreferenceStore, RandomRecipeQuery, RateRecipeCommand, RecipeSource,
    SearchRecipesQuery, SessionController, ShowRecipeQuery, TimerScheduler,
    ToggleFavoriteCommand, UserPreferences,
};

/// A recipe together with the user's own data about it.
#[derive(Debug, Clone, PartialEq)]
pub struct RecipeDetails<'a> {
    pub recipe: &'a Recipe,
    pub is_favorite: bool,
    pub user_rating: Option<Rating>,
}

pub struct ApplicationService {
    source: Box<dyn RecipeSource>,
    store: Box<dyn PreferenceStore>,
    recipes: Vec<Recipe>,
    preferences: UserPreferences,
}

impl ApplicationService {
    pub fn new(source: Box<dyn RecipeSource>, store: Box<dyn PreferenceStore>) -> Self {
        Self {
            source,
            store,
            recipes: Vec::new(),
            preferences: UserPreferences::default(),
        }
    }

    /// Loads the catalog and reads the stored preferences once.
    pub fn bootstrap(&mut self, _command: BootstrapCommand) -> Result<(), ApplicationError> {
        self.store.initialize()?;

        let recipes = self.source.load_recipes()?;
        let mut seen = BTreeSet::new();
        for recipe in &recipes {
            recipe.validate()?;
            if !seen.insert(recipe.id) {
                return Err(ApplicationError::InvalidInput(format!(
                    "duplicate recipe id={}",
                    recipe.id
                )));
            }
        }

        self.recipes = recipes;
        self.preferences = UserPreferences::load(self.store.as_ref());
        info!(
            recipes = self.recipes.len(),
            favorites = self.preferences.favorites().len(),
            "catalog loaded"
        );
        Ok(())
    }

    pub fn recipes(&self) -> &[Recipe] {
        &self.recipes
    }

    pub fn preferences(&self) -> &UserPreferences {
        &self.preferences
    }

    pub fn search(&self, query: &SearchRecipesQuery) -> Vec<&Recipe> {
        let found = recipe_book_domain::query(
            &self.recipes,
            &query.search_text,
            &query.category,
            &query.filters,
        );
        debug!(
            search = %query.search_text,
            category = ?query.category,
            matches = found.len(),
            "catalog queried"
        );
        found
    }

    pub fn show_recipe(
        &self,
        query: ShowRecipeQuery,
    ) -> Result<RecipeDetails<'_>, ApplicationError> {
        let recipe = self.find(query.recipe_id)?;
        Ok(self.details(recipe))
    }

    pub fn random_recipe(&self, _query: RandomRecipeQuery) -> Option<RecipeDetails<'_>> {
        recipe_book_domain::pick_random(&self.recipes, &mut rand::thread_rng())
            .map(|recipe| self.details(recipe))
    }

    pub fn categories(&self, _query: ListCategoriesQuery) -> Vec<&str> {
        recipe_book_domain::categories(&self.recipes)
    }

    /// Favorites in catalog order; ids missing from the catalog are skipped.
    pub fn list_favorites(&self, _query: ListFavoritesQuery) -> Vec<&Recipe> {
        self.recipes
            .iter()
            .filter(|recipe| self.preferences.is_favorite(recipe.id))
            .collect()
    }

    pub fn toggle_favorite(
        &mut self,
        command: ToggleFavoriteCommand,
    ) -> Result<bool, ApplicationError> {
        self.find(command.recipe_id)?;
        let favorite = self
            .preferences
            .toggle_favorite(self.store.as_ref(), command.recipe_id)?;
        info!(recipe = %command.recipe_id, favorite, "favorite toggled");
        Ok(favorite)
    }

    pub fn rate_recipe(&mut self, command: RateRecipeCommand) -> Result<(), ApplicationError> {
        self.find(command.recipe_id)?;
        self.preferences
            .rate(self.store.as_ref(), command.recipe_id, command.rating)?;
        info!(
            recipe = %command.recipe_id,
            stars = command.rating.stars(),
            "recipe rated"
        );
        Ok(())
    }

    pub fn open_session(
        &self,
        command: OpenSessionCommand,
        scheduler: Box<dyn TimerScheduler>,
        host: Box<dyn HostActions>,
    ) -> Result<SessionController, ApplicationError> {
        let recipe = self.find(command.recipe_id)?;
        let mut session = RecipeSession::new(recipe.clone());
        if let Some(servings) = command.servings {
            session.set_servings(servings);
        }
        Ok(SessionController::new(session, scheduler, host))
    }

    fn find(&self, recipe_id: RecipeId) -> Result<&Recipe, ApplicationError> {
        self.recipes
            .iter()
            .find(|recipe| recipe.id == recipe_id)
            .ok_or_else(|| {
                ApplicationError::NotFound(format!("recipe not found for id={recipe_id}"))
            })
    }

    fn details<'a>(&self, recipe: &'a Recipe) -> RecipeDetails<'a> {
        RecipeDetails {
            recipe,
            is_favorite: self.preferences.is_favorite(recipe.id),
            user_rating: self.preferences.user_rating(recipe.id),
        }
    }
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeSet;
    use std::rc::Rc;

    use recipe_book_domain::{
        CategoryFilter, Difficulty, FilterOptions, Ingredient, SortKey, Step, StepId,
    };

    use super::*;
    use crate::preferences::fakes::MemoryStore;
    use crate::session::fakes::{FakeHost, FakeScheduler, HostLog, SchedulerLog};
    use crate::{FAVORITES_KEY, RATINGS_KEY};

    struct FakeSource(Vec<Recipe>);

    impl RecipeSource for FakeSource {
        fn load_recipes(&self) -> Result<Vec<Recipe>, ApplicationError> {
            Ok(self.0.clone())
        }
    }

    /// Shares one in-memory store between the service and the test.
    struct SharedStore(Rc<MemoryStore>);

    impl PreferenceStore for SharedStore {
        fn initialize(&self) -> Result<(), ApplicationError> {
            self.0.initialize()
        }

        fn load(&self, key: &str) -> Result<Option<String>, ApplicationError> {
            self.0.load(key)
        }

        fn save(&self, key: &str, value: &str) -> Result<(), ApplicationError> {
            self.0.save(key, value)
        }
    }

    fn recipe(id: i64, title: &str, time: u32, difficulty: Difficulty) -> Recipe {
        Recipe {
            id: RecipeId::new(id).expect("id"),
            title: title.to_string(),
            description: format!("{title} по-домашнему"),
            image: format!("{id}.jpg"),
            time,
            difficulty,
            servings: 8,
            rating: 4.0 + id as f64 / 10.0,
            ratings_count: 12,
            category: "Пироги".to_string(),
            tags: BTreeSet::new(),
            ingredients: vec![Ingredient {
                name: "сливочный сыр".to_string(),
                amount: 200.0,
                unit: "г".to_string(),
            }],
            steps: vec![Step {
                id: StepId(1),
                text: "Смешать".to_string(),
                timer: Some(5),
            }],
            tips: vec!["Подавать тёплым".to_string()],
        }
    }

    fn catalog() -> Vec<Recipe> {
        vec![
            recipe(1, "Синнабоны с корицей", 90, Difficulty::Medium),
            recipe(2, "Яблочный пирог", 60, Difficulty::Easy),
            recipe(3, "Ассорти круассанов", 120, Difficulty::Hard),
        ]
    }

    fn service_with(store: Rc<MemoryStore>, recipes: Vec<Recipe>) -> ApplicationService {
        let mut service =
            ApplicationService::new(Box::new(FakeSource(recipes)), Box::new(SharedStore(store)));
        service
            .bootstrap(BootstrapCommand)
            .expect("bootstrap should work");
        service
    }

    fn id(value: i64) -> RecipeId {
        RecipeId::new(value).expect("id")
    }

    #[test]
    fn bootstrap_reads_preferences_once() {
        let store = Rc::new(MemoryStore::with(&[
            (FAVORITES_KEY, "[3]"),
            (RATINGS_KEY, r#"{"1":4}"#),
        ]));
        let service = service_with(Rc::clone(&store), catalog());

        let details = service
            .show_recipe(ShowRecipeQuery { recipe_id: id(1) })
            .expect("recipe 1");
        assert!(!details.is_favorite);
        assert_eq!(details.user_rating.map(Rating::stars), Some(4));

        let favorites = service.list_favorites(ListFavoritesQuery);
        assert_eq!(favorites.len(), 1);
        assert_eq!(favorites[0].id, id(3));
    }

    #[test]
    fn bootstrap_rejects_duplicate_ids() {
        let mut recipes = catalog();
        recipes.push(recipe(2, "Ещё пирог", 30, Difficulty::Easy));
        let mut service = ApplicationService::new(
            Box::new(FakeSource(recipes)),
            Box::new(SharedStore(Rc::new(MemoryStore::default()))),
        );
        assert!(matches!(
            service.bootstrap(BootstrapCommand),
            Err(ApplicationError::InvalidInput(_))
        ));
    }

    #[test]
    fn search_applies_text_category_and_filters() {
        let service = service_with(Rc::new(MemoryStore::default()), catalog());

        let found = service.search(&SearchRecipesQuery {
            search_text: "яблоч".to_string(),
            ..SearchRecipesQuery::default()
        });
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].title, "Яблочный пирог");

        let found = service.search(&SearchRecipesQuery {
            search_text: String::new(),
            category: CategoryFilter::from("Пироги"),
            filters: FilterOptions {
                max_time: 90,
                sort_by: SortKey::Time,
                ..FilterOptions::default()
            },
        });
        let ids: Vec<i64> = found.iter().map(|recipe| recipe.id.get()).collect();
        assert_eq!(ids, vec![2, 1]);

        assert!(service
            .search(&SearchRecipesQuery {
                search_text: "торт".to_string(),
                ..SearchRecipesQuery::default()
            })
            .is_empty());
    }

    #[test]
    fn favorites_and_ratings_reach_the_store() {
        let store = Rc::new(MemoryStore::default());
        let mut service = service_with(Rc::clone(&store), catalog());

        assert!(service
            .toggle_favorite(ToggleFavoriteCommand { recipe_id: id(2) })
            .expect("toggle"));
        assert_eq!(store.get(FAVORITES_KEY).as_deref(), Some("[2]"));
        assert!(!service
            .toggle_favorite(ToggleFavoriteCommand { recipe_id: id(2) })
            .expect("toggle back"));
        assert_eq!(store.get(FAVORITES_KEY).as_deref(), Some("[]"));

        service
            .rate_recipe(RateRecipeCommand {
                recipe_id: id(3),
                rating: Rating::new(5).expect("rating"),
            })
            .expect("rate");
        assert_eq!(store.get(RATINGS_KEY).as_deref(), Some(r#"{"3":5}"#));
    }

    #[test]
    fn unknown_recipe_is_not_found() {
        let mut service = service_with(Rc::new(MemoryStore::default()), catalog());
        assert!(matches!(
            service.show_recipe(ShowRecipeQuery { recipe_id: id(99) }),
            Err(ApplicationError::NotFound(_))
        ));
        assert!(matches!(
            service.toggle_favorite(ToggleFavoriteCommand { recipe_id: id(99) }),
            Err(ApplicationError::NotFound(_))
        ));
    }

    #[test]
    fn random_recipe_and_categories() {
        let service = service_with(Rc::new(MemoryStore::default()), catalog());
        let picked = service
            .random_recipe(RandomRecipeQuery)
            .expect("non-empty catalog");
        assert!(service.recipes().iter().any(|recipe| recipe.id == picked.recipe.id));
        assert_eq!(service.categories(ListCategoriesQuery), vec!["Пироги"]);

        let empty = service_with(Rc::new(MemoryStore::default()), Vec::new());
        assert!(empty.random_recipe(RandomRecipeQuery).is_none());
    }

    #[test]
    fn open_session_scales_from_requested_servings() {
        let service = service_with(Rc::new(MemoryStore::default()), catalog());
        let controller = service
            .open_session(
                OpenSessionCommand {
                    recipe_id: id(1),
                    servings: Some(4),
                },
                Box::new(FakeScheduler(Rc::new(SchedulerLog::default()))),
                Box::new(FakeHost(Rc::new(HostLog::default()))),
            )
            .expect("session");
        assert_eq!(controller.session().servings(), 4);
        assert_eq!(controller.scaled_ingredients()[0].display_amount(), 100.0);
    }
}
