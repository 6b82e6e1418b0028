use recipe_book_domain::{CategoryFilter, FilterOptions, Rating, RecipeId};

#[derive(Debug, Clone, Default)]
pub struct BootstrapCommand;

#[derive(Debug, Clone, Default)]
pub struct SearchRecipesQuery {
    pub search_text: String,
    pub category: CategoryFilter,
    pub filters: FilterOptions,
}

#[derive(Debug, Clone, Copy)]
pub struct ShowRecipeQuery {
    pub recipe_id: RecipeId,
}

#[derive(Debug, Clone, Default)]
pub struct RandomRecipeQuery;

#[derive(Debug, Clone, Default)]
pub struct ListCategoriesQuery;

#[derive(Debug, Clone, Default)]
pub struct ListFavoritesQuery;

#[derive(Debug, Clone, Copy)]
pub struct ToggleFavoriteCommand {
    pub recipe_id: RecipeId,
}

#[derive(Debug, Clone, Copy)]
pub struct RateRecipeCommand {
    pub recipe_id: RecipeId,
    pub rating: Rating,
}

#[derive(Debug, Clone, Copy)]
pub struct OpenSessionCommand {
    pub recipe_id: RecipeId,
    /// Starting servings; the recipe's own servings when absent.
    pub servings: Option<u32>,
}
