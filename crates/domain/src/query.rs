use std::cmp::Ordering;

use rand::seq::SliceRandom;
use rand::Rng;

use crate::{CategoryFilter, FilterOptions, Recipe, SortKey};

/// Selects and orders the recipes matching every criterion.
///
/// The sort is stable: recipes with equal keys keep their catalog order.
pub fn query<'a>(
    recipes: &'a [Recipe],
    search_text: &str,
    category: &CategoryFilter,
    filters: &FilterOptions,
) -> Vec<&'a Recipe> {
    let needle = search_text.trim().to_lowercase();

    let mut matches: Vec<&Recipe> = recipes
        .iter()
        .filter(|recipe| matches_text(recipe, &needle))
        .filter(|recipe| category.matches(&recipe.category))
        .filter(|recipe| recipe.time <= filters.max_time)
        .filter(|recipe| {
            filters.difficulty.is_empty() || filters.difficulty.contains(&recipe.difficulty)
        })
        .filter(|recipe| filters.tags.is_empty() || recipe.has_any_tag(&filters.tags))
        .collect();

    matches.sort_by(|left, right| compare(left, right, filters.sort_by));
    matches
}

fn matches_text(recipe: &Recipe, needle: &str) -> bool {
    if needle.is_empty() {
        return true;
    }
    recipe.title.to_lowercase().contains(needle)
        || recipe.description.to_lowercase().contains(needle)
        || recipe
            .ingredients
            .iter()
            .any(|ingredient| ingredient.name.to_lowercase().contains(needle))
}

fn compare(left: &Recipe, right: &Recipe, key: SortKey) -> Ordering {
    match key {
        SortKey::Rating => right.rating.total_cmp(&left.rating),
        SortKey::Time => left.time.cmp(&right.time),
        SortKey::Difficulty => left.difficulty.cmp(&right.difficulty),
        SortKey::Newest => right.id.cmp(&left.id),
    }
}

/// Distinct categories in the order they first appear in the catalog.
pub fn categories(recipes: &[Recipe]) -> Vec<&str> {
    let mut seen: Vec<&str> = Vec::new();
    for recipe in recipes {
        if !seen.contains(&recipe.category.as_str()) {
            seen.push(&recipe.category);
        }
    }
    seen
}

pub fn pick_random<'a, R: Rng + ?Sized>(recipes: &'a [Recipe], rng: &mut R) -> Option<&'a Recipe> {
    recipes.choose(rng)
}
