use recipe_book_application::{ApplicationError, RecipeSource};
use recipe_book_domain::Recipe;
use serde_json::Value;

const BUNDLED_CATALOG: &str = include_str!("bundled.json");

/// The catalog shipped inside the binary.
#[derive(Debug, Default)]
pub struct BundledRecipeSource;

impl RecipeSource for BundledRecipeSource {
    fn load_recipes(&self) -> Result<Vec<Recipe>, ApplicationError> {
        parse_recipes(BUNDLED_CATALOG)
    }
}

/// Accepts either a single recipe object or an array of recipes.
pub fn parse_recipes(json: &str) -> Result<Vec<Recipe>, ApplicationError> {
    let value: Value =
        serde_json::from_str(json).map_err(|error| ApplicationError::Decode(error.to_string()))?;
    let recipes = match value {
        Value::Array(_) => serde_json::from_value::<Vec<Recipe>>(value),
        other => serde_json::from_value::<Recipe>(other).map(|recipe| vec![recipe]),
    }
    .map_err(|error| ApplicationError::Decode(error.to_string()))?;

    for recipe in &recipes {
        recipe.validate()?;
    }
    Ok(recipes)
}

#[cfg(test)]
mod tests {
    use recipe_book_domain::{query, CategoryFilter, FilterOptions, RecipeId};

    use super::*;

    #[test]
    fn bundled_catalog_is_valid() {
        let recipes = BundledRecipeSource.load_recipes().expect("bundled catalog");
        assert_eq!(recipes.len(), 5);
        assert_eq!(recipes[0].id, RecipeId::new(1).expect("id"));
        assert_eq!(recipes[0].servings, 8);
    }

    #[test]
    fn search_over_bundled_catalog_finds_apple_pie_only() {
        let recipes = BundledRecipeSource.load_recipes().expect("bundled catalog");
        let found = query(
            &recipes,
            "яблок",
            &CategoryFilter::All,
            &FilterOptions::default(),
        );
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].title, "Яблочный пирог");
    }

    #[test]
    fn parses_single_object_and_rejects_invalid_records() {
        let single = r#"{
            "id": 9, "title": "Печенье", "description": "", "image": "",
            "time": 20, "difficulty": "easy", "servings": 4, "rating": 4.0,
            "category": "Печенье", "ingredients": [], "steps": []
        }"#;
        assert_eq!(parse_recipes(single).expect("single recipe").len(), 1);

        let zero_servings = single.replace("\"servings\": 4", "\"servings\": 0");
        assert!(matches!(
            parse_recipes(&zero_servings),
            Err(ApplicationError::Domain(_))
        ));
        assert!(matches!(
            parse_recipes("not json"),
            Err(ApplicationError::Decode(_))
        ));
    }
}
