use std::fs;
use std::path::{Path, PathBuf};

use recipe_book_application::{ApplicationError, RecipeSource};
use recipe_book_domain::Recipe;
use tracing::debug;
use walkdir::WalkDir;

use crate::catalog::parse_recipes;

/// Loads every `*.json` file below a folder as part of the catalog.
/// Files are read in path order so the catalog order is stable.
#[derive(Debug, Clone)]
pub struct DirectoryRecipeSource {
    root: PathBuf,
}

impl DirectoryRecipeSource {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }
}

impl RecipeSource for DirectoryRecipeSource {
    fn load_recipes(&self) -> Result<Vec<Recipe>, ApplicationError> {
        if !self.root.is_dir() {
            return Err(ApplicationError::InvalidInput(format!(
                "recipe folder does not exist or is not a directory: {}",
                self.root.display()
            )));
        }

        let mut recipes = Vec::new();
        for entry in WalkDir::new(&self.root)
            .sort_by_file_name()
            .into_iter()
            .filter_map(Result::ok)
        {
            if !entry.file_type().is_file() || !is_json(entry.path()) {
                continue;
            }

            let contents = fs::read_to_string(entry.path())
                .map_err(|error| ApplicationError::Io(error.to_string()))?;
            let parsed = parse_recipes(&contents).map_err(|error| {
                ApplicationError::Decode(format!("{}: {error}", entry.path().display()))
            })?;
            debug!(path = %entry.path().display(), recipes = parsed.len(), "recipe file loaded");
            recipes.extend(parsed);
        }

        Ok(recipes)
    }
}

fn is_json(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case("json"))
}
