use std::collections::{BTreeMap, BTreeSet};

use recipe_book_domain::{Rating, RecipeId};
use tracing::warn;

use crate::{ApplicationError, PreferenceStore};

pub const FAVORITES_KEY: &str = "favorites";
pub const RATINGS_KEY: &str = "ratings";

/// Favorites and star ratings, mirrored to a [`PreferenceStore`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UserPreferences {
    favorites: BTreeSet<RecipeId>,
    ratings: BTreeMap<RecipeId, Rating>,
}

impl UserPreferences {
    /// Missing or malformed entries load as empty.
    pub fn load(store: &dyn PreferenceStore) -> Self {
        Self {
            favorites: load_favorites(store),
            ratings: load_ratings(store),
        }
    }

    pub fn favorites(&self) -> &BTreeSet<RecipeId> {
        &self.favorites
    }

    pub fn is_favorite(&self, recipe_id: RecipeId) -> bool {
        self.favorites.contains(&recipe_id)
    }

    pub fn user_rating(&self, recipe_id: RecipeId) -> Option<Rating> {
        self.ratings.get(&recipe_id).copied()
    }

    /// Returns whether the recipe is a favorite afterwards. Nothing changes
    /// in memory when the store rejects the write.
    pub fn toggle_favorite(
        &mut self,
        store: &dyn PreferenceStore,
        recipe_id: RecipeId,
    ) -> Result<bool, ApplicationError> {
        let mut favorites = self.favorites.clone();
        let now_favorite = if favorites.remove(&recipe_id) {
            false
        } else {
            favorites.insert(recipe_id);
            true
        };

        let ids: Vec<i64> = favorites.iter().map(|id| id.get()).collect();
        let value = serde_json::to_string(&ids)
            .map_err(|error| ApplicationError::Persistence(error.to_string()))?;
        store.save(FAVORITES_KEY, &value)?;

        self.favorites = favorites;
        Ok(now_favorite)
    }

    pub fn rate(
        &mut self,
        store: &dyn PreferenceStore,
        recipe_id: RecipeId,
        rating: Rating,
    ) -> Result<(), ApplicationError> {
        let mut ratings = self.ratings.clone();
        ratings.insert(recipe_id, rating);

        let raw: BTreeMap<i64, u8> = ratings
            .iter()
            .map(|(id, rating)| (id.get(), rating.stars()))
            .collect();
        let value = serde_json::to_string(&raw)
            .map_err(|error| ApplicationError::Persistence(error.to_string()))?;
        store.save(RATINGS_KEY, &value)?;

        self.ratings = ratings;
        Ok(())
    }
}

fn read_key(store: &dyn PreferenceStore, key: &str) -> Option<String> {
    match store.load(key) {
        Ok(value) => value,
        Err(error) => {
            warn!(key, %error, "failed to read stored preferences, using defaults");
            None
        }
    }
}

fn load_favorites(store: &dyn PreferenceStore) -> BTreeSet<RecipeId> {
    let Some(raw) = read_key(store, FAVORITES_KEY) else {
        return BTreeSet::new();
    };
    match serde_json::from_str::<Vec<i64>>(&raw) {
        Ok(ids) => ids
            .into_iter()
            .filter_map(|id| match RecipeId::new(id) {
                Ok(recipe_id) => Some(recipe_id),
                Err(error) => {
                    warn!(%error, "dropping stored favorite");
                    None
                }
            })
            .collect(),
        Err(error) => {
            warn!(%error, "stored favorites are malformed, starting empty");
            BTreeSet::new()
        }
    }
}

fn load_ratings(store: &dyn PreferenceStore) -> BTreeMap<RecipeId, Rating> {
    let Some(raw) = read_key(store, RATINGS_KEY) else {
        return BTreeMap::new();
    };
    match serde_json::from_str::<BTreeMap<i64, i64>>(&raw) {
        Ok(entries) => entries
            .into_iter()
            .filter_map(|(id, stars)| match (RecipeId::new(id), Rating::new(stars)) {
                (Ok(recipe_id), Ok(rating)) => Some((recipe_id, rating)),
                (Err(error), _) | (_, Err(error)) => {
                    warn!(%error, "dropping stored rating");
                    None
                }
            })
            .collect(),
        Err(error) => {
            warn!(%error, "stored ratings are malformed, starting empty");
            BTreeMap::new()
        }
    }
}

#[cfg(test)]
pub(crate) mod fakes {
    use std::cell::{Cell, RefCell};
    use std::collections::HashMap;

    use super::*;

    #[derive(Default)]
    pub struct MemoryStore {
        pub values: RefCell<HashMap<String, String>>,
        pub writes: Cell<usize>,
        pub fail_writes: Cell<bool>,
    }

    impl MemoryStore {
        pub fn with(entries: &[(&str, &str)]) -> Self {
            let store = Self::default();
            for (key, value) in entries {
                store
                    .values
                    .borrow_mut()
                    .insert(key.to_string(), value.to_string());
            }
            store
        }

        pub fn get(&self, key: &str) -> Option<String> {
            self.values.borrow().get(key).cloned()
        }
    }

    impl PreferenceStore for MemoryStore {
        fn initialize(&self) -> Result<(), ApplicationError> {
            Ok(())
        }

        fn load(&self, key: &str) -> Result<Option<String>, ApplicationError> {
            Ok(self.get(key))
        }

        fn save(&self, key: &str, value: &str) -> Result<(), ApplicationError> {
            if self.fail_writes.get() {
                return Err(ApplicationError::Persistence("disk full".to_string()));
            }
            self.writes.set(self.writes.get() + 1);
            self.values
                .borrow_mut()
                .insert(key.to_string(), value.to_string());
            Ok(())
        }
    }
}
