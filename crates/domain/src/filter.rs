use std::collections::BTreeSet;
use std::fmt::{Display, Formatter};
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::{Difficulty, DomainError};

pub const MIN_TIME_CAP: u32 = 15;
pub const MAX_TIME_CAP: u32 = 180;
pub const TIME_CAP_STEP: u32 = 15;

pub const DIETARY_TAGS: [&str; 5] = [
    "без глютена",
    "без лактозы",
    "веганские",
    "без сахара",
    "низкокалорийные",
];

/// Label of the "every category" tab in the bundled catalog.
pub const ALL_CATEGORIES_LABEL: &str = "Все рецепты";

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortKey {
    /// Highest average rating first.
    #[default]
    Rating,
    /// Shortest total time first.
    Time,
    /// Easiest first.
    Difficulty,
    /// Highest id first.
    Newest,
}

impl SortKey {
    pub const ALL: [SortKey; 4] = [
        SortKey::Rating,
        SortKey::Time,
        SortKey::Difficulty,
        SortKey::Newest,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Rating => "rating",
            Self::Time => "time",
            Self::Difficulty => "difficulty",
            Self::Newest => "newest",
        }
    }
}

impl Display for SortKey {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SortKey {
    type Err = DomainError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let normalized = value.trim().to_ascii_lowercase();
        Self::ALL
            .into_iter()
            .find(|key| key.as_str() == normalized)
            .ok_or_else(|| DomainError::UnknownSortKey(value.to_string()))
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FilterOptions {
    pub max_time: u32,
    pub difficulty: BTreeSet<Difficulty>,
    pub tags: BTreeSet<String>,
    pub sort_by: SortKey,
}

impl Default for FilterOptions {
    fn default() -> Self {
        Self {
            max_time: MAX_TIME_CAP,
            difficulty: BTreeSet::new(),
            tags: BTreeSet::new(),
            sort_by: SortKey::default(),
        }
    }
}

impl FilterOptions {
    /// Number of narrowing criteria, shown as a badge next to the filter button.
    /// Sorting is not a filter and is not counted.
    pub fn active_count(&self) -> usize {
        let time = usize::from(self.max_time < MAX_TIME_CAP);
        self.difficulty.len() + self.tags.len() + time
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum CategoryFilter {
    #[default]
    All,
    Named(String),
}

impl CategoryFilter {
    pub fn matches(&self, category: &str) -> bool {
        match self {
            Self::All => true,
            Self::Named(name) => name == category,
        }
    }
}

impl From<&str> for CategoryFilter {
    fn from(value: &str) -> Self {
        let trimmed = value.trim();
        if trimmed.is_empty()
            || trimmed.eq_ignore_ascii_case("all")
            || trimmed == ALL_CATEGORIES_LABEL
        {
            return Self::All;
        }
        Self::Named(trimmed.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_filters_accept_everything_and_sort_by_rating() {
        let filters = FilterOptions::default();
        assert_eq!(filters.max_time, 180);
        assert!(filters.difficulty.is_empty());
        assert!(filters.tags.is_empty());
        assert_eq!(filters.sort_by, SortKey::Rating);
        assert_eq!(filters.active_count(), 0);
    }

    #[test]
    fn active_count_tracks_narrowing_criteria() {
        let mut filters = FilterOptions {
            max_time: 45,
            difficulty: BTreeSet::from([Difficulty::Easy]),
            tags: BTreeSet::from(["веганские".to_string(), "без сахара".to_string()]),
            sort_by: SortKey::Time,
        };
        assert_eq!(filters.active_count(), 4);

        filters.tags.remove("веганские");
        filters.max_time = MAX_TIME_CAP;
        assert_eq!(filters.active_count(), 2);
    }

    #[test]
    fn sort_key_parses_known_names_only() {
        assert_eq!("Newest".parse::<SortKey>(), Ok(SortKey::Newest));
        assert!(matches!(
            "popularity".parse::<SortKey>(),
            Err(DomainError::UnknownSortKey(_))
        ));
    }

    #[test]
    fn category_sentinels_map_to_all() {
        assert_eq!(CategoryFilter::from("all"), CategoryFilter::All);
        assert_eq!(CategoryFilter::from("Все рецепты"), CategoryFilter::All);
        assert_eq!(
            CategoryFilter::from("Торты"),
            CategoryFilter::Named("Торты".to_string())
        );
        assert!(!CategoryFilter::from("Торты").matches("торты"));
    }
}
