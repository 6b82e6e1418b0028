use std::collections::BTreeSet;
use std::fmt::{Display, Formatter};
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::DomainError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "i64", into = "i64")]
pub struct RecipeId(i64);

impl RecipeId {
    pub fn new(value: i64) -> Result<Self, DomainError> {
        if value <= 0 {
            return Err(DomainError::InvalidRecipeId(value));
        }
        Ok(Self(value))
    }

    pub fn get(self) -> i64 {
        self.0
    }
}

impl TryFrom<i64> for RecipeId {
    type Error = DomainError;

    fn try_from(value: i64) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<RecipeId> for i64 {
    fn from(value: RecipeId) -> Self {
        value.0
    }
}

impl Display for RecipeId {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Step identifier, unique within one recipe.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct StepId(pub u32);

impl Display for StepId {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Ordered by severity, which is also the "sort by difficulty" order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Difficulty {
    #[serde(alias = "легко")]
    Easy,
    #[serde(alias = "средне")]
    Medium,
    #[serde(alias = "сложно")]
    Hard,
}

impl Difficulty {
    pub const ALL: [Difficulty; 3] = [Difficulty::Easy, Difficulty::Medium, Difficulty::Hard];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Easy => "easy",
            Self::Medium => "medium",
            Self::Hard => "hard",
        }
    }

    /// Label used by the bundled catalog.
    pub fn label(self) -> &'static str {
        match self {
            Self::Easy => "легко",
            Self::Medium => "средне",
            Self::Hard => "сложно",
        }
    }
}

impl Display for Difficulty {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Difficulty {
    type Err = DomainError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let normalized = value.trim().to_lowercase();
        Self::ALL
            .into_iter()
            .find(|difficulty| {
                normalized == difficulty.as_str() || normalized == difficulty.label()
            })
            .ok_or_else(|| DomainError::UnknownDifficulty(value.to_string()))
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Ingredient {
    pub name: String,
    pub amount: f64,
    pub unit: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Step {
    pub id: StepId,
    pub text: String,
    /// Countdown length in minutes, when the step has one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timer: Option<u32>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Recipe {
    pub id: RecipeId,
    pub title: String,
    pub description: String,
    pub image: String,
    /// Total preparation time in minutes.
    pub time: u32,
    pub difficulty: Difficulty,
    pub servings: u32,
    pub rating: f64,
    #[serde(default)]
    pub ratings_count: u32,
    pub category: String,
    #[serde(default)]
    pub tags: BTreeSet<String>,
    pub ingredients: Vec<Ingredient>,
    pub steps: Vec<Step>,
    #[serde(default)]
    pub tips: Vec<String>,
}

impl Recipe {
    pub fn validate(&self) -> Result<(), DomainError> {
        if self.servings == 0 {
            return Err(DomainError::InvalidServings {
                recipe_id: self.id.get(),
            });
        }

        let mut seen = BTreeSet::new();
        for step in &self.steps {
            if !seen.insert(step.id) {
                return Err(DomainError::DuplicateStep {
                    recipe_id: self.id.get(),
                    step_id: step.id.0,
                });
            }
        }

        if let Some(ingredient) = self
            .ingredients
            .iter()
            .find(|ingredient| !ingredient.amount.is_finite())
        {
            return Err(DomainError::NonFiniteAmount(ingredient.name.clone()));
        }

        Ok(())
    }

    pub fn step(&self, step_id: StepId) -> Option<&Step> {
        self.steps.iter().find(|step| step.id == step_id)
    }

    pub fn has_step(&self, step_id: StepId) -> bool {
        self.step(step_id).is_some()
    }

    pub fn has_any_tag(&self, tags: &BTreeSet<String>) -> bool {
        self.tags.iter().any(|tag| tags.contains(tag))
    }
}

/// A user's 1..=5 star rating.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "i64", into = "u8")]
pub struct Rating(u8);

impl Rating {
    pub const MIN: u8 = 1;
    pub const MAX: u8 = 5;

    pub fn new(stars: i64) -> Result<Self, DomainError> {
        if !(i64::from(Self::MIN)..=i64::from(Self::MAX)).contains(&stars) {
            return Err(DomainError::InvalidRating(stars));
        }
        Ok(Self(stars as u8))
    }

    pub fn stars(self) -> u8 {
        self.0
    }
}

impl TryFrom<i64> for Rating {
    type Error = DomainError;

    fn try_from(value: i64) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<Rating> for u8 {
    fn from(value: Rating) -> Self {
        value.0
    }
}

#[cfg(test)]
pub(crate) mod fixtures {
    use super::*;

    pub fn recipe(id: i64, title: &str) -> Recipe {
        Recipe {
            id: RecipeId::new(id).expect("positive id"),
            title: title.to_string(),
            description: String::new(),
            image: String::new(),
            time: 60,
            difficulty: Difficulty::Medium,
            servings: 8,
            rating: 4.5,
            ratings_count: 10,
            category: "Пироги".to_string(),
            tags: BTreeSet::new(),
            ingredients: vec![
                Ingredient {
                    name: "мука".to_string(),
                    amount: 500.0,
                    unit: "г".to_string(),
                },
                Ingredient {
                    name: "сливочный сыр".to_string(),
                    amount: 200.0,
                    unit: "г".to_string(),
                },
                Ingredient {
                    name: "корица".to_string(),
                    amount: 2.0,
                    unit: "ст.л.".to_string(),
                },
            ],
            steps: (1..=4)
                .map(|id| Step {
                    id: StepId(id),
                    text: format!("step {id}"),
                    timer: (id == 2).then_some(5),
                })
                .collect(),
            tips: Vec::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn recipe_id_must_be_positive() {
        assert!(RecipeId::new(1).is_ok());
        assert!(matches!(
            RecipeId::new(0),
            Err(DomainError::InvalidRecipeId(0))
        ));
    }

    #[test]
    fn difficulty_parses_both_label_sets() {
        assert_eq!("hard".parse::<Difficulty>(), Ok(Difficulty::Hard));
        assert_eq!("Легко".parse::<Difficulty>(), Ok(Difficulty::Easy));
        assert!(matches!(
            "tricky".parse::<Difficulty>(),
            Err(DomainError::UnknownDifficulty(_))
        ));
    }

    #[test]
    fn difficulty_orders_by_severity() {
        assert!(Difficulty::Easy < Difficulty::Medium);
        assert!(Difficulty::Medium < Difficulty::Hard);
    }

    #[test]
    fn rating_is_bounded() {
        assert_eq!(Rating::new(5).map(Rating::stars), Ok(5));
        assert!(matches!(Rating::new(0), Err(DomainError::InvalidRating(0))));
        assert!(matches!(Rating::new(6), Err(DomainError::InvalidRating(6))));
    }

    #[test]
    fn validate_rejects_duplicate_steps_and_zero_servings() {
        let mut recipe = fixtures::recipe(1, "Пирог");
        recipe.steps[1].id = StepId(1);
        assert!(matches!(
            recipe.validate(),
            Err(DomainError::DuplicateStep { step_id: 1, .. })
        ));

        let mut recipe = fixtures::recipe(1, "Пирог");
        recipe.servings = 0;
        assert!(matches!(
            recipe.validate(),
            Err(DomainError::InvalidServings { recipe_id: 1 })
        ));
    }

    #[test]
    fn deserializes_catalog_record_with_russian_labels() {
        let json = r#"{
            "id": 7,
            "title": "Медовик",
            "description": "Слоёный торт",
            "image": "medovik.jpg",
            "time": 180,
            "difficulty": "сложно",
            "servings": 12,
            "rating": 4.8,
            "ratingsCount": 54,
            "category": "Торты",
            "tags": ["без орехов"],
            "ingredients": [{"name": "мёд", "amount": 100, "unit": "г"}],
            "steps": [{"id": 1, "text": "Растопить мёд", "timer": 10}]
        }"#;
        let recipe: Recipe = serde_json::from_str(json).expect("recipe json");
        assert_eq!(recipe.difficulty, Difficulty::Hard);
        assert_eq!(recipe.steps[0].timer, Some(10));
        assert!(recipe.tips.is_empty());

        let bad = json.replace("\"id\": 7", "\"id\": -7");
        assert!(serde_json::from_str::<Recipe>(&bad).is_err());
    }
}
