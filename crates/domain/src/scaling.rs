use std::fmt::{Display, Formatter};

use crate::Recipe;

/// Units measured in grams or millilitres are shown as whole numbers.
const WHOLE_NUMBER_UNITS: [&str; 4] = ["г", "мл", "g", "ml"];

pub fn multiplier(base_servings: u32, servings: u32) -> f64 {
    f64::from(servings) / f64::from(base_servings.max(1))
}

pub fn decimals_for_unit(unit: &str) -> usize {
    if WHOLE_NUMBER_UNITS.contains(&unit.trim()) {
        0
    } else {
        1
    }
}

pub fn round_to(value: f64, decimals: usize) -> f64 {
    let factor = 10_f64.powi(decimals as i32);
    (value * factor).round() / factor
}

#[derive(Debug, Clone, PartialEq)]
pub struct ScaledIngredient<'a> {
    pub name: &'a str,
    /// Unrounded `base amount × multiplier`.
    pub amount: f64,
    pub unit: &'a str,
    pub decimals: usize,
}

impl ScaledIngredient<'_> {
    pub fn display_amount(&self) -> f64 {
        round_to(self.amount, self.decimals)
    }
}

impl Display for ScaledIngredient<'_> {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{} {:.*} {}",
            self.name,
            self.decimals,
            self.display_amount(),
            self.unit
        )
    }
}

pub fn scale_ingredients(recipe: &Recipe, servings: u32) -> Vec<ScaledIngredient<'_>> {
    let factor = multiplier(recipe.servings, servings);
    recipe
        .ingredients
        .iter()
        .map(|ingredient| ScaledIngredient {
            name: &ingredient.name,
            amount: ingredient.amount * factor,
            unit: &ingredient.unit,
            decimals: decimals_for_unit(&ingredient.unit),
        })
        .collect()
}

pub fn multiplier_label(base_servings: u32, servings: u32) -> String {
    if servings == base_servings {
        return "по рецепту".to_string();
    }
    format!("×{:.1}", round_to(multiplier(base_servings, servings), 1))
}

/// Renders a countdown as `m:ss`.
pub fn format_clock(seconds: u32) -> String {
    format!("{}:{:02}", seconds / 60, seconds % 60)
}
