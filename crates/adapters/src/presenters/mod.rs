use std::collections::BTreeSet;
use std::fmt::Write as _;

use recipe_book_application::RecipeDetails;
use recipe_book_domain::{
    format_clock, FilterOptions, Rating, Recipe, RecipeSession, TimerState, DIETARY_TAGS,
};

pub fn present_recipe_row(recipe: &Recipe, is_favorite: bool) -> String {
    format!(
        "{}\t{}{}\t{}\t{} мин\t★{:.1}",
        recipe.id,
        if is_favorite { "♥ " } else { "" },
        recipe.title,
        recipe.difficulty.label(),
        recipe.time,
        recipe.rating
    )
}

/// Badge line for a narrowed listing; `None` when no filter is active.
pub fn present_filter_badge(filters: &FilterOptions) -> Option<String> {
    match filters.active_count() {
        0 => None,
        count => Some(format!("фильтров: {count}")),
    }
}

pub fn present_tag_options(selected: &BTreeSet<String>) -> String {
    let mut out = String::new();
    for tag in DIETARY_TAGS {
        let mark = if selected.contains(tag) { 'x' } else { ' ' };
        let _ = writeln!(out, "[{mark}] {tag}");
    }
    out
}

pub fn present_stars(rating: Option<Rating>) -> String {
    let stars = rating.map_or(0, Rating::stars);
    (Rating::MIN..=Rating::MAX)
        .map(|position| if position <= stars { '★' } else { '☆' })
        .collect()
}

pub fn present_recipe_details(details: &RecipeDetails<'_>) -> String {
    let recipe = details.recipe;
    let mut out = String::new();
    let _ = writeln!(out, "{}{}", recipe.title, if details.is_favorite { " ♥" } else { "" });
    let _ = writeln!(out, "{}", recipe.description);
    let _ = writeln!(
        out,
        "{} · {} мин · {} порций · ★{:.1} ({})",
        recipe.difficulty.label(),
        recipe.time,
        recipe.servings,
        recipe.rating,
        recipe.ratings_count
    );
    let _ = writeln!(out, "ваша оценка: {}", present_stars(details.user_rating));
    if !recipe.tags.is_empty() {
        let tags: Vec<&str> = recipe.tags.iter().map(String::as_str).collect();
        let _ = writeln!(out, "теги: {}", tags.join(", "));
    }
    out
}

/// The printable recipe card for an open session.
pub fn present_session(session: &RecipeSession) -> String {
    let recipe = session.recipe();
    let mut out = String::new();
    let _ = writeln!(out, "{}", recipe.title);
    let _ = writeln!(
        out,
        "Порции: {} ({})",
        session.servings(),
        session.multiplier_label()
    );

    let _ = writeln!(out, "\nИнгредиенты:");
    for ingredient in session.scaled_ingredients() {
        let _ = writeln!(out, "  - {ingredient}");
    }

    let _ = writeln!(
        out,
        "\nШаги: {} из {} ({}%)",
        session.completed_count(),
        recipe.steps.len(),
        session.rounded_progress()
    );
    for step in &recipe.steps {
        let mark = if session.is_step_completed(step.id) { 'x' } else { ' ' };
        let _ = write!(out, "  [{mark}] {}. {}", step.id, step.text);
        match (session.timer(), step.timer) {
            (
                TimerState::Running {
                    step_id,
                    remaining_seconds,
                },
                _,
            ) if step_id == step.id => {
                let _ = write!(out, " ⏱ {}", format_clock(remaining_seconds));
            }
            (_, Some(minutes)) => {
                let _ = write!(out, " (таймер {minutes} мин)");
            }
            _ => {}
        }
        out.push('\n');
    }

    if !recipe.tips.is_empty() {
        let _ = writeln!(out, "\nСоветы:");
        for tip in &recipe.tips {
            let _ = writeln!(out, "  * {tip}");
        }
    }
    out
}
