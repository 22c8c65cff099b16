//! Splits OCR lines into the facts panel and the ingredients statement.
//!
//! The heuristic is a single forward pass of case-insensitive substring
//! checks against the keyword sets below. Numeric values are never
//! inspected, so zero-valued nutrient lines ("Vitamin D 0mcg") survive.

use crate::model::{ClassifiedFacts, NO_INGREDIENTS_FOUND};
use log::debug;

/// Phrases that open the facts panel
pub const FACTS_START_KEYWORDS: &[&str] = &[
    "nutrition facts",
    "supplement facts",
    "serving size",
    "calories",
];

/// Phrases that close the facts panel
pub const FACTS_END_PHRASES: &[&str] = &["% daily value", "advice", "not a significant source"];

/// Nutrient names that mark a facts line even outside the panel
pub const NUTRIENT_KEYWORDS: &[&str] = &[
    "calories",
    "total fat",
    "saturated fat",
    "trans fat",
    "cholesterol",
    "sodium",
    "total carbohydrate",
    "dietary fiber",
    "total sugars",
    "added sugars",
    "protein",
    "vitamin",
    "iron",
    "calcium",
    "potassium",
    "phosphorus",
    "zinc",
    "folate",
    "niacin",
    "riboflavin",
];

/// Markers of an ingredients statement
pub const INGREDIENT_MARKERS: &[&str] = &["contains", "ingredient"];

/// Looser markers used when nothing else was found
pub const FALLBACK_INGREDIENT_MARKERS: &[&str] = &["ingredient", ","];

/// Keyword configuration for [`classify_with`]. All entries are lowercase.
#[derive(Debug, Clone)]
pub struct KeywordSets {
    pub facts_start: Vec<String>,
    pub facts_end: Vec<String>,
    pub nutrients: Vec<String>,
    pub ingredient_markers: Vec<String>,
    pub fallback_ingredient_markers: Vec<String>,
}

impl Default for KeywordSets {
    fn default() -> Self {
        KeywordSets {
            facts_start: owned(FACTS_START_KEYWORDS),
            facts_end: owned(FACTS_END_PHRASES),
            nutrients: owned(NUTRIENT_KEYWORDS),
            ingredient_markers: owned(INGREDIENT_MARKERS),
            fallback_ingredient_markers: owned(FALLBACK_INGREDIENT_MARKERS),
        }
    }
}

fn owned(words: &[&str]) -> Vec<String> {
    words.iter().map(|w| w.to_string()).collect()
}

fn contains_any(haystack: &str, needles: &[String]) -> bool {
    needles.iter().any(|needle| haystack.contains(needle.as_str()))
}

/// Classify lines with the built-in keyword sets
pub fn classify(lines: &[String]) -> ClassifiedFacts {
    classify_with(lines, &KeywordSets::default())
}

/// Classify lines with explicit keyword sets
pub fn classify_with(lines: &[String], keywords: &KeywordSets) -> ClassifiedFacts {
    for (i, line) in lines.iter().enumerate() {
        debug!("Line {}: {}", i + 1, line);
    }

    let mut facts = Vec::new();
    let mut ingredients = Vec::new();
    let mut in_facts = false;
    let mut facts_seen = false;

    for line in lines {
        let trimmed = line.trim();
        let lowered = trimmed.to_lowercase();

        if contains_any(&lowered, &keywords.facts_start) {
            in_facts = true;
            facts_seen = true;
            facts.push(trimmed.to_string());
            continue;
        }

        if contains_any(&lowered, &keywords.facts_end) {
            in_facts = false;
            continue;
        }

        if in_facts || contains_any(&lowered, &keywords.nutrients) {
            facts.push(trimmed.to_string());
        }

        if contains_any(&lowered, &keywords.ingredient_markers) {
            ingredients.push(trimmed.to_string());
        }
    }

    if ingredients.is_empty() && !facts_seen {
        ingredients = lines
            .iter()
            .filter(|line| contains_any(&line.to_lowercase(), &keywords.fallback_ingredient_markers))
            .map(|line| line.trim().to_string())
            .collect();
    }

    let ingredients = join_ingredients(&ingredients);

    debug!("Final supplement facts: {:?}", facts);
    debug!("Final other ingredients: {}", ingredients);

    ClassifiedFacts { facts, ingredients }
}

fn join_ingredients(lines: &[String]) -> String {
    let joined = lines.join(" ").replace("  ", " ");
    let joined = joined.trim();
    if joined.is_empty() {
        NO_INGREDIENTS_FOUND.to_string()
    } else {
        joined.to_string()
    }
}
