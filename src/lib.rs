//! Barkeep - a drinks menu service
//!
//! Barkeep serves a menu of drinks over HTTP+JSON. Reading the menu is
//! public; everything else (full recipes, creating, editing, deleting)
//! is gated by permissions carried in a signed bearer token.

pub mod auth;
pub mod config;
pub mod storage;
pub mod web;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Core error types for Barkeep
#[derive(Error, Debug)]
pub enum BarkeepError {
    #[error("Storage error: {0}")]
    Storage(#[from] storage::StorageError),

    #[error("Configuration error: {0}")]
    Config(#[from] config::ConfigError),

    #[error("Authorization error: {0}")]
    Auth(#[from] auth::AuthError),

    #[error("Invalid request: {0}")]
    InvalidRequest(String),
}

/// One ingredient of a drink recipe
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Ingredient {
    /// Ingredient name (e.g., "espresso")
    pub name: String,
    /// Display color for the menu graphic (e.g., "#8B4513")
    pub color: String,
    /// Relative quantity in parts
    pub parts: u32,
}

/// A drink on the menu
///
/// Serializing a `Drink` directly yields the long view: the full recipe,
/// ingredient names included.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Drink {
    /// Unique identifier, assigned by the store
    pub id: i64,
    /// Drink title, unique across the menu
    pub title: String,
    /// Ordered list of ingredients
    pub recipe: Vec<Ingredient>,
}

/// Short-view projection of an ingredient: color and proportion only
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IngredientSummary {
    pub color: String,
    pub parts: u32,
}

impl From<&Ingredient> for IngredientSummary {
    fn from(ingredient: &Ingredient) -> Self {
        Self {
            color: ingredient.color.clone(),
            parts: ingredient.parts,
        }
    }
}

/// Short-view projection of a drink for the public menu listing
///
/// Keeps the recipe shape (colors and proportions) but omits ingredient
/// names.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DrinkSummary {
    pub id: i64,
    pub title: String,
    pub recipe: Vec<IngredientSummary>,
}

impl From<&Drink> for DrinkSummary {
    fn from(drink: &Drink) -> Self {
        Self {
            id: drink.id,
            title: drink.title.clone(),
            recipe: drink.recipe.iter().map(IngredientSummary::from).collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn latte() -> Drink {
        Drink {
            id: 1,
            title: "Latte".to_string(),
            recipe: vec![
                Ingredient {
                    name: "espresso".to_string(),
                    color: "#6F4E37".to_string(),
                    parts: 1,
                },
                Ingredient {
                    name: "milk".to_string(),
                    color: "#FFFFFF".to_string(),
                    parts: 3,
                },
            ],
        }
    }

    #[test]
    fn test_summary_omits_ingredient_names() {
        let summary = DrinkSummary::from(&latte());

        assert_eq!(summary.id, 1);
        assert_eq!(summary.title, "Latte");
        assert_eq!(summary.recipe.len(), 2);

        let json = serde_json::to_string(&summary).unwrap();
        assert!(!json.contains("espresso"));
        assert!(!json.contains("\"name\""));
        assert!(json.contains("\"color\":\"#6F4E37\""));
        assert!(json.contains("\"parts\":3"));
    }

    #[test]
    fn test_long_view_keeps_ingredient_names() {
        let json = serde_json::to_string(&latte()).unwrap();
        assert!(json.contains("\"name\":\"espresso\""));
        assert!(json.contains("\"name\":\"milk\""));
    }

    #[test]
    fn test_summary_preserves_recipe_order() {
        let summary = DrinkSummary::from(&latte());
        assert_eq!(summary.recipe[0].parts, 1);
        assert_eq!(summary.recipe[1].parts, 3);
    }

    #[test]
    fn test_drink_round_trip() {
        let drink = latte();
        let json = serde_json::to_string(&drink).unwrap();
        let parsed: Drink = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, drink);
    }
}
