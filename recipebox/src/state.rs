use std::sync::{Arc, OnceLock};

use serde::{Deserialize, Serialize};

const EXAMPLE_INGREDIENT: &str = "I am an example ingredient";
const EXAMPLE_INSTRUCTION: &str = "I am an example instruction";

/// A saved catalog entry. Two recipes are equal if all of their fields are equal.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Recipe {
    pub name: String,
    pub category: String,
    pub author_first: String,
    pub author_last: String,
    pub ingredients: Vec<String>,
    pub instructions: Vec<String>,
}

impl Recipe {
    fn seeded(ingredients: usize, instructions: usize) -> Self {
        Self {
            name: "Wat".into(),
            category: "brunch".into(),
            author_first: "me".into(),
            author_last: "meson".into(),
            ingredients: vec!["thing".into(); ingredients],
            instructions: vec!["do the thing".into(); instructions],
        }
    }
}

/// The draft which is currently edited plus all saved recipes.
///
/// Values are never changed in place once they are handed out by the store.
/// Every transition builds a new `ApplicationState`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApplicationState {
    pub name: String,
    pub category: String,
    pub author_first: String,
    pub author_last: String,
    pub ingredients: Vec<String>,
    pub instructions: Vec<String>,
    pub recipes: Vec<Recipe>,
}

impl Default for ApplicationState {
    fn default() -> Self {
        Self {
            name: String::new(),
            category: String::new(),
            author_first: String::new(),
            author_last: String::new(),
            ingredients: vec![EXAMPLE_INGREDIENT.into()],
            instructions: vec![EXAMPLE_INSTRUCTION.into()],
            recipes: vec![
                Recipe::seeded(19, 18),
                Recipe::seeded(1, 1),
                Recipe::seeded(1, 1),
            ],
        }
    }
}

impl ApplicationState {
    /// The fixed value every store starts with and `RESET_INPUTS` returns to.
    /// All callers share the same allocation.
    pub fn initial() -> Arc<Self> {
        static INITIAL: OnceLock<Arc<ApplicationState>> = OnceLock::new();
        INITIAL.get_or_init(|| Arc::new(Self::default())).clone()
    }

    /// Copies the draft fields into a recipe-shaped value
    pub fn draft(&self) -> Recipe {
        Recipe {
            name: self.name.clone(),
            category: self.category.clone(),
            author_first: self.author_first.clone(),
            author_last: self.author_last.clone(),
            ingredients: self.ingredients.clone(),
            instructions: self.instructions.clone(),
        }
    }

    pub fn recipes(&self) -> &[Recipe] {
        &self.recipes
    }
}
