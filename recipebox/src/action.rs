use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::ActionDecodeError;

pub const UPDATE_NAME: &str = "UPDATE_NAME";
pub const UPDATE_CATEGORY: &str = "UPDATE_CATEGORY";
pub const UPDATE_AUTHOR_FIRST: &str = "UPDATE_AUTHOR_FIRST";
pub const UPDATE_AUTHOR_LAST: &str = "UPDATE_AUTHOR_LAST";
pub const ADD_INGREDIENT: &str = "ADD_INGREDIENT";
pub const ADD_INSTRUCTION: &str = "ADD_INSTRUCTION";
pub const ADD_RECIPE: &str = "ADD_RECIPE";
pub const RESET_INPUTS: &str = "RESET_INPUTS";

/// A request for one state transition.
///
/// On the wire an action is `{ "kind": "...", "payload": ... }`. Kinds which are not known
/// are kept as [`Action::Unrecognized`] and leave the state untouched when dispatched.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    UpdateName(String),
    UpdateCategory(String),
    UpdateAuthorFirst(String),
    UpdateAuthorLast(String),
    AddIngredient(String),
    AddInstruction(String),
    AddRecipe,
    ResetInputs,
    Unrecognized(String),
}

#[derive(Deserialize)]
struct RawAction {
    kind: String,
    #[serde(default)]
    payload: Option<Value>,
}

#[derive(Serialize)]
struct RawActionRef<'a> {
    kind: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    payload: Option<&'a str>,
}

impl Action {
    pub fn kind(&self) -> &str {
        match self {
            Action::UpdateName(_) => UPDATE_NAME,
            Action::UpdateCategory(_) => UPDATE_CATEGORY,
            Action::UpdateAuthorFirst(_) => UPDATE_AUTHOR_FIRST,
            Action::UpdateAuthorLast(_) => UPDATE_AUTHOR_LAST,
            Action::AddIngredient(_) => ADD_INGREDIENT,
            Action::AddInstruction(_) => ADD_INSTRUCTION,
            Action::AddRecipe => ADD_RECIPE,
            Action::ResetInputs => RESET_INPUTS,
            Action::Unrecognized(kind) => kind.as_str(),
        }
    }

    pub fn payload(&self) -> Option<&str> {
        match self {
            Action::UpdateName(x)
            | Action::UpdateCategory(x)
            | Action::UpdateAuthorFirst(x)
            | Action::UpdateAuthorLast(x)
            | Action::AddIngredient(x)
            | Action::AddInstruction(x) => Some(x),
            Action::AddRecipe | Action::ResetInputs | Action::Unrecognized(_) => None,
        }
    }

    /// Builds an action from its tag. Payloads of kinds which don't take one are ignored.
    ///
    /// Text kinds accept any payload: a missing one or `null` becomes an empty text and other
    /// JSON values are kept as their JSON text.
    pub fn from_tagged(kind: &str, payload: Option<Value>) -> Self {
        let text = || match payload {
            Some(Value::String(s)) => s,
            None | Some(Value::Null) => String::new(),
            Some(other) => other.to_string(),
        };

        match kind {
            UPDATE_NAME => Action::UpdateName(text()),
            UPDATE_CATEGORY => Action::UpdateCategory(text()),
            UPDATE_AUTHOR_FIRST => Action::UpdateAuthorFirst(text()),
            UPDATE_AUTHOR_LAST => Action::UpdateAuthorLast(text()),
            ADD_INGREDIENT => Action::AddIngredient(text()),
            ADD_INSTRUCTION => Action::AddInstruction(text()),
            ADD_RECIPE => Action::AddRecipe,
            RESET_INPUTS => Action::ResetInputs,
            other => Action::Unrecognized(other.to_owned()),
        }
    }

    /// Fails only for invalid JSON or a missing `kind`
    pub fn from_json(json: &str) -> Result<Self, ActionDecodeError> {
        let raw: RawAction = serde_json::from_str(json)?;
        Ok(Self::from_tagged(&raw.kind, raw.payload))
    }
}

impl Serialize for Action {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        RawActionRef {
            kind: self.kind(),
            payload: self.payload(),
        }
        .serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for Action {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let raw = RawAction::deserialize(deserializer)?;
        Ok(Self::from_tagged(&raw.kind, raw.payload))
    }
}
