use std::sync::Arc;

use tracing::{debug, trace};

use crate::{Action, ApplicationState};

/// Computes the state following `action`. `state` itself is never modified.
///
/// Unrecognized actions return the very same `Arc`, so consumers comparing snapshots with
/// [`Arc::ptr_eq`] see no change.
pub fn reduce(state: &Arc<ApplicationState>, action: Action) -> Arc<ApplicationState> {
    trace!(kind = action.kind(), "Reduce action");
    let next = match action {
        Action::UpdateName(name) => ApplicationState {
            name,
            ..ApplicationState::clone(state)
        },
        Action::UpdateCategory(category) => ApplicationState {
            category,
            ..ApplicationState::clone(state)
        },
        Action::UpdateAuthorFirst(author_first) => ApplicationState {
            author_first,
            ..ApplicationState::clone(state)
        },
        Action::UpdateAuthorLast(author_last) => ApplicationState {
            author_last,
            ..ApplicationState::clone(state)
        },
        Action::AddIngredient(ingredient) => ApplicationState {
            ingredients: appended(&state.ingredients, ingredient),
            ..ApplicationState::clone(state)
        },
        Action::AddInstruction(instruction) => ApplicationState {
            instructions: appended(&state.instructions, instruction),
            ..ApplicationState::clone(state)
        },
        Action::AddRecipe => ApplicationState {
            recipes: appended(&state.recipes, state.draft()),
            ..ApplicationState::clone(state)
        },
        // Restores the seeded recipes too, so recipes added since startup are lost
        Action::ResetInputs => {
            debug!(recipes = state.recipes.len(), "Reset to initial state");
            return ApplicationState::initial();
        }
        Action::Unrecognized(kind) => {
            debug!("Ignore unrecognized action '{kind}'");
            return state.clone();
        }
    };
    Arc::new(next)
}

fn appended<T: Clone>(items: &[T], item: T) -> Vec<T> {
    let mut result = Vec::with_capacity(items.len() + 1);
    result.extend_from_slice(items);
    result.push(item);
    result
}
