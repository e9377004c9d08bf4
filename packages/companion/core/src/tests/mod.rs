mod conversation_flow;
mod driver_tests;
mod reply_policy;
mod wizard_proptests;

use crate::{Action, ConversationState, Effect, reduce};

/// Applies actions in order, collecting every effect.
pub(crate) fn apply_actions(
    initial_state: &ConversationState,
    actions: Vec<Action>,
) -> (ConversationState, Vec<Effect>) {
    let mut state = initial_state.clone();
    let mut all_effects = Vec::new();

    for action in actions {
        let (new_state, effects) = reduce(&state, &action);
        state = new_state;
        all_effects.extend(effects);
    }

    (state, all_effects)
}

/// Actions the host would deliver once their delays elapse.
pub(crate) fn scheduled(effects: &[Effect]) -> Vec<Action> {
    effects
        .iter()
        .filter_map(|effect| match effect {
            Effect::Schedule { action, .. } => Some(action.clone()),
            _ => None,
        })
        .collect()
}
