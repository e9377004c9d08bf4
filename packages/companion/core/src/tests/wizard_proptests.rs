//! Navigation invariants over arbitrary action sequences.

use crate::config::WizardPolicy;
use crate::types::*;
use crate::{reduce_wizard, WizardAction, WizardState};
use proptest::prelude::*;
use std::collections::BTreeMap;

const FIELDS: &[&str] = &["name", "dosage", "frequency", "instructions", "reason"];

fn arb_action() -> impl Strategy<Value = WizardAction> {
    prop_oneof![
        Just(WizardAction::GoBack),
        Just(WizardAction::GoNext),
        (0..FIELDS.len(), "[a-z0-9]{1,8}").prop_map(|(index, value)| WizardAction::UpdateField {
            name: FIELDS[index].to_string(),
            value: FieldValue::Text(value),
        }),
    ]
}

proptest! {
    #[test]
    fn steps_move_by_one_within_bounds(actions in prop::collection::vec(arb_action(), 0..40)) {
        let (mut state, _) = reduce_wizard(
            &WizardState::new(WizardKind::AddMedication, WizardPolicy::default()),
            &WizardAction::Open,
        );

        for action in &actions {
            let before = state.current_step;
            let (next, _) = reduce_wizard(&state, action);
            prop_assert!(next.current_step >= 1 && next.current_step <= next.step_count());
            prop_assert!(next.current_step.abs_diff(before) <= 1);
            state = next;
        }
    }

    #[test]
    fn entered_values_survive_navigation(actions in prop::collection::vec(arb_action(), 0..40)) {
        let (mut state, _) = reduce_wizard(
            &WizardState::new(WizardKind::AddMedication, WizardPolicy::default()),
            &WizardAction::Open,
        );
        let mut expected: BTreeMap<String, FieldValue> = BTreeMap::new();

        for action in &actions {
            if let WizardAction::UpdateField { name, value } = action {
                expected.insert(name.clone(), value.clone());
            }
            let (next, _) = reduce_wizard(&state, action);
            state = next;
        }

        for (name, value) in &expected {
            prop_assert_eq!(state.field(name), Some(value));
        }
    }
}
