use super::{apply_actions, scheduled};
use crate::config::SessionSettings;
use crate::reply::ReplyPolicy;
use crate::types::*;
use crate::{reduce, Action, ConversationState, Effect};
use pretty_assertions::assert_eq;
use std::time::Duration;

fn overlapping_state() -> ConversationState {
    ConversationState::new(
        ReplyPolicy::default(),
        SessionSettings {
            reject_while_busy: false,
            ..SessionSettings::default()
        },
    )
}

#[test]
fn test_submit_text_appends_trimmed_user_message() {
    let state = ConversationState::default();
    let action = Action::SubmitText {
        text: "  hello there  ".to_string(),
    };

    let (new_state, effects) = reduce(&state, &action);

    assert_eq!(new_state.messages.len(), 1);
    assert_eq!(new_state.messages[0].author, Author::User);
    assert_eq!(new_state.messages[0].text, "hello there");
    assert!(new_state.assistant_busy);

    assert_eq!(effects.len(), 2);
    assert_eq!(effects[0], Effect::MessageAppended { id: 1 });
    match &effects[1] {
        Effect::Schedule { delay, action, .. } => {
            assert_eq!(*delay, Duration::from_millis(1000));
            match action {
                Action::ReplyDue { input, .. } => assert_eq!(input, "hello there"),
                other => panic!("Expected ReplyDue, got {:?}", other),
            }
        }
        other => panic!("Expected Schedule effect, got {:?}", other),
    }
}

#[test]
fn test_blank_submission_is_ignored() {
    let state = ConversationState::default();

    for text in ["", "   ", "\n\t"] {
        let (new_state, effects) = reduce(&state, &Action::SubmitText { text: text.to_string() });
        assert_eq!(new_state, state);
        assert!(effects.is_empty());
    }
}

#[test]
fn test_submit_draft_clears_buffer() {
    let state = ConversationState::default();

    let (new_state, _) = apply_actions(
        &state,
        vec![
            Action::UpdateDraft {
                text: "log my breakfast".to_string(),
            },
            Action::SubmitDraft,
        ],
    );

    assert_eq!(new_state.draft, "");
    assert_eq!(new_state.messages.len(), 1);
    assert_eq!(new_state.messages[0].text, "log my breakfast");
}

#[test]
fn test_reply_follows_user_message() {
    let state = ConversationState::default();
    let (state, effects) = reduce(&state, &Action::SubmitText { text: "hi".to_string() });

    let (state, _) = apply_actions(&state, scheduled(&effects));

    assert_eq!(state.messages.len(), 2);
    assert_eq!(state.messages[0].author, Author::User);
    assert_eq!(state.messages[1].author, Author::Assistant);
    assert!(!state.assistant_busy);
    assert!(state.pending.is_empty());
}

#[test]
fn test_greeting_only_after_delay() {
    let state = ConversationState::default();
    let (state, effects) = reduce(&state, &Action::Initialize);

    // Nothing shown until the delivery arrives
    assert!(state.messages.is_empty());
    assert!(state.assistant_busy);
    match &effects[..] {
        [Effect::Schedule { delay, .. }] => assert_eq!(*delay, Duration::from_millis(1000)),
        other => panic!("Expected a single Schedule effect, got {:?}", other),
    }

    let (state, _) = apply_actions(&state, scheduled(&effects));

    assert_eq!(state.messages.len(), 1);
    let greeting = &state.messages[0];
    assert_eq!(greeting.author, Author::Assistant);
    assert_eq!(greeting.text, crate::mock_data::GREETING);
    assert_eq!(
        greeting.suggestions.as_deref(),
        Some(
            &[
                "Track morning vitals".to_string(),
                "Log breakfast".to_string(),
                "Take medications".to_string(),
            ][..]
        )
    );
    assert!(greeting.metrics_snapshot.is_some());
    assert!(!state.assistant_busy);
}

#[test]
fn test_initialize_twice_greets_once() {
    let state = ConversationState::default();
    let (state, first) = reduce(&state, &Action::Initialize);
    let (state, second) = reduce(&state, &Action::Initialize);

    assert_eq!(scheduled(&first).len(), 1);
    assert!(second.is_empty());

    let (state, _) = apply_actions(&state, scheduled(&first));
    assert_eq!(state.count_by(Author::Assistant), 1);
}

#[test]
fn test_input_rejected_while_busy() {
    let state = ConversationState::default();
    let (state, _) = reduce(&state, &Action::SubmitText { text: "first".to_string() });

    let (new_state, effects) = apply_actions(
        &state,
        vec![
            Action::UpdateDraft {
                text: "second".to_string(),
            },
            Action::SubmitDraft,
        ],
    );

    assert_eq!(new_state.messages.len(), 1);
    assert_eq!(new_state.draft, "second");
    assert!(scheduled(&effects).is_empty());
    match &effects[..] {
        [Effect::ShowNotice { notice }] => assert_eq!(notice.kind, NoticeKind::InputBlocked),
        other => panic!("Expected an input-blocked notice, got {:?}", other),
    }
    assert!(!new_state.accepts_input());
}

#[test]
fn test_overlapping_replies_when_allowed() {
    let state = overlapping_state();
    let (state, first) = reduce(&state, &Action::SubmitText { text: "one".to_string() });
    let (state, second) = reduce(&state, &Action::SubmitText { text: "two".to_string() });

    assert_eq!(state.pending.len(), 2);

    // Deliver in reverse: replies land in firing order
    let mut deliveries = scheduled(&second);
    deliveries.extend(scheduled(&first));
    let (state, _) = apply_actions(&state, deliveries);

    let authors: Vec<Author> = state.messages.iter().map(|m| m.author).collect();
    assert_eq!(
        authors,
        vec![Author::User, Author::User, Author::Assistant, Author::Assistant]
    );
    assert!(state.messages[2].text.contains("two"));
    assert!(state.messages[3].text.contains("one"));
    assert!(!state.assistant_busy);
}

#[test]
fn test_cancel_reply_drops_pending_delivery() {
    let state = ConversationState::default();
    let (state, effects) = reduce(&state, &Action::SubmitText { text: "hello".to_string() });
    let ticket = state.pending.iter().next().copied().unwrap();

    let (state, cancel_effects) = reduce(&state, &Action::CancelReply);
    assert_eq!(cancel_effects, vec![Effect::CancelScheduled { ticket }]);
    assert!(!state.assistant_busy);

    // A delivery that raced the cancel is ignored
    let (state, late_effects) = apply_actions(&state, scheduled(&effects));
    assert_eq!(state.messages.len(), 1);
    assert!(late_effects.is_empty());
}

#[test]
fn test_cancel_reply_spares_pending_greeting() {
    let state = ConversationState::default();
    let (state, init_effects) = reduce(&state, &Action::Initialize);
    let greeting_ticket = state.greeting_ticket.unwrap();

    let (state, cancel_effects) = reduce(&state, &Action::CancelReply);
    assert!(cancel_effects.is_empty());
    assert!(state.pending.contains(&greeting_ticket));
    assert!(state.assistant_busy);

    let (state, _) = apply_actions(&state, scheduled(&init_effects));
    assert_eq!(state.count_by(Author::Assistant), 1);
    assert_eq!(state.messages[0].text, crate::mock_data::GREETING);
    assert_eq!(state.greeting_ticket, None);
    assert!(!state.assistant_busy);
}

#[test]
fn test_cancel_reply_leaves_greeting_while_dropping_reply() {
    let state = overlapping_state();
    let (state, init_effects) = reduce(&state, &Action::Initialize);
    let (state, _) = reduce(&state, &Action::SubmitText { text: "hello".to_string() });
    let reply_ticket = state.pending_replies().next().unwrap();

    let (state, cancel_effects) = reduce(&state, &Action::CancelReply);

    assert_eq!(
        cancel_effects,
        vec![Effect::CancelScheduled {
            ticket: reply_ticket
        }]
    );
    assert_eq!(state.pending.len(), 1);
    assert!(state.assistant_busy);

    let (state, _) = apply_actions(&state, scheduled(&init_effects));
    assert_eq!(state.count_by(Author::Assistant), 1);
    assert!(!state.assistant_busy);
}

#[test]
fn test_select_suggestion_submits_and_navigates() {
    let state = ConversationState::default();
    let (state, effects) = reduce(
        &state,
        &Action::SelectSuggestion {
            text: "Track morning vitals".to_string(),
        },
    );

    assert_eq!(state.messages.len(), 1);
    assert_eq!(state.messages[0].text, "Track morning vitals");
    assert!(effects.contains(&Effect::RequestNavigation {
        route: Route::Vitals
    }));
}

#[test]
fn test_select_suggestion_without_route() {
    let state = ConversationState::default();
    let (state, effects) = reduce(
        &state,
        &Action::SelectSuggestion {
            text: "Log breakfast".to_string(),
        },
    );

    assert_eq!(state.messages.len(), 1);
    assert!(!effects
        .iter()
        .any(|e| matches!(e, Effect::RequestNavigation { .. })));
}

#[test]
fn test_message_ids_are_unique_and_increasing() {
    let state = overlapping_state();
    let (state, effects) = apply_actions(
        &state,
        vec![
            Action::Initialize,
            Action::SubmitText { text: "a".to_string() },
            Action::SubmitText { text: "b".to_string() },
        ],
    );
    let (state, _) = apply_actions(&state, scheduled(&effects));

    let ids: Vec<MessageId> = state.messages.iter().map(|m| m.id).collect();
    assert_eq!(ids.len(), 5);
    assert!(ids.windows(2).all(|pair| pair[0] < pair[1]));
}

#[test]
fn test_current_suggestions_from_latest_reply() {
    let state = ConversationState::default();
    assert!(state.current_suggestions().is_empty());

    let (state, effects) = reduce(&state, &Action::Initialize);
    let (state, _) = apply_actions(&state, scheduled(&effects));

    assert_eq!(state.current_suggestions().len(), 3);
}

#[test]
fn test_display_time_is_hours_and_minutes() {
    let message = Message::user(1, "hi");
    let shown = message.display_time();

    assert_eq!(shown.len(), 5);
    assert_eq!(&shown[2..3], ":");
}
