use super::{apply_actions, scheduled};
use crate::mock_data::{self, SuggestionContext};
use crate::{reduce, Action, ConversationState, ReplyPolicy};
use pretty_assertions::assert_eq;

fn response_for(keyword: &str) -> &'static str {
    mock_data::REPLY_TABLE
        .iter()
        .find(|(k, _)| *k == keyword)
        .map(|(_, response)| *response)
        .unwrap()
}

#[test]
fn test_keyword_match_is_case_insensitive_substring() {
    let policy = ReplyPolicy::default();

    let reply = policy.respond("What's my Blood Pressure looking like?");

    assert_eq!(reply.text, response_for("blood pressure"));
}

#[test]
fn test_default_reply_echoes_input() {
    let policy = ReplyPolicy::default();

    let reply = policy.respond("Tell me a joke");

    assert_eq!(
        reply.text,
        "I understand you're asking about Tell me a joke. How can I help you with that?"
    );
    assert_eq!(policy.matched_response("Tell me a joke"), None);
}

#[test]
fn test_first_keyword_in_table_order_wins() {
    let policy = ReplyPolicy::default();

    // "heart rate" precedes "track" in the table
    let reply = policy.respond("track my heart rate");

    assert_eq!(reply.text, response_for("heart rate"));
}

#[test]
fn test_metrics_attach_only_for_trigger_terms() {
    let policy = ReplyPolicy::default();

    for input in ["show my vitals", "HEALTH summary", "blood pressure please"] {
        assert_eq!(
            policy.respond(input).metrics,
            Some(mock_data::health_metrics()),
            "expected metrics for {input:?}"
        );
    }

    for input in ["hello", "my heart rate", "medication schedule"] {
        assert_eq!(policy.respond(input).metrics, None, "unexpected metrics for {input:?}");
    }
}

#[test]
fn test_replies_carry_morning_suggestions() {
    let policy = ReplyPolicy::default();

    let reply = policy.respond("anything");

    assert_eq!(reply.suggestions, mock_data::suggestions(SuggestionContext::Morning));
}

#[test]
fn test_reply_through_session() {
    let state = ConversationState::default();
    let (state, effects) = reduce(
        &state,
        &Action::SubmitText {
            text: "How is my blood pressure?".to_string(),
        },
    );

    let (state, _) = apply_actions(&state, scheduled(&effects));

    let reply = state.last_message().unwrap();
    assert_eq!(reply.text, response_for("blood pressure"));
    assert!(reply.metrics_snapshot.is_some());
    assert_eq!(reply.suggestions.as_ref().map(Vec::len), Some(3));
}

#[test]
fn test_custom_table() {
    let policy = ReplyPolicy {
        table: vec![("sleep".to_string(), "You slept 7 hours.".to_string())],
        ..ReplyPolicy::default()
    };

    assert_eq!(policy.respond("How did I SLEEP?").text, "You slept 7 hours.");
    assert!(policy.respond("blood pressure").text.starts_with("I understand"));
}
