use crate::types::*;
use crate::{
    CompanionError, ConversationState, ManualScheduler, ScriptedCapture, SessionDriver,
    SessionEvent, TokioScheduler, UnavailableCapture,
};
use crate::capture::CaptureEvent;
use pretty_assertions::assert_eq;
use std::time::Duration;

fn manual_driver<C: crate::SpeechCapture>(capture: C) -> SessionDriver<ManualScheduler, C> {
    SessionDriver::new(ConversationState::default(), capture, ManualScheduler::new)
}

#[test]
fn test_greeting_waits_for_virtual_clock() {
    let mut driver = manual_driver(UnavailableCapture);
    driver.initialize();

    driver.scheduler_mut().advance(Duration::from_millis(999));
    assert_eq!(driver.pump(), 0);
    assert!(driver.state().messages.is_empty());

    driver.scheduler_mut().advance(Duration::from_millis(1));
    assert_eq!(driver.pump(), 1);
    assert_eq!(driver.state().messages.len(), 1);
    assert_eq!(driver.drain_events(), vec![SessionEvent::MessageAppended(1)]);
}

#[test]
fn test_text_turn_round_trip() {
    let mut driver = manual_driver(UnavailableCapture);
    driver.update_draft("what is my heart rate");
    driver.submit_draft();

    assert_eq!(driver.state().messages.len(), 1);
    assert!(driver.state().assistant_busy);

    driver.scheduler_mut().advance(Duration::from_secs(1));
    driver.pump();

    let state = driver.state();
    assert_eq!(state.messages.len(), 2);
    assert!(state.messages[1].text.starts_with("Your heart rate is 72 bpm"));
    assert!(!state.assistant_busy);
}

#[test]
fn test_unavailable_capture_reports_error_and_notice() {
    let mut driver = manual_driver(UnavailableCapture);

    let result = driver.begin_voice_capture();

    assert!(matches!(result, Err(CompanionError::CapabilityUnavailable)));
    assert!(driver.state().messages.is_empty());
    match &driver.drain_events()[..] {
        [SessionEvent::Notice(notice)] => {
            assert_eq!(notice.kind, NoticeKind::CapabilityUnavailable)
        }
        other => panic!("Expected one notice, got {:?}", other),
    }
}

#[test]
fn test_scripted_voice_turn() {
    let mut driver = manual_driver(ScriptedCapture::from_transcript("check my vitals"));

    driver.begin_voice_capture().unwrap();
    assert_eq!(driver.capture().starts(), 1);
    driver.pump();

    {
        let state = driver.state();
        assert!(!state.listening);
        assert_eq!(state.messages.len(), 1);
        assert_eq!(state.messages[0].author, Author::User);
        assert_eq!(state.messages[0].text, "check my vitals");
    }

    driver.scheduler_mut().advance(Duration::from_secs(1));
    driver.pump();

    let state = driver.state();
    assert_eq!(state.messages.len(), 2);
    assert_eq!(state.messages[1].author, Author::Assistant);
    assert!(state.messages[1].metrics_snapshot.is_some());
}

#[test]
fn test_user_stop_ends_capture() {
    let mut driver = manual_driver(ScriptedCapture::until_stopped(vec![
        CaptureEvent::Started,
        CaptureEvent::Partial("remind me".to_string()),
    ]));

    driver.begin_voice_capture().unwrap();
    driver.pump();
    assert!(driver.state().listening);
    assert_eq!(driver.state().messages[0].text, "remind me");

    driver.stop_voice_capture();
    driver.pump();

    assert!(!driver.state().listening);
    assert_eq!(driver.state().messages[0].author, Author::User);
    assert_eq!(driver.scheduler_mut().pending_count(), 1);
}

#[test]
fn test_capture_failure_abandons_message() {
    let mut driver = manual_driver(ScriptedCapture::new(vec![
        CaptureEvent::Started,
        CaptureEvent::Failed("network".to_string()),
    ]));

    driver.begin_voice_capture().unwrap();
    driver.pump();

    assert!(!driver.state().listening);
    assert_eq!(
        driver.state().messages[0].capture_status,
        Some(CaptureStatus::Abandoned)
    );
    assert!(driver
        .drain_events()
        .iter()
        .any(|e| matches!(e, SessionEvent::Notice(n) if n.kind == NoticeKind::CaptureError)));
}

#[test]
fn test_suggestion_emits_navigation() {
    let mut driver = manual_driver(UnavailableCapture);

    driver.select_suggestion("Call emergency");

    assert!(driver
        .drain_events()
        .contains(&SessionEvent::Navigate(Route::Emergency)));
}

#[test]
fn test_cancel_removes_queued_delivery() {
    let mut driver = manual_driver(UnavailableCapture);
    driver.submit_text("hello");
    assert_eq!(driver.scheduler_mut().pending_count(), 1);

    driver.cancel_reply();

    assert_eq!(driver.scheduler_mut().pending_count(), 0);
    driver.scheduler_mut().advance(Duration::from_secs(5));
    assert_eq!(driver.pump(), 0);
    assert_eq!(driver.state().messages.len(), 1);
}

#[tokio::test(start_paused = true)]
async fn test_tokio_scheduler_delivers_greeting() {
    let mut driver = SessionDriver::new(
        ConversationState::default(),
        UnavailableCapture,
        TokioScheduler::new,
    );
    driver.initialize();

    driver.next_delivery().await;

    assert_eq!(driver.state().messages.len(), 1);
    assert_eq!(driver.state().messages[0].author, Author::Assistant);
}

#[tokio::test(start_paused = true)]
async fn test_tokio_scheduler_cancel() {
    let mut driver = SessionDriver::new(
        ConversationState::default(),
        UnavailableCapture,
        TokioScheduler::new,
    );
    driver.submit_text("hello");
    driver.cancel_reply();

    tokio::time::sleep(Duration::from_secs(3)).await;

    assert_eq!(driver.pump(), 0);
    assert_eq!(driver.state().messages.len(), 1);
}

#[test]
fn test_refused_start_returns_capture_error() {
    let mut driver = manual_driver(ScriptedCapture::refusing("microphone permission denied"));

    let result = driver.begin_voice_capture();

    match result {
        Err(CompanionError::Capture(reason)) => {
            assert_eq!(reason, "microphone permission denied")
        }
        other => panic!("Expected a capture error, got {:?}", other),
    }
    assert_eq!(driver.capture().starts(), 1);

    driver.pump();
    let state = driver.state();
    assert!(!state.listening);
    assert_eq!(state.messages[0].capture_status, Some(CaptureStatus::Abandoned));
    match driver.drain_events().last() {
        Some(SessionEvent::Notice(notice)) => {
            assert_eq!(notice.kind, NoticeKind::CaptureError);
            assert!(notice.message.contains("microphone permission denied"));
        }
        other => panic!("Expected a capture notice, got {:?}", other),
    }
}

#[test]
fn test_cancel_keeps_scheduled_greeting() {
    let mut driver = manual_driver(UnavailableCapture);
    driver.initialize();

    driver.cancel_reply();

    assert_eq!(driver.scheduler_mut().pending_count(), 1);
    driver.scheduler_mut().advance(Duration::from_secs(1));
    assert_eq!(driver.pump(), 1);
    assert_eq!(driver.state().messages.len(), 1);
    assert_eq!(driver.state().messages[0].author, Author::Assistant);
    assert!(!driver.state().assistant_busy);
}
