//! Executes conversation effects against a scheduler and a speech capability.

use crate::actions::Action;
use crate::capture::{CaptureSink, SpeechCapture};
use crate::effects::Effect;
use crate::error::{CompanionError, Result};
use crate::reducer::reduce;
use crate::scheduler::{ActionSender, Scheduler};
use crate::state::ConversationState;
use crate::types::{MessageId, Notice, Route};
use std::collections::VecDeque;
use tokio::sync::mpsc::{self, UnboundedReceiver};

/// Outward notifications for the screen hosting the session.
#[derive(Debug, Clone, PartialEq)]
pub enum SessionEvent {
    MessageAppended(MessageId),
    MessageUpdated(MessageId),
    Notice(Notice),
    Navigate(Route),
}

pub struct SessionDriver<S, C> {
    state: ConversationState,
    scheduler: S,
    capture: C,
    sender: ActionSender,
    receiver: UnboundedReceiver<Action>,
    events: VecDeque<SessionEvent>,
    start_error: Option<CompanionError>,
}

impl<S: Scheduler, C: SpeechCapture> SessionDriver<S, C> {
    pub fn new(
        state: ConversationState,
        capture: C,
        make_scheduler: impl FnOnce(ActionSender) -> S,
    ) -> Self {
        let (sender, receiver) = mpsc::unbounded_channel();
        let scheduler = make_scheduler(sender.clone());
        Self {
            state,
            scheduler,
            capture,
            sender,
            receiver,
            events: VecDeque::new(),
            start_error: None,
        }
    }

    pub fn state(&self) -> &ConversationState {
        &self.state
    }

    pub fn scheduler_mut(&mut self) -> &mut S {
        &mut self.scheduler
    }

    pub fn capture(&self) -> &C {
        &self.capture
    }

    pub fn dispatch(&mut self, action: Action) {
        tracing::debug!(?action, "dispatch");
        let (new_state, effects) = reduce(&self.state, &action);
        self.state = new_state;
        for effect in effects {
            self.execute(effect);
        }
    }

    fn execute(&mut self, effect: Effect) {
        match effect {
            Effect::Schedule {
                ticket,
                delay,
                action,
            } => self.scheduler.schedule(ticket, delay, action),
            Effect::CancelScheduled { ticket } => self.scheduler.cancel(ticket),
            Effect::StartCapture => {
                let sink = CaptureSink::new(self.sender.clone());
                if let Err(err) = self.capture.start(sink) {
                    tracing::warn!(error = %err, "speech capture refused to start");
                    let _ = self.sender.send(Action::CaptureFailed {
                        reason: err.to_string(),
                    });
                    self.start_error = Some(err);
                }
            }
            Effect::StopCapture => self.capture.stop(),
            Effect::ShowNotice { notice } => self.events.push_back(SessionEvent::Notice(notice)),
            Effect::RequestNavigation { route } => {
                self.events.push_back(SessionEvent::Navigate(route))
            }
            Effect::MessageAppended { id } => {
                self.events.push_back(SessionEvent::MessageAppended(id))
            }
            Effect::MessageUpdated { id } => {
                self.events.push_back(SessionEvent::MessageUpdated(id))
            }
        }
    }

    pub fn initialize(&mut self) {
        self.dispatch(Action::Initialize);
    }

    pub fn update_draft(&mut self, text: impl Into<String>) {
        self.dispatch(Action::UpdateDraft { text: text.into() });
    }

    pub fn submit_text(&mut self, text: impl Into<String>) {
        self.dispatch(Action::SubmitText { text: text.into() });
    }

    pub fn submit_draft(&mut self) {
        self.dispatch(Action::SubmitDraft);
    }

    pub fn select_suggestion(&mut self, text: impl Into<String>) {
        self.dispatch(Action::SelectSuggestion { text: text.into() });
    }

    pub fn cancel_reply(&mut self) {
        self.dispatch(Action::CancelReply);
    }

    /// Checks the capability first; reports `CapabilityUnavailable` after
    /// raising the notice. A capability that fails to start is reported as
    /// the error it returned, and its `CaptureFailed` is already queued.
    pub fn begin_voice_capture(&mut self) -> Result<()> {
        let capability_available = self.capture.is_available();
        self.start_error = None;
        self.dispatch(Action::BeginVoiceCapture {
            capability_available,
        });
        if !capability_available {
            return Err(CompanionError::CapabilityUnavailable);
        }
        match self.start_error.take() {
            Some(err) => Err(err),
            None => Ok(()),
        }
    }

    pub fn stop_voice_capture(&mut self) {
        self.dispatch(Action::StopVoiceCapture);
    }

    /// Dispatches every delivery already waiting. Returns how many ran.
    pub fn pump(&mut self) -> usize {
        let mut handled = 0;
        while let Ok(action) = self.receiver.try_recv() {
            self.dispatch(action);
            handled += 1;
        }
        handled
    }

    /// Waits for the next delivery and dispatches it.
    pub async fn next_delivery(&mut self) {
        if let Some(action) = self.receiver.recv().await {
            self.dispatch(action);
        }
    }

    pub fn drain_events(&mut self) -> Vec<SessionEvent> {
        self.events.drain(..).collect()
    }
}
