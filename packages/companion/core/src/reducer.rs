use crate::{
    actions::{Action, CalendarAction, WizardAction},
    calendar::{CalendarService, CalendarSyncState, SyncStatus, ICS_FILE_NAME, SYNC_DELAY},
    effects::{CalendarEffect, Effect, WizardEffect},
    mock_data,
    state::{ConversationState, WizardState},
    types::*,
};

/// Pure conversation transition.
/// Returns the new state and the effects the host must perform.
pub fn reduce(state: &ConversationState, action: &Action) -> (ConversationState, Vec<Effect>) {
    let mut new_state = state.clone();
    let mut effects = Vec::new();

    match action {
        Action::Initialize => {
            if !new_state.greeted {
                new_state.greeted = true;
                let ticket = new_state.allocate_ticket();
                new_state.greeting_ticket = Some(ticket);
                effects.push(Effect::Schedule {
                    ticket,
                    delay: new_state.settings.greeting_delay,
                    action: Action::GreetingDue { ticket },
                });
            }
        }

        Action::GreetingDue { ticket } => {
            if new_state.greeting_ticket == Some(*ticket) {
                new_state.greeting_ticket = None;
            }
            if new_state.settle_ticket(*ticket) {
                let reply = new_state.policy.greeting();
                append_assistant(&mut new_state, &mut effects, reply);
            } else {
                tracing::debug!(ticket = ticket.0, "dropping stale greeting");
            }
        }

        Action::UpdateDraft { text } => {
            new_state.draft = text.clone();
        }

        Action::SubmitText { text } => {
            submit(&mut new_state, &mut effects, text);
        }

        Action::SubmitDraft => {
            let text = new_state.draft.clone();
            submit(&mut new_state, &mut effects, &text);
        }

        Action::SelectSuggestion { text } => {
            if submit(&mut new_state, &mut effects, text) {
                if let Some(route) = mock_data::route_for_suggestion(text) {
                    effects.push(Effect::RequestNavigation { route });
                }
            }
        }

        Action::ReplyDue { ticket, input } => {
            if new_state.settle_ticket(*ticket) {
                let reply = new_state.policy.respond(input);
                append_assistant(&mut new_state, &mut effects, reply);
            } else {
                tracing::debug!(ticket = ticket.0, "dropping cancelled reply");
            }
        }

        Action::CancelReply => {
            let replies: Vec<ReplyTicket> = new_state.pending_replies().collect();
            for ticket in replies {
                new_state.settle_ticket(ticket);
                effects.push(Effect::CancelScheduled { ticket });
            }
        }

        Action::BeginVoiceCapture { capability_available } => {
            if !capability_available {
                effects.push(Effect::ShowNotice {
                    notice: Notice {
                        kind: NoticeKind::CapabilityUnavailable,
                        message: "Speech recognition is not supported in this environment."
                            .to_string(),
                    },
                });
            } else if new_state.listening {
                tracing::debug!("voice capture already in progress");
            } else if !new_state.accepts_input() {
                tracing::warn!("voice capture blocked while assistant is replying");
                effects.push(blocked_notice(&new_state));
            } else {
                let id = new_state.allocate_message_id();
                new_state.messages.push(Message::listening(id));
                new_state.listening = true;
                new_state.capture_message = Some(id);
                effects.push(Effect::MessageAppended { id });
                effects.push(Effect::StartCapture);
            }
        }

        Action::CaptureStarted => {
            tracing::debug!(listening = new_state.listening, "speech capture started");
        }

        Action::CapturePartial { transcript } => {
            if let Some(id) = new_state.capture_message {
                if let Some(message) = new_state.message_mut(id).filter(|m| m.is_listening()) {
                    message.text = transcript.clone();
                    effects.push(Effect::MessageUpdated { id });
                }
            }
        }

        Action::CaptureEnded => {
            new_state.listening = false;
            if let Some(id) = new_state.capture_message.take() {
                let transcript = new_state
                    .message(id)
                    .map(|m| m.text.trim().to_string())
                    .unwrap_or_default();

                if let Some(message) = new_state.message_mut(id) {
                    if transcript.is_empty() {
                        message.capture_status = Some(CaptureStatus::Abandoned);
                    } else {
                        message.author = Author::User;
                        message.text = transcript.clone();
                        message.capture_status = None;
                    }
                    effects.push(Effect::MessageUpdated { id });
                }

                if !transcript.is_empty() {
                    schedule_reply(&mut new_state, &mut effects, transcript);
                }
            }
        }

        Action::CaptureFailed { reason } => {
            tracing::warn!(%reason, "speech capture failed");
            new_state.listening = false;
            if let Some(id) = new_state.capture_message.take() {
                if let Some(message) = new_state.message_mut(id) {
                    message.capture_status = Some(CaptureStatus::Abandoned);
                    effects.push(Effect::MessageUpdated { id });
                }
            }
            effects.push(Effect::ShowNotice {
                notice: Notice {
                    kind: NoticeKind::CaptureError,
                    message: format!("Speech recognition error: {}", reason),
                },
            });
        }

        Action::StopVoiceCapture => {
            if new_state.listening {
                effects.push(Effect::StopCapture);
            }
        }
    }

    (new_state, effects)
}

/// Appends a user turn and schedules the reply. False when nothing was sent.
fn submit(state: &mut ConversationState, effects: &mut Vec<Effect>, text: &str) -> bool {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return false;
    }
    if !state.accepts_input() {
        tracing::warn!(listening = state.listening, "input blocked");
        effects.push(blocked_notice(state));
        return false;
    }

    let id = state.allocate_message_id();
    state.messages.push(Message::user(id, trimmed));
    state.draft.clear();
    effects.push(Effect::MessageAppended { id });
    schedule_reply(state, effects, trimmed.to_string());
    true
}

fn blocked_notice(state: &ConversationState) -> Effect {
    let message = if state.listening {
        "Finish the voice message before sending another."
    } else {
        "Please wait for the assistant to finish replying."
    };
    Effect::ShowNotice {
        notice: Notice {
            kind: NoticeKind::InputBlocked,
            message: message.to_string(),
        },
    }
}

fn schedule_reply(state: &mut ConversationState, effects: &mut Vec<Effect>, input: String) {
    let ticket = state.allocate_ticket();
    effects.push(Effect::Schedule {
        ticket,
        delay: state.settings.reply_delay,
        action: Action::ReplyDue { ticket, input },
    });
}

fn append_assistant(state: &mut ConversationState, effects: &mut Vec<Effect>, reply: Reply) {
    let id = state.allocate_message_id();
    state.messages.push(Message::assistant(id, reply));
    effects.push(Effect::MessageAppended { id });
}

/// Pure wizard transition.
pub fn reduce_wizard(
    state: &WizardState,
    action: &WizardAction,
) -> (WizardState, Vec<WizardEffect>) {
    let mut new_state = state.clone();
    let mut effects = Vec::new();

    match action {
        WizardAction::Open => {
            if new_state.policy.reset_on_open {
                new_state.reset();
            }
            new_state.open = true;
            effects.push(WizardEffect::StepChanged {
                step: new_state.current_step,
            });
        }

        WizardAction::Close => {
            if new_state.open {
                new_state.open = false;
                if new_state.policy.reset_on_open {
                    new_state.reset();
                }
                effects.push(WizardEffect::Closed);
            }
        }

        WizardAction::UpdateField { name, value } => {
            new_state.fields.insert(name.clone(), value.clone());
            new_state.errors.remove(name);
        }

        WizardAction::GoBack => {
            if new_state.can_go_back() {
                new_state.current_step -= 1;
                new_state.errors.clear();
                effects.push(WizardEffect::StepChanged {
                    step: new_state.current_step,
                });
            }
        }

        WizardAction::GoNext => {
            if new_state.can_go_next() && step_is_valid(&mut new_state) {
                new_state.current_step += 1;
                effects.push(WizardEffect::StepChanged {
                    step: new_state.current_step,
                });
            }
        }

        WizardAction::Submit => {
            if new_state.open && new_state.is_last_step() && step_is_valid(&mut new_state) {
                tracing::info!(kind = ?new_state.kind(), "wizard submitted");
                effects.push(WizardEffect::Submitted {
                    kind: new_state.kind(),
                    fields: new_state.fields.clone(),
                });
                if let Some(dialog) = new_state.definition.follow_up {
                    effects.push(WizardEffect::OpenFollowUp {
                        dialog,
                        fields: new_state.fields.clone(),
                    });
                }
                new_state.open = false;
                new_state.reset();
                effects.push(WizardEffect::Closed);
            }
        }
    }

    (new_state, effects)
}

/// Runs required-field checks when the policy asks for them.
fn step_is_valid(state: &mut WizardState) -> bool {
    if !state.policy.validate_required {
        return true;
    }
    state.errors = state
        .definition
        .validate_step(state.current_step, &state.fields);
    if !state.errors.is_empty() {
        tracing::debug!(step = state.current_step, errors = state.errors.len(), "step blocked");
    }
    state.errors.is_empty()
}

/// Calendar hand-off transition. Selecting a service starts a simulated sync
/// that completes after a delay; the ICS option exports immediately.
pub fn reduce_calendar(
    state: &CalendarSyncState,
    action: &CalendarAction,
) -> (CalendarSyncState, Vec<CalendarEffect>) {
    let mut new_state = state.clone();
    let mut effects = Vec::new();

    match action {
        CalendarAction::SelectService {
            service: CalendarService::Ics,
        } => match new_state.appointment.to_ics() {
            Ok(contents) => {
                new_state.selected = Some(CalendarService::Ics);
                new_state.pending_sync = None;
                new_state.status = SyncStatus::Success;
                effects.push(CalendarEffect::ExportIcs {
                    file_name: ICS_FILE_NAME.to_string(),
                    contents,
                });
            }
            Err(err) => {
                tracing::warn!(%err, "cannot export appointment");
                effects.push(CalendarEffect::ShowNotice {
                    notice: Notice {
                        kind: NoticeKind::ExportFailed,
                        message: format!("Cannot create calendar file: {}", err),
                    },
                });
            }
        },

        CalendarAction::SelectService { service } => {
            new_state.selected = Some(*service);
            new_state.status = SyncStatus::Syncing;
            let sync = new_state.allocate_sync();
            tracing::info!(service = service.name(), sync, "calendar sync started");
            effects.push(CalendarEffect::ScheduleSyncCompletion {
                sync,
                delay: SYNC_DELAY,
            });
        }

        CalendarAction::SyncCompleted { sync } => {
            if new_state.pending_sync == Some(*sync) {
                new_state.pending_sync = None;
                new_state.status = SyncStatus::Success;
            } else {
                tracing::debug!(sync, "dropping superseded calendar sync");
            }
        }

        CalendarAction::ToggleEmailInvite => {
            new_state.email_invite = !new_state.email_invite;
        }
    }

    (new_state, effects)
}
