use companion_core::calendar::CalendarService;
use companion_core::forms::FieldInput;
use companion_core::mock_data::{APPOINTMENT_TIMES, APPOINTMENT_TYPES, FREQUENCY_OPTIONS, PROVIDERS};
use companion_core::types::{FieldRecord, FieldValue, Notice, NoticeKind, Route, WizardKind};
use companion_core::{
    reduce_calendar, reduce_wizard, CalendarAction, CalendarEffect, CalendarSyncState,
    CompanionConfig, ConversationState, ReplyPolicy, SessionDriver, SessionEvent, SpeechCapture,
    TokioScheduler, WizardAction, WizardEffect, WizardState,
};
use chrono::NaiveDate;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use std::collections::BTreeMap;
use std::path::PathBuf;
use tokio::sync::mpsc::{self, UnboundedReceiver, UnboundedSender};

pub type Driver = SessionDriver<TokioScheduler, Box<dyn SpeechCapture>>;

/// Screen-level state wrapped around the core session and wizards.
pub struct App {
    pub driver: Driver,
    pub route: Route,
    pub medication: WizardState,
    pub appointment: WizardState,
    pub active_wizard: Option<WizardKind>,
    pub selected_field: usize,
    pub selected_chip: usize,
    pub notice: Option<Notice>,
    pub follow_up: Option<CalendarSyncState>,
    pub submissions: Vec<(WizardKind, FieldRecord)>,
    /// Where calendar files are saved
    pub export_dir: PathBuf,
    pub exported: Option<PathBuf>,
    /// Partially typed dates, keyed by wizard and field
    date_drafts: BTreeMap<(WizardKind, &'static str), String>,
    calendar_sender: UnboundedSender<CalendarAction>,
    calendar_receiver: UnboundedReceiver<CalendarAction>,
    pub should_quit: bool,
}

impl App {
    pub fn new(config: &CompanionConfig, capture: Box<dyn SpeechCapture>) -> Self {
        let state = ConversationState::new(ReplyPolicy::default(), config.session_settings());
        let (calendar_sender, calendar_receiver) = mpsc::unbounded_channel();
        Self {
            driver: SessionDriver::new(state, capture, TokioScheduler::new),
            route: Route::Home,
            medication: WizardState::new(WizardKind::AddMedication, config.wizard),
            appointment: WizardState::new(WizardKind::ScheduleAppointment, config.wizard),
            active_wizard: None,
            selected_field: 0,
            selected_chip: 0,
            notice: None,
            follow_up: None,
            submissions: Vec::new(),
            export_dir: std::env::temp_dir(),
            exported: None,
            date_drafts: BTreeMap::new(),
            calendar_sender,
            calendar_receiver,
            should_quit: false,
        }
    }

    pub fn start(&mut self) {
        self.driver.initialize();
    }

    /// Runs pending deliveries and folds session events into screen state.
    pub fn sync(&mut self) {
        self.driver.pump();
        for event in self.driver.drain_events() {
            match event {
                SessionEvent::Notice(notice) => self.notice = Some(notice),
                SessionEvent::Navigate(route) => {
                    tracing::info!(path = route.path(), "navigation requested");
                    self.route = route;
                }
                SessionEvent::MessageAppended(_) => self.selected_chip = 0,
                SessionEvent::MessageUpdated(_) => {}
            }
        }

        while let Ok(action) = self.calendar_receiver.try_recv() {
            self.dispatch_calendar(action);
        }
    }

    fn wizard_state(&self, kind: WizardKind) -> &WizardState {
        match kind {
            WizardKind::AddMedication => &self.medication,
            WizardKind::ScheduleAppointment => &self.appointment,
        }
    }

    fn wizard_slot(&mut self, kind: WizardKind) -> &mut WizardState {
        match kind {
            WizardKind::AddMedication => &mut self.medication,
            WizardKind::ScheduleAppointment => &mut self.appointment,
        }
    }

    /// Text shown for `name` in the open wizard, including half-typed dates.
    pub fn field_display(&self, kind: WizardKind, name: &'static str) -> String {
        if let Some(draft) = self.date_drafts.get(&(kind, name)) {
            return draft.clone();
        }
        let value = self
            .wizard_state(kind)
            .field(name)
            .map(field_text)
            .unwrap_or_default();
        option_label(name, &value)
    }

    pub fn dispatch_wizard(&mut self, kind: WizardKind, action: WizardAction) {
        let (new_state, effects) = reduce_wizard(self.wizard_state(kind), &action);
        *self.wizard_slot(kind) = new_state;

        for effect in effects {
            match effect {
                WizardEffect::StepChanged { step } => {
                    tracing::debug!(?kind, step, "wizard step");
                    self.active_wizard = Some(kind);
                    self.selected_field = 0;
                }
                WizardEffect::Submitted { kind, fields } => {
                    tracing::info!(?kind, fields = fields.len(), "form submitted");
                    self.submissions.push((kind, fields));
                }
                WizardEffect::OpenFollowUp { dialog, fields } => {
                    tracing::info!(?dialog, "opening follow-up");
                    self.exported = None;
                    self.follow_up = Some(CalendarSyncState::new(&fields));
                }
                WizardEffect::Closed => {
                    self.active_wizard = None;
                    let state = self.wizard_state(kind);
                    let was_reset = state.fields == state.definition.initial_fields();
                    if was_reset {
                        self.date_drafts.retain(|(owner, _), _| *owner != kind);
                    }
                }
            }
        }
    }

    pub fn dispatch_calendar(&mut self, action: CalendarAction) {
        let Some(state) = &self.follow_up else {
            tracing::debug!(?action, "calendar dialog closed, dropping action");
            return;
        };
        let (new_state, effects) = reduce_calendar(state, &action);
        self.follow_up = Some(new_state);

        for effect in effects {
            match effect {
                CalendarEffect::ScheduleSyncCompletion { sync, delay } => {
                    let sender = self.calendar_sender.clone();
                    tokio::spawn(async move {
                        tokio::time::sleep(delay).await;
                        let _ = sender.send(CalendarAction::SyncCompleted { sync });
                    });
                }
                CalendarEffect::ExportIcs {
                    file_name,
                    contents,
                } => {
                    let path = self.export_dir.join(file_name);
                    match std::fs::write(&path, contents) {
                        Ok(()) => {
                            tracing::info!(path = %path.display(), "calendar file saved");
                            self.exported = Some(path);
                        }
                        Err(err) => {
                            tracing::warn!(%err, path = %path.display(), "calendar file not saved");
                            self.notice = Some(Notice {
                                kind: NoticeKind::ExportFailed,
                                message: format!("Could not save {}: {}", path.display(), err),
                            });
                        }
                    }
                }
                CalendarEffect::ShowNotice { notice } => self.notice = Some(notice),
            }
        }
    }

    pub fn handle_key(&mut self, key: KeyEvent) {
        if key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) {
            self.should_quit = true;
            return;
        }

        if self.follow_up.is_some() {
            self.handle_follow_up_key(key);
            return;
        }

        match self.active_wizard {
            Some(kind) => self.handle_wizard_key(kind, key),
            None => self.handle_chat_key(key),
        }
    }

    fn handle_follow_up_key(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Esc | KeyCode::Enter => {
                self.follow_up = None;
                self.exported = None;
            }
            KeyCode::Char(c @ '1'..='4') => {
                let index = c as usize - '1' as usize;
                let service = CalendarService::ALL[index];
                self.dispatch_calendar(CalendarAction::SelectService { service });
            }
            KeyCode::Char('e') | KeyCode::Char(' ') => {
                self.dispatch_calendar(CalendarAction::ToggleEmailInvite)
            }
            _ => {}
        }
    }

    fn handle_chat_key(&mut self, key: KeyEvent) {
        // Other pages have no composer; only navigation keys apply there
        if self.route != Route::Home
            && !matches!(key.code, KeyCode::Esc | KeyCode::F(2) | KeyCode::F(3))
        {
            tracing::debug!(path = self.route.path(), code = ?key.code, "key ignored off chat");
            return;
        }

        match key.code {
            KeyCode::Esc => {
                if self.notice.take().is_none() {
                    if self.route != Route::Home {
                        self.route = Route::Home;
                    } else if self.driver.state().assistant_busy {
                        self.driver.cancel_reply();
                    }
                }
            }
            KeyCode::Enter => self.driver.submit_draft(),
            KeyCode::Backspace => {
                let mut draft = self.driver.state().draft.clone();
                draft.pop();
                self.driver.update_draft(draft);
            }
            KeyCode::Tab => {
                let chips = self.driver.state().current_suggestions().len();
                if chips > 0 {
                    self.selected_chip = (self.selected_chip + 1) % chips;
                }
            }
            KeyCode::F(1) => {
                if self.driver.state().listening {
                    self.driver.stop_voice_capture();
                } else if let Err(err) = self.driver.begin_voice_capture() {
                    tracing::debug!(%err, "voice capture did not start");
                }
            }
            KeyCode::F(2) => self.dispatch_wizard(WizardKind::AddMedication, WizardAction::Open),
            KeyCode::F(3) => {
                self.dispatch_wizard(WizardKind::ScheduleAppointment, WizardAction::Open)
            }
            KeyCode::F(4) => {
                if let Some(chip) = self
                    .driver
                    .state()
                    .current_suggestions()
                    .get(self.selected_chip)
                    .cloned()
                {
                    self.driver.select_suggestion(chip);
                }
            }
            KeyCode::Char(c) => {
                let mut draft = self.driver.state().draft.clone();
                draft.push(c);
                self.driver.update_draft(draft);
            }
            _ => {}
        }
    }

    fn handle_wizard_key(&mut self, kind: WizardKind, key: KeyEvent) {
        let state = self.wizard_state(kind);
        let fields: Vec<(&'static str, FieldInput)> = state
            .definition
            .step(state.current_step)
            .map(|step| step.fields.iter().map(|f| (f.name, f.input)).collect())
            .unwrap_or_default();
        let Some(&(name, input)) = fields.get(self.selected_field) else {
            return;
        };
        let current = state.field(name).cloned().unwrap_or(FieldValue::Empty);
        let last_step = state.is_last_step();

        match key.code {
            KeyCode::Esc => self.dispatch_wizard(kind, WizardAction::Close),
            KeyCode::Enter if last_step => self.dispatch_wizard(kind, WizardAction::Submit),
            KeyCode::Enter => self.dispatch_wizard(kind, WizardAction::GoNext),
            KeyCode::PageUp => self.dispatch_wizard(kind, WizardAction::GoBack),
            KeyCode::Up => self.selected_field = self.selected_field.saturating_sub(1),
            KeyCode::Down => self.selected_field = (self.selected_field + 1).min(fields.len() - 1),
            KeyCode::Backspace if input == FieldInput::Date => self.edit_date(kind, name, None),
            KeyCode::Char(c) if input == FieldInput::Date => self.edit_date(kind, name, Some(c)),
            KeyCode::Tab => {
                if let Some(value) = next_option(name, &current) {
                    self.update_field(kind, name, value);
                }
            }
            KeyCode::Backspace => {
                if let Some(value) = edit_text(&current, None) {
                    self.update_field(kind, name, value);
                }
            }
            KeyCode::Char(' ') if input == FieldInput::Flag => {
                if let FieldValue::Flag(flag) = current {
                    self.update_field(kind, name, FieldValue::Flag(!flag));
                }
            }
            KeyCode::Char(c) => {
                if let Some(value) = edit_text(&current, Some(c)) {
                    self.update_field(kind, name, value);
                }
            }
            _ => {}
        }
    }

    /// Edits the typed text of a date field; the field holds a date only
    /// once the text is a complete `YYYY-MM-DD`.
    fn edit_date(&mut self, kind: WizardKind, name: &'static str, c: Option<char>) {
        let mut draft = match self.date_drafts.get(&(kind, name)) {
            Some(draft) => draft.clone(),
            None => self
                .wizard_state(kind)
                .field(name)
                .and_then(FieldValue::as_date)
                .map(|date| date.format("%Y-%m-%d").to_string())
                .unwrap_or_default(),
        };
        match c {
            Some(c) if c.is_ascii_digit() || c == '-' => draft.push(c),
            Some(_) => return,
            None => {
                draft.pop();
            }
        }

        let value = NaiveDate::parse_from_str(&draft, "%Y-%m-%d")
            .map_or(FieldValue::Empty, FieldValue::Date);
        self.date_drafts.insert((kind, name), draft);
        if self.wizard_state(kind).field(name) != Some(&value) {
            self.update_field(kind, name, value);
        }
    }

    fn update_field(&mut self, kind: WizardKind, name: &str, value: FieldValue) {
        self.dispatch_wizard(
            kind,
            WizardAction::UpdateField {
                name: name.to_string(),
                value,
            },
        );
    }
}

/// Text shown for a field inside the wizard dialog.
pub fn field_text(value: &FieldValue) -> String {
    match value {
        FieldValue::Empty => String::new(),
        FieldValue::Flag(true) => "[x]".to_string(),
        FieldValue::Flag(false) => "[ ]".to_string(),
        FieldValue::Date(date) => date.format("%Y-%m-%d").to_string(),
        FieldValue::Text(text) => text.clone(),
        FieldValue::List(items) => items.join(", "),
    }
}

/// Appends `c` (or deletes the last character) in a text-like field.
fn edit_text(value: &FieldValue, c: Option<char>) -> Option<FieldValue> {
    let mut text = match value {
        FieldValue::Text(_) | FieldValue::List(_) => field_text(value),
        _ => return None,
    };
    match c {
        Some(c) => text.push(c),
        None => {
            text.pop();
        }
    }

    Some(match value {
        FieldValue::List(_) => {
            FieldValue::List(text.split(',').map(|item| item.trim().to_string()).collect())
        }
        _ => FieldValue::Text(text),
    })
}

fn options(name: &str) -> Vec<&'static str> {
    match name {
        "frequency" => FREQUENCY_OPTIONS.to_vec(),
        "appointmentType" => APPOINTMENT_TYPES.iter().map(|(id, _)| *id).collect(),
        "provider" => PROVIDERS.iter().map(|p| p.name).collect(),
        "time" => APPOINTMENT_TIMES.iter().map(|(value, _)| *value).collect(),
        _ => Vec::new(),
    }
}

/// Cycles a choice field through its mock option list.
fn next_option(name: &str, current: &FieldValue) -> Option<FieldValue> {
    let choices = options(name);
    if choices.is_empty() {
        return None;
    }
    let position = current
        .as_text()
        .and_then(|text| choices.iter().position(|choice| *choice == text));
    let next = position.map_or(0, |index| (index + 1) % choices.len());
    Some(FieldValue::text(choices[next]))
}

/// Label for a choice value, falling back to the raw value.
pub fn option_label(name: &str, value: &str) -> String {
    let labelled = match name {
        "appointmentType" => APPOINTMENT_TYPES
            .iter()
            .find(|(id, _)| *id == value)
            .map(|(_, label)| *label),
        "time" => APPOINTMENT_TIMES
            .iter()
            .find(|(v, _)| *v == value)
            .map(|(_, label)| *label),
        "provider" => PROVIDERS
            .iter()
            .find(|p| p.name == value)
            .map(|p| p.specialty),
        _ => None,
    };
    match labelled {
        Some(label) if name == "provider" => format!("{value} ({label})"),
        Some(label) => label.to_string(),
        None => value.to_string(),
    }
}
