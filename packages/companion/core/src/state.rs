use crate::config::{SessionSettings, WizardPolicy};
use crate::forms::FormDefinition;
use crate::reply::ReplyPolicy;
use crate::types::*;
use std::collections::{BTreeMap, BTreeSet};

/// Chat screen state: the message log plus turn-taking bookkeeping.
#[derive(Debug, Clone, PartialEq)]
pub struct ConversationState {
    /// Append-only log in creation order
    pub messages: Vec<Message>,

    /// Unsent input buffer
    pub draft: String,

    /// True while any greeting or reply delivery is outstanding
    pub assistant_busy: bool,

    /// True between starting a voice capture and its end/error
    pub listening: bool,

    /// The in-progress `VoiceCapture` message, if listening
    pub capture_message: Option<MessageId>,

    /// Scheduled deliveries that have not fired or been cancelled
    pub pending: BTreeSet<ReplyTicket>,

    /// Set once the greeting has been scheduled
    pub greeted: bool,

    /// Outstanding greeting delivery; not affected by reply cancellation
    pub greeting_ticket: Option<ReplyTicket>,

    pub policy: ReplyPolicy,
    pub settings: SessionSettings,

    next_message_id: MessageId,
    next_ticket: u64,
}

impl Default for ConversationState {
    fn default() -> Self {
        Self::new(ReplyPolicy::default(), SessionSettings::default())
    }
}

impl ConversationState {
    pub fn new(policy: ReplyPolicy, settings: SessionSettings) -> Self {
        Self {
            messages: Vec::new(),
            draft: String::new(),
            assistant_busy: false,
            listening: false,
            capture_message: None,
            pending: BTreeSet::new(),
            greeted: false,
            greeting_ticket: None,
            policy,
            settings,
            next_message_id: 1,
            next_ticket: 1,
        }
    }

    pub(crate) fn allocate_message_id(&mut self) -> MessageId {
        let id = self.next_message_id;
        self.next_message_id += 1;
        id
    }

    pub(crate) fn allocate_ticket(&mut self) -> ReplyTicket {
        let ticket = ReplyTicket(self.next_ticket);
        self.next_ticket += 1;
        self.pending.insert(ticket);
        self.assistant_busy = true;
        ticket
    }

    /// Consumes `ticket`; false if it was cancelled or already delivered.
    pub(crate) fn settle_ticket(&mut self, ticket: ReplyTicket) -> bool {
        let live = self.pending.remove(&ticket);
        self.assistant_busy = !self.pending.is_empty();
        live
    }

    pub fn message(&self, id: MessageId) -> Option<&Message> {
        self.messages.iter().find(|m| m.id == id)
    }

    pub(crate) fn message_mut(&mut self, id: MessageId) -> Option<&mut Message> {
        self.messages.iter_mut().find(|m| m.id == id)
    }

    pub fn last_message(&self) -> Option<&Message> {
        self.messages.last()
    }

    /// Suggestions offered by the most recent assistant message.
    pub fn current_suggestions(&self) -> &[String] {
        self.messages
            .iter()
            .rev()
            .find(|m| m.author == Author::Assistant)
            .and_then(|m| m.suggestions.as_deref())
            .unwrap_or(&[])
    }

    /// False while a reply is pending or a voice capture is running, unless
    /// overlapping turns are allowed.
    pub fn accepts_input(&self) -> bool {
        !(self.settings.reject_while_busy && (self.assistant_busy || self.listening))
    }

    /// Reply deliveries still outstanding, excluding the greeting.
    pub fn pending_replies(&self) -> impl Iterator<Item = ReplyTicket> + '_ {
        self.pending
            .iter()
            .copied()
            .filter(move |ticket| Some(*ticket) != self.greeting_ticket)
    }

    pub fn count_by(&self, author: Author) -> usize {
        self.messages.iter().filter(|m| m.author == author).count()
    }
}

/// State of one intake wizard dialog.
#[derive(Debug, Clone, PartialEq)]
pub struct WizardState {
    pub definition: FormDefinition,

    /// 1-based, within `1..=definition.step_count()`
    pub current_step: usize,

    pub fields: FieldRecord,

    pub open: bool,

    /// Field-level errors from the last blocked Next/Submit
    pub errors: BTreeMap<String, String>,

    pub policy: WizardPolicy,
}

impl WizardState {
    pub fn new(kind: WizardKind, policy: WizardPolicy) -> Self {
        let definition = FormDefinition::for_kind(kind);
        let fields = definition.initial_fields();
        Self {
            definition,
            current_step: 1,
            fields,
            open: false,
            errors: BTreeMap::new(),
            policy,
        }
    }

    pub fn kind(&self) -> WizardKind {
        self.definition.kind
    }

    pub fn step_count(&self) -> usize {
        self.definition.step_count()
    }

    pub fn is_last_step(&self) -> bool {
        self.current_step == self.step_count()
    }

    pub fn can_go_back(&self) -> bool {
        self.open && self.current_step > 1
    }

    pub fn can_go_next(&self) -> bool {
        self.open && self.current_step < self.step_count()
    }

    /// Label of the forward button for the current step.
    pub fn primary_label(&self) -> &'static str {
        if self.is_last_step() {
            self.definition.submit_label
        } else {
            "Next"
        }
    }

    pub fn step_title(&self) -> &'static str {
        self.definition
            .step(self.current_step)
            .map(|step| step.title)
            .unwrap_or_default()
    }

    pub fn step_markers(&self) -> Vec<StepMarker> {
        (1..=self.step_count())
            .map(|number| match number.cmp(&self.current_step) {
                std::cmp::Ordering::Less => StepMarker::Completed,
                std::cmp::Ordering::Equal => StepMarker::Current,
                std::cmp::Ordering::Greater => StepMarker::Upcoming,
            })
            .collect()
    }

    pub fn field(&self, name: &str) -> Option<&FieldValue> {
        self.fields.get(name)
    }

    pub(crate) fn reset(&mut self) {
        self.current_step = 1;
        self.fields = self.definition.initial_fields();
        self.errors.clear();
    }
}
