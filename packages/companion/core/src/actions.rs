use crate::calendar::CalendarService;
use crate::types::*;

/// Everything that can move a conversation session forward
#[derive(Debug, Clone, PartialEq)]
pub enum Action {
    // Lifecycle
    Initialize,
    GreetingDue { ticket: ReplyTicket },

    // Typed input
    UpdateDraft { text: String },
    SubmitText { text: String },
    SubmitDraft,
    SelectSuggestion { text: String },

    // Assistant turn
    ReplyDue { ticket: ReplyTicket, input: String },
    CancelReply,

    // Voice capture
    BeginVoiceCapture { capability_available: bool },
    CaptureStarted,
    CapturePartial { transcript: String },
    CaptureEnded,
    CaptureFailed { reason: String },
    StopVoiceCapture,
}

/// Everything that can move an intake wizard forward
#[derive(Debug, Clone, PartialEq)]
pub enum WizardAction {
    Open,
    Close,
    UpdateField { name: String, value: FieldValue },
    GoBack,
    GoNext,
    Submit,
}

/// Calendar hand-off actions
#[derive(Debug, Clone, PartialEq)]
pub enum CalendarAction {
    SelectService { service: CalendarService },

    /// Delivered once a simulated sync has run for its full delay
    SyncCompleted { sync: u64 },

    ToggleEmailInvite,
}
