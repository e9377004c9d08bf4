use crate::actions::Action;
use crate::types::*;
use std::time::Duration;

/// Side effects requested by a conversation transition
#[derive(Debug, Clone, PartialEq)]
pub enum Effect {
    /// Deliver `action` back to the session after `delay`
    Schedule {
        ticket: ReplyTicket,
        delay: Duration,
        action: Action,
    },

    /// Drop a scheduled delivery that has not fired yet
    CancelScheduled { ticket: ReplyTicket },

    /// Ask the speech capability to begin listening
    StartCapture,

    /// Ask the speech capability to finish listening
    StopCapture,

    ShowNotice { notice: Notice },

    RequestNavigation { route: Route },

    MessageAppended { id: MessageId },

    MessageUpdated { id: MessageId },
}

/// Side effects requested by a wizard transition
#[derive(Debug, Clone, PartialEq)]
pub enum WizardEffect {
    StepChanged { step: usize },

    /// Hand the accumulated record to whoever owns the wizard
    Submitted { kind: WizardKind, fields: FieldRecord },

    /// Offer a follow-up for the record just submitted
    OpenFollowUp {
        dialog: FollowUpDialog,
        fields: FieldRecord,
    },

    Closed,
}

/// Side effects requested by the calendar hand-off
#[derive(Debug, Clone, PartialEq)]
pub enum CalendarEffect {
    /// Deliver `CalendarAction::SyncCompleted { sync }` after `delay`
    ScheduleSyncCompletion { sync: u64, delay: Duration },

    /// Save `contents` for the user under `file_name`
    ExportIcs { file_name: String, contents: String },

    ShowNotice { notice: Notice },
}
