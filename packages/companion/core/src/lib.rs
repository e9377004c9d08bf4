pub mod actions;
pub mod calendar;
pub mod capture;
pub mod config;
pub mod driver;
pub mod effects;
pub mod error;
pub mod forms;
pub mod mock_data;
pub mod reducer;
pub mod reply;
pub mod scheduler;
pub mod state;
pub mod types;

#[cfg(test)]
mod tests;

pub use actions::{Action, CalendarAction, WizardAction};
pub use calendar::{CalendarService, CalendarSyncState, SyncStatus};
pub use capture::{CaptureEvent, CaptureSink, ScriptedCapture, SpeechCapture, UnavailableCapture};
pub use config::{CompanionConfig, SessionSettings, WizardPolicy};
pub use driver::{SessionDriver, SessionEvent};
pub use effects::{CalendarEffect, Effect, WizardEffect};
pub use error::{CompanionError, Result};
pub use reducer::{reduce, reduce_calendar, reduce_wizard};
pub use reply::ReplyPolicy;
pub use scheduler::{ManualScheduler, Scheduler, TokioScheduler};
pub use state::{ConversationState, WizardState};
