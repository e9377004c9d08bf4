use chrono::{DateTime, Local, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

pub type MessageId = u64;

/// Token identifying one scheduled delivery (greeting or reply).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct ReplyTicket(pub u64);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Author {
    User,
    Assistant,
    VoiceCapture,
}

/// Status of a `VoiceCapture` message. A successful capture is not a status:
/// the message is rewritten into a `User` message instead.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CaptureStatus {
    Listening,
    Abandoned,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Trend {
    Stable,
    Improving,
    Warning,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MetricReading {
    pub value: String,
    pub trend: Trend,
}

pub type MetricsSnapshot = BTreeMap<String, MetricReading>;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Message {
    pub id: MessageId,
    pub author: Author,
    pub text: String,
    pub created_at: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub suggestions: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub metrics_snapshot: Option<MetricsSnapshot>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub capture_status: Option<CaptureStatus>,
}

impl Message {
    pub fn user(id: MessageId, text: impl Into<String>) -> Self {
        Self {
            id,
            author: Author::User,
            text: text.into(),
            created_at: Utc::now(),
            suggestions: None,
            metrics_snapshot: None,
            capture_status: None,
        }
    }

    pub fn assistant(id: MessageId, reply: Reply) -> Self {
        Self {
            id,
            author: Author::Assistant,
            text: reply.text,
            created_at: Utc::now(),
            suggestions: Some(reply.suggestions).filter(|s| !s.is_empty()),
            metrics_snapshot: reply.metrics,
            capture_status: None,
        }
    }

    pub fn listening(id: MessageId) -> Self {
        Self {
            id,
            author: Author::VoiceCapture,
            text: String::new(),
            created_at: Utc::now(),
            suggestions: None,
            metrics_snapshot: None,
            capture_status: Some(CaptureStatus::Listening),
        }
    }

    pub fn is_listening(&self) -> bool {
        self.author == Author::VoiceCapture && self.capture_status == Some(CaptureStatus::Listening)
    }

    /// Local wall-clock time as hours:minutes.
    pub fn display_time(&self) -> String {
        self.created_at.with_timezone(&Local).format("%H:%M").to_string()
    }
}

/// Assistant output before it is placed in the log.
#[derive(Debug, Clone, PartialEq)]
pub struct Reply {
    pub text: String,
    pub suggestions: Vec<String>,
    pub metrics: Option<MetricsSnapshot>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum NoticeKind {
    CapabilityUnavailable,
    CaptureError,
    InputBlocked,
    ExportFailed,
}

/// User-visible banner raised at the UI boundary.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Notice {
    pub kind: NoticeKind,
    pub message: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Route {
    Home,
    Vitals,
    Medications,
    Appointments,
    Emergency,
}

impl Route {
    pub fn path(&self) -> &'static str {
        match self {
            Route::Home => "/",
            Route::Vitals => "/vitals",
            Route::Medications => "/medications",
            Route::Appointments => "/appointments",
            Route::Emergency => "/emergency",
        }
    }

    pub fn title(&self) -> &'static str {
        match self {
            Route::Home => "Assistant",
            Route::Vitals => "Vitals",
            Route::Medications => "Medications",
            Route::Appointments => "Appointments",
            Route::Emergency => "Emergency",
        }
    }
}

/// A single wizard field value. Tagged on the wire so a date-shaped
/// string stays text and a date stays a date.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "value", rename_all = "lowercase")]
pub enum FieldValue {
    Empty,
    Flag(bool),
    Date(NaiveDate),
    Text(String),
    List(Vec<String>),
}

impl FieldValue {
    pub fn text(value: impl Into<String>) -> Self {
        FieldValue::Text(value.into())
    }

    /// True when the value carries nothing a required field would accept.
    pub fn is_blank(&self) -> bool {
        match self {
            FieldValue::Empty => true,
            FieldValue::Flag(_) | FieldValue::Date(_) => false,
            FieldValue::Text(text) => text.trim().is_empty(),
            FieldValue::List(items) => items.iter().all(|item| item.trim().is_empty()),
        }
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            FieldValue::Text(text) => Some(text),
            _ => None,
        }
    }

    pub fn as_date(&self) -> Option<NaiveDate> {
        match self {
            FieldValue::Date(date) => Some(*date),
            _ => None,
        }
    }

    pub fn as_flag(&self) -> Option<bool> {
        match self {
            FieldValue::Flag(flag) => Some(*flag),
            _ => None,
        }
    }
}

impl From<&str> for FieldValue {
    fn from(value: &str) -> Self {
        FieldValue::Text(value.to_string())
    }
}

impl From<bool> for FieldValue {
    fn from(value: bool) -> Self {
        FieldValue::Flag(value)
    }
}

impl From<NaiveDate> for FieldValue {
    fn from(value: NaiveDate) -> Self {
        FieldValue::Date(value)
    }
}

impl From<Vec<String>> for FieldValue {
    fn from(value: Vec<String>) -> Self {
        FieldValue::List(value)
    }
}

pub type FieldRecord = BTreeMap<String, FieldValue>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum WizardKind {
    AddMedication,
    ScheduleAppointment,
}

/// Dialog a wizard opens after a successful submit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum FollowUpDialog {
    CalendarSync,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StepMarker {
    Completed,
    Current,
    Upcoming,
}
