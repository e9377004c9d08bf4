//! Calendar hand-off shown after an appointment is scheduled.

use crate::error::{CompanionError, Result};
use crate::mock_data::APPOINTMENT_TYPES;
use crate::types::{FieldRecord, FieldValue};
use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// How long a simulated calendar sync takes.
pub const SYNC_DELAY: Duration = Duration::from_millis(1500);

pub const ICS_FILE_NAME: &str = "appointment.ics";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CalendarService {
    Google,
    Apple,
    Outlook,
    Ics,
}

impl CalendarService {
    pub const ALL: [CalendarService; 4] = [
        CalendarService::Google,
        CalendarService::Apple,
        CalendarService::Outlook,
        CalendarService::Ics,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            CalendarService::Google => "Google Calendar",
            CalendarService::Apple => "Apple Calendar",
            CalendarService::Outlook => "Outlook Calendar",
            CalendarService::Ics => "Download ICS File",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SyncStatus {
    #[default]
    Idle,
    Syncing,
    Success,
}

/// The parts of an appointment record a calendar entry needs.
#[derive(Debug, Clone, PartialEq)]
pub struct AppointmentSummary {
    pub appointment_type: String,
    pub provider: String,
    pub date: Option<NaiveDate>,
    pub time: Option<NaiveTime>,
    pub notes: String,
    pub is_virtual: bool,
}

impl AppointmentSummary {
    pub fn from_fields(fields: &FieldRecord) -> Self {
        let text = |name: &str| {
            fields
                .get(name)
                .and_then(FieldValue::as_text)
                .map(|value| value.trim().to_string())
                .unwrap_or_default()
        };
        let appointment_type = text("appointmentType");

        Self {
            is_virtual: fields
                .get("isVirtual")
                .and_then(FieldValue::as_flag)
                .unwrap_or(false)
                || appointment_type == "virtual",
            appointment_type,
            provider: text("provider"),
            date: fields.get("date").and_then(FieldValue::as_date),
            time: NaiveTime::parse_from_str(&text("time"), "%H:%M").ok(),
            notes: text("notes"),
        }
    }

    /// Display label of the appointment type, or the raw id.
    pub fn type_label(&self) -> &str {
        APPOINTMENT_TYPES
            .iter()
            .find(|(id, _)| *id == self.appointment_type)
            .map_or(self.appointment_type.as_str(), |(_, label)| *label)
    }

    pub fn starts_at(&self) -> Option<NaiveDateTime> {
        Some(self.date?.and_time(self.time?))
    }

    pub fn when(&self) -> String {
        match (self.date, self.time) {
            (Some(date), Some(time)) => {
                format!("{} at {}", date.format("%b %-d, %Y"), time.format("%-I:%M %p"))
            }
            (Some(date), None) => date.format("%b %-d, %Y").to_string(),
            _ => "Date to be confirmed".to_string(),
        }
    }

    /// One-hour VEVENT in floating local time.
    pub fn to_ics(&self) -> Result<String> {
        let Some(starts_at) = self.starts_at() else {
            let (field, label) = if self.date.is_none() {
                ("date", "Preferred Date")
            } else {
                ("time", "Preferred Time")
            };
            return Err(CompanionError::Validation {
                field: field.to_string(),
                message: format!("{label} is required"),
            });
        };

        let description = if self.notes.is_empty() {
            "Medical appointment"
        } else {
            self.notes.as_str()
        };
        let location = if self.is_virtual { "Virtual" } else { "Clinic" };

        let lines = [
            "BEGIN:VCALENDAR".to_string(),
            "VERSION:2.0".to_string(),
            "PRODID:-//Companion//Appointments//EN".to_string(),
            "BEGIN:VEVENT".to_string(),
            format!("SUMMARY:{} with {}", self.type_label(), self.provider),
            format!("DTSTART:{}", starts_at.format("%Y%m%dT%H%M%S")),
            "DURATION:PT1H".to_string(),
            format!("DESCRIPTION:{}", escape_text(description)),
            format!("LOCATION:{location}"),
            "END:VEVENT".to_string(),
            "END:VCALENDAR".to_string(),
        ];
        Ok(lines.join("\r\n") + "\r\n")
    }
}

fn escape_text(value: &str) -> String {
    value
        .replace('\\', "\\\\")
        .replace(';', "\\;")
        .replace(',', "\\,")
        .replace('\n', "\\n")
}

#[derive(Debug, Clone, PartialEq)]
pub struct CalendarSyncState {
    pub appointment: AppointmentSummary,
    pub selected: Option<CalendarService>,
    pub status: SyncStatus,
    pub email_invite: bool,
    /// Sync whose completion is still outstanding
    pub pending_sync: Option<u64>,
    pub(crate) next_sync: u64,
}

impl CalendarSyncState {
    pub fn new(fields: &FieldRecord) -> Self {
        Self {
            appointment: AppointmentSummary::from_fields(fields),
            selected: None,
            status: SyncStatus::Idle,
            email_invite: false,
            pending_sync: None,
            next_sync: 0,
        }
    }

    pub(crate) fn allocate_sync(&mut self) -> u64 {
        self.next_sync += 1;
        self.pending_sync = Some(self.next_sync);
        self.next_sync
    }

    pub fn is_synced(&self, service: CalendarService) -> bool {
        self.selected == Some(service) && self.status == SyncStatus::Success
    }

    pub fn status_text(&self) -> Option<&'static str> {
        match self.status {
            SyncStatus::Idle => None,
            SyncStatus::Syncing => Some("Syncing with calendar..."),
            SyncStatus::Success => Some("Successfully added to calendar"),
        }
    }
}
