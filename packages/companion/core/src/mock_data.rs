//! Static datasets standing in for the health record backends.

use crate::types::{MetricReading, MetricsSnapshot, Route, Trend};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SuggestionContext {
    Morning,
    Medication,
    Appointment,
    Emergency,
}

pub const GREETING: &str =
    "Welcome back! I notice it's time for your morning check-in. Would you like to log your vitals?";

pub const DEFAULT_REPLY: &str = "I understand you're asking about {input}. How can I help you with that?";

/// Ordered keyword table. Earlier entries win.
pub const REPLY_TABLE: &[(&str, &str)] = &[
    (
        "blood pressure",
        "Your blood pressure is 120/80 mmHg, which has been trending stable. Would you like to log a new reading?",
    ),
    (
        "heart rate",
        "Your heart rate is 72 bpm and has been improving. Would you like to see your heart rate trends?",
    ),
    (
        "blood sugar",
        "Your blood sugar is 95 mg/dL. I notice it's slightly elevated. Would you like to review your diet log?",
    ),
    (
        "vitals",
        "Here are your current vitals. Everything looks stable except for a slight elevation in blood sugar. Should we log new readings?",
    ),
    (
        "track",
        "I can help you track your health metrics. What would you like to record?",
    ),
    (
        "medication",
        "Your next medication (Metformin 500mg) is due at 2:00 PM. Would you like me to set a reminder?",
    ),
];

pub const METRIC_TRIGGERS: &[&str] = &["vitals", "health", "pressure"];

pub fn suggestions(context: SuggestionContext) -> Vec<String> {
    let chips: &[&str] = match context {
        SuggestionContext::Morning => &["Track morning vitals", "Log breakfast", "Take medications"],
        SuggestionContext::Medication => &["View schedule", "Mark as taken", "Check interactions"],
        SuggestionContext::Appointment => &["View details", "Reschedule", "Add to calendar"],
        SuggestionContext::Emergency => &["Call emergency", "View vital history", "Contact family"],
    };
    chips.iter().map(|chip| chip.to_string()).collect()
}

pub fn health_metrics() -> MetricsSnapshot {
    [
        ("bloodPressure", "120/80", Trend::Stable),
        ("heartRate", "72", Trend::Improving),
        ("bloodSugar", "95", Trend::Warning),
    ]
    .into_iter()
    .map(|(name, value, trend)| {
        (
            name.to_string(),
            MetricReading {
                value: value.to_string(),
                trend,
            },
        )
    })
    .collect()
}

/// Screen a suggestion chip points at, if any.
pub fn route_for_suggestion(chip: &str) -> Option<Route> {
    match chip {
        "Track morning vitals" | "View vital history" => Some(Route::Vitals),
        "Take medications" | "View schedule" | "Mark as taken" | "Check interactions" => {
            Some(Route::Medications)
        }
        "View details" | "Reschedule" | "Add to calendar" => Some(Route::Appointments),
        "Call emergency" | "Contact family" => Some(Route::Emergency),
        _ => None,
    }
}

pub const FREQUENCY_OPTIONS: &[&str] = &[
    "Once daily",
    "Twice daily",
    "Three times daily",
    "Every 12 hours",
    "Every 8 hours",
    "As needed",
    "Custom",
];

/// (id, label)
pub const APPOINTMENT_TYPES: &[(&str, &str)] = &[
    ("checkup", "Regular Check-up"),
    ("followup", "Follow-up Visit"),
    ("virtual", "Virtual Consultation"),
    ("specialist", "Specialist Consultation"),
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Provider {
    pub id: u32,
    pub name: &'static str,
    pub specialty: &'static str,
    pub availability: &'static str,
}

pub const PROVIDERS: &[Provider] = &[
    Provider {
        id: 1,
        name: "Dr. Sarah Johnson",
        specialty: "Endocrinologist",
        availability: "Mon, Wed, Fri",
    },
    Provider {
        id: 2,
        name: "Dr. Michael Chen",
        specialty: "Cardiologist",
        availability: "Tue, Thu",
    },
    Provider {
        id: 3,
        name: "Dr. Emily Wilson",
        specialty: "Primary Care",
        availability: "Mon-Fri",
    },
];

/// (value, label)
pub const APPOINTMENT_TIMES: &[(&str, &str)] = &[
    ("09:00", "9:00 AM"),
    ("10:00", "10:00 AM"),
    ("11:00", "11:00 AM"),
    ("14:00", "2:00 PM"),
    ("15:00", "3:00 PM"),
    ("16:00", "4:00 PM"),
];
