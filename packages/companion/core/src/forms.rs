//! Step and field layout of the intake wizards.

use crate::error::{CompanionError, Result};
use crate::types::{FieldRecord, FieldValue, FollowUpDialog, WizardKind};
use std::collections::BTreeMap;

/// How a field is edited.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldInput {
    Text,
    /// Holds `FieldValue::Date` once a full `YYYY-MM-DD` has been entered
    Date,
    Flag,
    List,
    Attachment,
}

#[derive(Debug, Clone, PartialEq)]
pub struct FieldSpec {
    pub name: &'static str,
    pub label: &'static str,
    pub required: bool,
    pub input: FieldInput,
    pub initial: FieldValue,
}

#[derive(Debug, Clone, PartialEq)]
pub struct StepDefinition {
    pub title: &'static str,
    pub fields: Vec<FieldSpec>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct FormDefinition {
    pub kind: WizardKind,
    pub title: &'static str,
    pub submit_label: &'static str,
    pub steps: Vec<StepDefinition>,
    pub follow_up: Option<FollowUpDialog>,
}

fn field(
    name: &'static str,
    label: &'static str,
    required: bool,
    input: FieldInput,
    initial: FieldValue,
) -> FieldSpec {
    FieldSpec {
        name,
        label,
        required,
        input,
        initial,
    }
}

fn text(name: &'static str, label: &'static str, required: bool) -> FieldSpec {
    field(name, label, required, FieldInput::Text, FieldValue::text(""))
}

fn date(name: &'static str, label: &'static str, required: bool) -> FieldSpec {
    field(name, label, required, FieldInput::Date, FieldValue::Empty)
}

impl FormDefinition {
    pub fn for_kind(kind: WizardKind) -> Self {
        match kind {
            WizardKind::AddMedication => Self::add_medication(),
            WizardKind::ScheduleAppointment => Self::schedule_appointment(),
        }
    }

    pub fn add_medication() -> Self {
        Self {
            kind: WizardKind::AddMedication,
            title: "Add New Medication",
            submit_label: "Add Medication",
            steps: vec![
                StepDefinition {
                    title: "Basic Information",
                    fields: vec![
                        text("name", "Medication Name", true),
                        text("dosage", "Dosage", true),
                        text("frequency", "Frequency", true),
                        field(
                            "photo",
                            "Upload Image (Optional)",
                            false,
                            FieldInput::Attachment,
                            FieldValue::Empty,
                        ),
                    ],
                },
                StepDefinition {
                    title: "Schedule",
                    fields: vec![
                        field(
                            "timeSlots",
                            "Time Slots",
                            true,
                            FieldInput::List,
                            FieldValue::List(vec![String::new()]),
                        ),
                        date("startDate", "Start Date", true),
                        date("endDate", "End Date", false),
                        text("instructions", "Special Instructions", false),
                    ],
                },
                StepDefinition {
                    title: "Additional Information",
                    fields: vec![
                        text("prescribedBy", "Prescribed By", false),
                        text("reason", "Reason for Taking", false),
                        text("refillInfo", "Refill Information", false),
                        text("sideEffects", "Known Side Effects", false),
                    ],
                },
            ],
            follow_up: None,
        }
    }

    pub fn schedule_appointment() -> Self {
        Self {
            kind: WizardKind::ScheduleAppointment,
            title: "Schedule Appointment",
            submit_label: "Schedule",
            steps: vec![
                StepDefinition {
                    title: "Appointment Type",
                    fields: vec![
                        text("appointmentType", "Appointment Type", true),
                        field(
                            "isVirtual",
                            "Virtual Visit",
                            false,
                            FieldInput::Flag,
                            FieldValue::Flag(false),
                        ),
                        text("reason", "Reason for Visit", false),
                    ],
                },
                StepDefinition {
                    title: "Select Provider",
                    fields: vec![
                        text("provider", "Provider", true),
                        text("specialty", "Specialty", false),
                    ],
                },
                StepDefinition {
                    title: "Schedule & Details",
                    fields: vec![
                        date("date", "Preferred Date", true),
                        text("time", "Preferred Time", true),
                        text("symptoms", "Symptoms", false),
                        text("notes", "Additional Notes", false),
                        field(
                            "documents",
                            "Documents",
                            false,
                            FieldInput::List,
                            FieldValue::List(Vec::new()),
                        ),
                    ],
                },
            ],
            follow_up: Some(FollowUpDialog::CalendarSync),
        }
    }

    pub fn field_spec(&self, name: &str) -> Option<&FieldSpec> {
        self.steps
            .iter()
            .flat_map(|step| step.fields.iter())
            .find(|spec| spec.name == name)
    }

    pub fn step_count(&self) -> usize {
        self.steps.len()
    }

    /// 1-based lookup.
    pub fn step(&self, number: usize) -> Option<&StepDefinition> {
        number.checked_sub(1).and_then(|index| self.steps.get(index))
    }

    pub fn initial_fields(&self) -> FieldRecord {
        self.steps
            .iter()
            .flat_map(|step| step.fields.iter())
            .map(|spec| (spec.name.to_string(), spec.initial.clone()))
            .collect()
    }

    /// Field-level errors for blank required fields of step `number`.
    pub fn validate_step(&self, number: usize, fields: &FieldRecord) -> BTreeMap<String, String> {
        let Some(step) = self.step(number) else {
            return BTreeMap::new();
        };

        step.fields
            .iter()
            .filter(|spec| spec.required)
            .filter(|spec| fields.get(spec.name).map_or(true, FieldValue::is_blank))
            .map(|spec| (spec.name.to_string(), format!("{} is required", spec.label)))
            .collect()
    }

    pub fn check_step(&self, number: usize, fields: &FieldRecord) -> Result<()> {
        match self.validate_step(number, fields).into_iter().next() {
            Some((field, message)) => Err(CompanionError::Validation { field, message }),
            None => Ok(()),
        }
    }
}
