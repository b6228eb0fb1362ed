// src/form.rs

use std::fmt;
use std::str::FromStr;

use crate::error::ClientError;
use crate::models::{Appointment, AppointmentPayload};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DraftField {
    PatientId,
    DoctorId,
    Date,
    Time,
    Reason,
}

impl DraftField {
    pub const ALL: [DraftField; 5] = [
        DraftField::PatientId,
        DraftField::DoctorId,
        DraftField::Date,
        DraftField::Time,
        DraftField::Reason,
    ];

    /// Field name as it appears on the wire and in the form.
    pub fn name(self) -> &'static str {
        match self {
            DraftField::PatientId => "patient_id",
            DraftField::DoctorId => "doctor_id",
            DraftField::Date => "date",
            DraftField::Time => "time",
            DraftField::Reason => "reason",
        }
    }
}

impl fmt::Display for DraftField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for DraftField {
    type Err = ClientError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        DraftField::ALL
            .into_iter()
            .find(|f| f.name() == s)
            .ok_or_else(|| ClientError::UnknownField(s.to_string()))
    }
}

/// Working copy of the appointment form. Everything stays a string until submit.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Draft {
    pub patient_id: String,
    pub doctor_id: String,
    pub date: String,
    pub time: String,
    pub reason: String,
}

impl Draft {
    pub fn from_appointment(appt: &Appointment) -> Self {
        Self {
            patient_id: appt.patient_id.to_string(),
            doctor_id: appt.doctor_id.to_string(),
            date: appt.date.clone(),
            time: appt.time.clone(),
            reason: appt.reason.clone(),
        }
    }

    pub fn get(&self, field: DraftField) -> &str {
        match field {
            DraftField::PatientId => &self.patient_id,
            DraftField::DoctorId => &self.doctor_id,
            DraftField::Date => &self.date,
            DraftField::Time => &self.time,
            DraftField::Reason => &self.reason,
        }
    }

    fn slot(&mut self, field: DraftField) -> &mut String {
        match field {
            DraftField::PatientId => &mut self.patient_id,
            DraftField::DoctorId => &mut self.doctor_id,
            DraftField::Date => &mut self.date,
            DraftField::Time => &mut self.time,
            DraftField::Reason => &mut self.reason,
        }
    }

    pub fn is_empty(&self) -> bool {
        *self == Draft::default()
    }

    /// Typed request body. Fails locally, before any request is made.
    pub fn to_payload(&self) -> Result<AppointmentPayload, ClientError> {
        for field in DraftField::ALL {
            if self.get(field).trim().is_empty() {
                return Err(ClientError::MissingField(field.name()));
            }
        }

        Ok(AppointmentPayload {
            patient_id: parse_id(DraftField::PatientId, &self.patient_id)?,
            doctor_id: parse_id(DraftField::DoctorId, &self.doctor_id)?,
            date: self.date.clone(),
            time: self.time.clone(),
            reason: self.reason.clone(),
        })
    }
}

fn parse_id(field: DraftField, raw: &str) -> Result<i64, ClientError> {
    raw.trim().parse::<i64>().map_err(|_| ClientError::InvalidId {
        field: field.name(),
        value: raw.to_string(),
    })
}

/// Which record, if any, the form is editing.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct EditTarget {
    pub editing_id: Option<i64>,
}

impl EditTarget {
    pub fn is_editing(&self) -> bool {
        self.editing_id.is_some()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormMode {
    Creating,
    Editing(i64),
}

#[derive(Debug, Default)]
pub struct FormController {
    draft: Draft,
    target: EditTarget,
    scroll_requested: bool,
}

impl FormController {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn draft(&self) -> &Draft {
        &self.draft
    }

    pub fn target(&self) -> EditTarget {
        self.target
    }

    pub fn mode(&self) -> FormMode {
        match self.target.editing_id {
            Some(id) => FormMode::Editing(id),
            None => FormMode::Creating,
        }
    }

    /// True when `id` is the record loaded into the form.
    pub fn is_editing(&self, id: i64) -> bool {
        self.target.editing_id == Some(id)
    }

    pub fn set_field(&mut self, field: DraftField, value: impl Into<String>) {
        *self.draft.slot(field) = value.into();
    }

    /// Same as `set_field`, addressed by the form's field name.
    pub fn set_field_by_name(
        &mut self,
        name: &str,
        value: impl Into<String>,
    ) -> Result<(), ClientError> {
        let field: DraftField = name.parse()?;
        self.set_field(field, value);
        Ok(())
    }

    pub fn begin_edit(&mut self, appt: &Appointment) {
        self.draft = Draft::from_appointment(appt);
        self.target = EditTarget {
            editing_id: Some(appt.id),
        };
        self.scroll_requested = true;
    }

    pub fn cancel_edit(&mut self) {
        self.draft = Draft::default();
        self.target = EditTarget::default();
    }

    /// Clears the draft after a successful create.
    pub fn reset_draft(&mut self) {
        self.draft = Draft::default();
    }

    /// One-shot signal raised by `begin_edit`.
    pub fn take_scroll_request(&mut self) -> bool {
        std::mem::take(&mut self.scroll_requested)
    }
}
