use serde::{Deserialize, Serialize};
use sqlx::FromRow;

#[derive(Clone)]
pub struct AppState {
    pub db: sqlx::SqlitePool,
}

/* -------------------------
   Entities
--------------------------*/

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct Patient {
    pub id: i64,
    pub name: String,
    pub age: i64,
    pub phone: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct Doctor {
    pub id: i64,
    pub name: String,
    /// Free text, e.g. "Cardiologist" or "ENT Specialist".
    pub specialty: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Appointment {
    pub id: i64,
    pub patient_id: i64,
    pub doctor_id: i64,
    pub date: String,
    pub time: String,
    pub reason: String,
    /// Joined by the server; may be missing or null.
    #[serde(default)]
    pub patient: Option<Patient>,
    #[serde(default)]
    pub doctor: Option<Doctor>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct Stats {
    pub total_appointments: i64,
    pub total_patients: i64,
    pub total_doctors: i64,
    pub today_appointments: i64,
}

/* -------------------------
   API DTOs
--------------------------*/

/// Body of `POST /appointments` and `PUT /appointments/{id}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AppointmentPayload {
    pub patient_id: i64,
    pub doctor_id: i64,
    pub date: String,
    pub time: String,
    pub reason: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct MessageResponse {
    pub message: String,
}
