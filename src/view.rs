// src/view.rs
//
// Pure derivations over a store snapshot. Recomputed per render.

use crate::models::{Appointment, Doctor, Patient};
use crate::store::Snapshot;

pub const UNKNOWN: &str = "Unknown";
pub const DEFAULT_ICON: &str = "🩺";

/// Checked top to bottom; the first substring hit wins.
pub const SPECIALTY_ICONS: &[(&str, &str)] = &[
    ("cardio", "❤️"),
    ("dent", "🦷"),
    ("neuro", "🧠"),
    ("ortho", "🦴"),
    ("derma", "✨"),
    ("pediatr", "👶"),
    ("ent", "👂"),
    ("general", "🩺"),
];

pub fn specialty_icon(specialty: &str) -> &'static str {
    let specialty = specialty.to_lowercase();
    SPECIALTY_ICONS
        .iter()
        .find(|(pattern, _)| specialty.contains(pattern))
        .map(|(_, icon)| *icon)
        .unwrap_or(DEFAULT_ICON)
}

pub fn appointments_for_patient(
    appointments: &[Appointment],
    patient_id: i64,
) -> Vec<&Appointment> {
    appointments.iter().filter(|a| a.patient_id == patient_id).collect()
}

pub fn appointments_for_doctor(appointments: &[Appointment], doctor_id: i64) -> Vec<&Appointment> {
    appointments.iter().filter(|a| a.doctor_id == doctor_id).collect()
}

fn distinct<'a>(names: impl Iterator<Item = &'a str>) -> Vec<String> {
    let mut out: Vec<String> = Vec::new();
    for name in names {
        if !out.iter().any(|n| n == name) {
            out.push(name.to_string());
        }
    }
    out
}

/// Doctor names in order of first appearance. Appointments without a joined doctor are skipped.
pub fn distinct_doctor_names(appointments: &[&Appointment]) -> Vec<String> {
    distinct(appointments.iter().filter_map(|a| a.doctor.as_ref()).map(|d| d.name.as_str()))
}

pub fn distinct_patient_names(appointments: &[&Appointment]) -> Vec<String> {
    distinct(appointments.iter().filter_map(|a| a.patient.as_ref()).map(|p| p.name.as_str()))
}

/// "1 appointment", "3 appointments".
pub fn appointment_count_label(count: usize) -> String {
    if count == 1 {
        "1 appointment".to_string()
    } else {
        format!("{count} appointments")
    }
}

pub fn patient_option_label(patient: &Patient) -> String {
    format!("{} (Age: {})", patient.name, patient.age)
}

pub fn doctor_option_label(doctor: &Doctor) -> String {
    format!("Dr. {} - {}", doctor.name, doctor.specialty)
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PatientSummary {
    pub id: i64,
    pub name: String,
    pub age: i64,
    pub phone: String,
    pub appointment_count: usize,
    pub doctor_names: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DoctorSummary {
    pub id: i64,
    pub name: String,
    pub specialty: String,
    pub icon: &'static str,
    pub appointment_count: usize,
    pub patient_names: Vec<String>,
}

pub fn patient_summaries(snapshot: &Snapshot) -> Vec<PatientSummary> {
    snapshot
        .patients
        .iter()
        .map(|p| {
            let appts = appointments_for_patient(&snapshot.appointments, p.id);
            PatientSummary {
                id: p.id,
                name: p.name.clone(),
                age: p.age,
                phone: p.phone.clone(),
                appointment_count: appts.len(),
                doctor_names: distinct_doctor_names(&appts),
            }
        })
        .collect()
}

pub fn doctor_summaries(snapshot: &Snapshot) -> Vec<DoctorSummary> {
    snapshot
        .doctors
        .iter()
        .map(|d| {
            let appts = appointments_for_doctor(&snapshot.appointments, d.id);
            DoctorSummary {
                id: d.id,
                name: d.name.clone(),
                specialty: d.specialty.clone(),
                icon: specialty_icon(&d.specialty),
                appointment_count: appts.len(),
                patient_names: distinct_patient_names(&appts),
            }
        })
        .collect()
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppointmentRow {
    pub id: i64,
    pub patient: String,
    pub doctor: String,
    pub date: String,
    pub time: String,
    pub reason: String,
    /// Row is loaded into the form.
    pub editing: bool,
}

pub fn appointment_rows(
    appointments: &[Appointment],
    editing_id: Option<i64>,
) -> Vec<AppointmentRow> {
    appointments
        .iter()
        .map(|a| AppointmentRow {
            id: a.id,
            patient: a
                .patient
                .as_ref()
                .map_or_else(|| UNKNOWN.to_string(), |p| p.name.clone()),
            doctor: a
                .doctor
                .as_ref()
                .map_or_else(|| UNKNOWN.to_string(), |d| d.name.clone()),
            date: a.date.clone(),
            time: a.time.clone(),
            reason: a.reason.clone(),
            editing: editing_id == Some(a.id),
        })
        .collect()
}
