// src/render.rs

use std::fmt::Write;

use crate::form::{FormController, FormMode};
use crate::store::Snapshot;
use crate::view;

/// Whole page as plain text.
///
/// With `focus_form` set the form section moves to the top, right under the
/// title, so an edit that was just started is the first thing on screen.
pub fn page(snapshot: &Snapshot, form: &FormController, focus_form: bool) -> String {
    let mut out = String::new();
    // writing into a String cannot fail
    let _ = write_page(&mut out, snapshot, form, focus_form);
    out
}

fn write_page(
    out: &mut String,
    snap: &Snapshot,
    form: &FormController,
    focus_form: bool,
) -> std::fmt::Result {
    writeln!(out, "🏥 Clinic Appointment System")?;
    writeln!(out)?;
    if focus_form {
        write_form(out, snap, form)?;
        writeln!(out)?;
        write_stats(out, snap)?;
    } else {
        write_stats(out, snap)?;
        writeln!(out)?;
        write_form(out, snap, form)?;
    }
    writeln!(out)?;
    write_patients(out, snap)?;
    writeln!(out)?;
    write_doctors(out, snap)?;
    writeln!(out)?;
    write_table(out, snap, form)
}

fn write_stats(out: &mut String, snap: &Snapshot) -> std::fmt::Result {
    let s = &snap.stats;
    writeln!(out, "📅 {:>5}  Total Appointments", s.total_appointments)?;
    writeln!(out, "🧑‍⚕️ {:>5}  Total Patients", s.total_patients)?;
    writeln!(out, "👨‍⚕️ {:>5}  Total Doctors", s.total_doctors)?;
    writeln!(out, "⏰ {:>5}  Today's Appointments", s.today_appointments)
}

fn write_form(out: &mut String, snap: &Snapshot, form: &FormController) -> std::fmt::Result {
    match form.mode() {
        FormMode::Creating => writeln!(out, "➕ Book New Appointment")?,
        FormMode::Editing(id) => writeln!(out, "✏️ Edit Appointment #{id}")?,
    }

    let draft = form.draft();
    let patient = snap
        .patients
        .iter()
        .find(|p| p.id.to_string() == draft.patient_id)
        .map(view::patient_option_label)
        .unwrap_or_else(|| "Select Patient".to_string());
    let doctor = snap
        .doctors
        .iter()
        .find(|d| d.id.to_string() == draft.doctor_id)
        .map(view::doctor_option_label)
        .unwrap_or_else(|| "Select Doctor".to_string());

    writeln!(out, "  Patient: {patient}")?;
    writeln!(out, "  Doctor:  {doctor}")?;
    writeln!(out, "  Date:    {}", draft.date)?;
    writeln!(out, "  Time:    {}", draft.time)?;
    writeln!(out, "  Reason:  {}", draft.reason)
}

fn write_patients(out: &mut String, snap: &Snapshot) -> std::fmt::Result {
    writeln!(out, "👥 Patients List")?;
    let summaries = view::patient_summaries(snap);
    if summaries.is_empty() {
        return writeln!(out, "  No patients registered yet.");
    }
    for p in summaries {
        writeln!(out, "  {} ({} years)", p.name, p.age)?;
        writeln!(out, "    📞 {}", p.phone)?;
        write!(out, "    📅 {}", view::appointment_count_label(p.appointment_count))?;
        if p.appointment_count > 0 {
            write!(out, " - Assigned to: {}", p.doctor_names.join(", "))?;
        }
        writeln!(out)?;
    }
    Ok(())
}

fn write_doctors(out: &mut String, snap: &Snapshot) -> std::fmt::Result {
    writeln!(out, "👨‍⚕️ Doctors & Specialties")?;
    let summaries = view::doctor_summaries(snap);
    if summaries.is_empty() {
        return writeln!(out, "  No doctors registered yet.");
    }
    for d in summaries {
        writeln!(out, "  Dr. {}", d.name)?;
        writeln!(out, "    {} {}", d.icon, d.specialty)?;
        writeln!(out, "    📊 {}", view::appointment_count_label(d.appointment_count))?;
        if d.appointment_count > 0 {
            writeln!(out, "    Patients: {}", d.patient_names.join(", "))?;
        }
    }
    Ok(())
}

fn write_table(out: &mut String, snap: &Snapshot, form: &FormController) -> std::fmt::Result {
    writeln!(out, "📋 All Appointments ({})", snap.appointments.len())?;
    let rows = view::appointment_rows(&snap.appointments, form.target().editing_id);
    if rows.is_empty() {
        return writeln!(out, "  No appointments found. Book your first appointment!");
    }

    writeln!(
        out,
        "  {:<4} {:<18} {:<12} {:<11} {:<9} Reason",
        "ID", "Patient", "Doctor", "Date", "Time"
    )?;
    for r in rows {
        let marker = if r.editing { "*" } else { " " };
        writeln!(
            out,
            "{marker} {:<4} {:<18} {:<12} {:<11} {:<9} {}",
            r.id, r.patient, r.doctor, r.date, r.time, r.reason
        )?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::models::{Appointment, Doctor, Patient, Stats};

    fn snapshot() -> Snapshot {
        let ali = Patient {
            id: 1,
            name: "Ali Khan".into(),
            age: 30,
            phone: "0300-1234567".into(),
        };
        let smith = Doctor {
            id: 1,
            name: "Smith".into(),
            specialty: "Cardiologist".into(),
        };
        Snapshot {
            appointments: Arc::new(vec![Appointment {
                id: 1,
                patient_id: 1,
                doctor_id: 1,
                date: "2024-01-15".into(),
                time: "10:00 AM".into(),
                reason: "Chest Pain".into(),
                patient: Some(ali.clone()),
                doctor: None,
            }]),
            patients: Arc::new(vec![ali]),
            doctors: Arc::new(vec![smith]),
            stats: Stats {
                total_appointments: 1,
                total_patients: 1,
                total_doctors: 1,
                today_appointments: 0,
            },
        }
    }

    #[test]
    fn test_empty_page_shows_placeholders() {
        let text = page(&Snapshot::default(), &FormController::new(), false);
        assert!(text.contains("Book New Appointment"));
        assert!(text.contains("No patients registered yet."));
        assert!(text.contains("No doctors registered yet."));
        assert!(text.contains("No appointments found. Book your first appointment!"));
        assert!(text.contains("All Appointments (0)"));
    }

    #[test]
    fn test_page_renders_summaries_and_rows() {
        let snap = snapshot();
        let mut form = FormController::new();
        form.begin_edit(&snap.appointments[0]);
        let text = page(&snap, &form, false);

        assert!(text.contains("Edit Appointment #1"));
        assert!(text.contains("Patient: Ali Khan (Age: 30)"));
        assert!(text.contains("Doctor:  Dr. Smith - Cardiologist"));
        assert!(text.contains("1 appointment - Assigned to: "));
        assert!(text.contains("❤️ Cardiologist"));
        assert!(text.contains("Unknown"));
        assert!(text.contains("* 1"));
    }

    #[test]
    fn test_focused_page_puts_form_above_stats() {
        let snap = snapshot();
        let mut form = FormController::new();
        form.begin_edit(&snap.appointments[0]);

        let focused = page(&snap, &form, true);
        let form_at = focused.find("Edit Appointment #1").unwrap();
        let stats_at = focused.find("Total Appointments").unwrap();
        assert!(form_at < stats_at);

        let plain = page(&snap, &form, false);
        let stats_at = plain.find("Total Appointments").unwrap();
        assert!(stats_at < plain.find("Edit Appointment #1").unwrap());
    }
}
