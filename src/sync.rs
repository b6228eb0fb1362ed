// src/sync.rs

use std::sync::Arc;

use crate::error::ClientError;
use crate::form::{FormController, FormMode};
use crate::models::Appointment;
use crate::store::DataStore;

pub const DELETE_PROMPT: &str = "Are you sure you want to delete this appointment?";

/// Blocking, user-facing error message.
pub trait Notifier: Send + Sync {
    fn alert(&self, message: &str);
}

/// Interactive yes/no step in front of destructive actions.
pub trait Confirmer {
    fn confirm(&self, prompt: &str) -> bool;
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmitOutcome {
    Created(Appointment),
    Updated(Appointment),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeleteOutcome {
    Deleted,
    Cancelled,
}

/// Issues mutations and re-fetches afterwards. Never patches the store itself.
pub struct SyncOrchestrator {
    store: Arc<DataStore>,
    notifier: Arc<dyn Notifier>,
}

impl SyncOrchestrator {
    pub fn new(store: Arc<DataStore>, notifier: Arc<dyn Notifier>) -> Self {
        Self { store, notifier }
    }

    pub async fn submit(&self, form: &mut FormController) -> Result<SubmitOutcome, ClientError> {
        let mode = form.mode();
        let (verb, doing) = match mode {
            FormMode::Creating => ("add", "adding"),
            FormMode::Editing(_) => ("update", "updating"),
        };

        let payload = match form.draft().to_payload() {
            Ok(p) => p,
            Err(e) => {
                tracing::warn!("Rejected appointment form: {e}");
                self.notifier
                    .alert(&format!("Failed to {verb} appointment! Error: {e}"));
                return Err(e);
            }
        };

        let api = self.store.api();
        let result = match mode {
            FormMode::Editing(id) => api
                .update_appointment(id, &payload)
                .await
                .map(SubmitOutcome::Updated),
            FormMode::Creating => api
                .create_appointment(&payload)
                .await
                .map(SubmitOutcome::Created),
        };

        match result {
            Ok(outcome) => {
                tracing::info!(?mode, "appointment saved");
                self.store.refresh_after_mutation().await;
                match mode {
                    FormMode::Editing(_) => form.cancel_edit(),
                    FormMode::Creating => form.reset_draft(),
                }
                Ok(outcome)
            }
            Err(e) => {
                tracing::error!("Error {doing} appointment: {e}");
                self.notifier
                    .alert(&format!("Failed to {verb} appointment! Error: {e}"));
                Err(e)
            }
        }
    }

    /// Deleting the record currently in the form leaves the form alone.
    pub async fn delete(
        &self,
        id: i64,
        confirmer: &dyn Confirmer,
    ) -> Result<DeleteOutcome, ClientError> {
        if !confirmer.confirm(DELETE_PROMPT) {
            tracing::debug!(id, "delete declined");
            return Ok(DeleteOutcome::Cancelled);
        }

        match self.store.api().delete_appointment(id).await {
            Ok(()) => {
                tracing::info!(id, "appointment deleted");
                self.store.refresh_after_mutation().await;
                Ok(DeleteOutcome::Deleted)
            }
            Err(e) => {
                tracing::error!("Error deleting appointment: {e}");
                Err(e)
            }
        }
    }
}


#[cfg(test)]
mod tests {
    use super::testing::{Answer, RecordingNotifier};
    use super::*;
    use crate::client::fake::{Call, FakeClinicApi, Op};
    use crate::form::{Draft, DraftField};
    use crate::models::AppointmentPayload;

    struct Harness {
        api: Arc<FakeClinicApi>,
        store: Arc<DataStore>,
        notifier: Arc<RecordingNotifier>,
        sync: SyncOrchestrator,
    }

    fn harness() -> Harness {
        let api = Arc::new(FakeClinicApi::seeded());
        let store = Arc::new(DataStore::new(api.clone()));
        let notifier = Arc::new(RecordingNotifier::default());
        let sync = SyncOrchestrator::new(store.clone(), notifier.clone());
        Harness {
            api,
            store,
            notifier,
            sync,
        }
    }

    fn fill(form: &mut FormController) {
        form.set_field(DraftField::PatientId, "3");
        form.set_field(DraftField::DoctorId, "5");
        form.set_field(DraftField::Date, "2024-01-10");
        form.set_field(DraftField::Time, "09:00");
        form.set_field(DraftField::Reason, "checkup");
    }

    fn existing(h: &Harness) -> i64 {
        h.api.insert(AppointmentPayload {
            patient_id: 4,
            doctor_id: 6,
            date: "2024-01-16".into(),
            time: "11:30 AM".into(),
            reason: "Root Canal".into(),
        })
    }

    #[tokio::test]
    async fn test_create_posts_integer_ids_and_refetches() {
        let h = harness();
        h.store.refresh_all().await;
        h.api.clear_calls();
        let mut form = FormController::new();
        fill(&mut form);

        let outcome = h.sync.submit(&mut form).await.unwrap();

        assert!(matches!(outcome, SubmitOutcome::Created(_)));
        assert_eq!(
            h.api.calls()[0],
            Call::Create(AppointmentPayload {
                patient_id: 3,
                doctor_id: 5,
                date: "2024-01-10".into(),
                time: "09:00".into(),
                reason: "checkup".into(),
            })
        );
        assert_eq!(h.api.count(&Call::ListAppointments), 1);
        assert_eq!(h.api.count(&Call::Stats), 1);
        assert_eq!(h.store.appointments().len(), 1);
        assert_eq!(h.store.stats().total_appointments, 1);
        assert!(form.draft().is_empty());
        assert_eq!(form.mode(), FormMode::Creating);
        assert!(h.notifier.alerts().is_empty());
    }

    #[tokio::test]
    async fn test_update_targets_editing_id() {
        let h = harness();
        let id = existing(&h);
        h.api.insert(AppointmentPayload {
            patient_id: 3,
            doctor_id: 5,
            date: "2024-01-17".into(),
            time: "09:00 AM".into(),
            reason: "Regular Checkup".into(),
        });
        h.store.refresh_all().await;
        h.api.clear_calls();

        let mut form = FormController::new();
        let appt = h.store.appointments()[0].clone();
        form.begin_edit(&appt);
        form.set_field(DraftField::Reason, "first");
        form.set_field(DraftField::Time, "12:00 PM");
        form.set_field(DraftField::Reason, "Root Canal follow-up");

        let outcome = h.sync.submit(&mut form).await.unwrap();

        assert!(matches!(outcome, SubmitOutcome::Updated(ref a) if a.id == id));
        let updates: Vec<Call> = h
            .api
            .calls()
            .into_iter()
            .filter(|c| matches!(c, Call::Update(..)))
            .collect();
        assert_eq!(updates.len(), 1);
        assert!(matches!(
            &updates[0],
            Call::Update(target, p) if *target == id && p.reason == "Root Canal follow-up"
        ));
        assert_eq!(form.mode(), FormMode::Creating);
        assert!(form.draft().is_empty());
        assert_eq!(h.store.appointments()[0].time, "12:00 PM");
    }

    #[tokio::test]
    async fn test_failed_create_leaves_state_untouched() {
        let h = harness();
        h.store.refresh_all().await;
        let before = h.store.appointments();
        h.api.fail(Op::Create);
        h.api.clear_calls();

        let mut form = FormController::new();
        fill(&mut form);
        let draft_before = form.draft().clone();

        assert!(h.sync.submit(&mut form).await.is_err());

        assert_eq!(form.draft(), &draft_before);
        assert!(Arc::ptr_eq(&before, &h.store.appointments()));
        assert_eq!(h.api.calls().len(), 1);
        let alerts = h.notifier.alerts();
        assert_eq!(alerts.len(), 1);
        assert!(alerts[0].starts_with("Failed to add appointment! Error:"));
    }

    #[tokio::test]
    async fn test_failed_update_keeps_edit_mode() {
        let h = harness();
        let id = existing(&h);
        h.store.refresh_all().await;
        h.api.fail(Op::Update);

        let mut form = FormController::new();
        form.begin_edit(&h.store.appointments()[0]);

        assert!(h.sync.submit(&mut form).await.is_err());

        assert_eq!(form.mode(), FormMode::Editing(id));
        assert_eq!(form.draft().reason, "Root Canal");
        assert!(h.notifier.alerts()[0].starts_with("Failed to update appointment! Error:"));
    }

    #[tokio::test]
    async fn test_bad_id_fails_without_request() {
        let h = harness();
        let mut form = FormController::new();
        fill(&mut form);
        form.set_field(DraftField::DoctorId, "five");

        let err = h.sync.submit(&mut form).await.unwrap_err();

        assert!(err.is_local());
        assert!(h.api.calls().is_empty());
        assert_eq!(form.draft().doctor_id, "five");
        assert_eq!(h.notifier.alerts().len(), 1);
    }

    #[tokio::test]
    async fn test_delete_requires_confirmation() {
        let h = harness();
        let id = existing(&h);

        let outcome = h.sync.delete(id, &Answer(false)).await.unwrap();

        assert_eq!(outcome, DeleteOutcome::Cancelled);
        assert!(h.api.calls().is_empty());
    }

    #[tokio::test]
    async fn test_confirmed_delete_refetches_once() {
        let h = harness();
        let id = existing(&h);
        h.store.refresh_all().await;
        h.api.clear_calls();

        let outcome = h.sync.delete(id, &Answer(true)).await.unwrap();

        assert_eq!(outcome, DeleteOutcome::Deleted);
        assert_eq!(h.api.count(&Call::Delete(id)), 1);
        assert_eq!(h.api.count(&Call::ListAppointments), 1);
        assert_eq!(h.api.count(&Call::Stats), 1);
        assert_eq!(h.api.calls().len(), 3);
        assert!(h.store.appointments().is_empty());
    }

    #[tokio::test]
    async fn test_failed_delete_logs_only() {
        let h = harness();
        let id = existing(&h);
        h.store.refresh_all().await;
        h.api.fail(Op::Delete);
        h.api.clear_calls();

        assert!(h.sync.delete(id, &Answer(true)).await.is_err());

        assert_eq!(h.api.calls(), vec![Call::Delete(id)]);
        assert_eq!(h.store.appointments().len(), 1);
        assert!(h.notifier.alerts().is_empty());
    }

    #[tokio::test]
    async fn test_deleting_edited_record_keeps_edit_target() {
        let h = harness();
        let id = existing(&h);
        h.store.refresh_all().await;
        let mut form = FormController::new();
        form.begin_edit(&h.store.appointments()[0]);

        h.sync.delete(id, &Answer(true)).await.unwrap();

        assert!(form.is_editing(id));
        assert_eq!(form.draft(), &Draft::from_appointment(&Appointment {
            id,
            patient_id: 4,
            doctor_id: 6,
            date: "2024-01-16".into(),
            time: "11:30 AM".into(),
            reason: "Root Canal".into(),
            patient: None,
            doctor: None,
        }));
    }
}
