// src/desk.rs

use std::sync::Arc;

use crate::client::ClinicApi;
use crate::error::ClientError;
use crate::form::FormController;
use crate::models::Appointment;
use crate::render;
use crate::store::{DataStore, Snapshot};
use crate::sync::{Confirmer, DeleteOutcome, Notifier, SubmitOutcome, SyncOrchestrator};

/// All state of one desk session, owned in one place.
pub struct Desk {
    store: Arc<DataStore>,
    form: FormController,
    sync: SyncOrchestrator,
}

impl Desk {
    pub fn new(api: Arc<dyn ClinicApi>, notifier: Arc<dyn Notifier>) -> Self {
        let store = Arc::new(DataStore::new(api));
        let sync = SyncOrchestrator::new(store.clone(), notifier);
        Self {
            store,
            form: FormController::new(),
            sync,
        }
    }

    /// Initial fetch of all four slices. Failures are logged and left stale.
    pub async fn load(&self) -> Vec<ClientError> {
        let failures = self.store.refresh_all().await;
        tracing::info!(failed = failures.len(), "desk loaded");
        failures
    }

    pub fn snapshot(&self) -> Snapshot {
        self.store.snapshot()
    }

    pub fn form(&self) -> &FormController {
        &self.form
    }

    pub fn form_mut(&mut self) -> &mut FormController {
        &mut self.form
    }

    pub fn find_appointment(&self, id: i64) -> Option<Appointment> {
        self.store.appointments().iter().find(|a| a.id == id).cloned()
    }

    /// Loads a fetched appointment into the form. `false` if it is not in the snapshot.
    pub fn begin_edit(&mut self, id: i64) -> bool {
        match self.find_appointment(id) {
            Some(appt) => {
                self.form.begin_edit(&appt);
                true
            }
            None => false,
        }
    }

    pub async fn submit(&mut self) -> Result<SubmitOutcome, ClientError> {
        self.sync.submit(&mut self.form).await
    }

    pub async fn delete(
        &self,
        id: i64,
        confirmer: &dyn Confirmer,
    ) -> Result<DeleteOutcome, ClientError> {
        self.sync.delete(id, confirmer).await
    }

    /// Renders the page, consuming a pending scroll request from `begin_edit`.
    pub fn render(&mut self) -> String {
        let focus_form = self.form.take_scroll_request();
        render::page(&self.snapshot(), &self.form, focus_form)
    }
}
