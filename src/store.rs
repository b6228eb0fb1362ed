// src/store.rs

use std::future::Future;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, PoisonError, RwLock};

use crate::client::ClinicApi;
use crate::error::ClientError;
use crate::models::{Appointment, Doctor, Patient, Stats};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Refresh {
    Applied,
    /// A later request for the same slice already landed.
    Stale,
}

struct Slot<T> {
    generation: u64,
    value: Arc<T>,
}

/// One slice of the store. Values are swapped whole behind an `Arc`.
struct SnapshotCell<T> {
    issued: AtomicU64,
    slot: RwLock<Slot<T>>,
}

impl<T> SnapshotCell<T> {
    fn new(value: T) -> Self {
        Self {
            issued: AtomicU64::new(0),
            slot: RwLock::new(Slot {
                generation: 0,
                value: Arc::new(value),
            }),
        }
    }

    fn ticket(&self) -> u64 {
        self.issued.fetch_add(1, Ordering::SeqCst) + 1
    }

    fn apply(&self, ticket: u64, value: T) -> Refresh {
        let mut slot = self.slot.write().unwrap_or_else(PoisonError::into_inner);
        if ticket <= slot.generation {
            return Refresh::Stale;
        }
        *slot = Slot {
            generation: ticket,
            value: Arc::new(value),
        };
        Refresh::Applied
    }

    fn get(&self) -> Arc<T> {
        self.slot
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .value
            .clone()
    }
}

/// Consistent read view handed to the projections.
#[derive(Debug, Clone, Default)]
pub struct Snapshot {
    pub appointments: Arc<Vec<Appointment>>,
    pub patients: Arc<Vec<Patient>>,
    pub doctors: Arc<Vec<Doctor>>,
    pub stats: Stats,
}

/// Last-fetched server state. Only ever written by a refresh.
pub struct DataStore {
    api: Arc<dyn ClinicApi>,
    appointments: SnapshotCell<Vec<Appointment>>,
    stats: SnapshotCell<Stats>,
    patients: SnapshotCell<Vec<Patient>>,
    doctors: SnapshotCell<Vec<Doctor>>,
}

impl DataStore {
    pub fn new(api: Arc<dyn ClinicApi>) -> Self {
        Self {
            api,
            appointments: SnapshotCell::new(Vec::new()),
            stats: SnapshotCell::new(Stats::default()),
            patients: SnapshotCell::new(Vec::new()),
            doctors: SnapshotCell::new(Vec::new()),
        }
    }

    pub fn api(&self) -> &Arc<dyn ClinicApi> {
        &self.api
    }

    async fn refresh<T, F>(
        &self,
        cell: &SnapshotCell<T>,
        what: &'static str,
        fetch: F,
    ) -> Result<Refresh, ClientError>
    where
        F: Future<Output = Result<T, ClientError>>,
    {
        let ticket = cell.ticket();
        match fetch.await {
            Ok(value) => {
                let outcome = cell.apply(ticket, value);
                match outcome {
                    Refresh::Applied => tracing::debug!(what, ticket, "snapshot replaced"),
                    Refresh::Stale => {
                        tracing::warn!(what, ticket, "discarding superseded response")
                    }
                }
                Ok(outcome)
            }
            Err(e) => {
                // keep the previous snapshot
                tracing::error!("Error fetching {what}: {e}");
                Err(e)
            }
        }
    }

    pub async fn refresh_appointments(&self) -> Result<Refresh, ClientError> {
        self.refresh(&self.appointments, "appointments", self.api.list_appointments())
            .await
    }

    pub async fn refresh_stats(&self) -> Result<Refresh, ClientError> {
        self.refresh(&self.stats, "stats", self.api.get_stats()).await
    }

    pub async fn refresh_patients(&self) -> Result<Refresh, ClientError> {
        self.refresh(&self.patients, "patients", self.api.list_patients())
            .await
    }

    pub async fn refresh_doctors(&self) -> Result<Refresh, ClientError> {
        self.refresh(&self.doctors, "doctors", self.api.list_doctors())
            .await
    }

    /// The four refreshes run concurrently; each lands on its own.
    /// Returns the failures, already logged.
    pub async fn refresh_all(&self) -> Vec<ClientError> {
        let (a, s, p, d) = tokio::join!(
            self.refresh_appointments(),
            self.refresh_stats(),
            self.refresh_patients(),
            self.refresh_doctors(),
        );
        [a, s, p, d].into_iter().filter_map(Result::err).collect()
    }

    /// Appointments and stats, the pair every mutation invalidates.
    pub async fn refresh_after_mutation(&self) {
        // failures are logged inside; stale data stays on screen
        let _ = tokio::join!(self.refresh_appointments(), self.refresh_stats());
    }

    pub fn appointments(&self) -> Arc<Vec<Appointment>> {
        self.appointments.get()
    }

    pub fn patients(&self) -> Arc<Vec<Patient>> {
        self.patients.get()
    }

    pub fn doctors(&self) -> Arc<Vec<Doctor>> {
        self.doctors.get()
    }

    pub fn stats(&self) -> Stats {
        *self.stats.get()
    }

    pub fn snapshot(&self) -> Snapshot {
        Snapshot {
            appointments: self.appointments(),
            patients: self.patients(),
            doctors: self.doctors(),
            stats: self.stats(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::client::fake::{Call, FakeClinicApi, Op};
    use crate::models::AppointmentPayload;

    fn payload(patient_id: i64, doctor_id: i64) -> AppointmentPayload {
        AppointmentPayload {
            patient_id,
            doctor_id,
            date: "2024-01-15".into(),
            time: "10:00 AM".into(),
            reason: "Chest Pain".into(),
        }
    }

    #[tokio::test]
    async fn test_refresh_all_populates_every_slice() {
        let api = Arc::new(FakeClinicApi::seeded());
        api.insert(payload(3, 5));
        let store = DataStore::new(api.clone());

        assert!(store.refresh_all().await.is_empty());

        let snap = store.snapshot();
        assert_eq!(snap.appointments.len(), 1);
        assert_eq!(snap.patients.len(), 2);
        assert_eq!(snap.doctors.len(), 2);
        assert_eq!(snap.stats.total_appointments, 1);
        assert_eq!(api.calls().len(), 4);
    }

    #[tokio::test]
    async fn test_failed_refresh_keeps_previous_snapshot() {
        let api = Arc::new(FakeClinicApi::seeded());
        api.insert(payload(3, 5));
        let store = DataStore::new(api.clone());
        store.refresh_appointments().await.unwrap();
        let before = store.appointments();

        api.insert(payload(4, 6));
        api.fail(Op::ListAppointments);
        assert!(store.refresh_appointments().await.is_err());

        assert!(Arc::ptr_eq(&before, &store.appointments()));
        assert_eq!(store.appointments().len(), 1);
    }

    #[tokio::test]
    async fn test_one_failing_slice_does_not_block_others() {
        let api = Arc::new(FakeClinicApi::seeded());
        api.fail(Op::Stats);
        let store = DataStore::new(api.clone());

        let failures = store.refresh_all().await;

        assert_eq!(failures.len(), 1);
        assert_eq!(store.patients().len(), 2);
        assert_eq!(store.doctors().len(), 2);
        assert_eq!(store.stats(), Stats::default());
    }

    #[tokio::test]
    async fn test_refresh_replaces_wholesale() {
        let api = Arc::new(FakeClinicApi::seeded());
        let first = api.insert(payload(3, 5));
        api.insert(payload(4, 6));
        let store = DataStore::new(api.clone());
        store.refresh_appointments().await.unwrap();
        assert_eq!(store.appointments().len(), 2);

        api.delete_appointment(first).await.unwrap();
        store.refresh_appointments().await.unwrap();

        let ids: Vec<i64> = store.appointments().iter().map(|a| a.id).collect();
        assert_eq!(ids, vec![first + 1]);
    }

    #[tokio::test]
    async fn test_mutation_refresh_touches_only_appointments_and_stats() {
        let api = Arc::new(FakeClinicApi::seeded());
        let store = DataStore::new(api.clone());

        store.refresh_after_mutation().await;

        assert_eq!(api.count(&Call::ListAppointments), 1);
        assert_eq!(api.count(&Call::Stats), 1);
        assert_eq!(api.calls().len(), 2);
    }

    #[test]
    fn test_superseded_response_is_discarded() {
        let cell = SnapshotCell::new(0u32);
        let older = cell.ticket();
        let newer = cell.ticket();

        assert_eq!(cell.apply(newer, 2), Refresh::Applied);
        assert_eq!(cell.apply(older, 1), Refresh::Stale);
        assert_eq!(*cell.get(), 2);
    }

    #[test]
    fn test_in_order_responses_all_apply() {
        let cell = SnapshotCell::new(Vec::<u32>::new());
        let t1 = cell.ticket();
        assert_eq!(cell.apply(t1, vec![1]), Refresh::Applied);
        let t2 = cell.ticket();
        assert_eq!(cell.apply(t2, vec![1, 2]), Refresh::Applied);
        assert_eq!(*cell.get(), vec![1, 2]);
    }
}
