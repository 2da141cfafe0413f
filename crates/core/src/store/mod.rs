//! Record persistence.
//!
//! `RecordStore` is an enum over concrete backends. Enum dispatch keeps the async methods
//! plain `async fn`s, so callers need no trait-object machinery. Adding a backend means a new
//! module, a new variant and a new arm in each method.

mod hosted;
mod memory;

pub use hosted::HostedStore;
pub use memory::MemoryStore;

use crate::config::{BackendConfig, CoreConfig};
use crate::model::{
    Admission, Billing, MedicalRecord, NewAdmission, NewBilling, NewMedicalRecord, NewPatient,
    Patient, PatientBundle,
};
use crate::HospitalResult;
use uuid::Uuid;

#[derive(Debug, Clone)]
pub enum RecordStore {
    Hosted(HostedStore),
    Memory(MemoryStore),
}

impl RecordStore {
    /// Build the store selected by configuration.
    pub fn from_config(cfg: &CoreConfig) -> HospitalResult<Self> {
        match cfg.backend() {
            BackendConfig::Hosted { url, key } => Ok(RecordStore::Hosted(HostedStore::new(
                url.clone(),
                key.clone(),
                cfg.http_timeout(),
            )?)),
            BackendConfig::Memory => Ok(RecordStore::Memory(MemoryStore::new())),
        }
    }

    pub fn kind(&self) -> &'static str {
        match self {
            RecordStore::Hosted(_) => "hosted",
            RecordStore::Memory(_) => "memory",
        }
    }

    pub async fn insert_patient(&self, new: NewPatient) -> HospitalResult<Patient> {
        match self {
            RecordStore::Hosted(s) => s.insert_patient(&new).await,
            RecordStore::Memory(s) => Ok(s.insert_patient(new).await),
        }
    }

    /// All patients, newest first.
    pub async fn list_patients(&self) -> HospitalResult<Vec<Patient>> {
        match self {
            RecordStore::Hosted(s) => s.list_patients().await,
            RecordStore::Memory(s) => Ok(s.list_patients().await),
        }
    }

    pub async fn get_patient(&self, id: Uuid) -> HospitalResult<Option<Patient>> {
        match self {
            RecordStore::Hosted(s) => s.get_patient(id).await,
            RecordStore::Memory(s) => Ok(s.get_patient(id).await),
        }
    }

    pub async fn insert_medical_record(
        &self,
        new: NewMedicalRecord,
    ) -> HospitalResult<MedicalRecord> {
        match self {
            RecordStore::Hosted(s) => s.insert_medical_record(&new).await,
            RecordStore::Memory(s) => Ok(s.insert_medical_record(new).await),
        }
    }

    /// A patient's medical records, newest first.
    pub async fn list_medical_records(&self, patient_id: Uuid) -> HospitalResult<Vec<MedicalRecord>> {
        match self {
            RecordStore::Hosted(s) => s.list_medical_records(patient_id).await,
            RecordStore::Memory(s) => Ok(s.list_medical_records(patient_id).await),
        }
    }

    pub async fn insert_admission(&self, new: NewAdmission) -> HospitalResult<Admission> {
        match self {
            RecordStore::Hosted(s) => s.insert_admission(&new).await,
            RecordStore::Memory(s) => s.insert_admission(new).await,
        }
    }

    pub async fn get_admission(&self, patient_id: Uuid) -> HospitalResult<Option<Admission>> {
        match self {
            RecordStore::Hosted(s) => s.get_admission(patient_id).await,
            RecordStore::Memory(s) => Ok(s.get_admission(patient_id).await),
        }
    }

    pub async fn insert_billing(&self, new: NewBilling) -> HospitalResult<Billing> {
        match self {
            RecordStore::Hosted(s) => s.insert_billing(&new).await,
            RecordStore::Memory(s) => s.insert_billing(new).await,
        }
    }

    pub async fn get_billing(&self, patient_id: Uuid) -> HospitalResult<Option<Billing>> {
        match self {
            RecordStore::Hosted(s) => s.get_billing(patient_id).await,
            RecordStore::Memory(s) => Ok(s.get_billing(patient_id).await),
        }
    }

    /// Every patient joined with all of its child rows.
    pub async fn list_patient_bundles(&self) -> HospitalResult<Vec<PatientBundle>> {
        match self {
            RecordStore::Hosted(s) => s.list_patient_bundles().await,
            RecordStore::Memory(s) => Ok(s.list_patient_bundles().await),
        }
    }
}
