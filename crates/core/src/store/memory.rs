//! Process-local record tables.
//!
//! Mirrors the hosted backend closely enough for development and tests: ids and timestamps are
//! assigned on insert, lists come back newest first, and the one-admission / one-billing per
//! patient uniqueness is enforced as a conflict.

use crate::model::{
    Admission, Billing, MedicalRecord, NewAdmission, NewBilling, NewMedicalRecord, NewPatient,
    Patient, PatientBundle,
};
use crate::{HospitalError, HospitalResult};
use chrono::Utc;
use std::sync::Arc;
use tokio::sync::RwLock;
use uuid::Uuid;

#[derive(Debug, Default)]
struct Tables {
    // Each table is kept in insertion order; readers reverse for newest first.
    patients: Vec<Patient>,
    medical_records: Vec<MedicalRecord>,
    admissions: Vec<Admission>,
    billing: Vec<Billing>,
}

#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    tables: Arc<RwLock<Tables>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn insert_patient(&self, new: NewPatient) -> Patient {
        let patient = Patient::from_new(new, Uuid::new_v4(), Utc::now());
        self.tables.write().await.patients.push(patient.clone());
        patient
    }

    pub async fn list_patients(&self) -> Vec<Patient> {
        self.tables
            .read()
            .await
            .patients
            .iter()
            .rev()
            .cloned()
            .collect()
    }

    pub async fn get_patient(&self, id: Uuid) -> Option<Patient> {
        self.tables
            .read()
            .await
            .patients
            .iter()
            .find(|p| p.id == id)
            .cloned()
    }

    pub async fn insert_medical_record(&self, new: NewMedicalRecord) -> MedicalRecord {
        let record = MedicalRecord::from_new(new, Uuid::new_v4(), Utc::now());
        self.tables.write().await.medical_records.push(record.clone());
        record
    }

    pub async fn list_medical_records(&self, patient_id: Uuid) -> Vec<MedicalRecord> {
        self.tables
            .read()
            .await
            .medical_records
            .iter()
            .rev()
            .filter(|r| r.patient_id == patient_id)
            .cloned()
            .collect()
    }

    pub async fn insert_admission(&self, new: NewAdmission) -> HospitalResult<Admission> {
        let mut tables = self.tables.write().await;
        if tables.admissions.iter().any(|a| a.patient_id == new.patient_id) {
            return Err(HospitalError::Conflict(format!(
                "patient {} already has an admission record",
                new.patient_id
            )));
        }
        let admission = Admission::from_new(new, Uuid::new_v4(), Utc::now());
        tables.admissions.push(admission.clone());
        Ok(admission)
    }

    pub async fn get_admission(&self, patient_id: Uuid) -> Option<Admission> {
        self.tables
            .read()
            .await
            .admissions
            .iter()
            .find(|a| a.patient_id == patient_id)
            .cloned()
    }

    pub async fn insert_billing(&self, new: NewBilling) -> HospitalResult<Billing> {
        let mut tables = self.tables.write().await;
        if tables.billing.iter().any(|b| b.patient_id == new.patient_id) {
            return Err(HospitalError::Conflict(format!(
                "patient {} already has a billing record",
                new.patient_id
            )));
        }
        let billing = Billing::from_new(new, Uuid::new_v4(), Utc::now());
        tables.billing.push(billing.clone());
        Ok(billing)
    }

    pub async fn get_billing(&self, patient_id: Uuid) -> Option<Billing> {
        self.tables
            .read()
            .await
            .billing
            .iter()
            .find(|b| b.patient_id == patient_id)
            .cloned()
    }

    pub async fn list_patient_bundles(&self) -> Vec<PatientBundle> {
        let tables = self.tables.read().await;
        tables
            .patients
            .iter()
            .map(|patient| PatientBundle {
                patient: patient.clone(),
                medical_records: tables
                    .medical_records
                    .iter()
                    .filter(|r| r.patient_id == patient.id)
                    .cloned()
                    .collect(),
                admissions: tables
                    .admissions
                    .iter()
                    .filter(|a| a.patient_id == patient.id)
                    .cloned()
                    .collect(),
                billing: tables
                    .billing
                    .iter()
                    .filter(|b| b.patient_id == patient.id)
                    .cloned()
                    .collect(),
            })
            .collect()
    }
}
