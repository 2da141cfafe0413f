//! Patient service and related operations.
//!
//! This is the entry point for everything the patient screens do: registering a patient,
//! listing and searching, opening a patient's details, and attaching medical, admission and
//! billing records.

use crate::model::{
    Admission, AdmissionForm, Billing, BillingForm, MedicalRecord, MedicalRecordForm,
    NewAdmission, NewBilling, NewMedicalRecord, NewPatient, Patient, PatientDetails,
    PatientForm,
};
use crate::search::filter_patients;
use crate::store::RecordStore;
use crate::{HospitalError, HospitalResult};
use chrono::Utc;
use uuid::Uuid;

/// Pure patient data operations - no API concerns
#[derive(Clone, Debug)]
pub struct PatientService {
    store: RecordStore,
}

impl PatientService {
    /// Creates a new instance of PatientService backed by `store`.
    pub fn new(store: RecordStore) -> Self {
        Self { store }
    }

    pub fn store(&self) -> &RecordStore {
        &self.store
    }

    /// Validates the add-patient form and stores exactly one new patient row.
    ///
    /// # Errors
    ///
    /// Returns `HospitalError::InvalidInput`/`InvalidText` if a required field is blank or a
    /// field is malformed, or a backend error if the insert fails.
    pub async fn create_patient(&self, form: PatientForm) -> HospitalResult<Patient> {
        let new = NewPatient::try_from(form)?;
        let patient = self.store.insert_patient(new).await?;
        tracing::info!(patient_id = %patient.id, "patient created");
        Ok(patient)
    }

    /// Lists patients newest first, optionally filtered by a search query.
    pub async fn list_patients(&self, search: Option<&str>) -> HospitalResult<Vec<Patient>> {
        let patients = self.store.list_patients().await?;
        Ok(match search {
            Some(query) => filter_patients(patients, query),
            None => patients,
        })
    }

    /// Loads a patient together with its medical records, admission and billing.
    ///
    /// # Errors
    ///
    /// Returns `HospitalError::NotFound` if no patient has this id.
    pub async fn patient_details(&self, id: Uuid) -> HospitalResult<PatientDetails> {
        let patient = self.require_patient(id).await?;

        let medical_records = self.store.list_medical_records(id).await?;
        let admission = self.store.get_admission(id).await?;
        let billing = self.store.get_billing(id).await?;

        Ok(PatientDetails {
            patient,
            medical_records,
            admission,
            billing,
        })
    }

    pub async fn add_medical_record(
        &self,
        patient_id: Uuid,
        form: MedicalRecordForm,
    ) -> HospitalResult<MedicalRecord> {
        let new = NewMedicalRecord::from_form(patient_id, form)?;
        self.require_patient(patient_id).await?;

        let record = self.store.insert_medical_record(new).await?;
        tracing::info!(%patient_id, record_id = %record.id, "medical record added");
        Ok(record)
    }

    /// Records the patient's admission. A patient has at most one admission record.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` for an unknown patient and `Conflict` if an admission already exists.
    pub async fn add_admission(
        &self,
        patient_id: Uuid,
        form: AdmissionForm,
    ) -> HospitalResult<Admission> {
        let new = NewAdmission::from_form(patient_id, form, Utc::now().date_naive())?;
        self.require_patient(patient_id).await?;

        if self.store.get_admission(patient_id).await?.is_some() {
            return Err(HospitalError::Conflict(format!(
                "patient {patient_id} already has an admission record"
            )));
        }

        let admission = self.store.insert_admission(new).await?;
        tracing::info!(%patient_id, admission_id = %admission.id, "admission added");
        Ok(admission)
    }

    /// Records the patient's bill, deriving the amount due. At most one per patient.
    pub async fn add_billing(&self, patient_id: Uuid, form: BillingForm) -> HospitalResult<Billing> {
        let new = NewBilling::from_form(patient_id, form)?;
        self.require_patient(patient_id).await?;

        if self.store.get_billing(patient_id).await?.is_some() {
            return Err(HospitalError::Conflict(format!(
                "patient {patient_id} already has a billing record"
            )));
        }

        let billing = self.store.insert_billing(new).await?;
        tracing::info!(%patient_id, billing_id = %billing.id, "billing added");
        Ok(billing)
    }

    async fn require_patient(&self, id: Uuid) -> HospitalResult<Patient> {
        self.store
            .get_patient(id)
            .await?
            .ok_or_else(|| HospitalError::NotFound(format!("patient {id}")))
    }
}
