//! JSON bodies exchanged over the REST API.
//!
//! Ids, dates and timestamps travel as strings (`YYYY-MM-DD` for dates, RFC 3339 for
//! timestamps) so this crate has no dependency on the domain model.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct HealthRes {
    pub ok: bool,
    pub message: String,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct ErrorRes {
    pub error: String,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct PatientDto {
    pub id: String,
    pub full_name: String,
    pub date_of_birth: String,
    pub gender: Option<String>,
    pub contact_number: String,
    pub email: Option<String>,
    pub address: Option<String>,
    pub emergency_contact_name: Option<String>,
    pub emergency_contact_number: Option<String>,
    pub blood_group: Option<String>,
    pub allergies: Option<String>,
    pub created_at: String,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct ListPatientsRes {
    pub patients: Vec<PatientDto>,
}

/// Add-patient form. `full_name`, `date_of_birth`, `gender` and `contact_number` are required.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(default)]
pub struct CreatePatientReq {
    pub full_name: String,
    pub date_of_birth: String,
    pub gender: String,
    pub contact_number: String,
    pub email: Option<String>,
    pub address: Option<String>,
    pub emergency_contact_name: Option<String>,
    pub emergency_contact_number: Option<String>,
    pub blood_group: Option<String>,
    pub allergies: Option<String>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct CreatePatientRes {
    pub patient: PatientDto,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct MedicalRecordDto {
    pub id: String,
    pub patient_id: String,
    pub illness: String,
    pub symptoms: String,
    pub diagnosis: Option<String>,
    pub prescription: Option<String>,
    pub doctor_name: String,
    pub notes: Option<String>,
    pub created_at: String,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(default)]
pub struct MedicalRecordReq {
    pub illness: String,
    pub symptoms: String,
    pub diagnosis: Option<String>,
    pub prescription: Option<String>,
    pub doctor_name: String,
    pub notes: Option<String>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct MedicalRecordRes {
    pub record: MedicalRecordDto,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct AdmissionDto {
    pub id: String,
    pub patient_id: String,
    pub is_admitted: bool,
    pub floor_number: Option<i32>,
    pub room_number: Option<String>,
    pub admission_date: Option<String>,
    pub discharge_date: Option<String>,
    pub created_at: String,
}

/// Admission form. The admission date defaults to today and `is_admitted` to true.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(default)]
pub struct AdmissionReq {
    pub is_admitted: Option<bool>,
    pub admission_date: Option<String>,
    pub floor_number: Option<i32>,
    pub room_number: Option<String>,
    pub discharge_date: Option<String>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct AdmissionRes {
    pub admission: AdmissionDto,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct BillingDto {
    pub id: String,
    pub patient_id: String,
    pub total_amount: f64,
    pub amount_paid: f64,
    pub amount_due: f64,
    pub payment_status: String,
    pub created_at: String,
}

/// Billing form. `amount_due` is always derived server-side.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct BillingReq {
    pub total_amount: f64,
    #[serde(default)]
    pub amount_paid: Option<f64>,
    /// `pending`, `partial` or `paid`; defaults to `pending`.
    #[serde(default)]
    pub payment_status: Option<String>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct BillingRes {
    pub billing: BillingDto,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct PatientDetailsRes {
    pub patient: PatientDto,
    pub medical_records: Vec<MedicalRecordDto>,
    pub admission: Option<AdmissionDto>,
    pub billing: Option<BillingDto>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct ChatReq {
    pub message: String,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct ChatRes {
    pub response: String,
}
