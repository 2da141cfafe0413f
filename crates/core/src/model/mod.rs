//! Record types for patients and their child rows.
//!
//! Each record has two shapes:
//! - a *read model* (`Patient`, `MedicalRecord`, ...) matching a stored row, including the
//!   id and creation timestamp assigned by the backend, and
//! - a validated *insert model* (`NewPatient`, ...) built from a raw, all-string *form*.
//!
//! Serde field names equal the hosted column names, so the same types travel to and from the
//! hosted backend without a separate wire layer.

mod admission;
mod billing;
mod bundle;
mod medical_record;
mod patient;

pub use admission::{Admission, AdmissionForm, NewAdmission};
pub use billing::{Billing, BillingForm, NewBilling, PaymentStatus};
pub use bundle::{PatientBundle, PatientDetails};
pub use medical_record::{MedicalRecord, MedicalRecordForm, NewMedicalRecord};
pub use patient::{BloodGroup, Gender, NewPatient, Patient, PatientForm};

use serde::{Deserialize, Deserializer};
use std::fmt::Display;
use std::str::FromStr;

/// Deserialise an optional enum column where older rows may hold `""` instead of `null`.
pub(crate) fn blank_as_none<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: FromStr,
    T::Err: Display,
{
    let raw = Option::<String>::deserialize(deserializer)?;
    match raw.as_deref().map(str::trim) {
        None | Some("") => Ok(None),
        Some(value) => value.parse().map(Some).map_err(serde::de::Error::custom),
    }
}
