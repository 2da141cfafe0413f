//! Patient list filtering.
//!
//! A query matches when it is a case-insensitive substring of the patient's name, phone
//! number or email address. Blank queries match everything.

use crate::model::Patient;

/// Returns true if `patient` matches `query`.
pub fn matches(patient: &Patient, query: &str) -> bool {
    let query = query.trim();
    if query.is_empty() {
        return true;
    }
    let needle = query.to_lowercase();

    patient.full_name.to_lowercase().contains(&needle)
        || patient.contact_number.to_lowercase().contains(&needle)
        || patient
            .email
            .as_deref()
            .is_some_and(|email| email.to_lowercase().contains(&needle))
}

/// Keep the patients matching `query`, preserving order.
pub fn filter_patients(patients: Vec<Patient>, query: &str) -> Vec<Patient> {
    if query.trim().is_empty() {
        return patients;
    }
    patients
        .into_iter()
        .filter(|p| matches(p, query))
        .collect()
}
