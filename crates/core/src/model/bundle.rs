use super::{Admission, Billing, MedicalRecord, Patient};
use serde::{Deserialize, Deserializer, Serialize};

/// One patient with every child row, as returned by an embedded select.
///
/// The hosted backend renders one-to-one relations as a single object (or `null`) and
/// one-to-many relations as arrays; all three shapes are accepted for every child list.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct PatientBundle {
    #[serde(flatten)]
    pub patient: Patient,
    #[serde(default, deserialize_with = "one_or_many")]
    pub medical_records: Vec<MedicalRecord>,
    #[serde(default, deserialize_with = "one_or_many")]
    pub admissions: Vec<Admission>,
    #[serde(default, deserialize_with = "one_or_many")]
    pub billing: Vec<Billing>,
}

/// Everything shown for a single patient.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct PatientDetails {
    pub patient: Patient,
    /// Newest first.
    pub medical_records: Vec<MedicalRecord>,
    pub admission: Option<Admission>,
    pub billing: Option<Billing>,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum OneOrMany<T> {
    Many(Vec<T>),
    One(T),
}

fn one_or_many<'de, D, T>(deserializer: D) -> Result<Vec<T>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Ok(match Option::<OneOrMany<T>>::deserialize(deserializer)? {
        None => Vec::new(),
        Some(OneOrMany::Many(items)) => items,
        Some(OneOrMany::One(item)) => vec![item],
    })
}
