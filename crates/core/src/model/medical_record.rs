use crate::validation::{optional, required};
use crate::{HospitalError, HospitalResult};
use chrono::{DateTime, Utc};
use hpms_types::NonEmptyText;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A stored medical record. A patient may have any number of these.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct MedicalRecord {
    pub id: Uuid,
    pub patient_id: Uuid,
    pub illness: String,
    pub symptoms: String,
    #[serde(default)]
    pub diagnosis: Option<String>,
    #[serde(default)]
    pub prescription: Option<String>,
    pub doctor_name: String,
    #[serde(default)]
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl MedicalRecord {
    pub fn from_new(new: NewMedicalRecord, id: Uuid, created_at: DateTime<Utc>) -> Self {
        Self {
            id,
            patient_id: new.patient_id,
            illness: new.illness.into_inner(),
            symptoms: new.symptoms.into_inner(),
            diagnosis: new.diagnosis,
            prescription: new.prescription,
            doctor_name: new.doctor_name.into_inner(),
            notes: new.notes,
            created_at,
        }
    }
}

/// Raw add-record input.
#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct MedicalRecordForm {
    pub illness: String,
    pub symptoms: String,
    pub diagnosis: Option<String>,
    pub prescription: Option<String>,
    pub doctor_name: String,
    pub notes: Option<String>,
}

/// A validated medical record bound to its patient.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct NewMedicalRecord {
    pub patient_id: Uuid,
    pub illness: NonEmptyText,
    pub symptoms: NonEmptyText,
    pub diagnosis: Option<String>,
    pub prescription: Option<String>,
    pub doctor_name: NonEmptyText,
    pub notes: Option<String>,
}

impl NewMedicalRecord {
    pub fn from_form(patient_id: Uuid, form: MedicalRecordForm) -> HospitalResult<Self> {
        Ok(Self {
            patient_id,
            illness: required("illness", &form.illness)?,
            symptoms: required("symptoms", &form.symptoms)?,
            diagnosis: optional(form.diagnosis.as_deref()),
            prescription: optional(form.prescription.as_deref()),
            doctor_name: required("doctor_name", &form.doctor_name)?,
            notes: optional(form.notes.as_deref()),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn requires_illness_symptoms_and_doctor() {
        let patient_id = Uuid::new_v4();
        let full = MedicalRecordForm {
            illness: "Pneumonia".into(),
            symptoms: "Fever, productive cough".into(),
            doctor_name: "Patel".into(),
            diagnosis: Some("Community-acquired pneumonia".into()),
            prescription: Some("".into()),
            notes: None,
        };

        let ok = NewMedicalRecord::from_form(patient_id, full.clone()).unwrap();
        assert_eq!(ok.patient_id, patient_id);
        assert_eq!(ok.prescription, None);

        for field in ["illness", "symptoms", "doctor_name"] {
            let mut form = full.clone();
            match field {
                "illness" => form.illness.clear(),
                "symptoms" => form.symptoms.clear(),
                _ => form.doctor_name.clear(),
            }
            let err = NewMedicalRecord::from_form(patient_id, form).unwrap_err();
            assert!(
                matches!(&err, HospitalError::InvalidText { field: f, .. } if *f == field),
                "expected {field} error, got {err}"
            );
        }
    }
}
