use crate::validation::{optional, optional_date, optional_integer};
use crate::{HospitalError, HospitalResult};
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A stored admission row. At most one exists per patient.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Admission {
    pub id: Uuid,
    pub patient_id: Uuid,
    pub is_admitted: bool,
    #[serde(default)]
    pub floor_number: Option<i32>,
    #[serde(default)]
    pub room_number: Option<String>,
    #[serde(default)]
    pub admission_date: Option<NaiveDate>,
    #[serde(default)]
    pub discharge_date: Option<NaiveDate>,
    pub created_at: DateTime<Utc>,
}

impl Admission {
    pub fn from_new(new: NewAdmission, id: Uuid, created_at: DateTime<Utc>) -> Self {
        Self {
            id,
            patient_id: new.patient_id,
            is_admitted: new.is_admitted,
            floor_number: new.floor_number,
            room_number: new.room_number,
            admission_date: Some(new.admission_date),
            discharge_date: new.discharge_date,
            created_at,
        }
    }
}

/// Raw add-admission input.
#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct AdmissionForm {
    /// Absent means admitted.
    pub is_admitted: Option<bool>,
    pub admission_date: Option<String>,
    pub floor_number: Option<String>,
    pub room_number: Option<String>,
    pub discharge_date: Option<String>,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct NewAdmission {
    pub patient_id: Uuid,
    pub is_admitted: bool,
    pub admission_date: NaiveDate,
    pub floor_number: Option<i32>,
    pub room_number: Option<String>,
    pub discharge_date: Option<NaiveDate>,
}

impl NewAdmission {
    /// Validate an admission form. A blank admission date becomes `today`.
    pub fn from_form(patient_id: Uuid, form: AdmissionForm, today: NaiveDate) -> HospitalResult<Self> {
        let admission_date =
            optional_date("admission_date", form.admission_date.as_deref())?.unwrap_or(today);
        let discharge_date = optional_date("discharge_date", form.discharge_date.as_deref())?;

        if let Some(discharged) = discharge_date {
            if discharged < admission_date {
                return Err(HospitalError::InvalidInput(
                    "discharge_date cannot precede admission_date".into(),
                ));
            }
        }

        Ok(Self {
            patient_id,
            is_admitted: form.is_admitted.unwrap_or(true),
            admission_date,
            floor_number: optional_integer("floor_number", form.floor_number.as_deref())?,
            room_number: optional(form.room_number.as_deref()),
            discharge_date,
        })
    }
}
