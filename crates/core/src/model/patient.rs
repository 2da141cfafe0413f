use super::blank_as_none;
use crate::validation::{optional, required, required_date};
use crate::{HospitalError, HospitalResult};
use chrono::{DateTime, NaiveDate, Utc};
use hpms_types::{EmailAddress, NonEmptyText};
use serde::{Deserialize, Serialize, Serializer};
use std::str::FromStr;
use uuid::Uuid;

/// Administrative gender as recorded on admission forms.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Deserialize)]
#[serde(try_from = "String")]
pub enum Gender {
    Male,
    Female,
    Other,
}

impl Gender {
    pub const ALL: [Gender; 3] = [Gender::Male, Gender::Female, Gender::Other];

    pub fn as_str(self) -> &'static str {
        match self {
            Gender::Male => "Male",
            Gender::Female => "Female",
            Gender::Other => "Other",
        }
    }
}

impl FromStr for Gender {
    type Err = HospitalError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        Gender::ALL
            .into_iter()
            .find(|g| g.as_str().eq_ignore_ascii_case(s))
            .ok_or_else(|| {
                HospitalError::InvalidInput(format!(
                    "gender must be one of Male, Female, Other (got {s:?})"
                ))
            })
    }
}

impl TryFrom<String> for Gender {
    type Error = HospitalError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl Serialize for Gender {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl std::fmt::Display for Gender {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// ABO/Rh blood group.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Deserialize)]
#[serde(try_from = "String")]
pub enum BloodGroup {
    APositive,
    ANegative,
    BPositive,
    BNegative,
    AbPositive,
    AbNegative,
    OPositive,
    ONegative,
}

impl BloodGroup {
    pub const ALL: [BloodGroup; 8] = [
        BloodGroup::APositive,
        BloodGroup::ANegative,
        BloodGroup::BPositive,
        BloodGroup::BNegative,
        BloodGroup::AbPositive,
        BloodGroup::AbNegative,
        BloodGroup::OPositive,
        BloodGroup::ONegative,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            BloodGroup::APositive => "A+",
            BloodGroup::ANegative => "A-",
            BloodGroup::BPositive => "B+",
            BloodGroup::BNegative => "B-",
            BloodGroup::AbPositive => "AB+",
            BloodGroup::AbNegative => "AB-",
            BloodGroup::OPositive => "O+",
            BloodGroup::ONegative => "O-",
        }
    }
}

impl FromStr for BloodGroup {
    type Err = HospitalError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        BloodGroup::ALL
            .into_iter()
            .find(|g| g.as_str().eq_ignore_ascii_case(s))
            .ok_or_else(|| {
                HospitalError::InvalidInput(format!(
                    "blood_group must be one of A+, A-, B+, B-, AB+, AB-, O+, O- (got {s:?})"
                ))
            })
    }
}

impl TryFrom<String> for BloodGroup {
    type Error = HospitalError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl Serialize for BloodGroup {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl std::fmt::Display for BloodGroup {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A stored patient row.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Patient {
    pub id: Uuid,
    pub full_name: String,
    pub date_of_birth: NaiveDate,
    #[serde(default, deserialize_with = "blank_as_none")]
    pub gender: Option<Gender>,
    pub contact_number: String,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub address: Option<String>,
    #[serde(default)]
    pub emergency_contact_name: Option<String>,
    #[serde(default)]
    pub emergency_contact_number: Option<String>,
    #[serde(default, deserialize_with = "blank_as_none")]
    pub blood_group: Option<BloodGroup>,
    #[serde(default)]
    pub allergies: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl Patient {
    /// Materialise a stored row from a validated insert, as the backend would.
    pub fn from_new(new: NewPatient, id: Uuid, created_at: DateTime<Utc>) -> Self {
        Self {
            id,
            full_name: new.full_name.into_inner(),
            date_of_birth: new.date_of_birth,
            gender: Some(new.gender),
            contact_number: new.contact_number.into_inner(),
            email: new.email.map(|e| e.as_str().to_owned()),
            address: new.address,
            emergency_contact_name: new.emergency_contact_name,
            emergency_contact_number: new.emergency_contact_number,
            blood_group: new.blood_group,
            allergies: new.allergies,
            created_at,
        }
    }
}

/// Raw add-patient input, one string per form control.
#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct PatientForm {
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

/// A validated patient ready to insert.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct NewPatient {
    pub full_name: NonEmptyText,
    pub date_of_birth: NaiveDate,
    pub gender: Gender,
    pub contact_number: NonEmptyText,
    pub email: Option<EmailAddress>,
    pub address: Option<String>,
    pub emergency_contact_name: Option<String>,
    pub emergency_contact_number: Option<String>,
    pub blood_group: Option<BloodGroup>,
    pub allergies: Option<String>,
}

impl TryFrom<PatientForm> for NewPatient {
    type Error = HospitalError;

    fn try_from(form: PatientForm) -> HospitalResult<Self> {
        let full_name = required("full_name", &form.full_name)?;
        let date_of_birth = required_date("date_of_birth", &form.date_of_birth)?;
        if form.gender.trim().is_empty() {
            return Err(HospitalError::InvalidInput("gender is required".into()));
        }
        let gender = form.gender.parse()?;
        let contact_number = required("contact_number", &form.contact_number)?;

        let email = optional(form.email.as_deref())
            .map(|e| EmailAddress::parse(e).map_err(HospitalError::field("email")))
            .transpose()?;
        let blood_group = optional(form.blood_group.as_deref())
            .map(|b| b.parse())
            .transpose()?;

        Ok(Self {
            full_name,
            date_of_birth,
            gender,
            contact_number,
            email,
            address: optional(form.address.as_deref()),
            emergency_contact_name: optional(form.emergency_contact_name.as_deref()),
            emergency_contact_number: optional(form.emergency_contact_number.as_deref()),
            blood_group,
            allergies: optional(form.allergies.as_deref()),
        })
    }
}
