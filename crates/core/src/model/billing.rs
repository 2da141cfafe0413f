use crate::validation::{amount, optional, round_cents};
use crate::{HospitalError, HospitalResult};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::str::FromStr;
use uuid::Uuid;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PaymentStatus {
    #[default]
    Pending,
    Partial,
    Paid,
}

impl PaymentStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            PaymentStatus::Pending => "pending",
            PaymentStatus::Partial => "partial",
            PaymentStatus::Paid => "paid",
        }
    }
}

impl FromStr for PaymentStatus {
    type Err = HospitalError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "pending" => Ok(PaymentStatus::Pending),
            "partial" => Ok(PaymentStatus::Partial),
            "paid" => Ok(PaymentStatus::Paid),
            other => Err(HospitalError::InvalidInput(format!(
                "payment_status must be one of pending, partial, paid (got {other:?})"
            ))),
        }
    }
}

impl std::fmt::Display for PaymentStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A stored billing row. At most one exists per patient.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Billing {
    pub id: Uuid,
    pub patient_id: Uuid,
    pub total_amount: f64,
    pub amount_paid: f64,
    pub amount_due: f64,
    pub payment_status: PaymentStatus,
    pub created_at: DateTime<Utc>,
}

impl Billing {
    pub fn from_new(new: NewBilling, id: Uuid, created_at: DateTime<Utc>) -> Self {
        Self {
            id,
            patient_id: new.patient_id,
            total_amount: new.total_amount,
            amount_paid: new.amount_paid,
            amount_due: new.amount_due,
            payment_status: new.payment_status,
            created_at,
        }
    }
}

/// Raw add-billing input.
#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct BillingForm {
    pub total_amount: String,
    /// Blank means nothing paid yet.
    pub amount_paid: Option<String>,
    /// Blank means `pending`.
    pub payment_status: Option<String>,
}

/// A validated billing row. `amount_due` is derived here and nowhere else.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct NewBilling {
    pub patient_id: Uuid,
    pub total_amount: f64,
    pub amount_paid: f64,
    pub amount_due: f64,
    pub payment_status: PaymentStatus,
}

impl NewBilling {
    pub fn from_form(patient_id: Uuid, form: BillingForm) -> HospitalResult<Self> {
        let total_amount = amount("total_amount", &form.total_amount)?;
        let amount_paid = match optional(form.amount_paid.as_deref()) {
            Some(paid) => amount("amount_paid", &paid)?,
            None => 0.0,
        };

        if amount_paid > total_amount {
            return Err(HospitalError::InvalidInput(
                "amount_paid cannot exceed total_amount".into(),
            ));
        }

        let payment_status = optional(form.payment_status.as_deref())
            .map(|s| s.parse())
            .transpose()?
            .unwrap_or_default();

        Ok(Self {
            patient_id,
            total_amount,
            amount_paid,
            amount_due: round_cents(total_amount - amount_paid),
            payment_status,
        })
    }
}
