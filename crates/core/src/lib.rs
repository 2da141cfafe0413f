//! # HPMS Core
//!
//! Core business logic for the hospital patient management system.
//!
//! This crate contains pure data operations:
//! - Patient registration, listing and search
//! - Medical record, admission and billing records attached to a patient
//! - Record persistence against the hosted table API or in-process tables
//! - The patient-data chat assistant
//!
//! **No API concerns**: HTTP servers, request authentication and wire DTOs belong in `api-rest`
//! and `api-shared`.

pub mod chat;
pub mod config;
pub mod constants;
pub mod error;
pub mod model;
pub mod patient;
pub mod search;
pub mod store;
mod validation;

pub use chat::ChatRelay;
pub use config::CoreConfig;
pub use error::{HospitalError, HospitalResult};
pub use hpms_types::{EmailAddress, NonEmptyText};
pub use patient::PatientService;
pub use store::RecordStore;
