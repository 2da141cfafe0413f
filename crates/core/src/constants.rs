//! Constants used throughout the HPMS core crate.
//!
//! Table names and endpoint defaults live here so the hosted store, the chat
//! relay and the binaries agree on them.

/// Hosted table holding patient identity rows.
pub const PATIENTS_TABLE: &str = "patients";

/// Hosted table holding medical records (many per patient).
pub const MEDICAL_RECORDS_TABLE: &str = "medical_records";

/// Hosted table holding admission rows (at most one per patient).
pub const ADMISSIONS_TABLE: &str = "admissions";

/// Hosted table holding billing rows (at most one per patient).
pub const BILLING_TABLE: &str = "billing";

/// Path prefix of the hosted backend's table API.
pub const REST_PATH_PREFIX: &str = "rest/v1";

/// Default chat-completion endpoint.
pub const DEFAULT_CHAT_URL: &str = "https://ai.gateway.lovable.dev/v1/chat/completions";

/// Default model name sent to the chat-completion endpoint.
pub const DEFAULT_CHAT_MODEL: &str = "google/gemini-2.5-flash";

/// Default timeout for outbound HTTP calls, in seconds.
pub const DEFAULT_HTTP_TIMEOUT_SECS: u64 = 60;
