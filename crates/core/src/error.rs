use hpms_types::TextError;

#[derive(Debug, thiserror::Error)]
pub enum HospitalError {
    #[error("invalid input: {0}")]
    InvalidInput(String),
    #[error("{field}: {source}")]
    InvalidText {
        field: &'static str,
        #[source]
        source: TextError,
    },
    #[error("not found: {0}")]
    NotFound(String),
    #[error("conflict: {0}")]
    Conflict(String),
    #[error("invalid configuration: {0}")]
    Config(String),

    #[error("hosted backend returned {status}: {message}")]
    Backend { status: u16, message: String },
    #[error("hosted backend returned no rows for insert into {0}")]
    EmptyInsert(&'static str),
    #[error("HTTP request failed: {0}")]
    Transport(reqwest::Error),
    #[error("failed to build HTTP client: {0}")]
    ClientBuild(reqwest::Error),
    #[error("failed to serialize payload: {0}")]
    Serialization(serde_json::Error),
    #[error("failed to deserialize response: {0}")]
    Deserialization(reqwest::Error),

    #[error("chat API key is not configured")]
    ChatNotConfigured,
    #[error("completion endpoint error: {status}")]
    Completion { status: u16 },
    #[error("completion endpoint returned no message content")]
    EmptyCompletion,
}

impl HospitalError {
    /// Wraps a `TextError` with the name of the form field that produced it.
    pub fn field(field: &'static str) -> impl FnOnce(TextError) -> HospitalError {
        move |source| HospitalError::InvalidText { field, source }
    }

    /// True for errors caused by the caller's input rather than by a dependency.
    pub fn is_invalid_input(&self) -> bool {
        matches!(
            self,
            HospitalError::InvalidInput(_) | HospitalError::InvalidText { .. }
        )
    }
}

pub type HospitalResult<T> = std::result::Result<T, HospitalError>;
