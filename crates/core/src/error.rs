use api_shared::ValidationIssue;

#[derive(Debug, thiserror::Error)]
pub enum EazydocError {
    #[error("invalid input: {0}")]
    InvalidInput(String),
    #[error("payload failed validation with {} issue(s)", .0.len())]
    Validation(Vec<ValidationIssue>),
    #[error("{entity} not found")]
    NotFound { entity: &'static str, id: String },
    #[error("{0}")]
    Conflict(String),
    #[error("appointment {appointment_id} references missing {entity} {id}")]
    DanglingReference {
        appointment_id: String,
        entity: &'static str,
        id: String,
    },

    #[error("failed to create data directory: {0}")]
    DataDirCreation(std::io::Error),
    #[error("failed to read database file: {0}")]
    FileRead(std::io::Error),
    #[error("failed to write database file: {0}")]
    FileWrite(std::io::Error),
    #[error("failed to serialize database: {0}")]
    Serialization(serde_json::Error),
    #[error("failed to deserialize database: {0}")]
    Deserialization(serde_json::Error),
    #[error("store lock poisoned")]
    LockPoisoned,

    #[error("failed to hash password: {0}")]
    PasswordHash(String),
}

impl EazydocError {
    pub(crate) fn not_found(entity: &'static str, id: impl Into<String>) -> Self {
        EazydocError::NotFound {
            entity,
            id: id.into(),
        }
    }
}

pub type EazydocResult<T> = std::result::Result<T, EazydocError>;
