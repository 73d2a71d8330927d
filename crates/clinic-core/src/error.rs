use clinic_types::TextError;
use serde::Serialize;

/// The persisted entity an error refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Entity {
    Patient,
    Doctor,
    Appointment,
}

impl std::fmt::Display for Entity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Entity::Patient => "patient",
            Entity::Doctor => "doctor",
            Entity::Appointment => "appointment",
        };
        f.write_str(name)
    }
}

/// Coarse classification used at the request boundary.
///
/// `Validation` and `NotFound` are recoverable: the caller re-renders its input with the
/// message. `Storage` propagates to the server's generic error handling.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    Validation,
    NotFound,
    Storage,
}

#[derive(Debug, thiserror::Error)]
pub enum ClinicError {
    #[error("{field} is required")]
    MissingField { field: &'static str },
    #[error("{field} exceeds maximum length of {max} characters")]
    FieldTooLong { field: &'static str, max: usize },
    #[error("{field} is not a valid ISO-8601 date: {value:?}")]
    InvalidDate { field: &'static str, value: String },
    #[error("{field} is not a valid identifier: {value:?}")]
    InvalidId { field: &'static str, value: String },
    #[error("limit must be at least 1")]
    InvalidLimit,
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("{entity} {id} does not exist")]
    NotFound { entity: Entity, id: i64 },
    #[error("referenced {entity} {id} does not exist")]
    UnknownReference { entity: Entity, id: i64 },
    #[error("a referenced patient or doctor does not exist")]
    ForeignKeyViolation,

    #[error("storage error: {0}")]
    Storage(#[source] rusqlite::Error),
    #[error("migration failed at version {version}: {reason}")]
    MigrationFailed { version: i64, reason: String },
    #[error("database connection lock was poisoned")]
    ConnectionPoisoned,
}

impl ClinicError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            ClinicError::MissingField { .. }
            | ClinicError::FieldTooLong { .. }
            | ClinicError::InvalidDate { .. }
            | ClinicError::InvalidId { .. }
            | ClinicError::InvalidLimit
            | ClinicError::InvalidConfig(_) => ErrorKind::Validation,
            ClinicError::NotFound { .. }
            | ClinicError::UnknownReference { .. }
            | ClinicError::ForeignKeyViolation => ErrorKind::NotFound,
            ClinicError::Storage(_)
            | ClinicError::MigrationFailed { .. }
            | ClinicError::ConnectionPoisoned => ErrorKind::Storage,
        }
    }

    /// Whether a form handler should redisplay its input instead of failing the request.
    pub fn is_recoverable(&self) -> bool {
        self.kind() != ErrorKind::Storage
    }

    /// Maps a text validation failure on `field` to the matching variant.
    pub fn from_text(field: &'static str, err: TextError) -> Self {
        match err {
            TextError::Empty => ClinicError::MissingField { field },
            TextError::TooLong { max, .. } => ClinicError::FieldTooLong { field, max },
        }
    }
}

impl From<rusqlite::Error> for ClinicError {
    fn from(err: rusqlite::Error) -> Self {
        if let rusqlite::Error::SqliteFailure(failure, _) = &err {
            if failure.extended_code == rusqlite::ffi::SQLITE_CONSTRAINT_FOREIGNKEY {
                return ClinicError::ForeignKeyViolation;
            }
        }
        ClinicError::Storage(err)
    }
}

pub type ClinicResult<T> = std::result::Result<T, ClinicError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_text_errors_map_to_field_variants() {
        let missing = ClinicError::from_text("name", TextError::Empty);
        assert!(matches!(missing, ClinicError::MissingField { field: "name" }));
        assert_eq!(missing.to_string(), "name is required");

        let long = ClinicError::from_text("phone", TextError::TooLong { max: 30, len: 31 });
        assert!(matches!(
            long,
            ClinicError::FieldTooLong {
                field: "phone",
                max: 30
            }
        ));
    }

    #[test]
    fn test_kinds_separate_recoverable_from_storage() {
        let not_found = ClinicError::UnknownReference {
            entity: Entity::Doctor,
            id: 7,
        };
        assert_eq!(not_found.kind(), ErrorKind::NotFound);
        assert!(not_found.is_recoverable());
        assert_eq!(not_found.to_string(), "referenced doctor 7 does not exist");

        let storage = ClinicError::from(rusqlite::Error::InvalidQuery);
        assert_eq!(storage.kind(), ErrorKind::Storage);
        assert!(!storage.is_recoverable());
    }
}
