//! Error types for the MongoDB driver.

use hospital_storage::DriverError;
use mongodb::error::{ErrorKind, WriteFailure};

/// MongoDB server error code for a unique index violation (E11000).
pub const MONGO_DUPLICATE_KEY: i32 = 11000;

/// Checks if a driver error is a unique index violation.
pub fn is_duplicate_key(err: &mongodb::error::Error) -> bool {
    match err.kind.as_ref() {
        ErrorKind::Write(WriteFailure::WriteError(write)) => write.code == MONGO_DUPLICATE_KEY,
        ErrorKind::Command(command) => command.code == MONGO_DUPLICATE_KEY,
        _ => false,
    }
}

/// Checks if a driver error means the server could not be reached.
pub fn is_connectivity(err: &mongodb::error::Error) -> bool {
    matches!(
        err.kind.as_ref(),
        ErrorKind::ServerSelection { .. }
            | ErrorKind::Io(_)
            | ErrorKind::ConnectionPoolCleared { .. }
            | ErrorKind::DnsResolve { .. }
            | ErrorKind::Authentication { .. }
    )
}

/// Errors specific to the MongoDB driver.
#[derive(Debug, thiserror::Error)]
pub enum MongoError {
    /// Error reported by the MongoDB client.
    #[error("MongoDB error: {0}")]
    Client(#[from] mongodb::error::Error),

    /// A JSON document could not be converted to BSON.
    #[error("BSON encoding error: {0}")]
    Encode(#[from] mongodb::bson::ser::Error),
}

impl From<MongoError> for DriverError {
    fn from(err: MongoError) -> Self {
        match err {
            MongoError::Client(e) if is_duplicate_key(&e) => {
                DriverError::DuplicateKey(e.to_string())
            }
            MongoError::Client(e) if is_connectivity(&e) => DriverError::Connection(e.to_string()),
            MongoError::Client(e) => match e.kind.as_ref() {
                ErrorKind::BsonDeserialization(_) | ErrorKind::BsonSerialization(_) => {
                    DriverError::Codec(e.to_string())
                }
                _ => DriverError::Backend(e.to_string()),
            },
            MongoError::Encode(e) => DriverError::Codec(e.to_string()),
        }
    }
}

/// Result type alias for MongoDB operations.
pub type Result<T> = std::result::Result<T, MongoError>;

#[cfg(test)]
mod tests {
    use super::*;
    use mongodb::bson::Bson;

    #[test]
    fn encode_errors_are_codec() {
        // Top-level scalars cannot become documents
        let err = mongodb::bson::to_document(&Bson::Int32(1)).unwrap_err();
        let driver: DriverError = MongoError::from(err).into();
        assert!(matches!(driver, DriverError::Codec(_)));
    }
}
