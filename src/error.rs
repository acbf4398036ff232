//! Error types for seed generation.

use thiserror::Error;

/// Errors that can occur while generating seed files.
#[derive(Debug, Error)]
pub enum SeedError {
	/// The requested table does not exist on the resolved connection.
	///
	/// Raised by the existence check before any data is fetched or any
	/// file is written.
	#[error("Table {0} was not found.")]
	TableNotFound(String),

	/// The requested connection alias is not configured.
	#[error("Unknown database connection: {0}")]
	UnknownConnection(String),

	/// The database URL scheme does not name a supported backend.
	#[error("Unsupported database URL: {0}")]
	UnsupportedDatabase(String),

	/// The configured insert command does not carry exactly two `%s` sites.
	#[error("Invalid insert command: {0}")]
	InvalidInsertCommand(String),

	/// Database operation failed.
	#[error("Database error: {0}")]
	Database(#[from] sqlx::Error),

	/// I/O operation failed.
	#[error("IO error: {0}")]
	Io(#[from] std::io::Error),

	/// Configuration file could not be parsed.
	#[error("Config error: {0}")]
	Config(String),
}

/// Result type alias for seeding operations.
pub type SeedResult<T> = Result<T, SeedError>;

#[cfg(test)]
mod tests {
	use super::*;
	use rstest::rstest;

	#[rstest]
	fn test_table_not_found_display() {
		let error = SeedError::TableNotFound("users".to_string());
		assert_eq!(error.to_string(), "Table users was not found.");
	}

	#[rstest]
	fn test_unknown_connection_display() {
		let error = SeedError::UnknownConnection("analytics".to_string());
		assert_eq!(error.to_string(), "Unknown database connection: analytics");
	}

	#[rstest]
	fn test_io_error_from() {
		let io_error = std::io::Error::new(std::io::ErrorKind::NotFound, "file not found");
		let seed_error: SeedError = io_error.into();
		assert!(matches!(seed_error, SeedError::Io(_)));
	}
}
