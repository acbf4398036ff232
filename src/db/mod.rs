//! Database access layer.
//!
//! A thin abstraction over `sqlx` in the shape of a [`DatabaseBackend`]
//! trait object per connection, so the generation pipeline is independent
//! of the concrete driver. Rows come back as ordered column/value pairs:
//! the serializer must reproduce columns in projection order.

pub mod backend;

#[cfg(feature = "mysql")]
pub mod mysql;
#[cfg(feature = "postgres")]
pub mod postgres;
#[cfg(feature = "sqlite")]
pub mod sqlite;

use std::sync::Arc;

pub use backend::{DatabaseBackend, FetchOptions, SortDirection};

use crate::error::{SeedError, SeedResult};

/// Database flavor behind a connection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DatabaseType {
	#[cfg(feature = "sqlite")]
	Sqlite,
	#[cfg(feature = "postgres")]
	Postgres,
	#[cfg(feature = "mysql")]
	Mysql,
}

/// Scalar value read from a column.
#[derive(Debug, Clone, PartialEq)]
pub enum SqlValue {
	Null,
	Bool(bool),
	Int(i64),
	Float(f64),
	String(String),
	Bytes(Vec<u8>),
	Timestamp(chrono::DateTime<chrono::Utc>),
}

/// One result row: column/value pairs in projection order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Row {
	columns: Vec<(String, SqlValue)>,
}

impl Row {
	pub fn new() -> Self {
		Self::default()
	}

	/// Appends a column. Order of insertion is the order of iteration.
	pub fn push(&mut self, name: impl Into<String>, value: SqlValue) {
		self.columns.push((name.into(), value));
	}

	pub fn get(&self, name: &str) -> Option<&SqlValue> {
		self.columns
			.iter()
			.find(|(column, _)| column == name)
			.map(|(_, value)| value)
	}

	pub fn iter(&self) -> impl Iterator<Item = &(String, SqlValue)> {
		self.columns.iter()
	}

	pub fn len(&self) -> usize {
		self.columns.len()
	}

	pub fn is_empty(&self) -> bool {
		self.columns.is_empty()
	}
}

/// Database connection wrapper dispatching on the URL scheme.
#[derive(Clone)]
pub struct DatabaseConnection {
	backend: Arc<dyn DatabaseBackend>,
}

impl DatabaseConnection {
	pub fn new(backend: Arc<dyn DatabaseBackend>) -> Self {
		Self { backend }
	}

	/// Connects to the database named by `url`.
	///
	/// The scheme selects the backend: `sqlite:`, `postgres:` (or
	/// `postgresql:`) and `mysql:` are supported.
	pub async fn connect(url: &str) -> SeedResult<Self> {
		let scheme = url.split(':').next().unwrap_or_default();
		match scheme {
			#[cfg(feature = "sqlite")]
			"sqlite" => {
				let pool = sqlx::SqlitePool::connect(url).await?;
				Ok(Self::new(Arc::new(sqlite::SqliteBackend::new(pool))))
			}
			#[cfg(feature = "postgres")]
			"postgres" | "postgresql" => {
				let pool = sqlx::PgPool::connect(url).await?;
				Ok(Self::new(Arc::new(postgres::PostgresBackend::new(pool))))
			}
			#[cfg(feature = "mysql")]
			"mysql" => {
				let pool = sqlx::MySqlPool::connect(url).await?;
				Ok(Self::new(Arc::new(mysql::MySqlBackend::new(pool))))
			}
			_ => Err(SeedError::UnsupportedDatabase(url.to_string())),
		}
	}

	#[cfg(feature = "sqlite")]
	pub fn from_sqlite_pool(pool: sqlx::SqlitePool) -> Self {
		Self::new(Arc::new(sqlite::SqliteBackend::new(pool)))
	}

	pub fn backend(&self) -> Arc<dyn DatabaseBackend> {
		self.backend.clone()
	}

	pub fn database_type(&self) -> DatabaseType {
		self.backend.database_type()
	}

	pub async fn table_exists(&self, table: &str) -> SeedResult<bool> {
		self.backend.table_exists(table).await
	}

	pub async fn column_names(&self, table: &str) -> SeedResult<Vec<String>> {
		self.backend.column_names(table).await
	}

	pub async fn table_names(&self) -> SeedResult<Vec<String>> {
		self.backend.table_names().await
	}

	pub async fn fetch_rows(&self, table: &str, opts: &FetchOptions) -> SeedResult<Vec<Row>> {
		self.backend.fetch_rows(table, opts).await
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use rstest::rstest;

	#[rstest]
	fn test_row_preserves_insertion_order() {
		let mut row = Row::new();
		row.push("id", SqlValue::Int(1));
		row.push("name", SqlValue::String("admin".to_string()));
		row.push("active", SqlValue::Bool(true));

		let names: Vec<&str> = row.iter().map(|(name, _)| name.as_str()).collect();
		assert_eq!(names, vec!["id", "name", "active"]);
		assert_eq!(row.get("name"), Some(&SqlValue::String("admin".to_string())));
	}

	#[rstest]
	#[tokio::test]
	async fn test_connect_rejects_unknown_scheme() {
		let result = DatabaseConnection::connect("redis://localhost").await;
		assert!(matches!(result, Err(SeedError::UnsupportedDatabase(_))));
	}
}
