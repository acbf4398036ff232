//! SQLite backend.

use async_trait::async_trait;
use sqlx::{Column, Row as SqlxRow, SqlitePool, TypeInfo, sqlite::SqliteRow};
use std::sync::Arc;

use super::{DatabaseBackend, DatabaseType, FetchOptions, Row, SqlValue};
use crate::error::SeedResult;

pub struct SqliteBackend {
	pool: Arc<SqlitePool>,
}

impl SqliteBackend {
	pub fn new(pool: SqlitePool) -> Self {
		Self {
			pool: Arc::new(pool),
		}
	}

	pub fn pool(&self) -> &SqlitePool {
		&self.pool
	}

	fn convert_row(sqlite_row: &SqliteRow) -> Row {
		let mut row = Row::new();
		for (index, column) in sqlite_row.columns().iter().enumerate() {
			let name = column.name().to_string();
			let type_name = column.type_info().name().to_uppercase();

			// SQLite stores booleans as integers, so the declared column
			// type decides whether 0/1 comes back as Bool or Int.
			let value = if let Ok(Some(v)) = sqlite_row.try_get::<Option<i64>, _>(index) {
				if type_name.contains("BOOL") {
					SqlValue::Bool(v != 0)
				} else {
					SqlValue::Int(v)
				}
			} else if let Ok(Some(v)) = sqlite_row.try_get::<Option<f64>, _>(index) {
				SqlValue::Float(v)
			} else if let Ok(Some(v)) = sqlite_row.try_get::<Option<String>, _>(index) {
				SqlValue::String(v)
			} else if let Ok(Some(v)) = sqlite_row.try_get::<Option<Vec<u8>>, _>(index) {
				SqlValue::Bytes(v)
			} else if let Ok(Some(v)) =
				sqlite_row.try_get::<Option<chrono::NaiveDateTime>, _>(index)
			{
				SqlValue::Timestamp(chrono::DateTime::from_naive_utc_and_offset(v, chrono::Utc))
			} else {
				SqlValue::Null
			};
			row.push(name, value);
		}
		row
	}
}

#[async_trait]
impl DatabaseBackend for SqliteBackend {
	fn database_type(&self) -> DatabaseType {
		DatabaseType::Sqlite
	}

	fn quote_ident(&self, ident: &str) -> String {
		format!("\"{}\"", ident.replace('"', "\"\""))
	}

	async fn table_exists(&self, table: &str) -> SeedResult<bool> {
		let row: Option<(String,)> =
			sqlx::query_as("SELECT name FROM sqlite_master WHERE type = 'table' AND name = ?")
				.bind(table)
				.fetch_optional(&*self.pool)
				.await?;
		Ok(row.is_some())
	}

	async fn column_names(&self, table: &str) -> SeedResult<Vec<String>> {
		// PRAGMA arguments cannot be bound.
		let sql = format!("PRAGMA table_info({})", self.quote_ident(table));
		let rows = sqlx::query(&sql).fetch_all(&*self.pool).await?;
		Ok(rows
			.iter()
			.map(|row| row.get::<String, _>("name"))
			.collect())
	}

	async fn table_names(&self) -> SeedResult<Vec<String>> {
		let rows: Vec<(String,)> = sqlx::query_as(
			"SELECT name FROM sqlite_master WHERE type = 'table' \
			 AND name NOT LIKE 'sqlite_%' ORDER BY name",
		)
		.fetch_all(&*self.pool)
		.await?;
		Ok(rows.into_iter().map(|(name,)| name).collect())
	}

	async fn fetch_rows(&self, table: &str, opts: &FetchOptions) -> SeedResult<Vec<Row>> {
		let sql = self.build_select(table, opts);
		let rows = sqlx::query(&sql).fetch_all(&*self.pool).await?;
		Ok(rows.iter().map(Self::convert_row).collect())
	}
}
