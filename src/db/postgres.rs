//! PostgreSQL backend.

use async_trait::async_trait;
use sqlx::{Column, PgPool, Row as SqlxRow, postgres::PgRow};
use std::sync::Arc;

use super::{DatabaseBackend, DatabaseType, FetchOptions, Row, SqlValue};
use crate::error::SeedResult;

pub struct PostgresBackend {
	pool: Arc<PgPool>,
}

impl PostgresBackend {
	pub fn new(pool: PgPool) -> Self {
		Self {
			pool: Arc::new(pool),
		}
	}

	pub fn pool(&self) -> &PgPool {
		&self.pool
	}

	fn convert_row(pg_row: &PgRow) -> Row {
		let mut row = Row::new();
		for (index, column) in pg_row.columns().iter().enumerate() {
			let name = column.name().to_string();
			let value = if let Ok(v) = pg_row.try_get::<Option<bool>, _>(index) {
				v.map_or(SqlValue::Null, SqlValue::Bool)
			} else if let Ok(v) = pg_row.try_get::<Option<i16>, _>(index) {
				v.map_or(SqlValue::Null, |i| SqlValue::Int(i as i64))
			} else if let Ok(v) = pg_row.try_get::<Option<i32>, _>(index) {
				v.map_or(SqlValue::Null, |i| SqlValue::Int(i as i64))
			} else if let Ok(v) = pg_row.try_get::<Option<i64>, _>(index) {
				v.map_or(SqlValue::Null, SqlValue::Int)
			} else if let Ok(v) = pg_row.try_get::<Option<f32>, _>(index) {
				v.map_or(SqlValue::Null, |f| SqlValue::Float(f as f64))
			} else if let Ok(v) = pg_row.try_get::<Option<f64>, _>(index) {
				v.map_or(SqlValue::Null, SqlValue::Float)
			} else if let Ok(v) = pg_row.try_get::<Option<String>, _>(index) {
				v.map_or(SqlValue::Null, SqlValue::String)
			} else if let Ok(v) = pg_row.try_get::<Option<Vec<u8>>, _>(index) {
				v.map_or(SqlValue::Null, SqlValue::Bytes)
			} else if let Ok(v) = pg_row.try_get::<Option<chrono::DateTime<chrono::Utc>>, _>(index)
			{
				v.map_or(SqlValue::Null, SqlValue::Timestamp)
			} else if let Ok(v) = pg_row.try_get::<Option<chrono::NaiveDateTime>, _>(index) {
				v.map_or(SqlValue::Null, |dt| {
					SqlValue::Timestamp(chrono::DateTime::from_naive_utc_and_offset(
						dt,
						chrono::Utc,
					))
				})
			} else {
				SqlValue::Null
			};
			row.push(name, value);
		}
		row
	}
}

#[async_trait]
impl DatabaseBackend for PostgresBackend {
	fn database_type(&self) -> DatabaseType {
		DatabaseType::Postgres
	}

	fn quote_ident(&self, ident: &str) -> String {
		format!("\"{}\"", ident.replace('"', "\"\""))
	}

	async fn table_exists(&self, table: &str) -> SeedResult<bool> {
		let (exists,): (bool,) = sqlx::query_as(
			"SELECT EXISTS (SELECT 1 FROM information_schema.tables \
			 WHERE table_schema = 'public' AND table_name = $1)",
		)
		.bind(table)
		.fetch_one(&*self.pool)
		.await?;
		Ok(exists)
	}

	async fn column_names(&self, table: &str) -> SeedResult<Vec<String>> {
		let rows: Vec<(String,)> = sqlx::query_as(
			"SELECT column_name FROM information_schema.columns \
			 WHERE table_schema = 'public' AND table_name = $1 \
			 ORDER BY ordinal_position",
		)
		.bind(table)
		.fetch_all(&*self.pool)
		.await?;
		Ok(rows.into_iter().map(|(name,)| name).collect())
	}

	async fn table_names(&self) -> SeedResult<Vec<String>> {
		let rows: Vec<(String,)> = sqlx::query_as(
			"SELECT table_name FROM information_schema.tables \
			 WHERE table_schema = 'public' AND table_type = 'BASE TABLE' \
			 ORDER BY table_name",
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
