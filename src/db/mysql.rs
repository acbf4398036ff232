//! MySQL backend.

use async_trait::async_trait;
use sqlx::{Column, MySqlPool, Row as SqlxRow, mysql::MySqlRow};
use std::sync::Arc;

use super::{DatabaseBackend, DatabaseType, FetchOptions, Row, SqlValue};
use crate::error::SeedResult;

pub struct MySqlBackend {
	pool: Arc<MySqlPool>,
}

impl MySqlBackend {
	pub fn new(pool: MySqlPool) -> Self {
		Self {
			pool: Arc::new(pool),
		}
	}

	pub fn pool(&self) -> &MySqlPool {
		&self.pool
	}

	fn convert_row(mysql_row: &MySqlRow) -> Row {
		let mut row = Row::new();
		for (index, column) in mysql_row.columns().iter().enumerate() {
			let name = column.name().to_string();
			let value = if let Ok(v) = mysql_row.try_get::<Option<bool>, _>(index) {
				v.map_or(SqlValue::Null, SqlValue::Bool)
			} else if let Ok(v) = mysql_row.try_get::<Option<i64>, _>(index) {
				v.map_or(SqlValue::Null, SqlValue::Int)
			} else if let Ok(v) = mysql_row.try_get::<Option<u64>, _>(index) {
				v.map_or(SqlValue::Null, |i| SqlValue::Int(i as i64))
			} else if let Ok(v) = mysql_row.try_get::<Option<f64>, _>(index) {
				v.map_or(SqlValue::Null, SqlValue::Float)
			} else if let Ok(v) = mysql_row.try_get::<Option<String>, _>(index) {
				v.map_or(SqlValue::Null, SqlValue::String)
			} else if let Ok(v) = mysql_row.try_get::<Option<Vec<u8>>, _>(index) {
				v.map_or(SqlValue::Null, SqlValue::Bytes)
			} else if let Ok(v) = mysql_row.try_get::<Option<chrono::NaiveDateTime>, _>(index) {
				v.map_or(SqlValue::Null, |dt| {
					SqlValue::Timestamp(chrono::DateTime::from_naive_utc_and_offset(
						dt,
						chrono::Utc,
					))
				})
			} else if let Ok(v) =
				mysql_row.try_get::<Option<chrono::DateTime<chrono::Utc>>, _>(index)
			{
				v.map_or(SqlValue::Null, SqlValue::Timestamp)
			} else {
				SqlValue::Null
			};
			row.push(name, value);
		}
		row
	}
}

#[async_trait]
impl DatabaseBackend for MySqlBackend {
	fn database_type(&self) -> DatabaseType {
		DatabaseType::Mysql
	}

	fn quote_ident(&self, ident: &str) -> String {
		format!("`{}`", ident.replace('`', "``"))
	}

	async fn table_exists(&self, table: &str) -> SeedResult<bool> {
		let row: Option<(String,)> = sqlx::query_as(
			"SELECT table_name FROM information_schema.tables \
			 WHERE table_schema = DATABASE() AND table_name = ?",
		)
		.bind(table)
		.fetch_optional(&*self.pool)
		.await?;
		Ok(row.is_some())
	}

	async fn column_names(&self, table: &str) -> SeedResult<Vec<String>> {
		let rows: Vec<(String,)> = sqlx::query_as(
			"SELECT column_name FROM information_schema.columns \
			 WHERE table_schema = DATABASE() AND table_name = ? \
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
			 WHERE table_schema = DATABASE() AND table_type = 'BASE TABLE' \
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
