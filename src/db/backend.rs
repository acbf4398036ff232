//! Backend trait shared by the concrete database drivers.

use async_trait::async_trait;

use super::{DatabaseType, Row};
use crate::error::SeedResult;

/// Sort order for the fetch query.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortDirection {
	#[default]
	Asc,
	Desc,
}

impl SortDirection {
	pub fn as_sql(&self) -> &'static str {
		match self {
			SortDirection::Asc => "ASC",
			SortDirection::Desc => "DESC",
		}
	}
}

impl std::str::FromStr for SortDirection {
	type Err = String;

	fn from_str(s: &str) -> Result<Self, Self::Err> {
		match s.to_ascii_uppercase().as_str() {
			"ASC" => Ok(SortDirection::Asc),
			"DESC" => Ok(SortDirection::Desc),
			other => Err(format!("invalid sort direction: {other}")),
		}
	}
}

/// Options for a single fetch. The fetch executes once; there is no
/// pagination loop.
#[derive(Debug, Clone, Default)]
pub struct FetchOptions {
	/// Explicit projection. `None` selects every column.
	pub columns: Option<Vec<String>>,

	/// Column to order by, with [`direction`](Self::direction).
	pub order_by: Option<String>,

	pub direction: SortDirection,

	/// Row cap. `None` means unlimited.
	pub limit: Option<u64>,
}

/// Driver-specific operations needed by the generation pipeline.
#[async_trait]
pub trait DatabaseBackend: Send + Sync {
	fn database_type(&self) -> DatabaseType;

	/// Quotes an identifier for this backend's SQL dialect.
	fn quote_ident(&self, ident: &str) -> String;

	/// Whether `table` exists on this connection.
	async fn table_exists(&self, table: &str) -> SeedResult<bool>;

	/// Column names of `table`, in schema order.
	async fn column_names(&self, table: &str) -> SeedResult<Vec<String>>;

	/// Names of all user tables on this connection.
	async fn table_names(&self) -> SeedResult<Vec<String>>;

	/// Fetches rows from `table` according to `opts`.
	async fn fetch_rows(&self, table: &str, opts: &FetchOptions) -> SeedResult<Vec<Row>>;

	/// Builds the SELECT statement for [`fetch_rows`](Self::fetch_rows).
	fn build_select(&self, table: &str, opts: &FetchOptions) -> String {
		let projection = match &opts.columns {
			Some(columns) if !columns.is_empty() => columns
				.iter()
				.map(|column| self.quote_ident(column))
				.collect::<Vec<_>>()
				.join(", "),
			_ => "*".to_string(),
		};

		let mut sql = format!("SELECT {} FROM {}", projection, self.quote_ident(table));

		if let Some(order_by) = &opts.order_by {
			sql.push_str(&format!(
				" ORDER BY {} {}",
				self.quote_ident(order_by),
				opts.direction.as_sql()
			));
		}

		if let Some(limit) = opts.limit {
			sql.push_str(&format!(" LIMIT {limit}"));
		}

		sql
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use rstest::rstest;

	struct DummyBackend;

	#[async_trait]
	impl DatabaseBackend for DummyBackend {
		fn database_type(&self) -> DatabaseType {
			#[cfg(feature = "sqlite")]
			return DatabaseType::Sqlite;
			#[cfg(not(feature = "sqlite"))]
			unimplemented!()
		}

		fn quote_ident(&self, ident: &str) -> String {
			format!("\"{}\"", ident)
		}

		async fn table_exists(&self, _table: &str) -> SeedResult<bool> {
			Ok(true)
		}

		async fn column_names(&self, _table: &str) -> SeedResult<Vec<String>> {
			Ok(vec![])
		}

		async fn table_names(&self) -> SeedResult<Vec<String>> {
			Ok(vec![])
		}

		async fn fetch_rows(&self, _table: &str, _opts: &FetchOptions) -> SeedResult<Vec<Row>> {
			Ok(vec![])
		}
	}

	#[rstest]
	fn test_build_select_all_columns() {
		let sql = DummyBackend.build_select("users", &FetchOptions::default());
		assert_eq!(sql, "SELECT * FROM \"users\"");
	}

	#[rstest]
	fn test_build_select_projection_order_limit() {
		let opts = FetchOptions {
			columns: Some(vec!["id".to_string(), "name".to_string()]),
			order_by: Some("id".to_string()),
			direction: SortDirection::Desc,
			limit: Some(10),
		};
		let sql = DummyBackend.build_select("users", &opts);
		assert_eq!(
			sql,
			"SELECT \"id\", \"name\" FROM \"users\" ORDER BY \"id\" DESC LIMIT 10"
		);
	}

	#[rstest]
	fn test_sort_direction_parse() {
		assert_eq!("desc".parse::<SortDirection>().unwrap(), SortDirection::Desc);
		assert_eq!("ASC".parse::<SortDirection>().unwrap(), SortDirection::Asc);
		assert!("sideways".parse::<SortDirection>().is_err());
	}
}
