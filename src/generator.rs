//! Seed generation pipeline.
//!
//! Orchestrates one generation: existence check, data fetch, repack,
//! class-name derivation, stub population, file write and registry patch.

use std::path::PathBuf;

use tracing::{debug, info};

use crate::config::SeedConfig;
use crate::db::{DatabaseConnection, FetchOptions, SortDirection};
use crate::error::{SeedError, SeedResult};
use crate::registry::SeederRegistry;
use crate::stub::{StubParams, load_stub, populate_stub};

/// Derives the seeder class name for a table.
///
/// The table name is split on underscores, each segment gets its first
/// character uppercased, and the segments are concatenated and wrapped
/// as `<prefix><Segments>Table<suffix>Seeder`.
pub fn seeder_class_name(table: &str, prefix: Option<&str>, suffix: Option<&str>) -> String {
	let mut name = String::new();
	if let Some(prefix) = prefix {
		name.push_str(prefix);
	}
	for segment in table.split('_') {
		let mut chars = segment.chars();
		if let Some(first) = chars.next() {
			name.extend(first.to_uppercase());
			name.push_str(chars.as_str());
		}
	}
	name.push_str("Table");
	if let Some(suffix) = suffix {
		name.push_str(suffix);
	}
	name.push_str("Seeder");
	name
}

/// Options for one table generation.
#[derive(Debug, Clone)]
pub struct GenerateOptions {
	/// Source table name.
	pub table: String,

	/// Class-name prefix.
	pub prefix: Option<String>,

	/// Class-name suffix, inserted before the trailing `Seeder`.
	pub suffix: Option<String>,

	/// Connection alias. `None` selects the configured default.
	pub database: Option<String>,

	/// Row cap. `None` or zero means unlimited.
	pub max_rows: Option<u64>,

	/// Rows per insert statement. `None` or zero selects the config
	/// default.
	pub chunk_size: Option<usize>,

	/// Columns left out of the projection.
	pub exclude: Vec<String>,

	/// Event fired before the inserts run.
	pub prerun_event: Option<String>,

	/// Event fired after the inserts run.
	pub postrun_event: Option<String>,

	/// Whether rows carry explicit integer indexes.
	pub indexed: bool,

	/// Column to order by.
	pub order_by: Option<String>,

	pub direction: SortDirection,
}

impl GenerateOptions {
	pub fn new(table: impl Into<String>) -> Self {
		Self {
			table: table.into(),
			prefix: None,
			suffix: None,
			database: None,
			max_rows: None,
			chunk_size: None,
			exclude: Vec::new(),
			prerun_event: None,
			postrun_event: None,
			indexed: true,
			order_by: None,
			direction: SortDirection::Asc,
		}
	}

	pub fn with_prefix(mut self, prefix: impl Into<String>) -> Self {
		self.prefix = Some(prefix.into());
		self
	}

	pub fn with_suffix(mut self, suffix: impl Into<String>) -> Self {
		self.suffix = Some(suffix.into());
		self
	}

	pub fn with_database(mut self, alias: impl Into<String>) -> Self {
		self.database = Some(alias.into());
		self
	}

	pub fn with_max_rows(mut self, max: u64) -> Self {
		self.max_rows = Some(max);
		self
	}

	pub fn with_chunk_size(mut self, chunk_size: usize) -> Self {
		self.chunk_size = Some(chunk_size);
		self
	}

	pub fn with_exclude(mut self, columns: Vec<String>) -> Self {
		self.exclude = columns;
		self
	}

	pub fn with_prerun_event(mut self, event: impl Into<String>) -> Self {
		self.prerun_event = Some(event.into());
		self
	}

	pub fn with_postrun_event(mut self, event: impl Into<String>) -> Self {
		self.postrun_event = Some(event.into());
		self
	}

	pub fn with_indexed(mut self, indexed: bool) -> Self {
		self.indexed = indexed;
		self
	}

	pub fn with_order_by(mut self, column: impl Into<String>, direction: SortDirection) -> Self {
		self.order_by = Some(column.into());
		self.direction = direction;
		self
	}
}

/// Result of one successful generation.
#[derive(Debug, Clone)]
pub struct GenerateOutcome {
	pub class_name: String,
	pub file_path: PathBuf,
	pub row_count: usize,
	/// Whether the registry file was rewritten. `false` when patching is
	/// disabled by configuration.
	pub registry_updated: bool,
}

/// Generates seeder classes from database tables.
pub struct SeedGenerator {
	config: SeedConfig,
}

impl SeedGenerator {
	pub fn new(config: SeedConfig) -> Self {
		Self { config }
	}

	pub fn config(&self) -> &SeedConfig {
		&self.config
	}

	/// Opens the connection named by `alias`, or the configured default.
	pub async fn connect(&self, alias: Option<&str>) -> SeedResult<DatabaseConnection> {
		let url = self.config.database_url(alias)?;
		DatabaseConnection::connect(url).await
	}

	/// Runs the full pipeline for one table on an open connection.
	///
	/// The table must exist before any data is read or any file is
	/// written. The seed file write and the registry patch are
	/// independent side effects: a registry failure does not undo the
	/// written seed file.
	pub async fn generate(
		&self,
		conn: &DatabaseConnection,
		opts: &GenerateOptions,
	) -> SeedResult<GenerateOutcome> {
		if !conn.table_exists(&opts.table).await? {
			return Err(SeedError::TableNotFound(opts.table.clone()));
		}

		let rows = conn.fetch_rows(&opts.table, &self.fetch_options(conn, opts).await?).await?;
		debug!(table = %opts.table, rows = rows.len(), "fetched rows");

		let class_name = seeder_class_name(
			&opts.table,
			opts.prefix.as_deref(),
			opts.suffix.as_deref(),
		);

		let stub = load_stub(self.config.stub_path.as_deref())?;
		let chunk_size = opts
			.chunk_size
			.filter(|&size| size > 0)
			.unwrap_or(self.config.chunk_size);

		let content = populate_stub(
			&stub,
			&StubParams {
				class_name: &class_name,
				table: Some(&opts.table),
				rows: &rows,
				chunk_size,
				prerun_event: opts.prerun_event.as_deref(),
				postrun_event: opts.postrun_event.as_deref(),
				indexed: opts.indexed,
				insert_command: &self.config.insert_command,
			},
		)?;

		std::fs::create_dir_all(&self.config.path)?;
		let file_path = self.seed_file_path(&class_name);
		std::fs::write(&file_path, content)?;
		info!(class = %class_name, path = %file_path.display(), "seed file written");

		let registry_updated = SeederRegistry::from_config(&self.config).register(&class_name)?;

		Ok(GenerateOutcome {
			class_name,
			file_path,
			row_count: rows.len(),
			registry_updated,
		})
	}

	/// Path of the seed file generated for `class_name`.
	pub fn seed_file_path(&self, class_name: &str) -> PathBuf {
		self.config.path.join(format!("{class_name}.php"))
	}

	/// Builds the fetch options: the projection is the full column list
	/// minus the excluded names, in schema order, and only when an
	/// exclusion is requested.
	async fn fetch_options(
		&self,
		conn: &DatabaseConnection,
		opts: &GenerateOptions,
	) -> SeedResult<FetchOptions> {
		let columns = if opts.exclude.is_empty() {
			None
		} else {
			let all = conn.column_names(&opts.table).await?;
			Some(
				all.into_iter()
					.filter(|column| !opts.exclude.contains(column))
					.collect(),
			)
		};

		Ok(FetchOptions {
			columns,
			order_by: opts.order_by.clone(),
			direction: opts.direction,
			limit: opts.max_rows.filter(|&max| max > 0),
		})
	}
}
