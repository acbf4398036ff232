//! Command-line interface.

use anyhow::Context;
use clap::{Parser, Subcommand};
use colored::Colorize;
use tracing::warn;

use crate::config::SeedConfig;
use crate::db::{DatabaseConnection, SortDirection};
use crate::generator::{GenerateOptions, SeedGenerator, seeder_class_name};
use crate::registry::SeederRegistry;

#[derive(Parser)]
#[command(name = "laraseed")]
#[command(about = "Generate Laravel seeder classes from existing database tables")]
#[command(version)]
pub struct Cli {
	#[command(subcommand)]
	pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
	/// Generate seeders for one or more tables
	Generate {
		/// Comma-separated table names
		#[arg(value_name = "TABLES")]
		tables: String,

		/// Prefix prepended to the generated class names
		#[arg(long, value_name = "PREFIX")]
		classnameprefix: Option<String>,

		/// Suffix inserted before the trailing `Seeder`
		#[arg(long, value_name = "SUFFIX")]
		classnamesuffix: Option<String>,

		/// Connection alias from laraseed.toml
		#[arg(long, value_name = "ALIAS")]
		database: Option<String>,

		/// Maximum number of rows to fetch (0 = unlimited)
		#[arg(long, value_name = "N")]
		max: Option<u64>,

		/// Rows per insert statement (0 = config default)
		#[arg(long, value_name = "N")]
		chunksize: Option<usize>,

		/// Comma-separated columns to leave out
		#[arg(long, value_name = "COLUMNS")]
		exclude: Option<String>,

		/// Event fired before the inserts run
		#[arg(long, value_name = "EVENT")]
		prerunevent: Option<String>,

		/// Event fired after the inserts run
		#[arg(long, value_name = "EVENT")]
		postrunevent: Option<String>,

		/// Omit explicit row indexes from the generated arrays
		#[arg(long)]
		noindex: bool,

		/// Column to order the fetch by
		#[arg(long, value_name = "COLUMN")]
		orderby: Option<String>,

		/// Sort direction for --orderby (ASC or DESC)
		#[arg(long, default_value = "ASC", value_name = "DIR")]
		direction: String,

		/// Empty the registry marker span before generating
		#[arg(long)]
		clean: bool,

		/// Overwrite existing seed files
		#[arg(long)]
		force: bool,

		/// Run `composer dump-autoload` after generating
		#[arg(long, value_name = "BOOL", default_value_t = true, action = clap::ArgAction::Set)]
		dumpauto: bool,
	},

	/// Generate seeders for every table except the configured exclusions
	All {
		/// Connection alias from laraseed.toml
		#[arg(long, value_name = "ALIAS")]
		database: Option<String>,

		/// Overwrite existing seed files
		#[arg(long)]
		force: bool,
	},

	/// Reset the registry marker span to empty
	Clean,
}

/// Dispatches a parsed invocation.
pub async fn run(cli: Cli) -> anyhow::Result<()> {
	let config = SeedConfig::load().context("loading laraseed.toml")?;

	match cli.command {
		Commands::Generate {
			tables,
			classnameprefix,
			classnamesuffix,
			database,
			max,
			chunksize,
			exclude,
			prerunevent,
			postrunevent,
			noindex,
			orderby,
			direction,
			clean,
			force,
			dumpauto,
		} => {
			let direction: SortDirection = direction
				.parse()
				.map_err(|message: String| anyhow::anyhow!(message))?;

			if clean {
				SeederRegistry::from_config(&config).clean_section()?;
			}

			let generator = SeedGenerator::new(config);
			let conn = generator.connect(database.as_deref()).await?;

			for table in tables.split(',').map(str::trim).filter(|t| !t.is_empty()) {
				let mut opts = GenerateOptions::new(table).with_indexed(!noindex);
				opts.prefix = classnameprefix.clone();
				opts.suffix = classnamesuffix.clone();
				opts.database = database.clone();
				opts.max_rows = max;
				opts.chunk_size = chunksize;
				opts.prerun_event = prerunevent.clone();
				opts.postrun_event = postrunevent.clone();
				opts.order_by = orderby.clone();
				opts.direction = direction;
				if let Some(exclude) = &exclude {
					opts.exclude = exclude
						.split(',')
						.map(str::trim)
						.filter(|c| !c.is_empty())
						.map(String::from)
						.collect();
				}

				generate_one(&generator, &conn, &opts, force).await?;
			}

			if dumpauto {
				refresh_autoload();
			}
			Ok(())
		}

		Commands::All { database, force } => {
			let generator = SeedGenerator::new(config);
			let conn = generator.connect(database.as_deref()).await?;

			let skip = &generator.config().skip_tables;
			let tables: Vec<String> = conn
				.table_names()
				.await?
				.into_iter()
				.filter(|table| !skip.contains(table))
				.collect();

			println!(
				"Generating seeders for all tables except: {}",
				skip.join(", ")
			);

			let mut failures = 0usize;
			for table in &tables {
				let mut opts = GenerateOptions::new(table);
				opts.database = database.clone();
				// Per-table failures are reported and the batch goes on.
				if let Err(error) = generate_one(&generator, &conn, &opts, force).await {
					warn!(table = %table, %error, "generation failed");
					eprintln!("{} {table}: {error}", "Failed".red());
					failures += 1;
				}
			}

			if failures > 0 {
				anyhow::bail!("{failures} of {} tables failed", tables.len());
			}
			Ok(())
		}

		Commands::Clean => {
			SeederRegistry::from_config(&config).clean_section()?;
			println!("{} registry marker span reset", "Cleaned:".green());
			Ok(())
		}
	}
}

async fn generate_one(
	generator: &SeedGenerator,
	conn: &DatabaseConnection,
	opts: &GenerateOptions,
	force: bool,
) -> anyhow::Result<()> {
	let class_name = seeder_class_name(&opts.table, opts.prefix.as_deref(), opts.suffix.as_deref());
	let file_path = generator.seed_file_path(&class_name);

	if file_path.exists() && !force {
		println!(
			"{} {} already exists (use --force to overwrite)",
			"Skipped:".yellow(),
			file_path.display()
		);
		return Ok(());
	}

	let outcome = generator.generate(conn, opts).await?;
	println!(
		"{} {} ({} rows)",
		"Created:".green(),
		outcome.file_path.display(),
		outcome.row_count
	);
	Ok(())
}

/// Asks composer to refresh the project's autoload map so the generated
/// classes become visible. Failure is reported but never fatal.
fn refresh_autoload() {
	match std::process::Command::new("composer")
		.arg("dump-autoload")
		.status()
	{
		Ok(status) if status.success() => {}
		Ok(status) => warn!(%status, "composer dump-autoload failed"),
		Err(error) => warn!(%error, "composer dump-autoload could not run"),
	}
}
