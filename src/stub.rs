//! Stub template loading and placeholder substitution.
//!
//! The stub is plain text with `{{ name }}` placeholders. Substitution
//! happens in a single pass over the template, so substituted values are
//! never re-scanned: a class or table name containing a placeholder token
//! cannot corrupt the output.

use std::path::Path;
use std::sync::LazyLock;

use regex::{Captures, Regex};

use crate::db::Row;
use crate::error::{SeedError, SeedResult};
use crate::literal::{INDENT, serialize_chunk};

/// Built-in seeder template.
pub const DEFAULT_STUB: &str = include_str!("../stubs/seed.stub");

static PLACEHOLDER: LazyLock<Regex> =
	LazyLock::new(|| Regex::new(r"\{\{\s*(\w+)\s*\}\}").expect("placeholder pattern"));

/// Inputs for one stub population.
#[derive(Debug, Clone)]
pub struct StubParams<'a> {
	pub class_name: &'a str,
	pub table: Option<&'a str>,
	pub rows: &'a [Row],
	pub chunk_size: usize,
	pub prerun_event: Option<&'a str>,
	pub postrun_event: Option<&'a str>,
	pub indexed: bool,
	pub insert_command: &'a str,
}

/// Loads the stub text: the configured override when it exists on disk,
/// the embedded default otherwise.
pub fn load_stub(stub_path: Option<&Path>) -> SeedResult<String> {
	match stub_path {
		Some(path) if path.exists() => Ok(std::fs::read_to_string(path)?),
		_ => Ok(DEFAULT_STUB.to_string()),
	}
}

/// Splices the table name and serialized rows into the configured insert
/// command.
///
/// The command must carry exactly two `%s` sites. They are filled
/// positionally from a single split, so neither inserted value is
/// re-scanned for further sites.
pub fn format_insert(insert_command: &str, table: &str, literal: &str) -> SeedResult<String> {
	let parts: Vec<&str> = insert_command.split("%s").collect();
	if parts.len() != 3 {
		return Err(SeedError::InvalidInsertCommand(format!(
			"expected exactly two %s sites in {insert_command:?}"
		)));
	}
	Ok(format!(
		"{}{}{}{}{}",
		parts[0], table, parts[1], literal, parts[2]
	))
}

/// Builds the full insert-statement block: one statement per chunk, each
/// preceded by a newline and two indent units.
pub fn build_inserts(params: &StubParams) -> SeedResult<String> {
	let chunk_size = params.chunk_size.max(1);
	let table = params.table.unwrap_or_default();

	let mut inserts = String::new();
	for chunk in params.rows.chunks(chunk_size) {
		let literal = serialize_chunk(chunk, params.indexed);
		inserts.push('\n');
		inserts.push_str(&INDENT.repeat(2));
		inserts.push_str(&format_insert(params.insert_command, table, &literal)?);
	}
	Ok(inserts)
}

fn event_guard(event: &str, failure_message: &str) -> String {
	let mut guard = format!("$response = Event::until(new {event}());");
	guard.push('\n');
	guard.push_str(&INDENT.repeat(2));
	guard.push_str("if ($response === false) {");
	guard.push('\n');
	guard.push_str(&INDENT.repeat(3));
	guard.push_str(&format!("throw new Exception(\"{failure_message}\");"));
	guard.push('\n');
	guard.push_str(&INDENT.repeat(2));
	guard.push('}');
	guard
}

/// Populates the stub template.
///
/// Known placeholders are `class`, `table`, `prerun_event`,
/// `postrun_event` and `insert_statements`. A placeholder missing from
/// the template is silently ignored; an unknown placeholder name is left
/// verbatim. `table` is only substituted when a table name is present.
pub fn populate_stub(stub: &str, params: &StubParams) -> SeedResult<String> {
	let inserts = build_inserts(params)?;

	let prerun = params
		.prerun_event
		.map(|event| event_guard(event, "Prerun event failed, seed wasn't executed!"))
		.unwrap_or_default();
	let postrun = params
		.postrun_event
		.map(|event| event_guard(event, "Seed was executed but the postrun event failed!"))
		.unwrap_or_default();

	let populated = PLACEHOLDER.replace_all(stub, |caps: &Captures| match &caps[1] {
		"class" => params.class_name.to_string(),
		"table" => match params.table {
			Some(table) => table.to_string(),
			None => caps[0].to_string(),
		},
		"prerun_event" => prerun.clone(),
		"postrun_event" => postrun.clone(),
		"insert_statements" => inserts.clone(),
		_ => caps[0].to_string(),
	});

	Ok(populated.into_owned())
}
