//! DatabaseSeeder.php patcher.
//!
//! The registry file is modeled as head / marker span / tail instead of
//! being rewritten through blind pattern substitution: everything outside
//! the span is carried through byte-for-byte, and the span itself stays
//! compatible with the `#iseed_start` / `#iseed_end` comments other
//! tooling already recognizes. Files without markers fall back to an
//! insertion before the closing brace of `run()`.

use std::path::{Path, PathBuf};

use crate::config::SeedConfig;
use crate::error::SeedResult;
use crate::literal::INDENT;

/// Start marker comment inside the registry's `run()` method.
pub const MARKER_START: &str = "#iseed_start";

/// End marker comment closing the managed span.
pub const MARKER_END: &str = "#iseed_end";

/// The registry file split at its marker span. `head` ends with the start
/// marker, `tail` begins with the end marker, `body` is everything
/// between.
struct MarkerSpan<'a> {
	head: &'a str,
	body: &'a str,
	tail: &'a str,
}

fn parse_markers(content: &str) -> Option<MarkerSpan<'_>> {
	let start = content.find(MARKER_START)?;
	let end = content.find(MARKER_END)?;
	if start >= end {
		return None;
	}
	let body_start = start + MARKER_START.len();
	Some(MarkerSpan {
		head: &content[..body_start],
		body: &content[body_start..end],
		tail: &content[end..],
	})
}

/// Patches seeder registrations into the registry file.
#[derive(Debug, Clone)]
pub struct SeederRegistry {
	path: PathBuf,
	enabled: bool,
}

impl SeederRegistry {
	pub fn new(path: impl Into<PathBuf>, enabled: bool) -> Self {
		Self {
			path: path.into(),
			enabled,
		}
	}

	pub fn from_config(config: &SeedConfig) -> Self {
		Self::new(config.seeder_path(), config.seeder_modification)
	}

	pub fn path(&self) -> &Path {
		&self.path
	}

	/// Registers `class_name` in the registry file.
	///
	/// Returns `Ok(false)` without touching the file when patching is
	/// disabled. When the registration already exists the content is
	/// rewritten unchanged, so repeated calls leave exactly one entry.
	pub fn register(&self, class_name: &str) -> SeedResult<bool> {
		if !self.enabled {
			return Ok(false);
		}

		let content = std::fs::read_to_string(&self.path)?;
		let call = format!("$this->call({class_name}::class)");

		let patched = if content.contains(&call) {
			content
		} else if let Some(span) = parse_markers(&content) {
			format!(
				"{}{}{};\n{}{}",
				span.head,
				span.body,
				call,
				INDENT.repeat(2),
				span.tail
			)
		} else {
			Self::insert_into_run_method(&content, &call)
		};

		std::fs::write(&self.path, patched)?;
		Ok(true)
	}

	/// Inserts the call before the first closing brace after `run()`.
	/// Content without a `run()` method is left unchanged.
	fn insert_into_run_method(content: &str, call: &str) -> String {
		let Some(run_at) = content.find("run()") else {
			return content.to_string();
		};
		let Some(brace_offset) = content[run_at..].find('}') else {
			return content.to_string();
		};
		let brace_at = run_at + brace_offset;
		format!(
			"{}{}{};\n{}{}",
			&content[..brace_at],
			INDENT,
			call,
			INDENT,
			&content[brace_at..]
		)
	}

	/// Resets the span between the markers to empty, keeping the markers
	/// and everything outside the span untouched.
	pub fn clean_section(&self) -> SeedResult<bool> {
		let content = std::fs::read_to_string(&self.path)?;
		let cleaned = match parse_markers(&content) {
			Some(span) => format!("{}\n{}{}", span.head, INDENT.repeat(2), span.tail),
			None => content,
		};
		std::fs::write(&self.path, cleaned)?;
		Ok(true)
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use rstest::rstest;
	use tempfile::tempdir;

	const SEEDER_WITH_MARKERS: &str = "<?php

namespace Database\\Seeders;

use Illuminate\\Database\\Seeder;

class DatabaseSeeder extends Seeder
{
    public function run()
    {
        #iseed_start
        #iseed_end
    }
}
";

	const SEEDER_WITHOUT_MARKERS: &str = "<?php

class DatabaseSeeder extends Seeder
{
    public function run()
    {
    }
}
";

	fn write_registry(content: &str) -> (tempfile::TempDir, SeederRegistry) {
		let dir = tempdir().unwrap();
		let path = dir.path().join("DatabaseSeeder.php");
		std::fs::write(&path, content).unwrap();
		(dir, SeederRegistry::new(path, true))
	}

	#[rstest]
	fn test_register_inserts_before_end_marker() {
		let (_dir, registry) = write_registry(SEEDER_WITH_MARKERS);
		assert!(registry.register("UsersTableSeeder").unwrap());

		let content = std::fs::read_to_string(registry.path()).unwrap();
		let start = content.find(MARKER_START).unwrap();
		let call = content.find("$this->call(UsersTableSeeder::class);").unwrap();
		let end = content.find(MARKER_END).unwrap();
		assert!(start < call && call < end);
	}

	#[rstest]
	fn test_register_twice_keeps_one_entry() {
		let (_dir, registry) = write_registry(SEEDER_WITH_MARKERS);
		registry.register("FooSeeder").unwrap();
		registry.register("FooSeeder").unwrap();

		let content = std::fs::read_to_string(registry.path()).unwrap();
		assert_eq!(content.matches("$this->call(FooSeeder::class);").count(), 1);
	}

	#[rstest]
	fn test_register_preserves_outside_span() {
		let (_dir, registry) = write_registry(SEEDER_WITH_MARKERS);
		registry.register("FooSeeder").unwrap();

		let content = std::fs::read_to_string(registry.path()).unwrap();
		let original_head = &SEEDER_WITH_MARKERS[..SEEDER_WITH_MARKERS
			.find(MARKER_START)
			.unwrap()];
		assert!(content.starts_with(original_head));
		assert!(content.ends_with("#iseed_end\n    }\n}\n"));
	}

	#[rstest]
	fn test_register_falls_back_to_run_method() {
		let (_dir, registry) = write_registry(SEEDER_WITHOUT_MARKERS);
		registry.register("BarSeeder").unwrap();

		let content = std::fs::read_to_string(registry.path()).unwrap();
		assert!(content.contains("$this->call(BarSeeder::class);"));
		let call_at = content.find("$this->call").unwrap();
		let run_at = content.find("run()").unwrap();
		assert!(run_at < call_at);
	}

	#[rstest]
	fn test_register_disabled_is_noop() {
		let dir = tempdir().unwrap();
		let path = dir.path().join("DatabaseSeeder.php");
		std::fs::write(&path, SEEDER_WITH_MARKERS).unwrap();
		let registry = SeederRegistry::new(&path, false);

		assert!(!registry.register("FooSeeder").unwrap());
		let content = std::fs::read_to_string(&path).unwrap();
		assert_eq!(content, SEEDER_WITH_MARKERS);
	}

	#[rstest]
	fn test_clean_section_then_register_restores_single_entry() {
		let (_dir, registry) = write_registry(SEEDER_WITH_MARKERS);
		registry.register("FooSeeder").unwrap();
		registry.register("BarSeeder").unwrap();
		let before_clean = std::fs::read_to_string(registry.path()).unwrap();

		registry.clean_section().unwrap();
		let cleaned = std::fs::read_to_string(registry.path()).unwrap();
		assert!(!cleaned.contains("$this->call"));
		assert!(cleaned.contains(MARKER_START));
		assert!(cleaned.contains(MARKER_END));

		registry.register("FooSeeder").unwrap();
		let content = std::fs::read_to_string(registry.path()).unwrap();
		assert_eq!(content.matches("$this->call(FooSeeder::class);").count(), 1);

		// Bytes outside the span survive the whole round trip.
		let head_end = before_clean.find(MARKER_START).unwrap();
		assert_eq!(&content[..head_end], &before_clean[..head_end]);
	}

	#[rstest]
	fn test_markers_out_of_order_use_fallback() {
		let reversed = "<?php\nclass DatabaseSeeder {\n    public function run()\n    {\n        #iseed_end\n        #iseed_start\n    }\n}\n";
		let (_dir, registry) = write_registry(reversed);
		registry.register("FooSeeder").unwrap();

		let content = std::fs::read_to_string(registry.path()).unwrap();
		// Inserted via the run() fallback, before the first closing brace.
		let call_at = content.find("$this->call(FooSeeder::class);").unwrap();
		let end_marker_at = content.find(MARKER_END).unwrap();
		assert!(call_at > end_marker_at);
	}
}
