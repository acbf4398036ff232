//! PHP array literal writer.
//!
//! Renders a chunk of rows as the nested `array(...)` literal that ends up
//! inside the generated seeder's insert call. Indentation is emitted while
//! recursing, so it always tracks structural nesting depth no matter what
//! bracket or quote characters appear inside string values.

use base64::Engine;
use base64::engine::general_purpose::STANDARD as BASE64;

use crate::db::{Row, SqlValue};

/// Indent unit of the generated PHP source.
pub const INDENT: &str = "    ";

/// Escapes a value for a single-quoted PHP string.
pub fn escape_php_string(value: &str) -> String {
	value.replace('\\', "\\\\").replace('\'', "\\'")
}

/// Renders one scalar as PHP source.
pub fn php_scalar(value: &SqlValue) -> String {
	match value {
		SqlValue::Null => "NULL".to_string(),
		SqlValue::Bool(b) => b.to_string(),
		SqlValue::Int(i) => i.to_string(),
		SqlValue::Float(f) => php_float(*f),
		SqlValue::String(s) => format!("'{}'", escape_php_string(s)),
		SqlValue::Bytes(b) => format!("base64_decode('{}')", BASE64.encode(b)),
		SqlValue::Timestamp(ts) => format!("'{}'", ts.format("%Y-%m-%d %H:%M:%S")),
	}
}

// A decimal point is forced so the regenerated value keeps float type.
fn php_float(f: f64) -> String {
	if f.is_nan() {
		return "NAN".to_string();
	}
	if f.is_infinite() {
		return if f > 0.0 { "INF" } else { "-INF" }.to_string();
	}
	let rendered = f.to_string();
	if rendered.contains('.') || rendered.contains('e') || rendered.contains('E') {
		rendered
	} else {
		format!("{rendered}.0")
	}
}

/// Serializes a chunk of rows as a PHP `array(...)` literal.
///
/// The opening `array(` carries no indent because it is spliced inline
/// into the insert statement. Row entries sit at three indent units and
/// their fields at four, so the literal lines up with a statement placed
/// at method-body depth; the final closer sits at two.
///
/// With `indexed` set, each row is prefixed with its explicit integer
/// index counting from zero; otherwise the index is omitted and the rows
/// remain an order-preserving list.
pub fn serialize_chunk(rows: &[Row], indexed: bool) -> String {
	let mut out = String::from("array(\n");
	for (index, row) in rows.iter().enumerate() {
		out.push_str(&INDENT.repeat(3));
		if indexed {
			out.push_str(&format!("{index} => array(\n"));
		} else {
			out.push_str("array(\n");
		}
		for (column, value) in row.iter() {
			out.push_str(&INDENT.repeat(4));
			out.push_str(&format!(
				"'{}' => {},\n",
				escape_php_string(column),
				php_scalar(value)
			));
		}
		out.push_str(&INDENT.repeat(3));
		out.push_str("),\n");
	}
	out.push_str(&INDENT.repeat(2));
	out.push(')');
	out
}

#[cfg(test)]
mod tests {
	use super::*;
	use rstest::rstest;

	fn sample_row() -> Row {
		let mut row = Row::new();
		row.push("id", SqlValue::Int(1));
		row.push("name", SqlValue::String("admin".to_string()));
		row
	}

	#[rstest]
	fn test_empty_chunk_is_empty_literal() {
		let literal = serialize_chunk(&[], true);
		assert_eq!(literal, "array(\n        )");
	}

	#[rstest]
	fn test_indexed_rows_count_from_zero() {
		let rows = vec![sample_row(), sample_row(), sample_row()];
		let literal = serialize_chunk(&rows, true);
		assert!(literal.contains("            0 => array("));
		assert!(literal.contains("            1 => array("));
		assert!(literal.contains("            2 => array("));
	}

	#[rstest]
	fn test_unindexed_rows_have_no_integer_keys() {
		let rows = vec![sample_row(), sample_row()];
		let literal = serialize_chunk(&rows, false);
		for line in literal.lines() {
			let trimmed = line.trim_start();
			assert!(
				!trimmed
					.split("=>")
					.next()
					.is_some_and(|key| !key.trim().is_empty()
						&& key.trim().chars().all(|c| c.is_ascii_digit())),
				"unexpected integer key in: {line}"
			);
		}
	}

	#[rstest]
	fn test_field_lines_sit_one_level_below_rows() {
		let literal = serialize_chunk(&[sample_row()], true);
		let lines: Vec<&str> = literal.lines().collect();
		assert_eq!(lines[0], "array(");
		assert_eq!(lines[1], "            0 => array(");
		assert_eq!(lines[2], "                'id' => 1,");
		assert_eq!(lines[3], "                'name' => 'admin',");
		assert_eq!(lines[4], "            ),");
		assert_eq!(lines[5], "        )");
	}

	#[rstest]
	fn test_brackets_inside_strings_do_not_shift_indent() {
		let mut row = Row::new();
		row.push("note", SqlValue::String("a ) tricky ( value".to_string()));
		let mut other = Row::new();
		other.push("note", SqlValue::String("plain".to_string()));

		let literal = serialize_chunk(&[row, other], true);
		let lines: Vec<&str> = literal.lines().collect();
		// The second row still opens at row depth.
		assert_eq!(lines[4], "            1 => array(");
		assert_eq!(lines[6], "            ),");
	}

	#[rstest]
	#[case(SqlValue::Null, "NULL")]
	#[case(SqlValue::Bool(true), "true")]
	#[case(SqlValue::Bool(false), "false")]
	#[case(SqlValue::Int(-7), "-7")]
	#[case(SqlValue::Float(1.5), "1.5")]
	#[case(SqlValue::Float(2.0), "2.0")]
	#[case(SqlValue::String("it's".to_string()), r"'it\'s'")]
	#[case(SqlValue::String(r"back\slash".to_string()), r"'back\\slash'")]
	fn test_php_scalar(#[case] value: SqlValue, #[case] expected: &str) {
		assert_eq!(php_scalar(&value), expected);
	}

	#[rstest]
	fn test_bytes_render_as_base64() {
		let value = SqlValue::Bytes(vec![0xde, 0xad, 0xbe, 0xef]);
		assert_eq!(php_scalar(&value), "base64_decode('3q2+7w==')");
	}

	#[rstest]
	fn test_timestamp_renders_as_datetime_string() {
		let ts = chrono::DateTime::parse_from_rfc3339("2024-05-01T12:30:00Z")
			.unwrap()
			.with_timezone(&chrono::Utc);
		assert_eq!(php_scalar(&SqlValue::Timestamp(ts)), "'2024-05-01 12:30:00'");
	}

	#[rstest]
	fn test_output_is_deterministic() {
		let rows = vec![sample_row()];
		assert_eq!(serialize_chunk(&rows, false), serialize_chunk(&rows, false));
	}
}
