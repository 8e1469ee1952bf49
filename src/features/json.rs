//! Support for JSON data and JSON host tooling.

use crate::delegate::{Diagnostic, HostTooling, Severity};
use crate::line_index::{LineIndex, Position};
use crate::Value;

/// Parse template data from JSON.
pub fn from_str(data: &str) -> Result<Value, serde_json::Error> {
	let value: serde_json::Value = serde_json::from_str(data)?;
	Ok(value.into())
}

/// Parse template data from JSON.
pub fn from_slice(data: &[u8]) -> Result<Value, serde_json::Error> {
	let value: serde_json::Value = serde_json::from_slice(data)?;
	Ok(value.into())
}

impl From<serde_json::Value> for Value {
	fn from(other: serde_json::Value) -> Self {
		match other {
			serde_json::Value::Null => Self::Null,
			serde_json::Value::Bool(value) => Self::Bool(value),
			serde_json::Value::Number(value) => number(&value),
			serde_json::Value::String(value) => Self::String(value),
			serde_json::Value::Array(seq) => Self::List(seq.into_iter().map(Value::from).collect()),
			serde_json::Value::Object(map) => Self::Map(map.into_iter().map(|(key, value)| (key, value.into())).collect()),
		}
	}
}

fn number(number: &serde_json::Number) -> Value {
	if let Some(value) = number.as_i64() {
		Value::Integer(value)
	} else if let Some(value) = number.as_f64() {
		Value::Float(value)
	} else {
		Value::String(number.to_string())
	}
}

/// Host tooling that reports JSON syntax errors.
///
/// Only the first syntax error of a document is reported.
#[derive(Debug, Copy, Clone, Default)]
pub struct JsonTooling;

impl JsonTooling {
	/// The source name of the reported diagnostics.
	pub const SOURCE: &'static str = "json";
}

impl HostTooling for JsonTooling {
	fn diagnostics(&self, text: &str) -> Vec<Diagnostic> {
		let error = match serde_json::from_str::<serde::de::IgnoredAny>(text) {
			Ok(_) => return Vec::new(),
			Err(e) => e,
		};

		// Line and column are one-based, but the column is zero for some errors at the start of a line.
		let position = Position::new(error.line().saturating_sub(1), error.column().saturating_sub(1));
		let offset = LineIndex::new(text)
			.position_to_offset(position)
			.unwrap_or(text.len());
		let message = super::strip_location(&error.to_string());
		vec![Diagnostic::new(super::char_range(text, offset), Severity::Error, message).with_source(Self::SOURCE)]
	}
}

#[cfg(test)]
#[rustfmt::skip]
mod test {
	use super::*;
	use crate::{build_virtual_document, Delegator, HostFormat};
	use assert2::{assert, check, let_assert};

	#[test]
	fn json_data() {
		let_assert!(Ok(value) = from_str(r#"{ "title": "Home", "tags": ["a", "b"], "draft": false, "weight": 1.5, "order": 3 }"#));
		check!(value == Value::from_iter([
			("title", Value::from("Home")),
			("tags", Value::from(vec!["a", "b"])),
			("draft", Value::from(false)),
			("weight", Value::from(1.5)),
			("order", Value::from(3)),
		]));

		let_assert!(Ok(output) = crate::render("{{ title }}: {{ tags[1] }}", &value, &crate::NullResolver));
		check!(output == "Home: b");
	}

	#[test]
	fn valid_json_has_no_diagnostics() {
		assert!(JsonTooling.diagnostics(r#"{ "a": [1, null] }"#).is_empty());
	}

	#[test]
	fn syntax_error() {
		let diagnostics = JsonTooling.diagnostics("{\"a\": }");
		let_assert!([diagnostic] = diagnostics.as_slice());
		check!(diagnostic.range == (6..7));
		check!(diagnostic.message == "expected value");
		check!(diagnostic.source.as_deref() == Some(JsonTooling::SOURCE));
	}

	#[test]
	fn placeholders_keep_json_valid() {
		let_assert!(Ok(document) = build_virtual_document(r#"{ "a": {{ a }}, "b": [{{#for x in xs}}{{ x }}{{/for}}] }"#, &HostFormat::Json));
		check!(document.text() == r#"{ "a": null, "b": [null] }"#);
		assert!(Delegator::new(&document, JsonTooling).diagnostics().is_empty());
	}

	#[test]
	fn syntax_error_in_template() {
		let source = r#"{"a": {{ a }} "b": 1}"#;
		let_assert!(Ok(document) = build_virtual_document(source, &HostFormat::Json));
		check!(document.text() == r#"{"a": null "b": 1}"#);
		let diagnostics = Delegator::new(&document, JsonTooling).diagnostics();
		let_assert!([diagnostic] = diagnostics.as_slice());
		check!(diagnostic.range == (14..15));
		check!(&source[diagnostic.range.clone()] == "\"");
	}
}
