//! Support for YAML data and YAML host tooling.

use crate::delegate::{Diagnostic, HostTooling, Severity};
use crate::Value;

/// Parse template data from YAML.
pub fn from_str(data: &str) -> Result<Value, serde_yaml::Error> {
	let value: serde_yaml::Value = serde_yaml::from_str(data)?;
	Ok(value.into())
}

/// Parse template data from YAML.
pub fn from_slice(data: &[u8]) -> Result<Value, serde_yaml::Error> {
	let value: serde_yaml::Value = serde_yaml::from_slice(data)?;
	Ok(value.into())
}

/// Tags are ignored, and mapping keys are converted to strings.
///
/// Entries with a sequence or mapping as key are dropped.
impl From<serde_yaml::Value> for Value {
	fn from(other: serde_yaml::Value) -> Self {
		match other {
			serde_yaml::Value::Null => Self::Null,
			serde_yaml::Value::Bool(value) => Self::Bool(value),
			serde_yaml::Value::Number(value) => number(&value),
			serde_yaml::Value::String(value) => Self::String(value),
			serde_yaml::Value::Sequence(seq) => Self::List(seq.into_iter().map(Value::from).collect()),
			serde_yaml::Value::Mapping(map) => Self::Map(
				map.into_iter()
					.filter_map(|(key, value)| Some((key_to_string(key)?, value.into())))
					.collect(),
			),
			serde_yaml::Value::Tagged(tagged) => tagged.value.into(),
		}
	}
}

fn number(number: &serde_yaml::Number) -> Value {
	if let Some(value) = number.as_i64() {
		Value::Integer(value)
	} else if let Some(value) = number.as_f64() {
		Value::Float(value)
	} else {
		Value::String(number.to_string())
	}
}

fn key_to_string(key: serde_yaml::Value) -> Option<String> {
	match key {
		serde_yaml::Value::Null => Some("null".into()),
		serde_yaml::Value::Bool(value) => Some(value.to_string()),
		serde_yaml::Value::Number(value) => Some(value.to_string()),
		serde_yaml::Value::String(value) => Some(value),
		serde_yaml::Value::Tagged(tagged) => key_to_string(tagged.value),
		serde_yaml::Value::Sequence(_) | serde_yaml::Value::Mapping(_) => None,
	}
}

/// Host tooling that reports YAML syntax errors.
///
/// Only the first syntax error of a document is reported.
#[derive(Debug, Copy, Clone, Default)]
pub struct YamlTooling;

impl YamlTooling {
	/// The source name of the reported diagnostics.
	pub const SOURCE: &'static str = "yaml";
}

impl HostTooling for YamlTooling {
	fn diagnostics(&self, text: &str) -> Vec<Diagnostic> {
		let error = match serde_yaml::from_str::<serde::de::IgnoredAny>(text) {
			Ok(_) => return Vec::new(),
			Err(e) => e,
		};
		let range = match error.location() {
			Some(location) => super::char_range(text, location.index()),
			None => 0..text.len(),
		};
		let message = super::strip_location(&error.to_string());
		vec![Diagnostic::new(range, Severity::Error, message).with_source(Self::SOURCE)]
	}
}
