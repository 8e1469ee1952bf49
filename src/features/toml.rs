//! Support for TOML data and TOML host tooling.

use crate::delegate::{Diagnostic, HostTooling, Severity};
use crate::Value;

/// Parse template data from TOML.
pub fn from_str(data: &str) -> Result<Value, toml::de::Error> {
	let table: toml::Table = toml::from_str(data)?;
	Ok(toml::Value::Table(table).into())
}

/// Date-time values are converted to strings.
impl From<toml::Value> for Value {
	fn from(other: toml::Value) -> Self {
		match other {
			toml::Value::String(value) => Self::String(value),
			toml::Value::Integer(value) => Self::Integer(value),
			toml::Value::Float(value) => Self::Float(value),
			toml::Value::Boolean(value) => Self::Bool(value),
			toml::Value::Datetime(value) => Self::String(value.to_string()),
			toml::Value::Array(seq) => Self::List(seq.into_iter().map(Value::from).collect()),
			toml::Value::Table(map) => Self::Map(map.into_iter().map(|(key, value)| (key, value.into())).collect()),
		}
	}
}

/// Host tooling that reports TOML syntax errors.
///
/// Only the first syntax error of a document is reported.
#[derive(Debug, Copy, Clone, Default)]
pub struct TomlTooling;

impl TomlTooling {
	/// The source name of the reported diagnostics.
	pub const SOURCE: &'static str = "toml";
}

impl HostTooling for TomlTooling {
	fn diagnostics(&self, text: &str) -> Vec<Diagnostic> {
		let error = match toml::from_str::<toml::Table>(text) {
			Ok(_) => return Vec::new(),
			Err(e) => e,
		};
		let range = error.span().unwrap_or(0..text.len());
		vec![Diagnostic::new(range, Severity::Error, error.message().trim_end()).with_source(Self::SOURCE)]
	}
}
