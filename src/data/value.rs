use std::borrow::Cow;
use std::collections::BTreeMap;

use crate::path::PathSegment;

/// A value that can be referenced from a template.
#[derive(Debug, Clone, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(untagged))]
pub enum Value {
	/// The absence of a value.
	#[default]
	Null,

	/// A boolean.
	Bool(bool),

	/// An integer.
	Integer(i64),

	/// A floating point number.
	Float(f64),

	/// A string.
	String(String),

	/// An ordered list of values.
	List(Vec<Value>),

	/// A map from names to values.
	Map(BTreeMap<String, Value>),
}

impl Value {
	/// Check if the value counts as true in a condition.
	///
	/// `null`, `false`, zero, the empty string, the empty list and the empty map are false.
	/// Everything else is true.
	pub fn is_truthy(&self) -> bool {
		match self {
			Self::Null => false,
			Self::Bool(b) => *b,
			Self::Integer(i) => *i != 0,
			Self::Float(f) => *f != 0.0,
			Self::String(s) => !s.is_empty(),
			Self::List(items) => !items.is_empty(),
			Self::Map(map) => !map.is_empty(),
		}
	}

	/// A human readable name for the type of the value.
	pub fn type_name(&self) -> &'static str {
		match self {
			Self::Null => "null",
			Self::Bool(_) => "a boolean",
			Self::Integer(_) => "an integer",
			Self::Float(_) => "a float",
			Self::String(_) => "a string",
			Self::List(_) => "a list",
			Self::Map(_) => "a map",
		}
	}

	/// Apply one path accessor to the value.
	pub fn get(&self, segment: &PathSegment) -> Option<&Value> {
		match (self, segment) {
			(Self::Map(map), PathSegment::Key(key)) => map.get(key),
			(Self::List(items), PathSegment::Index(index)) => items.get(*index),
			_ => None,
		}
	}

	/// Apply a sequence of path accessors to the value.
	pub fn get_path(&self, segments: &[PathSegment]) -> Option<&Value> {
		segments.iter().try_fold(self, |value, segment| value.get(segment))
	}

	/// Get the text to insert for the value, if it is a scalar.
	///
	/// Lists and maps have no textual form and give `None`.
	pub fn as_text(&self) -> Option<Cow<'_, str>> {
		match self {
			Self::Null => Some(Cow::Borrowed("")),
			Self::Bool(b) => Some(Cow::Borrowed(if *b { "true" } else { "false" })),
			Self::Integer(i) => Some(Cow::Owned(i.to_string())),
			Self::Float(f) => Some(Cow::Owned(f.to_string())),
			Self::String(s) => Some(Cow::Borrowed(s)),
			Self::List(_) | Self::Map(_) => None,
		}
	}
}

impl From<bool> for Value {
	fn from(other: bool) -> Self {
		Self::Bool(other)
	}
}

impl From<i64> for Value {
	fn from(other: i64) -> Self {
		Self::Integer(other)
	}
}

impl From<i32> for Value {
	fn from(other: i32) -> Self {
		Self::Integer(other.into())
	}
}

impl From<u32> for Value {
	fn from(other: u32) -> Self {
		Self::Integer(other.into())
	}
}

impl From<f64> for Value {
	fn from(other: f64) -> Self {
		Self::Float(other)
	}
}

impl From<&str> for Value {
	fn from(other: &str) -> Self {
		Self::String(other.to_owned())
	}
}

impl From<String> for Value {
	fn from(other: String) -> Self {
		Self::String(other)
	}
}

impl<T: Into<Value>> From<Vec<T>> for Value {
	fn from(other: Vec<T>) -> Self {
		Self::List(other.into_iter().map(Into::into).collect())
	}
}

impl From<BTreeMap<String, Value>> for Value {
	fn from(other: BTreeMap<String, Value>) -> Self {
		Self::Map(other)
	}
}

impl<K: Into<String>, V: Into<Value>> FromIterator<(K, V)> for Value {
	fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
		Self::Map(iter.into_iter().map(|(k, v)| (k.into(), v.into())).collect())
	}
}

#[cfg(test)]
#[rustfmt::skip]
mod test {
	use super::*;
	use assert2::{assert, check};

	#[test]
	fn truthiness() {
		assert!(!Value::Null.is_truthy());
		assert!(!Value::Bool(false).is_truthy());
		assert!(Value::Bool(true).is_truthy());
		assert!(!Value::Integer(0).is_truthy());
		assert!(Value::Integer(-1).is_truthy());
		assert!(!Value::from("").is_truthy());
		assert!(Value::from("false").is_truthy());
		assert!(!Value::List(vec![]).is_truthy());
		assert!(Value::from(vec![false]).is_truthy());
		assert!(!Value::Map(BTreeMap::new()).is_truthy());
		assert!(Value::from_iter([("a", Value::Null)]).is_truthy());
	}

	#[test]
	fn nested_lookup() {
		let value = Value::from_iter([
			("author", Value::from_iter([("name", "Ada")])),
			("tags", Value::from(vec!["rust", "yaml"])),
		]);
		let path = [PathSegment::Key("author".into()), PathSegment::Key("name".into())];
		check!(value.get_path(&path) == Some(&Value::from("Ada")));
		let path = [PathSegment::Key("tags".into()), PathSegment::Index(1)];
		check!(value.get_path(&path) == Some(&Value::from("yaml")));
		let path = [PathSegment::Key("tags".into()), PathSegment::Index(2)];
		check!(value.get_path(&path) == None);
		let path = [PathSegment::Key("author".into()), PathSegment::Index(0)];
		check!(value.get_path(&path) == None);
		check!(value.get_path(&[]) == Some(&value));
	}

	#[test]
	fn text_of_scalars() {
		check!(Value::Null.as_text().as_deref() == Some(""));
		check!(Value::Bool(true).as_text().as_deref() == Some("true"));
		check!(Value::Integer(42).as_text().as_deref() == Some("42"));
		check!(Value::Float(1.5).as_text().as_deref() == Some("1.5"));
		check!(Value::Float(2.0).as_text().as_deref() == Some("2"));
		check!(Value::from("text").as_text().as_deref() == Some("text"));
		check!(Value::from(vec![1]).as_text() == None);
	}
}
