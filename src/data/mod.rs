//! Data contexts and values for rendering.

use std::borrow::Borrow;
use std::collections::{BTreeMap, HashMap};
use std::hash::BuildHasher;

use crate::path::DataPath;

mod fallback;
pub use fallback::*;

mod value;
pub use value::*;

/// Trait for types that can be used as the data context of a render.
///
/// A data context maps top-level names to values.
/// The remainder of a data path is resolved by walking into the value.
pub trait DataContext {
	/// Get the value of a top-level name.
	fn get(&self, name: &str) -> Option<&Value>;

	/// Resolve a full data path.
	///
	/// The renderer resolves every path through this method,
	/// so implementations can override it to compute nested values.
	fn lookup(&self, path: &DataPath) -> Option<&Value> {
		self.get(path.root())?.get_path(path.rest())
	}
}

/// Allow using key-value [`slice`]s as [`DataContext`]s.
///
/// # Example
/// ```rust
/// # use embedtpl::{DataContext, Value};
///
/// let data = &[("title", Value::from("Notes")), ("draft", Value::from(true))];
///
/// assert_eq!(data.get("title"), Some(&Value::from("Notes")));
/// assert_eq!(data.get("author"), None);
/// ```
impl<K> DataContext for [(K, Value)]
where
	K: Borrow<str>,
{
	fn get(&self, name: &str) -> Option<&Value> {
		self.iter().find_map(|(k, v)| (k.borrow() == name).then_some(v))
	}
}

/// Allow using key-value [`arrays`](`array`) as [`DataContext`]s.
impl<K, const N: usize> DataContext for [(K, Value); N]
where
	K: Borrow<str>,
{
	#[inline(always)]
	fn get(&self, name: &str) -> Option<&Value> {
		DataContext::get(self.as_slice(), name)
	}
}

/// Allow using key-value [`Vec`]s as [`DataContext`]s.
impl<K> DataContext for Vec<(K, Value)>
where
	K: Borrow<str>,
{
	#[inline(always)]
	fn get(&self, name: &str) -> Option<&Value> {
		DataContext::get(self.as_slice(), name)
	}
}

/// A [`Value::Map`] is a data context of its entries.
///
/// Any other value is an empty data context.
impl DataContext for Value {
	fn get(&self, name: &str) -> Option<&Value> {
		match self {
			Value::Map(map) => map.get(name),
			_ => None,
		}
	}
}

impl<T> DataContext for &'_ T
where
	T: ?Sized + DataContext,
{
	#[inline(always)]
	fn get(&self, name: &str) -> Option<&Value> {
		T::get(self, name)
	}

	#[inline(always)]
	fn lookup(&self, path: &DataPath) -> Option<&Value> {
		T::lookup(self, path)
	}
}

impl<T> DataContext for &'_ mut T
where
	T: ?Sized + DataContext,
{
	#[inline(always)]
	fn get(&self, name: &str) -> Option<&Value> {
		T::get(self, name)
	}

	#[inline(always)]
	fn lookup(&self, path: &DataPath) -> Option<&Value> {
		T::lookup(self, path)
	}
}

impl<T> DataContext for std::boxed::Box<T>
where
	T: ?Sized + DataContext,
{
	#[inline(always)]
	fn get(&self, name: &str) -> Option<&Value> {
		T::get(self, name)
	}

	#[inline(always)]
	fn lookup(&self, path: &DataPath) -> Option<&Value> {
		T::lookup(self, path)
	}
}

impl<T> DataContext for std::rc::Rc<T>
where
	T: ?Sized + DataContext,
{
	#[inline(always)]
	fn get(&self, name: &str) -> Option<&Value> {
		T::get(self, name)
	}

	#[inline(always)]
	fn lookup(&self, path: &DataPath) -> Option<&Value> {
		T::lookup(self, path)
	}
}

impl<T> DataContext for std::sync::Arc<T>
where
	T: ?Sized + DataContext,
{
	#[inline(always)]
	fn get(&self, name: &str) -> Option<&Value> {
		T::get(self, name)
	}

	#[inline(always)]
	fn lookup(&self, path: &DataPath) -> Option<&Value> {
		T::lookup(self, path)
	}
}

/// A data context without any values.
#[derive(Debug, Copy, Clone, Default)]
pub struct NoData;

impl DataContext for NoData {
	#[inline]
	fn get(&self, _name: &str) -> Option<&Value> {
		None
	}
}

impl DataContext for BTreeMap<&str, Value> {
	#[inline]
	fn get(&self, name: &str) -> Option<&Value> {
		self.get(name)
	}
}

impl DataContext for BTreeMap<String, Value> {
	#[inline]
	fn get(&self, name: &str) -> Option<&Value> {
		self.get(name)
	}
}

impl<S: BuildHasher> DataContext for HashMap<&str, Value, S> {
	#[inline]
	fn get(&self, name: &str) -> Option<&Value> {
		self.get(name)
	}
}

impl<S: BuildHasher> DataContext for HashMap<String, Value, S> {
	#[inline]
	fn get(&self, name: &str) -> Option<&Value> {
		self.get(name)
	}
}

#[cfg(test)]
#[rustfmt::skip]
mod test {
	use super::*;
	use assert2::check;

	#[test]
	fn lookup_nested_paths() {
		let mut data = BTreeMap::new();
		data.insert("site".to_owned(), Value::from_iter([("title", "Notes")]));
		let path = DataPath::parse("site.title").unwrap();
		check!(data.lookup(&path) == Some(&Value::from("Notes")));
		let path = DataPath::parse("site.url").unwrap();
		check!(data.lookup(&path) == None);
	}

	#[test]
	fn dyn_data_context() {
		let mut data = HashMap::new();
		data.insert("name", Value::from("world"));
		let data: &dyn DataContext = &data;
		check!(data.get("name") == Some(&Value::from("world")));
		check!(NoData.get("name") == None);
	}

	#[test]
	fn value_as_context() {
		let value = Value::from_iter([("a", 1)]);
		check!(DataContext::get(&value, "a") == Some(&Value::Integer(1)));
		check!(DataContext::get(&Value::Integer(1), "a") == None);
	}
}
