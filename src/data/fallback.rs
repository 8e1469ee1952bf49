use super::{DataContext, Value};
use crate::path::DataPath;

/// [`DataContext`] produced by [`fallback()`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct FallbackContext<Base, Fallback> {
	base: Base,
	fallback: Fallback,
}

impl<Base, Fallback> DataContext for FallbackContext<Base, Fallback>
where
	Base: DataContext,
	Fallback: DataContext,
{
	fn get(&self, name: &str) -> Option<&Value> {
		self.base.get(name).or_else(|| self.fallback.get(name))
	}

	/// A path that does not resolve in `base` is resolved in `fallback` as a whole.
	fn lookup(&self, path: &DataPath) -> Option<&Value> {
		self.base.lookup(path).or_else(|| self.fallback.lookup(path))
	}
}

/// Creates a [`DataContext`] that will first try to find values in `base`, and then attempt to
/// find values in `fallback`.
///
/// # Example
/// ```rust
/// # use embedtpl::{fallback, DataContext, Value};
///
/// let page = [("title", Value::from("Changelog"))];
/// let site = [("title", Value::from("Notes")), ("lang", Value::from("en"))];
/// let data = fallback(page, site);
///
/// assert_eq!(data.get("title"), Some(&Value::from("Changelog")));
/// assert_eq!(data.get("lang"), Some(&Value::from("en")));
/// assert_eq!(data.get("author"), None);
/// ```
pub const fn fallback<Base, Fallback>(base: Base, fallback: Fallback) -> FallbackContext<Base, Fallback> {
	FallbackContext { base, fallback }
}
