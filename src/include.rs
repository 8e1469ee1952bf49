//! Resolving the targets of `include` directives.

use std::collections::BTreeMap;

use crate::error::TemplateError;
use crate::syntax::Syntax;
use crate::template::TemplateTree;

/// Trait for types that provide the templates named by `include` directives.
pub trait IncludeResolver {
	/// Get the parsed template for an include target.
	///
	/// Returns `None` if the target is unknown.
	fn resolve(&self, target: &str) -> Option<TemplateTree>;
}

impl<T> IncludeResolver for &'_ T
where
	T: ?Sized + IncludeResolver,
{
	#[inline(always)]
	fn resolve(&self, target: &str) -> Option<TemplateTree> {
		T::resolve(self, target)
	}
}

impl<T> IncludeResolver for std::boxed::Box<T>
where
	T: ?Sized + IncludeResolver,
{
	#[inline(always)]
	fn resolve(&self, target: &str) -> Option<TemplateTree> {
		T::resolve(self, target)
	}
}

impl<T> IncludeResolver for std::rc::Rc<T>
where
	T: ?Sized + IncludeResolver,
{
	#[inline(always)]
	fn resolve(&self, target: &str) -> Option<TemplateTree> {
		T::resolve(self, target)
	}
}

impl<T> IncludeResolver for std::sync::Arc<T>
where
	T: ?Sized + IncludeResolver,
{
	#[inline(always)]
	fn resolve(&self, target: &str) -> Option<TemplateTree> {
		T::resolve(self, target)
	}
}

/// An include resolver that does not know any template.
///
/// Every `include` directive fails to render with this resolver.
#[derive(Debug, Copy, Clone, Default)]
pub struct NullResolver;

impl IncludeResolver for NullResolver {
	#[inline]
	fn resolve(&self, _target: &str) -> Option<TemplateTree> {
		None
	}
}

/// An include resolver backed by templates held in memory.
///
/// Templates are parsed when they are added, so syntax errors are reported by [`Self::insert()`].
#[derive(Debug, Clone, Default)]
pub struct MemoryResolver {
	syntax: Syntax,
	templates: BTreeMap<String, TemplateTree>,
}

impl MemoryResolver {
	/// Create an empty resolver that parses templates with the default syntax.
	pub fn new() -> Self {
		Self::default()
	}

	/// Create an empty resolver that parses templates with the given syntax.
	pub fn with_syntax(syntax: Syntax) -> Self {
		Self {
			syntax,
			templates: BTreeMap::new(),
		}
	}

	/// Parse a template and add it under the given name.
	///
	/// A template previously added under the same name is replaced.
	pub fn insert(&mut self, name: impl Into<String>, source: &str) -> Result<&mut Self, TemplateError> {
		let tree = TemplateTree::parse(source, &self.syntax)?;
		Ok(self.insert_tree(name, tree))
	}

	/// Add an already parsed template under the given name.
	pub fn insert_tree(&mut self, name: impl Into<String>, tree: TemplateTree) -> &mut Self {
		self.templates.insert(name.into(), tree);
		self
	}

	/// Check if a template is known under the given name.
	pub fn contains(&self, name: &str) -> bool {
		self.templates.contains_key(name)
	}
}

impl IncludeResolver for MemoryResolver {
	fn resolve(&self, target: &str) -> Option<TemplateTree> {
		self.templates.get(target).cloned()
	}
}

/// [`IncludeResolver`] produced by [`from_fn()`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct FnResolver<F> {
	func: F,
}

impl<F> IncludeResolver for FnResolver<F>
where
	F: Fn(&str) -> Option<TemplateTree>,
{
	#[inline(always)]
	fn resolve(&self, target: &str) -> Option<TemplateTree> {
		(self.func)(target)
	}
}

/// Creates an [`IncludeResolver`] that delegates to the given function.
///
/// # Example
/// ```rust
/// # use embedtpl::include::{from_fn, IncludeResolver};
/// # use embedtpl::{Syntax, TemplateTree};
///
/// let resolver = from_fn(|target| match target {
///     "footer" => TemplateTree::parse("-- {{author}}", &Syntax::default()).ok(),
///     _ => None,
/// });
///
/// assert!(resolver.resolve("footer").is_some());
/// assert!(resolver.resolve("header").is_none());
/// ```
pub const fn from_fn<F>(func: F) -> FnResolver<F>
where
	F: Fn(&str) -> Option<TemplateTree>,
{
	FnResolver { func }
}
