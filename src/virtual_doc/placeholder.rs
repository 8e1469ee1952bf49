use crate::path::DataPath;
use crate::scan::DirectiveKind;
use crate::syntax::Syntax;

/// Trait for types that decide what template constructs turn into in a virtual document.
pub trait PlaceholderPolicy {
	/// The text that stands in for an expression.
	///
	/// The placeholder should be valid host syntax wherever an expression can appear as a value.
	fn expression_placeholder(&self, path: &DataPath) -> String;

	/// The text that stands in for a directive marker, or `None` to remove the marker entirely.
	fn directive_placeholder(&self, kind: DirectiveKind) -> Option<String>;
}

impl<T> PlaceholderPolicy for &'_ T
where
	T: ?Sized + PlaceholderPolicy,
{
	#[inline(always)]
	fn expression_placeholder(&self, path: &DataPath) -> String {
		T::expression_placeholder(self, path)
	}

	#[inline(always)]
	fn directive_placeholder(&self, kind: DirectiveKind) -> Option<String> {
		T::directive_placeholder(self, kind)
	}
}

impl<T> PlaceholderPolicy for std::boxed::Box<T>
where
	T: ?Sized + PlaceholderPolicy,
{
	#[inline(always)]
	fn expression_placeholder(&self, path: &DataPath) -> String {
		T::expression_placeholder(self, path)
	}

	#[inline(always)]
	fn directive_placeholder(&self, kind: DirectiveKind) -> Option<String> {
		T::directive_placeholder(self, kind)
	}
}

/// The host formats with built-in placeholder policies.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum HostFormat {
	/// YAML documents: expressions become an empty quoted string.
	Yaml,

	/// JSON documents: expressions become `null`.
	Json,

	/// TOML documents: expressions become an empty quoted string.
	Toml,

	/// Markdown documents: expressions become their data path.
	Markdown,

	/// HTML documents: expressions become their data path.
	Html,

	/// Plain text: expressions become their data path.
	#[default]
	Plain,
}

impl HostFormat {
	/// Guess the host format from a file extension, without the leading dot.
	///
	/// The comparison is case insensitive.
	pub fn from_extension(extension: &str) -> Option<Self> {
		let extension = extension.to_ascii_lowercase();
		match extension.as_str() {
			"yaml" | "yml" => Some(Self::Yaml),
			"json" => Some(Self::Json),
			"toml" => Some(Self::Toml),
			"md" | "markdown" => Some(Self::Markdown),
			"html" | "htm" => Some(Self::Html),
			"txt" | "text" => Some(Self::Plain),
			_ => None,
		}
	}

	/// The name of the format.
	pub fn name(self) -> &'static str {
		match self {
			Self::Yaml => "yaml",
			Self::Json => "json",
			Self::Toml => "toml",
			Self::Markdown => "markdown",
			Self::Html => "html",
			Self::Plain => "plain",
		}
	}

	/// The template syntax conventionally used with this format.
	///
	/// HTML and Markdown write directives as HTML comments, everything else uses [`Syntax::mustache()`].
	pub fn syntax(self) -> Syntax {
		match self {
			Self::Markdown | Self::Html => Syntax::html_comments(),
			Self::Yaml | Self::Json | Self::Toml | Self::Plain => Syntax::mustache(),
		}
	}
}

impl std::fmt::Display for HostFormat {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.write_str(self.name())
	}
}

impl PlaceholderPolicy for HostFormat {
	fn expression_placeholder(&self, path: &DataPath) -> String {
		match self {
			Self::Yaml | Self::Toml => String::from("\"\""),
			Self::Json => String::from("null"),
			Self::Markdown | Self::Html | Self::Plain => path.to_string(),
		}
	}

	fn directive_placeholder(&self, _kind: DirectiveKind) -> Option<String> {
		None
	}
}

/// A placeholder policy that uses the same text for every expression and directive marker.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default, rename_all = "kebab-case"))]
pub struct StaticPolicy {
	/// The text that replaces every expression.
	pub expression: String,

	/// The text that replaces every directive marker, or `None` to remove directive markers.
	pub directive: Option<String>,
}

impl StaticPolicy {
	/// Create a policy that replaces expressions with the given text and removes directive markers.
	pub fn new(expression: impl Into<String>) -> Self {
		Self {
			expression: expression.into(),
			directive: None,
		}
	}

	/// Replace directive markers with the given text instead of removing them.
	pub fn with_directive(mut self, directive: impl Into<String>) -> Self {
		self.directive = Some(directive.into());
		self
	}
}

impl PlaceholderPolicy for StaticPolicy {
	fn expression_placeholder(&self, _path: &DataPath) -> String {
		self.expression.clone()
	}

	fn directive_placeholder(&self, _kind: DirectiveKind) -> Option<String> {
		self.directive.clone()
	}
}

#[cfg(test)]
#[rustfmt::skip]
mod test {
	use super::*;
	use assert2::check;

	#[test]
	fn host_format_placeholders() {
		let path = DataPath::parse("site.title").unwrap();
		check!(HostFormat::Yaml.expression_placeholder(&path) == "\"\"");
		check!(HostFormat::Json.expression_placeholder(&path) == "null");
		check!(HostFormat::Markdown.expression_placeholder(&path) == "site.title");
		check!(HostFormat::Html.directive_placeholder(DirectiveKind::If) == None);
	}

	#[test]
	fn host_format_from_extension() {
		check!(HostFormat::from_extension("yml") == Some(HostFormat::Yaml));
		check!(HostFormat::from_extension("JSON") == Some(HostFormat::Json));
		check!(HostFormat::from_extension("md") == Some(HostFormat::Markdown));
		check!(HostFormat::from_extension("rs") == None);
		check!(HostFormat::Html.syntax() == Syntax::html_comments());
		check!(HostFormat::Toml.syntax() == Syntax::mustache());
	}

	#[test]
	fn static_policy() {
		let policy = StaticPolicy::new("X").with_directive("#");
		let path = DataPath::parse("a").unwrap();
		check!(policy.expression_placeholder(&path) == "X");
		check!(policy.directive_placeholder(DirectiveKind::For).as_deref() == Some("#"));
	}
}
