//! Configurable marker syntax.

/// The opening and closing delimiter of one kind of marker.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Delimiters {
	/// The text that opens the marker.
	pub open: String,

	/// The text that closes the marker.
	pub close: String,
}

impl Delimiters {
	/// Create a new pair of delimiters.
	pub fn new(open: impl Into<String>, close: impl Into<String>) -> Self {
		Self {
			open: open.into(),
			close: close.into(),
		}
	}
}

/// The markers that introduce template constructs in a host document.
///
/// When more than one opening delimiter matches at the same position,
/// the longest one wins.
/// This allows the block and comment openers to extend the expression opener, as in the default `{{#` and `{{`.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default, rename_all = "kebab-case"))]
pub struct Syntax {
	/// Expression markers, like `{{ author.name }}`.
	///
	/// The `else` and `else if` branch markers may also use the expression delimiters: `{{else}}`.
	pub expression: Delimiters,

	/// Markers that open a directive, like `{{#if draft}}`.
	pub block: Delimiters,

	/// Markers that close a directive, like `{{/if}}`.
	pub end: Delimiters,

	/// Comments, like `{{! note to self }}`.
	pub comment: Delimiters,
}

impl Syntax {
	/// The default syntax, using curly braces for everything.
	///
	/// * `{{ path }}` for expressions,
	/// * `{{#if path}}`, `{{else}}` and `{{/if}}` for directives,
	/// * `{{! text }}` for comments.
	pub fn mustache() -> Self {
		Self {
			expression: Delimiters::new("{{", "}}"),
			block: Delimiters::new("{{#", "}}"),
			end: Delimiters::new("{{/", "}}"),
			comment: Delimiters::new("{{!", "}}"),
		}
	}

	/// A syntax where directives are written as HTML comments.
	///
	/// * `{{ path }}` for expressions,
	/// * `<!-- templ:if path -->`, `<!-- templ:else -->` and `<!-- /templ:if -->` for directives,
	/// * `{{! text }}` for comments.
	///
	/// Unrelated HTML comments are left alone.
	pub fn html_comments() -> Self {
		Self {
			expression: Delimiters::new("{{", "}}"),
			block: Delimiters::new("<!-- templ:", "-->"),
			end: Delimiters::new("<!-- /templ:", "-->"),
			comment: Delimiters::new("{{!", "}}"),
		}
	}

	/// Check that no delimiter is empty.
	pub fn validate(&self) -> Result<(), InvalidSyntax> {
		for (marker, delimiters) in self.markers() {
			if delimiters.open.is_empty() {
				return Err(InvalidSyntax { marker, delimiter: "opening" });
			}
			if delimiters.close.is_empty() {
				return Err(InvalidSyntax { marker, delimiter: "closing" });
			}
		}
		Ok(())
	}

	/// Get the delimiters for a marker kind.
	pub(crate) fn delimiters(&self, marker: Marker) -> &Delimiters {
		match marker {
			Marker::Expression => &self.expression,
			Marker::Block => &self.block,
			Marker::End => &self.end,
			Marker::Comment => &self.comment,
		}
	}

	fn markers(&self) -> [(&'static str, &Delimiters); 4] {
		[
			("expression", &self.expression),
			("block", &self.block),
			("end", &self.end),
			("comment", &self.comment),
		]
	}
}

impl Default for Syntax {
	fn default() -> Self {
		Self::mustache()
	}
}

/// The kinds of marker recognized by the scanner.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub(crate) enum Marker {
	Expression,
	Block,
	End,
	Comment,
}

impl Marker {
	pub(crate) const ALL: [Marker; 4] = [Marker::Expression, Marker::Block, Marker::End, Marker::Comment];
}

/// A [`Syntax`] has an empty delimiter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InvalidSyntax {
	/// The marker with the empty delimiter.
	pub marker: &'static str,

	/// Which of the two delimiters is empty.
	pub delimiter: &'static str,
}

impl std::error::Error for InvalidSyntax {}

impl std::fmt::Display for InvalidSyntax {
	fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
		write!(f, "Empty {} delimiter for {} markers", self.delimiter, self.marker)
	}
}
