//! Module containing error details.

use std::ops::Range;

use crate::scan::DirectiveKind;

/// An error that can occur while scanning or parsing a template.
///
/// Both kinds of error abort the parse of a document version: no partial tree is ever produced.
#[derive(Debug, Clone, Eq, PartialEq)]
pub enum TemplateError {
	/// A template marker is malformed.
	Scan(ScanError),

	/// The directives in the template are not properly nested.
	Parse(ParseError),
}

/// An error that can occur anywhere in the pipeline from source text to rendered output.
#[derive(Debug, Clone, Eq, PartialEq)]
pub enum Error {
	/// A template marker is malformed.
	Scan(ScanError),

	/// The directives in the template are not properly nested.
	Parse(ParseError),

	/// The template could not be rendered with the given data.
	Render(RenderError),
}

impl From<ScanError> for TemplateError {
	#[inline]
	fn from(other: ScanError) -> Self {
		Self::Scan(other)
	}
}

impl From<ParseError> for TemplateError {
	#[inline]
	fn from(other: ParseError) -> Self {
		Self::Parse(other)
	}
}

impl From<ScanError> for Error {
	#[inline]
	fn from(other: ScanError) -> Self {
		Self::Scan(other)
	}
}

impl From<ParseError> for Error {
	#[inline]
	fn from(other: ParseError) -> Self {
		Self::Parse(other)
	}
}

impl From<RenderError> for Error {
	#[inline]
	fn from(other: RenderError) -> Self {
		Self::Render(other)
	}
}

impl From<TemplateError> for Error {
	#[inline]
	fn from(other: TemplateError) -> Self {
		match other {
			TemplateError::Scan(e) => Self::Scan(e),
			TemplateError::Parse(e) => Self::Parse(e),
		}
	}
}

impl std::error::Error for TemplateError {}
impl std::error::Error for Error {}

impl std::fmt::Display for TemplateError {
	fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
		match self {
			Self::Scan(e) => e.fmt(f),
			Self::Parse(e) => e.fmt(f),
		}
	}
}

impl std::fmt::Display for Error {
	fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
		match self {
			Self::Scan(e) => e.fmt(f),
			Self::Parse(e) => e.fmt(f),
			Self::Render(e) => e.fmt(f),
		}
	}
}

/// A template marker in the source text is malformed.
#[derive(Debug, Clone, Eq, PartialEq)]
pub struct ScanError {
	/// The byte offset within the input where the error occurs.
	pub offset: usize,

	/// The length in bytes of the offending text.
	pub len: usize,

	/// What is wrong with the marker.
	pub reason: ScanErrorReason,
}

/// The reason a [`ScanError`] was raised.
#[derive(Debug, Clone, Eq, PartialEq)]
pub enum ScanErrorReason {
	/// An expression marker is missing its closing delimiter.
	UnclosedExpression,

	/// A directive marker is missing its closing delimiter.
	UnclosedDirective,

	/// A comment is missing its closing delimiter.
	UnclosedComment,

	/// A raw block has no end marker.
	UnclosedRaw,

	/// An expression marker contains nothing but whitespace.
	EmptyExpression,

	/// A data path is malformed.
	InvalidPath(InvalidPath),

	/// A directive marker names a directive that does not exist.
	UnknownDirective(String),

	/// The arguments of a directive marker are malformed.
	MalformedArguments {
		/// The directive with the malformed arguments.
		directive: DirectiveKind,

		/// A human readable description of what was expected.
		expected: &'static str,
	},
}

impl std::error::Error for ScanError {}

impl std::fmt::Display for ScanError {
	fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
		match &self.reason {
			ScanErrorReason::UnclosedExpression => write!(f, "Unclosed expression marker"),
			ScanErrorReason::UnclosedDirective => write!(f, "Unclosed directive marker"),
			ScanErrorReason::UnclosedComment => write!(f, "Unclosed comment"),
			ScanErrorReason::UnclosedRaw => write!(f, "Missing end marker for raw block"),
			ScanErrorReason::EmptyExpression => write!(f, "Empty expression"),
			ScanErrorReason::InvalidPath(e) => write!(f, "Invalid data path: {}", e.message),
			ScanErrorReason::UnknownDirective(name) => write!(f, "Unknown directive: {name:?}"),
			ScanErrorReason::MalformedArguments { directive, expected } => {
				write!(f, "Malformed arguments for `{directive}` directive, expected {expected}")
			},
		}
	}
}

/// A data path could not be parsed.
#[derive(Debug, Clone, Eq, PartialEq)]
pub struct InvalidPath {
	/// The byte offset within the path text where the error occurs.
	pub position: usize,

	/// A human readable description of the problem.
	pub message: &'static str,
}

impl std::error::Error for InvalidPath {}

impl std::fmt::Display for InvalidPath {
	fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
		write!(f, "Invalid data path: {}", self.message)
	}
}

/// The directives of a template are not properly nested.
#[derive(Debug, Clone, Eq, PartialEq)]
pub struct ParseError {
	/// The kind of nesting error.
	pub kind: ParseErrorKind,

	/// The directive the error is about.
	pub directive: DirectiveKind,

	/// The range of the offending marker in the source text.
	pub range: Range<usize>,
}

/// The kind of a [`ParseError`].
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum ParseErrorKind {
	/// A directive was opened but never closed.
	UnmatchedOpen,

	/// A closing marker has no open directive to close.
	UnmatchedClose,

	/// An `else` or `elseif` marker appears outside of an `if` block, or after the `else` branch.
	UnexpectedElse,
}

impl std::error::Error for ParseError {}

impl std::fmt::Display for ParseError {
	fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
		match self.kind {
			ParseErrorKind::UnmatchedOpen => write!(f, "Unmatched `{}` directive: missing closing marker", self.directive),
			ParseErrorKind::UnmatchedClose => write!(f, "Unmatched closing marker for `{}` directive", self.directive),
			ParseErrorKind::UnexpectedElse => write!(f, "Unexpected `{}` outside of an `if` block", self.directive),
		}
	}
}

/// A template could not be rendered.
#[derive(Debug, Clone, Eq, PartialEq)]
pub struct RenderError {
	/// What went wrong.
	pub kind: RenderErrorKind,

	/// The range of the node that failed to render.
	///
	/// The range refers to the document named by the last entry of [`Self::include_trail`],
	/// or to the top-level document if the trail is empty.
	pub range: Range<usize>,

	/// The include targets that were entered to reach the failing node, outermost first.
	pub include_trail: Vec<String>,
}

/// The kind of a [`RenderError`].
#[derive(Debug, Clone, Eq, PartialEq)]
pub enum RenderErrorKind {
	/// A data path does not resolve to a value.
	UndefinedPath {
		/// The path that could not be resolved.
		path: String,
	},

	/// A value has the wrong type for where it is used.
	TypeMismatch {
		/// The path of the value.
		path: String,

		/// A human readable description of what was expected.
		expected: &'static str,

		/// The type of the value that was found.
		found: &'static str,
	},

	/// The include resolver does not know the include target.
	IncludeNotFound {
		/// The include target.
		target: String,
	},

	/// Includes are nested deeper than the limit.
	MaxDepthExceeded {
		/// The maximum include depth.
		limit: usize,
	},
}

impl std::error::Error for RenderError {}

impl std::fmt::Display for RenderError {
	fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
		match &self.kind {
			RenderErrorKind::UndefinedPath { path } => write!(f, "Undefined data path: {path}")?,
			RenderErrorKind::TypeMismatch { path, expected, found } => {
				write!(f, "Type mismatch for {path}: expected {expected}, found {found}")?
			},
			RenderErrorKind::IncludeNotFound { target } => write!(f, "Include not found: {target}")?,
			RenderErrorKind::MaxDepthExceeded { limit } => write!(f, "Includes nested deeper than {limit} levels")?,
		}
		if let Some(document) = self.include_trail.last() {
			write!(f, " (in {document})")?;
		}
		Ok(())
	}
}

impl ScanError {
	/// Get the range in the source text that contains the error.
	pub fn source_range(&self) -> Range<usize> {
		self.offset..self.offset + self.len
	}
}

impl ParseError {
	/// Get the range in the source text that contains the error.
	pub fn source_range(&self) -> Range<usize> {
		self.range.clone()
	}
}

impl RenderError {
	/// Get the range in the source text that contains the error.
	pub fn source_range(&self) -> Range<usize> {
		self.range.clone()
	}
}

impl TemplateError {
	/// Get the range in the source text that contains the error.
	pub fn source_range(&self) -> Range<usize> {
		match self {
			Self::Scan(e) => e.source_range(),
			Self::Parse(e) => e.source_range(),
		}
	}

	/// Get the line of source that contains the error.
	///
	/// # Panics
	/// May panic if the source text is not the original source that contains the error.
	pub fn source_line<'a>(&self, source: &'a str) -> &'a str {
		source_line(source, self.source_range().start)
	}

	/// Write source highlighting for the error location.
	///
	/// The highlighting ends with a newline.
	///
	/// Note: this function doesn't print anything if the source line exceeds 60 characters in width.
	/// For more control over this behaviour, consider using [`Self::source_range()`] and [`Self::source_line()`] instead.
	pub fn write_source_highlighting(&self, f: &mut impl std::fmt::Write, source: &str) -> std::fmt::Result {
		write_source_highlighting(f, source, self.source_range())
	}

	/// Get source highlighting for the error location as a string.
	///
	/// The highlighting ends with a newline.
	pub fn source_highlighting(&self, source: &str) -> String {
		let mut output = String::new();
		// Writing to a `String` never fails.
		let _ = self.write_source_highlighting(&mut output, source);
		output
	}
}

impl Error {
	/// Get the range in the source text that contains the error.
	pub fn source_range(&self) -> Range<usize> {
		match self {
			Self::Scan(e) => e.source_range(),
			Self::Parse(e) => e.source_range(),
			Self::Render(e) => e.source_range(),
		}
	}

	/// Get the line of source that contains the error.
	///
	/// # Panics
	/// May panic if the source text is not the original source that contains the error.
	pub fn source_line<'a>(&self, source: &'a str) -> &'a str {
		source_line(source, self.source_range().start)
	}

	/// Write source highlighting for the error location.
	///
	/// See [`TemplateError::write_source_highlighting()`].
	pub fn write_source_highlighting(&self, f: &mut impl std::fmt::Write, source: &str) -> std::fmt::Result {
		write_source_highlighting(f, source, self.source_range())
	}

	/// Get source highlighting for the error location as a string.
	///
	/// The highlighting ends with a newline.
	pub fn source_highlighting(&self, source: &str) -> String {
		let mut output = String::new();
		let _ = self.write_source_highlighting(&mut output, source);
		output
	}
}

fn source_line(source: &str, position: usize) -> &str {
	let start = line_start(source.as_bytes(), position);
	let end = line_end(source.as_bytes(), position);
	&source[start..end]
}

fn write_source_highlighting(f: &mut impl std::fmt::Write, source: &str, range: Range<usize>) -> std::fmt::Result {
	use unicode_width::UnicodeWidthStr;

	let start = line_start(source.as_bytes(), range.start);
	let end = line_end(source.as_bytes(), range.start);
	let line = &source[start..end];
	if line.width() > 60 {
		return Ok(());
	}

	// Only the part of the range on the first line is underlined.
	let range = range.start - start..range.end.min(end).max(range.start) - start;
	write!(f, "  {}\n  ", line)?;
	write_underline(f, line, range)?;
	writeln!(f)
}

fn line_start(source: &[u8], position: usize) -> usize {
	match source[..position].iter().rposition(|&c| c == b'\n' || c == b'\r') {
		Some(line_end) => line_end + 1,
		None => 0,
	}
}

fn line_end(source: &[u8], position: usize) -> usize {
	match source[position..].iter().position(|&c| c == b'\n' || c == b'\r') {
		Some(line_end) => position + line_end,
		None => source.len(),
	}
}

fn write_underline(f: &mut impl std::fmt::Write, line: &str, range: Range<usize>) -> std::fmt::Result {
	use unicode_width::UnicodeWidthStr;
	let spaces = line[..range.start].width();
	let carets = line[range].width().max(1);
	write!(f, "{}", " ".repeat(spaces))?;
	write!(f, "{}", "^".repeat(carets))?;
	Ok(())
}

#[cfg(test)]
#[rustfmt::skip]
mod test {
	use super::*;
	use assert2::check;

	#[test]
	fn highlight_render_error() {
		let source = "title: {{ page.title }}\nbody: x";
		let error = Error::Render(RenderError {
			kind: RenderErrorKind::UndefinedPath { path: "page.title".into() },
			range: 7..23,
			include_trail: Vec::new(),
		});
		check!(error.to_string() == "Undefined data path: page.title");
		check!(error.source_line(source) == "title: {{ page.title }}");
		check!(error.source_highlighting(source) == concat!(
			"  title: {{ page.title }}\n",
			"         ^^^^^^^^^^^^^^^^\n",
		));
	}

	#[test]
	fn include_trail_in_message() {
		let error = RenderError {
			kind: RenderErrorKind::IncludeNotFound { target: "footer".into() },
			range: 0..20,
			include_trail: vec!["page".into(), "layout".into()],
		};
		check!(error.to_string() == "Include not found: footer (in layout)");
	}

	#[test]
	fn long_lines_are_not_highlighted() {
		let source = format!("{}{{{{ x", "a".repeat(60));
		let error = TemplateError::Scan(ScanError { offset: 60, len: 4, reason: ScanErrorReason::UnclosedExpression });
		check!(error.source_highlighting(&source) == "");
	}

	#[test]
	fn highlight_wide_characters() {
		let source = "日本: {{! x";
		let error = TemplateError::Scan(ScanError { offset: 8, len: 5, reason: ScanErrorReason::UnclosedComment });
		check!(error.source_highlighting(source) == concat!(
			"  日本: {{! x\n",
			"        ^^^^^\n",
		));
	}
}
