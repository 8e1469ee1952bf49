//! Delegating editor features to host format tooling.
//!
//! Host tooling only ever sees the virtual text of a document.
//! The [`Delegator`] translates its results back to template source coordinates,
//! and drops results that have no counterpart in the template source.

use std::ops::Range;

use crate::error::{RenderError, TemplateError};
use crate::mapper::PositionMapper;
use crate::syntax::Syntax;
use crate::template::TemplateTree;
use crate::virtual_doc::{PlaceholderPolicy, VirtualDocument};

/// The severity of a [`Diagnostic`].
#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Severity {
	/// Reports an error.
	Error,

	/// Reports a warning.
	Warning,

	/// Reports an information.
	Information,

	/// Reports a hint.
	Hint,
}

/// A problem reported for a range of a document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Diagnostic {
	/// The byte range the diagnostic applies to.
	pub range: Range<usize>,

	/// The severity of the diagnostic.
	pub severity: Severity,

	/// The message to show to the user.
	pub message: String,

	/// The tool that produced the diagnostic.
	pub source: Option<String>,
}

impl Diagnostic {
	/// The source name of diagnostics about the template itself.
	pub const TEMPLATE_SOURCE: &'static str = "embedtpl";

	/// Create a new diagnostic without a source.
	pub fn new(range: Range<usize>, severity: Severity, message: impl Into<String>) -> Self {
		Self {
			range,
			severity,
			message: message.into(),
			source: None,
		}
	}

	/// Set the source of the diagnostic.
	pub fn with_source(mut self, source: impl Into<String>) -> Self {
		self.source = Some(source.into());
		self
	}
}

impl From<&TemplateError> for Diagnostic {
	fn from(other: &TemplateError) -> Self {
		Self::new(other.source_range(), Severity::Error, other.to_string()).with_source(Self::TEMPLATE_SOURCE)
	}
}

/// The range of a render error refers to the innermost included template if the include trail is not empty.
impl From<&RenderError> for Diagnostic {
	fn from(other: &RenderError) -> Self {
		Self::new(other.source_range(), Severity::Error, other.to_string()).with_source(Self::TEMPLATE_SOURCE)
	}
}

/// A completion item.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Completion {
	/// The text to show in the completion list, and to insert if there is no replacement range.
	pub label: String,

	/// The range of text to replace with the label.
	pub replace: Option<Range<usize>>,

	/// Additional details to show with the completion.
	pub detail: Option<String>,
}

impl Completion {
	/// Create a completion that inserts its label at the cursor.
	pub fn new(label: impl Into<String>) -> Self {
		Self {
			label: label.into(),
			replace: None,
			detail: None,
		}
	}
}

/// Trait for host format tooling, like a language server for the host format.
///
/// All offsets and ranges are in virtual text coordinates.
pub trait HostTooling {
	/// Get the diagnostics for a text.
	fn diagnostics(&self, text: &str) -> Vec<Diagnostic>;

	/// Get completions at an offset in a text.
	fn completions(&self, text: &str, offset: usize) -> Vec<Completion> {
		let _ = (text, offset);
		Vec::new()
	}
}

impl<T> HostTooling for &'_ T
where
	T: ?Sized + HostTooling,
{
	#[inline(always)]
	fn diagnostics(&self, text: &str) -> Vec<Diagnostic> {
		T::diagnostics(self, text)
	}

	#[inline(always)]
	fn completions(&self, text: &str, offset: usize) -> Vec<Completion> {
		T::completions(self, text, offset)
	}
}

impl<T> HostTooling for std::boxed::Box<T>
where
	T: ?Sized + HostTooling,
{
	#[inline(always)]
	fn diagnostics(&self, text: &str) -> Vec<Diagnostic> {
		T::diagnostics(self, text)
	}

	#[inline(always)]
	fn completions(&self, text: &str, offset: usize) -> Vec<Completion> {
		T::completions(self, text, offset)
	}
}

/// Runs host tooling on a virtual document and maps the results back to the template source.
#[derive(Debug)]
pub struct Delegator<'a, T> {
	text: &'a str,
	mapper: PositionMapper<'a>,
	tooling: T,
}

impl<'a, T: HostTooling> Delegator<'a, T> {
	/// Create a delegator for a virtual document.
	pub fn new(document: &'a VirtualDocument, tooling: T) -> Self {
		Self::from_parts(document.text(), document.mapper(), tooling)
	}

	/// Create a delegator from a virtual text and the mapper for it.
	pub fn from_parts(text: &'a str, mapper: PositionMapper<'a>, tooling: T) -> Self {
		Self { text, mapper, tooling }
	}

	/// Get the host diagnostics, with ranges in template source coordinates.
	///
	/// Diagnostics that can not be mapped to the template source are dropped.
	pub fn diagnostics(&self) -> Vec<Diagnostic> {
		let diagnostics = self.tooling.diagnostics(self.text);
		let total = diagnostics.len();
		let mapped: Vec<_> = diagnostics
			.into_iter()
			.filter_map(|diagnostic| match self.mapper.to_original_range(diagnostic.range.clone()) {
				Some(range) => Some(Diagnostic { range, ..diagnostic }),
				None => {
					tracing::debug!(range = ?diagnostic.range, message = %diagnostic.message, "dropping host diagnostic without a template range");
					None
				},
			})
			.collect();
		tracing::debug!(total, mapped = mapped.len(), "mapped host diagnostics");
		mapped
	}

	/// Get host completions at an offset in the template source.
	///
	/// Returns nothing if the offset has no counterpart in the virtual text.
	/// Completions with a replacement range that can not be mapped to the template source are dropped.
	pub fn completions(&self, original_offset: usize) -> Vec<Completion> {
		let Some(offset) = self.mapper.to_virtual(original_offset) else {
			tracing::debug!(offset = original_offset, "no virtual offset for completion request");
			return Vec::new();
		};
		self.tooling
			.completions(self.text, offset)
			.into_iter()
			.filter_map(|completion| match completion.replace {
				None => Some(completion),
				Some(range) => match self.mapper.to_original_range(range.clone()) {
					Some(replace) => Some(Completion {
						replace: Some(replace),
						..completion
					}),
					None => {
						tracing::debug!(range = ?range, label = %completion.label, "dropping host completion without a template range");
						None
					},
				},
			})
			.collect()
	}
}

/// Get all diagnostics for a template document.
///
/// If the template can not be parsed, the result is a single diagnostic for the template error.
/// Otherwise the virtual document is generated and the host diagnostics are mapped back to the template source.
pub fn document_diagnostics<P, T>(source: &str, syntax: &Syntax, policy: &P, tooling: T) -> Vec<Diagnostic>
where
	P: PlaceholderPolicy + ?Sized,
	T: HostTooling,
{
	let tree = match TemplateTree::parse(source, syntax) {
		Ok(tree) => tree,
		Err(e) => return vec![Diagnostic::from(&e)],
	};
	let document = crate::virtual_doc::generate(&tree, policy);
	Delegator::new(&document, tooling).diagnostics()
}
