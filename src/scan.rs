//! Splitting source text into literal text and template markers.

use std::ops::Range;

use memchr::memmem;

use crate::error::{ScanError, ScanErrorReason};
use crate::path::{is_valid_name, DataPath};
use crate::syntax::{Marker, Syntax};

/// The kinds of directive.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum DirectiveKind {
	/// A conditional block: `{{#if path}}`.
	If,

	/// An alternative condition inside an `if` block: `{{else if path}}`.
	ElseIf,

	/// The fallback branch of an `if` block: `{{else}}`.
	Else,

	/// A loop over a list: `{{#for item in path}}`.
	For,

	/// The inclusion of another template: `{{#include name}}`.
	Include,

	/// A block of text that is not scanned for markers: `{{#raw}}`.
	Raw,
}

impl DirectiveKind {
	/// The name of the directive as written in a template.
	pub fn name(self) -> &'static str {
		match self {
			Self::If => "if",
			Self::ElseIf => "elseif",
			Self::Else => "else",
			Self::For => "for",
			Self::Include => "include",
			Self::Raw => "raw",
		}
	}

	/// Look up a directive by the name used in templates.
	pub fn from_name(name: &str) -> Option<Self> {
		match name {
			"if" => Some(Self::If),
			"elseif" => Some(Self::ElseIf),
			"else" => Some(Self::Else),
			"for" => Some(Self::For),
			"include" => Some(Self::Include),
			"raw" => Some(Self::Raw),
			_ => None,
		}
	}
}

impl std::fmt::Display for DirectiveKind {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.write_str(self.name())
	}
}

/// An opening directive marker together with its arguments.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Directive {
	/// `{{#if condition}}`
	If {
		/// The value tested for truthiness.
		condition: DataPath,
	},

	/// `{{else if condition}}`
	ElseIf {
		/// The value tested for truthiness.
		condition: DataPath,
	},

	/// `{{else}}`
	Else,

	/// `{{#for binding in collection}}`
	For {
		/// The name bound to each element.
		binding: String,

		/// The list to iterate over.
		collection: DataPath,
	},

	/// `{{#include target}}` or `{{#include "target"}}`
	Include {
		/// The name passed to the include resolver.
		target: String,
	},

	/// `{{#raw}}`
	Raw,
}

impl Directive {
	/// Get the kind of the directive.
	pub fn kind(&self) -> DirectiveKind {
		match self {
			Self::If { .. } => DirectiveKind::If,
			Self::ElseIf { .. } => DirectiveKind::ElseIf,
			Self::Else => DirectiveKind::Else,
			Self::For { .. } => DirectiveKind::For,
			Self::Include { .. } => DirectiveKind::Include,
			Self::Raw => DirectiveKind::Raw,
		}
	}
}

/// A classified span of the source text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Segment<'a> {
	/// Host format text.
	Literal {
		/// The text, borrowed from the source.
		text: &'a str,

		/// The range of the text in the source.
		range: Range<usize>,
	},

	/// A marker that opens a directive or starts a new branch.
	DirectiveOpen {
		/// The directive and its arguments.
		directive: Directive,

		/// The range of the whole marker in the source.
		range: Range<usize>,
	},

	/// A marker that closes a directive.
	DirectiveClose {
		/// The directive being closed.
		kind: DirectiveKind,

		/// The range of the whole marker in the source.
		range: Range<usize>,
	},

	/// An expression to be replaced by a value.
	Expression {
		/// The data path of the value.
		path: DataPath,

		/// The range of the whole marker in the source.
		range: Range<usize>,
	},

	/// A template comment.
	Comment {
		/// The range of the whole comment in the source.
		range: Range<usize>,
	},
}

impl Segment<'_> {
	/// Get the range of the segment in the source.
	pub fn range(&self) -> &Range<usize> {
		match self {
			Self::Literal { range, .. } => range,
			Self::DirectiveOpen { range, .. } => range,
			Self::DirectiveClose { range, .. } => range,
			Self::Expression { range, .. } => range,
			Self::Comment { range } => range,
		}
	}
}

/// Split the source text into segments.
///
/// The returned segments are in source order, do not overlap, and together cover the entire source.
///
/// Marker-like text that can not be scanned is an error, it is never treated as literal text.
pub fn scan<'a>(source: &'a str, syntax: &Syntax) -> Result<Vec<Segment<'a>>, ScanError> {
	Scanner::new(source, syntax).run()
}

struct Scanner<'a, 's> {
	source: &'a str,
	syntax: &'s Syntax,

	/// The distinct first bytes of all opening delimiters.
	first_bytes: Vec<u8>,

	segments: Vec<Segment<'a>>,
}

impl<'a, 's> Scanner<'a, 's> {
	fn new(source: &'a str, syntax: &'s Syntax) -> Self {
		let mut first_bytes = Vec::with_capacity(4);
		for marker in Marker::ALL {
			if let Some(&first) = syntax.delimiters(marker).open.as_bytes().first() {
				if !first_bytes.contains(&first) {
					first_bytes.push(first);
				}
			}
		}
		Self {
			source,
			syntax,
			first_bytes,
			segments: Vec::new(),
		}
	}

	fn run(mut self) -> Result<Vec<Segment<'a>>, ScanError> {
		let mut finger = 0;
		while let Some((start, marker)) = self.find_marker(finger) {
			if start != finger {
				self.literal(finger..start);
			}
			finger = self.marker(start, marker)?;
		}
		if finger < self.source.len() {
			self.literal(finger..self.source.len());
		}
		Ok(self.segments)
	}

	/// Find the next marker at or after `from`.
	///
	/// If multiple opening delimiters match at the same position, the longest one wins.
	fn find_marker(&self, from: usize) -> Option<(usize, Marker)> {
		let bytes = self.source.as_bytes();
		let mut finger = from;
		while finger < bytes.len() {
			let candidate = finger + find_any(&self.first_bytes, &bytes[finger..])?;
			let best = Marker::ALL
				.into_iter()
				.filter(|&marker| {
					let open = self.syntax.delimiters(marker).open.as_bytes();
					!open.is_empty() && bytes[candidate..].starts_with(open)
				})
				.max_by_key(|&marker| self.syntax.delimiters(marker).open.len());
			if let Some(marker) = best {
				return Some((candidate, marker));
			}
			finger = candidate + 1;
		}
		None
	}

	fn literal(&mut self, range: Range<usize>) {
		let source = self.source;
		self.segments.push(Segment::Literal {
			text: &source[range.clone()],
			range,
		});
	}

	/// Scan the marker starting at `start`.
	///
	/// Returns the index of the byte after the marker.
	fn marker(&mut self, start: usize, marker: Marker) -> Result<usize, ScanError> {
		let source = self.source;
		let delimiters = self.syntax.delimiters(marker);
		let content_start = start + delimiters.open.len();
		let content_end = match memmem::find(&source.as_bytes()[content_start..], delimiters.close.as_bytes()) {
			Some(x) => content_start + x,
			None => {
				let reason = match marker {
					Marker::Expression => ScanErrorReason::UnclosedExpression,
					Marker::Block | Marker::End => ScanErrorReason::UnclosedDirective,
					Marker::Comment => ScanErrorReason::UnclosedComment,
				};
				return Err(ScanError {
					offset: start,
					len: delimiters.open.len(),
					reason,
				});
			},
		};
		let end = content_end + delimiters.close.len();
		let range = start..end;
		let content = &source[content_start..content_end];

		match marker {
			Marker::Comment => self.segments.push(Segment::Comment { range }),
			Marker::Expression => {
				let segment = expression(content, content_start, range)?;
				self.segments.push(segment);
			},
			Marker::End => {
				let kind = end_marker(content, range.clone())?;
				self.segments.push(Segment::DirectiveClose { kind, range });
			},
			Marker::Block => {
				let directive = block(content, content_start, range.clone())?;
				let is_raw = directive == Directive::Raw;
				self.segments.push(Segment::DirectiveOpen {
					directive,
					range: range.clone(),
				});
				if is_raw {
					return self.raw_body(range);
				}
			},
		}
		Ok(end)
	}

	/// Scan the body of a raw block up to and including the end marker.
	///
	/// The body is emitted as a single literal without looking for markers.
	/// Returns the index of the byte after the end marker.
	fn raw_body(&mut self, open: Range<usize>) -> Result<usize, ScanError> {
		let source = self.source;
		let syntax = self.syntax;
		let bytes = source.as_bytes();
		let end = &syntax.end;
		let unclosed = ScanError {
			offset: open.start,
			len: open.len(),
			reason: ScanErrorReason::UnclosedRaw,
		};
		if end.open.is_empty() {
			return Err(unclosed);
		}

		let mut finger = open.end;
		while let Some(x) = memmem::find(&bytes[finger..], end.open.as_bytes()) {
			let marker_start = finger + x;
			let content_start = marker_start + end.open.len();
			if let Some(y) = memmem::find(&bytes[content_start..], end.close.as_bytes()) {
				let content_end = content_start + y;
				if source[content_start..content_end].trim() == DirectiveKind::Raw.name() {
					if marker_start != open.end {
						self.literal(open.end..marker_start);
					}
					let marker_end = content_end + end.close.len();
					self.segments.push(Segment::DirectiveClose {
						kind: DirectiveKind::Raw,
						range: marker_start..marker_end,
					});
					return Ok(marker_end);
				}
			}
			finger = marker_start + 1;
		}
		Err(unclosed)
	}
}

/// Parse the contents of an expression marker.
///
/// Expression markers also carry the `else` and `else if` branch markers.
fn expression(content: &str, content_start: usize, range: Range<usize>) -> Result<Segment<'static>, ScanError> {
	let (trimmed, offset) = trim(content, content_start);
	if trimmed.is_empty() {
		return Err(ScanError {
			offset: range.start,
			len: range.len(),
			reason: ScanErrorReason::EmptyExpression,
		});
	}

	let (word, rest, rest_offset) = split_word(trimmed, offset);
	let directive = match word {
		"else" => else_branch(rest, rest_offset, &range)?,
		"elseif" => Directive::ElseIf {
			condition: condition(DirectiveKind::ElseIf, rest, rest_offset, &range)?,
		},
		_ => {
			let path = data_path(trimmed, offset)?;
			return Ok(Segment::Expression { path, range });
		},
	};
	Ok(Segment::DirectiveOpen { directive, range })
}

/// Parse the contents of a block marker.
fn block(content: &str, content_start: usize, range: Range<usize>) -> Result<Directive, ScanError> {
	let (trimmed, offset) = trim(content, content_start);
	let (word, rest, rest_offset) = split_word(trimmed, offset);
	let kind = DirectiveKind::from_name(word).ok_or_else(|| ScanError {
		offset: range.start,
		len: range.len(),
		reason: ScanErrorReason::UnknownDirective(word.to_owned()),
	})?;

	match kind {
		DirectiveKind::If => Ok(Directive::If {
			condition: condition(kind, rest, rest_offset, &range)?,
		}),
		DirectiveKind::ElseIf => Ok(Directive::ElseIf {
			condition: condition(kind, rest, rest_offset, &range)?,
		}),
		DirectiveKind::Else => else_branch(rest, rest_offset, &range),
		DirectiveKind::Raw => {
			no_arguments(kind, rest, &range)?;
			Ok(Directive::Raw)
		},
		DirectiveKind::For => {
			let (binding, after_binding, after_binding_offset) = split_word(rest, rest_offset);
			let (keyword, after_keyword, collection_offset) = split_word(after_binding, after_binding_offset);
			let (collection, trailing, _) = split_word(after_keyword, collection_offset);
			if !is_valid_name(binding) || keyword != "in" || collection.is_empty() || !trailing.is_empty() {
				return Err(malformed(kind, "`<name> in <path>`", &range));
			}
			Ok(Directive::For {
				binding: binding.to_owned(),
				collection: data_path(collection, collection_offset)?,
			})
		},
		DirectiveKind::Include => Ok(Directive::Include {
			target: include_target(rest, &range)?,
		}),
	}
}

/// Parse the contents of an end marker.
fn end_marker(content: &str, range: Range<usize>) -> Result<DirectiveKind, ScanError> {
	let (trimmed, _) = trim(content, 0);
	let (word, rest, _) = split_word(trimmed, 0);
	let kind = DirectiveKind::from_name(word).ok_or_else(|| ScanError {
		offset: range.start,
		len: range.len(),
		reason: ScanErrorReason::UnknownDirective(word.to_owned()),
	})?;
	no_arguments(kind, rest, &range)?;
	match kind {
		DirectiveKind::If | DirectiveKind::For | DirectiveKind::Raw => Ok(kind),
		DirectiveKind::ElseIf | DirectiveKind::Else | DirectiveKind::Include => {
			Err(malformed(kind, "no closing marker, only `if`, `for` and `raw` are closed", &range))
		},
	}
}

/// Parse what follows the `else` keyword: nothing, or `if <path>`.
fn else_branch(rest: &str, rest_offset: usize, range: &Range<usize>) -> Result<Directive, ScanError> {
	if rest.is_empty() {
		return Ok(Directive::Else);
	}
	let (word, condition_text, condition_offset) = split_word(rest, rest_offset);
	if word != "if" {
		return Err(malformed(DirectiveKind::Else, "no arguments or `if <path>`", range));
	}
	Ok(Directive::ElseIf {
		condition: condition(DirectiveKind::ElseIf, condition_text, condition_offset, range)?,
	})
}

fn condition(kind: DirectiveKind, text: &str, offset: usize, range: &Range<usize>) -> Result<DataPath, ScanError> {
	if text.is_empty() || text.contains(char::is_whitespace) {
		return Err(malformed(kind, "a single data path as condition", range));
	}
	data_path(text, offset)
}

fn include_target(text: &str, range: &Range<usize>) -> Result<String, ScanError> {
	if let Some(quoted) = text.strip_prefix('"') {
		match quoted.strip_suffix('"') {
			Some(inner) if !inner.is_empty() && !inner.contains('"') => Ok(inner.to_owned()),
			_ => Err(malformed(DirectiveKind::Include, "a quoted include target", range)),
		}
	} else if text.is_empty() || text.contains(char::is_whitespace) {
		Err(malformed(DirectiveKind::Include, "a single include target", range))
	} else {
		Ok(text.to_owned())
	}
}

fn no_arguments(kind: DirectiveKind, rest: &str, range: &Range<usize>) -> Result<(), ScanError> {
	if rest.is_empty() {
		Ok(())
	} else {
		Err(malformed(kind, "no arguments", range))
	}
}

fn data_path(text: &str, offset: usize) -> Result<DataPath, ScanError> {
	DataPath::parse(text).map_err(|e| ScanError {
		offset: offset + e.position,
		len: 1,
		reason: ScanErrorReason::InvalidPath(e),
	})
}

fn malformed(directive: DirectiveKind, expected: &'static str, range: &Range<usize>) -> ScanError {
	ScanError {
		offset: range.start,
		len: range.len(),
		reason: ScanErrorReason::MalformedArguments { directive, expected },
	}
}

/// Trim whitespace from both ends of `text`, which starts at `offset` in the source.
///
/// Returns the trimmed text and its offset in the source.
fn trim(text: &str, offset: usize) -> (&str, usize) {
	let start_trimmed = text.trim_start();
	let lead = text.len() - start_trimmed.len();
	(start_trimmed.trim_end(), offset + lead)
}

/// Split the first whitespace delimited word off `text`, which starts at `offset` in the source.
///
/// `text` must not start with whitespace.
/// Returns the word, the remaining text without leading whitespace, and the offset of the remaining text.
fn split_word(text: &str, offset: usize) -> (&str, &str, usize) {
	let word_end = text.find(char::is_whitespace).unwrap_or(text.len());
	let rest = text[word_end..].trim_start();
	(&text[..word_end], rest, offset + text.len() - rest.len())
}

/// Find the first occurrence of any of the needles.
fn find_any(needles: &[u8], haystack: &[u8]) -> Option<usize> {
	match *needles {
		[a] => memchr::memchr(a, haystack),
		[a, b] => memchr::memchr2(a, b, haystack),
		[a, b, c] => memchr::memchr3(a, b, c, haystack),
		_ => haystack.iter().position(|c| needles.contains(c)),
	}
}
