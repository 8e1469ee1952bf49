//! Virtual documents: host format stand-ins for templates.
//!
//! A virtual document replaces every template construct with a placeholder (or nothing),
//! so that tooling for the host format can be run on it.
//! The [`MappingTable`] records how ranges of the virtual text correspond to ranges of the template source.

use std::ops::Range;

use crate::mapper::PositionMapper;
use crate::scan::DirectiveKind;
use crate::template::{DirectiveNode, Node, TemplateTree};

mod placeholder;
pub use placeholder::*;

/// A virtual document together with its mapping to the template source.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VirtualDocument {
	text: String,
	mapping: MappingTable,
}

impl VirtualDocument {
	/// Get the virtual text.
	#[inline]
	pub fn text(&self) -> &str {
		&self.text
	}

	/// Get the mapping between the template source and the virtual text.
	#[inline]
	pub fn mapping(&self) -> &MappingTable {
		&self.mapping
	}

	/// Get a position mapper for the document.
	#[inline]
	pub fn mapper(&self) -> PositionMapper<'_> {
		PositionMapper::new(&self.mapping)
	}

	/// Split the document into the virtual text and the mapping table.
	pub fn into_parts(self) -> (String, MappingTable) {
		(self.text, self.mapping)
	}
}

/// The correspondence between ranges of a template source and ranges of its virtual text.
///
/// Entries are sorted by their original ranges and by their virtual ranges.
/// The original ranges of all entries together cover the whole template source without overlapping.
/// The non-empty virtual ranges together cover the whole virtual text without overlapping.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct MappingTable {
	entries: Vec<MappingEntry>,
	original_len: usize,
	virtual_len: usize,
}

impl MappingTable {
	/// Get the entries in order.
	#[inline]
	pub fn entries(&self) -> &[MappingEntry] {
		&self.entries
	}

	/// The length of the template source in bytes.
	#[inline]
	pub fn original_len(&self) -> usize {
		self.original_len
	}

	/// The length of the virtual text in bytes.
	#[inline]
	pub fn virtual_len(&self) -> usize {
		self.virtual_len
	}
}

/// One entry of a [`MappingTable`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MappingEntry {
	/// The range in the template source.
	pub original_range: Range<usize>,

	/// The range in the virtual text.
	pub virtual_range: Range<usize>,

	/// How the two ranges relate.
	pub kind: MappingKind,
}

/// How the ranges of a [`MappingEntry`] relate.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum MappingKind {
	/// Literal text, copied to the virtual text unchanged.
	///
	/// Both ranges have the same length.
	Passthrough,

	/// A template construct replaced by a non-empty placeholder.
	///
	/// The construct is atomic: every offset inside one range corresponds to the start of the other range.
	Substituted,

	/// Source text without a counterpart in the virtual text.
	///
	/// This includes constructs whose placeholder is empty.
	///
	/// The virtual range is empty.
	Elided,
}

/// Generate the virtual document for a template tree.
///
/// The tree is walked in source order:
/// * literal text is copied verbatim,
/// * expressions are replaced by [`PlaceholderPolicy::expression_placeholder()`],
/// * directive markers are replaced by [`PlaceholderPolicy::directive_placeholder()`] or removed,
/// * comments are removed.
///
/// Only the first branch of an `if` block is included, and the body of a `for` loop is included once.
/// Include targets are not resolved.
pub fn generate<P>(tree: &TemplateTree, policy: &P) -> VirtualDocument
where
	P: PlaceholderPolicy + ?Sized,
{
	let mut generator = Generator {
		policy,
		text: String::with_capacity(tree.len()),
		entries: Vec::new(),
	};
	generator.nodes(tree.nodes());

	let Generator { text, entries, .. } = generator;
	tracing::debug!(entries = entries.len(), original_len = tree.len(), virtual_len = text.len(), "generated virtual document");
	let mapping = MappingTable {
		entries,
		original_len: tree.len(),
		virtual_len: text.len(),
	};
	VirtualDocument { text, mapping }
}

struct Generator<'p, P: ?Sized> {
	policy: &'p P,
	text: String,
	entries: Vec<MappingEntry>,
}

impl<P: PlaceholderPolicy + ?Sized> Generator<'_, P> {
	fn nodes(&mut self, nodes: &[Node]) {
		for node in nodes {
			self.node(node);
		}
	}

	fn node(&mut self, node: &Node) {
		match node {
			Node::Literal(literal) => self.emit(literal.range.clone(), &literal.text, MappingKind::Passthrough),
			Node::Expression(expression) => {
				let placeholder = self.policy.expression_placeholder(&expression.path);
				self.emit(expression.range.clone(), &placeholder, MappingKind::Substituted);
			},
			Node::Comment(comment) => self.elide(comment.range.clone()),
			Node::Directive(DirectiveNode::If(node)) => {
				if let Some((first, rest)) = node.branches.split_first() {
					self.marker(DirectiveKind::If, first.marker.clone());
					self.nodes(&first.children);
					if let Some(second) = rest.first() {
						self.elide(second.marker.start..node.close.start);
					}
				}
				self.marker(DirectiveKind::If, node.close.clone());
			},
			Node::Directive(DirectiveNode::For(node)) => {
				self.marker(DirectiveKind::For, node.open.clone());
				self.nodes(&node.body);
				self.marker(DirectiveKind::For, node.close.clone());
			},
			Node::Directive(DirectiveNode::Include(node)) => self.marker(DirectiveKind::Include, node.range.clone()),
			Node::Directive(DirectiveNode::Raw(node)) => {
				self.marker(DirectiveKind::Raw, node.open.clone());
				self.nodes(&node.body);
				self.marker(DirectiveKind::Raw, node.close.clone());
			},
		}
	}

	fn marker(&mut self, kind: DirectiveKind, range: Range<usize>) {
		match self.policy.directive_placeholder(kind) {
			Some(placeholder) => self.emit(range, &placeholder, MappingKind::Substituted),
			None => self.elide(range),
		}
	}

	fn emit(&mut self, original_range: Range<usize>, text: &str, kind: MappingKind) {
		// An empty placeholder leaves nothing to map back to.
		if text.is_empty() {
			return self.elide(original_range);
		}
		let start = self.text.len();
		self.text.push_str(text);
		self.entries.push(MappingEntry {
			original_range,
			virtual_range: start..self.text.len(),
			kind,
		});
	}

	fn elide(&mut self, original_range: Range<usize>) {
		let at = self.text.len();
		self.entries.push(MappingEntry {
			original_range,
			virtual_range: at..at,
			kind: MappingKind::Elided,
		});
	}
}

#[cfg(test)]
#[rustfmt::skip]
mod test {
	use super::*;
	use crate::syntax::Syntax;
	use assert2::{assert, check, let_assert};

	fn generate_str(source: &str, policy: &dyn PlaceholderPolicy) -> VirtualDocument {
		let_assert!(Ok(tree) = TemplateTree::parse(source, &Syntax::mustache()));
		generate(&tree, policy)
	}

	fn entry(original_range: Range<usize>, virtual_range: Range<usize>, kind: MappingKind) -> MappingEntry {
		MappingEntry { original_range, virtual_range, kind }
	}

	#[test]
	fn plain_text_passes_through() {
		let document = generate_str("key: value\n", &HostFormat::Yaml);
		check!(document.text() == "key: value\n");
		check!(document.mapping().entries() == [entry(0..11, 0..11, MappingKind::Passthrough)]);
		check!(document.mapping().original_len() == 11);
		check!(document.mapping().virtual_len() == 11);
	}

	#[test]
	fn empty_template() {
		let document = generate_str("", &HostFormat::Json);
		check!(document.text() == "");
		assert!(document.mapping().entries().is_empty());
	}

	#[test]
	fn expressions_become_placeholders() {
		let document = generate_str("title: {{ page.title }}\n", &HostFormat::Yaml);
		check!(document.text() == "title: \"\"\n");
		check!(document.mapping().entries() == [
			entry(0..7, 0..7, MappingKind::Passthrough),
			entry(7..23, 7..9, MappingKind::Substituted),
			entry(23..24, 9..10, MappingKind::Passthrough),
		]);
	}

	#[test]
	fn only_first_branch() {
		let document = generate_str("{{#if flag}}A{{else}}B{{/if}}", &HostFormat::Plain);
		check!(document.text() == "A");
		check!(document.mapping().entries() == [
			entry(0..12, 0..0, MappingKind::Elided),
			entry(12..13, 0..1, MappingKind::Passthrough),
			entry(13..22, 1..1, MappingKind::Elided),
			entry(22..29, 1..1, MappingKind::Elided),
		]);
	}

	#[test]
	fn loop_body_once() {
		let document = generate_str("[{{#for x in xs}}{{x}},{{/for}}]", &HostFormat::Json);
		check!(document.text() == "[null,]");
		let kinds: Vec<_> = document.mapping().entries().iter().map(|e| e.kind).collect();
		check!(kinds == [
			MappingKind::Passthrough,
			MappingKind::Elided,
			MappingKind::Substituted,
			MappingKind::Passthrough,
			MappingKind::Elided,
			MappingKind::Passthrough,
		]);
	}

	#[test]
	fn empty_placeholders_are_elided() {
		let policy = StaticPolicy::new("").with_directive("");
		let document = generate_str("a: {{ x }}\n{{#for i in l}}b{{/for}}", &policy);
		check!(document.text() == "a: \nb");
		check!(document.mapping().entries() == [
			entry(0..3, 0..3, MappingKind::Passthrough),
			entry(3..10, 3..3, MappingKind::Elided),
			entry(10..11, 3..4, MappingKind::Passthrough),
			entry(11..26, 4..4, MappingKind::Elided),
			entry(26..27, 4..5, MappingKind::Passthrough),
			entry(27..35, 5..5, MappingKind::Elided),
		]);
	}

	#[test]
	fn directive_placeholders() {
		let policy = StaticPolicy::new("0").with_directive("#");
		let document = generate_str("a{{#include nav}}b{{! note }}c{{#raw}}{{x}}{{/raw}}", &policy);
		check!(document.text() == "a#bc#{{x}}#");
		check!(document.mapping().entries() == [
			entry(0..1, 0..1, MappingKind::Passthrough),
			entry(1..17, 1..2, MappingKind::Substituted),
			entry(17..18, 2..3, MappingKind::Passthrough),
			entry(18..29, 3..3, MappingKind::Elided),
			entry(29..30, 3..4, MappingKind::Passthrough),
			entry(30..38, 4..5, MappingKind::Substituted),
			entry(38..43, 5..10, MappingKind::Passthrough),
			entry(43..51, 10..11, MappingKind::Substituted),
		]);
	}

	#[test]
	fn entries_cover_both_documents() {
		let source = "a{{#if x}}{{y}}{{else if z}}q{{else}}r{{/if}}{{#for i in l}}{{i}}{{/for}}b";
		let document = generate_str(source, &HostFormat::Markdown);
		let entries = document.mapping().entries();

		let mut original = 0;
		let mut virtual_text = String::new();
		for entry in entries {
			check!(entry.original_range.start == original);
			original = entry.original_range.end;
			check!(entry.virtual_range.start == virtual_text.len());
			virtual_text.push_str(&document.text()[entry.virtual_range.clone()]);
		}
		check!(original == source.len());
		check!(virtual_text == document.text());
	}
}
