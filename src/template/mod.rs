use std::ops::Range;

use crate::data::DataContext;
use crate::error::{RenderError, TemplateError};
use crate::include::IncludeResolver;
use crate::path::DataPath;
use crate::scan::DirectiveKind;
use crate::syntax::Syntax;
use crate::virtual_doc::{PlaceholderPolicy, VirtualDocument};

mod parse;
pub use parse::parse;

mod render;
pub use render::{render, MAX_INCLUDE_DEPTH};

/// A parsed template.
///
/// You can parse the template once and call [`Self::render()`] or [`Self::virtual_document()`] multiple times.
///
/// The template owns its source text, so it can be used to highlight errors later.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Template {
	source: String,
	tree: TemplateTree,
}

impl Template {
	/// Parse a template using the default [`Syntax`].
	#[inline]
	pub fn parse(source: impl Into<String>) -> Result<Self, TemplateError> {
		Self::parse_with(source, &Syntax::default())
	}

	/// Parse a template using the given syntax.
	pub fn parse_with(source: impl Into<String>, syntax: &Syntax) -> Result<Self, TemplateError> {
		let source = source.into();
		let tree = TemplateTree::parse(&source, syntax)?;
		Ok(Self { source, tree })
	}

	/// Get the original source string.
	#[inline]
	pub fn source(&self) -> &str {
		&self.source
	}

	/// Get the parsed template tree.
	#[inline]
	pub fn tree(&self) -> &TemplateTree {
		&self.tree
	}

	/// Consume the template and return the parsed tree.
	#[inline]
	pub fn into_tree(self) -> TemplateTree {
		self.tree
	}

	/// Render the template with the given data.
	///
	/// See [`render()`] for details.
	#[inline]
	pub fn render<C, R>(&self, data: &C, resolver: &R) -> Result<String, RenderError>
	where
		C: DataContext + ?Sized,
		R: IncludeResolver + ?Sized,
	{
		render(&self.tree, data, resolver)
	}

	/// Generate the virtual document for the template.
	///
	/// See [`crate::virtual_doc::generate()`] for details.
	#[inline]
	pub fn virtual_document<P>(&self, policy: &P) -> VirtualDocument
	where
		P: PlaceholderPolicy + ?Sized,
	{
		crate::virtual_doc::generate(&self.tree, policy)
	}
}

/// The nested structure of a template.
///
/// The tree is rebuilt from scratch for every version of a document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TemplateTree {
	nodes: Vec<Node>,
	len: usize,
}

impl TemplateTree {
	/// Create a tree from top-level nodes and the length of the source text.
	pub fn new(nodes: Vec<Node>, len: usize) -> Self {
		Self { nodes, len }
	}

	/// Scan and parse source text.
	pub fn parse(source: &str, syntax: &Syntax) -> Result<Self, TemplateError> {
		let segments = crate::scan::scan(source, syntax)?;
		tracing::debug!(segments = segments.len(), len = source.len(), "scanned template source");
		Ok(parse(segments)?)
	}

	/// Get the top-level nodes.
	#[inline]
	pub fn nodes(&self) -> &[Node] {
		&self.nodes
	}

	/// Get the length of the source text in bytes.
	#[inline]
	pub fn len(&self) -> usize {
		self.len
	}

	/// Check if the source text was empty.
	#[inline]
	pub fn is_empty(&self) -> bool {
		self.len == 0
	}
}

/// A node in a [`TemplateTree`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Node {
	/// Host format text.
	Literal(LiteralNode),

	/// A value reference.
	Expression(ExpressionNode),

	/// A directive with its nested content.
	Directive(DirectiveNode),

	/// A template comment.
	Comment(CommentNode),
}

impl Node {
	/// Get the range of the node in the source.
	pub fn range(&self) -> Range<usize> {
		match self {
			Self::Literal(node) => node.range.clone(),
			Self::Expression(node) => node.range.clone(),
			Self::Directive(node) => node.range(),
			Self::Comment(node) => node.range.clone(),
		}
	}
}

/// Host format text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LiteralNode {
	/// The text, copied verbatim from the source.
	pub text: String,

	/// The range of the text in the source.
	pub range: Range<usize>,
}

/// A reference to a value in the data context.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExpressionNode {
	/// The data path of the value.
	pub path: DataPath,

	/// The range of the expression marker in the source.
	pub range: Range<usize>,
}

/// A template comment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommentNode {
	/// The range of the comment in the source.
	pub range: Range<usize>,
}

/// A directive node.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DirectiveNode {
	/// An `if` block with all its branches.
	If(IfNode),

	/// A `for` loop.
	For(ForNode),

	/// An `include` directive.
	Include(IncludeNode),

	/// A `raw` block.
	Raw(RawNode),
}

impl DirectiveNode {
	/// Get the kind of the directive.
	pub fn kind(&self) -> DirectiveKind {
		match self {
			Self::If(_) => DirectiveKind::If,
			Self::For(_) => DirectiveKind::For,
			Self::Include(_) => DirectiveKind::Include,
			Self::Raw(_) => DirectiveKind::Raw,
		}
	}

	/// Get the range from the start of the opening marker to the end of the closing marker.
	pub fn range(&self) -> Range<usize> {
		match self {
			Self::If(node) => {
				let start = node.branches.first().map_or(node.close.start, |branch| branch.marker.start);
				start..node.close.end
			},
			Self::For(node) => node.open.start..node.close.end,
			Self::Include(node) => node.range.clone(),
			Self::Raw(node) => node.open.start..node.close.end,
		}
	}
}

/// An `if` block: an `if` branch, any number of `elseif` branches and an optional `else` branch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IfNode {
	/// The branches in source order.
	///
	/// The first branch is the `if` branch, the `else` branch can only be last.
	pub branches: Vec<Branch>,

	/// The range of the closing marker.
	pub close: Range<usize>,
}

/// One branch of an `if` block.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Branch {
	/// The condition of the branch, or `None` for the `else` branch.
	pub condition: Option<DataPath>,

	/// The range of the marker that starts the branch.
	pub marker: Range<usize>,

	/// The content of the branch.
	pub children: Vec<Node>,
}

/// A `for` loop.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ForNode {
	/// The name bound to each element of the collection.
	pub binding: String,

	/// The path of the list to iterate over.
	pub collection: DataPath,

	/// The range of the opening marker.
	pub open: Range<usize>,

	/// The loop body.
	pub body: Vec<Node>,

	/// The range of the closing marker.
	pub close: Range<usize>,
}

/// An `include` directive.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IncludeNode {
	/// The name passed to the include resolver.
	pub target: String,

	/// The range of the marker.
	pub range: Range<usize>,
}

/// A `raw` block.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawNode {
	/// The range of the opening marker.
	pub open: Range<usize>,

	/// The content of the block.
	pub body: Vec<Node>,

	/// The range of the closing marker.
	pub close: Range<usize>,
}
