use std::ops::Range;

use super::{Branch, CommentNode, DirectiveNode, ExpressionNode, ForNode, IfNode, IncludeNode, LiteralNode, Node, RawNode, TemplateTree};
use crate::error::{ParseError, ParseErrorKind};
use crate::path::DataPath;
use crate::scan::{Directive, DirectiveKind, Segment};

/// Build a [`TemplateTree`] from scanned segments.
///
/// Every opening directive must be closed by a closing marker of the same kind,
/// and `else` and `elseif` markers may only appear directly inside an `if` block.
/// An `include` directive has no closing marker.
///
/// The first nesting error is returned:
/// * a closing marker for a directive that is open further out reports the innermost open directive as [`ParseErrorKind::UnmatchedOpen`],
/// * any other mismatched closing marker is reported as [`ParseErrorKind::UnmatchedClose`],
/// * directives still open at the end of the input report the innermost one as [`ParseErrorKind::UnmatchedOpen`].
pub fn parse<'a, I>(segments: I) -> Result<TemplateTree, ParseError>
where
	I: IntoIterator<Item = Segment<'a>>,
{
	let mut root = Vec::new();
	let mut stack = Vec::new();
	let mut len = 0;

	for segment in segments {
		len = len.max(segment.range().end);
		match segment {
			Segment::Literal { text, range } => {
				children(&mut root, &mut stack).push(Node::Literal(LiteralNode { text: text.to_owned(), range }));
			},
			Segment::Expression { path, range } => {
				children(&mut root, &mut stack).push(Node::Expression(ExpressionNode { path, range }));
			},
			Segment::Comment { range } => {
				children(&mut root, &mut stack).push(Node::Comment(CommentNode { range }));
			},
			Segment::DirectiveOpen { directive, range } => open(&mut root, &mut stack, directive, range)?,
			Segment::DirectiveClose { kind, range } => close(&mut root, &mut stack, kind, range)?,
		}
	}

	if let Some(frame) = stack.last() {
		return Err(ParseError {
			kind: ParseErrorKind::UnmatchedOpen,
			directive: frame.kind(),
			range: frame.open.clone(),
		});
	}

	Ok(TemplateTree::new(root, len))
}

/// A directive that has been opened but not closed yet.
struct Frame {
	open: Range<usize>,
	body: FrameBody,
}

enum FrameBody {
	If {
		first: Branch,
		rest: Vec<Branch>,
	},
	For {
		binding: String,
		collection: DataPath,
		body: Vec<Node>,
	},
	Raw {
		body: Vec<Node>,
	},
}

impl Frame {
	fn kind(&self) -> DirectiveKind {
		match self.body {
			FrameBody::If { .. } => DirectiveKind::If,
			FrameBody::For { .. } => DirectiveKind::For,
			FrameBody::Raw { .. } => DirectiveKind::Raw,
		}
	}

	/// The node list that new nodes are added to.
	fn children_mut(&mut self) -> &mut Vec<Node> {
		match &mut self.body {
			FrameBody::If { first, rest } => match rest.last_mut() {
				Some(branch) => &mut branch.children,
				None => &mut first.children,
			},
			FrameBody::For { body, .. } => body,
			FrameBody::Raw { body } => body,
		}
	}

	fn finish(self, close: Range<usize>) -> DirectiveNode {
		let open = self.open;
		match self.body {
			FrameBody::If { first, rest } => {
				let mut branches = Vec::with_capacity(rest.len() + 1);
				branches.push(first);
				branches.extend(rest);
				DirectiveNode::If(IfNode { branches, close })
			},
			FrameBody::For { binding, collection, body } => {
				DirectiveNode::For(ForNode { binding, collection, open, body, close })
			},
			FrameBody::Raw { body } => DirectiveNode::Raw(RawNode { open, body, close }),
		}
	}
}

fn children<'f>(root: &'f mut Vec<Node>, stack: &'f mut [Frame]) -> &'f mut Vec<Node> {
	match stack.last_mut() {
		Some(frame) => frame.children_mut(),
		None => root,
	}
}

fn open(root: &mut Vec<Node>, stack: &mut Vec<Frame>, directive: Directive, range: Range<usize>) -> Result<(), ParseError> {
	let body = match directive {
		Directive::If { condition } => FrameBody::If {
			first: Branch { condition: Some(condition), marker: range.clone(), children: Vec::new() },
			rest: Vec::new(),
		},
		Directive::ElseIf { condition } => return branch(stack, DirectiveKind::ElseIf, Some(condition), range),
		Directive::Else => return branch(stack, DirectiveKind::Else, None, range),
		Directive::For { binding, collection } => FrameBody::For { binding, collection, body: Vec::new() },
		Directive::Raw => FrameBody::Raw { body: Vec::new() },
		Directive::Include { target } => {
			children(root, stack).push(Node::Directive(DirectiveNode::Include(IncludeNode { target, range })));
			return Ok(());
		},
	};
	stack.push(Frame { open: range, body });
	Ok(())
}

/// Start a new branch in the innermost `if` block.
fn branch(stack: &mut [Frame], kind: DirectiveKind, condition: Option<DataPath>, marker: Range<usize>) -> Result<(), ParseError> {
	if let Some(Frame { body: FrameBody::If { first, rest }, .. }) = stack.last_mut() {
		let after_else = rest.last().unwrap_or(&*first).condition.is_none();
		if !after_else {
			rest.push(Branch { condition, marker, children: Vec::new() });
			return Ok(());
		}
	}
	Err(ParseError {
		kind: ParseErrorKind::UnexpectedElse,
		directive: kind,
		range: marker,
	})
}

fn close(root: &mut Vec<Node>, stack: &mut Vec<Frame>, kind: DirectiveKind, range: Range<usize>) -> Result<(), ParseError> {
	match stack.pop() {
		Some(frame) if frame.kind() == kind => {
			let node = frame.finish(range);
			children(root, stack).push(Node::Directive(node));
			Ok(())
		},
		Some(frame) if stack.iter().any(|outer| outer.kind() == kind) => Err(ParseError {
			kind: ParseErrorKind::UnmatchedOpen,
			directive: frame.kind(),
			range: frame.open,
		}),
		_ => Err(ParseError {
			kind: ParseErrorKind::UnmatchedClose,
			directive: kind,
			range,
		}),
	}
}
