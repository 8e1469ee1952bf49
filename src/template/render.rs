use std::ops::Range;

use super::{DirectiveNode, IncludeNode, Node, TemplateTree};
use crate::data::{DataContext, Value};
use crate::error::{RenderError, RenderErrorKind};
use crate::include::IncludeResolver;
use crate::path::DataPath;

/// The maximum nesting depth of `include` directives.
pub const MAX_INCLUDE_DEPTH: usize = 64;

/// Render a template tree with the given data.
///
/// Literal text is copied verbatim, expressions are replaced by the text of their value,
/// comments produce nothing and directives are evaluated:
/// * `if` renders the first branch with a truthy condition, an undefined condition counts as false,
/// * `for` renders its body once for every element of a list, with the loop variable shadowing outer names,
/// * `include` renders the tree returned by the include resolver with the current scope,
/// * `raw` renders its body verbatim.
///
/// Rendering stops at the first error.
/// Errors raised inside an included template carry the chain of include targets that led there.
pub fn render<C, R>(tree: &TemplateTree, data: &C, resolver: &R) -> Result<String, RenderError>
where
	C: DataContext + ?Sized,
	R: IncludeResolver + ?Sized,
{
	let mut output = String::with_capacity(tree.len() + tree.len() / 8);
	let mut renderer = Renderer {
		resolver,
		trail: Vec::new(),
	};
	renderer.nodes(tree.nodes(), &Scope::Root(data), &mut output)?;
	Ok(output)
}

/// The names visible at some point in a template.
///
/// Each `for` iteration pushes a binding that refers back to the enclosing scope.
enum Scope<'a, C: ?Sized> {
	Root(&'a C),
	Binding {
		name: &'a str,
		value: &'a Value,
		parent: &'a Scope<'a, C>,
	},
}

impl<'a, C: DataContext + ?Sized> Scope<'a, C> {
	/// Resolve a path against the innermost binding of its root name, or the data context.
	fn lookup(&self, path: &DataPath) -> Option<&'a Value> {
		match *self {
			Self::Root(data) => data.lookup(path),
			Self::Binding { name, value, parent } => {
				if name == path.root() {
					value.get_path(path.rest())
				} else {
					parent.lookup(path)
				}
			},
		}
	}
}

struct Renderer<'r, R: ?Sized> {
	resolver: &'r R,

	/// The include targets currently being rendered, outermost first.
	trail: Vec<String>,
}

impl<R: IncludeResolver + ?Sized> Renderer<'_, R> {
	fn nodes<'a, C>(&mut self, nodes: &'a [Node], scope: &'a Scope<'a, C>, output: &mut String) -> Result<(), RenderError>
	where
		C: DataContext + ?Sized,
	{
		for node in nodes {
			self.node(node, scope, output)?;
		}
		Ok(())
	}

	fn node<'a, C>(&mut self, node: &'a Node, scope: &'a Scope<'a, C>, output: &mut String) -> Result<(), RenderError>
	where
		C: DataContext + ?Sized,
	{
		match node {
			Node::Literal(literal) => output.push_str(&literal.text),
			Node::Comment(_) => (),
			Node::Expression(expression) => {
				let value = self.lookup(scope, &expression.path, &expression.range)?;
				let text = value.as_text().ok_or_else(|| {
					self.type_mismatch(&expression.path, "a scalar value", value, &expression.range)
				})?;
				output.push_str(&text);
			},
			Node::Directive(DirectiveNode::If(node)) => {
				let branch = node.branches.iter().find(|branch| match &branch.condition {
					Some(condition) => scope.lookup(condition).is_some_and(Value::is_truthy),
					None => true,
				});
				if let Some(branch) = branch {
					self.nodes(&branch.children, scope, output)?;
				}
			},
			Node::Directive(DirectiveNode::For(node)) => {
				let collection = self.lookup(scope, &node.collection, &node.open)?;
				let Value::List(items) = collection else {
					return Err(self.type_mismatch(&node.collection, "a list", collection, &node.open));
				};
				for item in items {
					let scope = Scope::Binding {
						name: &node.binding,
						value: item,
						parent: scope,
					};
					self.nodes(&node.body, &scope, output)?;
				}
			},
			Node::Directive(DirectiveNode::Include(node)) => self.include(node, scope, output)?,
			Node::Directive(DirectiveNode::Raw(node)) => self.nodes(&node.body, scope, output)?,
		}
		Ok(())
	}

	fn include<'a, C>(&mut self, node: &IncludeNode, scope: &'a Scope<'a, C>, output: &mut String) -> Result<(), RenderError>
	where
		C: DataContext + ?Sized,
	{
		if self.trail.len() >= MAX_INCLUDE_DEPTH {
			return Err(self.error(RenderErrorKind::MaxDepthExceeded { limit: MAX_INCLUDE_DEPTH }, &node.range));
		}
		let tree = self.resolver.resolve(&node.target).ok_or_else(|| {
			self.error(RenderErrorKind::IncludeNotFound { target: node.target.clone() }, &node.range)
		})?;

		tracing::trace!(include = %node.target, depth = self.trail.len() + 1, "rendering included template");
		self.trail.push(node.target.clone());
		let result = self.nodes(tree.nodes(), scope, output);
		self.trail.pop();
		result
	}

	fn lookup<'a, C>(&self, scope: &Scope<'a, C>, path: &DataPath, range: &Range<usize>) -> Result<&'a Value, RenderError>
	where
		C: DataContext + ?Sized,
	{
		scope.lookup(path).ok_or_else(|| {
			self.error(RenderErrorKind::UndefinedPath { path: path.to_string() }, range)
		})
	}

	fn type_mismatch(&self, path: &DataPath, expected: &'static str, found: &Value, range: &Range<usize>) -> RenderError {
		let kind = RenderErrorKind::TypeMismatch {
			path: path.to_string(),
			expected,
			found: found.type_name(),
		};
		self.error(kind, range)
	}

	fn error(&self, kind: RenderErrorKind, range: &Range<usize>) -> RenderError {
		RenderError {
			kind,
			range: range.clone(),
			include_trail: self.trail.clone(),
		}
	}
}
