//! Templates embedded in host formats like YAML, JSON, TOML, Markdown and HTML.
//!
//! A template is a document in a host format, annotated with expressions and directives:
//!
//! ```text
//! title: {{ page.title }}
//! {{#if page.tags}}
//! tags:
//! {{#for tag in page.tags}}
//!   - {{ tag }}
//! {{/for}}
//! {{/if}}
//! ```
//!
//! The same parsed template serves two purposes:
//!
//! * It can be rendered with data, producing a plain host format document (see [`render()`]).
//! * It can be turned into a [`VirtualDocument`]: a stand-in document in the host format with every
//!   template construct replaced by a placeholder (see [`build_virtual_document()`]).
//!   Tooling for the host format can run on the virtual text, and the [`PositionMapper`] translates
//!   its results back to the template source.
//!
//! # Features
//!
//! * Configurable marker delimiters, with [`Syntax::mustache()`] and [`Syntax::html_comments()`] presets.
//! * `if` / `else if` / `else`, `for`, `include` and `raw` directives.
//! * Data paths with keys and indices: `{{ chapters[0].title }}`.
//! * Errors with source highlighting.
//! * Conversion of JSON, YAML and TOML values into template data (optional, requires the `json`, `yaml` or `toml` feature).
//! * Host tooling adapters that report JSON, YAML and TOML syntax errors in virtual documents (same features).
//!
//! # Examples
//!
//! Rendering a template:
//! ```
//! # fn main() -> Result<(), embedtpl::Error> {
//! use embedtpl::{NullResolver, Value};
//!
//! let data = [("name", Value::from("world"))];
//! assert_eq!(embedtpl::render("Hello {{ name }}!", &data, &NullResolver)?, "Hello world!");
//! # Ok(())
//! # }
//! ```
//!
//! Building a virtual document and mapping offsets back to the template:
//! ```
//! # fn main() -> Result<(), embedtpl::TemplateError> {
//! use embedtpl::HostFormat;
//!
//! let source = "name: {{ name }}\n{{#if admin}}role: admin\n{{/if}}";
//! let document = embedtpl::build_virtual_document(source, &HostFormat::Yaml)?;
//! assert_eq!(document.text(), "name: \"\"\nrole: admin\n");
//!
//! let mapper = document.mapper();
//! assert_eq!(mapper.to_original(9), Some(30));
//! assert_eq!(mapper.to_virtual(17), None);
//! # Ok(())
//! # }
//! ```
#![warn(missing_docs, missing_debug_implementations)]
#![cfg_attr(feature = "doc-cfg", feature(doc_cfg))]

pub mod error;
pub use error::{Error, TemplateError};

mod config;
pub use config::*;

mod data;
pub use data::*;

pub mod delegate;
pub use delegate::{Completion, Delegator, Diagnostic, HostTooling, Severity};

mod features;
#[allow(unused_imports)]
pub use features::*;

pub mod include;
pub use include::{IncludeResolver, MemoryResolver, NullResolver};

mod line_index;
pub use line_index::*;

pub mod mapper;
pub use mapper::PositionMapper;

mod path;
pub use path::*;

pub mod scan;
pub use scan::{scan, Directive, DirectiveKind, Segment};

mod syntax;
pub use syntax::*;

pub mod template;
pub use template::{parse, Template, TemplateTree, MAX_INCLUDE_DEPTH};

pub mod virtual_doc;
pub use virtual_doc::{HostFormat, MappingEntry, MappingKind, MappingTable, PlaceholderPolicy, StaticPolicy, VirtualDocument};

/// Render a template with the default [`Syntax`].
///
/// The data can be any [`DataContext`], like a [`BTreeMap`][std::collections::BTreeMap] or
/// [`HashMap`][std::collections::HashMap] with [`Value`]s, or a [`Value::Map`].
/// The resolver provides the templates for `include` directives.
///
/// See [`template::render()`] for the rendering rules.
pub fn render<C, R>(source: &str, data: &C, resolver: &R) -> Result<String, Error>
where
	C: DataContext + ?Sized,
	R: IncludeResolver + ?Sized,
{
	render_with(source, &Syntax::default(), data, resolver)
}

/// Render a template with the given [`Syntax`].
pub fn render_with<C, R>(source: &str, syntax: &Syntax, data: &C, resolver: &R) -> Result<String, Error>
where
	C: DataContext + ?Sized,
	R: IncludeResolver + ?Sized,
{
	let tree = TemplateTree::parse(source, syntax)?;
	Ok(template::render(&tree, data, resolver)?)
}

/// Build the virtual document for a template with the default [`Syntax`].
///
/// See [`virtual_doc::generate()`] for details.
pub fn build_virtual_document<P>(source: &str, policy: &P) -> Result<VirtualDocument, TemplateError>
where
	P: PlaceholderPolicy + ?Sized,
{
	build_virtual_document_with(source, &Syntax::default(), policy)
}

/// Build the virtual document for a template with the given [`Syntax`].
pub fn build_virtual_document_with<P>(source: &str, syntax: &Syntax, policy: &P) -> Result<VirtualDocument, TemplateError>
where
	P: PlaceholderPolicy + ?Sized,
{
	let tree = TemplateTree::parse(source, syntax)?;
	Ok(virtual_doc::generate(&tree, policy))
}

#[cfg(test)]
#[rustfmt::skip]
mod test {
	use super::*;
	use crate::error::{ParseError, ParseErrorKind, RenderErrorKind};
	use assert2::{assert, check, let_assert};

	const SAMPLES: &[&str] = &[
		"",
		"plain: text\n",
		"Hello {{ name }}!",
		"{{#if flag}}A{{else}}B{{/if}}",
		"a: {{a}}\n{{#if b}}b: {{b}}\n{{else if c}}c: 1\n{{else}}d: 2\n{{/if}}e: [{{#for x in xs}}{{x}}, {{/for}}]\n",
		"{{! comment }}{{#include header}}\n{{#raw}}{{ not scanned }}{{/raw}}",
		"{{#for row in rows}}{{#for cell in row}}|{{cell}}{{/for}}|\n{{/for}}",
		"{{#if a}}{{#if b}}x{{/if}}{{/if}}tail",
	];

	#[test]
	fn scenario_render_expression() {
		let data = [("name", Value::from("World"))];
		let_assert!(Ok(output) = render("Hello {{ name }}!", &data, &NullResolver));
		check!(output == "Hello World!");
	}

	#[test]
	fn scenario_false_condition() {
		let source = "{{#if flag}}A{{else}}B{{/if}}";
		let data = [("flag", Value::from(false))];
		check!(render(source, &data, &NullResolver).as_deref() == Ok("B"));
		let_assert!(Ok(document) = build_virtual_document(source, &StaticPolicy::new("x")));
		check!(document.text() == "A");
	}

	#[test]
	fn scenario_missing_value() {
		let_assert!(Err(Error::Render(e)) = render("{{ missing }}", &NoData, &NullResolver));
		check!(e.kind == RenderErrorKind::UndefinedPath { path: "missing".into() });
		check!(e.range == (0..13));
	}

	#[test]
	fn scenario_unclosed_if() {
		let source = "x\n{{#if flag}}A";
		let expected = ParseError { kind: ParseErrorKind::UnmatchedOpen, directive: DirectiveKind::If, range: 2..14 };
		let_assert!(Err(TemplateError::Parse(e)) = build_virtual_document(source, &HostFormat::Plain));
		check!(e == expected);
		let_assert!(Err(e) = render(source, &NoData, &NullResolver));
		check!(e == Error::Parse(expected));
		check!(e.to_string() == "Unmatched `if` directive: missing closing marker");
		check!(e.source_highlighting(source) == concat!(
			"  {{#if flag}}A\n",
			"  ^^^^^^^^^^^^\n",
		));
	}

	#[test]
	fn scenario_elided_diagnostic_is_dropped() {
		struct MarkerTooling;

		impl HostTooling for MarkerTooling {
			fn diagnostics(&self, text: &str) -> Vec<Diagnostic> {
				// Report a zero width problem right where the `else` branch was cut.
				let at = text.len();
				vec![
					Diagnostic::new(at..at, Severity::Error, "unexpected end"),
					Diagnostic::new(0..1, Severity::Warning, "suspicious"),
				]
			}
		}

		let_assert!(Ok(document) = build_virtual_document("A{{#if x}}B{{else}}C{{/if}}", &HostFormat::Plain));
		check!(document.text() == "AB");
		let diagnostics = Delegator::new(&document, MarkerTooling).diagnostics();
		check!(diagnostics == [Diagnostic::new(0..1, Severity::Warning, "suspicious")]);
	}

	#[test]
	fn text_without_markers_round_trips() {
		for source in ["", "plain: text\n", "{ \"json\": [1, 2] }", "# Title\n\n<p>html</p>\n", "single { brace }"] {
			let_assert!(Ok(document) = build_virtual_document(source, &HostFormat::Yaml));
			check!(document.text() == source);
			if source.is_empty() {
				assert!(document.mapping().entries().is_empty());
			} else {
				check!(document.mapping().entries() == [MappingEntry {
					original_range: 0..source.len(),
					virtual_range: 0..source.len(),
					kind: MappingKind::Passthrough,
				}]);
			}
		}
	}

	#[test]
	fn entry_starts_map_both_ways() {
		for source in SAMPLES {
			for policy in [HostFormat::Yaml, HostFormat::Json, HostFormat::Markdown] {
				let_assert!(Ok(document) = build_virtual_document(source, &policy));
				let mapper = document.mapper();
				for entry in document.mapping().entries() {
					if entry.kind == MappingKind::Elided {
						continue;
					}
					check!(mapper.to_virtual(entry.original_range.start) == Some(entry.virtual_range.start));
					check!(mapper.to_original(entry.virtual_range.start) == Some(entry.original_range.start));
				}
			}
		}
	}

	#[test]
	fn unbalanced_directives_fail_to_parse() {
		for source in SAMPLES {
			let_assert!(Ok(_) = TemplateTree::parse(source, &Syntax::mustache()));
		}
		for source in ["{{#if a}}", "{{/if}}", "{{#for x in y}}{{/if}}", "{{#if a}}{{#for x in y}}{{/if}}", "{{#if a}}{{/if}}{{/for}}"] {
			let_assert!(Err(TemplateError::Parse(e)) = TemplateTree::parse(source, &Syntax::mustache()));
			assert!(let ParseErrorKind::UnmatchedOpen | ParseErrorKind::UnmatchedClose = e.kind);
		}
	}

	#[test]
	fn rendering_is_idempotent() {
		let mut resolver = MemoryResolver::new();
		let_assert!(Ok(_) = resolver.insert("header", "# {{ a }}"));
		let data = Value::from_iter([
			("a", Value::from("x")),
			("b", Value::from(true)),
			("xs", Value::from(vec![1, 2, 3])),
			("rows", Value::from(vec![vec!["p", "q"], vec!["r"]])),
			("flag", Value::from(1)),
			("name", Value::from("n")),
		]);
		for source in SAMPLES {
			let_assert!(Ok(template) = Template::parse(*source));
			let first = template.render(&data, &resolver);
			let second = template.render(&data, &resolver);
			check!(first == second);
		}
	}

	#[test]
	fn render_with_html_comment_syntax() {
		let source = "<ul>\n<!-- templ:for item in items -->  <li>{{ item }}</li>\n<!-- /templ:for --></ul>\n<!-- plain comment -->";
		let data = Value::from_iter([("items", vec!["a", "b"])]);
		let_assert!(Ok(output) = render_with(source, &Syntax::html_comments(), &data, &NullResolver));
		check!(output == "<ul>\n  <li>a</li>\n  <li>b</li>\n</ul>\n<!-- plain comment -->");
	}
}
