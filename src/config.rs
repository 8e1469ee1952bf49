//! Per host format configuration.

use crate::error::TemplateError;
use crate::syntax::{InvalidSyntax, Syntax};
use crate::template::Template;
use crate::virtual_doc::{HostFormat, PlaceholderPolicy, StaticPolicy, VirtualDocument};

/// How to handle templates embedded in one host format.
///
/// With the `serde` feature, a configuration can be loaded from any format supported by serde:
/// ```toml
/// format = "yaml"
///
/// [syntax.block]
/// open = "{%"
/// close = "%}"
///
/// [placeholders]
/// expression = "0"
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default, rename_all = "kebab-case"))]
pub struct Config {
	/// The host format.
	pub format: HostFormat,

	/// The template syntax, if it differs from [`HostFormat::syntax()`].
	pub syntax: Option<Syntax>,

	/// The placeholders for virtual documents, if they differ from the built-in policy of the host format.
	pub placeholders: Option<StaticPolicy>,
}

impl Config {
	/// Create the default configuration for a host format.
	pub fn new(format: HostFormat) -> Self {
		Self {
			format,
			syntax: None,
			placeholders: None,
		}
	}

	/// Create the default configuration for a file, based on its extension.
	pub fn for_path(path: impl AsRef<std::path::Path>) -> Option<Self> {
		let extension = path.as_ref().extension()?.to_str()?;
		HostFormat::from_extension(extension).map(Self::new)
	}

	/// Get the template syntax.
	pub fn syntax(&self) -> Syntax {
		match &self.syntax {
			Some(syntax) => syntax.clone(),
			None => self.format.syntax(),
		}
	}

	/// Get the placeholder policy for virtual documents.
	pub fn policy(&self) -> &dyn PlaceholderPolicy {
		match &self.placeholders {
			Some(placeholders) => placeholders,
			None => &self.format,
		}
	}

	/// Check that the configured syntax is usable.
	pub fn validate(&self) -> Result<(), InvalidSyntax> {
		match &self.syntax {
			Some(syntax) => syntax.validate(),
			None => Ok(()),
		}
	}

	/// Parse a template with the configured syntax.
	pub fn parse(&self, source: impl Into<String>) -> Result<Template, TemplateError> {
		Template::parse_with(source, &self.syntax())
	}

	/// Parse a template and generate its virtual document with the configured placeholders.
	pub fn virtual_document(&self, source: &str) -> Result<VirtualDocument, TemplateError> {
		crate::build_virtual_document_with(source, &self.syntax(), self.policy())
	}
}
