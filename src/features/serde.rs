use serde::{
	de::{Error, Visitor},
	Deserialize,
	Deserializer,
	Serialize,
	Serializer,
};

use crate::Template;

struct TemplateVisitor;

impl<'de> Visitor<'de> for TemplateVisitor {
	type Value = Template;

	fn expecting(&self, formatter: &mut std::fmt::Formatter) -> std::fmt::Result {
		formatter.write_str("a template string")
	}

	fn visit_str<E>(self, v: &str) -> Result<Self::Value, E>
	where
		E: Error,
	{
		self.visit_string(v.to_owned())
	}

	fn visit_string<E>(self, v: String) -> Result<Self::Value, E>
	where
		E: Error,
	{
		Template::parse(v).map_err(E::custom)
	}
}

/// Templates are deserialized from strings with the default [`Syntax`](crate::Syntax).
impl<'de> Deserialize<'de> for Template {
	fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
	where
		D: Deserializer<'de>,
	{
		deserializer.deserialize_string(TemplateVisitor)
	}
}

impl Serialize for Template {
	fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
	where
		S: Serializer,
	{
		serializer.serialize_str(self.source())
	}
}

#[cfg(test)]
#[rustfmt::skip]
mod test {
	use super::*;
	use assert2::{check, let_assert};
	use serde_test::Token;

	#[test]
	fn template_as_string() {
		let_assert!(Ok(template) = Template::parse("Hello {{ name }}!"));
		serde_test::assert_tokens(&template, &[Token::Str("Hello {{ name }}!")]);
		serde_test::assert_de_tokens(&template, &[Token::String("Hello {{ name }}!")]);
	}

	#[test]
	fn invalid_template() {
		serde_test::assert_de_tokens_error::<Template>(
			&[Token::Str("{{#if draft}}")],
			"Unmatched `if` directive: missing closing marker",
		);
		serde_test::assert_de_tokens_error::<Template>(
			&[Token::I32(5)],
			"invalid type: integer `5`, expected a template string",
		);
	}

	#[test]
	fn template_in_struct() {
		#[derive(Debug, serde::Deserialize)]
		struct Page {
			title: Template,
		}

		let_assert!(Ok(page) = serde_json::from_str::<Page>(r#"{ "title": "{{ site }}: {{ page }}" }"#));
		check!(page.title.source() == "{{ site }}: {{ page }}");
		let data = crate::Value::from_iter([("site", "Blog"), ("page", "Home")]);
		check!(page.title.render(&data, &crate::NullResolver).as_deref() == Ok("Blog: Home"));
	}
}
