#[cfg(feature = "indexmap")]
#[cfg_attr(feature = "doc-cfg", doc(cfg(feature = "indexmap")))]
mod indexmap;

#[cfg(feature = "serde")]
#[cfg_attr(feature = "doc-cfg", doc(cfg(feature = "serde")))]
mod serde;

#[cfg(feature = "json")]
#[cfg_attr(feature = "doc-cfg", doc(cfg(feature = "json")))]
pub mod json;

#[cfg(feature = "yaml")]
#[cfg_attr(feature = "doc-cfg", doc(cfg(feature = "yaml")))]
pub mod yaml;

#[cfg(feature = "toml")]
#[cfg_attr(feature = "doc-cfg", doc(cfg(feature = "toml")))]
pub mod toml;

/// Strip the location suffix that parsers append to their messages.
///
/// The location refers to the virtual text, which means nothing to the user.
#[cfg(any(feature = "json", feature = "yaml"))]
fn strip_location(message: &str) -> String {
	match message.split_once(" at line ") {
		Some((message, _)) => message.to_owned(),
		None => message.to_owned(),
	}
}

/// Get the range of the character at an offset, or an empty range at the end of the text.
#[cfg(any(feature = "json", feature = "yaml"))]
fn char_range(text: &str, offset: usize) -> std::ops::Range<usize> {
	let mut offset = offset.min(text.len());
	while !text.is_char_boundary(offset) {
		offset -= 1;
	}
	match text[offset..].chars().next() {
		Some(c) => offset..offset + c.len_utf8(),
		None => offset..offset,
	}
}
