//! Data paths that address values in a data context.
//!
//! A data path starts with a name and continues with any number of `.name` or `[index]` accessors,
//! for example `title`, `author.name` or `chapters[2].title`.
//! Names consist of ASCII letters, digits, underscores and dashes, but can not start with a dash.

use crate::error::InvalidPath;

/// One accessor of a [`DataPath`].
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum PathSegment {
	/// Look up a key in a map.
	Key(String),

	/// Look up an index in a list.
	Index(usize),
}

/// A parsed data path.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct DataPath {
	/// The name looked up in the data context.
	root: String,

	/// The accessors applied to the value of the root name.
	rest: Vec<PathSegment>,
}

impl DataPath {
	/// Parse a data path.
	///
	/// The text must not contain leading or trailing whitespace.
	pub fn parse(text: &str) -> Result<Self, InvalidPath> {
		let bytes = text.as_bytes();
		let root_end = name_end(bytes, 0);
		if root_end == 0 {
			return Err(InvalidPath {
				position: 0,
				message: "a data path must start with a name",
			});
		}

		let mut rest = Vec::new();
		let mut finger = root_end;
		while finger < bytes.len() {
			match bytes[finger] {
				b'.' => {
					let end = name_end(bytes, finger + 1);
					if end == finger + 1 {
						return Err(InvalidPath {
							position: finger + 1,
							message: "expected a name after '.'",
						});
					}
					rest.push(PathSegment::Key(text[finger + 1..end].to_owned()));
					finger = end;
				},
				b'[' => {
					let digits = bytes[finger + 1..].iter().take_while(|c| c.is_ascii_digit()).count();
					let close = finger + 1 + digits;
					if digits == 0 {
						return Err(InvalidPath {
							position: finger + 1,
							message: "expected an index inside '[]'",
						});
					}
					if bytes.get(close) != Some(&b']') {
						return Err(InvalidPath {
							position: close,
							message: "missing closing bracket ']'",
						});
					}
					let index = text[finger + 1..close].parse().map_err(|_| InvalidPath {
						position: finger + 1,
						message: "index is too large",
					})?;
					rest.push(PathSegment::Index(index));
					finger = close + 1;
				},
				_ => {
					return Err(InvalidPath {
						position: finger,
						message: "unexpected character, expected '.' or '['",
					});
				},
			}
		}

		Ok(Self {
			root: text[..root_end].to_owned(),
			rest,
		})
	}

	/// Create a path consisting of a single name.
	///
	/// The name is not validated.
	pub fn name(name: impl Into<String>) -> Self {
		Self {
			root: name.into(),
			rest: Vec::new(),
		}
	}

	/// The name looked up in the data context.
	pub fn root(&self) -> &str {
		&self.root
	}

	/// The accessors applied to the value of the root name.
	pub fn rest(&self) -> &[PathSegment] {
		&self.rest
	}
}

impl std::str::FromStr for DataPath {
	type Err = InvalidPath;

	fn from_str(s: &str) -> Result<Self, Self::Err> {
		Self::parse(s)
	}
}

impl std::fmt::Display for DataPath {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.write_str(&self.root)?;
		for segment in &self.rest {
			match segment {
				PathSegment::Key(key) => write!(f, ".{key}")?,
				PathSegment::Index(index) => write!(f, "[{index}]")?,
			}
		}
		Ok(())
	}
}

/// Check if a string is a valid name for a path segment or loop binding.
pub(crate) fn is_valid_name(name: &str) -> bool {
	!name.is_empty() && name_end(name.as_bytes(), 0) == name.len()
}

/// Find the end of the name starting at `start`.
///
/// Returns `start` if there is no name at that position.
fn name_end(bytes: &[u8], start: usize) -> usize {
	if bytes.get(start) == Some(&b'-') {
		return start;
	}
	match bytes[start.min(bytes.len())..]
		.iter()
		.position(|&c| !c.is_ascii_alphanumeric() && c != b'_' && c != b'-')
	{
		Some(x) => start + x,
		None => bytes.len(),
	}
}
