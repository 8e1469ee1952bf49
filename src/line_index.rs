//! Conversion between byte offsets and line/column positions.

/// A zero-based line and byte column in a text.
#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct Position {
	/// The line number, starting at 0.
	pub line: usize,

	/// The byte offset from the start of the line.
	pub column: usize,
}

impl Position {
	/// Create a new position.
	pub const fn new(line: usize, column: usize) -> Self {
		Self { line, column }
	}
}

impl std::fmt::Display for Position {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		write!(f, "{}:{}", self.line + 1, self.column + 1)
	}
}

/// The line breaks of a text, for converting between offsets and [`Position`]s.
///
/// A newline character belongs to the line it terminates.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LineIndex {
	/// The offset of each `\n` in the text.
	line_breaks: Vec<usize>,

	/// The length of the text in bytes.
	len: usize,
}

impl LineIndex {
	/// Build the line index for a text.
	pub fn new(text: &str) -> Self {
		Self {
			line_breaks: memchr::memchr_iter(b'\n', text.as_bytes()).collect(),
			len: text.len(),
		}
	}

	/// The number of lines in the text.
	///
	/// A text without newlines has one line, even if it is empty.
	pub fn line_count(&self) -> usize {
		self.line_breaks.len() + 1
	}

	/// The length of the text in bytes.
	pub fn len(&self) -> usize {
		self.len
	}

	/// Check if the text is empty.
	pub fn is_empty(&self) -> bool {
		self.len == 0
	}

	/// Convert a byte offset to a position.
	///
	/// Returns `None` if the offset is past the end of the text.
	pub fn offset_to_position(&self, offset: usize) -> Option<Position> {
		if offset > self.len {
			return None;
		}
		let line = self.line_breaks.partition_point(|&line_break| line_break < offset);
		Some(Position {
			line,
			column: offset - self.line_start(line),
		})
	}

	/// Convert a position to a byte offset.
	///
	/// The column may point at the newline that ends the line, but not past it.
	/// Returns `None` if the line or column is out of range.
	pub fn position_to_offset(&self, position: Position) -> Option<usize> {
		if position.line >= self.line_count() {
			return None;
		}
		let start = self.line_start(position.line);
		let end = self.line_breaks.get(position.line).copied().unwrap_or(self.len);
		let offset = start.checked_add(position.column)?;
		(offset <= end).then_some(offset)
	}

	fn line_start(&self, line: usize) -> usize {
		match line {
			0 => 0,
			_ => self.line_breaks[line - 1] + 1,
		}
	}
}

#[cfg(test)]
#[rustfmt::skip]
mod test {
	use super::*;
	use assert2::check;

	#[test]
	fn empty_text() {
		let index = LineIndex::new("");
		check!(index.line_count() == 1);
		check!(index.offset_to_position(0) == Some(Position::new(0, 0)));
		check!(index.offset_to_position(1) == None);
		check!(index.position_to_offset(Position::new(0, 0)) == Some(0));
		check!(index.position_to_offset(Position::new(1, 0)) == None);
	}

	#[test]
	fn offsets_to_positions() {
		let index = LineIndex::new("line 1\nline 2\nline 3");
		check!(index.line_count() == 3);
		check!(index.offset_to_position(0) == Some(Position::new(0, 0)));
		check!(index.offset_to_position(6) == Some(Position::new(0, 6)));
		check!(index.offset_to_position(7) == Some(Position::new(1, 0)));
		check!(index.offset_to_position(13) == Some(Position::new(1, 6)));
		check!(index.offset_to_position(20) == Some(Position::new(2, 6)));
		check!(index.offset_to_position(21) == None);
	}

	#[test]
	fn positions_to_offsets() {
		let index = LineIndex::new("ab\ncd\n");
		check!(index.line_count() == 3);
		check!(index.position_to_offset(Position::new(0, 2)) == Some(2));
		check!(index.position_to_offset(Position::new(0, 3)) == None);
		check!(index.position_to_offset(Position::new(1, 1)) == Some(4));
		check!(index.position_to_offset(Position::new(2, 0)) == Some(6));
		check!(index.position_to_offset(Position::new(2, 1)) == None);
		check!(index.position_to_offset(Position::new(3, 0)) == None);
	}

	#[test]
	fn byte_columns() {
		let index = LineIndex::new("café\nwörld");
		check!(index.offset_to_position(6) == Some(Position::new(1, 0)));
		check!(index.offset_to_position(8) == Some(Position::new(1, 2)));
		check!(Position::new(1, 2).to_string() == "2:3");
	}
}
