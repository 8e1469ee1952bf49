//! Translating offsets between a template source and its virtual document.

use std::ops::Range;

use crate::line_index::{LineIndex, Position};
use crate::virtual_doc::{MappingEntry, MappingKind, MappingTable};

/// Translates offsets and ranges between a template source and its virtual text.
///
/// Offsets without a counterpart map to `None`.
/// Mapping never fails in any other way.
#[derive(Debug, Copy, Clone)]
pub struct PositionMapper<'a> {
	table: &'a MappingTable,
}

impl<'a> PositionMapper<'a> {
	/// Create a mapper for a mapping table.
	pub fn new(table: &'a MappingTable) -> Self {
		Self { table }
	}

	/// Get the mapping table.
	pub fn table(&self) -> &'a MappingTable {
		self.table
	}

	/// Map an offset in the template source to an offset in the virtual text.
	///
	/// Offsets inside literal text map one to one.
	/// Offsets inside an expression or directive marker map to the start of its placeholder.
	/// Offsets inside elided text, like removed directive markers or skipped branches, map to `None`.
	pub fn to_virtual(&self, offset: usize) -> Option<usize> {
		if offset == self.table.original_len() {
			return Some(self.table.virtual_len());
		}
		let entry = self.entry_at(offset, original)?;
		match entry.kind {
			MappingKind::Passthrough => Some(entry.virtual_range.start + (offset - entry.original_range.start)),
			MappingKind::Substituted => Some(entry.virtual_range.start),
			MappingKind::Elided => None,
		}
	}

	/// Map an offset in the virtual text to an offset in the template source.
	///
	/// Offsets inside literal text map one to one.
	/// Offsets inside a placeholder map to the start of the template construct it replaces.
	pub fn to_original(&self, offset: usize) -> Option<usize> {
		if offset == self.table.virtual_len() {
			return Some(self.table.original_len());
		}
		let entry = self.entry_at(offset, virtual_)?;
		match entry.kind {
			MappingKind::Passthrough => Some(entry.original_range.start + (offset - entry.virtual_range.start)),
			MappingKind::Substituted => Some(entry.original_range.start),
			MappingKind::Elided => None,
		}
	}

	/// Map a range in the template source to a range in the virtual text.
	///
	/// Both ends are mapped independently, and the range is discarded unless both ends map.
	/// The end of a range that stops inside a template construct maps to the end of its placeholder.
	pub fn to_virtual_range(&self, range: Range<usize>) -> Option<Range<usize>> {
		let start = self.to_virtual(range.start)?;
		if range.is_empty() {
			return Some(start..start);
		}
		let entry = self.entry_at(range.end - 1, original)?;
		let end = match entry.kind {
			MappingKind::Passthrough => entry.virtual_range.start + (range.end - entry.original_range.start),
			MappingKind::Substituted => entry.virtual_range.end,
			MappingKind::Elided => return None,
		};
		Some(start..end.max(start))
	}

	/// Map a range in the virtual text to a range in the template source.
	///
	/// Both ends are mapped independently, and the range is discarded unless both ends map.
	/// The end of a range that stops inside a placeholder maps to the end of the template construct.
	///
	/// An empty range at a point where template source was elided is discarded,
	/// since it can not be attributed to the literal text on either side.
	pub fn to_original_range(&self, range: Range<usize>) -> Option<Range<usize>> {
		if range.is_empty() {
			if self.elided_at(range.start) {
				return None;
			}
			let start = self.to_original(range.start)?;
			return Some(start..start);
		}
		let start = self.to_original(range.start)?;
		let entry = self.entry_at(range.end - 1, virtual_)?;
		let end = match entry.kind {
			MappingKind::Passthrough => entry.original_range.start + (range.end - entry.virtual_range.start),
			MappingKind::Substituted => entry.original_range.end,
			MappingKind::Elided => return None,
		};
		Some(start..end.max(start))
	}

	/// Map a line/column position in the template source to a position in the virtual text.
	pub fn to_virtual_position(&self, original_lines: &LineIndex, virtual_lines: &LineIndex, position: Position) -> Option<Position> {
		let offset = original_lines.position_to_offset(position)?;
		virtual_lines.offset_to_position(self.to_virtual(offset)?)
	}

	/// Map a line/column position in the virtual text to a position in the template source.
	pub fn to_original_position(&self, original_lines: &LineIndex, virtual_lines: &LineIndex, position: Position) -> Option<Position> {
		let offset = virtual_lines.position_to_offset(position)?;
		original_lines.offset_to_position(self.to_original(offset)?)
	}

	/// Find the entry whose non-empty range in one coordinate space contains the offset.
	fn entry_at(&self, offset: usize, range: fn(&MappingEntry) -> &Range<usize>) -> Option<&'a MappingEntry> {
		let entries = self.table.entries();
		let index = entries.partition_point(|entry| range(entry).end <= offset);
		let entry = entries.get(index)?;
		(range(entry).start <= offset).then_some(entry)
	}

	/// Check if an elided entry sits at a virtual offset.
	fn elided_at(&self, offset: usize) -> bool {
		let entries = self.table.entries();
		let index = entries.partition_point(|entry| entry.virtual_range.start < offset);
		entries[index..]
			.iter()
			.take_while(|entry| entry.virtual_range.start == offset)
			.any(|entry| entry.kind == MappingKind::Elided)
	}
}

fn original(entry: &MappingEntry) -> &Range<usize> {
	&entry.original_range
}

fn virtual_(entry: &MappingEntry) -> &Range<usize> {
	&entry.virtual_range
}

#[cfg(test)]
#[rustfmt::skip]
mod test {
	use super::*;
	use crate::syntax::Syntax;
	use crate::template::TemplateTree;
	use crate::virtual_doc::{generate, HostFormat, PlaceholderPolicy, StaticPolicy, VirtualDocument};
	use assert2::{assert, check, let_assert};

	fn document(source: &str, policy: &dyn PlaceholderPolicy) -> VirtualDocument {
		let_assert!(Ok(tree) = TemplateTree::parse(source, &Syntax::mustache()));
		generate(&tree, policy)
	}

	#[test]
	fn passthrough_offsets() {
		let document = document("plain text", &HostFormat::Plain);
		let mapper = document.mapper();
		for offset in 0..=10 {
			check!(mapper.to_virtual(offset) == Some(offset));
			check!(mapper.to_original(offset) == Some(offset));
		}
		check!(mapper.to_virtual(11) == None);
		check!(mapper.to_original(11) == None);
	}

	#[test]
	fn substituted_offsets_are_atomic() {
		// "a: " + "{{ value }}" + "\n"  =>  "a: " + "\"\"" + "\n"
		let document = document("a: {{ value }}\n", &HostFormat::Yaml);
		check!(document.text() == "a: \"\"\n");
		let mapper = document.mapper();
		check!(mapper.to_virtual(2) == Some(2));
		check!(mapper.to_virtual(3) == Some(3));
		check!(mapper.to_virtual(8) == Some(3));
		check!(mapper.to_virtual(14) == Some(5));
		check!(mapper.to_virtual(15) == Some(6));
		check!(mapper.to_original(3) == Some(3));
		check!(mapper.to_original(4) == Some(3));
		check!(mapper.to_original(5) == Some(14));
	}

	#[test]
	fn elided_offsets() {
		let document = document("{{#if flag}}A{{else}}B{{/if}}", &HostFormat::Plain);
		let mapper = document.mapper();
		check!(mapper.to_virtual(0) == None);
		check!(mapper.to_virtual(11) == None);
		check!(mapper.to_virtual(12) == Some(0));
		check!(mapper.to_virtual(16) == None);
		check!(mapper.to_virtual(21) == None);
		check!(mapper.to_virtual(29) == Some(1));
		check!(mapper.to_original(0) == Some(12));
		check!(mapper.to_original(1) == Some(29));
	}

	#[test]
	fn every_entry_start_maps() {
		let source = "x: {{a}}\n{{#for i in l}}- {{i.name}}\n{{/for}}{{#if b}}y{{else}}z{{/if}}";
		let document = document(source, &HostFormat::Yaml);
		let mapper = document.mapper();
		for entry in document.mapping().entries() {
			if entry.kind == MappingKind::Elided {
				check!(mapper.to_virtual(entry.original_range.start) == None);
			} else {
				check!(mapper.to_virtual(entry.original_range.start) == Some(entry.virtual_range.start));
				check!(mapper.to_original(entry.virtual_range.start) == Some(entry.original_range.start));
			}
		}
	}

	#[test]
	fn ranges() {
		let document = document("a: {{ value }}\nb: c\n", &HostFormat::Json);
		check!(document.text() == "a: null\nb: c\n");
		let mapper = document.mapper();
		check!(mapper.to_original_range(3..7) == Some(3..14));
		check!(mapper.to_original_range(4..6) == Some(3..14));
		check!(mapper.to_original_range(0..13) == Some(0..20));
		check!(mapper.to_original_range(8..12) == Some(15..19));
		check!(mapper.to_virtual_range(3..14) == Some(3..7));
		check!(mapper.to_virtual_range(15..19) == Some(8..12));
		check!(mapper.to_virtual_range(0..2) == Some(0..2));
	}

	#[test]
	fn ranges_touching_elided_text() {
		let document = document("{{#if a}}x{{/if}}y", &HostFormat::Plain);
		check!(document.text() == "xy");
		let mapper = document.mapper();
		check!(mapper.to_virtual_range(0..10) == None);
		check!(mapper.to_virtual_range(9..10) == Some(0..1));
		check!(mapper.to_original_range(0..2) == Some(9..18));
		check!(mapper.to_original_range(1..1) == None);
		check!(mapper.to_original_range(0..0) == None);
		check!(mapper.to_original_range(2..2) == Some(18..18));
	}

	#[test]
	fn empty_placeholder_seams() {
		let document = document("a: {{ x }}\nb", &StaticPolicy::new(""));
		check!(document.text() == "a: \nb");
		let mapper = document.mapper();
		check!(mapper.to_virtual(3) == None);
		check!(mapper.to_virtual(10) == Some(3));
		check!(mapper.to_original(3) == Some(10));
		check!(mapper.to_original_range(3..3) == None);
		check!(mapper.to_original_range(3..5) == Some(10..12));
		for entry in document.mapping().entries() {
			if entry.kind != MappingKind::Elided {
				check!(mapper.to_original(entry.virtual_range.start) == Some(entry.original_range.start));
			}
		}
	}

	#[test]
	fn positions() {
		let source = "a: {{ x }}\nb: {{ y }}\n";
		let document = document(source, &HostFormat::Json);
		let original_lines = LineIndex::new(source);
		let virtual_lines = LineIndex::new(document.text());
		let mapper = document.mapper();
		check!(mapper.to_original_position(&original_lines, &virtual_lines, Position::new(1, 3)) == Some(Position::new(1, 3)));
		check!(mapper.to_virtual_position(&original_lines, &virtual_lines, Position::new(1, 10)) == Some(Position::new(1, 7)));
		assert!(mapper.to_virtual_position(&original_lines, &virtual_lines, Position::new(5, 0)).is_none());
	}
}
