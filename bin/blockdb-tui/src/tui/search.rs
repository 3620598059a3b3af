//! Literal in-text search for the detail view.

use ratatui::{
	style::{
		Color,
		Modifier,
		Style,
	},
	text::{
		Line,
		Span,
	},
};
use regex::Regex;

/// A single match, identified by its position in the list of matches.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Region {
	pub id: usize,
	pub line: usize,
	/// Byte range of the match within its line.
	pub start: usize,
	pub end: usize,
}

/// Find every occurrence of `query` in `text`.
///
/// The query is matched literally; regex metacharacters carry no meaning. Matches never
/// span lines.
pub fn find_regions(text: &str, query: &str) -> Result<Vec<Region>, regex::Error> {
	if query.is_empty() {
		return Ok(vec![])
	}
	let pattern = Regex::new(&regex::escape(query))?;
	let mut regions = vec![];
	for (line, content) in text.lines().enumerate() {
		for found in pattern.find_iter(content) {
			regions.push(Region { id: regions.len(), line, start: found.start(), end: found.end() });
		}
	}
	Ok(regions)
}

/// Style of a match that is not the current one.
fn match_style() -> Style {
	Style::default().fg(Color::Black).bg(Color::Yellow)
}

/// Style of the current match.
fn current_style() -> Style {
	Style::default().fg(Color::Black).bg(Color::LightRed).add_modifier(Modifier::BOLD)
}

/// Split `text` into lines with every region highlighted.
pub fn highlight<'a>(text: &'a str, regions: &[Region], current: Option<usize>) -> Vec<Line<'a>> {
	let mut regions = regions.iter().peekable();
	text.lines()
		.enumerate()
		.map(|(line_no, content)| {
			let mut spans = vec![];
			let mut cursor = 0;
			while let Some(region) = regions.next_if(|region| region.line == line_no) {
				if region.start > cursor {
					spans.push(Span::raw(&content[cursor..region.start]));
				}
				let style =
					if Some(region.id) == current { current_style() } else { match_style() };
				spans.push(Span::styled(&content[region.start..region.end], style));
				cursor = region.end;
			}
			if cursor < content.len() || spans.is_empty() {
				spans.push(Span::raw(&content[cursor..]));
			}
			Line::from(spans)
		})
		.collect()
}

/// Search state of a text view: the applied query, its matches and the current one.
#[derive(Clone, Debug, Default)]
pub struct Search {
	query: String,
	regions: Vec<Region>,
	current: Option<usize>,
}

impl Search {
	/// Apply `query` to `text`, selecting the first match.
	pub fn apply(&mut self, text: &str, query: &str) -> Result<(), regex::Error> {
		self.regions = find_regions(text, query)?;
		self.query = query.to_owned();
		self.current = if self.regions.is_empty() { None } else { Some(0) };
		Ok(())
	}

	pub fn next(&mut self) -> Option<&Region> {
		let total = self.regions.len();
		self.current = self.current.map(|current| (current + 1) % total);
		self.current_region()
	}

	pub fn previous(&mut self) -> Option<&Region> {
		let total = self.regions.len();
		self.current = self.current.map(|current| (current + total - 1) % total);
		self.current_region()
	}

	pub fn current_region(&self) -> Option<&Region> {
		self.current.and_then(|current| self.regions.get(current))
	}

	pub fn query(&self) -> &str {
		&self.query
	}

	pub fn regions(&self) -> &[Region] {
		&self.regions
	}

	pub fn current(&self) -> Option<usize> {
		self.current
	}
}
