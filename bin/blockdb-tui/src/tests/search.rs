use ratatui::text::Line;

use crate::tui::search::{
	find_regions,
	highlight,
	Region,
	Search,
};

fn line_text(line: &Line<'_>) -> Vec<String> {
	line.spans.iter().map(|span| span.content.to_string()).collect()
}

#[test]
fn test_metacharacters_match_literally() {
	let text = "abc a.c\n(x) x";
	let regions = find_regions(text, "a.c").expect("Query should compile");
	assert_eq!(regions, vec![Region { id: 0, line: 0, start: 4, end: 7 }]);

	let regions = find_regions(text, "(x)").expect("Query should compile");
	assert_eq!(regions, vec![Region { id: 0, line: 1, start: 0, end: 3 }]);

	assert!(find_regions(text, "a+").expect("Query should compile").is_empty());
}

#[test]
fn test_multiple_matches_are_numbered_in_order() {
	let text = "foo bar foo\nbar\nfoofoo";
	let regions = find_regions(text, "foo").expect("Query should compile");
	let positions: Vec<(usize, usize, usize)> =
		regions.iter().map(|region| (region.id, region.line, region.start)).collect();
	assert_eq!(positions, vec![(0, 0, 0), (1, 0, 8), (2, 2, 0), (3, 2, 3)]);
}

#[test]
fn test_empty_query_finds_nothing() {
	assert!(find_regions("anything", "").expect("Empty query is valid").is_empty());

	let mut search = Search::default();
	search.apply("anything", "").expect("Empty query is valid");
	assert_eq!(search.current(), None);
	assert!(search.next().is_none());
}

#[test]
fn test_highlight_splits_spans() {
	let text = "say hello twice hello\nnothing";
	let regions = find_regions(text, "hello").expect("Query should compile");
	let lines = highlight(text, &regions, Some(1));
	assert_eq!(lines.len(), 2);
	assert_eq!(line_text(&lines[0]), vec!["say ", "hello", " twice ", "hello"]);
	assert_eq!(line_text(&lines[1]), vec!["nothing"]);
	assert_ne!(lines[0].spans[1].style, lines[0].spans[3].style);
}

#[test]
fn test_highlight_keeps_empty_lines() {
	let lines = highlight("a\n\nb", &[], None);
	assert_eq!(lines.len(), 3);
	assert_eq!(line_text(&lines[1]), vec![""]);
}

#[test]
fn test_search_cycles_through_matches() {
	let text = "x\ny\nx\nx";
	let mut search = Search::default();
	search.apply(text, "x").expect("Query should compile");
	assert_eq!(search.regions().len(), 3);
	assert_eq!(search.current(), Some(0));

	assert_eq!(search.next().map(|region| region.line), Some(2));
	assert_eq!(search.next().map(|region| region.line), Some(3));
	assert_eq!(search.next().map(|region| region.line), Some(0));
	assert_eq!(search.previous().map(|region| region.line), Some(3));

	search.apply(text, "z").expect("Query should compile");
	assert_eq!(search.query(), "z");
	assert!(search.current_region().is_none());
	assert!(search.previous().is_none());
}
