use ratatui::{
	layout::{
		Constraint,
		Direction,
		Layout,
		Rect,
	},
	style::{
		Color,
		Modifier,
		Style,
	},
	text::{
		Line,
		Span,
	},
	widgets::{
		Block,
		Borders,
		Clear,
		Paragraph,
		Wrap,
	},
	Frame,
};

/// Pretty print a JSON document, falling back to the input when it does not parse.
pub fn pretty_json(raw: &str) -> String {
	serde_json::from_str::<serde_json::Value>(raw)
		.ok()
		.and_then(|value| serde_json::to_string_pretty(&value).ok())
		.unwrap_or_else(|| raw.to_owned())
}

/// Rectangle of `percent_x` by `percent_y` centred in `area`.
pub fn centered_rect(percent_x: u16, percent_y: u16, area: Rect) -> Rect {
	let vertical = Layout::default()
		.direction(Direction::Vertical)
		.constraints([
			Constraint::Percentage((100 - percent_y) / 2),
			Constraint::Percentage(percent_y),
			Constraint::Percentage((100 - percent_y) / 2),
		])
		.split(area);
	Layout::default()
		.direction(Direction::Horizontal)
		.constraints([
			Constraint::Percentage((100 - percent_x) / 2),
			Constraint::Percentage(percent_x),
			Constraint::Percentage((100 - percent_x) / 2),
		])
		.split(vertical[1])[1]
}

pub fn render_modal(frame: &mut Frame<'_>, area: Rect, message: &str) {
	let popup = centered_rect(60, 30, area);
	frame.render_widget(Clear, popup);
	let body = Paragraph::new(vec![
		Line::from(message.to_owned()),
		Line::from(""),
		Line::from(Span::styled("enter/esc to dismiss", Style::default().fg(Color::DarkGray))),
	])
	.wrap(Wrap { trim: true })
	.block(
		Block::default()
			.borders(Borders::ALL)
			.title(" Error ")
			.title_style(Style::default().fg(Color::Red).add_modifier(Modifier::BOLD))
			.border_style(Style::default().fg(Color::Red)),
	);
	frame.render_widget(body, popup);
}

/// One line listing `(key, action)` pairs.
pub fn key_line(keys: &[(&'static str, &'static str)]) -> Line<'static> {
	let mut spans = vec![];
	for (key, action) in keys {
		if !spans.is_empty() {
			spans.push(Span::raw("  "));
		}
		spans.push(Span::styled(*key, Style::default().add_modifier(Modifier::BOLD)));
		spans.push(Span::raw(" "));
		spans.push(Span::styled(*action, Style::default().fg(Color::DarkGray)));
	}
	Line::from(spans)
}

/// Highlight for the selected table row.
pub fn selected_style() -> Style {
	Style::default().add_modifier(Modifier::REVERSED)
}

pub fn header_style() -> Style {
	Style::default().add_modifier(Modifier::BOLD)
}
