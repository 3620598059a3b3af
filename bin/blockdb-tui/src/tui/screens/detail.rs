use crossterm::event::{
	KeyCode,
	KeyEvent,
};
use ratatui::{
	layout::{
		Constraint,
		Direction,
		Layout,
		Rect,
	},
	style::{
		Color,
		Style,
	},
	text::{
		Line,
		Span,
	},
	widgets::{
		Block,
		Borders,
		Paragraph,
	},
	Frame,
};

use crate::tui::{
	app::{
		Action,
		Screen,
	},
	loader::Loader,
	search::{
		highlight,
		Search,
	},
};

/// Lines moved by page up and page down.
const PAGE: u16 = 20;

/// Raw JSON of a message or transaction, with literal search.
pub struct DetailScreen {
	title: String,
	text: String,
	search: Search,
	/// Query being typed, while the prompt is open.
	prompt: Option<String>,
	scroll: u16,
	/// Rows available to the text at the last render.
	viewport: u16,
}

impl DetailScreen {
	pub fn new(title: String, text: String) -> Self {
		Self { title, text, search: Search::default(), prompt: None, scroll: 0, viewport: PAGE }
	}

	pub fn search(&self) -> &Search {
		&self.search
	}

	pub fn scroll(&self) -> u16 {
		self.scroll
	}

	fn max_scroll(&self) -> u16 {
		let lines = self.text.lines().count();
		u16::try_from(lines.saturating_sub(1)).unwrap_or(u16::MAX)
	}

	fn scroll_by(&mut self, delta: i32) {
		let next = (i32::from(self.scroll) + delta).clamp(0, i32::from(self.max_scroll()));
		self.scroll = u16::try_from(next).unwrap_or(0);
	}

	/// Scroll so the line of the current match is visible.
	fn reveal_current(&mut self) {
		let line = match self.search.current_region() {
			Some(region) => u16::try_from(region.line).unwrap_or(u16::MAX),
			None => return,
		};
		let viewport = self.viewport.max(1);
		if line < self.scroll || line >= self.scroll.saturating_add(viewport) {
			self.scroll = line.saturating_sub(viewport / 2);
		}
	}

	fn handle_prompt(&mut self, key: KeyEvent, mut query: String) -> Action {
		match key.code {
			KeyCode::Esc => return Action::None,
			KeyCode::Enter => {
				if let Err(e) = self.search.apply(&self.text, &query) {
					return Action::Error(format!("Invalid search `{}`: {}", query, e))
				}
				self.reveal_current();
				return Action::None
			},
			KeyCode::Backspace => {
				query.pop();
			},
			KeyCode::Char(c) => query.push(c),
			_ => {},
		}
		self.prompt = Some(query);
		Action::None
	}

	fn status(&self) -> Line<'static> {
		if let Some(query) = &self.prompt {
			return Line::from(vec![Span::raw("/"), Span::raw(query.clone()), Span::raw("█")])
		}
		if self.search.query().is_empty() {
			return Line::from("")
		}
		let regions = self.search.regions().len();
		match self.search.current() {
			Some(current) => Line::from(format!(
				"\"{}\" match {} of {}",
				self.search.query(),
				current + 1,
				regions
			)),
			None => Line::from(Span::styled(
				format!("\"{}\" not found", self.search.query()),
				Style::default().fg(Color::Red),
			)),
		}
	}
}

impl Screen for DetailScreen {
	fn title(&self) -> String {
		self.title.clone()
	}

	fn keys(&self) -> Vec<(&'static str, &'static str)> {
		if self.prompt.is_some() {
			return vec![("enter", "search"), ("esc", "cancel")]
		}
		vec![("↑/↓", "scroll"), ("/", "search"), ("n/N", "next/previous match")]
	}

	fn render(&mut self, frame: &mut Frame<'_>, area: Rect) {
		let chunks = Layout::default()
			.direction(Direction::Vertical)
			.constraints([Constraint::Min(1), Constraint::Length(1)])
			.split(area);
		self.viewport = chunks[0].height.saturating_sub(2);

		let lines = highlight(&self.text, self.search.regions(), self.search.current());
		let body = Paragraph::new(lines)
			.block(Block::default().borders(Borders::ALL).title(format!(" {} ", self.title)))
			.scroll((self.scroll, 0));
		frame.render_widget(body, chunks[0]);
		frame.render_widget(Paragraph::new(self.status()), chunks[1]);
	}

	fn handle_key(&mut self, key: KeyEvent, _loader: &Loader) -> Action {
		if let Some(query) = self.prompt.take() {
			return self.handle_prompt(key, query)
		}
		match key.code {
			KeyCode::Char('/') => self.prompt = Some(String::new()),
			KeyCode::Char('n') => {
				self.search.next();
				self.reveal_current();
			},
			KeyCode::Char('N') => {
				self.search.previous();
				self.reveal_current();
			},
			KeyCode::Down | KeyCode::Char('j') => self.scroll_by(1),
			KeyCode::Up | KeyCode::Char('k') => self.scroll_by(-1),
			KeyCode::PageDown => self.scroll_by(i32::from(PAGE)),
			KeyCode::PageUp => self.scroll_by(-i32::from(PAGE)),
			KeyCode::Home => self.scroll = 0,
			KeyCode::End => self.scroll = self.max_scroll(),
			_ => {},
		}
		Action::None
	}

	fn captures_input(&self) -> bool {
		self.prompt.is_some()
	}
}
