use blockdb_storage::SchemaVersion;
use crossterm::event::{
	KeyCode,
	KeyEvent,
	KeyModifiers,
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
		Modifier,
		Style,
	},
	text::{
		Line,
		Span,
	},
	widgets::Paragraph,
	Frame,
};
use tracing::{
	debug,
	warn,
};

use super::{
	loader::Loader,
	widgets,
};

/// Exit code when the user quits after an error was shown.
pub const EXIT_AFTER_ERROR: i32 = 2;

/// What the app should do after a screen handled a key.
pub enum Action {
	None,
	Push(Box<dyn Screen>),
	Error(String),
}

/// A view on the screen stack.
pub trait Screen {
	fn title(&self) -> String;

	/// Keys handled by the screen, shown in the footer.
	fn keys(&self) -> Vec<(&'static str, &'static str)>;

	fn render(&mut self, frame: &mut Frame<'_>, area: Rect);

	fn handle_key(&mut self, key: KeyEvent, loader: &Loader) -> Action;

	/// Whether the screen consumes every key, for example while a prompt is open.
	fn captures_input(&self) -> bool {
		false
	}
}

/// The dashboard: a stack of screens, an optional error modal, and the header data.
pub struct App {
	loader: Loader,
	stack: Vec<Box<dyn Screen>>,
	modal: Option<String>,
	errored: bool,
	quit: bool,
	schema: Option<SchemaVersion>,
}

impl App {
	pub fn new(loader: Loader, root: Box<dyn Screen>) -> Self {
		let schema = match loader.schema_version() {
			Ok(schema) => Some(schema),
			Err(e) => {
				warn!(message = "Schema version unavailable", error = %e);
				None
			},
		};
		Self { loader, stack: vec![root], modal: None, errored: false, quit: false, schema }
	}

	pub fn handle_key(&mut self, key: KeyEvent) {
		if key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) {
			self.quit = true;
			return
		}

		if self.modal.is_some() {
			match key.code {
				KeyCode::Enter | KeyCode::Esc => self.modal = None,
				KeyCode::Char('q') => self.quit = true,
				_ => {},
			}
			return
		}

		let captured = self.stack.last().map(|screen| screen.captures_input()).unwrap_or(false);
		if !captured {
			match key.code {
				KeyCode::Char('q') => {
					self.quit = true;
					return
				},
				KeyCode::Esc => {
					if self.stack.len() > 1 {
						self.stack.pop();
					}
					return
				},
				_ => {},
			}
		}

		let action = match self.stack.last_mut() {
			Some(screen) => screen.handle_key(key, &self.loader),
			None => Action::None,
		};
		match action {
			Action::None => {},
			Action::Push(screen) => {
				debug!(message = "Screen pushed", title = %screen.title());
				self.stack.push(screen);
			},
			Action::Error(message) => self.show_error(message),
		}
	}

	pub fn show_error(&mut self, message: String) {
		warn!(message = "Dashboard error", error = %message);
		self.errored = true;
		self.modal = Some(message);
	}

	pub fn render(&mut self, frame: &mut Frame<'_>) {
		let area = frame.size();
		let chunks = Layout::default()
			.direction(Direction::Vertical)
			.constraints([Constraint::Length(1), Constraint::Min(1), Constraint::Length(1)])
			.split(area);

		frame.render_widget(Paragraph::new(self.header()), chunks[0]);
		if let Some(screen) = self.stack.last_mut() {
			screen.render(frame, chunks[1]);
		}
		frame.render_widget(Paragraph::new(self.footer()), chunks[2]);

		if let Some(message) = &self.modal {
			widgets::render_modal(frame, area, message);
		}
	}

	fn header(&self) -> Line<'static> {
		let schema = match &self.schema {
			Some(schema) => format!(
				"schema {} @ {}",
				schema.source_revision,
				schema.created_at.format("%Y-%m-%d %H:%M:%S")
			),
			None => "schema unknown".to_owned(),
		};
		Line::from(vec![
			Span::styled("BlockDB", Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD)),
			Span::raw("  "),
			Span::raw(self.loader.db().path().to_string()),
			Span::raw("  "),
			Span::styled(schema, Style::default().fg(Color::DarkGray)),
		])
	}

	fn footer(&self) -> Line<'static> {
		let mut keys = self.stack.last().map(|screen| screen.keys()).unwrap_or_default();
		if self.stack.len() > 1 {
			keys.push(("esc", "back"));
		}
		keys.push(("q", "quit"));
		widgets::key_line(&keys)
	}

	pub fn should_quit(&self) -> bool {
		self.quit
	}

	pub fn exit_code(&self) -> i32 {
		if self.errored {
			EXIT_AFTER_ERROR
		} else {
			0
		}
	}

	pub fn depth(&self) -> usize {
		self.stack.len()
	}

	pub fn top_title(&self) -> Option<String> {
		self.stack.last().map(|screen| screen.title())
	}

	pub fn modal(&self) -> Option<&str> {
		self.modal.as_deref()
	}
}
