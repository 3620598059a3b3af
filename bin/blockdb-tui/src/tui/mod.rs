#![warn(clippy::missing_docs_in_private_items)]

use std::{
	io,
	time::Duration,
};

use crossterm::{
	event::{
		self,
		Event,
		KeyEventKind,
	},
	execute,
	terminal::{
		disable_raw_mode,
		enable_raw_mode,
		EnterAlternateScreen,
		LeaveAlternateScreen,
	},
};
use ratatui::{
	backend::CrosstermBackend,
	Terminal,
};

pub use self::{
	app::App,
	loader::Loader,
};

/// Screen stack and global keys.
pub mod app;
/// Blocking queries for the UI thread.
pub mod loader;
/// Individual screens.
pub mod screens;
/// Literal search over raw text.
pub mod search;
/// Shared widgets and styles.
pub mod widgets;

/// How long to wait for input before redrawing.
const INPUT_POLL: Duration = Duration::from_millis(250);

/// Puts the terminal in raw alternate-screen mode and restores it when dropped.
struct TerminalGuard {
	terminal: Terminal<CrosstermBackend<io::Stdout>>,
}

impl TerminalGuard {
	fn enter() -> io::Result<Self> {
		enable_raw_mode()?;
		let mut stdout = io::stdout();
		execute!(stdout, EnterAlternateScreen)?;
		let terminal = Terminal::new(CrosstermBackend::new(stdout))?;
		Ok(Self { terminal })
	}
}

impl Drop for TerminalGuard {
	fn drop(&mut self) {
		let _ = disable_raw_mode();
		let _ = execute!(self.terminal.backend_mut(), LeaveAlternateScreen);
		let _ = self.terminal.show_cursor();
	}
}

/// Drive the dashboard until the user quits. Returns the process exit code.
pub fn run(mut app: App) -> io::Result<i32> {
	let mut guard = TerminalGuard::enter()?;
	while !app.should_quit() {
		guard.terminal.draw(|frame| app.render(frame))?;
		if !event::poll(INPUT_POLL)? {
			continue
		}
		if let Event::Key(key) = event::read()? {
			if key.kind == KeyEventKind::Press {
				app.handle_key(key);
			}
		}
	}
	Ok(app.exit_code())
}
