use crossterm::event::{
	KeyCode,
	KeyEvent,
	KeyModifiers,
};
use ratatui::{
	backend::TestBackend,
	Terminal,
};

use super::Fixture;
use crate::tui::{
	app::{
		Screen,
		EXIT_AFTER_ERROR,
	},
	screens::{
		DetailScreen,
		TestCasesScreen,
	},
	App,
};

fn key(code: KeyCode) -> KeyEvent {
	KeyEvent::new(code, KeyModifiers::NONE)
}

fn open_app(fixture: &Fixture) -> App {
	let loader = fixture.loader();
	let rows = loader.test_cases().expect("Test cases should load");
	App::new(loader, Box::new(TestCasesScreen::new(rows)))
}

fn screen_text(app: &mut App) -> String {
	let mut terminal = Terminal::new(TestBackend::new(120, 30)).expect("Terminal should build");
	terminal.draw(|frame| app.render(frame)).expect("Frame should draw");
	terminal.backend().buffer().content.iter().map(|cell| cell.symbol()).collect()
}

#[test]
fn test_escape_never_pops_root() {
	let fixture = Fixture::new();
	let mut app = open_app(&fixture);
	app.handle_key(key(KeyCode::Esc));
	app.handle_key(key(KeyCode::Esc));
	assert_eq!(app.depth(), 1);
	assert_eq!(app.top_title().as_deref(), Some("Test Cases"));
	assert!(!app.should_quit());
}

#[test]
fn test_navigate_messages_and_back() {
	let fixture = Fixture::new();
	let mut app = open_app(&fixture);

	app.handle_key(key(KeyCode::Char('j')));
	app.handle_key(key(KeyCode::Char('s')));
	assert_eq!(app.depth(), 2);
	assert_eq!(app.top_title().as_deref(), Some("Messages: SomeTest / chain1"));
	assert!(screen_text(&mut app).contains("other-chain"));

	app.handle_key(key(KeyCode::Enter));
	assert_eq!(app.depth(), 3);
	assert_eq!(app.top_title().as_deref(), Some("Height 1 message 0"));

	app.handle_key(key(KeyCode::Esc));
	app.handle_key(key(KeyCode::Esc));
	app.handle_key(key(KeyCode::Esc));
	assert_eq!(app.depth(), 1);
}

#[test]
fn test_navigate_transactions() {
	let fixture = Fixture::new();
	let mut app = open_app(&fixture);

	app.handle_key(key(KeyCode::Down));
	app.handle_key(key(KeyCode::Char('t')));
	assert_eq!(app.top_title().as_deref(), Some("Transactions: SomeTest / chain1"));
	assert!(screen_text(&mut app).contains("tx2.0"));

	app.handle_key(key(KeyCode::Down));
	app.handle_key(key(KeyCode::Enter));
	assert_eq!(app.top_title().as_deref(), Some("Height 2 transaction"));
}

#[test]
fn test_chainless_test_case_shows_modal() {
	let fixture = Fixture::new();
	let mut app = open_app(&fixture);

	app.handle_key(key(KeyCode::Char('s')));
	assert_eq!(app.depth(), 1);
	let message = app.modal().expect("An error should be shown").to_owned();
	assert!(message.contains("no chains"), "unexpected message {}", message);
	assert!(screen_text(&mut app).contains("Error"));

	app.handle_key(key(KeyCode::Enter));
	assert!(app.modal().is_none());
	app.handle_key(key(KeyCode::Char('q')));
	assert!(app.should_quit());
	assert_eq!(app.exit_code(), EXIT_AFTER_ERROR);
}

#[test]
fn test_quit_keys() {
	let fixture = Fixture::new();
	let mut app = open_app(&fixture);
	app.handle_key(KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL));
	assert!(app.should_quit());
	assert_eq!(app.exit_code(), 0);

	let mut app = open_app(&fixture);
	app.handle_key(key(KeyCode::Char('q')));
	assert!(app.should_quit());
}

#[test]
fn test_header_and_rows_render() {
	let fixture = Fixture::new();
	let mut app = open_app(&fixture);
	let text = screen_text(&mut app);
	assert!(text.contains("BlockDB"));
	assert!(text.contains(":memory:"));
	assert!(text.contains("schema abc123"));
	assert!(text.contains("SomeTest"));
	assert!(text.contains("Empty"));
	assert!(text.contains("refresh"));
}

#[test]
fn test_refresh_reloads_rows() {
	let fixture = Fixture::new();
	let mut app = open_app(&fixture);
	fixture
		.runtime
		.block_on(fixture.db.create_test_case(
			&blockdb_primitives::context::Context::background(),
			"Later",
			"abc123",
		))
		.expect("Test case should be created");

	assert!(!screen_text(&mut app).contains("Later"));
	app.handle_key(key(KeyCode::Char('r')));
	assert!(screen_text(&mut app).contains("Later"));
	assert!(app.modal().is_none());
}

#[test]
fn test_detail_search_prompt_captures_keys() {
	let fixture = Fixture::new();
	let loader = fixture.loader();
	let text = "{\n  \"a\": \"x.y\",\n  \"b\": \"xzy\",\n  \"c\": \"x.y\"\n}".to_owned();
	let mut detail = DetailScreen::new("Detail".to_owned(), text);

	detail.handle_key(key(KeyCode::Char('/')), &loader);
	assert!(detail.captures_input());
	for c in "x.y".chars() {
		detail.handle_key(key(KeyCode::Char(c)), &loader);
	}
	detail.handle_key(key(KeyCode::Enter), &loader);
	assert!(!detail.captures_input());

	let lines: Vec<usize> = detail.search().regions().iter().map(|region| region.line).collect();
	assert_eq!(lines, vec![1, 3]);
	assert_eq!(detail.search().current(), Some(0));

	detail.handle_key(key(KeyCode::Char('n')), &loader);
	assert_eq!(detail.search().current(), Some(1));
	detail.handle_key(key(KeyCode::Char('n')), &loader);
	assert_eq!(detail.search().current(), Some(0));
	detail.handle_key(key(KeyCode::Char('N')), &loader);
	assert_eq!(detail.search().current(), Some(1));
}

#[test]
fn test_quit_key_types_into_search_prompt() {
	let fixture = Fixture::new();
	let mut app = open_app(&fixture);
	app.handle_key(key(KeyCode::Char('j')));
	app.handle_key(key(KeyCode::Char('t')));
	app.handle_key(key(KeyCode::Enter));
	app.handle_key(key(KeyCode::Char('/')));
	app.handle_key(key(KeyCode::Char('q')));
	assert!(!app.should_quit());

	app.handle_key(key(KeyCode::Esc));
	assert_eq!(app.depth(), 3);
	app.handle_key(key(KeyCode::Esc));
	assert_eq!(app.depth(), 2);
}
