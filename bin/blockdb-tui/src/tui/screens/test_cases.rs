use blockdb_storage::TestCaseSummary;
use crossterm::event::{
	KeyCode,
	KeyEvent,
};
use ratatui::{
	layout::{
		Constraint,
		Rect,
	},
	widgets::{
		Block,
		Borders,
		Row,
		Table,
	},
	Frame,
};

use super::{
	MessagesScreen,
	Selection,
	TransactionsScreen,
	MOVE_KEYS,
};
use crate::tui::{
	app::{
		Action,
		Screen,
	},
	loader::Loader,
	widgets,
};

/// Root screen listing the most recent test cases, one row per chain.
pub struct TestCasesScreen {
	rows: Vec<TestCaseSummary>,
	selection: Selection,
}

impl TestCasesScreen {
	pub fn new(rows: Vec<TestCaseSummary>) -> Self {
		let selection = Selection::new(rows.len());
		Self { rows, selection }
	}

	fn selected(&self) -> Option<&TestCaseSummary> {
		self.selection.selected().and_then(|index| self.rows.get(index))
	}

	/// The selected row's chain, or the error to show when it has none.
	fn selected_chain(&self) -> Result<(i64, String), String> {
		let row = self.selected().ok_or_else(|| "No test case selected".to_owned())?;
		match (row.chain_key, &row.chain_id) {
			(Some(key), Some(chain_id)) => Ok((key, format!("{} / {}", row.name, chain_id))),
			_ => Err(format!("Test case {} has no chains", row.id)),
		}
	}

	fn refresh(&mut self, loader: &Loader) -> Action {
		match loader.test_cases() {
			Ok(rows) => {
				self.selection.reset(rows.len());
				self.rows = rows;
				Action::None
			},
			Err(e) => Action::Error(format!("Cannot load test cases: {}", e)),
		}
	}
}

impl Screen for TestCasesScreen {
	fn title(&self) -> String {
		"Test Cases".to_owned()
	}

	fn keys(&self) -> Vec<(&'static str, &'static str)> {
		vec![MOVE_KEYS, ("s", "messages"), ("t", "transactions"), ("r", "refresh")]
	}

	fn render(&mut self, frame: &mut Frame<'_>, area: Rect) {
		let header = Row::new(vec!["ID", "Date", "Name", "Revision", "Chain", "Height", "Txs"])
			.style(widgets::header_style());
		let rows = self.rows.iter().map(|row| {
			Row::new(vec![
				row.id.to_string(),
				row.created_at.format("%Y-%m-%d %H:%M:%S").to_string(),
				row.name.clone(),
				row.source_revision.clone(),
				row.chain_id.clone().unwrap_or_default(),
				row.height.to_string(),
				row.tx_total.to_string(),
			])
		});
		let widths = [
			Constraint::Length(6),
			Constraint::Length(19),
			Constraint::Percentage(30),
			Constraint::Length(12),
			Constraint::Percentage(20),
			Constraint::Length(8),
			Constraint::Length(8),
		];
		let table = Table::new(rows, widths)
			.header(header)
			.block(Block::default().borders(Borders::ALL).title(" Test Cases "))
			.highlight_style(widgets::selected_style());
		frame.render_stateful_widget(table, area, self.selection.state_mut());
	}

	fn handle_key(&mut self, key: KeyEvent, loader: &Loader) -> Action {
		match key.code {
			KeyCode::Down | KeyCode::Char('j') => self.selection.next(self.rows.len()),
			KeyCode::Up | KeyCode::Char('k') => self.selection.previous(self.rows.len()),
			KeyCode::Char('r') => return self.refresh(loader),
			KeyCode::Char('s') => {
				let (chain, label) = match self.selected_chain() {
					Ok(chain) => chain,
					Err(message) => return Action::Error(message),
				};
				return match loader.cosmos_messages(chain) {
					Ok(rows) => Action::Push(Box::new(MessagesScreen::new(label, rows))),
					Err(e) => Action::Error(format!("Cannot load messages: {}", e)),
				}
			},
			KeyCode::Char('t') => {
				let (chain, label) = match self.selected_chain() {
					Ok(chain) => chain,
					Err(message) => return Action::Error(message),
				};
				return match loader.transactions(chain) {
					Ok(rows) => Action::Push(Box::new(TransactionsScreen::new(label, rows))),
					Err(e) => Action::Error(format!("Cannot load transactions: {}", e)),
				}
			},
			_ => {},
		}
		Action::None
	}
}
