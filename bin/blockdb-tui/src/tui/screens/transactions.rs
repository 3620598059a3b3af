use blockdb_storage::TxRecord;
use crossterm::event::{
	KeyCode,
	KeyEvent,
};
use ratatui::{
	layout::{
		Constraint,
		Rect,
	},
	text::Text,
	widgets::{
		Block,
		Borders,
		Cell,
		Row,
		Table,
	},
	Frame,
};

use super::{
	DetailScreen,
	Selection,
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

/// Rows shown per transaction before the payload is cut.
const MAX_ROW_LINES: usize = 12;

/// Raw transactions of one chain.
pub struct TransactionsScreen {
	label: String,
	rows: Vec<(u64, String)>,
	selection: Selection,
}

impl TransactionsScreen {
	pub fn new(label: String, records: Vec<TxRecord>) -> Self {
		let rows: Vec<(u64, String)> = records
			.into_iter()
			.map(|record| (record.height, widgets::pretty_json(&record.data)))
			.collect();
		let selection = Selection::new(rows.len());
		Self { label, rows, selection }
	}
}

impl Screen for TransactionsScreen {
	fn title(&self) -> String {
		format!("Transactions: {}", self.label)
	}

	fn keys(&self) -> Vec<(&'static str, &'static str)> {
		vec![MOVE_KEYS, ("enter", "raw")]
	}

	fn render(&mut self, frame: &mut Frame<'_>, area: Rect) {
		let header = Row::new(vec!["Height", "Data"]).style(widgets::header_style());
		let rows = self.rows.iter().map(|(height, data)| {
			let lines = data.lines().count().clamp(1, MAX_ROW_LINES);
			let preview: Vec<&str> = data.lines().take(MAX_ROW_LINES).collect();
			Row::new(vec![Cell::from(height.to_string()), Cell::from(Text::from(preview.join("\n")))])
				.height(lines as u16)
		});
		let table = Table::new(rows, [Constraint::Length(8), Constraint::Min(20)])
			.header(header)
			.block(Block::default().borders(Borders::ALL).title(format!(" {} ", self.title())))
			.highlight_style(widgets::selected_style());
		frame.render_stateful_widget(table, area, self.selection.state_mut());
	}

	fn handle_key(&mut self, key: KeyEvent, _loader: &Loader) -> Action {
		match key.code {
			KeyCode::Down | KeyCode::Char('j') => self.selection.next(self.rows.len()),
			KeyCode::Up | KeyCode::Char('k') => self.selection.previous(self.rows.len()),
			KeyCode::Enter => {
				if let Some((height, data)) =
					self.selection.selected().and_then(|index| self.rows.get(index))
				{
					let title = format!("Height {} transaction", height);
					return Action::Push(Box::new(DetailScreen::new(title, data.clone())))
				}
			},
			_ => {},
		}
		Action::None
	}
}
