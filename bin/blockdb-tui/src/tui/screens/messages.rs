use blockdb_storage::CosmosMessage;
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

/// Cosmos messages of one chain.
pub struct MessagesScreen {
	label: String,
	rows: Vec<CosmosMessage>,
	selection: Selection,
}

impl MessagesScreen {
	pub fn new(label: String, rows: Vec<CosmosMessage>) -> Self {
		let selection = Selection::new(rows.len());
		Self { label, rows, selection }
	}
}

/// `own/counterparty`, leaving a side blank when it is unknown.
fn pair(own: &Option<String>, counterparty: &Option<String>) -> String {
	match (own, counterparty) {
		(None, None) => String::new(),
		(own, counterparty) => format!(
			"{}/{}",
			own.as_deref().unwrap_or_default(),
			counterparty.as_deref().unwrap_or_default()
		),
	}
}

impl Screen for MessagesScreen {
	fn title(&self) -> String {
		format!("Messages: {}", self.label)
	}

	fn keys(&self) -> Vec<(&'static str, &'static str)> {
		vec![MOVE_KEYS, ("enter", "raw")]
	}

	fn render(&mut self, frame: &mut Frame<'_>, area: Rect) {
		let header = Row::new(vec![
			"Height",
			"Msg",
			"Type",
			"Client Chain",
			"Clients",
			"Connections",
			"Channels",
		])
		.style(widgets::header_style());
		let rows = self.rows.iter().map(|row| {
			Row::new(vec![
				row.height.to_string(),
				row.msg_n.to_string(),
				row.msg_type.clone().unwrap_or_default(),
				row.client_chain_id.clone().unwrap_or_default(),
				pair(&row.client_id, &row.counterparty_client_id),
				pair(&row.conn_id, &row.counterparty_conn_id),
				pair(&row.channel_id, &row.counterparty_channel_id),
			])
		});
		let widths = [
			Constraint::Length(8),
			Constraint::Length(4),
			Constraint::Percentage(35),
			Constraint::Percentage(15),
			Constraint::Percentage(15),
			Constraint::Percentage(15),
			Constraint::Percentage(15),
		];
		let table = Table::new(rows, widths)
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
				if let Some(row) = self.selection.selected().and_then(|index| self.rows.get(index)) {
					let title = format!("Height {} message {}", row.height, row.msg_n);
					return Action::Push(Box::new(DetailScreen::new(title, widgets::pretty_json(&row.raw))))
				}
			},
			_ => {},
		}
		Action::None
	}
}
