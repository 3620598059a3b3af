use ratatui::widgets::TableState;

pub mod detail;
pub mod messages;
pub mod test_cases;
pub mod transactions;

pub use self::{
	detail::DetailScreen,
	messages::MessagesScreen,
	test_cases::TestCasesScreen,
	transactions::TransactionsScreen,
};

/// Keys moving the selection of a table.
pub const MOVE_KEYS: (&str, &str) = ("↑/↓", "move");

/// Table cursor shared by the list screens.
#[derive(Debug, Default)]
pub struct Selection {
	state: TableState,
}

impl Selection {
	pub fn new(len: usize) -> Self {
		let mut selection = Self::default();
		selection.reset(len);
		selection
	}

	/// Select the first row, or nothing when the table is empty.
	pub fn reset(&mut self, len: usize) {
		self.state.select(if len == 0 { None } else { Some(0) });
	}

	pub fn next(&mut self, len: usize) {
		if len == 0 {
			return
		}
		let next = self.state.selected().map(|i| (i + 1).min(len - 1)).unwrap_or(0);
		self.state.select(Some(next));
	}

	pub fn previous(&mut self, len: usize) {
		if len == 0 {
			return
		}
		let previous = self.state.selected().map(|i| i.saturating_sub(1)).unwrap_or(0);
		self.state.select(Some(previous));
	}

	pub fn selected(&self) -> Option<usize> {
		self.state.selected()
	}

	pub fn state_mut(&mut self) -> &mut TableState {
		&mut self.state
	}
}
