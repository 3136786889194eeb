use std::time::Instant;

use ratatui::crossterm::event::{
	KeyCode, KeyEvent, KeyModifiers, MouseButton, MouseEvent, MouseEventKind,
};
use ratatui::layout::Rect;
use tracing::trace;

use super::App;
use crate::outcome::PickOutcome;

impl App<'_> {
	/// Process a keyboard event and return an outcome if the user exits.
	pub(crate) fn handle_key(&mut self, key: KeyEvent, now: Instant) -> Option<PickOutcome> {
		let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);
		match key.code {
			KeyCode::Char('c') if ctrl => return Some(self.outcome(false)),
			KeyCode::Char('u') if ctrl && !self.selector.is_disabled() => {
				let change = self.selector.clear();
				self.apply(change);
			}
			KeyCode::Char('r') if ctrl => {
				self.input.set_focused(true);
				self.selector.retry();
			}
			KeyCode::Esc => {
				if !self.selector.is_open() {
					return Some(self.outcome(false));
				}
				self.selector.close();
			}
			KeyCode::Enter => {
				if !self.selector.is_open() {
					return Some(self.outcome(true));
				}
				if let Some(change) = self.selector.select_highlighted() {
					self.apply(change);
				}
			}
			KeyCode::Tab | KeyCode::BackTab => self.blur(),
			KeyCode::Down => {
				if self.selector.is_open() {
					self.selector.highlight_next();
				} else {
					self.focus_field();
				}
			}
			KeyCode::Up => self.selector.highlight_previous(),
			_ if self.selector.is_disabled() => {}
			_ => {
				// Typing into a closed field starts a new query rather than
				// editing the displayed selection.
				if !ctrl
					&& matches!(key.code, KeyCode::Char(_) | KeyCode::Backspace)
					&& !self.selector.is_open()
				{
					self.focus_field();
				}
				if self.input.input(key) {
					self.input.set_focused(true);
					trace!(query = self.input.text(), "query edited");
					self.selector.set_query(self.input.text(), now);
				}
			}
		}
		self.sync_input();
		None
	}

	pub(crate) fn handle_mouse(&mut self, mouse: MouseEvent) {
		match mouse.kind {
			MouseEventKind::Down(MouseButton::Left) => {
				self.handle_click(mouse.column, mouse.row);
			}
			MouseEventKind::ScrollUp if self.selector.is_open() => {
				self.selector.highlight_previous();
			}
			MouseEventKind::ScrollDown if self.selector.is_open() => {
				self.selector.highlight_next();
			}
			_ => {}
		}
		self.sync_input();
	}

	fn handle_click(&mut self, column: u16, row: u16) {
		if point_in_rect(column, row, self.areas.input) {
			self.focus_field();
			return;
		}
		if self.selector.is_open() && point_in_rect(column, row, self.areas.panel) {
			if let Some(index) = self.row_at(row)
				&& let Some(change) = self.selector.select(index)
			{
				self.apply(change);
			}
			return;
		}
		self.blur();
	}

	/// Result index under a screen row, accounting for list scrolling.
	fn row_at(&self, row: u16) -> Option<usize> {
		let rows = self.areas.rows;
		if rows.height == 0 || row < rows.y || row >= rows.y.saturating_add(rows.height) {
			return None;
		}
		let index = self.list_state.offset() + usize::from(row - rows.y);
		(index < self.selector.results().len()).then_some(index)
	}
}

pub(crate) fn point_in_rect(column: u16, row: u16, area: Rect) -> bool {
	if area.width == 0 || area.height == 0 {
		return false;
	}
	let inside_x = column >= area.x && column < area.x.saturating_add(area.width);
	let inside_y = row >= area.y && row < area.y.saturating_add(area.height);
	inside_x && inside_y
}
