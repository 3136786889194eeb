//! Single-line query input built on `tui-textarea`.

use ratatui::Frame;
use ratatui::crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use ratatui::layout::Rect;
use ratatui::style::{Modifier, Style};
use tui_textarea::{CursorMove, TextArea};

/// Text box whose contents become the selector query.
pub struct QueryInput<'a> {
	textarea: TextArea<'a>,
	placeholder: String,
	placeholder_style: Style,
	focused: bool,
}

impl<'a> QueryInput<'a> {
	pub fn new(initial: impl Into<String>) -> Self {
		let mut input = Self {
			textarea: TextArea::default(),
			placeholder: String::new(),
			placeholder_style: Style::default().add_modifier(Modifier::DIM),
			focused: false,
		};
		input.set_text(&initial.into());
		input
	}

	#[must_use]
	pub fn with_placeholder(mut self, placeholder: impl Into<String>, style: Style) -> Self {
		self.placeholder = placeholder.into();
		self.placeholder_style = style;
		self.configure();
		self
	}

	#[must_use]
	pub fn text(&self) -> &str {
		self.textarea
			.lines()
			.first()
			.map(String::as_str)
			.unwrap_or_default()
	}

	/// Replace the contents and park the cursor at the end.
	pub fn set_text(&mut self, text: &str) {
		let line = text.replace(['\n', '\r'], " ");
		self.textarea = TextArea::new(vec![line]);
		self.configure();
		self.textarea.move_cursor(CursorMove::End);
	}

	#[must_use]
	pub fn is_focused(&self) -> bool {
		self.focused
	}

	pub fn set_focused(&mut self, focused: bool) {
		self.focused = focused;
		self.configure();
	}

	/// Feed a key press to the text box. Returns whether the text changed.
	///
	/// Keys that would break the single-line contract (Enter, Tab) and
	/// control chords are left to the caller.
	pub fn input(&mut self, key: KeyEvent) -> bool {
		if !accepts(key) {
			return false;
		}
		let before = self.text().to_string();
		self.textarea.input(key);
		self.text() != before
	}

	pub fn render(&self, frame: &mut Frame, area: Rect) {
		frame.render_widget(&self.textarea, area);
	}

	fn configure(&mut self) {
		self.textarea.set_cursor_line_style(Style::default());
		self.textarea
			.set_placeholder_text(self.placeholder.clone());
		self.textarea.set_placeholder_style(self.placeholder_style);
		let cursor = if self.focused {
			Style::default().add_modifier(Modifier::REVERSED)
		} else {
			Style::default()
		};
		self.textarea.set_cursor_style(cursor);
	}
}

fn accepts(key: KeyEvent) -> bool {
	if key
		.modifiers
		.intersects(KeyModifiers::CONTROL | KeyModifiers::ALT)
	{
		return false;
	}
	matches!(
		key.code,
		KeyCode::Char(_)
			| KeyCode::Backspace
			| KeyCode::Delete
			| KeyCode::Left
			| KeyCode::Right
			| KeyCode::Home
			| KeyCode::End
	)
}
