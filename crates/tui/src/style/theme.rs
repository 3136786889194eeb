use ratatui::style::{Color, Modifier, Style};

/// Styles for the pieces of the picker.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Theme {
	/// Field label and panel borders.
	pub header: Style,
	/// Highlighted result row.
	pub row_highlight: Style,
	/// Prompt in front of the input and the input border while focused.
	pub prompt: Style,
	/// Placeholder, hints and empty states.
	pub empty: Style,
	/// Code column of result rows.
	pub highlight: Style,
	/// Load failures.
	pub error: Style,
}

impl Theme {
	#[must_use]
	pub fn dark() -> Self {
		Self {
			header: Style::new().fg(Color::Cyan).add_modifier(Modifier::BOLD),
			row_highlight: Style::new().bg(Color::DarkGray).add_modifier(Modifier::BOLD),
			prompt: Style::new().fg(Color::LightBlue),
			empty: Style::new().fg(Color::Gray).add_modifier(Modifier::DIM),
			highlight: Style::new().fg(Color::Yellow),
			error: Style::new().fg(Color::LightRed),
		}
	}

	#[must_use]
	pub fn light() -> Self {
		Self {
			header: Style::new().fg(Color::Blue).add_modifier(Modifier::BOLD),
			row_highlight: Style::new().bg(Color::Gray).add_modifier(Modifier::BOLD),
			prompt: Style::new().fg(Color::Blue),
			empty: Style::new().fg(Color::DarkGray),
			highlight: Style::new().fg(Color::Magenta),
			error: Style::new().fg(Color::Red),
		}
	}

	#[must_use]
	pub fn prompt_style(&self) -> Style {
		self.prompt
	}

	#[must_use]
	pub fn empty_style(&self) -> Style {
		self.empty
	}

	/// Border colour of a focused or blurred input.
	#[must_use]
	pub fn border_style(&self, focused: bool) -> Style {
		if focused {
			Style::new().fg(self.prompt.fg.unwrap_or(Color::Reset))
		} else {
			Style::new().fg(self.header.fg.unwrap_or(Color::Reset))
		}
	}
}

impl Default for Theme {
	fn default() -> Self {
		Self::dark()
	}
}

const BUILTINS: [(&str, fn() -> Theme); 2] = [("dark", Theme::dark), ("light", Theme::light)];

/// Look up a built-in theme, ignoring case.
#[must_use]
pub fn by_name(name: &str) -> Option<Theme> {
	let name = name.trim();
	BUILTINS
		.iter()
		.find(|(builtin, _)| builtin.eq_ignore_ascii_case(name))
		.map(|(_, build)| build())
}

#[must_use]
pub fn names() -> Vec<&'static str> {
	BUILTINS.iter().map(|(name, _)| *name).collect()
}
