use ratatui::Frame;
use ratatui::layout::{Constraint, Direction, Layout, Margin, Rect};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, BorderType, HighlightSpacing, List, ListItem, ListState, Paragraph};
use selettore_core::{Candidate, PanelView};
use throbber_widgets_tui::{Throbber, ThrobberState};
use unicode_width::UnicodeWidthStr;

use super::App;
use crate::style::Theme;

const HIGHLIGHT_SYMBOL: &str = "▶ ";
const PROMPT: &str = "> ";
const MAX_CODE_WIDTH: usize = 14;

impl App<'_> {
	pub(crate) fn draw(&mut self, frame: &mut Frame) {
		let area = frame.area().inner(Margin {
			vertical: 0,
			horizontal: 1,
		});

		let layout = Layout::default()
			.direction(Direction::Vertical)
			.constraints([
				Constraint::Length(1),
				Constraint::Length(3),
				Constraint::Min(0),
				Constraint::Length(1),
			])
			.split(area);

		if let Some(title) = &self.title {
			let title = Paragraph::new(title.as_str()).style(self.theme.header);
			frame.render_widget(title, layout[0]);
		}

		self.render_input(frame, layout[1]);
		self.render_panel(frame, layout[2]);

		let hints = if self.selector.is_disabled() {
			"Read-only · Enter confirm · Esc cancel"
		} else if self.selector.is_open() {
			"Enter select · Esc close · Tab leave · Ctrl+U clear · Ctrl+R retry"
		} else {
			"Enter confirm · Esc cancel · ↓ open · Ctrl+U clear"
		};
		frame.render_widget(
			Paragraph::new(hints).style(self.theme.empty_style()),
			layout[3],
		);
	}

	fn render_input(&mut self, frame: &mut Frame, area: Rect) {
		let title = if self.selector.is_disabled() {
			format!(" {} (read-only) ", self.label)
		} else {
			format!(" {} ", self.label)
		};
		let block = Block::bordered()
			.border_type(BorderType::Rounded)
			.border_style(self.theme.border_style(self.input.is_focused()))
			.title(Span::styled(title, self.theme.header));
		let inner = block.inner(area);
		frame.render_widget(block, area);
		self.areas.input = area;

		let spinner_width = if self.selector.is_loading() { 2 } else { 0 };
		let columns = Layout::default()
			.direction(Direction::Horizontal)
			.constraints([
				Constraint::Length(PROMPT.width() as u16),
				Constraint::Min(1),
				Constraint::Length(spinner_width),
			])
			.split(inner);

		frame.render_widget(
			Paragraph::new(PROMPT).style(self.theme.prompt_style()),
			columns[0],
		);
		self.input.render(frame, columns[1]);
		if spinner_width > 0 {
			let style = self.theme.empty_style();
			let spinner = Throbber::default().style(style).throbber_style(style);
			frame.render_widget(
				Paragraph::new(Line::from(spinner.to_symbol_span(&self.throbber_state))),
				columns[2],
			);
		}
	}

	fn render_panel(&mut self, frame: &mut Frame, area: Rect) {
		self.areas.rows = Rect::default();
		let view = self.selector.panel();
		if matches!(view, PanelView::Hidden) {
			self.areas.panel = Rect::default();
			render_selection_summary(frame, area, self.value.as_ref(), &self.theme);
			return;
		}

		let block = Block::bordered()
			.border_type(BorderType::Rounded)
			.border_style(self.theme.border_style(false));
		let inner = block.inner(area);
		frame.render_widget(block, area);
		self.areas.panel = area;

		let theme = &self.theme;
		let rows = match view {
			PanelView::Hidden => return,
			PanelView::Loading { previous } => {
				let style = theme.empty_style();
				let spinner = Throbber::default().style(style).throbber_style(style);
				let status = Line::from(vec![
					spinner.to_symbol_span(&self.throbber_state),
					Span::styled("Searching…", style),
				]);
				render_with_status(frame, inner, status, previous)
			}
			PanelView::Results(items) => Some((inner, items)),
			PanelView::NoResults { query } => {
				let message = format!("No results for '{query}'");
				frame.render_widget(Paragraph::new(message).style(theme.empty_style()), inner);
				None
			}
			PanelView::Failed { error, previous } => {
				let status = Line::from(vec![
					Span::styled("Could not load results", theme.error),
					Span::styled(format!(" ({error}) · Ctrl+R to retry"), theme.empty_style()),
				]);
				render_with_status(frame, inner, status, previous)
			}
		};

		if let Some((rows_area, items)) = rows {
			self.areas.rows = rows_area;
			render_rows(frame, rows_area, items, theme, &mut self.list_state);
		}
	}
}

/// Draw a one-line status above whatever rows are still worth showing.
fn render_with_status<'c>(
	frame: &mut Frame,
	area: Rect,
	status: Line<'_>,
	rows: &'c [Candidate],
) -> Option<(Rect, &'c [Candidate])> {
	let split = Layout::default()
		.direction(Direction::Vertical)
		.constraints([Constraint::Length(1), Constraint::Min(0)])
		.split(area);
	frame.render_widget(Paragraph::new(status), split[0]);
	(!rows.is_empty() && split[1].height > 0).then_some((split[1], rows))
}

fn render_rows(
	frame: &mut Frame,
	area: Rect,
	items: &[Candidate],
	theme: &Theme,
	state: &mut ListState,
) {
	let code_width = items
		.iter()
		.filter_map(|item| item.code.as_deref())
		.map(UnicodeWidthStr::width)
		.max()
		.unwrap_or(0)
		.min(MAX_CODE_WIDTH);

	let rows: Vec<ListItem> = items
		.iter()
		.map(|item| ListItem::new(candidate_line(item, code_width, theme)))
		.collect();

	let list = List::new(rows)
		.highlight_style(theme.row_highlight)
		.highlight_symbol(HIGHLIGHT_SYMBOL)
		.highlight_spacing(HighlightSpacing::Always);
	frame.render_stateful_widget(list, area, state);
}

fn candidate_line<'c>(item: &'c Candidate, code_width: usize, theme: &Theme) -> Line<'c> {
	let mut spans = Vec::with_capacity(3);
	if code_width > 0 {
		let code = item.code.as_deref().unwrap_or_default();
		let padding = code_width.saturating_sub(code.width());
		spans.push(Span::styled(
			format!("{code}{} ", " ".repeat(padding)),
			theme.highlight,
		));
	}
	spans.push(Span::raw(item.label.as_str()));
	if let Some(description) = item.description.as_deref().filter(|text| !text.is_empty()) {
		spans.push(Span::styled(format!(" · {description}"), theme.empty_style()));
	}
	Line::from(spans)
}

fn render_selection_summary(
	frame: &mut Frame,
	area: Rect,
	value: Option<&Candidate>,
	theme: &Theme,
) {
	if area.height == 0 {
		return;
	}
	let line = match value {
		Some(candidate) => Line::from(vec![
			Span::styled("Selected: ", theme.empty_style()),
			Span::raw(candidate.display_text()),
			Span::styled(format!(" (id {})", candidate.id), theme.empty_style()),
		]),
		None => Line::from(Span::styled("Nothing selected", theme.empty_style())),
	};
	let area = Rect {
		height: 1,
		..area.inner(Margin {
			vertical: 0,
			horizontal: 1,
		})
	};
	frame.render_widget(Paragraph::new(line), area);
}
