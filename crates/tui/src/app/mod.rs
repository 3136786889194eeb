//! State of the picker: one selector field plus the parent-form value it
//! controls.
//!
//! Input handling lives in `actions`, drawing in `render`.

mod actions;
mod render;

use std::time::Instant;

use ratatui::layout::Rect;
use ratatui::widgets::ListState;
use selettore_core::{Candidate, SelectionChange, Selector};
use throbber_widgets_tui::ThrobberState;

use crate::input::QueryInput;
use crate::outcome::PickOutcome;
use crate::style::Theme;

/// Screen regions recorded on every draw so mouse clicks can be resolved.
#[derive(Debug, Clone, Copy, Default)]
pub(crate) struct HitAreas {
	pub(crate) input: Rect,
	pub(crate) panel: Rect,
	pub(crate) rows: Rect,
}

/// A labelled selector field bound to the value held by its parent form.
///
/// The app plays the parent: it stores the current selection and applies
/// every [`SelectionChange`] the selector reports.
pub struct App<'a> {
	pub(crate) selector: Selector,
	pub(crate) input: QueryInput<'a>,
	pub(crate) value: Option<Candidate>,
	pub(crate) label: String,
	pub(crate) title: Option<String>,
	pub(crate) theme: Theme,
	pub(crate) throbber_state: ThrobberState,
	pub(crate) list_state: ListState,
	pub(crate) areas: HitAreas,
}

impl<'a> App<'a> {
	pub fn new(selector: Selector) -> Self {
		let theme = Theme::default();
		let mut app = Self {
			selector,
			input: QueryInput::new(""),
			value: None,
			label: "Selection".to_string(),
			title: None,
			theme,
			throbber_state: ThrobberState::default(),
			list_state: ListState::default(),
			areas: HitAreas::default(),
		};
		app.input.set_focused(true);
		app
	}

	#[must_use]
	pub fn with_label(mut self, label: impl Into<String>) -> Self {
		self.label = label.into();
		self
	}

	#[must_use]
	pub fn with_title(mut self, title: impl Into<String>) -> Self {
		let title = title.into();
		self.title = (!title.trim().is_empty()).then_some(title);
		self
	}

	#[must_use]
	pub fn with_placeholder(mut self, placeholder: impl Into<String>) -> Self {
		self.input = self.input.with_placeholder(placeholder, self.theme.empty_style());
		self
	}

	#[must_use]
	pub fn with_theme(mut self, theme: Theme) -> Self {
		self.theme = theme;
		self
	}

	/// Show the field read-only: the value is displayed but cannot change.
	#[must_use]
	pub fn with_disabled(mut self, disabled: bool) -> Self {
		self.selector.set_disabled(disabled);
		self.input.set_focused(!disabled);
		self.sync_input();
		self
	}

	/// Start from a value the parent form already holds.
	#[must_use]
	pub fn with_value(mut self, value: Option<Candidate>) -> Self {
		self.value = value;
		self.sync_input();
		self
	}

	#[must_use]
	pub fn selector(&self) -> &Selector {
		&self.selector
	}

	#[must_use]
	pub fn value(&self) -> Option<&Candidate> {
		self.value.as_ref()
	}

	/// Text currently shown in the input box.
	#[must_use]
	pub fn input_text(&self) -> &str {
		self.input.text()
	}

	/// Open the panel the way the picker starts: focused, with results loading.
	pub fn activate(&mut self) {
		self.focus_field();
	}

	/// Advance the selector clock and apply responses that arrived.
	pub fn tick(&mut self, now: Instant) -> bool {
		let changed = self.selector.tick(now);
		if self.selector.is_loading() {
			self.throbber_state.calc_next();
		}
		if changed {
			self.sync_input();
		}
		changed
	}

	pub(crate) fn outcome(&self, accepted: bool) -> PickOutcome {
		if !accepted {
			return PickOutcome::cancelled(self.selector.query());
		}
		PickOutcome {
			accepted,
			selection: self.value.clone(),
			query: self.selector.query().to_string(),
		}
	}

	pub(crate) fn focus_field(&mut self) {
		self.input.set_focused(!self.selector.is_disabled());
		self.selector.focus();
		self.sync_input();
	}

	pub(crate) fn blur(&mut self) {
		self.input.set_focused(false);
		self.selector.close();
		self.sync_input();
	}

	pub(crate) fn apply(&mut self, change: SelectionChange) {
		self.value = change.into_selection();
		self.sync_input();
	}

	/// Mirror the selector's controlled display text into the input box.
	pub(crate) fn sync_input(&mut self) {
		let desired = self.selector.input_text(self.value.as_ref());
		if self.input.text() != desired {
			self.input.set_text(&desired);
		}
		self.list_state.select(self.selector.highlighted());
	}
}
