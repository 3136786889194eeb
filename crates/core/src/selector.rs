use std::sync::Arc;
use std::sync::mpsc::TryRecvError;
use std::time::{Duration, Instant};

use tracing::{debug, trace};

use crate::candidate::{Candidate, SelectionChange};
use crate::debounce::Debouncer;
use crate::error::SearchError;
use crate::filter::FixedList;
use crate::request::{DEFAULT_DEBOUNCE, DEFAULT_PAGE_SIZE, SearchRequest};
use crate::runtime::{SearchResult, SearchRuntime};
use crate::source::{CandidateSource, SearchSource};

/// Tuning knobs shared by every selector instance.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectorConfig {
	pub debounce: Duration,
	pub page_size: usize,
	pub ordering: String,
}

impl Default for SelectorConfig {
	fn default() -> Self {
		Self {
			debounce: DEFAULT_DEBOUNCE,
			page_size: DEFAULT_PAGE_SIZE,
			ordering: String::new(),
		}
	}
}

/// Progress of the most recent search.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PanelStatus {
	/// Nothing has been searched yet.
	Idle,
	/// A search for the current query is pending or in flight.
	Loading,
	/// The last search returned at least one candidate.
	Ready,
	/// The last search completed without matches.
	Empty,
	/// The last search failed; earlier results are still shown.
	Failed(SearchError),
}

/// What the result panel should show right now.
#[derive(Debug, Clone, PartialEq)]
pub enum PanelView<'a> {
	/// The panel is closed.
	Hidden,
	/// Waiting on a search; `previous` are the rows from the last completed one.
	Loading { previous: &'a [Candidate] },
	Results(&'a [Candidate]),
	/// The search for `query` completed with zero matches.
	NoResults { query: &'a str },
	Failed {
		error: &'a SearchError,
		previous: &'a [Candidate],
	},
}

/// Candidates returned for one query, replaced wholesale on every commit.
#[derive(Debug, Clone, Default)]
struct ResultSet {
	query: String,
	items: Vec<Candidate>,
}

enum Backend {
	Fixed(FixedList),
	Remote(SearchRuntime),
}

/// Picks one candidate out of a fixed list or a remote, searchable collection.
///
/// The selector is a controlled view: it never owns the selection. Operations
/// that change the selection return a [`SelectionChange`] for the parent form
/// to apply, and the parent passes its current value back when rendering
/// through [`Selector::input_text`].
///
/// Keystrokes are debounced into a single remote search. Every search carries
/// a token and only the response to the most recently issued search may update
/// the visible state, whatever order responses arrive in.
pub struct Selector {
	backend: Backend,
	config: SelectorConfig,
	debouncer: Debouncer,
	query: String,
	results: Option<ResultSet>,
	status: PanelStatus,
	open: bool,
	highlighted: Option<usize>,
	disabled: bool,
	disposed: bool,
}

impl Selector {
	pub fn new(source: CandidateSource, config: SelectorConfig) -> Self {
		let backend = match source {
			CandidateSource::Fixed(list) => Backend::Fixed(list),
			CandidateSource::Remote(source) => Backend::Remote(SearchRuntime::new(source)),
		};
		Self {
			backend,
			debouncer: Debouncer::new(config.debounce),
			config,
			query: String::new(),
			results: None,
			status: PanelStatus::Idle,
			open: false,
			highlighted: None,
			disabled: false,
			disposed: false,
		}
	}

	/// Selector over a small in-memory enumeration.
	pub fn fixed(list: FixedList) -> Self {
		Self::new(CandidateSource::Fixed(list), SelectorConfig::default())
	}

	/// Selector backed by a remote search collaborator.
	pub fn remote(source: Arc<dyn SearchSource>, config: SelectorConfig) -> Self {
		Self::new(CandidateSource::Remote(source), config)
	}

	#[must_use]
	pub fn query(&self) -> &str {
		&self.query
	}

	#[must_use]
	pub fn is_open(&self) -> bool {
		self.open
	}

	#[must_use]
	pub fn is_disabled(&self) -> bool {
		self.disabled
	}

	#[must_use]
	pub fn status(&self) -> &PanelStatus {
		&self.status
	}

	/// Candidates of the most recently committed result set.
	#[must_use]
	pub fn results(&self) -> &[Candidate] {
		self.results
			.as_ref()
			.map(|set| set.items.as_slice())
			.unwrap_or_default()
	}

	#[must_use]
	pub fn highlighted(&self) -> Option<usize> {
		self.highlighted
	}

	/// Whether a debounce deadline or a search is outstanding.
	#[must_use]
	pub fn is_loading(&self) -> bool {
		let in_flight = match &self.backend {
			Backend::Remote(runtime) => runtime.is_in_flight(),
			Backend::Fixed(_) => false,
		};
		self.debouncer.is_pending() || in_flight
	}

	/// Deadline of the pending debounce timer, if any.
	#[must_use]
	pub fn next_deadline(&self) -> Option<Instant> {
		self.debouncer.deadline()
	}

	#[must_use]
	pub fn panel(&self) -> PanelView<'_> {
		if !self.open {
			return PanelView::Hidden;
		}
		let previous = self.results();
		match &self.status {
			PanelStatus::Idle | PanelStatus::Loading => PanelView::Loading { previous },
			PanelStatus::Ready => PanelView::Results(previous),
			PanelStatus::Empty => PanelView::NoResults {
				query: self
					.results
					.as_ref()
					.map(|set| set.query.as_str())
					.unwrap_or_default(),
			},
			PanelStatus::Failed(error) => PanelView::Failed { error, previous },
		}
	}

	/// Text for the input box given the parent's current selection.
	///
	/// While the user is typing (or the panel is open) the query wins,
	/// otherwise the selected candidate is displayed.
	#[must_use]
	pub fn input_text(&self, value: Option<&Candidate>) -> String {
		if self.open || !self.query.is_empty() {
			return self.query.clone();
		}
		value.map(Candidate::display_text).unwrap_or_default()
	}

	pub fn set_disabled(&mut self, disabled: bool) {
		self.disabled = disabled;
		if disabled {
			self.debouncer.cancel();
			self.open = false;
		}
	}

	fn is_interactive(&self) -> bool {
		!self.disabled && !self.disposed
	}

	/// Open the panel, searching immediately when nothing usable is cached.
	pub fn focus(&mut self) {
		if !self.is_interactive() {
			return;
		}
		self.open = true;

		let cached_for_query = self
			.results
			.as_ref()
			.is_some_and(|set| set.query == self.query);
		if cached_for_query || self.is_loading() {
			trace!(query = %self.query, "focus reuses cached results");
			return;
		}
		self.refresh();
	}

	/// Replace the query with `text`, as typed by the user.
	pub fn set_query(&mut self, text: impl Into<String>, now: Instant) {
		if !self.is_interactive() {
			return;
		}
		let text = text.into();
		self.open = true;
		if text == self.query {
			return;
		}
		self.query = text;
		self.highlighted = None;

		match &mut self.backend {
			Backend::Fixed(_) => self.refresh(),
			Backend::Remote(runtime) => {
				runtime.supersede();
				self.status = PanelStatus::Loading;
				self.debouncer.schedule(now);
			}
		}
	}

	/// Advance timers and apply any responses that arrived.
	///
	/// Returns whether the visible state changed.
	pub fn tick(&mut self, now: Instant) -> bool {
		if self.disposed {
			return false;
		}
		let mut changed = false;
		if self.debouncer.fire(now) {
			self.refresh();
			changed = true;
		}
		self.pump_results() || changed
	}

	/// Drain responses waiting on the channel. Returns whether any was applied.
	pub fn pump_results(&mut self) -> bool {
		let mut applied = false;
		loop {
			let Backend::Remote(runtime) = &mut self.backend else {
				return applied;
			};
			match runtime.try_recv() {
				Ok(result) => applied |= self.handle_search_result(result),
				Err(TryRecvError::Empty | TryRecvError::Disconnected) => return applied,
			}
		}
	}

	/// Search again for the current query, typically after a failure.
	pub fn retry(&mut self) {
		if !self.is_interactive() {
			return;
		}
		self.debouncer.cancel();
		self.open = true;
		self.refresh();
	}

	/// Close the panel after an outside click or a blur. Query and results
	/// are kept for the next time the panel opens.
	pub fn close(&mut self) {
		self.open = false;
	}

	/// Pick the candidate at `index` in the visible results.
	pub fn select(&mut self, index: usize) -> Option<SelectionChange> {
		if !self.is_interactive() || !self.open {
			return None;
		}
		let candidate = self.results().get(index)?.clone();
		debug!(id = %candidate.id, "candidate selected");
		self.reset_query();
		self.open = false;
		Some(SelectionChange::Selected(candidate))
	}

	pub fn select_highlighted(&mut self) -> Option<SelectionChange> {
		let index = self.highlighted?;
		self.select(index)
	}

	/// Clear the selection and the query without reopening the panel.
	pub fn clear(&mut self) -> SelectionChange {
		if !self.disposed {
			self.reset_query();
			self.open = false;
		}
		SelectionChange::Cleared
	}

	pub fn highlight_next(&mut self) {
		let len = self.results().len();
		if len == 0 {
			self.highlighted = None;
			return;
		}
		self.highlighted = Some(match self.highlighted {
			Some(index) if index + 1 < len => index + 1,
			Some(index) => index,
			None => 0,
		});
	}

	pub fn highlight_previous(&mut self) {
		if self.results().is_empty() {
			self.highlighted = None;
			return;
		}
		self.highlighted = Some(self.highlighted.unwrap_or(0).saturating_sub(1));
	}

	/// Tear the control down: cancel the timer and ignore every later response.
	pub fn dispose(&mut self) {
		if self.disposed {
			return;
		}
		self.disposed = true;
		self.open = false;
		self.debouncer.cancel();
		if let Backend::Remote(runtime) = &mut self.backend {
			runtime.shutdown();
		}
	}

	#[must_use]
	pub fn is_disposed(&self) -> bool {
		self.disposed
	}

	fn reset_query(&mut self) {
		self.query.clear();
		self.highlighted = None;
		self.debouncer.cancel();
		match &mut self.backend {
			Backend::Fixed(_) => self.refresh(),
			Backend::Remote(runtime) => {
				runtime.supersede();
				if self.status == PanelStatus::Loading {
					self.status = self.settled_status();
				}
			}
		}
	}

	/// Status describing the committed results once nothing is pending.
	fn settled_status(&self) -> PanelStatus {
		match &self.results {
			None => PanelStatus::Idle,
			Some(set) if set.items.is_empty() => PanelStatus::Empty,
			Some(_) => PanelStatus::Ready,
		}
	}

	/// Search for the current query right away.
	fn refresh(&mut self) {
		match &mut self.backend {
			Backend::Fixed(list) => {
				let items = list.filter(&self.query);
				self.commit(self.query.clone(), items);
			}
			Backend::Remote(runtime) => {
				let request = SearchRequest::new(self.query.trim())
					.with_page_size(self.config.page_size)
					.with_ordering(self.config.ordering.clone());
				runtime.issue_search(request);
				self.status = PanelStatus::Loading;
			}
		}
	}

	fn handle_search_result(&mut self, result: SearchResult) -> bool {
		let Backend::Remote(runtime) = &mut self.backend else {
			return false;
		};
		if !runtime.matches_latest(result.id) {
			debug!(id = result.id, query = %result.query, "discarding stale response");
			return false;
		}
		runtime.record_completion();
		if result.query != self.query.trim() {
			debug!(id = result.id, query = %result.query, "discarding response for replaced query");
			return false;
		}

		// Keyed by the untrimmed query so focus can tell whether the results
		// still describe what is in the input.
		match result.outcome {
			Ok(items) => self.commit(self.query.clone(), items),
			Err(error) => {
				debug!(id = result.id, %error, "search failed");
				self.status = PanelStatus::Failed(error);
			}
		}
		true
	}

	fn commit(&mut self, query: String, items: Vec<Candidate>) {
		self.status = if items.is_empty() {
			PanelStatus::Empty
		} else {
			PanelStatus::Ready
		};
		self.highlighted = (!items.is_empty()).then_some(0);
		self.results = Some(ResultSet { query, items });
	}
}

impl Drop for Selector {
	fn drop(&mut self) {
		self.dispose();
	}
}

#[cfg(test)]
mod tests;
