use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Condvar, Mutex};
use std::thread;

use super::*;
use crate::candidate::CandidateId;
use crate::filter::MatchField;

const WINDOW: Duration = Duration::from_millis(300);

fn config() -> SelectorConfig {
	SelectorConfig {
		debounce: WINDOW,
		page_size: 10,
		ordering: "display_name".into(),
	}
}

fn names(candidates: &[Candidate]) -> Vec<&str> {
	candidates.iter().map(|item| item.label.as_str()).collect()
}

/// Answers immediately and remembers every request it saw.
struct Recording {
	requests: Mutex<Vec<SearchRequest>>,
	respond: fn(&str) -> Result<Vec<Candidate>, SearchError>,
}

impl Recording {
	fn new(respond: fn(&str) -> Result<Vec<Candidate>, SearchError>) -> Arc<Self> {
		Arc::new(Self {
			requests: Mutex::new(Vec::new()),
			respond,
		})
	}

	fn echo() -> Arc<Self> {
		Self::new(|query| Ok(vec![Candidate::new(1, format!("match:{query}"))]))
	}

	fn searched(&self) -> Vec<String> {
		self.requests
			.lock()
			.unwrap()
			.iter()
			.map(|request| request.search.clone())
			.collect()
	}
}

impl SearchSource for Recording {
	fn search(&self, request: &SearchRequest) -> Result<Vec<Candidate>, SearchError> {
		self.requests.lock().unwrap().push(request.clone());
		(self.respond)(&request.search)
	}
}

/// Holds every search until the test opens the gate for its query.
#[derive(Default)]
struct Gated {
	open: Mutex<HashMap<String, bool>>,
	changed: Condvar,
	started: AtomicUsize,
	finished: AtomicUsize,
}

impl Gated {
	fn release(&self, query: &str) {
		self.open.lock().unwrap().insert(query.to_string(), true);
		self.changed.notify_all();
	}

	fn wait_for(&self, counter: &AtomicUsize, expected: usize) {
		let deadline = Instant::now() + Duration::from_secs(2);
		while counter.load(Ordering::SeqCst) < expected && Instant::now() < deadline {
			thread::sleep(Duration::from_millis(2));
		}
		assert_eq!(counter.load(Ordering::SeqCst), expected);
	}
}

impl SearchSource for Gated {
	fn search(&self, request: &SearchRequest) -> Result<Vec<Candidate>, SearchError> {
		self.started.fetch_add(1, Ordering::SeqCst);
		let mut open = self.open.lock().unwrap();
		while !open.get(&request.search).copied().unwrap_or(false) {
			open = self.changed.wait(open).unwrap();
		}
		drop(open);
		self.finished.fetch_add(1, Ordering::SeqCst);
		Ok(vec![Candidate::new(1, format!("match:{}", request.search))])
	}
}

fn settle(selector: &mut Selector) {
	let deadline = Instant::now() + Duration::from_secs(2);
	while selector.is_loading() && Instant::now() < deadline {
		thread::sleep(Duration::from_millis(2));
		selector.pump_results();
	}
	assert!(!selector.is_loading(), "search did not settle in time");
}

fn documents() -> FixedList {
	let items = [
		"Fattura", "Contratto", "Preventivo", "Delibera", "Verbale", "Contratto quadro",
		"Ordine", "Bolla", "Nota spese", "Circolare",
	]
	.into_iter()
	.enumerate()
	.map(|(index, label)| Candidate::new(index as i64 + 1, label))
	.collect();
	FixedList::new(items).with_fields([MatchField::Label])
}

#[test]
fn burst_of_keystrokes_issues_one_search_with_final_query() {
	let source = Recording::echo();
	let mut selector = Selector::remote(source.clone(), config());
	let start = Instant::now();

	for (offset, text) in [(0, "r"), (80, "ro"), (160, "ros"), (240, "ross")] {
		selector.set_query(text, start + Duration::from_millis(offset));
		assert!(!selector.tick(start + Duration::from_millis(offset + 10)));
	}
	assert!(!selector.tick(start + Duration::from_millis(539)));
	assert!(selector.tick(start + Duration::from_millis(540)));
	settle(&mut selector);

	assert_eq!(source.searched(), ["ross"]);
	assert_eq!(names(selector.results()), ["match:ross"]);
	let recorded = source.requests.lock().unwrap()[0].clone();
	assert_eq!(recorded.page_size, 10);
	assert_eq!(recorded.ordering, "display_name");
}

#[test]
fn late_response_for_older_query_never_overwrites_newer_results() {
	let source = Arc::new(Gated::default());
	let mut selector = Selector::remote(source.clone(), config());
	let start = Instant::now();

	selector.set_query("a", start);
	selector.tick(start + WINDOW);
	source.wait_for(&source.started, 1);

	selector.set_query("ab", start + Duration::from_millis(400));
	selector.tick(start + Duration::from_millis(700));
	source.wait_for(&source.started, 2);

	source.release("ab");
	settle(&mut selector);
	assert_eq!(names(selector.results()), ["match:ab"]);

	source.release("a");
	source.wait_for(&source.finished, 2);
	thread::sleep(Duration::from_millis(20));
	assert!(!selector.pump_results());
	assert_eq!(names(selector.results()), ["match:ab"]);
	assert_eq!(selector.status(), &PanelStatus::Ready);
}

#[test]
fn commit_requires_latest_token_even_when_stale_response_arrives() {
	let source = Arc::new(Gated::default());
	let mut selector = Selector::remote(source.clone(), config());
	let start = Instant::now();

	selector.set_query("a", start);
	selector.tick(start + WINDOW);
	selector.set_query("ab", start + WINDOW);
	selector.tick(start + WINDOW * 2);

	let Backend::Remote(runtime) = &selector.backend else {
		panic!("remote backend expected");
	};
	runtime.inject(SearchResult {
		id: 2,
		query: "ab".into(),
		outcome: Ok(vec![Candidate::new(20, "newer")]),
	});
	runtime.inject(SearchResult {
		id: 1,
		query: "a".into(),
		outcome: Ok(vec![Candidate::new(10, "older")]),
	});

	assert!(selector.pump_results());
	assert_eq!(names(selector.results()), ["newer"]);
	assert!(!selector.is_loading());

	source.release("a");
	source.release("ab");
}

#[test]
fn stale_success_after_newer_failure_is_discarded() {
	let source = Arc::new(Gated::default());
	let mut selector = Selector::remote(source.clone(), config());
	let start = Instant::now();

	selector.set_query("a", start);
	selector.tick(start + WINDOW);
	selector.set_query("ab", start + WINDOW);
	selector.tick(start + WINDOW * 2);

	let Backend::Remote(runtime) = &selector.backend else {
		panic!("remote backend expected");
	};
	runtime.inject(SearchResult {
		id: 2,
		query: "ab".into(),
		outcome: Err(SearchError::Network("connection reset".into())),
	});
	runtime.inject(SearchResult {
		id: 1,
		query: "a".into(),
		outcome: Ok(vec![Candidate::new(10, "older")]),
	});
	selector.pump_results();

	assert!(matches!(selector.status(), PanelStatus::Failed(_)));
	assert!(selector.results().is_empty());

	source.release("a");
	source.release("ab");
}

#[test]
fn selecting_reports_clicked_candidate_and_empties_query() {
	let mut selector = Selector::fixed(documents());
	selector.set_query("contr", Instant::now());

	let clicked = selector.results()[1].clone();
	let change = selector.select(1).expect("selection change");

	assert_eq!(change, SelectionChange::Selected(clicked.clone()));
	assert_eq!(
		change.into_selection().map(|candidate| candidate.id),
		Some(clicked.id)
	);
	assert_eq!(selector.query(), "");
	assert!(!selector.is_open());
}

#[test]
fn outside_click_closes_without_changing_selection() {
	let mut selector = Selector::fixed(documents());
	selector.focus();
	selector.set_query("bolla", Instant::now());
	assert!(selector.is_open());

	selector.close();

	assert!(!selector.is_open());
	assert_eq!(selector.panel(), PanelView::Hidden);
	assert_eq!(selector.query(), "bolla");
	assert_eq!(names(selector.results()), ["Bolla"]);
	assert!(selector.select(0).is_none(), "closed panel cannot select");
}

#[test]
fn fixed_list_filters_case_insensitively_in_original_order() {
	let mut selector = Selector::fixed(documents());
	selector.set_query("CONTRATTO", Instant::now());

	assert_eq!(names(selector.results()), ["Contratto", "Contratto quadro"]);
	assert_eq!(selector.status(), &PanelStatus::Ready);
	assert_eq!(selector.highlighted(), Some(0));
}

#[test]
fn clear_always_reports_cleared_and_empties_query() {
	let mut selector = Selector::fixed(documents());
	selector.focus();
	selector.set_query("verb", Instant::now());

	assert_eq!(selector.clear(), SelectionChange::Cleared);
	assert_eq!(selector.query(), "");
	assert!(!selector.is_open());

	selector.set_disabled(true);
	assert_eq!(selector.clear(), SelectionChange::Cleared);
	assert!(!selector.is_open());
}

#[test]
fn dispose_cancels_pending_timer_and_ignores_late_responses() {
	let source = Arc::new(Gated::default());
	let mut selector = Selector::remote(source.clone(), config());
	let start = Instant::now();

	selector.set_query("a", start);
	selector.tick(start + WINDOW);
	source.wait_for(&source.started, 1);
	selector.set_query("ab", start + WINDOW);

	selector.dispose();
	assert!(!selector.tick(start + Duration::from_secs(10)));
	assert_eq!(source.started.load(Ordering::SeqCst), 1);

	source.release("a");
	source.wait_for(&source.finished, 1);
	thread::sleep(Duration::from_millis(20));
	assert!(!selector.pump_results());
	assert!(selector.results().is_empty());
	assert!(selector.is_disposed());

	selector.focus();
	assert!(!selector.is_open());
}

#[test]
fn first_focus_browses_with_empty_query_and_refocus_reuses_results() {
	let source = Recording::echo();
	let mut selector = Selector::remote(source.clone(), config());

	assert_eq!(selector.panel(), PanelView::Hidden);
	selector.focus();
	assert_eq!(selector.panel(), PanelView::Loading { previous: &[] });
	settle(&mut selector);
	assert_eq!(source.searched(), [""]);

	selector.close();
	selector.focus();
	selector.close();
	selector.focus();

	assert_eq!(source.searched(), [""]);
	assert_eq!(names(selector.results()), ["match:"]);
}

#[test]
fn rapid_focus_changes_while_loading_do_not_stack_searches() {
	let source = Arc::new(Gated::default());
	let mut selector = Selector::remote(source.clone(), config());
	let start = Instant::now();

	selector.focus();
	source.wait_for(&source.started, 1);
	selector.close();
	selector.focus();
	selector.set_query("x", start);
	selector.close();
	selector.focus();
	assert!(selector.next_deadline().is_some());

	selector.tick(start + WINDOW);
	source.wait_for(&source.started, 2);
	source.release("");
	source.release("x");
	settle(&mut selector);

	assert_eq!(source.started.load(Ordering::SeqCst), 2);
	assert_eq!(names(selector.results()), ["match:x"]);
}

#[test]
fn zero_matches_show_distinct_no_results_state() {
	let source = Recording::new(|_| Ok(Vec::new()));
	let mut selector = Selector::remote(source, config());
	let start = Instant::now();

	selector.set_query("zzz", start);
	selector.tick(start + WINDOW);
	settle(&mut selector);

	assert_eq!(selector.status(), &PanelStatus::Empty);
	assert_eq!(selector.panel(), PanelView::NoResults { query: "zzz" });
	assert_eq!(selector.highlighted(), None);
}

#[test]
fn failure_keeps_panel_open_with_previous_rows_and_retry_searches_again() {
	let source = Recording::new(|query| {
		if query == "boom" {
			Err(SearchError::Status { status: 502 })
		} else {
			Ok(vec![Candidate::new(5, "Archivio centrale")])
		}
	});
	let mut selector = Selector::remote(source.clone(), config());
	let start = Instant::now();

	selector.focus();
	settle(&mut selector);
	selector.set_query("boom", start);
	selector.tick(start + WINDOW);
	settle(&mut selector);

	assert!(selector.is_open());
	let PanelView::Failed { error, previous } = selector.panel() else {
		panic!("expected failure view, got {:?}", selector.panel());
	};
	assert_eq!(error, &SearchError::Status { status: 502 });
	assert_eq!(names(previous), ["Archivio centrale"]);

	selector.retry();
	settle(&mut selector);
	assert_eq!(source.searched(), ["", "boom", "boom"]);
}

#[test]
fn input_shows_selection_until_user_types() {
	let mut selector = Selector::fixed(documents());
	let chosen = Candidate::new(CandidateId::Text("tit-4".into()), "Delibere").with_code("4.1");

	assert_eq!(selector.input_text(Some(&chosen)), "4.1 - Delibere");
	assert_eq!(selector.input_text(None), "");

	selector.set_query("del", Instant::now());
	assert_eq!(selector.input_text(Some(&chosen)), "del");
}

#[test]
fn disabled_selector_ignores_interaction() {
	let source = Recording::echo();
	let mut selector = Selector::remote(source.clone(), config());
	selector.set_disabled(true);

	selector.focus();
	selector.set_query("abc", Instant::now());
	selector.retry();

	assert!(!selector.is_open());
	assert_eq!(selector.query(), "");
	assert!(source.searched().is_empty());
	assert!(selector.next_deadline().is_none());
}

#[test]
fn highlight_moves_within_bounds_and_selects() {
	let mut selector = Selector::fixed(documents());
	selector.focus();
	assert_eq!(selector.highlighted(), Some(0));

	selector.highlight_previous();
	assert_eq!(selector.highlighted(), Some(0));
	for _ in 0..20 {
		selector.highlight_next();
	}
	assert_eq!(selector.highlighted(), Some(9));

	let change = selector.select_highlighted().expect("highlighted row");
	assert_eq!(change.into_selection().map(|item| item.label), Some("Circolare".into()));
}

#[test]
fn response_for_replaced_query_is_dropped_while_debounce_is_pending() {
	let source = Arc::new(Gated::default());
	let mut selector = Selector::remote(source.clone(), config());
	let start = Instant::now();

	selector.set_query("a", start);
	assert!(selector.tick(start + WINDOW));
	source.wait_for(&source.started, 1);
	selector.set_query("ab", start + WINDOW + Duration::from_millis(10));
	assert_eq!(selector.status(), &PanelStatus::Loading);

	source.release("a");
	source.wait_for(&source.finished, 1);
	thread::sleep(Duration::from_millis(20));
	selector.tick(start + WINDOW + Duration::from_millis(20));

	assert!(selector.results().is_empty(), "{:?}", names(selector.results()));
	assert_eq!(selector.panel(), PanelView::Loading { previous: &[] });
	assert!(selector.next_deadline().is_some());

	source.release("ab");
	assert!(selector.tick(start + WINDOW * 2 + Duration::from_millis(10)));
	settle(&mut selector);
	assert_eq!(names(selector.results()), ["match:ab"]);
	assert_eq!(selector.status(), &PanelStatus::Ready);
}

#[test]
fn selecting_while_a_search_is_pending_settles_the_panel() {
	let source = Arc::new(Gated::default());
	let mut selector = Selector::remote(source.clone(), config());
	let start = Instant::now();

	selector.focus();
	source.release("");
	settle(&mut selector);
	selector.set_query("ro", start);
	assert!(selector.select(0).is_some());

	assert!(!selector.is_loading());
	assert_eq!(selector.status(), &PanelStatus::Ready);
	assert!(!selector.tick(start + WINDOW * 2));
	assert_eq!(source.started.load(Ordering::SeqCst), 1);
}

#[test]
fn refocus_after_selection_browses_again_for_the_emptied_query() {
	let source = Recording::echo();
	let mut selector = Selector::remote(source.clone(), config());
	let start = Instant::now();

	selector.set_query("ros", start);
	selector.tick(start + WINDOW);
	settle(&mut selector);
	assert!(selector.select(0).is_some());
	assert_eq!(names(selector.results()), ["match:ros"]);

	// Cached rows answer "ros", not the now empty input, so focus fetches.
	selector.focus();
	settle(&mut selector);
	assert_eq!(source.searched(), ["ros", ""]);

	selector.close();
	selector.focus();
	assert_eq!(source.searched(), ["ros", ""]);
	assert_eq!(names(selector.results()), ["match:"]);
}
