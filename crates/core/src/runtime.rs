use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering as AtomicOrdering};
use std::sync::mpsc::{self, Receiver, Sender, TryRecvError};
use std::thread;

use tracing::{debug, trace, warn};

use crate::candidate::Candidate;
use crate::error::SearchError;
use crate::request::SearchRequest;
use crate::source::SearchSource;

/// Token value no issued search ever carries; ids start at 1.
const RETIRED: u64 = 0;

/// Response for one dispatched search, tagged with the token it was issued under.
#[derive(Debug)]
pub(crate) struct SearchResult {
	/// Token of the search that produced this result.
	pub(crate) id: u64,
	/// Query text the search was issued for.
	pub(crate) query: String,
	pub(crate) outcome: Result<Vec<Candidate>, SearchError>,
}

/// Issues searches on worker threads and tracks which one is current.
///
/// Every search gets the next token from a monotonically increasing counter.
/// Responses may arrive in any order; only the one whose token equals the
/// latest issued token is considered current.
pub(crate) struct SearchRuntime {
	source: Arc<dyn SearchSource>,
	tx: Sender<SearchResult>,
	rx: Receiver<SearchResult>,
	latest_query_id: Arc<AtomicU64>,
	next_query_id: u64,
	current_query_id: Option<u64>,
	in_flight: bool,
}

impl SearchRuntime {
	pub(crate) fn new(source: Arc<dyn SearchSource>) -> Self {
		let (tx, rx) = mpsc::channel();
		Self {
			source,
			tx,
			rx,
			latest_query_id: Arc::new(AtomicU64::new(RETIRED)),
			next_query_id: RETIRED,
			current_query_id: None,
			in_flight: false,
		}
	}

	/// Dispatch `request` and return the token it was issued under.
	pub(crate) fn issue_search(&mut self, request: SearchRequest) -> u64 {
		self.next_query_id = self.next_query_id.saturating_add(1);
		let id = self.next_query_id;
		self.current_query_id = Some(id);
		self.in_flight = true;
		self.latest_query_id.store(id, AtomicOrdering::Release);

		debug!(id, query = %request.search, "dispatching search");

		let source = Arc::clone(&self.source);
		let latest = Arc::clone(&self.latest_query_id);
		let tx = self.tx.clone();
		let query = request.search.clone();
		let spawned = thread::Builder::new()
			.name(format!("selettore-search-{id}"))
			.spawn(move || run_search(source.as_ref(), &request, id, &latest, &tx));

		if let Err(err) = spawned {
			warn!(id, error = %err, "failed to spawn search worker");
			let _ = self.tx.send(SearchResult {
				id,
				query,
				outcome: Err(SearchError::Network(err.to_string())),
			});
		}

		id
	}

	/// Whether `result_id` belongs to the most recently issued search.
	pub(crate) fn matches_latest(&self, result_id: u64) -> bool {
		Some(result_id) == self.current_query_id
	}

	pub(crate) fn record_completion(&mut self) {
		self.in_flight = false;
	}

	pub(crate) fn is_in_flight(&self) -> bool {
		self.in_flight
	}

	#[cfg(test)]
	pub(crate) fn has_issued_query(&self) -> bool {
		self.current_query_id.is_some()
	}

	pub(crate) fn try_recv(&mut self) -> Result<SearchResult, TryRecvError> {
		self.rx.try_recv()
	}

	/// Retire the outstanding token so its worker drops the response.
	pub(crate) fn supersede(&mut self) {
		if let Some(id) = self.current_query_id.take() {
			trace!(id, "search superseded");
		}
		self.in_flight = false;
		self.latest_query_id.store(RETIRED, AtomicOrdering::Release);
	}

	/// Retire every outstanding token so late responses are dropped.
	pub(crate) fn shutdown(&mut self) {
		self.supersede();
		debug!("search runtime shut down");
	}

	#[cfg(test)]
	pub(crate) fn inject(&self, result: SearchResult) {
		let _ = self.tx.send(result);
	}
}

fn run_search(
	source: &dyn SearchSource,
	request: &SearchRequest,
	id: u64,
	latest: &AtomicU64,
	tx: &Sender<SearchResult>,
) {
	if should_abort(id, latest) {
		trace!(id, "search superseded before dispatch");
		return;
	}

	let outcome = source.search(request);

	if should_abort(id, latest) {
		debug!(id, "dropping response for superseded search");
		return;
	}

	let _ = tx.send(SearchResult {
		id,
		query: request.search.clone(),
		outcome,
	});
}

fn should_abort(id: u64, latest_query_id: &AtomicU64) -> bool {
	latest_query_id.load(AtomicOrdering::Acquire) != id
}
