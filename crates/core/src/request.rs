use std::time::Duration;

use serde::Serialize;

/// Number of candidates requested per search unless configured otherwise.
pub const DEFAULT_PAGE_SIZE: usize = 20;

/// Quiet period between the last keystroke and the dispatched search.
pub const DEFAULT_DEBOUNCE: Duration = Duration::from_millis(300);

/// Parameters of one remote search, serialised as URL query parameters.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SearchRequest {
	pub search: String,
	pub page_size: usize,
	#[serde(skip_serializing_if = "String::is_empty")]
	pub ordering: String,
}

impl SearchRequest {
	pub fn new(search: impl Into<String>) -> Self {
		Self {
			search: search.into(),
			page_size: DEFAULT_PAGE_SIZE,
			ordering: String::new(),
		}
	}

	#[must_use]
	pub fn with_page_size(mut self, page_size: usize) -> Self {
		self.page_size = page_size;
		self
	}

	#[must_use]
	pub fn with_ordering(mut self, ordering: impl Into<String>) -> Self {
		self.ordering = ordering.into();
		self
	}
}
