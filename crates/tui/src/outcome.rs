use selettore_core::Candidate;
use serde::Serialize;

/// How the picker ended and what the parent form held at that point.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PickOutcome {
	/// `true` when the user confirmed the form, `false` when they cancelled.
	pub accepted: bool,
	pub selection: Option<Candidate>,
	/// Query left in the input when the picker exited.
	pub query: String,
}

impl PickOutcome {
	#[must_use]
	pub fn cancelled(query: impl Into<String>) -> Self {
		Self {
			accepted: false,
			selection: None,
			query: query.into(),
		}
	}
}
