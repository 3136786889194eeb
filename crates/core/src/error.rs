use thiserror::Error;

/// Why a search could not produce a result set.
///
/// These never reach the parent form: the selector keeps them in its panel
/// state and renders them inline.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum SearchError {
	/// The request never produced a response.
	#[error("could not reach the search service: {0}")]
	Network(String),

	/// The service answered with a non-success status.
	#[error("search service answered with status {status}")]
	Status { status: u16 },

	/// The credentials were rejected even after a refresh attempt.
	#[error("not authorised to search this collection")]
	Unauthorized,

	/// The body did not look like a candidate list.
	#[error("could not decode search results: {0}")]
	Decode(String),
}
