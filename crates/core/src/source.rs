use std::sync::Arc;

use crate::candidate::Candidate;
use crate::error::SearchError;
use crate::filter::FixedList;
use crate::request::SearchRequest;

/// Remote collaborator that resolves a query into candidates.
///
/// Implementations block the calling thread; the selector always invokes them
/// from a dedicated worker thread.
pub trait SearchSource: Send + Sync {
	fn search(&self, request: &SearchRequest) -> Result<Vec<Candidate>, SearchError>;
}

impl<F> SearchSource for F
where
	F: Fn(&SearchRequest) -> Result<Vec<Candidate>, SearchError> + Send + Sync,
{
	fn search(&self, request: &SearchRequest) -> Result<Vec<Candidate>, SearchError> {
		self(request)
	}
}

/// Where a selector gets its candidates from.
#[derive(Clone)]
pub enum CandidateSource {
	/// Small enumeration supplied by the parent, filtered synchronously.
	Fixed(FixedList),
	/// Large or open collection searched remotely.
	Remote(Arc<dyn SearchSource>),
}

impl From<FixedList> for CandidateSource {
	fn from(list: FixedList) -> Self {
		Self::Fixed(list)
	}
}

impl std::fmt::Debug for CandidateSource {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		match self {
			Self::Fixed(list) => f.debug_tuple("Fixed").field(&list.len()).finish(),
			Self::Remote(_) => f.write_str("Remote"),
		}
	}
}
