use std::borrow::Cow;
use std::sync::Arc;

use serde_json::Value;
use tracing::trace;

use selettore_core::{Candidate, SearchError, SearchRequest, SearchResponse, SearchSource};

use crate::client::ApiClient;
use crate::collection::CollectionSpec;

/// [`SearchSource`] that queries one REST collection.
#[derive(Debug, Clone)]
pub struct RemoteSearch {
	client: Arc<ApiClient>,
	spec: CollectionSpec,
}

impl RemoteSearch {
	pub fn new(client: Arc<ApiClient>, spec: CollectionSpec) -> Self {
		Self { client, spec }
	}
}

impl SearchSource for RemoteSearch {
	fn search(&self, request: &SearchRequest) -> Result<Vec<Candidate>, SearchError> {
		let request = if request.ordering.is_empty() && !self.spec.ordering.is_empty() {
			Cow::Owned(request.clone().with_ordering(self.spec.ordering.clone()))
		} else {
			Cow::Borrowed(request)
		};

		let body = self.client.get_json(&self.spec.endpoint, request.as_ref())?;
		let response: SearchResponse<Value> =
			serde_json::from_value(body).map_err(|err| SearchError::Decode(err.to_string()))?;
		let total = response.total_count();
		let more = response.has_more();
		let candidates = self.spec.mapping.map_all(&response.into_results());
		trace!(
			endpoint = %self.spec.endpoint,
			count = candidates.len(),
			total,
			more,
			"search completed"
		);
		Ok(candidates)
	}
}
