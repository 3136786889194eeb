use serde::Deserialize;

/// Body of a search response.
///
/// List endpoints answer either with a bare array or with a paginated
/// envelope; both shapes are accepted transparently.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum SearchResponse<T> {
	Bare(Vec<T>),
	Envelope {
		results: Vec<T>,
		#[serde(default)]
		count: Option<u64>,
		#[serde(default)]
		next: Option<String>,
		#[serde(default)]
		previous: Option<String>,
	},
}

impl<T> SearchResponse<T> {
	/// The ordered candidates carried by the response.
	pub fn into_results(self) -> Vec<T> {
		match self {
			Self::Bare(items) | Self::Envelope { results: items, .. } => items,
		}
	}

	/// Total size of the collection when the server reported it.
	pub fn total_count(&self) -> Option<u64> {
		match self {
			Self::Bare(items) => Some(items.len() as u64),
			Self::Envelope { count, .. } => *count,
		}
	}

	/// Whether the server has more pages beyond this one.
	pub fn has_more(&self) -> bool {
		matches!(self, Self::Envelope { next: Some(_), .. })
	}
}
