use serde::{Deserialize, Serialize};

use crate::candidate::Candidate;

/// Display fields a fixed list can be filtered on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MatchField {
	Code,
	Label,
	Description,
}

const DEFAULT_FIELDS: [MatchField; 2] = [MatchField::Code, MatchField::Label];

/// Small, closed set of candidates supplied synchronously by the parent.
///
/// Filtering is a case-insensitive substring match over the configured
/// fields and never reorders the items.
#[derive(Debug, Clone, Default)]
pub struct FixedList {
	items: Vec<Candidate>,
	fields: Vec<MatchField>,
}

impl FixedList {
	pub fn new(items: Vec<Candidate>) -> Self {
		Self {
			items,
			fields: DEFAULT_FIELDS.to_vec(),
		}
	}

	/// Restrict or extend the fields a query is matched against.
	#[must_use]
	pub fn with_fields(mut self, fields: impl IntoIterator<Item = MatchField>) -> Self {
		self.fields = fields.into_iter().collect();
		if self.fields.is_empty() {
			self.fields = DEFAULT_FIELDS.to_vec();
		}
		self
	}

	#[must_use]
	pub fn fields(&self) -> &[MatchField] {
		&self.fields
	}

	#[must_use]
	pub fn len(&self) -> usize {
		self.items.len()
	}

	#[must_use]
	pub fn is_empty(&self) -> bool {
		self.items.is_empty()
	}

	/// Return the items matching `query`, in their original order.
	#[must_use]
	pub fn filter(&self, query: &str) -> Vec<Candidate> {
		let needle = query.trim().to_lowercase();
		if needle.is_empty() {
			return self.items.clone();
		}

		self.items
			.iter()
			.filter(|item| self.matches(item, &needle))
			.cloned()
			.collect()
	}

	fn matches(&self, item: &Candidate, needle: &str) -> bool {
		self.fields.iter().any(|field| {
			item.field(*field)
				.is_some_and(|text| text.to_lowercase().contains(needle))
		})
	}
}
