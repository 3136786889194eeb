use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::filter::MatchField;

/// Identity of a remote record. Backends hand out both numeric and textual keys.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum CandidateId {
	Number(i64),
	Text(String),
}

impl fmt::Display for CandidateId {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			Self::Number(value) => write!(f, "{value}"),
			Self::Text(value) => f.write_str(value),
		}
	}
}

impl From<i64> for CandidateId {
	fn from(value: i64) -> Self {
		Self::Number(value)
	}
}

impl From<&str> for CandidateId {
	fn from(value: &str) -> Self {
		Self::Text(value.to_string())
	}
}

impl From<String> for CandidateId {
	fn from(value: String) -> Self {
		Self::Text(value)
	}
}

/// One selectable record shown in a result panel.
///
/// Candidates are never mutated after they have been fetched; two candidates
/// refer to the same record when their [`CandidateId`]s are equal.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Candidate {
	pub id: CandidateId,
	pub label: String,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub code: Option<String>,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub description: Option<String>,
	/// Further display fields, kept verbatim.
	#[serde(default, flatten, skip_serializing_if = "Map::is_empty")]
	pub extra: Map<String, Value>,
}

impl Candidate {
	pub fn new(id: impl Into<CandidateId>, label: impl Into<String>) -> Self {
		Self {
			id: id.into(),
			label: label.into(),
			code: None,
			description: None,
			extra: Map::new(),
		}
	}

	#[must_use]
	pub fn with_code(mut self, code: impl Into<String>) -> Self {
		self.code = Some(code.into());
		self
	}

	#[must_use]
	pub fn with_description(mut self, description: impl Into<String>) -> Self {
		self.description = Some(description.into());
		self
	}

	/// Text of one of the matchable display fields.
	#[must_use]
	pub fn field(&self, field: MatchField) -> Option<&str> {
		match field {
			MatchField::Code => self.code.as_deref(),
			MatchField::Label => Some(self.label.as_str()),
			MatchField::Description => self.description.as_deref(),
		}
	}

	/// Single-line rendering used by inputs and result rows.
	#[must_use]
	pub fn display_text(&self) -> String {
		match self.code.as_deref() {
			Some(code) if !code.is_empty() && code != self.label => {
				format!("{code} - {}", self.label)
			}
			_ => self.label.clone(),
		}
	}
}

/// Value reported to the parent form whenever the user changes the selection.
#[derive(Debug, Clone, PartialEq)]
pub enum SelectionChange {
	/// The user picked this candidate.
	Selected(Candidate),
	/// The user explicitly cleared the selection.
	Cleared,
}

impl SelectionChange {
	/// The new selection, `None` when it was cleared.
	#[must_use]
	pub fn into_selection(self) -> Option<Candidate> {
		match self {
			Self::Selected(candidate) => Some(candidate),
			Self::Cleared => None,
		}
	}
}
