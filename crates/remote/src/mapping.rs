use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use selettore_core::{Candidate, CandidateId};

/// Which JSON fields of a record feed a [`Candidate`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CandidateMapping {
	pub id_field: String,
	pub label_field: String,
	pub code_field: Option<String>,
	pub description_field: Option<String>,
}

impl Default for CandidateMapping {
	fn default() -> Self {
		Self {
			id_field: "id".into(),
			label_field: "label".into(),
			code_field: None,
			description_field: None,
		}
	}
}

impl CandidateMapping {
	pub fn new(label_field: impl Into<String>) -> Self {
		Self {
			label_field: label_field.into(),
			..Self::default()
		}
	}

	#[must_use]
	pub fn with_code(mut self, field: impl Into<String>) -> Self {
		self.code_field = Some(field.into());
		self
	}

	#[must_use]
	pub fn with_description(mut self, field: impl Into<String>) -> Self {
		self.description_field = Some(field.into());
		self
	}

	/// Convert one record. Records without a usable id are skipped.
	///
	/// A missing label falls back to the code, then to the id, so rows are
	/// never rendered blank.
	#[must_use]
	pub fn to_candidate(&self, record: &Value) -> Option<Candidate> {
		let object = record.as_object()?;
		let id = match object.get(&self.id_field)? {
			Value::Number(number) => CandidateId::Number(number.as_i64()?),
			Value::String(text) if !text.is_empty() => CandidateId::Text(text.clone()),
			_ => return None,
		};

		let code = self
			.code_field
			.as_deref()
			.and_then(|field| text_field(object, field));
		let description = self
			.description_field
			.as_deref()
			.and_then(|field| text_field(object, field));
		let label = text_field(object, &self.label_field)
			.or_else(|| code.clone())
			.unwrap_or_else(|| id.to_string());

		let mut extra = object.clone();
		for field in [
			Some(self.id_field.as_str()),
			Some(self.label_field.as_str()),
			self.code_field.as_deref(),
			self.description_field.as_deref(),
		]
		.into_iter()
		.flatten()
		{
			extra.remove(field);
		}

		let mut candidate = Candidate::new(id, label);
		candidate.code = code;
		candidate.description = description;
		candidate.extra = extra;
		Some(candidate)
	}

	pub fn map_all(&self, records: &[Value]) -> Vec<Candidate> {
		records
			.iter()
			.filter_map(|record| self.to_candidate(record))
			.collect()
	}
}

/// Read a field as display text; numbers are formatted, nested paths use `__`.
fn text_field(object: &Map<String, Value>, field: &str) -> Option<String> {
	let mut parts = field.split("__");
	let mut value = object.get(parts.next()?)?;
	for part in parts {
		value = value.as_object()?.get(part)?;
	}
	match value {
		Value::String(text) if !text.trim().is_empty() => Some(text.trim().to_string()),
		Value::Number(number) => Some(number.to_string()),
		_ => None,
	}
}

#[cfg(test)]
mod tests {
	use serde_json::json;

	use super::*;

	#[test]
	fn maps_configured_fields_and_keeps_the_rest() {
		let mapping = CandidateMapping::new("titolo")
			.with_code("codice")
			.with_description("descrizione");
		let record = json!({
			"id": 12,
			"codice": "1.3",
			"titolo": "Contabilita",
			"descrizione": "Bilanci e rendiconti",
			"livello": 2
		});

		let candidate = mapping.to_candidate(&record).expect("candidate");
		assert_eq!(candidate.id, CandidateId::Number(12));
		assert_eq!(candidate.display_text(), "1.3 - Contabilita");
		assert_eq!(candidate.description.as_deref(), Some("Bilanci e rendiconti"));
		assert_eq!(candidate.extra.len(), 1);
		assert_eq!(candidate.extra["livello"], json!(2));
	}

	#[test]
	fn label_falls_back_to_code_then_id() {
		let mapping = CandidateMapping::new("nome").with_code("codice");

		let coded = mapping
			.to_candidate(&json!({"id": "u-1", "codice": "SC-01"}))
			.expect("coded");
		assert_eq!(coded.label, "SC-01");

		let bare = mapping.to_candidate(&json!({"id": 9})).expect("bare");
		assert_eq!(bare.label, "9");
	}

	#[test]
	fn nested_fields_use_double_underscore_paths() {
		let mapping = CandidateMapping::new("anagrafica__display_name");
		let record = json!({"id": 4, "anagrafica": {"display_name": "Studio Bianchi"}});
		assert_eq!(
			mapping.to_candidate(&record).map(|c| c.label),
			Some("Studio Bianchi".into())
		);
	}

	#[test]
	fn records_without_ids_are_skipped() {
		let mapping = CandidateMapping::default();
		let records = vec![
			json!({"label": "orphan"}),
			json!({"id": null, "label": "null id"}),
			json!("not an object"),
			json!({"id": 1, "label": "kept"}),
		];
		let mapped = mapping.map_all(&records);
		assert_eq!(mapped.len(), 1);
		assert_eq!(mapped[0].label, "kept");
	}
}
