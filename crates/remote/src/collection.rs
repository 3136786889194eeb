use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::mapping::CandidateMapping;

/// Remote collections the record pickers search.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Collection {
	Anagrafiche,
	TipiDocumento,
	Titolario,
	Ubicazioni,
	Clienti,
}

impl Collection {
	pub const ALL: [Collection; 5] = [
		Collection::Anagrafiche,
		Collection::TipiDocumento,
		Collection::Titolario,
		Collection::Ubicazioni,
		Collection::Clienti,
	];

	#[must_use]
	pub fn as_str(self) -> &'static str {
		match self {
			Self::Anagrafiche => "anagrafiche",
			Self::TipiDocumento => "tipi-documento",
			Self::Titolario => "titolario",
			Self::Ubicazioni => "ubicazioni",
			Self::Clienti => "clienti",
		}
	}

	/// Human readable field label shown next to the input.
	#[must_use]
	pub fn title(self) -> &'static str {
		match self {
			Self::Anagrafiche => "Anagrafica",
			Self::TipiDocumento => "Tipo documento",
			Self::Titolario => "Voce di titolario",
			Self::Ubicazioni => "Ubicazione",
			Self::Clienti => "Cliente",
		}
	}

	/// Endpoint, ordering and field mapping used unless configuration overrides them.
	#[must_use]
	pub fn spec(self) -> CollectionSpec {
		match self {
			Self::Anagrafiche => CollectionSpec {
				endpoint: "anagrafiche/".into(),
				ordering: "display_name".into(),
				mapping: CandidateMapping::new("display_name")
					.with_code("codice_fiscale")
					.with_description("tipo"),
			},
			Self::TipiDocumento => CollectionSpec {
				endpoint: "documenti/tipi/".into(),
				ordering: "codice".into(),
				mapping: CandidateMapping::new("nome")
					.with_code("codice")
					.with_description("descrizione"),
			},
			Self::Titolario => CollectionSpec {
				endpoint: "titolario/voci/".into(),
				ordering: "codice".into(),
				mapping: CandidateMapping::new("titolo")
					.with_code("codice")
					.with_description("descrizione"),
			},
			Self::Ubicazioni => CollectionSpec {
				endpoint: "archivio-fisico/unita/".into(),
				ordering: "full_path".into(),
				mapping: CandidateMapping::new("nome")
					.with_code("codice")
					.with_description("full_path"),
			},
			Self::Clienti => CollectionSpec {
				endpoint: "clienti/".into(),
				ordering: "anagrafica__display_name".into(),
				mapping: CandidateMapping::new("anagrafica__display_name")
					.with_code("codice")
					.with_description("anagrafica__codice_fiscale"),
			},
		}
	}
}

impl fmt::Display for Collection {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(self.as_str())
	}
}

impl FromStr for Collection {
	type Err = String;

	fn from_str(value: &str) -> Result<Self, Self::Err> {
		let normalized = value.trim().to_ascii_lowercase().replace('_', "-");
		Self::ALL
			.into_iter()
			.find(|collection| collection.as_str() == normalized)
			.ok_or_else(|| format!("unknown collection '{value}'"))
	}
}

/// How one collection is searched: path under the API root, server-side
/// ordering and how records become candidates.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CollectionSpec {
	pub endpoint: String,
	#[serde(default)]
	pub ordering: String,
	#[serde(default)]
	pub mapping: CandidateMapping,
}
