use std::collections::BTreeMap;
use std::time::Duration;

use serde::Deserialize;

use selettore_core::{DEFAULT_DEBOUNCE, DEFAULT_PAGE_SIZE};
use selettore_remote::{Collection, CollectionSpec, DEFAULT_TIMEOUT};

use crate::cli::CliArgs;

use super::resolved::{
	CollectionEntry, ConfigError, ConfigSources, ResolvedConfig, SearchSettings, ServerSettings,
	UiSettings,
};

pub(super) const DEFAULT_BASE_URL: &str = "http://localhost:8000/api/";
pub(super) const DEFAULT_PLACEHOLDER: &str = "Cerca...";

/// Mirror of the configuration file representation before CLI overrides and
/// validation are applied.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub(super) struct RawConfig {
	server: ServerSection,
	search: SearchSection,
	ui: UiSection,
	collections: BTreeMap<String, CollectionSection>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
struct ServerSection {
	base_url: Option<String>,
	timeout_secs: Option<u64>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
struct SearchSection {
	debounce_ms: Option<u64>,
	page_size: Option<usize>,
	collection: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
struct UiSection {
	title: Option<String>,
	label: Option<String>,
	placeholder: Option<String>,
	theme: Option<String>,
}

/// Per-collection overrides; unknown names define new collections.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
struct CollectionSection {
	title: Option<String>,
	endpoint: Option<String>,
	ordering: Option<String>,
	id_field: Option<String>,
	label_field: Option<String>,
	code_field: Option<String>,
	description_field: Option<String>,
}

impl CollectionSection {
	fn apply_to(self, spec: &mut CollectionSpec) {
		if let Some(endpoint) = self.endpoint {
			spec.endpoint = endpoint;
		}
		if let Some(ordering) = self.ordering {
			spec.ordering = ordering;
		}
		if let Some(field) = self.id_field {
			spec.mapping.id_field = field;
		}
		if let Some(field) = self.label_field {
			spec.mapping.label_field = field;
		}
		if let Some(field) = self.code_field {
			spec.mapping.code_field = Some(field).filter(|value| !value.is_empty());
		}
		if let Some(field) = self.description_field {
			spec.mapping.description_field = Some(field).filter(|value| !value.is_empty());
		}
	}
}

/// Collection names are matched ignoring case, with `_` and `-` interchangeable.
pub(super) fn normalize_collection_name(name: &str) -> String {
	name.trim().to_ascii_lowercase().replace('_', "-")
}

impl RawConfig {
	/// Apply CLI overrides on top of the raw configuration values.
	pub(super) fn apply_cli_overrides(&mut self, cli: &CliArgs) {
		if let Some(base_url) = cli.base_url.clone() {
			self.server.base_url = Some(base_url);
		}
		if let Some(value) = cli.timeout_secs {
			self.server.timeout_secs = Some(value);
		}
		if let Some(value) = cli.debounce_ms {
			self.search.debounce_ms = Some(value);
		}
		if let Some(value) = cli.page_size {
			self.search.page_size = Some(value);
		}
		if let Some(theme) = cli.theme.clone() {
			self.ui.theme = Some(theme);
		}

		let Some(pick) = cli.pick_args() else {
			return;
		};
		if let Some(collection) = pick.collection.clone() {
			self.search.collection = Some(collection);
		}
		if let Some(title) = pick.title.clone() {
			self.ui.title = Some(title);
		}
		if let Some(label) = pick.label.clone() {
			self.ui.label = Some(label);
		}
		if let Some(placeholder) = pick.placeholder.clone() {
			self.ui.placeholder = Some(placeholder);
		}
	}

	/// Convert the raw configuration into a [`ResolvedConfig`], validating and
	/// filling defaults where required.
	pub(super) fn resolve(self, cli: &CliArgs) -> Result<ResolvedConfig, ConfigError> {
		let sources = ConfigSources::from_cli(cli);
		let collections = resolve_collections(self.collections)?;

		let config = ResolvedConfig {
			server: ServerSettings {
				base_url: self
					.server
					.base_url
					.unwrap_or_else(|| DEFAULT_BASE_URL.to_string()),
				timeout: self
					.server
					.timeout_secs
					.map_or(DEFAULT_TIMEOUT, Duration::from_secs),
			},
			search: SearchSettings {
				debounce: self
					.search
					.debounce_ms
					.map_or(DEFAULT_DEBOUNCE, Duration::from_millis),
				page_size: self.search.page_size.unwrap_or(DEFAULT_PAGE_SIZE),
				collection: normalize_collection_name(
					self.search
						.collection
						.as_deref()
						.unwrap_or(Collection::Anagrafiche.as_str()),
				),
			},
			ui: UiSettings {
				title: self.ui.title.filter(|title| !title.trim().is_empty()),
				label: self.ui.label.filter(|label| !label.trim().is_empty()),
				placeholder: self
					.ui
					.placeholder
					.unwrap_or_else(|| DEFAULT_PLACEHOLDER.to_string()),
				theme: self.ui.theme,
			},
			collections,
			files: Vec::new(),
		};

		config.validate(&sources)?;
		Ok(config)
	}
}

/// Presets first, overridden where configured, then configuration-only
/// collections in name order.
fn resolve_collections(
	sections: BTreeMap<String, CollectionSection>,
) -> Result<Vec<CollectionEntry>, ConfigError> {
	let mut sections: BTreeMap<String, CollectionSection> = sections
		.into_iter()
		.map(|(name, section)| (normalize_collection_name(&name), section))
		.collect();

	let mut entries = Vec::with_capacity(Collection::ALL.len() + sections.len());
	for preset in Collection::ALL {
		let mut spec = preset.spec();
		let mut title = preset.title().to_string();
		if let Some(mut section) = sections.remove(preset.as_str()) {
			if let Some(custom) = section.title.take() {
				title = custom;
			}
			section.apply_to(&mut spec);
		}
		entries.push(CollectionEntry {
			name: preset.as_str().to_string(),
			title,
			spec,
		});
	}

	for (name, mut section) in sections {
		let Some(endpoint) = section.endpoint.clone() else {
			return Err(ConfigError::MissingEndpoint { collection: name });
		};
		let title = section.title.take().unwrap_or_else(|| name.clone());
		let mut spec = CollectionSpec {
			endpoint,
			ordering: String::new(),
			mapping: Default::default(),
		};
		section.apply_to(&mut spec);
		entries.push(CollectionEntry { name, title, spec });
	}

	Ok(entries)
}
