use std::path::PathBuf;
use std::time::Duration;

use anyhow::{Result, anyhow};
use selettore_remote::CollectionSpec;
use thiserror::Error;

mod sources;
mod summary;
mod validation;

pub(crate) use sources::{ConfigSources, SettingSource};

use super::raw::normalize_collection_name;

/// Application-ready configuration derived from user input, config files and
/// defaults.
#[derive(Debug, Clone)]
pub(crate) struct ResolvedConfig {
	pub(crate) server: ServerSettings,
	pub(crate) search: SearchSettings,
	pub(crate) ui: UiSettings,
	pub(crate) collections: Vec<CollectionEntry>,
	/// Configuration files that were found and merged, lowest precedence first.
	pub(crate) files: Vec<PathBuf>,
}

#[derive(Debug, Clone)]
pub(crate) struct ServerSettings {
	pub(crate) base_url: String,
	pub(crate) timeout: Duration,
}

#[derive(Debug, Clone)]
pub(crate) struct SearchSettings {
	pub(crate) debounce: Duration,
	pub(crate) page_size: usize,
	/// Collection picked when none is named on the command line.
	pub(crate) collection: String,
}

#[derive(Debug, Clone)]
pub(crate) struct UiSettings {
	pub(crate) title: Option<String>,
	pub(crate) label: Option<String>,
	pub(crate) placeholder: String,
	pub(crate) theme: Option<String>,
}

/// A collection that can be picked from, after configuration overrides.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct CollectionEntry {
	pub(crate) name: String,
	pub(crate) title: String,
	pub(crate) spec: CollectionSpec,
}

/// A layered setting that cannot be used.
#[derive(Debug, Error)]
pub(crate) enum ConfigError {
	#[error("{origin} sets {key} to '{value}': {reason}")]
	Invalid {
		key: String,
		value: String,
		origin: SettingSource,
		reason: String,
	},
	#[error("[collections.{collection}] has no preset to extend and needs an endpoint")]
	MissingEndpoint { collection: String },
}

impl ConfigError {
	pub(crate) fn invalid(
		key: impl Into<String>,
		value: impl ToString,
		origin: SettingSource,
		reason: impl Into<String>,
	) -> Self {
		Self::Invalid {
			key: key.into(),
			value: value.to_string(),
			origin,
			reason: reason.into(),
		}
	}

	/// Endpoint of `collection` is unusable.
	pub(crate) fn endpoint(collection: &str, endpoint: &str, reason: impl Into<String>) -> Self {
		Self::invalid(
			format!("collections.{collection}.endpoint"),
			endpoint,
			SettingSource::ConfigKey(format!("collections.{collection}")),
			reason,
		)
	}

	/// Dotted configuration key the error is about.
	pub(crate) fn key(&self) -> String {
		match self {
			Self::Invalid { key, .. } => key.clone(),
			Self::MissingEndpoint { collection } => format!("collections.{collection}.endpoint"),
		}
	}
}

impl ResolvedConfig {
	pub(super) fn validate(&self, sources: &ConfigSources) -> Result<(), ConfigError> {
		validation::validate(self, sources)
	}

	/// Look up a collection by name.
	pub(crate) fn collection(&self, name: &str) -> Result<&CollectionEntry> {
		let wanted = normalize_collection_name(name);
		self.collections
			.iter()
			.find(|entry| entry.name == wanted)
			.ok_or_else(|| {
				let known: Vec<&str> = self
					.collections
					.iter()
					.map(|entry| entry.name.as_str())
					.collect();
				anyhow!(
					"unknown collection '{name}' (known: {})",
					known.join(", ")
				)
			})
	}

	/// Print a human readable summary of the effective configuration.
	pub(crate) fn print_summary(&self) {
		summary::print_summary(self);
	}
}
