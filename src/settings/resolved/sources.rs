use std::fmt;

use crate::cli::CliArgs;

/// Where a setting was taken from, for error messages.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum SettingSource {
	CliFlag(&'static str),
	ConfigKey(String),
}

impl fmt::Display for SettingSource {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			Self::CliFlag(flag) => write!(f, "CLI flag `{flag}`"),
			Self::ConfigKey(key) => write!(f, "configuration key `{key}`"),
		}
	}
}

/// Settings that were overridden on the command line.
#[derive(Debug, Default, Clone)]
pub(crate) struct ConfigSources {
	pub(crate) base_url: Option<SettingSource>,
	pub(crate) timeout: Option<SettingSource>,
	pub(crate) debounce: Option<SettingSource>,
	pub(crate) page_size: Option<SettingSource>,
	pub(crate) theme: Option<SettingSource>,
}

impl ConfigSources {
	pub(crate) fn from_cli(cli: &CliArgs) -> Self {
		let flag = |set: bool, name: &'static str| set.then_some(SettingSource::CliFlag(name));
		Self {
			base_url: flag(cli.base_url.is_some(), "--base-url"),
			timeout: flag(cli.timeout_secs.is_some(), "--timeout"),
			debounce: flag(cli.debounce_ms.is_some(), "--debounce-ms"),
			page_size: flag(cli.page_size.is_some(), "--page-size"),
			theme: flag(cli.theme.is_some(), "--theme"),
		}
	}

	pub(crate) fn source_for_base_url(&self) -> SettingSource {
		Self::or_key(&self.base_url, "server.base_url")
	}

	pub(crate) fn source_for_timeout(&self) -> SettingSource {
		Self::or_key(&self.timeout, "server.timeout_secs")
	}

	pub(crate) fn source_for_debounce(&self) -> SettingSource {
		Self::or_key(&self.debounce, "search.debounce_ms")
	}

	pub(crate) fn source_for_page_size(&self) -> SettingSource {
		Self::or_key(&self.page_size, "search.page_size")
	}

	pub(crate) fn source_for_theme(&self) -> SettingSource {
		Self::or_key(&self.theme, "ui.theme")
	}

	fn or_key(source: &Option<SettingSource>, key: &str) -> SettingSource {
		source
			.clone()
			.unwrap_or_else(|| SettingSource::ConfigKey(key.to_string()))
	}
}
