use super::{ConfigError, ConfigSources, ResolvedConfig};

const MAX_PAGE_SIZE: usize = 500;
const MAX_DEBOUNCE_MS: u128 = 10_000;

pub(super) fn validate(config: &ResolvedConfig, sources: &ConfigSources) -> Result<(), ConfigError> {
	let base_url = config.server.base_url.trim();
	if !(base_url.starts_with("http://") || base_url.starts_with("https://")) {
		return Err(ConfigError::invalid(
			"server.base_url",
			base_url,
			sources.source_for_base_url(),
			"must be an http:// or https:// URL",
		));
	}

	if config.server.timeout.is_zero() {
		return Err(ConfigError::invalid(
			"server.timeout_secs",
			"0",
			sources.source_for_timeout(),
			"must be greater than zero",
		));
	}

	let page_size = config.search.page_size;
	if page_size == 0 || page_size > MAX_PAGE_SIZE {
		return Err(ConfigError::invalid(
			"search.page_size",
			page_size,
			sources.source_for_page_size(),
			format!("must be between 1 and {MAX_PAGE_SIZE}"),
		));
	}

	let debounce_ms = config.search.debounce.as_millis();
	if debounce_ms > MAX_DEBOUNCE_MS {
		return Err(ConfigError::invalid(
			"search.debounce_ms",
			debounce_ms,
			sources.source_for_debounce(),
			format!("must be at most {MAX_DEBOUNCE_MS}"),
		));
	}

	if let Some(theme) = &config.ui.theme
		&& selettore_tui::style::by_name(theme).is_none()
	{
		return Err(ConfigError::invalid(
			"ui.theme",
			theme,
			sources.source_for_theme(),
			format!("expected one of {}", selettore_tui::style::names().join(", ")),
		));
	}

	for entry in &config.collections {
		let endpoint = entry.spec.endpoint.trim();
		if endpoint.is_empty() || endpoint.starts_with('/') || endpoint.contains("://") {
			return Err(ConfigError::endpoint(
				&entry.name,
				endpoint,
				"must be a path relative to server.base_url",
			));
		}
	}

	Ok(())
}
