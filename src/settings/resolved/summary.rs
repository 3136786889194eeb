use super::ResolvedConfig;

pub(super) fn print_summary(config: &ResolvedConfig) {
	for line in summary_lines(config) {
		println!("{line}");
	}
}

fn summary_lines(config: &ResolvedConfig) -> Vec<String> {
	let mut lines = vec![
		"Effective configuration:".to_string(),
		format!("  Server: {}", config.server.base_url),
		format!("  Timeout: {}s", config.server.timeout.as_secs()),
		format!("  Debounce: {}ms", config.search.debounce.as_millis()),
		format!("  Page size: {}", config.search.page_size),
		format!("  Default collection: {}", config.search.collection),
		format!(
			"  UI theme: {}",
			config.ui.theme.as_deref().unwrap_or("(use the default)")
		),
		format!("  Placeholder: {}", config.ui.placeholder),
	];
	if let Some(title) = &config.ui.title {
		lines.push(format!("  Form title: {title}"));
	}
	if let Some(label) = &config.ui.label {
		lines.push(format!("  Field label: {label}"));
	}
	if config.files.is_empty() {
		lines.push("  Config files: (none)".to_string());
	} else {
		lines.push("  Config files:".to_string());
		lines.extend(
			config
				.files
				.iter()
				.map(|path| format!("    {}", path.display())),
		);
	}
	lines.push("  Collections:".to_string());
	for entry in &config.collections {
		let ordering = if entry.spec.ordering.is_empty() {
			"server default"
		} else {
			entry.spec.ordering.as_str()
		};
		lines.push(format!(
			"    {} -> {} (ordering: {ordering})",
			entry.name, entry.spec.endpoint
		));
	}
	lines
}
