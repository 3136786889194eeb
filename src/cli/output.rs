use anyhow::Result;
use selettore_tui::PickOutcome;
use serde_json::json;

use crate::settings::CollectionEntry;

/// Print a plain-text representation of the pick outcome.
pub(crate) fn print_plain(outcome: &PickOutcome) {
	println!("{}", format_outcome_plain(outcome));
}

fn format_outcome_plain(outcome: &PickOutcome) -> String {
	if !outcome.accepted {
		return format!("Selection cancelled (query: '{}')", outcome.query);
	}

	match &outcome.selection {
		Some(candidate) => format!("{}\t{}", candidate.id, candidate.display_text()),
		None => "No selection".to_string(),
	}
}

/// Format the pick outcome as a JSON string.
pub(crate) fn format_outcome_json(outcome: &PickOutcome) -> Result<String> {
	let payload = json!({
		"accepted": outcome.accepted,
		"query": outcome.query,
		"selection": outcome.selection,
	});

	Ok(serde_json::to_string_pretty(&payload)?)
}

/// Print the JSON representation of the pick outcome.
pub(crate) fn print_json(outcome: &PickOutcome) -> Result<()> {
	println!("{}", format_outcome_json(outcome)?);
	Ok(())
}

/// Print one line per collection: name, field label and endpoint.
pub(crate) fn print_collections(entries: &[CollectionEntry]) {
	let width = entries
		.iter()
		.map(|entry| entry.name.len())
		.max()
		.unwrap_or(0);
	for entry in entries {
		println!(
			"{:width$}  {:<20}  {}",
			entry.name, entry.title, entry.spec.endpoint
		);
	}
}
