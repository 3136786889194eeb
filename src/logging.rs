//! Tracing setup for the binary.
//!
//! The terminal belongs to the picker while it runs, so events go to a log
//! file in the cache directory instead of stderr.

use std::fs::{self, OpenOptions};
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use anyhow::{Context, Result, anyhow};
use tracing_subscriber::EnvFilter;

use crate::app_dirs;

/// Environment variable holding the `EnvFilter` directives.
pub const LOG_ENV: &str = "SELETTORE_LOG";

const DEFAULT_DIRECTIVES: &str = "warn";

/// Install the global subscriber. Returns the file events are written to.
pub fn initialize() -> Result<PathBuf> {
	let path = app_dirs::log_file()?;
	install(&path, env_filter())?;
	Ok(path)
}

fn env_filter() -> EnvFilter {
	EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new(DEFAULT_DIRECTIVES))
}

fn install(path: &Path, filter: EnvFilter) -> Result<()> {
	if let Some(parent) = path.parent() {
		fs::create_dir_all(parent)
			.with_context(|| format!("failed to create log directory {}", parent.display()))?;
	}
	let file = OpenOptions::new()
		.create(true)
		.append(true)
		.open(path)
		.with_context(|| format!("failed to open log file {}", path.display()))?;

	tracing_subscriber::fmt()
		.with_env_filter(filter)
		.with_writer(Mutex::new(file))
		.with_ansi(false)
		.with_thread_names(true)
		.try_init()
		.map_err(|err| anyhow!("failed to install log subscriber: {err}"))
}
