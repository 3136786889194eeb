//! Resolve configuration, cache, and data directories for `selettore`.
//!
//! The helpers in this module respect environment overrides while falling back
//! to platform-appropriate locations provided by the `directories` crate.

use std::env;
use std::path::PathBuf;

use anyhow::{Result, anyhow};
use directories::ProjectDirs;

const QUALIFIER: &str = "io";
const ORGANIZATION: &str = "selettore";
const APPLICATION: &str = "selettore";

const CONFIG_DIR_ENV: &str = "SELETTORE_CONFIG_DIR";
const DATA_DIR_ENV: &str = "SELETTORE_DATA_DIR";
const CACHE_DIR_ENV: &str = "SELETTORE_CACHE_DIR";

const TOKENS_FILE: &str = "tokens.json";
const LOG_FILE: &str = "selettore.log";

fn project_dirs() -> Result<ProjectDirs> {
	ProjectDirs::from(QUALIFIER, ORGANIZATION, APPLICATION)
		.ok_or_else(|| anyhow!("unable to determine project directories for selettore"))
}

/// Resolve an override directory from an environment variable.
///
/// An empty string is treated the same as an unset value.
fn dir_from_env(name: &str) -> Option<PathBuf> {
	let value = env::var_os(name)?;
	if value.is_empty() {
		None
	} else {
		Some(PathBuf::from(value))
	}
}

/// Return the configuration directory holding `config.toml`.
pub fn get_config_dir() -> Result<PathBuf> {
	if let Some(dir) = dir_from_env(CONFIG_DIR_ENV) {
		return Ok(dir);
	}

	Ok(project_dirs()?.config_local_dir().to_path_buf())
}

/// Return the data directory that stores the authentication tokens.
pub fn get_data_dir() -> Result<PathBuf> {
	if let Some(dir) = dir_from_env(DATA_DIR_ENV) {
		return Ok(dir);
	}

	Ok(project_dirs()?.data_local_dir().to_path_buf())
}

/// Return the cache directory for the log file.
pub fn get_cache_dir() -> Result<PathBuf> {
	if let Some(dir) = dir_from_env(CACHE_DIR_ENV) {
		return Ok(dir);
	}

	Ok(project_dirs()?.cache_dir().to_path_buf())
}

pub fn tokens_file() -> Result<PathBuf> {
	Ok(get_data_dir()?.join(TOKENS_FILE))
}

pub fn log_file() -> Result<PathBuf> {
	Ok(get_cache_dir()?.join(LOG_FILE))
}
