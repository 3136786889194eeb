use std::env;
use std::path::PathBuf;

use anyhow::{Context, Result};
use config::{Config, Environment, File, Map};

use super::raw::RawConfig;
use super::resolved::ResolvedConfig;
use crate::app_dirs;
use crate::cli::CliArgs;

const ENV_PREFIX: &str = "selettore";

/// One configuration file layer. Files named with `--config` must exist.
#[derive(Debug, Clone, PartialEq, Eq)]
struct ConfigFile {
	path: PathBuf,
	required: bool,
}

/// Load configuration by layering config files, `SELETTORE__*` environment
/// variables and CLI flags, in increasing precedence.
pub(crate) fn load(cli: &CliArgs) -> Result<ResolvedConfig> {
	load_with_env(cli, None)
}

/// `env` replaces the process environment when given.
fn load_with_env(cli: &CliArgs, env: Option<Map<String, String>>) -> Result<ResolvedConfig> {
	let files = config_files(cli);
	let mut raw: RawConfig = layer(&files, env)?
		.try_deserialize()
		.context("failed to deserialize configuration")?;
	raw.apply_cli_overrides(cli);

	let mut resolved = raw.resolve(cli)?;
	resolved.files = files
		.into_iter()
		.map(|file| file.path)
		.filter(|path| path.is_file())
		.collect();
	Ok(resolved)
}

fn layer(files: &[ConfigFile], env: Option<Map<String, String>>) -> Result<Config> {
	let mut builder = Config::builder();
	for file in files {
		builder = builder.add_source(File::from(file.path.clone()).required(file.required));
	}
	builder
		.add_source(
			Environment::with_prefix(ENV_PREFIX)
				.separator("__")
				.try_parsing(true)
				.source(env),
		)
		.build()
		.context("failed to read configuration")
}

/// Default locations (unless `--no-config`) followed by every `--config` file.
fn config_files(cli: &CliArgs) -> Vec<ConfigFile> {
	let mut files = Vec::new();
	if !cli.no_config {
		files.extend(default_config_paths().into_iter().map(|path| ConfigFile {
			path,
			required: false,
		}));
	}
	files.extend(cli.config.iter().map(|path| ConfigFile {
		path: path.clone(),
		required: true,
	}));
	files
}

fn default_config_paths() -> Vec<PathBuf> {
	let mut paths = Vec::new();
	if let Ok(dir) = app_dirs::get_config_dir() {
		paths.push(dir.join("config.toml"));
	}
	if let Ok(current_dir) = env::current_dir() {
		paths.push(current_dir.join(".selettore.toml"));
		paths.push(current_dir.join("selettore.toml"));
	}
	paths
}
