use std::path::PathBuf;

use clap::{ArgAction, Args, ColorChoice, Parser, Subcommand};

use super::options::{MatchFieldArg, OutputFormat};
use super::styles::{cli_styles, long_version};

/// Command-line arguments accepted by the `selettore` binary.
#[derive(Parser, Debug)]
#[command(
	name = "selettore",
	version,
	long_version = long_version(),
	about = "Pick a record from a remote collection with debounced search",
	color = ColorChoice::Auto,
	styles = cli_styles()
)]
pub(crate) struct CliArgs {
	#[arg(
		short,
		long = "config",
		value_name = "FILE",
		env = "SELETTORE_CONFIG",
		action = ArgAction::Append,
		global = true,
		help = "Additional configuration file to merge (default: none)"
	)]
	pub(crate) config: Vec<PathBuf>,
	#[arg(
		short = 'n',
		long = "no-config",
		global = true,
		help = "Skip loading default configuration files (default: disabled)"
	)]
	pub(crate) no_config: bool,
	#[arg(
		long = "base-url",
		value_name = "URL",
		global = true,
		help = "Root of the REST API (default: http://localhost:8000/api/)"
	)]
	pub(crate) base_url: Option<String>,
	#[arg(
		long = "timeout",
		value_name = "SECONDS",
		global = true,
		help = "Per-request timeout in seconds (default: 15)"
	)]
	pub(crate) timeout_secs: Option<u64>,
	#[arg(
		long = "debounce-ms",
		value_name = "MILLIS",
		global = true,
		help = "Quiet period before a typed query is searched (default: 300)"
	)]
	pub(crate) debounce_ms: Option<u64>,
	#[arg(
		long = "page-size",
		value_name = "COUNT",
		global = true,
		help = "Number of candidates requested per search (default: 20)"
	)]
	pub(crate) page_size: Option<usize>,
	#[arg(
		long,
		value_name = "THEME",
		global = true,
		help = "Select a theme by name (default: dark)"
	)]
	pub(crate) theme: Option<String>,
	#[arg(
		long = "print-config",
		help = "Print the effective configuration and exit (default: disabled)"
	)]
	pub(crate) print_config: bool,
	#[arg(long = "list-themes", help = "List the available themes and exit")]
	pub(crate) list_themes: bool,
	#[command(subcommand)]
	pub(crate) command: Option<Command>,
}

impl CliArgs {
	/// Subcommand to run; a bare invocation picks.
	pub(crate) fn command(&self) -> Command {
		self.command
			.clone()
			.unwrap_or_else(|| Command::Pick(PickArgs::default()))
	}

	pub(crate) fn pick_args(&self) -> Option<&PickArgs> {
		match &self.command {
			Some(Command::Pick(args)) => Some(args),
			_ => None,
		}
	}
}

#[derive(Subcommand, Debug, Clone)]
pub(crate) enum Command {
	/// Open the picker and print the chosen record.
	Pick(PickArgs),
	/// Obtain a token pair and store it for later searches.
	Login(LoginArgs),
	/// Forget the stored tokens.
	Logout,
	/// List the collections that can be picked from.
	Collections,
}

#[derive(Args, Debug, Clone, Default)]
pub(crate) struct PickArgs {
	#[arg(
		value_name = "COLLECTION",
		help = "Remote collection to search (default: anagrafiche)"
	)]
	pub(crate) collection: Option<String>,
	#[arg(
		short,
		long,
		value_name = "FILE",
		conflicts_with = "collection",
		help = "Pick from a JSON array of candidates instead of a remote collection"
	)]
	pub(crate) list: Option<PathBuf>,
	#[arg(
		long = "match",
		value_enum,
		value_delimiter = ',',
		requires = "list",
		help = "Fields a --list file is filtered on (default: code,label)"
	)]
	pub(crate) match_fields: Vec<MatchFieldArg>,
	#[arg(
		short = 't',
		long,
		value_name = "TITLE",
		help = "Form title shown above the field (default: none)"
	)]
	pub(crate) title: Option<String>,
	#[arg(
		long,
		value_name = "TEXT",
		help = "Label of the field (default: collection title)"
	)]
	pub(crate) label: Option<String>,
	#[arg(
		long,
		value_name = "TEXT",
		help = "Placeholder shown while the input is empty (default: Cerca...)"
	)]
	pub(crate) placeholder: Option<String>,
	#[arg(
		short,
		long,
		value_enum,
		default_value_t = OutputFormat::Plain,
		help = "Format of the printed outcome"
	)]
	pub(crate) output: OutputFormat,
}

#[derive(Args, Debug, Clone)]
pub(crate) struct LoginArgs {
	#[arg(
		short,
		long,
		env = "SELETTORE_USERNAME",
		help = "Account to log in as"
	)]
	pub(crate) username: String,
	#[arg(
		long,
		env = "SELETTORE_PASSWORD",
		hide_env_values = true,
		help = "Password (default: read from standard input)"
	)]
	pub(crate) password: Option<String>,
}
