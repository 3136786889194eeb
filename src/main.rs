mod app_dirs;
mod cli;
mod logging;
mod settings;
mod workflow;

use anyhow::Result;
use cli::{Command, OutputFormat, PickArgs, parse_cli, print_collections, print_json, print_plain};
use settings::ResolvedConfig;
use tracing::debug;
use workflow::PickWorkflow;

fn main() -> Result<()> {
	let cli = parse_cli();

	if cli.list_themes {
		for name in selettore_tui::style::names() {
			println!("{name}");
		}
		return Ok(());
	}

	let resolved = settings::load(&cli)?;

	if cli.print_config {
		resolved.print_summary();
		return Ok(());
	}

	let log_file = logging::initialize()?;
	debug!(log_file = %log_file.display(), "logging initialised");

	match cli.command() {
		Command::Pick(args) => run_pick(&resolved, &args),
		Command::Login(args) => workflow::login(&resolved, &args),
		Command::Logout => workflow::logout(&resolved),
		Command::Collections => {
			print_collections(&resolved.collections);
			Ok(())
		}
	}
}

/// Execute the pick workflow and print output in the chosen format.
fn run_pick(settings: &ResolvedConfig, args: &PickArgs) -> Result<()> {
	let workflow = PickWorkflow::from_config(settings, args)?;
	let outcome = workflow.run()?;

	match args.output {
		OutputFormat::Plain => print_plain(&outcome),
		OutputFormat::Json => print_json(&outcome)?,
	}

	Ok(())
}
