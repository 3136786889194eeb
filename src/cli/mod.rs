mod args;
mod output;

pub(crate) use args::{CliArgs, Command, LoginArgs, OutputFormat, PickArgs, parse_cli};
pub(crate) use output::{print_collections, print_json, print_plain};
