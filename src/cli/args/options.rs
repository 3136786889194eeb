use clap::ValueEnum;
use selettore_core::MatchField;

/// Output formats supported by the CLI utility.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, ValueEnum)]
pub(crate) enum OutputFormat {
	#[default]
	Plain,
	Json,
}

/// Display fields a `--list` file is filtered on.
#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
pub(crate) enum MatchFieldArg {
	Code,
	Label,
	Description,
}

impl From<MatchFieldArg> for MatchField {
	fn from(value: MatchFieldArg) -> Self {
		match value {
			MatchFieldArg::Code => MatchField::Code,
			MatchFieldArg::Label => MatchField::Label,
			MatchFieldArg::Description => MatchField::Description,
		}
	}
}
