use std::fs;
use std::io::{self, BufRead};
use std::path::Path;
use std::sync::Arc;

use anyhow::{Context, Result, bail};
use selettore_core::{Candidate, FixedList, MatchField, Selector, SelectorConfig};
use selettore_remote::{ApiClient, AuthSession, FileTokenStore, RemoteSearch};
use selettore_tui::{App, PickOutcome, Theme};
use tracing::{info, warn};

use crate::app_dirs;
use crate::cli::{LoginArgs, PickArgs};
use crate::settings::{CollectionEntry, ResolvedConfig};

/// Coordinates building and running the interactive picker.
pub(crate) struct PickWorkflow {
	app: App<'static>,
}

impl PickWorkflow {
	pub(crate) fn from_config(config: &ResolvedConfig, args: &PickArgs) -> Result<Self> {
		let (selector, default_label) = match &args.list {
			Some(path) => {
				let fields = args.match_fields.iter().copied().map(MatchField::from);
				let list = load_fixed_list(path)?.with_fields(fields);
				info!(
					path = %path.display(),
					items = list.len(),
					fields = ?list.fields(),
					"picking from fixed list"
				);
				(Selector::fixed(list), "Selection".to_string())
			}
			None => {
				let entry = config.collection(&config.search.collection)?;
				info!(collection = %entry.name, endpoint = %entry.spec.endpoint, "picking from remote collection");
				(remote_selector(config, entry)?, entry.title.clone())
			}
		};

		let theme = config
			.ui
			.theme
			.as_deref()
			.and_then(selettore_tui::style::by_name)
			.unwrap_or_default();

		let mut app = App::new(selector)
			.with_theme(theme)
			.with_label(config.ui.label.clone().unwrap_or(default_label))
			.with_placeholder(config.ui.placeholder.clone());
		if let Some(title) = &config.ui.title {
			app = app.with_title(title.clone());
		}
		Ok(Self { app })
	}

	pub(crate) fn run(self) -> Result<PickOutcome> {
		selettore_tui::run(self.app)
	}
}

/// Read a JSON array of candidates for a fixed-list picker.
pub(crate) fn load_fixed_list(path: &Path) -> Result<FixedList> {
	let contents = fs::read_to_string(path)
		.with_context(|| format!("failed to read candidate list {}", path.display()))?;
	let items: Vec<Candidate> = serde_json::from_str(&contents)
		.with_context(|| format!("{} is not a JSON array of candidates", path.display()))?;
	Ok(FixedList::new(items))
}

fn remote_selector(config: &ResolvedConfig, entry: &CollectionEntry) -> Result<Selector> {
	let client = api_client(config)?;
	if !client.session().is_authenticated() {
		warn!("no stored credentials, searching anonymously");
	}
	let source = RemoteSearch::new(Arc::new(client), entry.spec.clone());
	let selector_config = SelectorConfig {
		debounce: config.search.debounce,
		page_size: config.search.page_size,
		ordering: entry.spec.ordering.clone(),
	};
	Ok(Selector::remote(Arc::new(source), selector_config))
}

/// Session backed by the token file in the data directory, already hydrated.
fn open_session() -> Result<Arc<AuthSession>> {
	let session = AuthSession::new(FileTokenStore::new(app_dirs::tokens_file()?));
	session
		.hydrate()
		.context("failed to read stored credentials")?;
	Ok(Arc::new(session))
}

fn api_client(config: &ResolvedConfig) -> Result<ApiClient> {
	let session = open_session()?;
	ApiClient::new(&config.server.base_url, session, config.server.timeout)
		.context("failed to build the HTTP client")
}

pub(crate) fn login(config: &ResolvedConfig, args: &LoginArgs) -> Result<()> {
	let password = match &args.password {
		Some(password) => password.clone(),
		None => read_password()?,
	};
	let client = api_client(config)?;
	client
		.login(&args.username, &password)
		.with_context(|| format!("login to {} failed", client.base_url()))?;
	println!("Logged in to {} as {}", client.base_url(), args.username);
	Ok(())
}

pub(crate) fn logout(config: &ResolvedConfig) -> Result<()> {
	let client = api_client(config)?;
	client.logout().context("failed to clear stored credentials")?;
	println!("Logged out");
	Ok(())
}

fn read_password() -> Result<String> {
	eprint!("Password: ");
	let mut line = String::new();
	io::stdin()
		.lock()
		.read_line(&mut line)
		.context("failed to read password from standard input")?;
	let password = line.trim_end_matches(['\r', '\n']).to_string();
	if password.is_empty() {
		bail!("empty password");
	}
	Ok(password)
}
