use std::io;
use std::path::PathBuf;

use selettore_core::SearchError;
use thiserror::Error;

/// Failures of the HTTP collaborator and the session store.
#[derive(Debug, Error)]
pub enum RemoteError {
	#[error("invalid service URL '{url}': {source}")]
	InvalidUrl {
		url: String,
		#[source]
		source: url::ParseError,
	},

	#[error("request failed: {0}")]
	Http(#[from] reqwest::Error),

	#[error("server answered {status}: {body}")]
	Status { status: u16, body: String },

	#[error("credentials were rejected")]
	Unauthorized,

	#[error("not logged in")]
	NotLoggedIn,

	#[error("unexpected response body: {0}")]
	Decode(#[from] serde_json::Error),

	#[error("failed to access token store {path}: {source}")]
	Store {
		path: PathBuf,
		#[source]
		source: io::Error,
	},
}

impl From<RemoteError> for SearchError {
	fn from(error: RemoteError) -> Self {
		match error {
			RemoteError::Status { status, .. } => SearchError::Status { status },
			RemoteError::Unauthorized | RemoteError::NotLoggedIn => SearchError::Unauthorized,
			RemoteError::Decode(err) => SearchError::Decode(err.to_string()),
			RemoteError::Http(err) if err.is_decode() => SearchError::Decode(err.to_string()),
			other => SearchError::Network(other.to_string()),
		}
	}
}
