//! Authentication state shared by everything that talks to the service.
//!
//! A session is constructed explicitly and handed to the
//! [`ApiClient`](crate::ApiClient). Its lifecycle is `new -> hydrate -> login / refresh ->
//! logout`; tokens are persisted through a [`TokenStore`] on every change.

use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use parking_lot::{Mutex, RwLock};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::RemoteError;

/// Access/refresh token pair issued by the service.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthTokens {
	pub access: String,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub refresh: Option<String>,
}

impl AuthTokens {
	pub fn new(access: impl Into<String>, refresh: Option<String>) -> Self {
		Self {
			access: access.into(),
			refresh,
		}
	}
}

/// Persistence backend for [`AuthTokens`].
pub trait TokenStore: Send + Sync {
	fn load(&self) -> Result<Option<AuthTokens>, RemoteError>;
	fn save(&self, tokens: &AuthTokens) -> Result<(), RemoteError>;
	fn clear(&self) -> Result<(), RemoteError>;
}

/// Stores tokens as JSON in a single file.
#[derive(Debug, Clone)]
pub struct FileTokenStore {
	path: PathBuf,
}

impl FileTokenStore {
	pub fn new(path: impl Into<PathBuf>) -> Self {
		Self { path: path.into() }
	}

	#[must_use]
	pub fn path(&self) -> &Path {
		&self.path
	}

	fn io_error(&self, source: std::io::Error) -> RemoteError {
		RemoteError::Store {
			path: self.path.clone(),
			source,
		}
	}
}

impl TokenStore for FileTokenStore {
	fn load(&self) -> Result<Option<AuthTokens>, RemoteError> {
		let raw = match fs::read_to_string(&self.path) {
			Ok(raw) => raw,
			Err(err) if err.kind() == ErrorKind::NotFound => return Ok(None),
			Err(err) => return Err(self.io_error(err)),
		};
		Ok(Some(serde_json::from_str(&raw)?))
	}

	fn save(&self, tokens: &AuthTokens) -> Result<(), RemoteError> {
		if let Some(parent) = self.path.parent() {
			fs::create_dir_all(parent).map_err(|err| self.io_error(err))?;
		}
		let body = serde_json::to_string_pretty(tokens)?;
		fs::write(&self.path, body).map_err(|err| self.io_error(err))
	}

	fn clear(&self) -> Result<(), RemoteError> {
		match fs::remove_file(&self.path) {
			Ok(()) => Ok(()),
			Err(err) if err.kind() == ErrorKind::NotFound => Ok(()),
			Err(err) => Err(self.io_error(err)),
		}
	}
}

/// Keeps tokens for the lifetime of the process only.
#[derive(Debug, Default)]
pub struct MemoryTokenStore {
	tokens: Mutex<Option<AuthTokens>>,
}

impl TokenStore for MemoryTokenStore {
	fn load(&self) -> Result<Option<AuthTokens>, RemoteError> {
		Ok(self.tokens.lock().clone())
	}

	fn save(&self, tokens: &AuthTokens) -> Result<(), RemoteError> {
		*self.tokens.lock() = Some(tokens.clone());
		Ok(())
	}

	fn clear(&self) -> Result<(), RemoteError> {
		*self.tokens.lock() = None;
		Ok(())
	}
}

/// Current credentials plus the store they are persisted to.
pub struct AuthSession {
	store: Box<dyn TokenStore>,
	tokens: RwLock<Option<AuthTokens>>,
}

impl AuthSession {
	/// Create an empty session; call [`AuthSession::hydrate`] to pick up stored tokens.
	pub fn new(store: impl TokenStore + 'static) -> Self {
		Self {
			store: Box::new(store),
			tokens: RwLock::new(None),
		}
	}

	pub fn in_memory() -> Self {
		Self::new(MemoryTokenStore::default())
	}

	/// Load tokens from the store. Returns whether a session was found.
	pub fn hydrate(&self) -> Result<bool, RemoteError> {
		let tokens = self.store.load()?;
		let found = tokens.is_some();
		*self.tokens.write() = tokens;
		debug!(found, "hydrated auth session");
		Ok(found)
	}

	#[must_use]
	pub fn is_authenticated(&self) -> bool {
		self.tokens.read().is_some()
	}

	#[must_use]
	pub fn access_token(&self) -> Option<String> {
		self.tokens.read().as_ref().map(|tokens| tokens.access.clone())
	}

	#[must_use]
	pub fn refresh_token(&self) -> Option<String> {
		self.tokens
			.read()
			.as_ref()
			.and_then(|tokens| tokens.refresh.clone())
	}

	/// Replace the session with a freshly issued token pair.
	pub fn login(&self, tokens: AuthTokens) -> Result<(), RemoteError> {
		self.store.save(&tokens)?;
		*self.tokens.write() = Some(tokens);
		Ok(())
	}

	/// Swap in a new access token, keeping the refresh token.
	pub fn refresh_access(&self, access: impl Into<String>) -> Result<(), RemoteError> {
		let mut guard = self.tokens.write();
		let tokens = guard.as_mut().ok_or(RemoteError::NotLoggedIn)?;
		tokens.access = access.into();
		self.store.save(tokens)
	}

	pub fn logout(&self) -> Result<(), RemoteError> {
		*self.tokens.write() = None;
		self.store.clear()
	}
}

impl std::fmt::Debug for AuthSession {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.debug_struct("AuthSession")
			.field("authenticated", &self.is_authenticated())
			.finish_non_exhaustive()
	}
}
