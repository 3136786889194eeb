use std::sync::Arc;
use std::time::Duration;

use parking_lot::Mutex;
use reqwest::StatusCode;
use reqwest::blocking::{Client, Response};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{debug, info, warn};
use url::Url;

use crate::error::RemoteError;
use crate::session::{AuthSession, AuthTokens};

pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(15);

const TOKEN_PATH: &str = "token/";
const REFRESH_PATH: &str = "token/refresh/";
const MAX_ERROR_BODY: usize = 200;

#[derive(Serialize)]
struct Credentials<'a> {
	username: &'a str,
	password: &'a str,
}

#[derive(Serialize)]
struct RefreshRequest<'a> {
	refresh: &'a str,
}

#[derive(Deserialize)]
struct TokenResponse {
	access: String,
	#[serde(default)]
	refresh: Option<String>,
}

/// Blocking REST client bound to one API root and one [`AuthSession`].
#[derive(Debug, Clone)]
pub struct ApiClient {
	http: Client,
	base_url: Url,
	session: Arc<AuthSession>,
	/// Held for the whole refresh exchange so concurrent 401s post the
	/// refresh token once.
	refresh_lock: Arc<Mutex<()>>,
}

impl ApiClient {
	pub fn new(
		base_url: &str,
		session: Arc<AuthSession>,
		timeout: Duration,
	) -> Result<Self, RemoteError> {
		let mut normalized = base_url.trim().to_string();
		if !normalized.ends_with('/') {
			normalized.push('/');
		}
		let base_url = Url::parse(&normalized).map_err(|source| RemoteError::InvalidUrl {
			url: base_url.to_string(),
			source,
		})?;

		let http = Client::builder()
			.timeout(timeout)
			.user_agent(concat!("selettore/", env!("CARGO_PKG_VERSION")))
			.build()?;

		Ok(Self {
			http,
			base_url,
			session,
			refresh_lock: Arc::new(Mutex::new(())),
		})
	}

	#[must_use]
	pub fn base_url(&self) -> &Url {
		&self.base_url
	}

	#[must_use]
	pub fn session(&self) -> &Arc<AuthSession> {
		&self.session
	}

	/// Resolve `path` relative to the API root.
	pub fn endpoint(&self, path: &str) -> Result<Url, RemoteError> {
		let path = path.trim_start_matches('/');
		self.base_url
			.join(path)
			.map_err(|source| RemoteError::InvalidUrl {
				url: path.to_string(),
				source,
			})
	}

	/// GET `path` with `query` as URL parameters and decode the JSON body.
	///
	/// A 401 triggers one token refresh and one retry when a refresh token is
	/// available. When another request already replaced the rejected access
	/// token, the retry uses the new one without refreshing again.
	pub fn get_json<Q>(&self, path: &str, query: &Q) -> Result<Value, RemoteError>
	where
		Q: Serialize + ?Sized,
	{
		let url = self.endpoint(path)?;
		let access = self.session.access_token();
		let response = self.send_get(&url, query, access.as_deref())?;
		if response.status() != StatusCode::UNAUTHORIZED {
			return read_json(response);
		}

		if self.session.refresh_token().is_none() {
			return Err(RemoteError::Unauthorized);
		}
		debug!(%url, "access token rejected, refreshing");
		self.refresh_rejected(access.as_deref())?;
		let access = self.session.access_token();
		read_json(self.send_get(&url, query, access.as_deref())?)
	}

	/// Exchange credentials for a token pair and store it in the session.
	pub fn login(&self, username: &str, password: &str) -> Result<(), RemoteError> {
		let url = self.endpoint(TOKEN_PATH)?;
		let response = self
			.http
			.post(url)
			.json(&Credentials { username, password })
			.send()?;
		if response.status() == StatusCode::BAD_REQUEST {
			return Err(RemoteError::Unauthorized);
		}
		let tokens: TokenResponse = serde_json::from_value(read_json(response)?)?;
		self.session
			.login(AuthTokens::new(tokens.access, tokens.refresh))?;
		info!(username, "logged in");
		Ok(())
	}

	/// Obtain a new access token with the stored refresh token.
	///
	/// A rejected refresh token ends the session.
	pub fn refresh(&self) -> Result<(), RemoteError> {
		let _guard = self.refresh_lock.lock();
		self.refresh_locked()
	}

	/// Refresh after `rejected` was refused, unless a concurrent request has
	/// already swapped it for a new access token.
	fn refresh_rejected(&self, rejected: Option<&str>) -> Result<(), RemoteError> {
		let _guard = self.refresh_lock.lock();
		if self.session.access_token().as_deref() != rejected {
			debug!("access token already refreshed");
			return Ok(());
		}
		self.refresh_locked()
	}

	fn refresh_locked(&self) -> Result<(), RemoteError> {
		let refresh = self
			.session
			.refresh_token()
			.ok_or(RemoteError::NotLoggedIn)?;
		let url = self.endpoint(REFRESH_PATH)?;
		let response = self
			.http
			.post(url)
			.json(&RefreshRequest { refresh: &refresh })
			.send()?;

		let tokens: TokenResponse = match read_json(response) {
			Ok(body) => serde_json::from_value(body)?,
			Err(RemoteError::Unauthorized) => {
				if self.session.refresh_token().as_deref() == Some(refresh.as_str()) {
					warn!("refresh token rejected, clearing session");
					self.session.logout()?;
				} else {
					debug!("rejected refresh token was already rotated");
				}
				return Err(RemoteError::Unauthorized);
			}
			Err(err) => return Err(err),
		};

		match tokens.refresh {
			Some(rotated) => self
				.session
				.login(AuthTokens::new(tokens.access, Some(rotated))),
			None => self.session.refresh_access(tokens.access),
		}
	}

	pub fn logout(&self) -> Result<(), RemoteError> {
		self.session.logout()
	}

	fn send_get<Q>(
		&self,
		url: &Url,
		query: &Q,
		access: Option<&str>,
	) -> Result<Response, RemoteError>
	where
		Q: Serialize + ?Sized,
	{
		let mut request = self.http.get(url.clone()).query(query);
		if let Some(token) = access {
			request = request.bearer_auth(token);
		}
		Ok(request.send()?)
	}
}

fn read_json(response: Response) -> Result<Value, RemoteError> {
	let status = response.status();
	if status == StatusCode::UNAUTHORIZED {
		return Err(RemoteError::Unauthorized);
	}
	if !status.is_success() {
		let mut body = response.text().unwrap_or_default();
		if body.len() > MAX_ERROR_BODY {
			let cut = (0..=MAX_ERROR_BODY)
				.rev()
				.find(|index| body.is_char_boundary(*index))
				.unwrap_or(0);
			body.truncate(cut);
		}
		return Err(RemoteError::Status {
			status: status.as_u16(),
			body,
		});
	}
	let body = response.text()?;
	Ok(serde_json::from_str(&body)?)
}

#[cfg(test)]
mod tests {
	use std::sync::Barrier;
	use std::thread;

	use selettore_core::SearchRequest;

	use super::*;
	use crate::stub::StubServer;

	fn client(server: &StubServer, session: AuthSession) -> ApiClient {
		ApiClient::new(server.url(), Arc::new(session), Duration::from_secs(5)).expect("client")
	}

	fn logged_in(access: &str, refresh: Option<&str>) -> AuthSession {
		let session = AuthSession::in_memory();
		session
			.login(AuthTokens::new(access, refresh.map(str::to_string)))
			.expect("login");
		session
	}

	#[test]
	fn get_sends_query_parameters_and_bearer_token() {
		let server = StubServer::serve(vec![(200, r#"[{"id": 1}]"#.into())]);
		let api = client(&server, logged_in("acc-1", None));

		let request = SearchRequest::new("rossi").with_ordering("display_name");
		let body = api.get_json("/anagrafiche/", &request).expect("body");

		assert_eq!(body[0]["id"], 1);
		let seen = server.requests();
		assert!(seen[0].starts_with(
			"GET /api/anagrafiche/?search=rossi&page_size=20&ordering=display_name "
		));
		assert!(seen[0].to_lowercase().contains("authorization: bearer acc-1"));
	}

	#[test]
	fn unauthorized_response_refreshes_once_and_retries() {
		let server = StubServer::serve(vec![
			(401, r#"{"detail": "token expired"}"#.into()),
			(200, r#"{"access": "acc-2"}"#.into()),
			(200, r#"{"results": []}"#.into()),
		]);
		let api = client(&server, logged_in("acc-1", Some("ref-1")));

		let body = api.get_json("titolario/voci/", &SearchRequest::new("")).expect("body");

		assert_eq!(body["results"], serde_json::json!([]));
		assert_eq!(api.session().access_token().as_deref(), Some("acc-2"));
		assert_eq!(api.session().refresh_token().as_deref(), Some("ref-1"));
		let seen = server.requests();
		assert_eq!(seen.len(), 3);
		assert!(seen[1].starts_with("POST /api/token/refresh/ "));
		assert!(seen[1].contains(r#""refresh":"ref-1""#));
		assert!(seen[2].to_lowercase().contains("authorization: bearer acc-2"));
	}

	#[test]
	fn unauthorized_without_refresh_token_fails_immediately() {
		let server = StubServer::serve(vec![(401, "{}".into())]);
		let api = client(&server, logged_in("acc-1", None));

		let err = api.get_json("clienti/", &SearchRequest::new("")).unwrap_err();
		assert!(matches!(err, RemoteError::Unauthorized));
		assert_eq!(server.requests().len(), 1);
	}

	#[test]
	fn rejected_refresh_token_ends_the_session() {
		let server = StubServer::serve(vec![(401, "{}".into()), (401, "{}".into())]);
		let api = client(&server, logged_in("acc-1", Some("ref-1")));

		let err = api.get_json("clienti/", &SearchRequest::new("")).unwrap_err();
		assert!(matches!(err, RemoteError::Unauthorized));
		assert!(!api.session().is_authenticated());
	}

	#[test]
	fn concurrent_unauthorized_requests_share_one_refresh() {
		let server = StubServer::route(vec![
			("bearer acc-1", 401, r#"{"detail": "token expired"}"#.into()),
			("bearer acc-1", 401, r#"{"detail": "token expired"}"#.into()),
			(
				"token/refresh/",
				200,
				r#"{"access": "acc-2", "refresh": "ref-2"}"#.into(),
			),
			("token/refresh/", 401, r#"{"detail": "token blacklisted"}"#.into()),
			("bearer acc-2", 200, "[]".into()),
			("bearer acc-2", 200, "[]".into()),
		]);
		let api = client(&server, logged_in("acc-1", Some("ref-1")));
		let barrier = Arc::new(Barrier::new(2));

		let workers: Vec<_> = (0..2)
			.map(|_| {
				let api = api.clone();
				let barrier = Arc::clone(&barrier);
				thread::spawn(move || {
					barrier.wait();
					api.get_json("clienti/", &SearchRequest::new("")).map(|_| ())
				})
			})
			.collect();
		for worker in workers {
			worker.join().expect("worker").expect("search succeeds");
		}

		let refreshes = server
			.requests()
			.iter()
			.filter(|request| request.starts_with("POST /api/token/refresh/ "))
			.count();
		assert_eq!(refreshes, 1);
		assert!(api.session().is_authenticated());
		assert_eq!(api.session().access_token().as_deref(), Some("acc-2"));
		assert_eq!(api.session().refresh_token().as_deref(), Some("ref-2"));
	}

	#[test]
	fn rejection_of_an_already_replaced_token_skips_the_refresh() {
		let server = StubServer::serve(vec![]);
		let api = client(&server, logged_in("acc-2", Some("ref-2")));

		api.refresh_rejected(Some("acc-1")).expect("nothing to refresh");

		assert!(server.requests().is_empty());
		assert_eq!(api.session().refresh_token().as_deref(), Some("ref-2"));
	}

	#[test]
	fn server_errors_carry_status_and_body() {
		let server = StubServer::serve(vec![(500, "database unavailable".into())]);
		let api = client(&server, AuthSession::in_memory());

		match api.get_json("anagrafiche/", &SearchRequest::new("x")) {
			Err(RemoteError::Status { status, body }) => {
				assert_eq!(status, 500);
				assert_eq!(body, "database unavailable");
			}
			other => panic!("expected status error, got {other:?}"),
		}
	}

	#[test]
	fn login_stores_issued_tokens() {
		let server = StubServer::serve(vec![(200, r#"{"access": "a", "refresh": "r"}"#.into())]);
		let api = client(&server, AuthSession::in_memory());

		api.login("protocollo", "segreto").expect("login");

		assert_eq!(api.session().access_token().as_deref(), Some("a"));
		assert_eq!(api.session().refresh_token().as_deref(), Some("r"));
		let seen = server.requests();
		assert!(seen[0].starts_with("POST /api/token/ "));
		assert!(seen[0].contains(r#""username":"protocollo""#));
	}

	#[test]
	fn rejects_unparseable_base_url() {
		let result = ApiClient::new("not a url", Arc::new(AuthSession::in_memory()), DEFAULT_TIMEOUT);
		assert!(matches!(result, Err(RemoteError::InvalidUrl { .. })));
	}
}
