//! REST collaborator for `selettore`.
//!
//! [`RemoteSearch`] plugs a records-management collection into the core
//! selector. Requests go through an [`ApiClient`] that carries an explicitly
//! constructed [`AuthSession`] instead of any process-wide token state.

mod client;
mod collection;
mod error;
mod mapping;
mod session;
mod source;
#[cfg(test)]
mod stub;

pub use client::{ApiClient, DEFAULT_TIMEOUT};
pub use collection::{Collection, CollectionSpec};
pub use error::RemoteError;
pub use mapping::CandidateMapping;
pub use session::{AuthSession, AuthTokens, FileTokenStore, MemoryTokenStore, TokenStore};
pub use source::RemoteSearch;
