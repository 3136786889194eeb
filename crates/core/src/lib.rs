//! Headless core of a searchable record selector.
//!
//! A [`Selector`] resolves free-text input into one [`Candidate`] picked from
//! either a small [`FixedList`] or a remote [`SearchSource`]. Remote searches
//! are debounced, run on worker threads and tagged with request tokens so that
//! only the most recently issued search can update what the user sees.

mod candidate;
mod debounce;
mod error;
mod filter;
mod request;
mod response;
mod runtime;
mod selector;
mod source;

pub use candidate::{Candidate, CandidateId, SelectionChange};
pub use debounce::Debouncer;
pub use error::SearchError;
pub use filter::{FixedList, MatchField};
pub use request::{DEFAULT_DEBOUNCE, DEFAULT_PAGE_SIZE, SearchRequest};
pub use response::SearchResponse;
pub use selector::{PanelStatus, PanelView, Selector, SelectorConfig};
pub use source::{CandidateSource, SearchSource};
