//! Interactive terminal front end for one searchable selector field.
//!
//! The crate renders a labelled input bound to a [`selettore_core::Selector`],
//! the result panel underneath it, and runs the event loop that feeds key
//! presses, mouse clicks and the clock into the selector.

mod app;
pub mod input;
mod outcome;
mod runtime;
pub mod style;

pub use app::App;
pub use input::QueryInput;
pub use outcome::PickOutcome;
pub use runtime::run;
pub use style::Theme;
