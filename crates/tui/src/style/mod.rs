//! Colour schemes for the picker.

mod theme;

pub use theme::{Theme, by_name, names};
