//! Configuration loading and resolution.
//!
//! `load` layers default files, `--config` files, `SELETTORE__*` environment
//! variables and CLI flags, then validates the result into a
//! [`ResolvedConfig`].

mod loader;
mod raw;
mod resolved;

pub(crate) use loader::load;
pub(crate) use resolved::{CollectionEntry, ResolvedConfig};
