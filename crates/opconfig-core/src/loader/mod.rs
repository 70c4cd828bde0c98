//! The secrets loading pipeline
//!
//! List tagged items, fetch each item's detail, extract `title:label`
//! secrets and fenced JSON notes, merge everything into a `ConfigStore`.

mod error;
mod secrets_loader;

pub use error::{LoadError, LoadResult};
pub use secrets_loader::{SecretsLoader, LoadRequest, LoadSummary};
