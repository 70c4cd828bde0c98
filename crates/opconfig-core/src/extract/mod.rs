//! Turning vault items into configuration
//!
//! - `fields`: flat `title:label` secrets from an item's fields
//! - `embedded`: fenced JSON blocks in notes parsed into config layers

mod fields;
mod embedded;

pub use fields::{extract_secrets, secret_key, SecretMap, ExtractError, ExtractResult};
pub use embedded::{
    is_fenced_json, parse_fenced_json, EmbeddedConfigError,
    JSON_FENCE_OPEN, JSON_FENCE_CLOSE,
};
