//! Vault access
//!
//! - `VaultSource`: the two calls the loader needs (list by tag, get detail)
//! - `ConnectClient`: 1Password Connect REST API over HTTP
//! - `MemoryVault`: in-process items, for tests and offline hosts

mod traits;
mod connect;
mod memory;

pub use traits::{VaultSource, VaultError, VaultResult};
pub use connect::ConnectClient;
pub use memory::MemoryVault;
