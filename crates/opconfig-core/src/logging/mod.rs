//! Logging abstractions for the secrets loader
//!
//! The loader reports progress through an injected [`Logger`]; the HTTP
//! client additionally traces requests to the process-wide file logger.

mod traits;
mod noop;
mod console;
mod memory;
pub mod file_logger;

pub use traits::{Logger, SharedLogger};
pub use noop::NoOpLogger;
pub use console::ConsoleLogger;
pub use memory::{MemoryLogger, LogEntry};

pub use file_logger::LogLevel;
