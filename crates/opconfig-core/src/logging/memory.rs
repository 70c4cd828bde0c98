//! In-memory logger that records every entry

use parking_lot::Mutex;

use super::file_logger::LogLevel;
use super::traits::Logger;

/// One recorded log line
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogEntry {
    pub level: LogLevel,
    pub message: String,
}

/// Logger that keeps entries in memory
///
/// Hosts that buffer startup logs until their real logging is wired can
/// drain it later; tests use it to assert on warnings.
#[derive(Debug, Default)]
pub struct MemoryLogger {
    entries: Mutex<Vec<LogEntry>>,
}

impl MemoryLogger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of all entries recorded so far
    pub fn entries(&self) -> Vec<LogEntry> {
        self.entries.lock().clone()
    }

    /// Messages recorded at exactly `level`
    pub fn messages_at(&self, level: LogLevel) -> Vec<String> {
        self.entries
            .lock()
            .iter()
            .filter(|e| e.level == level)
            .map(|e| e.message.clone())
            .collect()
    }

    /// Remove and return all entries
    pub fn drain(&self) -> Vec<LogEntry> {
        std::mem::take(&mut *self.entries.lock())
    }

    fn push(&self, level: LogLevel, message: &str) {
        self.entries.lock().push(LogEntry {
            level,
            message: message.to_string(),
        });
    }
}

impl Logger for MemoryLogger {
    fn debug(&self, message: &str) {
        self.push(LogLevel::Debug, message);
    }

    fn info(&self, message: &str) {
        self.push(LogLevel::Info, message);
    }

    fn warn(&self, message: &str) {
        self.push(LogLevel::Warn, message);
    }

    fn error(&self, message: &str) {
        self.push(LogLevel::Error, message);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_memory_logger_records_levels() {
        let logger = MemoryLogger::new();
        logger.debug("d");
        logger.warn("w1");
        logger.warn("w2");

        assert_eq!(logger.entries().len(), 3);
        assert_eq!(logger.messages_at(LogLevel::Warn), vec!["w1", "w2"]);
        assert!(logger.messages_at(LogLevel::Error).is_empty());
    }

    #[test]
    fn test_memory_logger_drain() {
        let logger = MemoryLogger::new();
        logger.info("hello");

        let drained = logger.drain();
        assert_eq!(drained.len(), 1);
        assert_eq!(drained[0].level, LogLevel::Info);
        assert!(logger.entries().is_empty());
    }
}
