use chrono::Local;
use serde::{Deserialize, Serialize};
use std::collections::VecDeque;
use std::sync::{Arc, Mutex};
use tracing::{debug, error, info, warn, Level};

pub const DEFAULT_CAPACITY: usize = 100;

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct LogEntry {
    pub time: String,
    pub level: String,
    pub source: String,
    pub message: String,
}

/// Bounded, shareable record of recent server activity.
/// Every entry is also emitted as a `tracing` event.
#[derive(Clone)]
pub struct ActivityLog {
    entries: Arc<Mutex<VecDeque<LogEntry>>>,
    capacity: usize,
}

impl ActivityLog {
    pub fn new() -> Self {
        Self::with_capacity(DEFAULT_CAPACITY)
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            entries: Arc::new(Mutex::new(VecDeque::with_capacity(capacity))),
            capacity: capacity.max(1),
        }
    }

    pub fn record(&self, level: Level, source: &str, message: &str) -> LogEntry {
        match level {
            Level::ERROR => error!(source, "{}", message),
            Level::WARN => warn!(source, "{}", message),
            Level::INFO => info!(source, "{}", message),
            _ => debug!(source, "{}", message),
        }

        let entry = LogEntry {
            time: Local::now().format("%H:%M:%S").to_string(),
            level: level.to_string(),
            source: source.to_string(),
            message: message.to_string(),
        };

        // A poisoned lock only means another writer panicked mid-push
        let mut entries = self.entries.lock().unwrap_or_else(|p| p.into_inner());
        entries.push_back(entry.clone());
        while entries.len() > self.capacity {
            entries.pop_front();
        }
        entry
    }

    pub fn info(&self, source: &str, message: &str) {
        self.record(Level::INFO, source, message);
    }

    pub fn warn(&self, source: &str, message: &str) {
        self.record(Level::WARN, source, message);
    }

    pub fn error(&self, source: &str, message: &str) {
        self.record(Level::ERROR, source, message);
    }

    pub fn entries(&self) -> Vec<LogEntry> {
        let entries = self.entries.lock().unwrap_or_else(|p| p.into_inner());
        entries.iter().cloned().collect()
    }
}

impl Default for ActivityLog {
    fn default() -> Self {
        Self::new()
    }
}
