//! Common test utilities

use ork::logger::{LogLevel, Logger};
use std::sync::Mutex;

/// Logger that records messages per level and raw output chunks in order
#[derive(Default)]
pub struct MockLogger {
    level: Mutex<LogLevel>,
    logs: Mutex<Vec<(LogLevel, String)>>,
    outputs: Mutex<Vec<String>>,
}

impl MockLogger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Raw output chunks, in arrival order
    pub fn outputs(&self) -> Vec<String> {
        self.outputs.lock().unwrap().clone()
    }

    /// Messages recorded at the given level
    pub fn logs(&self, level: LogLevel) -> Vec<String> {
        self.logs
            .lock()
            .unwrap()
            .iter()
            .filter(|(l, _)| *l == level)
            .map(|(_, m)| m.clone())
            .collect()
    }

    fn record(&self, level: LogLevel, message: &str) {
        if *self.level.lock().unwrap() >= level {
            self.logs.lock().unwrap().push((level, message.to_string()));
        }
    }
}

impl Logger for MockLogger {
    fn set_level(&self, level: LogLevel) {
        *self.level.lock().unwrap() = level;
    }

    fn level(&self) -> LogLevel {
        *self.level.lock().unwrap()
    }

    fn error(&self, message: &str) {
        self.record(LogLevel::Error, message);
    }

    fn info(&self, message: &str) {
        self.record(LogLevel::Info, message);
    }

    fn debug(&self, message: &str) {
        self.record(LogLevel::Debug, message);
    }

    fn output(&self, text: &str) {
        self.outputs.lock().unwrap().push(text.to_string());
    }
}
