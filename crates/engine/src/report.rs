//! Reporter that keeps messages in memory
//!
//! Used when the hook runs embedded in another tool, and by tests to check
//! exactly what the hook said.

use chcp_core::Reporter;
use serde::Serialize;
use std::cell::RefCell;

/// Severity of a reported message
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Level {
    /// Banner line
    Header,
    /// Informational message
    Info,
    /// Warning
    Warn,
    /// Error
    Error,
}

/// One reported message
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Message {
    /// Severity
    pub level: Level,
    /// Message text without the console prefix
    pub text: String,
}

/// Collects every message instead of printing it
#[derive(Debug, Default)]
pub struct RecordingReporter {
    messages: RefCell<Vec<Message>>,
}

impl RecordingReporter {
    /// Empty reporter
    pub fn new() -> Self {
        Self::default()
    }

    /// All messages in the order they were reported
    pub fn messages(&self) -> Vec<Message> {
        self.messages.borrow().clone()
    }

    /// Messages of one severity
    pub fn at(&self, level: Level) -> Vec<String> {
        self.messages
            .borrow()
            .iter()
            .filter(|m| m.level == level)
            .map(|m| m.text.clone())
            .collect()
    }

    fn push(&self, level: Level, text: &str) {
        self.messages.borrow_mut().push(Message {
            level,
            text: text.to_string(),
        });
    }
}

impl Reporter for RecordingReporter {
    fn header(&self, title: &str) {
        self.push(Level::Header, title);
    }

    fn info(&self, message: &str) {
        self.push(Level::Info, message);
    }

    fn warn(&self, message: &str) {
        self.push(Level::Warn, message);
    }

    fn error(&self, message: &str) {
        self.push(Level::Error, message);
    }
}
