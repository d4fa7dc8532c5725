//! Console reporter for hook messages
//!
//! Every line is indented by four spaces so the hook's output stands out
//! inside the host build log.

use chcp_core::Reporter;
use owo_colors::OwoColorize;
use std::cell::RefCell;
use std::io::{self, IsTerminal, Stdout, Write};

const PREFIX: &str = "    ";

/// Prints hook messages to a writer, stdout by default
pub struct ConsoleReporter<W: Write = Stdout> {
    out: RefCell<W>,
    color: bool,
}

impl ConsoleReporter<Stdout> {
    /// Reporter on stdout, colored when stdout is a terminal
    pub fn stdout() -> Self {
        let out = io::stdout();
        let color = out.is_terminal();
        Self::new(out, color)
    }
}

impl<W: Write> ConsoleReporter<W> {
    /// Reporter on `out`, colored when `color` is set
    pub fn new(out: W, color: bool) -> Self {
        Self {
            out: RefCell::new(out),
            color,
        }
    }

    /// Give back the underlying writer
    pub fn into_inner(self) -> W {
        self.out.into_inner()
    }

    // Output failures are ignored: reporting must never abort the build
    fn line(&self, text: &str) {
        let mut out = self.out.borrow_mut();
        if text.is_empty() {
            let _ = writeln!(out, "{PREFIX}");
        }
        for line in text.lines() {
            let _ = writeln!(out, "{PREFIX}{line}");
        }
        let _ = out.flush();
    }
}

impl<W: Write> Reporter for ConsoleReporter<W> {
    fn header(&self, title: &str) {
        let title = format!("======== {title} ========");
        if self.color {
            self.line(&title.bold().cyan().to_string());
        } else {
            self.line(&title);
        }
    }

    fn info(&self, message: &str) {
        self.line(message);
    }

    fn warn(&self, message: &str) {
        if self.color {
            self.line(&format!("{} {message}", "WARNING:".yellow().bold()));
        } else {
            self.line(&format!("WARNING: {message}"));
        }
    }

    fn error(&self, message: &str) {
        if self.color {
            self.line(&format!("{} {message}", "ERROR:".red().bold()));
        } else {
            self.line(&format!("ERROR: {message}"));
        }
    }
}
