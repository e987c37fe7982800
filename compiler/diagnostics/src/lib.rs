//! The diagnostics system.
//!
//! Diagnostics are drawn from a fixed [catalog](Code) of numbered messages.
//! The scanner and parser construct them with [`Diagnostic::new`], fill in
//! template arguments and a location, and append them to the compilation's
//! [`OutputMessageCollection`]; nothing in the front end ever throws over a
//! malformed program.

use span::{FileSpan, Position};
use std::{fmt, rc::Rc};

pub use code::Code;
pub use format::char_literal;

mod code;
mod format;

/// Level of severity of a diagnostic.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Debug, Hash)]
pub enum Severity {
    /// Informational only; never fatal. No catalogued code currently uses it.
    Info,
    /// Gated by warning level and pragma state; may be promoted to an error.
    Warning,
    Error,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Info => "info",
            Self::Warning => "warning",
            Self::Error => "error",
        })
    }
}

/// A diagnostic under construction: a catalogued code plus message arguments
/// and an optional source location.
#[must_use]
#[derive(Clone, PartialEq, Eq, Debug)]
pub struct Diagnostic {
    pub code: Code,
    pub message: String,
    pub location: Option<FileSpan>,
    filled: u8,
}

impl Diagnostic {
    pub fn new(code: Code) -> Self {
        Self { code, message: code.template().to_owned(), location: None, filled: 0 }
    }

    /// Fill the next `{n}` placeholder of the message template.
    ///
    /// Formatting is culture-invariant: numbers render the way Rust's
    /// `Display` renders them, with no grouping separators.
    pub fn arg(mut self, value: impl fmt::Display) -> Self {
        format::fill(&mut self.message, self.filled, &value.to_string());
        self.filled += 1;
        self
    }

    pub fn location(mut self, location: FileSpan) -> Self {
        self.location = Some(location);
        self
    }

    pub fn at(self, file: Rc<str>, span: span::Span) -> Self {
        self.location(FileSpan::new(file, span))
    }

    /// Render into an [`OutputMessage`] with the given (possibly promoted)
    /// severity.
    pub fn into_message(self, severity: Severity) -> OutputMessage {
        OutputMessage { severity, code: self.code, location: self.location, text: self.message }
    }
}

/// A fully rendered diagnostic as it appears in compiler output.
#[derive(Clone, PartialEq, Eq, Debug)]
pub struct OutputMessage {
    pub severity: Severity,
    pub code: Code,
    pub location: Option<FileSpan>,
    pub text: String,
}

impl OutputMessage {
    pub fn position(&self) -> Option<Position> {
        self.location.as_ref().map(|location| location.span.start)
    }
}

impl fmt::Display for OutputMessage {
    /// `<source>(<line>,<column>): <severity> CS<NNNN>: <message>`, the
    /// location prefix omitted for locationless messages.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(location) = &self.location {
            write!(
                f,
                "{}({},{}): ",
                location.file, location.span.start.line, location.span.start.column
            )?;
        }

        write!(f, "{} {}: {}", self.severity, self.code, self.text)
    }
}

/// The append-only, insertion-ordered list of messages of one compilation.
#[derive(Default)]
pub struct OutputMessageCollection {
    messages: Vec<OutputMessage>,
    errors: usize,
}

impl OutputMessageCollection {
    pub fn add(&mut self, message: OutputMessage) {
        if message.severity == Severity::Error {
            self.errors += 1;
        }
        self.messages.push(message);
    }

    pub fn messages(&self) -> &[OutputMessage] {
        &self.messages
    }

    pub fn has_errors(&self) -> bool {
        self.errors > 0
    }

    pub fn len(&self) -> usize {
        self.messages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }
}

#[cfg(test)]
mod test;
