// SPDX-License-Identifier: Apache-2.0

use std::fmt;

use crate::blif::scanner::Pos;

/// Broad class of a fatal BLIF diagnostic.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BlifErrorKind {
    /// The source could not be opened or read.
    Io,
    /// Argument counts, directives out of context, unknown or missing
    /// directives, unterminated tables.
    Structural,
    /// References that do not resolve: models, formals, the top model.
    Semantic,
    /// Literal text that does not decode.
    Value,
    /// Wiring problems found after the graph is complete.
    Consistency,
    /// Reader options that do not match the primitive library.
    Config,
}

/// A fatal diagnostic. Parsing stops at the first one; there is no partial
/// result.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BlifError {
    pub kind: BlifErrorKind,
    pub message: String,
    pub source_name: String,
    pub pos: Option<Pos>,
    /// Text of the offending source line, when it could be recovered.
    pub line_text: Option<String>,
}

impl BlifError {
    pub fn io(source_name: &str, message: String) -> Self {
        Self::unpositioned(BlifErrorKind::Io, source_name, message)
    }

    /// A diagnostic that is not tied to any source line.
    pub fn unpositioned(kind: BlifErrorKind, source_name: &str, message: String) -> Self {
        BlifError {
            kind,
            message,
            source_name: source_name.to_string(),
            pos: None,
            line_text: None,
        }
    }

    /// Renders the diagnostic followed by the source line it points at.
    pub fn to_human_string(&self) -> String {
        match &self.line_text {
            Some(text) => format!("{}\n    {}", self, text),
            None => self.to_string(),
        }
    }
}

impl fmt::Display for BlifError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.pos {
            Some(pos) => write!(
                f,
                "{}:{}: fatal error: {}",
                self.source_name, pos.lineno, self.message
            ),
            None => write!(f, "{}: fatal error: {}", self.source_name, self.message),
        }
    }
}

impl std::error::Error for BlifError {}
