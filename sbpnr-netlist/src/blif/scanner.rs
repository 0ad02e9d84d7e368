// SPDX-License-Identifier: Apache-2.0

//! Line scanner for BLIF sources.
//!
//! A logical line is one physical line, or several joined by a trailing
//! backslash. `#` starts a comment that runs to the end of the physical line.
//! Tokens are separated by whitespace; logical lines without tokens are
//! skipped entirely.

use std::fmt;
use std::io::{BufRead, BufReader, Read};

use crate::blif::error::{BlifError, BlifErrorKind};

/// 1-based line number of the first physical line of a logical line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Pos {
    pub lineno: u32,
}

impl fmt::Display for Pos {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "line {}", self.lineno)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TokenLine {
    pub words: Vec<String>,
    pub pos: Pos,
}

impl TokenLine {
    /// Directive lines start with a token beginning with `.`.
    pub fn is_directive(&self) -> bool {
        self.words
            .first()
            .map(|w| w.starts_with('.'))
            .unwrap_or(false)
    }

    pub fn keyword(&self) -> &str {
        self.words.first().map(String::as_str).unwrap_or("")
    }

    /// Tokens after the keyword.
    pub fn args(&self) -> &[String] {
        self.words.get(1..).unwrap_or(&[])
    }
}

pub struct LineScanner<R: Read> {
    reader: BufReader<R>,
    source_name: String,
    /// Physical line number of the next line to be read.
    next_lineno: u32,
    /// Position and raw text of the most recently returned logical line.
    pos: Pos,
    current_text: String,
    done: bool,
    line_lookup: Box<dyn Fn(u32) -> Option<String>>, // line number -> line text
}

impl<R: Read> LineScanner<R> {
    /// Construct a LineScanner with a custom line lookup callback, used to
    /// show source context for diagnostics that point at earlier lines.
    pub fn with_line_lookup(
        source_name: &str,
        reader: R,
        line_lookup: Box<dyn Fn(u32) -> Option<String>>,
    ) -> Self {
        Self {
            reader: BufReader::new(reader),
            source_name: source_name.to_string(),
            next_lineno: 1,
            pos: Pos { lineno: 0 },
            current_text: String::new(),
            done: false,
            line_lookup,
        }
    }

    pub fn new(source_name: &str, reader: R) -> Self {
        Self::with_line_lookup(source_name, reader, Box::new(|_| None))
    }

    pub fn source_name(&self) -> &str {
        &self.source_name
    }

    /// Position of the most recently returned line.
    pub fn pos(&self) -> Pos {
        self.pos
    }

    pub fn at_eof(&self) -> bool {
        self.done
    }

    /// Advances to the next logical line that has at least one token.
    /// Returns `Ok(None)` once the input is exhausted.
    pub fn next_line(&mut self) -> Result<Option<TokenLine>, BlifError> {
        while !self.done {
            let start = Pos {
                lineno: self.next_lineno,
            };
            let mut words: Vec<String> = Vec::new();
            let mut text = String::new();
            loop {
                let mut raw: Vec<u8> = Vec::new();
                let n = self.reader.read_until(b'\n', &mut raw).map_err(|e| {
                    BlifError::io(
                        &self.source_name,
                        format!("read failed after line {}: {}", self.next_lineno - 1, e),
                    )
                })?;
                if n == 0 {
                    self.done = true;
                    break;
                }
                self.next_lineno += 1;
                // Bytes that are not UTF-8 become U+FFFD.
                let raw = String::from_utf8_lossy(&raw);
                let line = raw.trim_end_matches(|c: char| c == '\n' || c == '\r');
                if !text.is_empty() {
                    text.push(' ');
                }
                text.push_str(line.trim());
                let content = match line.find('#') {
                    Some(i) => &line[..i],
                    None => line,
                };
                let (content, continued) = match content.trim_end().strip_suffix('\\') {
                    Some(head) => (head, true),
                    None => (content, false),
                };
                words.extend(content.split_whitespace().map(str::to_string));
                if !continued {
                    break;
                }
            }
            if !words.is_empty() {
                log::trace!("{}:{}: {:?}", self.source_name, start.lineno, words);
                self.pos = start;
                self.current_text = text;
                return Ok(Some(TokenLine { words, pos: start }));
            }
        }
        Ok(None)
    }

    fn line_text(&self, pos: Pos) -> Option<String> {
        if pos == self.pos && !self.current_text.is_empty() {
            return Some(self.current_text.clone());
        }
        (self.line_lookup)(pos.lineno)
    }

    /// Builds a fatal diagnostic at the current line, or without a position
    /// when no line has been returned yet.
    pub fn error(&self, kind: BlifErrorKind, message: impl Into<String>) -> BlifError {
        if self.pos.lineno == 0 {
            let message = message.into();
            log::error!("{}: {}", self.source_name, message);
            return BlifError::unpositioned(kind, &self.source_name, message);
        }
        self.error_at(self.pos, kind, message)
    }

    /// Builds a fatal diagnostic at `pos`, logging the source line for
    /// context.
    pub fn error_at(&self, pos: Pos, kind: BlifErrorKind, message: impl Into<String>) -> BlifError {
        let message = message.into();
        let line_text = self.line_text(pos);
        log::error!("{}:{}: {}", self.source_name, pos.lineno, message);
        if let Some(text) = &line_text {
            log::error!("    {}", text);
        }
        BlifError {
            kind,
            message,
            source_name: self.source_name.clone(),
            pos: Some(pos),
            line_text,
        }
    }
}

impl LineScanner<std::io::Cursor<Vec<u8>>> {
    /// Construct a LineScanner over an in-memory string (for tests), using
    /// the string itself for line lookup.
    pub fn from_str(source_name: &str, input: &str) -> Self {
        let lines: Vec<String> = input.lines().map(|s| s.to_string()).collect();
        let lookup = move |lineno: u32| lines.get((lineno as usize).checked_sub(1)?).cloned();
        Self::with_line_lookup(
            source_name,
            std::io::Cursor::new(input.as_bytes().to_vec()),
            Box::new(lookup),
        )
    }
}
