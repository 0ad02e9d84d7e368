// SPDX-License-Identifier: Apache-2.0

//! Entry points for reading BLIF from disk or from any reader.
//!
//! Path inputs may start with `~` and may be gzip-compressed (`.gz`); parse
//! errors on files carry the offending source line.

use std::fs::File;
use std::io::{BufRead, BufReader, Read};
use std::path::{Path, PathBuf};

use flate2::read::MultiGzDecoder;

use crate::blif::error::BlifError;
use crate::blif::parse::BlifParser;
use crate::blif::scanner::LineScanner;
use crate::blif::BlifOptions;
use crate::design::Design;

/// Expands a leading `~` to the user's home directory.
pub fn expand_path(path: &Path) -> PathBuf {
    let Ok(rest) = path.strip_prefix("~") else {
        return path.to_path_buf();
    };
    match std::env::var_os("HOME") {
        Some(home) => PathBuf::from(home).join(rest),
        None => path.to_path_buf(),
    }
}

fn is_gz(path: &Path) -> bool {
    path.extension().map(|e| e == "gz").unwrap_or(false)
}

fn line_lookup(path: &Path) -> Box<dyn Fn(u32) -> Option<String>> {
    let path = path.to_path_buf();
    let gz = is_gz(&path);
    Box::new(move |lineno| {
        let file = File::open(&path).ok()?;
        let index = (lineno as usize).checked_sub(1)?;
        if gz {
            let reader = BufReader::new(MultiGzDecoder::new(BufReader::new(file)));
            reader.lines().nth(index).and_then(Result::ok)
        } else {
            let reader = BufReader::new(file);
            reader.lines().nth(index).and_then(Result::ok)
        }
    })
}

pub fn parse_blif_from_path(path: &Path) -> Result<Design, BlifError> {
    parse_blif_from_path_with_options(path, &BlifOptions::default())
}

/// Reads, unifies and checks the BLIF file at `path`.
pub fn parse_blif_from_path_with_options(
    path: &Path,
    options: &BlifOptions,
) -> Result<Design, BlifError> {
    let source_name = path.display().to_string();
    let expanded = expand_path(path);
    let file = File::open(&expanded).map_err(|e| {
        BlifError::io(
            &source_name,
            format!("failed to open `{}': {}", expanded.display(), e),
        )
    })?;
    let reader: Box<dyn Read> = if is_gz(&expanded) {
        Box::new(MultiGzDecoder::new(BufReader::new(file)))
    } else {
        Box::new(file)
    };
    log::debug!("reading BLIF from {}", expanded.display());
    let scanner = LineScanner::with_line_lookup(&source_name, reader, line_lookup(&expanded));
    BlifParser::new(scanner, options.clone()).parse()
}

pub fn parse_blif_from_reader<R: Read>(source_name: &str, reader: R) -> Result<Design, BlifError> {
    parse_blif_from_reader_with_options(source_name, reader, &BlifOptions::default())
}

/// Reads BLIF from `reader`; `source_name` only labels diagnostics.
pub fn parse_blif_from_reader_with_options<R: Read>(
    source_name: &str,
    reader: R,
    options: &BlifOptions,
) -> Result<Design, BlifError> {
    let scanner = LineScanner::new(source_name, reader);
    BlifParser::new(scanner, options.clone()).parse()
}

/// Parses BLIF text held in memory, e.g. in tests.
pub fn parse_blif_str(source_name: &str, text: &str) -> Result<Design, BlifError> {
    let scanner = LineScanner::from_str(source_name, text);
    BlifParser::new(scanner, BlifOptions::default()).parse()
}
