// SPDX-License-Identifier: Apache-2.0

//! BLIF reader.
//!
//! Accepts the subset of BLIF that iCE40 synthesis flows emit: one `.model`
//! built from `.gate` instances of the primitive library, `.names` tables
//! that are constants or plain buffers, and `.attr`/`.param` annotations on
//! the preceding gate.

use serde::Deserialize;

pub mod error;
pub mod io;
pub mod literal;
pub mod parse;
pub mod scanner;
pub mod unify;
pub mod validate;

pub use error::{BlifError, BlifErrorKind};
pub use io::{
    parse_blif_from_path, parse_blif_from_path_with_options, parse_blif_from_reader,
    parse_blif_from_reader_with_options, parse_blif_str,
};

use crate::standard_models::{IO_MODEL, IO_PACKAGE_PIN};
use validate::IoBoundary;

/// Reader settings, loadable from the `[blif]` table of a config file.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct BlifOptions {
    /// Model whose package pin marks a boundary net.
    pub io_model: String,
    /// Pin of `io_model` that faces the package.
    pub io_pin: String,
}

impl Default for BlifOptions {
    fn default() -> Self {
        BlifOptions {
            io_model: IO_MODEL.to_string(),
            io_pin: IO_PACKAGE_PIN.to_string(),
        }
    }
}

impl BlifOptions {
    pub fn io_boundary(&self) -> IoBoundary<'_> {
        IoBoundary {
            model: &self.io_model,
            pin: &self.io_pin,
        }
    }
}
