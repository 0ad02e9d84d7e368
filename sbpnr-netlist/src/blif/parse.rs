// SPDX-License-Identifier: Apache-2.0

//! Directive state machine for BLIF sources.
//!
//! The parser keeps two pieces of context between lines: the top model
//! (there is at most one) and the instance most recently created by `.gate`,
//! which `.attr` and `.param` lines annotate. `.names` tables read ahead
//! until the next directive; that directive line is parked in `pending` and
//! picked up by the main loop.

use std::io::Read;

use crate::blif::error::{BlifError, BlifErrorKind};
use crate::blif::literal::{parse_based_literal, parse_bit_string};
use crate::blif::scanner::{LineScanner, TokenLine};
use crate::blif::unify::{unify_nets, UnifyEdge};
use crate::blif::validate::{check_wiring, resolve_io_boundary};
use crate::blif::BlifOptions;
use crate::design::{Const, Design, Direction, InstId, ModelId, Value};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Directive {
    Model,
    Inputs,
    Outputs,
    Names,
    Gate,
    Attr,
    Param,
    End,
}

impl Directive {
    pub fn from_keyword(s: &str) -> Option<Self> {
        match s {
            ".model" => Some(Directive::Model),
            ".inputs" => Some(Directive::Inputs),
            ".outputs" => Some(Directive::Outputs),
            ".names" => Some(Directive::Names),
            ".gate" => Some(Directive::Gate),
            ".attr" => Some(Directive::Attr),
            ".param" => Some(Directive::Param),
            ".end" => Some(Directive::End),
            _ => None,
        }
    }

    pub fn keyword(self) -> &'static str {
        match self {
            Directive::Model => ".model",
            Directive::Inputs => ".inputs",
            Directive::Outputs => ".outputs",
            Directive::Names => ".names",
            Directive::Gate => ".gate",
            Directive::Attr => ".attr",
            Directive::Param => ".param",
            Directive::End => ".end",
        }
    }
}

/// Whether an `.attr`/`.param` value gets the Radiant numeric treatment.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ConstTarget {
    Attr,
    Param,
}

pub struct BlifParser<R: Read> {
    scanner: LineScanner<R>,
    design: Design,
    options: BlifOptions,
    top: Option<ModelId>,
    current_inst: Option<InstId>,
    unify: Vec<UnifyEdge>,
    /// Directive line that closed a `.names` table, not yet dispatched.
    pending: Option<TokenLine>,
}

impl<R: Read> BlifParser<R> {
    pub fn new(scanner: LineScanner<R>, options: BlifOptions) -> Self {
        Self {
            scanner,
            design: Design::with_standard_models(),
            options,
            top: None,
            current_inst: None,
            unify: Vec::new(),
            pending: None,
        }
    }

    /// Runs the whole pipeline: directives, net unification, wiring checks.
    pub fn parse(mut self) -> Result<Design, BlifError> {
        resolve_io_boundary(&self.design, self.options.io_boundary()).map_err(|e| {
            log::error!("{}: {}", self.scanner.source_name(), e);
            BlifError::unpositioned(
                BlifErrorKind::Config,
                self.scanner.source_name(),
                e.to_string(),
            )
        })?;
        self.parse_directives()?;

        let Some(top) = self.top else {
            return Err(self
                .scanner
                .error(BlifErrorKind::Semantic, "no top model has been defined"));
        };

        unify_nets(&mut self.design, top, &self.unify).map_err(|e| {
            self.scanner
                .error_at(e.pos(), BlifErrorKind::Consistency, e.to_string())
        })?;

        check_wiring(&self.design, top, self.options.io_boundary()).map_err(|e| {
            let message = e.to_string();
            match e.pos() {
                Some(pos) => self
                    .scanner
                    .error_at(pos, BlifErrorKind::Consistency, message),
                None => self.scanner.error(BlifErrorKind::Consistency, message),
            }
        })?;

        log::info!(
            "{}: read model `{}': {} ports, {} nets, {} instances, {} aliases merged",
            self.scanner.source_name(),
            self.design.model_name(top),
            self.design.model_ports(top).len(),
            self.design.model_nets(top).count(),
            self.design.model_instances(top).len(),
            self.unify.len()
        );
        Ok(self.design)
    }

    /// Dispatches directive lines until `.end` or end of input.
    fn parse_directives(&mut self) -> Result<(), BlifError> {
        loop {
            let line = match self.pending.take() {
                Some(line) => line,
                None => match self.scanner.next_line()? {
                    Some(line) => line,
                    None => return Ok(()),
                },
            };
            if !line.is_directive() {
                return Err(self
                    .scanner
                    .error(BlifErrorKind::Structural, "expected directive"));
            }
            let Some(directive) = Directive::from_keyword(line.keyword()) else {
                return Err(self.scanner.error(
                    BlifErrorKind::Structural,
                    format!("unknown directive '{}'", line.keyword()),
                ));
            };
            log::debug!("{}: {}", line.pos, directive.keyword());
            match directive {
                Directive::Model => self.handle_model(&line)?,
                Directive::Inputs => self.handle_port_list(&line, Direction::In)?,
                Directive::Outputs => self.handle_port_list(&line, Direction::Out)?,
                Directive::Names => self.handle_names(&line)?,
                Directive::Gate => self.handle_gate(&line)?,
                Directive::Attr => self.handle_const(&line, ConstTarget::Attr)?,
                Directive::Param => self.handle_const(&line, ConstTarget::Param)?,
                Directive::End => {
                    self.require_top(Directive::End)?;
                    return Ok(());
                }
            }
        }
    }

    fn require_top(&self, directive: Directive) -> Result<ModelId, BlifError> {
        self.top.ok_or_else(|| {
            self.scanner.error(
                BlifErrorKind::Structural,
                format!(
                    "{} directive outside of model definition",
                    directive.keyword()
                ),
            )
        })
    }

    fn handle_model(&mut self, line: &TokenLine) -> Result<(), BlifError> {
        let args = line.args();
        if args.len() != 1 {
            return Err(self.scanner.error(
                BlifErrorKind::Structural,
                format!(
                    "invalid .model directive: expected exactly 1 argument, got {}",
                    args.len()
                ),
            ));
        }
        if self.top.is_some() {
            return Err(self.scanner.error(
                BlifErrorKind::Semantic,
                "definition of multiple models is not supported",
            ));
        }
        let name = &args[0];
        if self.design.find_model(name).is_some() {
            return Err(self.scanner.error(
                BlifErrorKind::Semantic,
                format!("model `{}' conflicts with a library primitive", name),
            ));
        }
        let top = self.design.add_model(name);
        self.design.set_top(top);
        self.top = Some(top);
        Ok(())
    }

    /// `.inputs` / `.outputs`: declare ports on the top model, each tied to
    /// the net of the same name.
    fn handle_port_list(&mut self, line: &TokenLine, declared: Direction) -> Result<(), BlifError> {
        let directive = if declared == Direction::In {
            Directive::Inputs
        } else {
            Directive::Outputs
        };
        let top = self.require_top(directive)?;
        for name in line.args() {
            let port = match self.design.find_port(top, name) {
                Some(port) => {
                    let current = self.design.port(port).direction;
                    let merged = current.merge(declared);
                    if merged != current {
                        log::trace!("port `{}' promoted to {}", name, merged);
                        self.design.set_port_direction(port, merged);
                    }
                    port
                }
                None => self.design.add_port(top, name, declared),
            };
            let net = self.design.find_or_add_net(top, name);
            self.design.connect(port, net);
        }
        Ok(())
    }

    /// Next line inside a `.names` table. A directive line closes the table
    /// and is parked for the main loop; `None` means the table is closed.
    fn next_table_entry(&mut self) -> Result<Option<TokenLine>, BlifError> {
        match self.scanner.next_line()? {
            Some(line) if line.is_directive() => {
                self.pending = Some(line);
                Ok(None)
            }
            other => Ok(other),
        }
    }

    /// `.names out` assigns a constant; `.names in out` with the single
    /// entry `1 1` is a buffer and becomes a unify edge. Other truth tables
    /// are not accepted.
    fn handle_names(&mut self, line: &TokenLine) -> Result<(), BlifError> {
        let top = self.require_top(Directive::Names)?;
        let names_pos = line.pos;
        let args = line.args();
        match args.len() {
            1 => {
                let net = self.design.find_or_add_net(top, &args[0]);
                self.design.set_net_constant(net, Value::Zero);
                while let Some(entry) = self.next_table_entry()? {
                    if entry.words.len() != 1 {
                        return Err(self.scanner.error(
                            BlifErrorKind::Structural,
                            "invalid .names entry: number of gates does not match specified number of nets",
                        ));
                    }
                    match entry.words[0].as_str() {
                        "1" => self.design.set_net_constant(net, Value::One),
                        "0" => {}
                        _ => {
                            return Err(self.scanner.error(
                                BlifErrorKind::Value,
                                "invalid .names entry: gate must be either 1 or 0",
                            ));
                        }
                    }
                }
                Ok(())
            }
            2 => {
                let driver = self.design.find_or_add_net(top, &args[0]);
                let alias = self.design.find_or_add_net(top, &args[1]);
                let mut saw_entry = false;
                while let Some(entry) = self.next_table_entry()? {
                    if entry.words.len() != 2 {
                        return Err(self.scanner.error(
                            BlifErrorKind::Structural,
                            "invalid .names entry: number of gates does not match specified number of nets",
                        ));
                    }
                    if entry.words[0] != "1" || entry.words[1] != "1" {
                        return Err(self.scanner.error(
                            BlifErrorKind::Value,
                            "invalid .names entry: both gates must be 1 here",
                        ));
                    }
                    log::trace!("{}: buffer `{}' -> `{}'", entry.pos, args[0], args[1]);
                    // Repeated `1 1` rows describe the same buffer.
                    if !saw_entry {
                        self.unify.push(UnifyEdge {
                            driver,
                            alias,
                            pos: names_pos,
                        });
                        saw_entry = true;
                    }
                }
                if !saw_entry {
                    let message = if self.pending.is_some() {
                        "invalid .names directive: .names entry expected"
                    } else {
                        "invalid .names directive: unexpected end of file"
                    };
                    return Err(self
                        .scanner
                        .error_at(names_pos, BlifErrorKind::Structural, message));
                }
                Ok(())
            }
            n => Err(self.scanner.error(
                BlifErrorKind::Structural,
                format!(
                    "invalid .names directive: expected 1 or 2 arguments, got {}",
                    n
                ),
            )),
        }
    }

    /// `.gate MODEL formal=actual ...`
    fn handle_gate(&mut self, line: &TokenLine) -> Result<(), BlifError> {
        let top = self.require_top(Directive::Gate)?;
        let args = line.args();
        let Some(model_name) = args.first() else {
            return Err(self
                .scanner
                .error(BlifErrorKind::Structural, "invalid .gate directive: missing name"));
        };
        let Some(model) = self.design.find_model(model_name) else {
            return Err(self.scanner.error(
                BlifErrorKind::Semantic,
                format!("unknown model `{}'", model_name),
            ));
        };
        let inst = self.design.add_instance(top, model, Some(line.pos));
        self.current_inst = Some(inst);

        for binding in &args[1..] {
            let Some((formal, actual)) = binding.split_once('=') else {
                return Err(self.scanner.error(
                    BlifErrorKind::Semantic,
                    format!("invalid formal-actual `{}'", binding),
                ));
            };
            if actual.is_empty() {
                continue;
            }
            let Some(port) = self.design.find_instance_port(inst, formal) else {
                return Err(self.scanner.error(
                    BlifErrorKind::Semantic,
                    format!("unknown formal `{}' for model `{}'", formal, model_name),
                ));
            };
            let net = self.design.find_or_add_net(top, actual);
            self.design.connect(port, net);
        }
        Ok(())
    }

    /// Returns the text between the quotes of a quoted value, or `None` for
    /// an unquoted one.
    fn unquote<'v>(&self, value: &'v str) -> Result<Option<&'v str>, BlifError> {
        if !value.starts_with('"') {
            return Ok(None);
        }
        if value.len() < 2 || !value.ends_with('"') {
            return Err(self.scanner.error(
                BlifErrorKind::Value,
                format!("unterminated string constant {}", value),
            ));
        }
        Ok(Some(&value[1..value.len() - 1]))
    }

    /// `.attr NAME VALUE` / `.param NAME VALUE` on the current instance.
    fn handle_const(&mut self, line: &TokenLine, target: ConstTarget) -> Result<(), BlifError> {
        let directive = match target {
            ConstTarget::Attr => Directive::Attr,
            ConstTarget::Param => Directive::Param,
        };
        let args = line.args();
        if args.len() != 2 {
            return Err(self.scanner.error(
                BlifErrorKind::Structural,
                format!(
                    "invalid {} directive: expected exactly 2 arguments, got {}",
                    directive.keyword(),
                    args.len()
                ),
            ));
        }
        let Some(inst) = self.current_inst else {
            return Err(self.scanner.error(
                BlifErrorKind::Structural,
                format!("no gate for {} directive", directive.keyword()),
            ));
        };

        let (key, raw) = (&args[0], &args[1]);
        let value = match self.unquote(raw)? {
            Some(text) if target == ConstTarget::Param => {
                // Radiant writes numeric parameters as quoted strings.
                match parse_based_literal(text)
                    .map_err(|e| self.scanner.error(BlifErrorKind::Value, e.to_string()))?
                {
                    Some(bits) => Const::Bits(bits),
                    None => Const::String(text.to_string()),
                }
            }
            Some(text) => Const::String(text.to_string()),
            None => Const::Bits(
                parse_bit_string(raw)
                    .map_err(|e| self.scanner.error(BlifErrorKind::Value, e.to_string()))?,
            ),
        };
        match target {
            ConstTarget::Attr => self.design.set_attr(inst, key, value),
            ConstTarget::Param => self.design.set_param(inst, key, value),
        }
        Ok(())
    }
}
