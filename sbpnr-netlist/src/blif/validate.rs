// SPDX-License-Identifier: Apache-2.0

//! Electrical checks run once the top model is final.
//!
//! - A bidirectional top-level port may only be wired to the package pin of
//!   an I/O primitive, and every I/O primitive's package pin must reach a
//!   top-level port. Nets on those pins are boundary nets.
//! - Every other net has at most one driver, where a constant counts as one
//!   driver and so does each driving port.
//! - The I/O primitive and its pin must exist in the library.

use std::collections::HashSet;
use std::fmt;

use crate::blif::scanner::Pos;
use crate::design::{Design, Direction, ModelId, NetId, PortId, PortOwner};

/// Which primitive marks the chip boundary, and by which pin.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IoBoundary<'a> {
    pub model: &'a str,
    pub pin: &'a str,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WiringViolation {
    BidirPortNotOnIoPin {
        port: String,
        io_model: String,
        io_pin: String,
    },
    IoPinNotOnTopPort {
        io_model: String,
        io_pin: String,
        pos: Option<Pos>,
    },
    MultipleDrivers {
        net: String,
        drivers: usize,
    },
    UnknownIoModel {
        io_model: String,
    },
    UnknownIoPin {
        io_model: String,
        io_pin: String,
    },
}

impl WiringViolation {
    pub fn pos(&self) -> Option<Pos> {
        match self {
            WiringViolation::IoPinNotOnTopPort { pos, .. } => *pos,
            _ => None,
        }
    }
}

impl fmt::Display for WiringViolation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            WiringViolation::BidirPortNotOnIoPin {
                port,
                io_model,
                io_pin,
            } => write!(
                f,
                "toplevel inout port '{}' not connected to {} {}",
                port, io_model, io_pin
            ),
            WiringViolation::IoPinNotOnTopPort {
                io_model, io_pin, ..
            } => write!(f, "{} {} not connected to toplevel port", io_model, io_pin),
            WiringViolation::MultipleDrivers { net, drivers } => {
                write!(f, "net `{}' has multiple drivers ({})", net, drivers)
            }
            WiringViolation::UnknownIoModel { io_model } => {
                write!(f, "unknown I/O model `{}'", io_model)
            }
            WiringViolation::UnknownIoPin { io_model, io_pin } => {
                write!(f, "I/O model `{}' has no pin `{}'", io_model, io_pin)
            }
        }
    }
}

impl std::error::Error for WiringViolation {}

/// Looks up the I/O primitive of `io` and checks that it has the pin.
pub fn resolve_io_boundary(design: &Design, io: IoBoundary<'_>) -> Result<ModelId, WiringViolation> {
    let Some(io_model) = design.find_model(io.model) else {
        return Err(WiringViolation::UnknownIoModel {
            io_model: io.model.to_string(),
        });
    };
    if design.find_port(io_model, io.pin).is_none() {
        return Err(WiringViolation::UnknownIoPin {
            io_model: io.model.to_string(),
            io_pin: io.pin.to_string(),
        });
    }
    Ok(io_model)
}

/// Checks the wiring of `top` and returns its boundary nets.
pub fn check_wiring(
    design: &Design,
    top: ModelId,
    io: IoBoundary<'_>,
) -> Result<HashSet<NetId>, WiringViolation> {
    let io_model = resolve_io_boundary(design, io)?;
    let is_io_pin = |port: PortId| {
        let p = design.port(port);
        let PortOwner::Instance(inst) = p.owner else {
            return false;
        };
        design.instance(inst).instance_of == io_model && design.port_name(port) == io.pin
    };

    for &port in design.model_ports(top) {
        let p = design.port(port);
        if p.direction != Direction::Inout || p.connection.is_none() {
            continue;
        }
        let on_io_pin = design
            .connection_other_port(port)
            .map(|q| is_io_pin(q))
            .unwrap_or(false);
        if !on_io_pin {
            return Err(WiringViolation::BidirPortNotOnIoPin {
                port: design.port_name(port).to_string(),
                io_model: io.model.to_string(),
                io_pin: io.pin.to_string(),
            });
        }
    }

    let mut boundary: HashSet<NetId> = HashSet::new();
    for &inst in design.model_instances(top) {
        if design.instance(inst).instance_of != io_model {
            continue;
        }
        let pin = design.find_instance_port(inst, io.pin);
        let net = pin.and_then(|p| design.port(p).connection);
        let far_owner = pin
            .and_then(|p| design.connection_other_port(p))
            .map(|q| design.port(q).owner);
        match (net, far_owner) {
            (Some(net), Some(PortOwner::Model(m))) if m == top => {
                boundary.insert(net);
            }
            _ => {
                return Err(WiringViolation::IoPinNotOnTopPort {
                    io_model: io.model.to_string(),
                    io_pin: io.pin.to_string(),
                    pos: design.instance(inst).pos,
                });
            }
        }
    }

    for net in design.model_nets(top) {
        if boundary.contains(&net) {
            continue;
        }
        let n = design.net(net);
        let drivers = usize::from(n.constant.is_some())
            + n.connections
                .iter()
                .filter(|p| design.port_drives_net(**p))
                .count();
        if drivers > 1 {
            return Err(WiringViolation::MultipleDrivers {
                net: design.net_name(net).to_string(),
                drivers,
            });
        }
    }

    log::debug!(
        "wiring check of `{}' passed; {} boundary nets",
        design.model_name(top),
        boundary.len()
    );
    Ok(boundary)
}
