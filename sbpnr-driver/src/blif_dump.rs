// SPDX-License-Identifier: Apache-2.0

use clap::ArgMatches;
use std::fmt::Write;
use std::path::Path;

use sbpnr_netlist::blif::parse_blif_from_path_with_options;
use sbpnr_netlist::design::{Design, Value};

use crate::driver_config::{get_blif_options, DriverConfig};
use crate::report_cli_error::report_blif_error_and_exit;

/// Renders the top model of `design` one item per line: ports, then nets,
/// then instances with their bindings and annotations.
pub fn dump_design(design: &Design) -> String {
    let mut out = String::new();
    let Some(top) = design.top() else {
        return out;
    };
    writeln!(out, "model {}", design.model_name(top)).unwrap();

    for &port in design.model_ports(top) {
        let p = design.port(port);
        let net = p.connection.map(|n| design.net_name(n)).unwrap_or("-");
        writeln!(
            out,
            "port {} {} net={}",
            design.port_name(port),
            p.direction,
            net
        )
        .unwrap();
    }

    for net in design.model_nets(top) {
        let n = design.net(net);
        write!(
            out,
            "net {} connections={}",
            design.net_name(net),
            n.connections.len()
        )
        .unwrap();
        match n.constant {
            Some(Value::Zero) => write!(out, " constant=0").unwrap(),
            Some(Value::One) => write!(out, " constant=1").unwrap(),
            None => {}
        }
        out.push('\n');
    }

    for (index, &inst) in design.model_instances(top).iter().enumerate() {
        let i = design.instance(inst);
        write!(out, "inst {} {}", index, design.model_name(i.instance_of)).unwrap();
        if let Some(pos) = i.pos {
            write!(out, " @ {}", pos).unwrap();
        }
        out.push('\n');
        for &port in &i.ports {
            if let Some(net) = design.port(port).connection {
                writeln!(out, "  {}={}", design.port_name(port), design.net_name(net)).unwrap();
            }
        }
        for (key, value) in &i.attrs {
            writeln!(out, "  attr {}={}", key, value).unwrap();
        }
        for (key, value) in &i.params {
            writeln!(out, "  param {}={}", key, value).unwrap();
        }
    }
    out
}

pub fn handle_blif_dump(matches: &ArgMatches, config: &Option<DriverConfig>) {
    let blif_path = matches
        .get_one::<String>("blif")
        .expect("blif path is required");
    let options = get_blif_options(matches, config);
    match parse_blif_from_path_with_options(Path::new(blif_path), &options) {
        Ok(design) => print!("{}", dump_design(&design)),
        Err(e) => report_blif_error_and_exit("blif-dump", &e),
    }
}
