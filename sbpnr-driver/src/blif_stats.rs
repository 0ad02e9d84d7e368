// SPDX-License-Identifier: Apache-2.0

use clap::ArgMatches;
use std::path::Path;

use sbpnr_netlist::stats;

use crate::driver_config::{get_blif_options, DriverConfig};
use crate::report_cli_error::report_cli_error_and_exit;

pub fn handle_blif_stats(matches: &ArgMatches, config: &Option<DriverConfig>) {
    let blif_path = matches
        .get_one::<String>("blif")
        .expect("blif path is required");
    let options = get_blif_options(matches, config);
    match stats::read_blif_stats(Path::new(blif_path), &options) {
        Ok(s) => {
            println!("Top: {}", s.top);
            println!("Ports: {}", s.num_ports);
            println!("Nets: {}", s.num_nets);
            println!("Constant nets: {}", s.num_constant_nets);
            println!("Instances: {}", s.num_instances);
            println!("Parse time: {} ms", s.parse_duration.as_millis());
            println!("Cell counts:");
            for (cell, count) in s.cell_counts {
                println!("  {cell}: {count}");
            }
        }
        Err(e) => report_cli_error_and_exit(&format!("{e}"), Some("blif-stats"), vec![]),
    }
}
