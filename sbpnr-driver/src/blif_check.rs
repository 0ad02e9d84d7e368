// SPDX-License-Identifier: Apache-2.0

use clap::ArgMatches;
use std::path::Path;

use sbpnr_netlist::blif::parse_blif_from_path_with_options;

use crate::driver_config::{get_blif_options, DriverConfig};
use crate::report_cli_error::report_blif_error_and_exit;

pub fn handle_blif_check(matches: &ArgMatches, config: &Option<DriverConfig>) {
    let blif_path = matches
        .get_one::<String>("blif")
        .expect("blif path is required");
    let options = get_blif_options(matches, config);
    match parse_blif_from_path_with_options(Path::new(blif_path), &options) {
        Ok(design) => {
            let top = design
                .top()
                .map(|m| design.model_name(m).to_string())
                .unwrap_or_default();
            println!("OK: {}", top);
        }
        Err(e) => report_blif_error_and_exit("blif-check", &e),
    }
}
