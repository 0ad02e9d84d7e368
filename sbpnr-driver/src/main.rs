// SPDX-License-Identifier: Apache-2.0

//! Command line driver for the iCE40 netlist front-end.
//!
//! Commands are given like:
//!
//! ```text
//! sbpnr-driver <global-options> <command> <command-args>
//! ```
//!
//! Commands are:
//!
//! - blif-check: Reads a BLIF file and runs the wiring checks.
//! - blif-stats: Prints summary statistics for a BLIF file.
//! - blif-dump: Prints the ports, nets and instances of the parsed design.
//!
//! Sample usage:
//!
//! ```shell
//! $ cargo run -- blif-check top.blif
//! $ cargo run -- --config=$HOME/sbpnr.toml blif-stats top.blif.gz
//! $ cargo run -- --io-model=SB_GB_IO blif-dump top.blif
//! ```

mod blif_check;
mod blif_dump;
mod blif_stats;
mod driver_config;
mod report_cli_error;

use clap::{Arg, ArgAction};
use driver_config::DriverConfig;
use report_cli_error::report_cli_error_and_exit;

trait AppExt {
    fn add_blif_input_arg(self) -> Self;
}

impl AppExt for clap::Command {
    fn add_blif_input_arg(self) -> Self {
        (self as clap::Command).arg(
            Arg::new("blif")
                .help("Input BLIF file (optionally .gz)")
                .required(true)
                .index(1),
        )
    }
}

fn load_config(explicit: Option<&str>) -> Option<DriverConfig> {
    let cwd = match std::env::current_dir() {
        Ok(cwd) => cwd,
        Err(e) => report_cli_error_and_exit(
            "cannot determine working directory",
            None,
            vec![("error", &e.to_string())],
        ),
    };
    let path = driver_config::find_config_path(explicit, &cwd)?;
    if !path.exists() {
        report_cli_error_and_exit(
            "config file does not exist",
            None,
            vec![
                ("path", &path.display().to_string()),
                ("working directory", &cwd.display().to_string()),
            ],
        );
    }
    match DriverConfig::from_path(&path) {
        Ok(config) => Some(config),
        Err(e) => report_cli_error_and_exit(
            "invalid config file",
            None,
            vec![
                ("path", &path.display().to_string()),
                ("error", &format!("{:#}", e)),
            ],
        ),
    }
}

fn main() {
    let _ = env_logger::try_init();

    log::info!(
        "sbpnr-driver starting; version: {}",
        env!("CARGO_PKG_VERSION")
    );

    let matches = clap::Command::new("sbpnr-driver")
        .version(env!("CARGO_PKG_VERSION"))
        .about("Command line driver for the iCE40 netlist front-end")
        .arg(
            Arg::new("config")
                .long("config")
                .value_name("CONFIG")
                .help("Path to a sbpnr.toml file")
                .global(true)
                .action(ArgAction::Set),
        )
        .arg(
            Arg::new("io_model")
                .long("io-model")
                .value_name("MODEL")
                .help("I/O primitive whose package pin marks the chip boundary")
                .global(true)
                .action(ArgAction::Set),
        )
        .arg(
            Arg::new("io_pin")
                .long("io-pin")
                .value_name("PIN")
                .help("Package-facing pin of the I/O primitive")
                .global(true)
                .action(ArgAction::Set),
        )
        .subcommand(clap::Command::new("version").about("Prints the version of the driver"))
        .subcommand(
            clap::Command::new("blif-check")
                .about("Reads a BLIF file and checks its wiring")
                .add_blif_input_arg(),
        )
        .subcommand(
            clap::Command::new("blif-stats")
                .about("Prints summary statistics for a BLIF file")
                .add_blif_input_arg(),
        )
        .subcommand(
            clap::Command::new("blif-dump")
                .about("Prints the ports, nets and instances of a BLIF file")
                .add_blif_input_arg(),
        )
        .get_matches();

    let config = load_config(matches.get_one::<String>("config").map(String::as_str));

    if let Some(matches) = matches.subcommand_matches("blif-check") {
        blif_check::handle_blif_check(matches, &config);
    } else if let Some(matches) = matches.subcommand_matches("blif-stats") {
        blif_stats::handle_blif_stats(matches, &config);
    } else if let Some(matches) = matches.subcommand_matches("blif-dump") {
        blif_dump::handle_blif_dump(matches, &config);
    } else if let Some(_matches) = matches.subcommand_matches("version") {
        println!("{}", env!("CARGO_PKG_VERSION"));
    } else {
        report_cli_error_and_exit("No valid subcommand provided.", None, vec![]);
    }
}
