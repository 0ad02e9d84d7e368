// SPDX-License-Identifier: Apache-2.0

use colored::Colorize;
use sbpnr_netlist::blif::BlifError;

/// Prints `message` in red with indented `key: value` details and exits 1.
pub fn report_cli_error_and_exit(
    message: &str,
    subcommand: Option<&str>,
    details: Vec<(&str, &str)>,
) -> ! {
    let prefix = subcommand.map(|s| format!("{}: ", s)).unwrap_or_default();
    eprintln!("sbpnr-driver: {}{}", prefix, message.red().bold());
    for (key, value) in details {
        eprintln!("  {}: {}", key, value);
    }
    std::process::exit(1);
}

/// The `key: value` lines shown under a fatal BLIF diagnostic.
fn blif_error_details(e: &BlifError) -> Vec<(&'static str, String)> {
    let mut details = vec![("kind", format!("{:?}", e.kind))];
    if let Some(text) = &e.line_text {
        details.push(("source line", text.clone()));
    }
    details
}

pub fn report_blif_error_and_exit(subcommand: &str, e: &BlifError) -> ! {
    let details = blif_error_details(e);
    report_cli_error_and_exit(
        &e.to_string(),
        Some(subcommand),
        details.iter().map(|(k, v)| (*k, v.as_str())).collect(),
    )
}
