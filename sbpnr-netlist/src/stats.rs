// SPDX-License-Identifier: Apache-2.0

//! Compute summary statistics for parsed designs.

use anyhow::{anyhow, Result};
use std::collections::HashMap;
use std::path::Path;
use std::time::{Duration, Instant};

use crate::blif::{parse_blif_from_path_with_options, BlifOptions};
use crate::design::Design;

/// Summary statistics for the top model of a design.
#[derive(Debug)]
pub struct DesignStats {
    pub top: String,
    pub num_ports: usize,
    pub num_nets: usize,
    pub num_constant_nets: usize,
    pub num_instances: usize,
    /// Instance count per primitive, most used first.
    pub cell_counts: Vec<(String, usize)>,
    pub parse_duration: Duration,
}

/// Computes statistics for `design`'s top model. `parse_duration` is left at
/// zero.
pub fn design_stats(design: &Design) -> Result<DesignStats> {
    let top = design
        .top()
        .ok_or_else(|| anyhow!("design has no top model"))?;

    let mut counts: HashMap<&str, usize> = HashMap::new();
    for inst in design.model_instances(top) {
        let of = design.instance(*inst).instance_of;
        *counts.entry(design.model_name(of)).or_insert(0) += 1;
    }
    let mut cell_counts: Vec<(String, usize)> = counts
        .into_iter()
        .map(|(name, count)| (name.to_string(), count))
        .collect();
    cell_counts.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));

    Ok(DesignStats {
        top: design.model_name(top).to_string(),
        num_ports: design.model_ports(top).len(),
        num_nets: design.model_nets(top).count(),
        num_constant_nets: design
            .model_nets(top)
            .filter(|n| design.net(*n).constant.is_some())
            .count(),
        num_instances: design.model_instances(top).len(),
        cell_counts,
        parse_duration: Duration::ZERO,
    })
}

/// Reads and parses the BLIF file at `path`, returning summary statistics.
pub fn read_blif_stats(path: &Path, options: &BlifOptions) -> Result<DesignStats> {
    let start = Instant::now();
    let design = parse_blif_from_path_with_options(path, options)
        .map_err(|e| anyhow!(e.to_human_string()))?;
    let parse_duration = start.elapsed();
    let mut stats = design_stats(&design)?;
    stats.parse_duration = parse_duration;
    Ok(stats)
}
