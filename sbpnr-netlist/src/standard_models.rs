// SPDX-License-Identifier: Apache-2.0

//! The iCE40 primitive library every design starts with.
//!
//! `.gate` lines may only instantiate models that exist in the design, and a
//! BLIF file from the synthesis flow defines just the top model, so the
//! primitives have to be there before parsing starts.

use crate::design::{Design, Direction, ModelId};

/// Name of the I/O primitive whose package pin marks a boundary net.
pub const IO_MODEL: &str = "SB_IO";

/// Pin of [`IO_MODEL`] that faces the package.
pub const IO_PACKAGE_PIN: &str = "PACKAGE_PIN";

const IO_PORTS: &[(&str, Direction)] = &[
    ("PACKAGE_PIN", Direction::Inout),
    ("LATCH_INPUT_VALUE", Direction::In),
    ("CLOCK_ENABLE", Direction::In),
    ("INPUT_CLK", Direction::In),
    ("OUTPUT_CLK", Direction::In),
    ("OUTPUT_ENABLE", Direction::In),
    ("D_OUT_0", Direction::In),
    ("D_OUT_1", Direction::In),
    ("D_IN_0", Direction::Out),
    ("D_IN_1", Direction::Out),
];

const PLL_PORTS: &[(&str, Direction)] = &[
    ("REFERENCECLK", Direction::In),
    ("RESETB", Direction::In),
    ("BYPASS", Direction::In),
    ("EXTFEEDBACK", Direction::In),
    ("LATCHINPUTVALUE", Direction::In),
    ("SCLK", Direction::In),
    ("SDI", Direction::In),
    ("PLLOUTCORE", Direction::Out),
    ("PLLOUTGLOBAL", Direction::Out),
    ("LOCK", Direction::Out),
    ("SDO", Direction::Out),
];

/// Set/reset flavours of the flip-flop family, by name suffix.
const DFF_SR_VARIANTS: &[&str] = &["", "SR", "R", "SS", "S"];

fn add_model_with_ports(design: &mut Design, name: &str, ports: &[(&str, Direction)]) -> ModelId {
    let model = design.add_model(name);
    for (port, direction) in ports {
        design.add_port(model, port, *direction);
    }
    model
}

fn add_bus(design: &mut Design, model: ModelId, name: &str, width: usize, direction: Direction) {
    for i in 0..width {
        design.add_port(model, &format!("{}[{}]", name, i), direction);
    }
}

fn add_dff_family(design: &mut Design) {
    for neg_clk in [false, true] {
        for clock_enable in [false, true] {
            for sr in DFF_SR_VARIANTS {
                let name = format!(
                    "SB_DFF{}{}{}",
                    if neg_clk { "N" } else { "" },
                    if clock_enable { "E" } else { "" },
                    sr
                );
                let model = design.add_model(&name);
                design.add_port(model, "C", Direction::In);
                design.add_port(model, "D", Direction::In);
                design.add_port(model, "Q", Direction::Out);
                if clock_enable {
                    design.add_port(model, "E", Direction::In);
                }
                match *sr {
                    "SR" | "R" => {
                        design.add_port(model, "R", Direction::In);
                    }
                    "SS" | "S" => {
                        design.add_port(model, "S", Direction::In);
                    }
                    _ => {}
                }
            }
        }
    }
}

fn add_ram_family(design: &mut Design) {
    for (suffix, read_clk, write_clk) in [
        ("", "RCLK", "WCLK"),
        ("NR", "RCLKN", "WCLK"),
        ("NW", "RCLK", "WCLKN"),
        ("NRNW", "RCLKN", "WCLKN"),
    ] {
        let model = design.add_model(&format!("SB_RAM40_4K{}", suffix));
        add_bus(design, model, "RDATA", 16, Direction::Out);
        add_bus(design, model, "RADDR", 11, Direction::In);
        add_bus(design, model, "WADDR", 11, Direction::In);
        add_bus(design, model, "MASK", 16, Direction::In);
        add_bus(design, model, "WDATA", 16, Direction::In);
        for port in ["RCLKE", read_clk, "RE", "WCLKE", write_clk, "WE"] {
            design.add_port(model, port, Direction::In);
        }
    }
}

/// Adds the primitive library to `design`.
pub fn add_standard_models(design: &mut Design) {
    add_model_with_ports(design, IO_MODEL, IO_PORTS);

    let gb_io = add_model_with_ports(design, "SB_GB_IO", IO_PORTS);
    design.add_port(gb_io, "GLOBAL_BUFFER_OUTPUT", Direction::Out);

    add_model_with_ports(
        design,
        "SB_GB",
        &[
            ("USER_SIGNAL_TO_GLOBAL_BUFFER", Direction::In),
            ("GLOBAL_BUFFER_OUTPUT", Direction::Out),
        ],
    );
    add_model_with_ports(
        design,
        "SB_LUT4",
        &[
            ("I0", Direction::In),
            ("I1", Direction::In),
            ("I2", Direction::In),
            ("I3", Direction::In),
            ("O", Direction::Out),
        ],
    );
    add_model_with_ports(
        design,
        "SB_CARRY",
        &[
            ("CI", Direction::In),
            ("I0", Direction::In),
            ("I1", Direction::In),
            ("CO", Direction::Out),
        ],
    );
    add_dff_family(design);
    add_ram_family(design);
    add_model_with_ports(
        design,
        "SB_WARMBOOT",
        &[
            ("BOOT", Direction::In),
            ("S1", Direction::In),
            ("S0", Direction::In),
        ],
    );

    let pll = add_model_with_ports(design, "SB_PLL40_CORE", PLL_PORTS);
    add_bus(design, pll, "DYNAMICDELAY", 8, Direction::In);

    log::trace!(
        "standard models: {} primitives registered",
        design.models().count()
    );
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dff_family_is_complete() {
        let d = Design::with_standard_models();
        for name in ["SB_DFF", "SB_DFFE", "SB_DFFNESR", "SB_DFFNS", "SB_DFFESS"] {
            assert!(d.find_model(name).is_some(), "missing {}", name);
        }
        let dffesr = d.find_model("SB_DFFESR").unwrap();
        let names: Vec<&str> = d
            .model_ports(dffesr)
            .iter()
            .map(|p| d.port_name(*p))
            .collect();
        assert_eq!(names, vec!["C", "D", "Q", "E", "R"]);
    }

    #[test]
    fn test_io_package_pin_is_bidirectional() {
        let d = Design::with_standard_models();
        let io = d.find_model(IO_MODEL).unwrap();
        let pin = d.find_port(io, IO_PACKAGE_PIN).unwrap();
        assert_eq!(d.port(pin).direction, Direction::Inout);
        assert!(d.top().is_none());
    }

    #[test]
    fn test_ram_buses_are_bit_blasted() {
        let d = Design::with_standard_models();
        let ram = d.find_model("SB_RAM40_4KNRNW").unwrap();
        assert!(d.find_port(ram, "RDATA[15]").is_some());
        assert!(d.find_port(ram, "RADDR[11]").is_none());
        assert!(d.find_port(ram, "RCLKN").is_some());
        assert!(d.find_port(ram, "RCLK").is_none());
    }
}
