// SPDX-License-Identifier: Apache-2.0

use pretty_assertions::assert_eq;
use sbpnr_netlist::blif::{
    parse_blif_from_reader_with_options, parse_blif_str, BlifErrorKind, BlifOptions,
};
use test_case::test_case;

fn wiring_error(text: &str) -> (String, Option<u32>) {
    let _ = env_logger::builder().is_test(true).try_init();
    match parse_blif_str("wiring.blif", text) {
        Ok(_) => panic!("expected a wiring failure"),
        Err(e) => {
            assert_eq!(e.kind, BlifErrorKind::Consistency, "{}", e);
            (e.message, e.pos.map(|p| p.lineno))
        }
    }
}

#[test_case(
    ".model top\n.inputs a b\n.outputs y\n.gate SB_LUT4 I0=a O=y\n.gate SB_LUT4 I0=b O=y\n.end\n",
    "net `y' has multiple drivers (2)";
    "two cell outputs"
)]
#[test_case(
    ".model top\n.inputs a\n.outputs y\n.names y\n1\n.gate SB_LUT4 I0=a O=y\n.end\n",
    "net `y' has multiple drivers (2)";
    "constant and cell output"
)]
#[test_case(
    ".model top\n.inputs a\n.gate SB_LUT4 I0=a O=a\n.end\n",
    "net `a' has multiple drivers (2)";
    "top input and cell output"
)]
#[test_case(
    ".model top\n.inputs a b\n.outputs y\n.names a y\n1 1\n.gate SB_LUT4 I0=b O=y\n.end\n",
    "net `a' has multiple drivers (2)";
    "buffer merges a second driver"
)]
fn test_multiple_drivers(text: &str, want: &str) {
    let (message, _) = wiring_error(text);
    assert_eq!(message, want);
}

#[test]
fn test_single_driver_fanout_is_fine() {
    let design = parse_blif_str(
        "wiring.blif",
        ".model top\n.inputs a\n.outputs y z\n.gate SB_LUT4 I0=a I1=a O=y\n.gate SB_DFF C=a D=y Q=z\n.end\n",
    )
    .unwrap();
    let top = design.top().unwrap();
    let y = design.find_net(top, "y").unwrap();
    assert_eq!(design.net(y).connections.len(), 3);
}

#[test]
fn test_inout_port_needs_io_pin() {
    let (message, _) = wiring_error(".model top\n.inputs p\n.outputs p\n.end\n");
    assert_eq!(
        message,
        "toplevel inout port 'p' not connected to SB_IO PACKAGE_PIN"
    );
}

#[test]
fn test_inout_port_on_wrong_pin() {
    let (message, _) =
        wiring_error(".model top\n.inputs p\n.outputs p\n.gate SB_IO D_IN_0=p\n.end\n");
    assert_eq!(
        message,
        "toplevel inout port 'p' not connected to SB_IO PACKAGE_PIN"
    );
}

#[test]
fn test_inout_port_with_extra_fanout() {
    let (message, _) = wiring_error(
        ".model top\n.inputs p\n.outputs p\n.gate SB_IO PACKAGE_PIN=p\n.gate SB_LUT4 I0=p\n.end\n",
    );
    assert_eq!(
        message,
        "toplevel inout port 'p' not connected to SB_IO PACKAGE_PIN"
    );
}

#[test]
fn test_io_pin_on_internal_net_reports_the_gate() {
    let (message, lineno) = wiring_error(
        ".model top\n.inputs a\n.gate SB_LUT4 I0=a O=n\n.gate SB_IO PACKAGE_PIN=n\n.end\n",
    );
    assert_eq!(message, "SB_IO PACKAGE_PIN not connected to toplevel port");
    assert_eq!(lineno, Some(4));
}

#[test]
fn test_unconnected_io_pin() {
    let (message, lineno) =
        wiring_error(".model top\n.inputs a\n.gate SB_IO D_OUT_0=a\n.end\n");
    assert_eq!(message, "SB_IO PACKAGE_PIN not connected to toplevel port");
    assert_eq!(lineno, Some(3));
}

#[test]
fn test_boundary_net_is_exempt_from_driver_count() {
    // Both the input port and the I/O pad drive the pad net.
    let design = parse_blif_str(
        "wiring.blif",
        r#".model top
.inputs pad
.outputs led
.gate SB_IO PACKAGE_PIN=pad D_IN_0=d
.param PIN_TYPE 000001
.gate SB_LUT4 I0=d O=led
.end
"#,
    )
    .unwrap();
    let top = design.top().unwrap();
    let pad = design.find_net(top, "pad").unwrap();
    assert_eq!(design.net(pad).connections.len(), 2);
}

#[test]
fn test_bidirectional_pad() {
    let design = parse_blif_str(
        "wiring.blif",
        r#".model top
.inputs pad en o
.outputs pad i
.gate SB_IO PACKAGE_PIN=pad OUTPUT_ENABLE=en D_OUT_0=o D_IN_0=i
.end
"#,
    )
    .unwrap();
    let top = design.top().unwrap();
    assert_eq!(design.model_instances(top).len(), 1);
}

#[test]
fn test_configured_io_model() {
    let text = ".model top\n.inputs p\n.outputs p\n.gate SB_GB_IO PACKAGE_PIN=p\n.end\n";
    assert!(parse_blif_str("wiring.blif", text).is_err());

    let options = BlifOptions {
        io_model: "SB_GB_IO".to_string(),
        ..BlifOptions::default()
    };
    let design =
        parse_blif_from_reader_with_options("wiring.blif", text.as_bytes(), &options).unwrap();
    assert_eq!(design.model_name(design.top().unwrap()), "top");
}

#[test]
fn test_unknown_io_model_is_a_config_error() {
    let options = BlifOptions {
        io_model: "SB_NOPE".to_string(),
        ..BlifOptions::default()
    };
    let text = ".model top\n.inputs p\n.outputs p\n.gate SB_IO PACKAGE_PIN=p\n.end\n";
    let e = parse_blif_from_reader_with_options("wiring.blif", text.as_bytes(), &options)
        .unwrap_err();
    assert_eq!(e.kind, BlifErrorKind::Config);
    assert_eq!(e.pos, None);
    assert_eq!(e.to_string(), "wiring.blif: fatal error: unknown I/O model `SB_NOPE'");

    let options = BlifOptions {
        io_pin: "PAD".to_string(),
        ..BlifOptions::default()
    };
    let e = parse_blif_from_reader_with_options("wiring.blif", text.as_bytes(), &options)
        .unwrap_err();
    assert_eq!(e.kind, BlifErrorKind::Config);
    assert_eq!(e.message, "I/O model `SB_IO' has no pin `PAD'");
}
