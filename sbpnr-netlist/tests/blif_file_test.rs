// SPDX-License-Identifier: Apache-2.0

use std::io::Write;

use flate2::write::GzEncoder;
use flate2::Compression;
use pretty_assertions::assert_eq;
use sbpnr_netlist::blif::{parse_blif_from_path, BlifErrorKind};
use sbpnr_netlist::stats::read_blif_stats;

const COUNTER: &str = r#"# generated by synthesis
.model counter
.inputs clk
.outputs q0 q1
.names $false
.gate SB_LUT4 I0=q0 I1=$false I2=$false I3=$false O=d0
.param LUT_INIT 0000000000000001
.gate SB_DFF C=clk D=d0 Q=q0
.attr src "counter.v:12"
.gate SB_LUT4 I0=q0 I1=q1 \
    I2=$false I3=$false O=d1
.param LUT_INIT 0000000000000110
.gate SB_DFF C=clk D=d1 Q=q1
.end
"#;

#[test]
fn test_parse_plain_file() {
    let _ = env_logger::builder().is_test(true).try_init();
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("counter.blif");
    std::fs::write(&path, COUNTER).unwrap();

    let design = parse_blif_from_path(&path).unwrap();
    let top = design.top().unwrap();
    assert_eq!(design.model_name(top), "counter");
    assert_eq!(design.model_instances(top).len(), 4);
    let dff = design.instance(design.model_instances(top)[1]);
    assert_eq!(dff.pos.unwrap().lineno, 8);
}

#[test]
fn test_parse_gz_file() {
    let _ = env_logger::builder().is_test(true).try_init();
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("counter.blif.gz");
    let mut encoder = GzEncoder::new(std::fs::File::create(&path).unwrap(), Compression::default());
    encoder.write_all(COUNTER.as_bytes()).unwrap();
    encoder.finish().unwrap();

    let stats = read_blif_stats(&path, &Default::default()).unwrap();
    assert_eq!(stats.top, "counter");
    assert_eq!(stats.num_ports, 3);
    assert_eq!(stats.num_instances, 4);
    assert_eq!(stats.num_constant_nets, 1);
    assert_eq!(
        stats.cell_counts,
        vec![("SB_DFF".to_string(), 2), ("SB_LUT4".to_string(), 2)]
    );
}

#[test]
fn test_missing_file_reports_os_error() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("absent.blif");
    let e = parse_blif_from_path(&path).unwrap_err();
    assert_eq!(e.kind, BlifErrorKind::Io);
    assert_eq!(e.pos, None);
    let want_prefix = format!("failed to open `{}': ", path.display());
    assert!(e.message.starts_with(&want_prefix), "{}", e.message);
    assert!(e.message.len() > want_prefix.len());
}

#[test]
fn test_late_error_shows_earlier_source_line() {
    let _ = env_logger::builder().is_test(true).try_init();
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("cycle.blif.gz");
    let mut encoder = GzEncoder::new(std::fs::File::create(&path).unwrap(), Compression::default());
    encoder
        .write_all(b".model top\n.names a b\n1 1\n.names b a\n1 1\n.end\n")
        .unwrap();
    encoder.finish().unwrap();

    let e = parse_blif_from_path(&path).unwrap_err();
    assert_eq!(e.kind, BlifErrorKind::Consistency);
    assert_eq!(e.pos.unwrap().lineno, 4);
    assert_eq!(e.line_text.as_deref(), Some(".names b a"));
    assert_eq!(
        e.to_human_string(),
        format!(
            "{}:4: fatal error: .names cycle through net `a'\n    .names b a",
            path.display()
        )
    );
}
