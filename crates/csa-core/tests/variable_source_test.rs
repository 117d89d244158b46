//! Tests for file-backed process variable sources.

use csa_core::{Direction, Error, FileVariableSource, VariableSource};
use std::io::Write;

#[test]
fn test_file_source_reads_variables() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    writeln!(
        file,
        r#"
[[variable]]
name = "Ist/Name/dieser/int32Scalar"
direction = "control_to_device"

[[variable]]
name = "int8Scalar"
"#
    )
    .unwrap();

    let source = FileVariableSource::new(file.path());
    let vars = source.process_variables().unwrap();

    assert_eq!(vars.len(), 2);
    assert_eq!(vars[0].name, "Ist/Name/dieser/int32Scalar");
    assert_eq!(vars[0].direction, Direction::ControlToDevice);
    assert!(!vars[1].constant);
}

#[test]
fn test_missing_file_is_io_error() {
    let dir = tempfile::tempdir().unwrap();
    let source = FileVariableSource::new(dir.path().join("missing.toml"));
    assert!(matches!(source.process_variables(), Err(Error::Io(_))));
}

#[test]
fn test_malformed_file_is_parse_error() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    writeln!(file, "[[variable]\nname = ").unwrap();

    let source = FileVariableSource::new(file.path());
    assert!(matches!(source.process_variables(), Err(Error::Parse { .. })));
}
