use std::{fs, process::Command};

const SCHEMA: &str = r#"<xs:schema xmlns:xs="http://www.w3.org/2001/XMLSchema">
      <xs:element name="Note" type="xs:string"/>
    </xs:schema>"#;

const UNSUPPORTED_SCHEMA: &str = r#"<xs:schema xmlns:xs="http://www.w3.org/2001/XMLSchema">
      <xs:simpleType name="Numbers"><xs:list itemType="xs:int"/></xs:simpleType>
    </xs:schema>"#;

fn xsdgen() -> Command {
    Command::new(env!("CARGO_BIN_EXE_xsdgen"))
}

#[test]
fn missing_arguments_print_usage() {
    for args in [&[][..], &["schema.xsd", "out.rs"][..]] {
        let output = xsdgen().args(args).output().expect("failed to run");
        assert_eq!(output.status.code(), Some(0));
        let stdout = String::from_utf8_lossy(&output.stdout);
        assert!(stdout.contains("Usage:"), "stdout: {stdout}");
    }
}

#[test]
fn generates_into_output_file() {
    let directory = tempfile::tempdir().unwrap();
    let schema = directory.path().join("notes.xsd");
    let output = directory.path().join("notes.rs");
    fs::write(&schema, SCHEMA).unwrap();

    let result = xsdgen()
        .arg(&schema)
        .arg(&output)
        .arg("Notes")
        .output()
        .expect("failed to run");
    assert_eq!(
        result.status.code(),
        Some(0),
        "stdout: {}",
        String::from_utf8_lossy(&result.stdout)
    );
    let code = fs::read_to_string(&output).unwrap();
    assert!(code.contains("pub mod notes {"));
    assert!(code.contains("pub struct Note {"));
}

#[test]
fn unsupported_schemas_fail_with_the_message_on_stdout() {
    let directory = tempfile::tempdir().unwrap();
    let schema = directory.path().join("numbers.xsd");
    let output = directory.path().join("numbers.rs");
    fs::write(&schema, UNSUPPORTED_SCHEMA).unwrap();

    let result = xsdgen()
        .arg(&schema)
        .arg(&output)
        .arg("Numbers")
        .output()
        .expect("failed to run");
    assert_eq!(result.status.code(), Some(1));
    let stdout = String::from_utf8_lossy(&result.stdout);
    assert!(
        stdout.contains(
            "error: xsdgen does not understand lists whose item type is not an enumeration"
        ),
        "stdout: {stdout}"
    );
    assert!(!output.exists());
}

#[test]
fn unreadable_schemas_print_the_cause() {
    let directory = tempfile::tempdir().unwrap();
    let result = xsdgen()
        .arg(directory.path().join("missing.xsd"))
        .arg(directory.path().join("out.rs"))
        .arg("Missing")
        .output()
        .expect("failed to run");
    assert_eq!(result.status.code(), Some(1));
    let stdout = String::from_utf8_lossy(&result.stdout);
    assert!(stdout.starts_with("error: "), "stdout: {stdout}");
    assert!(stdout.contains("  caused by: "), "stdout: {stdout}");
}