use std::{env, path::PathBuf, process::ExitCode};

const SCHEMA: &str = "schemas/sample.xsd";

fn main() -> ExitCode {
    println!("cargo:rerun-if-changed={SCHEMA}");

    let Some(out_dir) = env::var_os("OUT_DIR") else {
        println!("cargo:warning=OUT_DIR is not set");
        return ExitCode::FAILURE;
    };
    let options = xsdgen::Options {
        namespace: Some("sample".into()),
        ..Default::default()
    };
    match xsdgen::generate_file(SCHEMA, PathBuf::from(out_dir).join("sample.rs"), &options) {
        Ok(()) => ExitCode::SUCCESS,
        Err(error) => {
            println!("cargo:warning=generating code for {SCHEMA} failed: {error}");
            ExitCode::FAILURE
        }
    }
}
