//! Element types generated from `schemas/sample.xsd` at build time.
//!
//! The crate has no code of its own; its tests check that generated code compiles against
//! `xsdgen_runtime` and behaves as documented.

include!(concat!(env!("OUT_DIR"), "/sample.rs"));
