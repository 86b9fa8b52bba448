use std::{io, path::PathBuf};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error("failed to read schema from {path}")]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("failed to write generated code to {path}")]
    Write {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error(transparent)]
    Schema(#[from] xsd::XsdError),

    #[error("xsdgen does not understand {0}")]
    Unsupported(String),

    #[error("{kind} {name:?} is referenced but not declared")]
    UnknownReference { kind: &'static str, name: String },

    #[error("{kind} {name:?} is defined in terms of itself")]
    CircularDefinition { kind: &'static str, name: String },

    #[error("flags enumeration {name} has {count} members, at most 32 fit")]
    TooManyFlags { name: String, count: usize },

    #[error("{0:?} is not a valid Rust path for the runtime crate")]
    InvalidCommonNamespace(String),
}
