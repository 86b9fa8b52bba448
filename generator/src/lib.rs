//! Generates Rust element types from an XML Schema.
//!
//! Every top-level element, named complex type and local element of the schema becomes a struct
//! implementing the capabilities of `xsdgen_runtime`; enumerations become enums (or flags types
//! for lists of enumerations). The output is one self-contained module, meant to be written to a
//! file and compiled with the runtime crate as a dependency.

mod catalog;
mod classes;
mod common;
mod enums;
mod error;
mod fields;
mod groups;
mod naming;
mod rust;

pub use error::Error;

use std::{fs, path::Path};
use syn::{parse_quote, Attribute, Item};

const DEFAULT_RUNTIME_PATH: &str = "::xsdgen_runtime";

#[derive(Clone, Debug, Default)]
pub struct Options {
    /// Dot-separated module path the generated items are nested in.
    pub namespace: Option<String>,
    /// Path of the runtime crate, imported as `meta`; `::xsdgen_runtime` if not given.
    pub common_namespace: Option<String>,
    /// Accept a document type definition in the schema document.
    pub allow_dtd: bool,
}

/// Generates the Rust source for the schema in `schema_text`.
pub fn generate(schema_text: &str, options: &Options) -> Result<String, Error> {
    let schema = xsd::read_schema(schema_text, options.allow_dtd)?;
    let items = rust::generate_items(&schema)?;
    render(items, options)
}

/// Generates the Rust source for the schema at `schema_path` and writes it to `output_path`.
///
/// The output file is only touched once generation has succeeded.
pub fn generate_file(
    schema_path: impl AsRef<Path>,
    output_path: impl AsRef<Path>,
    options: &Options,
) -> Result<(), Error> {
    let schema_path = schema_path.as_ref();
    let output_path = output_path.as_ref();
    let text = fs::read_to_string(schema_path).map_err(|source| Error::Read {
        path: schema_path.to_path_buf(),
        source,
    })?;
    let code = generate(&text, options)?;
    fs::write(output_path, code).map_err(|source| Error::Write {
        path: output_path.to_path_buf(),
        source,
    })?;
    tracing::info!(
        schema = %schema_path.display(),
        output = %output_path.display(),
        "wrote generated code"
    );
    Ok(())
}

fn runtime_path(common_namespace: Option<&str>) -> Result<syn::Path, Error> {
    let Some(common_namespace) = common_namespace else {
        return syn::parse_str(DEFAULT_RUNTIME_PATH)
            .map_err(|_| Error::InvalidCommonNamespace(DEFAULT_RUNTIME_PATH.into()));
    };
    syn::parse_str(&common_namespace.replace('.', "::"))
        .map_err(|_| Error::InvalidCommonNamespace(common_namespace.into()))
}

fn render(items: Vec<Item>, options: &Options) -> Result<String, Error> {
    let runtime = runtime_path(options.common_namespace.as_deref())?;
    let doc_comment = concat!(
        " Generated by ",
        env!("CARGO_PKG_NAME"),
        " ",
        env!("CARGO_PKG_VERSION")
    );
    let attrs: Vec<Attribute> = vec![
        parse_quote!(#![doc = #doc_comment]),
        parse_quote!(#![allow(
            dead_code,
            unused_imports,
            unused_variables,
            unreachable_patterns,
            non_camel_case_types,
            non_snake_case,
            clippy::all
        )]),
    ];

    let mut content: Vec<Item> = vec![
        parse_quote!(use #runtime as meta;),
        parse_quote!(use std::{any::Any, cell::RefCell, rc::{Rc, Weak}};),
    ];
    content.extend(items);

    let modules = options
        .namespace
        .as_deref()
        .map(naming::module_path)
        .unwrap_or_default();
    let file = match modules.split_last() {
        None => syn::File {
            shebang: None,
            attrs,
            items: content,
        },
        Some((innermost, outer)) => {
            // Inner attributes go inside the module so the file can be pulled in with `include!`
            let mut item: Item = parse_quote! {
                pub mod #innermost {
                    #(#attrs)*
                    #(#content)*
                }
            };
            for module in outer.iter().rev() {
                item = parse_quote! {
                    pub mod #module {
                        #item
                    }
                };
            }
            syn::File {
                shebang: None,
                attrs: Vec::new(),
                items: vec![item],
            }
        }
    };
    Ok(prettyplease::unparse(&file))
}
