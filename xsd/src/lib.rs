//! Model and parser for the subset of XML Schema (XSD 1.1) that xsdgen generates code from.
//!
//! The model is an owned tree: every top-level component lives in a [Schema] table keyed by its
//! local name, and references between components are kept by name.

pub mod annotation;
pub mod attribute_decl;
pub mod attribute_group_def;
pub mod builtins;
pub mod complex_type_def;
pub mod element_decl;
pub mod error;
pub mod model_group;
pub mod model_group_def;
pub mod particle;
pub mod schema;
pub mod shared;
pub mod simple_type_def;
pub mod xstypes;

mod values;

pub use attribute_decl::{AttributeDeclaration, AttributeUse};
pub use attribute_group_def::AttributeGroupDefinition;
pub use complex_type_def::{ComplexTypeDefinition, ContentType, SimpleContent};
pub use element_decl::{ElementDeclaration, ElementType};
pub use error::XsdError;
pub use model_group::{Compositor, ModelGroup};
pub use model_group_def::ModelGroupDefinition;
pub use particle::{MaxOccurs, Particle, Term};
pub use schema::Schema;
pub use shared::TypeName;
pub use simple_type_def::{Enumeration, SimpleTypeDefinition, SimpleTypeRef, Variety};
pub use xstypes::QName;

/// Parses `text` and maps its document element into a [Schema].
pub fn read_schema(text: &str, allow_dtd: bool) -> Result<Schema, XsdError> {
    let options = roxmltree::ParsingOptions {
        allow_dtd,
        ..Default::default()
    };
    let document = roxmltree::Document::parse_with_options(text, options)?;
    Schema::map_from_xml(document.root_element())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn dtd_requires_opt_in() {
        let text = r#"<?xml version="1.0"?>
            <!DOCTYPE schema [ <!ENTITY ns "urn:t"> ]>
            <schema xmlns="http://www.w3.org/2001/XMLSchema" targetNamespace="&ns;"/>"#;

        assert!(matches!(read_schema(text, false), Err(XsdError::Xml(_))));
        let schema = read_schema(text, true).unwrap();
        assert_eq!(schema.target_namespace.as_deref(), Some("urn:t"));
    }
}
