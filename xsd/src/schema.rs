use super::{
    annotation::Annotation,
    attribute_decl::AttributeDeclaration,
    attribute_group_def::AttributeGroupDefinition,
    complex_type_def::ComplexTypeDefinition,
    element_decl::ElementDeclaration,
    error::XsdError,
    model_group_def::ModelGroupDefinition,
    simple_type_def::SimpleTypeDefinition,
    values::{attribute, element_children, required_attribute},
};
use indexmap::{map::Entry, IndexMap};
use roxmltree::Node;

/// Schema Component: Schema (§3.17)
///
/// Top-level components are keyed by local name and kept in declaration order, which is the
/// order code is generated in.
#[derive(Clone, Debug, Default)]
pub struct Schema {
    pub target_namespace: Option<String>,
    pub simple_type_definitions: IndexMap<String, SimpleTypeDefinition>,
    pub complex_type_definitions: IndexMap<String, ComplexTypeDefinition>,
    pub element_declarations: IndexMap<String, ElementDeclaration>,
    pub attribute_declarations: IndexMap<String, AttributeDeclaration>,
    pub attribute_group_definitions: IndexMap<String, AttributeGroupDefinition>,
    pub model_group_definitions: IndexMap<String, ModelGroupDefinition>,
}

fn insert_unique<T>(
    map: &mut IndexMap<String, T>,
    kind: &'static str,
    name: String,
    value: T,
) -> Result<(), XsdError> {
    match map.entry(name) {
        Entry::Occupied(entry) => Err(XsdError::DuplicateComponent {
            kind,
            name: entry.key().clone(),
        }),
        Entry::Vacant(entry) => {
            entry.insert(value);
            Ok(())
        }
    }
}

impl Schema {
    pub const TAG_NAME: &'static str = "schema";

    pub fn map_from_xml(schema: Node) -> Result<Self, XsdError> {
        if schema.tag_name().name() != Self::TAG_NAME {
            return Err(XsdError::NotASchema(schema.tag_name().name().to_string()));
        }

        let mut this = Self {
            target_namespace: attribute(schema, "targetNamespace")?,
            ..Default::default()
        };

        for child in element_children(schema) {
            match child.tag_name().name() {
                Annotation::TAG_NAME => {}
                SimpleTypeDefinition::TAG_NAME => {
                    let definition = SimpleTypeDefinition::map_from_xml(child)?;
                    let name = required_attribute(child, "name")?;
                    insert_unique(
                        &mut this.simple_type_definitions,
                        "type definition",
                        name,
                        definition,
                    )?;
                }
                ComplexTypeDefinition::TAG_NAME => {
                    let definition = ComplexTypeDefinition::map_from_xml(child)?;
                    let name = required_attribute(child, "name")?;
                    insert_unique(
                        &mut this.complex_type_definitions,
                        "type definition",
                        name,
                        definition,
                    )?;
                }
                ElementDeclaration::TAG_NAME => {
                    let declaration = ElementDeclaration::map_from_xml(child)?;
                    insert_unique(
                        &mut this.element_declarations,
                        "element declaration",
                        declaration.name.clone(),
                        declaration,
                    )?;
                }
                AttributeDeclaration::TAG_NAME => {
                    let declaration = AttributeDeclaration::map_from_xml(child)?;
                    insert_unique(
                        &mut this.attribute_declarations,
                        "attribute declaration",
                        declaration.name.clone(),
                        declaration,
                    )?;
                }
                AttributeGroupDefinition::TAG_NAME => {
                    let definition = AttributeGroupDefinition::map_from_xml(child)?;
                    insert_unique(
                        &mut this.attribute_group_definitions,
                        "attribute group definition",
                        definition.name.clone(),
                        definition,
                    )?;
                }
                ModelGroupDefinition::TAG_NAME => {
                    let definition = ModelGroupDefinition::map_from_xml(child)?;
                    insert_unique(
                        &mut this.model_group_definitions,
                        "model group definition",
                        definition.name.clone(),
                        definition,
                    )?;
                }
                "notation" => {
                    tracing::debug!("skipping notation declaration");
                }
                // Composition of schema documents is not supported; the schema is mapped as a
                // single document.
                other @ ("import" | "include" | "redefine" | "override" | "defaultOpenContent") => {
                    return Err(XsdError::Unsupported(other.to_string()))
                }
                _ => return Err(XsdError::unexpected(schema, child)),
            }
        }

        // Simple and complex type definitions share one symbol space (§3.17.2)
        if let Some(name) = this
            .simple_type_definitions
            .keys()
            .find(|name| this.complex_type_definitions.contains_key(*name))
        {
            return Err(XsdError::DuplicateComponent {
                kind: "type definition",
                name: name.clone(),
            });
        }

        tracing::debug!(
            simple_types = this.simple_type_definitions.len(),
            complex_types = this.complex_type_definitions.len(),
            elements = this.element_declarations.len(),
            "mapped schema"
        );
        Ok(this)
    }

    pub fn simple_type(&self, name: &str) -> Option<&SimpleTypeDefinition> {
        self.simple_type_definitions.get(name)
    }

    pub fn complex_type(&self, name: &str) -> Option<&ComplexTypeDefinition> {
        self.complex_type_definitions.get(name)
    }

    pub fn element(&self, name: &str) -> Option<&ElementDeclaration> {
        self.element_declarations.get(name)
    }

    pub fn attribute(&self, name: &str) -> Option<&AttributeDeclaration> {
        self.attribute_declarations.get(name)
    }

    pub fn attribute_group(&self, name: &str) -> Option<&AttributeGroupDefinition> {
        self.attribute_group_definitions.get(name)
    }

    pub fn model_group(&self, name: &str) -> Option<&ModelGroupDefinition> {
        self.model_group_definitions.get(name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn map(source: &str) -> Result<Schema, XsdError> {
        let document = roxmltree::Document::parse(source).unwrap();
        Schema::map_from_xml(document.root_element())
    }

    #[test]
    fn keeps_declaration_order() {
        let schema = map(
            r#"<xs:schema xmlns:xs="http://www.w3.org/2001/XMLSchema" targetNamespace="urn:t">
                <xs:element name="Zeta" type="xs:string"/>
                <xs:simpleType name="Color">
                    <xs:restriction base="xs:string"><xs:enumeration value="red"/></xs:restriction>
                </xs:simpleType>
                <xs:element name="Alpha" type="xs:string"/>
                <xs:group name="Items"><xs:sequence><xs:any/></xs:sequence></xs:group>
                <xs:attributeGroup name="Common"><xs:attribute name="Id"/></xs:attributeGroup>
            </xs:schema>"#,
        )
        .unwrap();

        assert_eq!(schema.target_namespace.as_deref(), Some("urn:t"));
        assert_eq!(
            schema.element_declarations.keys().collect::<Vec<_>>(),
            vec!["Zeta", "Alpha"]
        );
        assert!(schema.simple_type("Color").is_some());
        assert!(schema.model_group("Items").is_some());
        assert!(schema.attribute_group("Common").is_some());
    }

    #[test]
    fn rejects_duplicates() {
        let result = map(
            r#"<xs:schema xmlns:xs="http://www.w3.org/2001/XMLSchema">
                <xs:element name="A"/>
                <xs:element name="A"/>
            </xs:schema>"#,
        );
        assert!(matches!(
            result,
            Err(XsdError::DuplicateComponent { name, .. }) if name == "A"
        ));

        let result = map(
            r#"<xs:schema xmlns:xs="http://www.w3.org/2001/XMLSchema">
                <xs:simpleType name="T"><xs:restriction base="xs:string"/></xs:simpleType>
                <xs:complexType name="T"/>
            </xs:schema>"#,
        );
        assert!(matches!(result, Err(XsdError::DuplicateComponent { .. })));
    }

    #[test]
    fn rejects_composition() {
        let result = map(
            r#"<xs:schema xmlns:xs="http://www.w3.org/2001/XMLSchema">
                <xs:include schemaLocation="other.xsd"/>
            </xs:schema>"#,
        );
        assert!(matches!(result, Err(XsdError::Unsupported(name)) if name == "include"));
    }

    #[test]
    fn rejects_other_documents() {
        assert!(matches!(
            map("<root/>"),
            Err(XsdError::NotASchema(name)) if name == "root"
        ));
    }
}
