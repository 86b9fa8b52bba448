use super::{
    annotation::Annotation,
    attribute_decl::{AttributeDeclaration, AttributeUse},
    error::XsdError,
    values::{element_children, required_attribute},
};
use roxmltree::Node;

/// Schema Component: Attribute Group Definition (§3.6)
#[derive(Clone, Debug)]
pub struct AttributeGroupDefinition {
    pub name: String,
    pub attribute_uses: Vec<AttributeUse>,
}

impl AttributeGroupDefinition {
    pub const TAG_NAME: &'static str = "attributeGroup";

    pub fn map_from_xml(attribute_group: Node) -> Result<Self, XsdError> {
        let name = required_attribute(attribute_group, "name")?;

        let mut attribute_uses = Vec::new();
        for child in element_children(attribute_group) {
            match child.tag_name().name() {
                // Attribute wildcards do not become fields
                Annotation::TAG_NAME | "anyAttribute" => {}
                AttributeDeclaration::TAG_NAME | Self::TAG_NAME => {
                    attribute_uses.extend(AttributeUse::map_from_xml(child)?);
                }
                _ => return Err(XsdError::unexpected(attribute_group, child)),
            }
        }

        Ok(Self {
            name,
            attribute_uses,
        })
    }
}
