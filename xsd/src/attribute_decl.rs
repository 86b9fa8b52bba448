use super::{
    annotation::Annotation,
    error::XsdError,
    simple_type_def::SimpleTypeRef,
    values::{attribute, required_attribute},
    xstypes::QName,
};
use roxmltree::Node;

/// Schema Component: Attribute Declaration (§3.2)
#[derive(Clone, Debug)]
pub struct AttributeDeclaration {
    pub name: String,
    pub documentation: Option<String>,
    /// Absent means `xs:anySimpleType`.
    pub type_definition: Option<SimpleTypeRef>,
    pub default: Option<String>,
    pub fixed: Option<String>,
}

/// An entry of a complex type's or attribute group's attribute list (§3.5, §3.6).
#[derive(Clone, Debug)]
pub enum AttributeUse {
    Declaration {
        declaration: AttributeDeclaration,
        required: bool,
    },
    Reference {
        name: String,
        required: bool,
    },
    GroupReference(String),
}

impl AttributeDeclaration {
    pub const TAG_NAME: &'static str = "attribute";

    pub fn map_from_xml(attribute_node: Node) -> Result<Self, XsdError> {
        Ok(Self {
            name: required_attribute(attribute_node, "name")?,
            documentation: Annotation::documentation_of(attribute_node),
            type_definition: SimpleTypeRef::map_from_xml(attribute_node, "type")?,
            default: attribute(attribute_node, "default")?,
            fixed: attribute(attribute_node, "fixed")?,
        })
    }
}

impl AttributeUse {
    /// Maps an `<attribute>` or `<attributeGroup ref>` child of a complex type, an extension or an
    /// attribute group. Prohibited attributes yield `None`.
    pub fn map_from_xml(node: Node) -> Result<Option<Self>, XsdError> {
        match node.tag_name().name() {
            AttributeDeclaration::TAG_NAME => {
                let required = match node.attribute("use") {
                    Some("prohibited") => return Ok(None),
                    Some("required") => true,
                    _ => false,
                };
                let attribute_use = match attribute::<QName>(node, "ref")? {
                    Some(name) => Self::Reference {
                        name: name.local_name,
                        required,
                    },
                    None => Self::Declaration {
                        declaration: AttributeDeclaration::map_from_xml(node)?,
                        required,
                    },
                };
                Ok(Some(attribute_use))
            }
            "attributeGroup" => {
                let name: QName = required_attribute(node, "ref")?;
                Ok(Some(Self::GroupReference(name.local_name)))
            }
            other => Err(XsdError::Unsupported(other.to_string())),
        }
    }
}
