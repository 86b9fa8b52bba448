use super::{
    annotation::Annotation,
    complex_type_def::ComplexTypeDefinition,
    error::XsdError,
    shared::TypeName,
    simple_type_def::SimpleTypeDefinition,
    values::{attribute, element_children, required_attribute},
    xstypes::QName,
};
use roxmltree::Node;

/// Schema Component: Element Declaration, a kind of Term (§3.3)
#[derive(Clone, Debug)]
pub struct ElementDeclaration {
    pub name: String,
    pub documentation: Option<String>,
    pub type_definition: ElementType,
    pub is_abstract: bool,
}

/// The {type definition} of an element declaration.
#[derive(Clone, Debug)]
pub enum ElementType {
    Named(TypeName),
    Simple(SimpleTypeDefinition),
    Complex(ComplexTypeDefinition),
    /// Neither a `type` attribute nor an inline definition: the ur-type `xs:anyType`.
    Any,
}

impl ElementDeclaration {
    pub const TAG_NAME: &'static str = "element";

    pub fn map_from_xml(element: Node) -> Result<Self, XsdError> {
        let name = required_attribute(element, "name")?;
        let documentation = Annotation::documentation_of(element);
        let is_abstract = attribute(element, "abstract")?.unwrap_or(false);

        if let Some(group) = element.attribute("substitutionGroup") {
            tracing::warn!(element = %name, group, "substitution groups are not expanded");
        }

        let type_definition = if let Some(type_name) = attribute::<QName>(element, "type")? {
            match TypeName::from(type_name) {
                name if name.is_any_type() => ElementType::Any,
                name => ElementType::Named(name),
            }
        } else {
            let mut type_definition = ElementType::Any;
            for child in element_children(element) {
                match child.tag_name().name() {
                    SimpleTypeDefinition::TAG_NAME => {
                        type_definition =
                            ElementType::Simple(SimpleTypeDefinition::map_from_xml(child)?);
                    }
                    ComplexTypeDefinition::TAG_NAME => {
                        type_definition =
                            ElementType::Complex(ComplexTypeDefinition::map_from_xml(child)?);
                    }
                    // Identity constraints do not affect the generated types
                    Annotation::TAG_NAME | "unique" | "key" | "keyref" | "alternative" => {}
                    _ => return Err(XsdError::unexpected(element, child)),
                }
            }
            type_definition
        };

        Ok(Self {
            name,
            documentation,
            type_definition,
            is_abstract,
        })
    }
}
