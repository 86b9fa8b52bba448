use super::{
    annotation::Annotation,
    error::XsdError,
    model_group::{Compositor, ModelGroup},
    values::{element_children, required_attribute},
};
use roxmltree::Node;

/// Schema Component: Model Group Definition (§3.7)
#[derive(Clone, Debug)]
pub struct ModelGroupDefinition {
    pub name: String,
    pub documentation: Option<String>,
    pub model_group: ModelGroup,
}

impl ModelGroupDefinition {
    pub const TAG_NAME: &'static str = "group";

    pub fn map_from_xml(group: Node) -> Result<Self, XsdError> {
        let name = required_attribute(group, "name")?;
        let documentation = Annotation::documentation_of(group);

        let model_group = element_children(group)
            .find(|child| Compositor::from_tag_name(child.tag_name().name()).is_some())
            .ok_or_else(|| XsdError::MissingContent {
                element: Self::TAG_NAME.into(),
                expected: "<all>, <choice> or <sequence>",
            })
            .and_then(ModelGroup::map_from_xml)?;

        Ok(Self {
            name,
            documentation,
            model_group,
        })
    }
}
