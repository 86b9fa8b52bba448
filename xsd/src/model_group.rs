use super::{
    annotation::Annotation, error::XsdError, particle::Particle, values::element_children,
};
use roxmltree::Node;

/// Schema Component: Model Group, a kind of Term (§3.8)
#[derive(Clone, Debug)]
pub struct ModelGroup {
    pub compositor: Compositor,
    pub particles: Vec<Particle>,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Compositor {
    All,
    Choice,
    Sequence,
}

impl Compositor {
    pub fn from_tag_name(tag_name: &str) -> Option<Self> {
        match tag_name {
            "all" => Some(Self::All),
            "choice" => Some(Self::Choice),
            "sequence" => Some(Self::Sequence),
            _ => None,
        }
    }
}

impl ModelGroup {
    /// Maps an `<all>`, `<choice>` or `<sequence>` element; the occurrence bounds on it belong to
    /// the enclosing [Particle].
    pub fn map_from_xml(model_group: Node) -> Result<Self, XsdError> {
        let compositor = Compositor::from_tag_name(model_group.tag_name().name())
            .ok_or_else(|| XsdError::Unsupported(model_group.tag_name().name().to_string()))?;

        let particles = element_children(model_group)
            .filter(|child| child.tag_name().name() != Annotation::TAG_NAME)
            .map(|child| Particle::map_from_xml(child, model_group))
            .collect::<Result<_, _>>()?;

        Ok(Self {
            compositor,
            particles,
        })
    }
}
