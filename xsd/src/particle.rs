use super::{
    element_decl::ElementDeclaration,
    error::XsdError,
    model_group::{Compositor, ModelGroup},
    values::attribute,
    xstypes::QName,
};
use roxmltree::Node;
use std::fmt;

/// Schema Component: Particle (§3.9)
#[derive(Clone, Debug)]
pub struct Particle {
    pub min_occurs: u64,
    pub max_occurs: MaxOccurs,
    pub term: Term,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum MaxOccurs {
    Unbounded,
    Count(u64),
}

impl MaxOccurs {
    pub const ONE: Self = Self::Count(1);

    pub fn mul(self, other: Self) -> Self {
        match (self, other) {
            (Self::Count(0), _) | (_, Self::Count(0)) => Self::Count(0),
            (Self::Unbounded, _) | (_, Self::Unbounded) => Self::Unbounded,
            (Self::Count(a), Self::Count(b)) => Self::Count(a.saturating_mul(b)),
        }
    }

    pub fn as_count(self) -> Option<u64> {
        match self {
            Self::Unbounded => None,
            Self::Count(count) => Some(count),
        }
    }
}

impl fmt::Display for MaxOccurs {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Unbounded => f.write_str("unbounded"),
            Self::Count(count) => write!(f, "{count}"),
        }
    }
}

/// What a particle contains (§2.2.3.2). References are kept by local name and resolved against
/// the top-level components of the [Schema](super::Schema) when generating code.
#[derive(Clone, Debug)]
pub enum Term {
    Element(Box<ElementDeclaration>),
    ElementReference(String),
    ModelGroup(ModelGroup),
    GroupReference(String),
    Wildcard,
}

impl Particle {
    /// Maps one of `<element>`, `<group>`, `<all>`, `<choice>`, `<sequence>` or `<any>` appearing
    /// inside `parent`.
    pub fn map_from_xml(particle: Node, parent: Node) -> Result<Self, XsdError> {
        let min_occurs = attribute(particle, "minOccurs")?.unwrap_or(1);
        let max_occurs = match particle.attribute("maxOccurs") {
            None => MaxOccurs::ONE,
            Some("unbounded") => MaxOccurs::Unbounded,
            Some(_) => MaxOccurs::Count(attribute(particle, "maxOccurs")?.unwrap_or(1)),
        };

        let term = match particle.tag_name().name() {
            ElementDeclaration::TAG_NAME => match attribute::<QName>(particle, "ref")? {
                Some(name) => Term::ElementReference(name.local_name),
                None => Term::Element(Box::new(ElementDeclaration::map_from_xml(particle)?)),
            },
            "group" => match attribute::<QName>(particle, "ref")? {
                Some(name) => Term::GroupReference(name.local_name),
                None => return Err(XsdError::unexpected(parent, particle)),
            },
            "any" => Term::Wildcard,
            name if Compositor::from_tag_name(name).is_some() => {
                Term::ModelGroup(ModelGroup::map_from_xml(particle)?)
            }
            _ => return Err(XsdError::unexpected(parent, particle)),
        };

        Ok(Self {
            min_occurs,
            max_occurs,
            term,
        })
    }

    /// Whether the particle can never occur and thus contributes nothing.
    pub fn is_prohibited(&self) -> bool {
        self.max_occurs == MaxOccurs::Count(0)
    }
}
