use super::{
    annotation::Annotation,
    error::XsdError,
    shared::TypeName,
    values::{attribute, element_children, required_attribute},
    xstypes::QName,
};
use roxmltree::Node;

/// Schema Component: Simple Type Definition (§3.16)
#[derive(Clone, Debug)]
pub struct SimpleTypeDefinition {
    /// Absent for anonymous definitions.
    pub name: Option<String>,
    pub documentation: Option<String>,
    pub variety: Variety,
}

#[derive(Clone, Debug)]
pub enum Variety {
    Restriction(Restriction),
    List(List),
    Union(Union),
}

/// Either a named type definition or one declared inline.
#[derive(Clone, Debug)]
pub enum SimpleTypeRef {
    Named(TypeName),
    Inline(Box<SimpleTypeDefinition>),
}

#[derive(Clone, Debug)]
pub struct Restriction {
    pub base: SimpleTypeRef,
    pub enumerations: Vec<Enumeration>,
    pub patterns: Vec<String>,
    /// Names of the constraining facets that code generation does not act on (`maxLength`, ...).
    pub other_facets: Vec<String>,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Enumeration {
    pub value: String,
    pub documentation: Option<String>,
}

#[derive(Clone, Debug)]
pub struct List {
    pub item_type: SimpleTypeRef,
}

#[derive(Clone, Debug)]
pub struct Union {
    pub member_types: Vec<SimpleTypeRef>,
}

const IGNORED_FACETS: &[&str] = &[
    "length",
    "minLength",
    "maxLength",
    "whiteSpace",
    "maxInclusive",
    "maxExclusive",
    "minInclusive",
    "minExclusive",
    "totalDigits",
    "fractionDigits",
    "explicitTimezone",
    "assertion",
];

/// Children of a `<restriction>` inside `<simpleContent>` that are not facets.
const ATTRIBUTE_DECLARATIONS: &[&str] = &["attribute", "attributeGroup", "anyAttribute"];

impl SimpleTypeDefinition {
    pub const TAG_NAME: &'static str = "simpleType";

    pub fn map_from_xml(simple_type: Node) -> Result<Self, XsdError> {
        let name = attribute(simple_type, "name")?;
        let documentation = Annotation::documentation_of(simple_type);

        let mut variety = None;
        for child in element_children(simple_type) {
            let mapped = match child.tag_name().name() {
                Annotation::TAG_NAME => continue,
                Restriction::TAG_NAME => Variety::Restriction(Restriction::map_from_xml(child)?),
                List::TAG_NAME => Variety::List(List::map_from_xml(child)?),
                Union::TAG_NAME => Variety::Union(Union::map_from_xml(child)?),
                _ => return Err(XsdError::unexpected(simple_type, child)),
            };
            if variety.replace(mapped).is_some() {
                return Err(XsdError::unexpected(simple_type, child));
            }
        }

        let variety = variety.ok_or_else(|| XsdError::MissingContent {
            element: Self::TAG_NAME.into(),
            expected: "<restriction>, <list> or <union>",
        })?;

        Ok(Self {
            name,
            documentation,
            variety,
        })
    }

    /// The enumeration facets, if this is a restriction carrying any.
    pub fn enumerations(&self) -> Option<&[Enumeration]> {
        match &self.variety {
            Variety::Restriction(restriction) if !restriction.enumerations.is_empty() => {
                Some(&restriction.enumerations)
            }
            _ => None,
        }
    }
}

impl SimpleTypeRef {
    /// Maps the type given either by the attribute `attribute_name` of `node` or by an inline
    /// `<simpleType>` child; `None` if neither is present.
    pub(crate) fn map_from_xml(node: Node, attribute_name: &str) -> Result<Option<Self>, XsdError> {
        if let Some(name) = attribute::<QName>(node, attribute_name)? {
            return Ok(Some(Self::Named(name.into())));
        }
        element_children(node)
            .find(|child| child.tag_name().name() == SimpleTypeDefinition::TAG_NAME)
            .map(|child| SimpleTypeDefinition::map_from_xml(child).map(|st| Self::Inline(Box::new(st))))
            .transpose()
    }
}

impl Restriction {
    pub const TAG_NAME: &'static str = "restriction";

    pub fn map_from_xml(restriction: Node) -> Result<Self, XsdError> {
        let base = SimpleTypeRef::map_from_xml(restriction, "base")?.ok_or_else(|| {
            XsdError::MissingAttribute {
                element: Self::TAG_NAME.into(),
                attribute: "base".into(),
            }
        })?;

        let mut enumerations = Vec::new();
        let mut patterns = Vec::new();
        let mut other_facets = Vec::new();
        for child in element_children(restriction) {
            match child.tag_name().name() {
                Annotation::TAG_NAME | SimpleTypeDefinition::TAG_NAME => {}
                "enumeration" => enumerations.push(Enumeration {
                    value: required_attribute(child, "value")?,
                    documentation: Annotation::documentation_of(child),
                }),
                "pattern" => patterns.push(required_attribute(child, "value")?),
                name if IGNORED_FACETS.contains(&name) => other_facets.push(name.to_string()),
                name if ATTRIBUTE_DECLARATIONS.contains(&name) => {}
                _ => return Err(XsdError::unexpected(restriction, child)),
            }
        }

        Ok(Self {
            base,
            enumerations,
            patterns,
            other_facets,
        })
    }
}

impl List {
    pub const TAG_NAME: &'static str = "list";

    pub fn map_from_xml(list: Node) -> Result<Self, XsdError> {
        let item_type = SimpleTypeRef::map_from_xml(list, "itemType")?.ok_or_else(|| {
            XsdError::MissingAttribute {
                element: Self::TAG_NAME.into(),
                attribute: "itemType".into(),
            }
        })?;
        Ok(Self { item_type })
    }
}

impl Union {
    pub const TAG_NAME: &'static str = "union";

    pub fn map_from_xml(union: Node) -> Result<Self, XsdError> {
        let mut member_types = attribute::<Vec<QName>>(union, "memberTypes")?
            .unwrap_or_default()
            .into_iter()
            .map(|name| SimpleTypeRef::Named(name.into()))
            .collect::<Vec<_>>();
        for child in element_children(union) {
            match child.tag_name().name() {
                Annotation::TAG_NAME => {}
                SimpleTypeDefinition::TAG_NAME => member_types.push(SimpleTypeRef::Inline(
                    Box::new(SimpleTypeDefinition::map_from_xml(child)?),
                )),
                _ => return Err(XsdError::unexpected(union, child)),
            }
        }
        Ok(Self { member_types })
    }
}
