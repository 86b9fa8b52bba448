use super::{
    annotation::Annotation,
    attribute_decl::{AttributeDeclaration, AttributeUse},
    error::XsdError,
    model_group::Compositor,
    particle::Particle,
    shared::TypeName,
    simple_type_def::Restriction,
    values::{attribute, element_children, required_attribute},
    xstypes::QName,
};
use roxmltree::Node;

/// Schema Component: Complex Type Definition (§3.4)
#[derive(Clone, Debug)]
pub struct ComplexTypeDefinition {
    /// Absent for anonymous definitions.
    pub name: Option<String>,
    pub documentation: Option<String>,
    pub is_abstract: bool,
    pub mixed: bool,
    pub content_type: ContentType,
    /// Declared directly on this definition; inherited uses are collected by following
    /// [ContentType::Extension] and [SimpleContent::Extension] bases.
    pub attribute_uses: Vec<AttributeUse>,
}

#[derive(Clone, Debug)]
pub enum ContentType {
    Empty,
    /// Element-only (or mixed, see [ComplexTypeDefinition::mixed]) content.
    Particle(Particle),
    Simple(SimpleContent),
    /// `<complexContent><extension>`: the base type's content followed by `particle`.
    Extension {
        base: TypeName,
        particle: Option<Particle>,
    },
}

#[derive(Clone, Debug)]
pub enum SimpleContent {
    Extension(TypeName),
    Restriction(Restriction),
}

impl ComplexTypeDefinition {
    pub const TAG_NAME: &'static str = "complexType";

    pub fn map_from_xml(complex_type: Node) -> Result<Self, XsdError> {
        let name = attribute(complex_type, "name")?;
        let documentation = Annotation::documentation_of(complex_type);
        let is_abstract = attribute(complex_type, "abstract")?.unwrap_or(false);
        let mut mixed = attribute(complex_type, "mixed")?.unwrap_or(false);

        let mut content = ContentMapping::default();
        for child in element_children(complex_type) {
            match child.tag_name().name() {
                Annotation::TAG_NAME => {}
                "simpleContent" => {
                    let derivation = Self::derivation(child)?;
                    let simple_content = match derivation.tag_name().name() {
                        "extension" => SimpleContent::Extension(Self::base(derivation)?),
                        _ => SimpleContent::Restriction(Restriction::map_from_xml(derivation)?),
                    };
                    content.content_type = Some(ContentType::Simple(simple_content));
                    content.map_children(derivation)?;
                }
                "complexContent" => {
                    if let Some(complex_mixed) = attribute(child, "mixed")? {
                        mixed = complex_mixed;
                    }
                    let derivation = Self::derivation(child)?;
                    let base = Self::base(derivation)?;
                    content.map_children(derivation)?;
                    let particle = content.particle.take();
                    content.content_type = Some(match derivation.tag_name().name() {
                        "extension" if !base.is_any_type() => {
                            ContentType::Extension { base, particle }
                        }
                        // A restriction restates the content in full
                        _ => particle.map_or(ContentType::Empty, ContentType::Particle),
                    });
                }
                "openContent" | "assert" => {
                    return Err(XsdError::Unsupported(child.tag_name().name().to_string()))
                }
                _ => content.map_child(complex_type, child)?,
            }
        }

        let content_type = match (content.content_type, content.particle) {
            (Some(content_type), _) => content_type,
            (None, Some(particle)) => ContentType::Particle(particle),
            (None, None) => ContentType::Empty,
        };

        Ok(Self {
            name,
            documentation,
            is_abstract,
            mixed,
            content_type,
            attribute_uses: content.attribute_uses,
        })
    }

    /// The single `<extension>` or `<restriction>` inside `<simpleContent>`/`<complexContent>`.
    fn derivation<'a, 'input>(content: Node<'a, 'input>) -> Result<Node<'a, 'input>, XsdError> {
        element_children(content)
            .find(|child| matches!(child.tag_name().name(), "extension" | "restriction"))
            .ok_or_else(|| XsdError::MissingContent {
                element: content.tag_name().name().to_string(),
                expected: "<extension> or <restriction>",
            })
    }

    fn base(derivation: Node) -> Result<TypeName, XsdError> {
        required_attribute::<QName>(derivation, "base").map(TypeName::from)
    }
}

#[derive(Default)]
struct ContentMapping {
    content_type: Option<ContentType>,
    particle: Option<Particle>,
    attribute_uses: Vec<AttributeUse>,
}

impl ContentMapping {
    fn map_children(&mut self, parent: Node) -> Result<(), XsdError> {
        for child in element_children(parent) {
            match child.tag_name().name() {
                // Facets and inline types are handled by Restriction
                "simpleType" | "enumeration" | "pattern" => {}
                name if is_facet(name) => {}
                _ => self.map_child(parent, child)?,
            }
        }
        Ok(())
    }

    fn map_child(&mut self, parent: Node, child: Node) -> Result<(), XsdError> {
        match child.tag_name().name() {
            // Attribute wildcards do not become fields
            Annotation::TAG_NAME | "anyAttribute" => {}
            AttributeDeclaration::TAG_NAME | "attributeGroup" => {
                self.attribute_uses.extend(AttributeUse::map_from_xml(child)?);
            }
            "group" => self.particle = Some(Particle::map_from_xml(child, parent)?),
            name if Compositor::from_tag_name(name).is_some() => {
                self.particle = Some(Particle::map_from_xml(child, parent)?);
            }
            _ => return Err(XsdError::unexpected(parent, child)),
        }
        Ok(())
    }
}

fn is_facet(name: &str) -> bool {
    matches!(
        name,
        "length"
            | "minLength"
            | "maxLength"
            | "whiteSpace"
            | "maxInclusive"
            | "maxExclusive"
            | "minInclusive"
            | "minExclusive"
            | "totalDigits"
            | "fractionDigits"
            | "explicitTimezone"
            | "assertion"
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::particle::{MaxOccurs, Term};

    fn map(source: &str) -> ComplexTypeDefinition {
        let document = roxmltree::Document::parse(source).unwrap();
        ComplexTypeDefinition::map_from_xml(document.root_element()).unwrap()
    }

    #[test]
    fn element_only_content() {
        let complex_type = map(
            r#"<xs:complexType name="Pair" xmlns:xs="http://www.w3.org/2001/XMLSchema">
                <xs:choice maxOccurs="unbounded">
                    <xs:element name="Foo"/>
                    <xs:element name="Bar"/>
                </xs:choice>
                <xs:attribute name="Id" type="xs:ID" use="required"/>
                <xs:attribute name="Gone" type="xs:string" use="prohibited"/>
                <xs:anyAttribute/>
            </xs:complexType>"#,
        );
        assert_eq!(complex_type.name.as_deref(), Some("Pair"));
        assert_eq!(complex_type.attribute_uses.len(), 1);
        let ContentType::Particle(particle) = &complex_type.content_type else {
            panic!("expected element-only content");
        };
        assert_eq!(particle.max_occurs, MaxOccurs::Unbounded);
        assert!(matches!(particle.term, Term::ModelGroup(_)));
    }

    #[test]
    fn simple_content_extension() {
        let complex_type = map(
            r#"<xs:complexType xmlns:xs="http://www.w3.org/2001/XMLSchema">
                <xs:simpleContent>
                    <xs:extension base="xs:decimal">
                        <xs:attribute name="Unit" type="xs:string"/>
                    </xs:extension>
                </xs:simpleContent>
            </xs:complexType>"#,
        );
        assert!(matches!(
            &complex_type.content_type,
            ContentType::Simple(SimpleContent::Extension(TypeName::Builtin(name))) if name == "decimal"
        ));
        assert_eq!(complex_type.attribute_uses.len(), 1);
    }

    #[test]
    fn simple_content_restriction_keeps_facets() {
        let complex_type = map(
            r#"<xs:complexType xmlns:xs="http://www.w3.org/2001/XMLSchema" xmlns:t="urn:t">
                <xs:simpleContent>
                    <xs:restriction base="t:Measure">
                        <xs:enumeration value="small"/>
                        <xs:enumeration value="large"/>
                        <xs:attribute name="Unit" type="xs:string"/>
                    </xs:restriction>
                </xs:simpleContent>
            </xs:complexType>"#,
        );
        let ContentType::Simple(SimpleContent::Restriction(restriction)) =
            &complex_type.content_type
        else {
            panic!("expected a simple content restriction");
        };
        assert_eq!(restriction.enumerations.len(), 2);
        assert_eq!(complex_type.attribute_uses.len(), 1);
    }

    #[test]
    fn complex_content_extension() {
        let complex_type = map(
            r#"<xs:complexType mixed="true" xmlns:xs="http://www.w3.org/2001/XMLSchema" xmlns:t="urn:t">
                <xs:complexContent>
                    <xs:extension base="t:Base">
                        <xs:sequence>
                            <xs:element name="Extra" type="xs:string"/>
                        </xs:sequence>
                        <xs:attributeGroup ref="t:Common"/>
                    </xs:extension>
                </xs:complexContent>
            </xs:complexType>"#,
        );
        assert!(complex_type.mixed);
        assert!(matches!(
            &complex_type.content_type,
            ContentType::Extension { base: TypeName::Schema(base), particle: Some(_) } if base == "Base"
        ));
        assert!(matches!(
            &complex_type.attribute_uses[..],
            [AttributeUse::GroupReference(name)] if name == "Common"
        ));
    }

    #[test]
    fn restriction_of_any_type_is_plain_content() {
        let complex_type = map(
            r#"<xs:complexType xmlns:xs="http://www.w3.org/2001/XMLSchema">
                <xs:complexContent>
                    <xs:restriction base="xs:anyType">
                        <xs:sequence><xs:element name="A"/></xs:sequence>
                    </xs:restriction>
                </xs:complexContent>
            </xs:complexType>"#,
        );
        assert!(matches!(complex_type.content_type, ContentType::Particle(_)));
    }
}
