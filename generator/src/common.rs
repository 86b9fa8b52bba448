use crate::{
    catalog::{EnumId, FieldType, Primitive, TypeCatalog},
    enums::EnumDescriptor,
    error::Error,
};
use syn::{parse_quote, Attribute};
use xsd::{
    simple_type_def::Restriction, ComplexTypeDefinition, ElementDeclaration, Schema,
    SimpleTypeDefinition, SimpleTypeRef, TypeName, Variety,
};

pub(crate) trait ComponentVisitor {
    fn visit_simple_type(
        &mut self,
        ctx: &mut GeneratorContext,
        simple_type: &SimpleTypeDefinition,
    ) -> Result<(), Error>;

    fn visit_complex_type(
        &mut self,
        ctx: &mut GeneratorContext,
        complex_type: &ComplexTypeDefinition,
    ) -> Result<(), Error>;

    fn visit_element_declaration(
        &mut self,
        ctx: &mut GeneratorContext,
        element: &ElementDeclaration,
    ) -> Result<(), Error>;
}

/// Where an enum synthesized from an anonymous restriction gets its name, and which struct owns
/// its parse helpers.
#[derive(Clone, Debug)]
pub(crate) struct EnumTarget {
    pub(crate) preferred: String,
    pub(crate) alternative: Option<String>,
    pub(crate) owner: Option<String>,
}

impl EnumTarget {
    pub(crate) fn shared(name: &str) -> Self {
        Self {
            preferred: name.to_string(),
            alternative: None,
            owner: None,
        }
    }
}

/// State of one generator run.
pub(crate) struct GeneratorContext<'a> {
    pub(crate) schema: &'a Schema,
    pub(crate) catalog: TypeCatalog,
    pub(crate) enums: Vec<EnumDescriptor>,
    /// Definitions currently being expanded, innermost last.
    in_progress: Vec<(&'static str, String)>,
}

impl<'a> GeneratorContext<'a> {
    pub(crate) fn new(schema: &'a Schema) -> Self {
        Self {
            schema,
            catalog: TypeCatalog::default(),
            enums: Vec::new(),
            in_progress: Vec::new(),
        }
    }

    /// Runs `f` with `name` marked as being expanded, failing if it already is.
    pub(crate) fn guarded<T>(
        &mut self,
        kind: &'static str,
        name: &str,
        f: impl FnOnce(&mut Self) -> Result<T, Error>,
    ) -> Result<T, Error> {
        if self
            .in_progress
            .iter()
            .any(|(in_kind, in_name)| *in_kind == kind && in_name == name)
        {
            return Err(Error::CircularDefinition {
                kind,
                name: name.to_string(),
            });
        }
        self.in_progress.push((kind, name.to_string()));
        let result = f(self);
        self.in_progress.pop();
        result
    }

    pub(crate) fn add_enum(&mut self, descriptor: EnumDescriptor) -> EnumId {
        tracing::debug!(enumeration = %descriptor.name, owner = ?descriptor.owner, "synthesized");
        self.enums.push(descriptor);
        self.enums.len() - 1
    }

    pub(crate) fn resolve_type_name(&mut self, name: &TypeName) -> Result<FieldType, Error> {
        match name {
            TypeName::Builtin(local_name) => {
                Ok(FieldType::Primitive(Primitive::from_builtin(local_name)))
            }
            TypeName::Schema(local_name) => self.resolve_named_simple(local_name),
        }
    }

    /// Resolves a top-level simple type, synthesizing its enum the first time it is needed.
    pub(crate) fn resolve_named_simple(&mut self, name: &str) -> Result<FieldType, Error> {
        if let Some(field_type) = self.catalog.simple_type(name) {
            return Ok(field_type);
        }
        let schema = self.schema;
        let Some(definition) = schema.simple_type(name) else {
            if schema.complex_type(name).is_some() {
                return Err(Error::Unsupported(format!(
                    "complex type {name:?} where a simple type is expected"
                )));
            }
            return Err(Error::UnknownReference {
                kind: "simple type",
                name: name.to_string(),
            });
        };

        let field_type = self.guarded("simple type", name, |ctx| {
            ctx.resolve_simple_type(definition, EnumTarget::shared(name))
        })?;
        self.catalog.insert_simple_type(name, field_type);
        Ok(field_type)
    }

    pub(crate) fn resolve_simple_ref(
        &mut self,
        simple_type: &SimpleTypeRef,
        target: EnumTarget,
    ) -> Result<FieldType, Error> {
        match simple_type {
            SimpleTypeRef::Named(name) => self.resolve_type_name(name),
            SimpleTypeRef::Inline(definition) => self.resolve_simple_type(definition, target),
        }
    }

    pub(crate) fn resolve_simple_type(
        &mut self,
        definition: &SimpleTypeDefinition,
        target: EnumTarget,
    ) -> Result<FieldType, Error> {
        match &definition.variety {
            Variety::Restriction(restriction) => {
                self.resolve_restriction(restriction, definition.documentation.clone(), target)
            }
            Variety::List(list) => {
                let item_type = self.resolve_simple_ref(&list.item_type, target)?;
                let FieldType::Enum(id) = item_type else {
                    return Err(Error::Unsupported(
                        "lists whose item type is not an enumeration".into(),
                    ));
                };
                self.enums[id].promote_to_flags()?;
                Ok(item_type)
            }
            Variety::Union(union) => {
                let Some(first) = union.member_types.first() else {
                    return Err(Error::Unsupported("unions without member types".into()));
                };
                if union.member_types.len() > 1 {
                    tracing::warn!(
                        union = ?definition.name,
                        members = union.member_types.len(),
                        "only the first member type of a union is used"
                    );
                }
                self.resolve_simple_ref(first, target)
            }
        }
    }

    /// Enumerations become an enum named after `target`; other restrictions take their base type.
    pub(crate) fn resolve_restriction(
        &mut self,
        restriction: &Restriction,
        documentation: Option<String>,
        target: EnumTarget,
    ) -> Result<FieldType, Error> {
        let has_enumerations = !restriction.enumerations.is_empty();
        if has_enumerations && !restriction.patterns.is_empty() {
            return Err(Error::Unsupported(
                "restrictions mixing pattern and enumeration facets".into(),
            ));
        }
        if restriction.patterns.len() > 1 {
            return Err(Error::Unsupported(
                "restrictions with more than one pattern facet".into(),
            ));
        }
        if !restriction.other_facets.is_empty() {
            tracing::debug!(facets = ?restriction.other_facets, "ignoring facets");
        }

        if has_enumerations {
            let name = self
                .catalog
                .reserve(&target.preferred, target.alternative.as_deref());
            let descriptor = EnumDescriptor::new(
                name,
                documentation,
                &restriction.enumerations,
                false,
                target.owner,
            )?;
            return Ok(FieldType::Enum(self.add_enum(descriptor)));
        }
        self.resolve_simple_ref(&restriction.base, target)
    }
}

/// `#[doc]` attributes for schema documentation, one per line.
pub(crate) fn doc_attrs(documentation: Option<&str>) -> Vec<Attribute> {
    documentation
        .into_iter()
        .flat_map(str::lines)
        .map(|line| {
            let line = if line.is_empty() {
                String::new()
            } else {
                format!(" {line}")
            };
            parse_quote!(#[doc = #line])
        })
        .collect()
}
