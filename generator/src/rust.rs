use crate::{
    catalog::{FieldType, Primitive, ENUMS_CONTAINER},
    classes::{ClassDescriptor, ClassOrigin, TraitDescriptor},
    common::{ComponentVisitor, EnumTarget, GeneratorContext},
    error::Error,
    fields::{AttributeScope, EmitContext, FieldDescriptor},
    groups::{is_complex, DeclaredParticle, Membership},
    naming::name_to_ident,
};
use quote::quote;
use std::collections::{HashMap, HashSet};
use syn::{parse_quote, Ident, ImplItemFn, Item};
use xsd::{
    simple_type_def::Restriction, ComplexTypeDefinition, ContentType, ElementDeclaration,
    ElementType, Schema, SimpleContent, SimpleTypeDefinition, SimpleTypeRef, TypeName,
};

const STRING: FieldType = FieldType::Primitive(Primitive::String);

/// Catalog key under which a simple-content restriction's enum is cached.
const CONTENT_KEY: &str = "Content";

#[derive(Default)]
pub(crate) struct RustVisitor {
    classes: Vec<ClassDescriptor>,
    traits: Vec<TraitDescriptor>,
}

impl RustVisitor {
    fn type_scope(ctx: &GeneratorContext, type_name: &str) -> Result<AttributeScope, Error> {
        let entry = ctx
            .catalog
            .complex_type(type_name)
            .ok_or_else(|| Error::UnknownReference {
                kind: "complex type",
                name: type_name.to_string(),
            })?;
        Ok(AttributeScope::of_type(
            type_name,
            &entry.rust_name,
            entry.is_abstract,
        ))
    }

    /// Builds the struct for an element declaration and everything it needs.
    pub(crate) fn build_element_class(
        &mut self,
        ctx: &mut GeneratorContext,
        declaration: &ElementDeclaration,
        rust_name: &str,
        origin: ClassOrigin,
    ) -> Result<(), Error> {
        tracing::debug!(element = %declaration.name, rust_name, ?origin, "building struct");
        let schema = ctx.schema;
        let mut class = ClassDescriptor::new(
            rust_name,
            &declaration.name,
            declaration.documentation.clone(),
            origin,
        );
        class.registered = !declaration.is_abstract;

        let mut particles = Vec::new();
        match &declaration.type_definition {
            ElementType::Any => {
                class.content = Some(FieldDescriptor::content(STRING));
                class.membership = Some(Membership::wildcard());
            }
            ElementType::Named(type_name) if is_complex(ctx, type_name) => {
                let local_name = type_name.local_name();
                let definition =
                    schema
                        .complex_type(local_name)
                        .ok_or_else(|| Error::UnknownReference {
                            kind: "complex type",
                            name: local_name.to_string(),
                        })?;
                if class.documentation.is_none() {
                    class.documentation = definition.documentation.clone();
                }
                let scope = Self::type_scope(ctx, local_name)?;
                self.expand_complex_type(ctx, definition, &scope, &mut class, &mut particles)?;
            }
            ElementType::Named(type_name) => {
                let ty = ctx.resolve_type_name(type_name)?;
                class.content = Some(FieldDescriptor::content(ty));
            }
            ElementType::Simple(definition) => {
                let target = EnumTarget {
                    preferred: format!("{rust_name}Type"),
                    alternative: None,
                    owner: Some(rust_name.to_string()),
                };
                let ty = ctx.resolve_simple_type(definition, target)?;
                class.content = Some(FieldDescriptor::content(ty));
            }
            ElementType::Complex(definition) => {
                let scope = AttributeScope::of_struct(rust_name);
                self.expand_complex_type(ctx, definition, &scope, &mut class, &mut particles)?;
            }
        }

        if class.membership.is_none() {
            class.membership = self.membership_of(ctx, particles, rust_name)?;
        }
        self.classes.push(class);
        Ok(())
    }

    /// Adds what `definition` contributes to `class`: base type contributions first, then its
    /// own content and attributes. Particles are collected for the caller to turn into a
    /// membership once the derivation chain is done.
    fn expand_complex_type(
        &mut self,
        ctx: &mut GeneratorContext,
        definition: &ComplexTypeDefinition,
        scope: &AttributeScope,
        class: &mut ClassDescriptor,
        particles: &mut Vec<DeclaredParticle>,
    ) -> Result<(), Error> {
        if definition.is_abstract {
            let marker = definition
                .name
                .as_deref()
                .and_then(|name| ctx.catalog.complex_type(name))
                .map(|entry| entry.rust_name.clone());
            if let Some(marker) = marker {
                if !class.traits.contains(&marker) {
                    class.traits.push(marker);
                }
            }
        }

        match &definition.content_type {
            ContentType::Empty => {}
            ContentType::Particle(particle) => {
                particles.push((particle.clone(), definition.name.clone()));
            }
            ContentType::Extension { base, particle } => {
                self.expand_base(ctx, base, class, particles)?;
                particles.extend(
                    particle
                        .iter()
                        .map(|particle| (particle.clone(), definition.name.clone())),
                );
            }
            ContentType::Simple(SimpleContent::Extension(base)) => {
                if is_complex(ctx, base) {
                    self.expand_base(ctx, base, class, particles)?;
                } else {
                    let ty = ctx.resolve_type_name(base)?;
                    class.content = Some(FieldDescriptor::content(ty));
                }
            }
            ContentType::Simple(SimpleContent::Restriction(restriction)) => {
                let complex_base = match &restriction.base {
                    SimpleTypeRef::Named(base) if is_complex(ctx, base) => Some(base),
                    _ => None,
                };
                if let Some(base) = complex_base {
                    self.expand_base(ctx, base, class, particles)?;
                }
                if complex_base.is_none() || !restriction.enumerations.is_empty() {
                    let ty = Self::restricted_content(ctx, restriction, scope)?;
                    class.content = Some(FieldDescriptor::content(ty));
                }
            }
        }

        ctx.collect_attributes(&definition.attribute_uses, scope, &mut class.fields)?;
        if definition.mixed && class.content.is_none() {
            class.content = Some(FieldDescriptor::content(STRING));
        }
        Ok(())
    }

    fn expand_base(
        &mut self,
        ctx: &mut GeneratorContext,
        base: &TypeName,
        class: &mut ClassDescriptor,
        particles: &mut Vec<DeclaredParticle>,
    ) -> Result<(), Error> {
        let TypeName::Schema(name) = base else {
            return Err(Error::Unsupported(format!(
                "complex content derived from the built-in type {base}"
            )));
        };
        let schema = ctx.schema;
        let definition = schema
            .complex_type(name)
            .ok_or_else(|| Error::UnknownReference {
                kind: "complex type",
                name: name.clone(),
            })?;
        let scope = Self::type_scope(ctx, name)?;
        ctx.guarded("base type", name, |ctx| {
            self.expand_complex_type(ctx, definition, &scope, class, particles)
        })
    }

    /// Type of the text content of a simple-content restriction, an enum if it enumerates.
    fn restricted_content(
        ctx: &mut GeneratorContext,
        restriction: &Restriction,
        scope: &AttributeScope,
    ) -> Result<FieldType, Error> {
        if let Some(ty) = ctx.catalog.attribute_type(&scope.key, CONTENT_KEY) {
            return Ok(ty);
        }
        let target = EnumTarget {
            preferred: format!("{}Content", scope.name),
            alternative: None,
            owner: scope.owner.clone(),
        };
        let ty = ctx.resolve_restriction(restriction, None, target)?;
        ctx.catalog
            .insert_attribute_type(&scope.key, CONTENT_KEY, ty);
        Ok(ty)
    }

    fn emit(self, ctx: &GeneratorContext, namespace: Option<&str>) -> Vec<Item> {
        let class_names = self
            .classes
            .iter()
            .map(|class| class.name.as_str())
            .collect::<HashSet<_>>();
        // Helpers of an enum whose owner did not become a struct go to the shared container
        let owners = ctx
            .enums
            .iter()
            .map(|descriptor| {
                descriptor
                    .owner
                    .as_deref()
                    .filter(|owner| class_names.contains(owner))
            })
            .collect::<Vec<_>>();
        let container = name_to_ident(ENUMS_CONTAINER);
        let helper_homes = owners
            .iter()
            .map(|owner| owner.map_or_else(|| container.clone(), name_to_ident))
            .collect::<Vec<Ident>>();
        let emit = EmitContext {
            enums: &ctx.enums,
            helper_homes: &helper_homes,
            namespace,
        };

        let mut items = Vec::new();
        let mut shared_helpers = Vec::<ImplItemFn>::new();
        let mut owned_helpers = HashMap::<&str, Vec<ImplItemFn>>::new();
        for (descriptor, owner) in ctx.enums.iter().zip(&owners) {
            items.extend(descriptor.items());
            match *owner {
                Some(owner) => owned_helpers
                    .entry(owner)
                    .or_default()
                    .extend(descriptor.helpers()),
                None => shared_helpers.extend(descriptor.helpers()),
            }
        }
        if !shared_helpers.is_empty() {
            items.push(parse_quote! {
                /// Parse helpers of the enumerations no single struct owns.
                pub struct #container;
            });
            items.push(parse_quote! {
                impl #container {
                    #(#shared_helpers)*
                }
            });
        }

        items.extend(self.traits.iter().map(TraitDescriptor::item));
        for class in &self.classes {
            let helpers = owned_helpers
                .remove(class.name.as_str())
                .unwrap_or_default();
            items.extend(class.items(&emit, helpers));
        }
        items.push(registry_item(&self.classes));
        items
    }
}

impl ComponentVisitor for RustVisitor {
    fn visit_simple_type(
        &mut self,
        ctx: &mut GeneratorContext,
        simple_type: &SimpleTypeDefinition,
    ) -> Result<(), Error> {
        if let Some(name) = &simple_type.name {
            tracing::debug!(simple_type = %name, "resolving");
            ctx.resolve_named_simple(name)?;
        }
        Ok(())
    }

    fn visit_complex_type(
        &mut self,
        ctx: &mut GeneratorContext,
        complex_type: &ComplexTypeDefinition,
    ) -> Result<(), Error> {
        let Some(name) = complex_type.name.as_deref() else {
            return Ok(());
        };
        let scope = Self::type_scope(ctx, name)?;
        if complex_type.is_abstract {
            tracing::debug!(complex_type = name, "marker trait");
            self.traits.push(TraitDescriptor {
                name: scope.name,
                documentation: complex_type.documentation.clone(),
            });
            return Ok(());
        }

        tracing::debug!(complex_type = name, rust_name = %scope.name, "building struct");
        let mut class = ClassDescriptor::new(
            &scope.name,
            name,
            complex_type.documentation.clone(),
            ClassOrigin::ComplexType,
        );
        let mut particles = Vec::new();
        self.expand_complex_type(ctx, complex_type, &scope, &mut class, &mut particles)?;
        class.membership = self.membership_of(ctx, particles, &scope.name)?;
        self.classes.push(class);
        Ok(())
    }

    fn visit_element_declaration(
        &mut self,
        ctx: &mut GeneratorContext,
        element: &ElementDeclaration,
    ) -> Result<(), Error> {
        let rust_name = ctx
            .catalog
            .element(&element.name)
            .ok_or_else(|| Error::UnknownReference {
                kind: "element",
                name: element.name.clone(),
            })?
            .to_string();
        self.build_element_class(ctx, element, &rust_name, ClassOrigin::TopLevelElement)
    }
}

/// `registry()`, listing top-level elements, then local elements, then complex types.
fn registry_item(classes: &[ClassDescriptor]) -> Item {
    let mut registered = classes
        .iter()
        .filter(|class| class.registered)
        .collect::<Vec<_>>();
    registered.sort_by_key(|class| class.origin);
    let entries = registered.iter().map(|class| {
        let ident = name_to_ident(&class.name);
        let xml_name = &class.xml_name;
        let type_name = &class.name;
        quote!(.with(#xml_name, #type_name, || meta::into_element_ref(#ident::new())))
    });
    parse_quote! {
        /// Factories for every instantiable struct of this module, for use with [meta::Loader].
        pub fn registry() -> meta::Registry {
            meta::Registry::new()
                #(#entries)*
        }
    }
}

/// Walks `schema` in three passes (simple types, complex types, top-level elements) and
/// returns the items of the generated module.
pub(crate) fn generate_items(schema: &Schema) -> Result<Vec<Item>, Error> {
    let mut ctx = GeneratorContext::new(schema);
    let mut visitor = RustVisitor::default();

    for simple_type in schema.simple_type_definitions.values() {
        visitor.visit_simple_type(&mut ctx, simple_type)?;
    }

    // Names first, so that content models may refer to types and elements declared later
    for (name, complex_type) in &schema.complex_type_definitions {
        ctx.catalog
            .declare_complex_type(name, complex_type.is_abstract);
    }
    for name in schema.element_declarations.keys() {
        ctx.catalog.declare_element(name);
    }

    for complex_type in schema.complex_type_definitions.values() {
        visitor.visit_complex_type(&mut ctx, complex_type)?;
    }
    for element in schema.element_declarations.values() {
        visitor.visit_element_declaration(&mut ctx, element)?;
    }

    tracing::info!(
        structs = visitor.classes.len(),
        traits = visitor.traits.len(),
        enums = ctx.enums.len(),
        "schema processed"
    );
    Ok(visitor.emit(&ctx, schema.target_namespace.as_deref()))
}
