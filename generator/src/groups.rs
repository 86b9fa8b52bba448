use crate::{
    classes::ClassOrigin,
    common::GeneratorContext,
    error::Error,
    naming::name_to_ident,
    rust::RustVisitor,
};
use proc_macro2::{Span, TokenStream};
use quote::quote;
use syn::{parse_quote, Arm, Expr, LitInt};
use xsd::{
    ElementDeclaration, ElementType, MaxOccurs, ModelGroup, Particle, Term, TypeName,
};

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub(crate) enum Compositor {
    Sequence,
    Choice,
}

/// Child membership of a parent struct, mirroring its content model.
///
/// Every maximum is effective: already multiplied by the maxima of the enclosing groups.
#[derive(Clone, Debug)]
pub(crate) struct Membership {
    pub(crate) compositor: Compositor,
    pub(crate) min_occurs: u64,
    pub(crate) max_occurs: MaxOccurs,
    pub(crate) slots: Vec<Slot>,
}

#[derive(Clone, Debug)]
pub(crate) enum Slot {
    Element {
        xml_name: String,
        rust_name: String,
        max_occurs: MaxOccurs,
    },
    Any {
        max_occurs: MaxOccurs,
    },
    Group(Membership),
}

fn usize_literal(value: u64) -> LitInt {
    LitInt::new(&value.to_string(), Span::call_site())
}

fn max_tokens(max_occurs: MaxOccurs) -> TokenStream {
    match max_occurs.as_count() {
        Some(count) => {
            let count = usize_literal(count);
            quote!(Some(#count))
        }
        None => quote!(None),
    }
}

impl Membership {
    /// Membership of elements named anything, for content of type `xs:anyType`.
    pub(crate) fn wildcard() -> Self {
        Self {
            compositor: Compositor::Sequence,
            min_occurs: 1,
            max_occurs: MaxOccurs::ONE,
            slots: vec![Slot::Any {
                max_occurs: MaxOccurs::Unbounded,
            }],
        }
    }

    /// Builds the `meta::ElementCollection` this membership starts out as.
    pub(crate) fn collection_expr(&self) -> Expr {
        let constructor = match self.compositor {
            Compositor::Sequence => quote!(sequence),
            Compositor::Choice => quote!(choice),
        };
        let min_occurs = usize_literal(self.min_occurs);
        let max_occurs = max_tokens(self.max_occurs);
        let slots = self.slots.iter().map(|slot| match slot {
            Slot::Element {
                xml_name,
                max_occurs,
                ..
            } => {
                let max_occurs = max_tokens(*max_occurs);
                quote!(.with_element(#xml_name, #max_occurs))
            }
            Slot::Any { max_occurs } => {
                let max_occurs = max_tokens(*max_occurs);
                quote!(.with_any(#max_occurs))
            }
            Slot::Group(membership) => {
                let collection = membership.collection_expr();
                quote!(.with_collection(#collection))
            }
        });
        parse_quote! {
            meta::ElementCollection::#constructor(#min_occurs, #max_occurs)
                #(#slots)*
        }
    }

    /// Element slots at any depth, in declaration order, each XML name once.
    pub(crate) fn element_slots(&self) -> Vec<(&str, &str)> {
        let mut found = Vec::new();
        self.collect_element_slots(&mut found);
        found
    }

    fn collect_element_slots<'a>(&'a self, found: &mut Vec<(&'a str, &'a str)>) {
        for slot in &self.slots {
            match slot {
                Slot::Element {
                    xml_name,
                    rust_name,
                    ..
                } => {
                    if !found.iter().any(|(known, _)| known == xml_name) {
                        found.push((xml_name, rust_name));
                    }
                }
                Slot::Any { .. } => {}
                Slot::Group(membership) => membership.collect_element_slots(found),
            }
        }
    }

    /// The `create_child` arms constructing every declared child.
    pub(crate) fn create_arms(&self) -> Vec<Arm> {
        self.element_slots()
            .into_iter()
            .map(|(xml_name, rust_name)| {
                let rust_name = name_to_ident(rust_name);
                parse_quote! {
                    #xml_name => Ok(meta::into_element_ref(#rust_name::new())),
                }
            })
            .collect()
    }
}

/// A particle of a content model, with the named complex type whose definition declares it.
pub(crate) type DeclaredParticle = (Particle, Option<String>);

impl RustVisitor {
    /// Membership for the particles a complex type accumulated along its derivation chain.
    pub(crate) fn membership_of(
        &mut self,
        ctx: &mut GeneratorContext,
        particles: Vec<DeclaredParticle>,
        owner: &str,
    ) -> Result<Option<Membership>, Error> {
        let particles = particles
            .into_iter()
            .filter(|(particle, _)| !particle.is_prohibited())
            .collect::<Vec<_>>();
        if particles.is_empty() {
            return Ok(None);
        }
        if let [(particle, declared_in)] = particles.as_slice() {
            if let Term::ModelGroup(group) = &particle.term {
                return self
                    .build_membership(
                        ctx,
                        group,
                        particle.min_occurs,
                        particle.max_occurs,
                        declared_in.as_deref(),
                        owner,
                    )
                    .map(Some);
            }
        }

        let mut slots = Vec::with_capacity(particles.len());
        for (particle, declared_in) in &particles {
            self.push_slot(
                ctx,
                particle,
                MaxOccurs::ONE,
                declared_in.as_deref(),
                owner,
                &mut slots,
            )?;
        }
        Ok(Some(Membership {
            compositor: Compositor::Sequence,
            min_occurs: 1,
            max_occurs: MaxOccurs::ONE,
            slots,
        }))
    }

    fn build_membership(
        &mut self,
        ctx: &mut GeneratorContext,
        group: &ModelGroup,
        min_occurs: u64,
        max_occurs: MaxOccurs,
        declared_in: Option<&str>,
        owner: &str,
    ) -> Result<Membership, Error> {
        let mut slots = Vec::with_capacity(group.particles.len());
        for particle in &group.particles {
            self.push_slot(ctx, particle, max_occurs, declared_in, owner, &mut slots)?;
        }

        let compositor = match group.compositor {
            xsd::Compositor::Choice => Compositor::Choice,
            xsd::Compositor::Sequence | xsd::Compositor::All => Compositor::Sequence,
        };
        Ok(Membership {
            compositor,
            min_occurs,
            max_occurs,
            slots,
        })
    }

    /// Appends the slot for `particle`, whose enclosing groups allow at most `max_occurs`.
    fn push_slot(
        &mut self,
        ctx: &mut GeneratorContext,
        particle: &Particle,
        max_occurs: MaxOccurs,
        declared_in: Option<&str>,
        owner: &str,
        slots: &mut Vec<Slot>,
    ) -> Result<(), Error> {
        if particle.is_prohibited() {
            return Ok(());
        }
        let schema = ctx.schema;
        let effective_max = particle.max_occurs.mul(max_occurs);
        match &particle.term {
            Term::Element(declaration) => {
                let rust_name = self.local_element(ctx, declaration, declared_in, owner)?;
                slots.push(Slot::Element {
                    xml_name: declaration.name.clone(),
                    rust_name,
                    max_occurs: effective_max,
                });
            }
            Term::ElementReference(name) => {
                let rust_name = ctx
                    .catalog
                    .element(name)
                    .ok_or_else(|| Error::UnknownReference {
                        kind: "element",
                        name: name.clone(),
                    })?
                    .to_string();
                slots.push(Slot::Element {
                    xml_name: name.clone(),
                    rust_name,
                    max_occurs: effective_max,
                });
            }
            Term::ModelGroup(inner) => {
                slots.push(Slot::Group(self.build_membership(
                    ctx,
                    inner,
                    particle.min_occurs,
                    effective_max,
                    declared_in,
                    owner,
                )?));
            }
            Term::GroupReference(name) => {
                let definition =
                    schema
                        .model_group(name)
                        .ok_or_else(|| Error::UnknownReference {
                            kind: "group",
                            name: name.clone(),
                        })?;
                let membership = ctx.guarded("group", name, |ctx| {
                    self.build_membership(
                        ctx,
                        &definition.model_group,
                        particle.min_occurs,
                        effective_max,
                        declared_in,
                        owner,
                    )
                })?;
                slots.push(Slot::Group(membership));
            }
            Term::Wildcard => slots.push(Slot::Any {
                max_occurs: effective_max,
            }),
        }
        Ok(())
    }

    /// Struct for an element declared inside a content model.
    ///
    /// Named types share one struct per (element name, type) pair. An element with an inline
    /// type gets one struct per declaring complex type, however many structs that type's
    /// content model is expanded into.
    fn local_element(
        &mut self,
        ctx: &mut GeneratorContext,
        declaration: &ElementDeclaration,
        declared_in: Option<&str>,
        owner: &str,
    ) -> Result<String, Error> {
        let type_key = match &declaration.type_definition {
            ElementType::Named(type_name) => Some(type_name.to_string()),
            _ => None,
        };
        let cached = match (&type_key, declared_in) {
            (Some(type_key), _) => ctx.catalog.typed_local_element(&declaration.name, type_key),
            (None, Some(declared_in)) => {
                ctx.catalog.inline_local_element(declared_in, &declaration.name)
            }
            (None, None) => None,
        };
        if let Some(rust_name) = cached {
            return Ok(rust_name.to_string());
        }

        let owner = declared_in
            .and_then(|name| ctx.catalog.complex_type(name))
            .map_or_else(|| owner.to_string(), |entry| entry.rust_name.clone());
        let alternative = format!("{owner}{}", declaration.name);
        let rust_name = ctx.catalog.reserve(&declaration.name, Some(&alternative));
        match (&type_key, declared_in) {
            (Some(type_key), _) => {
                ctx.catalog
                    .insert_typed_local_element(&declaration.name, type_key, &rust_name)
            }
            (None, Some(declared_in)) => {
                ctx.catalog
                    .insert_inline_local_element(declared_in, &declaration.name, &rust_name)
            }
            (None, None) => {}
        }
        tracing::debug!(element = %declaration.name, %owner, rust_name, "local element");
        self.build_element_class(ctx, declaration, &rust_name, ClassOrigin::LocalElement)?;
        Ok(rust_name)
    }
}

/// Whether `type_name` is known to name a complex type of `ctx`'s schema.
pub(crate) fn is_complex(ctx: &GeneratorContext, type_name: &TypeName) -> bool {
    matches!(type_name, TypeName::Schema(name) if ctx.schema.complex_type(name).is_some())
}

#[cfg(test)]
mod tests {
    use super::*;
    use quote::ToTokens;

    #[test]
    fn collection_code() {
        let membership = Membership {
            compositor: Compositor::Sequence,
            min_occurs: 1,
            max_occurs: MaxOccurs::ONE,
            slots: vec![
                Slot::Element {
                    xml_name: "Title".into(),
                    rust_name: "Title".into(),
                    max_occurs: MaxOccurs::ONE,
                },
                Slot::Group(Membership {
                    compositor: Compositor::Choice,
                    min_occurs: 1,
                    max_occurs: MaxOccurs::Unbounded,
                    slots: vec![Slot::Element {
                        xml_name: "Foo".into(),
                        rust_name: "Foo".into(),
                        max_occurs: MaxOccurs::Unbounded,
                    }],
                }),
                Slot::Any {
                    max_occurs: MaxOccurs::Unbounded,
                },
            ],
        };
        assert_eq!(
            membership.collection_expr().to_token_stream().to_string(),
            quote! {
                meta::ElementCollection::sequence(1, Some(1))
                    .with_element("Title", Some(1))
                    .with_collection(
                        meta::ElementCollection::choice(1, None).with_element("Foo", None)
                    )
                    .with_any(None)
            }
            .to_string()
        );
    }

    #[test]
    fn create_arms_skip_repeated_names() {
        let slot = |name: &str| Slot::Element {
            xml_name: name.into(),
            rust_name: name.into(),
            max_occurs: MaxOccurs::ONE,
        };
        let membership = Membership {
            compositor: Compositor::Sequence,
            min_occurs: 1,
            max_occurs: MaxOccurs::ONE,
            slots: vec![
                slot("A"),
                Slot::Group(Membership {
                    compositor: Compositor::Choice,
                    min_occurs: 1,
                    max_occurs: MaxOccurs::ONE,
                    slots: vec![slot("B"), slot("A")],
                }),
                Slot::Any {
                    max_occurs: MaxOccurs::ONE,
                },
            ],
        };
        assert_eq!(membership.element_slots(), vec![("A", "A"), ("B", "B")]);
        assert_eq!(membership.create_arms().len(), 2);
    }
}
