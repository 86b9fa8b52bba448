use crate::{
    common::doc_attrs,
    fields::{EmitContext, FieldDescriptor, FieldSet},
    groups::Membership,
    naming::name_to_ident,
};
use quote::quote;
use syn::{parse_quote, ImplItemFn, Item};

/// What a struct was generated for, in registry order.
#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord)]
pub(crate) enum ClassOrigin {
    TopLevelElement,
    LocalElement,
    ComplexType,
}

/// A struct to emit, with everything its impls are generated from.
#[derive(Debug)]
pub(crate) struct ClassDescriptor {
    pub(crate) name: String,
    pub(crate) origin: ClassOrigin,
    /// Local name the struct serializes as.
    pub(crate) xml_name: String,
    pub(crate) documentation: Option<String>,
    /// Text content, from simple content or `mixed`.
    pub(crate) content: Option<FieldDescriptor>,
    pub(crate) fields: FieldSet,
    pub(crate) membership: Option<Membership>,
    /// Marker traits of the abstract types this struct's type is or derives from.
    pub(crate) traits: Vec<String>,
    /// Whether the loader registry lists the struct.
    pub(crate) registered: bool,
}

/// Marker trait for an abstract complex type.
#[derive(Debug)]
pub(crate) struct TraitDescriptor {
    pub(crate) name: String,
    pub(crate) documentation: Option<String>,
}

impl TraitDescriptor {
    pub(crate) fn item(&self) -> Item {
        let name = name_to_ident(&self.name);
        let docs = doc_attrs(self.documentation.as_deref());
        parse_quote! {
            #(#docs)*
            pub trait #name: meta::Element {}
        }
    }
}

impl ClassDescriptor {
    pub(crate) fn new(
        name: &str,
        xml_name: &str,
        documentation: Option<String>,
        origin: ClassOrigin,
    ) -> Self {
        Self {
            name: name.to_string(),
            origin,
            xml_name: xml_name.to_string(),
            documentation,
            content: None,
            fields: FieldSet::new(),
            membership: None,
            traits: Vec::new(),
            registered: true,
        }
    }

    fn values(&self) -> impl Iterator<Item = &FieldDescriptor> {
        self.content.iter().chain(&self.fields.fields)
    }

    /// The struct, its inherent impl (with `helpers`) and its capability impls.
    pub(crate) fn items(&self, emit: &EmitContext, helpers: Vec<ImplItemFn>) -> Vec<Item> {
        let name = name_to_ident(&self.name);
        let xml_name = &self.xml_name;
        let docs = doc_attrs(self.documentation.as_deref());

        let value_fields = self.values().map(|field| field.struct_field(emit));
        let members = self
            .values()
            .map(|field| name_to_ident(&field.member))
            .collect::<Vec<_>>();
        let accessors = self.values().flat_map(|field| field.accessors(emit));

        let mut items = Vec::new();
        if let Some(membership) = &self.membership {
            let collection = membership.collection_expr();
            items.push(parse_quote! {
                #(#docs)*
                #[derive(Debug)]
                pub struct #name {
                    this: meta::WeakElementRef,
                    parent: Option<meta::WeakElementRef>,
                    children: meta::ElementCollection,
                    #(#value_fields)*
                }
            });
            items.push(parse_quote! {
                impl #name {
                    pub const ELEMENT_NAME: &'static str = #xml_name;

                    pub fn new() -> Rc<RefCell<Self>> {
                        Rc::new_cyclic(|this: &Weak<RefCell<Self>>| {
                            let this: meta::WeakElementRef = this.clone();
                            RefCell::new(Self {
                                this,
                                parent: None,
                                children: #collection,
                                #(#members: None,)*
                            })
                        })
                    }

                    /// Children of concrete type `T`, in document order.
                    pub fn children_of<T: meta::Element>(&self) -> Vec<meta::ElementRef> {
                        self.children.of_type::<T>()
                    }

                    #(#accessors)*

                    #(#helpers)*
                }
            });
        } else {
            items.push(parse_quote! {
                #(#docs)*
                #[derive(Debug)]
                pub struct #name {
                    parent: Option<meta::WeakElementRef>,
                    #(#value_fields)*
                }
            });
            items.push(parse_quote! {
                impl #name {
                    pub const ELEMENT_NAME: &'static str = #xml_name;

                    pub fn new() -> Rc<RefCell<Self>> {
                        Rc::new(RefCell::new(Self {
                            parent: None,
                            #(#members: None,)*
                        }))
                    }

                    #(#accessors)*

                    #(#helpers)*
                }
            });
        }

        items.push(self.element_impl(emit));
        if let Some(membership) = &self.membership {
            let arms = membership.create_arms();
            items.push(parse_quote! {
                impl meta::Parent for #name {
                    fn children(&self) -> &meta::ElementCollection {
                        &self.children
                    }

                    fn add_child(&mut self, child: meta::ElementRef) -> Result<(), meta::Error> {
                        self.children
                            .add_element(child.clone())
                            .map_err(|error| error.in_parent(Self::ELEMENT_NAME))?;
                        child.borrow_mut().set_parent(Some(self.this.clone()));
                        Ok(())
                    }

                    fn remove_child(&mut self, child: &meta::ElementRef) -> Result<(), meta::Error> {
                        self.children.remove_element(child)?;
                        child.borrow_mut().set_parent(None);
                        Ok(())
                    }
                }
            });
            items.push(parse_quote! {
                impl meta::ChildFactory for #name {
                    fn create_child(&self, name: &str) -> Result<meta::ElementRef, meta::Error> {
                        match name {
                            #(#arms)*
                            _ => Err(meta::Error::invalid_child_name(Self::ELEMENT_NAME, name)),
                        }
                    }
                }
            });
        }

        let set_arms = self.values().map(|field| field.set_arm(emit));
        items.push(parse_quote! {
            impl meta::SetAttributes for #name {
                fn set_attribute(&mut self, name: &str, value: &str) -> Result<(), meta::Error> {
                    match name {
                        #(#set_arms)*
                        _ => {}
                    }
                    Ok(())
                }
            }
        });

        for marker in &self.traits {
            let marker = name_to_ident(marker);
            items.push(parse_quote!(impl #marker for #name {}));
        }
        items
    }

    fn element_impl(&self, emit: &EmitContext) -> Item {
        let name = name_to_ident(&self.name);
        let namespace = match emit.namespace {
            Some(namespace) => quote!(Some(#namespace)),
            None => quote!(None),
        };
        let attribute_output = self.fields.fields.iter().map(|field| field.output(emit));
        let content_output = self.content.as_ref().map(|field| field.output(emit));
        let parent_impl = self.membership.as_ref().map(|_| {
            quote! {
                fn as_parent(&self) -> Option<&dyn meta::Parent> {
                    Some(self)
                }

                fn as_parent_mut(&mut self) -> Option<&mut dyn meta::Parent> {
                    Some(self)
                }

                fn as_child_factory(&self) -> Option<&dyn meta::ChildFactory> {
                    Some(self)
                }
            }
        });
        let children_output = self.membership.as_ref().map(|_| {
            quote! {
                for child in self.children.iter() {
                    child.borrow().output_xml(writer)?;
                }
            }
        });

        parse_quote! {
            impl meta::Element for #name {
                fn element_name(&self) -> &str {
                    Self::ELEMENT_NAME
                }

                fn namespace(&self) -> Option<&str> {
                    #namespace
                }

                fn parent(&self) -> Option<meta::ElementRef> {
                    self.parent.as_ref().and_then(Weak::upgrade)
                }

                fn set_parent(&mut self, parent: Option<meta::WeakElementRef>) {
                    self.parent = parent;
                }

                fn output_xml(&self, writer: &mut meta::XmlWriter) -> Result<(), meta::Error> {
                    writer.start_element(Self::ELEMENT_NAME, self.namespace())?;
                    #(#attribute_output)*
                    #content_output
                    #children_output
                    writer.end_element()
                }

                fn as_any(&self) -> &dyn Any {
                    self
                }

                fn as_any_mut(&mut self) -> &mut dyn Any {
                    self
                }

                #parent_impl

                fn as_set_attributes(&mut self) -> Option<&mut dyn meta::SetAttributes> {
                    Some(self)
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        catalog::{FieldType, Primitive},
        groups::{Compositor, Slot},
    };
    use xsd::MaxOccurs;

    fn render(items: Vec<Item>) -> String {
        prettyplease::unparse(&syn::File {
            shebang: None,
            attrs: vec![],
            items,
        })
    }

    fn emit() -> EmitContext<'static> {
        EmitContext {
            enums: &[],
            helper_homes: &[],
            namespace: Some("urn:test"),
        }
    }

    #[test]
    fn simple_content_struct() {
        let mut class = ClassDescriptor::new(
            "Title",
            "Title",
            Some("A title.".into()),
            ClassOrigin::TopLevelElement,
        );
        class.content = Some(FieldDescriptor::content(FieldType::Primitive(
            Primitive::String,
        )));
        class
            .fields
            .push("Lang", FieldType::Primitive(Primitive::String), None);
        let text = render(class.items(&emit(), Vec::new()));

        assert!(text.contains("/// A title.\n#[derive(Debug)]\npub struct Title {"));
        assert!(text.contains("content: Option<String>,"));
        assert!(text.contains("lang: Option<String>,"));
        assert!(text.contains("pub const ELEMENT_NAME: &'static str = \"Title\";"));
        assert!(text.contains("pub fn set_lang(&mut self, value: impl Into<String>)"));
        assert!(text.contains("\"Content\" => self.content = Some(value.to_string()),"));
        assert!(text.contains("Some(\"urn:test\")"));
        assert!(!text.contains("impl meta::Parent for Title"));
    }

    #[test]
    fn parent_struct() {
        let mut class = ClassDescriptor::new("Palette", "Palette", None, ClassOrigin::TopLevelElement);
        class.membership = Some(Membership {
            compositor: Compositor::Choice,
            min_occurs: 1,
            max_occurs: MaxOccurs::ONE,
            slots: vec![Slot::Element {
                xml_name: "Foo".into(),
                rust_name: "Foo".into(),
                max_occurs: MaxOccurs::ONE,
            }],
        });
        class.traits.push("ItemBase".into());
        let text = render(class.items(&emit(), Vec::new()));

        assert!(text.contains("Rc::new_cyclic"));
        assert!(text.contains("impl meta::Parent for Palette"));
        assert!(text.contains("\"Foo\" => Ok(meta::into_element_ref(Foo::new())),"));
        assert!(text.contains("impl ItemBase for Palette {}"));
    }
}
