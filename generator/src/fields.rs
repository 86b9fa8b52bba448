use crate::{
    catalog::{FieldType, Primitive},
    common::{doc_attrs, EnumTarget, GeneratorContext},
    enums::EnumDescriptor,
    error::Error,
    naming::{self, name_to_ident, NameSet},
};
use proc_macro2::TokenStream;
use quote::{format_ident, quote};
use syn::{parse_quote, Arm, Ident, ImplItemFn, Stmt, Type};
use xsd::{AttributeDeclaration, AttributeUse, SimpleTypeRef};

/// Member names every generated struct may define itself.
const RESERVED_MEMBERS: &[&str] = &[
    "new",
    "this",
    "parent",
    "set_parent",
    "children",
    "children_of",
    "content",
    "set_content",
    "element_name",
    "namespace",
    "output_xml",
    "as_any",
    "as_any_mut",
    "as_parent",
    "as_parent_mut",
    "as_child_factory",
    "as_set_attributes",
    "add_child",
    "remove_child",
    "create_child",
    "set_attribute",
];

/// An optional value of a generated struct: an attribute, or the text content.
#[derive(Clone, Debug)]
pub(crate) struct FieldDescriptor {
    /// Attribute name, or `Content` for text content.
    pub(crate) xml_name: String,
    /// Field and getter name; the setter is `set_<member>`.
    pub(crate) member: String,
    pub(crate) ty: FieldType,
    pub(crate) documentation: Option<String>,
    pub(crate) is_content: bool,
}

/// The attribute fields of one struct, with the member names they took.
#[derive(Debug)]
pub(crate) struct FieldSet {
    pub(crate) fields: Vec<FieldDescriptor>,
    names: NameSet,
}

impl FieldSet {
    pub(crate) fn new() -> Self {
        Self {
            fields: Vec::new(),
            names: NameSet::with_reserved(RESERVED_MEMBERS),
        }
    }

    /// Adds an attribute field; an attribute declared twice keeps its first declaration.
    pub(crate) fn push(&mut self, xml_name: &str, ty: FieldType, documentation: Option<String>) {
        if self.fields.iter().any(|field| field.xml_name == xml_name) {
            tracing::warn!(attribute = xml_name, "declared more than once, keeping the first");
            return;
        }
        let member = self.claim_member(xml_name);
        self.fields.push(FieldDescriptor {
            xml_name: xml_name.to_string(),
            member,
            ty,
            documentation,
            is_content: false,
        });
    }

    /// Takes a member name whose setter name is free as well, adding `_attr` on collisions.
    fn claim_member(&mut self, xml_name: &str) -> String {
        let base = naming::member_name(xml_name);
        let mut candidates = [base.clone(), format!("{base}_attr")]
            .into_iter()
            .chain((2..).map(|counter| format!("{base}_attr{counter}")));
        let member = candidates
            .find(|candidate| {
                !self.names.is_taken(candidate) && !self.names.is_taken(&format!("set_{candidate}"))
            })
            .unwrap_or_else(|| unreachable!("the counter never runs out"));
        self.names.try_claim(&member);
        self.names.try_claim(&format!("set_{member}"));
        member
    }
}

impl FieldDescriptor {
    pub(crate) fn content(ty: FieldType) -> Self {
        Self {
            xml_name: "Content".into(),
            member: "content".into(),
            ty,
            documentation: None,
            is_content: true,
        }
    }
}

/// Finished enums and the type whose impl holds each one's parse helpers.
pub(crate) struct EmitContext<'a> {
    pub(crate) enums: &'a [EnumDescriptor],
    pub(crate) helper_homes: &'a [Ident],
    pub(crate) namespace: Option<&'a str>,
}

impl EmitContext<'_> {
    pub(crate) fn rust_type(&self, ty: FieldType) -> Type {
        match ty {
            FieldType::Primitive(primitive) => primitive.rust_type(),
            FieldType::Enum(id) => {
                let ident = self.enums[id].ident();
                parse_quote!(#ident)
            }
        }
    }
}

impl FieldDescriptor {
    fn ident(&self) -> Ident {
        name_to_ident(&self.member)
    }

    pub(crate) fn struct_field(&self, emit: &EmitContext) -> TokenStream {
        let ident = self.ident();
        let ty = emit.rust_type(self.ty);
        quote!(#ident: Option<#ty>,)
    }

    pub(crate) fn accessors(&self, emit: &EmitContext) -> Vec<ImplItemFn> {
        let ident = self.ident();
        let setter = format_ident!("set_{}", self.member);
        let docs = doc_attrs(self.documentation.as_deref());
        let ty = emit.rust_type(self.ty);

        if self.ty == FieldType::Primitive(Primitive::String) {
            vec![
                parse_quote! {
                    #(#docs)*
                    pub fn #ident(&self) -> Option<&str> {
                        self.#ident.as_deref()
                    }
                },
                parse_quote! {
                    pub fn #setter(&mut self, value: impl Into<String>) {
                        self.#ident = Some(value.into());
                    }
                },
            ]
        } else {
            vec![
                parse_quote! {
                    #(#docs)*
                    pub fn #ident(&self) -> Option<#ty> {
                        self.#ident
                    }
                },
                parse_quote! {
                    pub fn #setter(&mut self, value: #ty) {
                        self.#ident = Some(value);
                    }
                },
            ]
        }
    }

    /// Writes the value, if set, as an attribute or as text.
    pub(crate) fn output(&self, emit: &EmitContext) -> Stmt {
        let ident = self.ident();
        let xml_name = &self.xml_name;
        let value = format_ident!("value");
        let write = |text: TokenStream| -> TokenStream {
            if self.is_content {
                quote!(writer.text(#text)?;)
            } else {
                quote!(writer.attribute(#xml_name, #text)?;)
            }
        };

        match self.ty {
            FieldType::Primitive(Primitive::String) => {
                let write = write(quote!(#value));
                parse_quote! {
                    if let Some(#value) = &self.#ident {
                        #write
                    }
                }
            }
            FieldType::Primitive(primitive) => {
                let text = primitive.format_expr(&value);
                let write = write(quote!(#text));
                parse_quote! {
                    if let Some(#value) = self.#ident {
                        #write
                    }
                }
            }
            FieldType::Enum(id) => {
                let enum_ident = emit.enums[id].ident();
                let write = write(quote!(#value));
                parse_quote! {
                    if let Some(#value) = self.#ident.and_then(#enum_ident::xml_value) {
                        #write
                    }
                }
            }
        }
    }

    /// The `set_attribute` arm storing a parsed value under this field's XML name.
    pub(crate) fn set_arm(&self, emit: &EmitContext) -> Arm {
        let ident = self.ident();
        let xml_name = &self.xml_name;
        let name = format_ident!("name");
        let value = format_ident!("value");

        let parsed: TokenStream = match self.ty {
            FieldType::Primitive(primitive) => {
                let parse = primitive.parse_expr(&name, &value);
                quote!(#parse)
            }
            FieldType::Enum(id) => {
                let descriptor = &emit.enums[id];
                let home = &emit.helper_homes[id];
                // Flags have no IllegalValue member to record a bad token with
                if descriptor.is_flags {
                    let try_parse = descriptor.try_parse_ident();
                    quote! {
                        #home::#try_parse(Some(#value)).map_err(|_| {
                            meta::Error::invalid_value(#name, #value, "not a list of known literals")
                        })?
                    }
                } else {
                    let parse = descriptor.parse_ident();
                    quote!(#home::#parse(Some(#value)))
                }
            }
        };
        parse_quote! {
            #xml_name => self.#ident = Some(#parsed),
        }
    }
}

/// Names the anonymous attribute types of one struct or complex type.
#[derive(Clone, Debug)]
pub(crate) struct AttributeScope {
    /// Catalog key; one per named complex type or per struct.
    pub(crate) key: String,
    /// Rust name used to disambiguate enum names.
    pub(crate) name: String,
    /// Struct receiving the parse helpers of local enums.
    pub(crate) owner: Option<String>,
}

impl AttributeScope {
    pub(crate) fn of_type(type_name: &str, rust_name: &str, is_abstract: bool) -> Self {
        Self {
            key: format!("type:{type_name}"),
            name: rust_name.to_string(),
            owner: (!is_abstract).then(|| rust_name.to_string()),
        }
    }

    pub(crate) fn of_struct(rust_name: &str) -> Self {
        Self {
            key: format!("struct:{rust_name}"),
            name: rust_name.to_string(),
            owner: Some(rust_name.to_string()),
        }
    }

    pub(crate) fn enum_target(&self, attribute_name: &str) -> EnumTarget {
        EnumTarget {
            preferred: format!("{attribute_name}Type"),
            alternative: Some(format!("{}{attribute_name}Type", self.name)),
            owner: self.owner.clone(),
        }
    }
}

const GLOBAL_SCOPE: &str = "attribute";

impl GeneratorContext<'_> {
    /// Resolves attribute uses into fields, expanding references and attribute groups in place.
    pub(crate) fn collect_attributes(
        &mut self,
        uses: &[AttributeUse],
        scope: &AttributeScope,
        fields: &mut FieldSet,
    ) -> Result<(), Error> {
        let schema = self.schema;
        for attribute_use in uses {
            match attribute_use {
                AttributeUse::Declaration { declaration, .. } => {
                    let ty = self.local_attribute_type(declaration, scope)?;
                    fields.push(&declaration.name, ty, declaration.documentation.clone());
                }
                AttributeUse::Reference { name, .. } => {
                    let declaration =
                        schema
                            .attribute(name)
                            .ok_or_else(|| Error::UnknownReference {
                                kind: "attribute",
                                name: name.clone(),
                            })?;
                    let ty = self.global_attribute_type(declaration)?;
                    fields.push(&declaration.name, ty, declaration.documentation.clone());
                }
                AttributeUse::GroupReference(name) => {
                    let group =
                        schema
                            .attribute_group(name)
                            .ok_or_else(|| Error::UnknownReference {
                                kind: "attribute group",
                                name: name.clone(),
                            })?;
                    self.guarded("attribute group", name, |ctx| {
                        ctx.collect_attributes(&group.attribute_uses, scope, fields)
                    })?;
                }
            }
        }
        Ok(())
    }

    fn local_attribute_type(
        &mut self,
        declaration: &AttributeDeclaration,
        scope: &AttributeScope,
    ) -> Result<FieldType, Error> {
        match &declaration.type_definition {
            None => Ok(FieldType::Primitive(Primitive::String)),
            Some(SimpleTypeRef::Named(name)) => self.resolve_type_name(name),
            Some(SimpleTypeRef::Inline(definition)) => {
                if let Some(ty) = self.catalog.attribute_type(&scope.key, &declaration.name) {
                    return Ok(ty);
                }
                let ty =
                    self.resolve_simple_type(definition, scope.enum_target(&declaration.name))?;
                self.catalog
                    .insert_attribute_type(&scope.key, &declaration.name, ty);
                Ok(ty)
            }
        }
    }

    fn global_attribute_type(
        &mut self,
        declaration: &AttributeDeclaration,
    ) -> Result<FieldType, Error> {
        match &declaration.type_definition {
            None => Ok(FieldType::Primitive(Primitive::String)),
            Some(SimpleTypeRef::Named(name)) => self.resolve_type_name(name),
            Some(SimpleTypeRef::Inline(definition)) => {
                if let Some(ty) = self.catalog.attribute_type(GLOBAL_SCOPE, &declaration.name) {
                    return Ok(ty);
                }
                let target = EnumTarget::shared(&format!("{}Type", declaration.name));
                let ty = self.guarded("attribute", &declaration.name, |ctx| {
                    ctx.resolve_simple_type(definition, target)
                })?;
                self.catalog
                    .insert_attribute_type(GLOBAL_SCOPE, &declaration.name, ty);
                Ok(ty)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use quote::ToTokens;
    use xsd::Schema;

    fn schema(body: &str) -> Schema {
        let text = format!(
            r#"<xs:schema xmlns:xs="http://www.w3.org/2001/XMLSchema">{body}</xs:schema>"#
        );
        xsd::read_schema(&text, false).unwrap()
    }

    fn members(fields: &FieldSet) -> Vec<(&str, &str)> {
        fields
            .fields
            .iter()
            .map(|field| (field.xml_name.as_str(), field.member.as_str()))
            .collect()
    }

    #[test]
    fn member_names_avoid_generated_members() {
        let mut fields = FieldSet::new();
        let string = FieldType::Primitive(Primitive::String);
        fields.push("Parent", string, None);
        fields.push("Id", string, None);
        fields.push("id", string, None);
        fields.push("ID", string, None);
        fields.push("Content", string, None);
        fields.push("Id", string, None);
        assert_eq!(
            members(&fields),
            vec![
                ("Parent", "parent_attr"),
                ("Id", "id"),
                ("id", "id_attr"),
                ("ID", "id_attr2"),
                ("Content", "content_attr"),
            ]
        );
    }

    #[test]
    fn inline_enumeration_is_named_after_the_attribute() {
        let schema = schema(
            r#"<xs:complexType name="Compass">
                 <xs:attribute name="Direction">
                   <xs:simpleType>
                     <xs:restriction base="xs:string">
                       <xs:enumeration value="North"/>
                       <xs:enumeration value="South"/>
                     </xs:restriction>
                   </xs:simpleType>
                 </xs:attribute>
               </xs:complexType>"#,
        );
        let mut ctx = GeneratorContext::new(&schema);
        let uses = &schema.complex_type("Compass").unwrap().attribute_uses;
        let scope = AttributeScope::of_type("Compass", "Compass", false);

        let mut fields = FieldSet::new();
        ctx.collect_attributes(uses, &scope, &mut fields).unwrap();
        let mut again = FieldSet::new();
        ctx.collect_attributes(uses, &scope, &mut again).unwrap();

        assert_eq!(fields.fields[0].ty, FieldType::Enum(0));
        assert_eq!(again.fields[0].ty, FieldType::Enum(0));
        assert_eq!(ctx.enums.len(), 1);
        let descriptor = &ctx.enums[0];
        assert_eq!(descriptor.name, "DirectionType");
        assert_eq!(descriptor.owner.as_deref(), Some("Compass"));
        let members = descriptor
            .members
            .iter()
            .map(|member| (member.name.as_str(), member.value))
            .collect::<Vec<_>>();
        assert_eq!(
            members,
            vec![
                ("IllegalValue", i64::from(i32::MAX)),
                ("NotSet", -1),
                ("North", 0),
                ("South", 1),
            ]
        );
    }

    #[test]
    fn groups_and_references_expand_in_place() {
        let schema = schema(
            r#"<xs:attribute name="Lang" type="xs:language"/>
               <xs:attributeGroup name="Tracking">
                 <xs:attribute name="Created" type="xs:dateTime"/>
                 <xs:attribute ref="Lang"/>
               </xs:attributeGroup>
               <xs:complexType name="Note">
                 <xs:attribute name="Priority" type="xs:int"/>
                 <xs:attributeGroup ref="Tracking"/>
               </xs:complexType>"#,
        );
        let mut ctx = GeneratorContext::new(&schema);
        let mut fields = FieldSet::new();
        ctx.collect_attributes(
            &schema.complex_type("Note").unwrap().attribute_uses,
            &AttributeScope::of_type("Note", "Note", false),
            &mut fields,
        )
        .unwrap();
        assert_eq!(
            members(&fields),
            vec![("Priority", "priority"), ("Created", "created"), ("Lang", "lang")]
        );
        assert_eq!(
            fields.fields[1].ty,
            FieldType::Primitive(Primitive::DateTime)
        );
    }

    #[test]
    fn circular_attribute_groups_fail() {
        let schema = schema(
            r#"<xs:attributeGroup name="A"><xs:attributeGroup ref="B"/></xs:attributeGroup>
               <xs:attributeGroup name="B"><xs:attributeGroup ref="A"/></xs:attributeGroup>
               <xs:complexType name="T"><xs:attributeGroup ref="A"/></xs:complexType>"#,
        );
        let mut ctx = GeneratorContext::new(&schema);
        let result = ctx.collect_attributes(
            &schema.complex_type("T").unwrap().attribute_uses,
            &AttributeScope::of_type("T", "T", false),
            &mut FieldSet::new(),
        );
        assert!(matches!(
            result,
            Err(Error::CircularDefinition {
                kind: "attribute group",
                ..
            })
        ));
    }

    #[test]
    fn set_arm_code() {
        let field = FieldDescriptor {
            xml_name: "Width".into(),
            member: "width".into(),
            ty: FieldType::Primitive(Primitive::U32),
            documentation: None,
            is_content: false,
        };
        let emit = EmitContext {
            enums: &[],
            helper_homes: &[],
            namespace: None,
        };
        assert_eq!(
            field.set_arm(&emit).to_token_stream().to_string(),
            quote!("Width" => self.width = Some(meta::parse_number::<u32>(name, value)?),)
                .to_string()
        );
    }
}
