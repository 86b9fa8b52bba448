use crate::{
    common::doc_attrs,
    error::Error,
    naming::{self, name_to_ident, NameSet},
};
use proc_macro2::Span;
use quote::{format_ident, quote};
use syn::{parse_quote, Expr, Ident, ImplItemFn, Item, LitInt};
use xsd::Enumeration;

#[derive(Clone, Debug, PartialEq, Eq)]
pub(crate) enum MemberKind {
    IllegalValue,
    NotSet,
    /// The empty set of a flags enum.
    None,
    Literal(String),
}

#[derive(Clone, Debug)]
pub(crate) struct EnumMember {
    pub(crate) kind: MemberKind,
    /// Variant name, or constant name for flags.
    pub(crate) name: String,
    pub(crate) value: i64,
    pub(crate) documentation: Option<String>,
}

/// An enumeration synthesized from enumeration facets.
///
/// Plain enums carry the sentinels `IllegalValue` and `NotSet` ahead of the literals, which
/// count up from 0. Flags enums start with `NONE` and give the literals successive powers of
/// two.
#[derive(Clone, Debug)]
pub(crate) struct EnumDescriptor {
    pub(crate) name: String,
    pub(crate) documentation: Option<String>,
    pub(crate) members: Vec<EnumMember>,
    pub(crate) is_flags: bool,
    /// Struct whose inherent impl holds the parse helpers; `None` for the shared container.
    pub(crate) owner: Option<String>,
}

const MAX_FLAGS: usize = 32;

impl EnumDescriptor {
    pub(crate) fn new(
        name: String,
        documentation: Option<String>,
        enumerations: &[Enumeration],
        is_flags: bool,
        owner: Option<String>,
    ) -> Result<Self, Error> {
        let mut literals: Vec<(String, Option<String>)> = Vec::with_capacity(enumerations.len());
        for enumeration in enumerations {
            if literals.iter().any(|(literal, _)| *literal == enumeration.value) {
                tracing::warn!(enumeration = %name, literal = %enumeration.value, "duplicate literal");
                continue;
            }
            literals.push((enumeration.value.clone(), enumeration.documentation.clone()));
        }

        let members = Self::assign_members(&name, literals, is_flags)?;
        Ok(Self {
            name,
            documentation,
            members,
            is_flags,
            owner,
        })
    }

    fn assign_members(
        name: &str,
        literals: Vec<(String, Option<String>)>,
        is_flags: bool,
    ) -> Result<Vec<EnumMember>, Error> {
        if is_flags {
            if literals.len() > MAX_FLAGS {
                return Err(Error::TooManyFlags {
                    name: name.to_string(),
                    count: literals.len(),
                });
            }
            let mut names = NameSet::with_reserved(&["NONE"]);
            let mut members = vec![EnumMember {
                kind: MemberKind::None,
                name: "NONE".into(),
                value: 0,
                documentation: Some("No flag is set.".into()),
            }];
            members.extend(literals.into_iter().enumerate().map(
                |(index, (literal, documentation))| EnumMember {
                    name: names.claim(&naming::flag_name(&literal)),
                    value: 1 << index,
                    kind: MemberKind::Literal(literal),
                    documentation,
                },
            ));
            Ok(members)
        } else {
            let mut names = NameSet::with_reserved(&["IllegalValue", "NotSet"]);
            let mut members = vec![
                EnumMember {
                    kind: MemberKind::IllegalValue,
                    name: "IllegalValue".into(),
                    value: i32::MAX.into(),
                    documentation: Some("A value that matches none of the literals.".into()),
                },
                EnumMember {
                    kind: MemberKind::NotSet,
                    name: "NotSet".into(),
                    value: -1,
                    documentation: Some("No value, or an empty one.".into()),
                },
            ];
            members.extend(literals.into_iter().enumerate().map(
                |(index, (literal, documentation))| EnumMember {
                    name: names.claim(&naming::variant_name(&literal)),
                    value: index as i64,
                    kind: MemberKind::Literal(literal),
                    documentation,
                },
            ));
            Ok(members)
        }
    }

    /// Members standing for a literal, with that literal.
    pub(crate) fn literals(&self) -> impl Iterator<Item = (&EnumMember, &str)> {
        self.members.iter().filter_map(|member| match &member.kind {
            MemberKind::Literal(literal) => Some((member, literal.as_str())),
            _ => None,
        })
    }

    /// Turns a plain enum into a flags enum, reassigning values; idempotent.
    pub(crate) fn promote_to_flags(&mut self) -> Result<(), Error> {
        if self.is_flags {
            return Ok(());
        }
        let literals = self
            .members
            .drain(..)
            .filter_map(|member| match member.kind {
                MemberKind::Literal(literal) => Some((literal, member.documentation)),
                _ => None,
            })
            .collect();
        self.members = Self::assign_members(&self.name, literals, true)?;
        self.is_flags = true;
        tracing::debug!(enumeration = %self.name, "promoted to flags");
        Ok(())
    }

    pub(crate) fn ident(&self) -> Ident {
        name_to_ident(&self.name)
    }

    pub(crate) fn try_parse_ident(&self) -> Ident {
        format_ident!("try_parse_{}", naming::member_name(&self.name))
    }

    pub(crate) fn parse_ident(&self) -> Ident {
        format_ident!("parse_{}", naming::member_name(&self.name))
    }

    /// The type definition and its inherent impls.
    pub(crate) fn items(&self) -> Vec<Item> {
        if self.is_flags {
            self.flags_items()
        } else {
            self.enum_items()
        }
    }

    fn enum_items(&self) -> Vec<Item> {
        let name = self.ident();
        let docs = doc_attrs(self.documentation.as_deref());
        let variants = self.members.iter().map(|member| {
            let ident = name_to_ident(&member.name);
            let docs = doc_attrs(member.documentation.as_deref());
            let default = (member.kind == MemberKind::NotSet).then(|| quote!(#[default]));
            let discriminant: Expr = match member.kind {
                MemberKind::IllegalValue => parse_quote!(i32::MAX),
                _ if member.value < 0 => {
                    let magnitude = LitInt::new(&(-member.value).to_string(), Span::call_site());
                    parse_quote!(-#magnitude)
                }
                _ => {
                    let value = LitInt::new(&member.value.to_string(), Span::call_site());
                    parse_quote!(#value)
                }
            };
            quote! {
                #(#docs)*
                #default
                #ident = #discriminant
            }
        });
        let (idents, literals): (Vec<_>, Vec<_>) = self
            .literals()
            .map(|(member, literal)| (name_to_ident(&member.name), literal))
            .unzip();

        vec![
            parse_quote! {
                #(#docs)*
                #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
                #[repr(i32)]
                pub enum #name {
                    #(#variants,)*
                }
            },
            parse_quote! {
                impl #name {
                    /// The XML literal of this value; `None` for `IllegalValue` and `NotSet`.
                    pub fn xml_value(self) -> Option<&'static str> {
                        match self {
                            #(Self::#idents => Some(#literals),)*
                            _ => None,
                        }
                    }
                }
            },
        ]
    }

    fn flags_items(&self) -> Vec<Item> {
        let name = self.ident();
        let docs = doc_attrs(self.documentation.as_deref());
        let constants = self.members.iter().map(|member| {
            let ident = name_to_ident(&member.name);
            let docs = doc_attrs(member.documentation.as_deref());
            let value = LitInt::new(&member.value.to_string(), Span::call_site());
            quote! {
                #(#docs)*
                pub const #ident: Self = Self(#value);
            }
        });
        let (idents, literals): (Vec<_>, Vec<_>) = self
            .literals()
            .map(|(member, literal)| (name_to_ident(&member.name), literal))
            .unzip();

        vec![
            parse_quote! {
                #(#docs)*
                #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
                pub struct #name(u32);
            },
            parse_quote! {
                impl #name {
                    #(#constants)*

                    pub const fn bits(self) -> u32 {
                        self.0
                    }

                    /// Whether every flag of `other` is set in `self`.
                    pub const fn contains(self, other: Self) -> bool {
                        (self.0 & other.0) == other.0
                    }

                    /// The set flags as a space-separated list of literals; `None` if no flag is
                    /// set.
                    pub fn xml_value(self) -> Option<String> {
                        let literals = [#((Self::#idents, #literals)),*]
                            .into_iter()
                            .filter(|(flag, _)| self.contains(*flag))
                            .map(|(_, literal)| literal)
                            .collect::<Vec<&str>>();
                        (!literals.is_empty()).then(|| literals.join(" "))
                    }
                }
            },
            parse_quote! {
                impl std::ops::BitOr for #name {
                    type Output = Self;

                    fn bitor(self, rhs: Self) -> Self {
                        Self(self.0 | rhs.0)
                    }
                }
            },
            parse_quote! {
                impl std::ops::BitOrAssign for #name {
                    fn bitor_assign(&mut self, rhs: Self) {
                        self.0 |= rhs.0;
                    }
                }
            },
        ]
    }

    /// `try_parse_<name>` and, for plain enums, `parse_<name>`, to be placed in the inherent impl
    /// of the owner or of the shared container.
    pub(crate) fn helpers(&self) -> Vec<ImplItemFn> {
        let name = self.ident();
        let try_parse = self.try_parse_ident();
        let (idents, literals): (Vec<_>, Vec<_>) = self
            .literals()
            .map(|(member, literal)| (name_to_ident(&member.name), literal))
            .unzip();

        if self.is_flags {
            let doc = format!(
                " Parses a space-separated list of [`{}`] literals. Fails with `NONE` for a \
                 missing or empty value and for any unknown literal.",
                self.name
            );
            vec![parse_quote! {
                #[doc = #doc]
                pub fn #try_parse(value: Option<&str>) -> Result<#name, #name> {
                    let value = match value {
                        None | Some("") => return Err(#name::NONE),
                        Some(value) => value,
                    };
                    let mut flags = #name::NONE;
                    for token in value.split_whitespace() {
                        match token {
                            #(#literals => flags |= #name::#idents,)*
                            _ => return Err(#name::NONE),
                        }
                    }
                    Ok(flags)
                }
            }]
        } else {
            let parse = self.parse_ident();
            let try_doc = format!(
                " Parses a [`{}`] literal. Fails with `NotSet` for a missing or empty value and \
                 with `IllegalValue` for an unknown literal.",
                self.name
            );
            let doc = format!(
                " Parses a [`{}`] literal, yielding a sentinel on failure.",
                self.name
            );
            vec![
                parse_quote! {
                    #[doc = #try_doc]
                    pub fn #try_parse(value: Option<&str>) -> Result<#name, #name> {
                        match value {
                            None | Some("") => Err(#name::NotSet),
                            #(Some(#literals) => Ok(#name::#idents),)*
                            Some(_) => Err(#name::IllegalValue),
                        }
                    }
                },
                parse_quote! {
                    #[doc = #doc]
                    pub fn #parse(value: Option<&str>) -> #name {
                        match Self::#try_parse(value) {
                            Ok(value) | Err(value) => value,
                        }
                    }
                },
            ]
        }
    }
}
