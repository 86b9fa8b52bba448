use check_keyword::CheckKeyword;
use heck::{ToPascalCase, ToShoutySnakeCase, ToSnakeCase};
use proc_macro2::Span;
use std::collections::HashSet;
use syn::Ident;

pub(crate) fn name_to_ident(name: &str) -> Ident {
    if ["crate", "self", "super", "Self"].contains(&name) {
        // These are keywords that are not allowed as raw identifiers
        Ident::new(&format!("{name}_"), Span::call_site())
    } else if name.is_keyword() {
        Ident::new_raw(name, Span::call_site())
    } else {
        Ident::new(name, Span::call_site())
    }
}

fn sanitize(name: &str) -> String {
    name.replace(|c: char| !c.is_ascii_alphanumeric(), "_")
}

/// Prefixes names that would not start with a letter.
fn ensure_leading_letter(name: String, fallback: &str) -> String {
    match name.chars().next() {
        None => fallback.to_string(),
        Some(first) if !first.is_ascii_alphabetic() => format!("_{name}"),
        Some(_) => name,
    }
}

/// Name of the Rust type generated for an XML type or element name.
pub(crate) fn type_name(xml_name: &str) -> String {
    ensure_leading_letter(sanitize(xml_name).to_pascal_case(), "Unnamed")
}

/// Name of the field, getter and `set_` suffix generated for an attribute.
pub(crate) fn member_name(xml_name: &str) -> String {
    ensure_leading_letter(sanitize(xml_name).to_snake_case(), "value")
}

/// Name of the enum variant generated for an enumeration literal.
pub(crate) fn variant_name(literal: &str) -> String {
    if literal.is_empty() {
        return "Empty".into();
    }
    ensure_leading_letter(sanitize(literal).to_pascal_case(), "Value")
}

/// Name of the associated constant generated for a flags literal.
pub(crate) fn flag_name(literal: &str) -> String {
    if literal.is_empty() {
        return "EMPTY".into();
    }
    ensure_leading_letter(sanitize(literal).to_shouty_snake_case(), "VALUE")
}

/// Turns a dotted or `::`-separated namespace into nested module names.
pub(crate) fn module_path(namespace: &str) -> Vec<Ident> {
    namespace
        .split(['.', ':'])
        .filter(|segment| !segment.is_empty())
        .map(|segment| name_to_ident(&member_name(segment)))
        .collect()
}

/// Names already taken within one scope.
#[derive(Debug, Default)]
pub(crate) struct NameSet {
    taken: HashSet<String>,
}

impl NameSet {
    pub(crate) fn with_reserved(reserved: &[&str]) -> Self {
        Self {
            taken: reserved.iter().map(|name| name.to_string()).collect(),
        }
    }

    pub(crate) fn is_taken(&self, name: &str) -> bool {
        self.taken.contains(name)
    }

    /// Takes `name` if it is free.
    pub(crate) fn try_claim(&mut self, name: &str) -> bool {
        self.taken.insert(name.to_string())
    }

    /// Takes `name`, or the first of `name2`, `name3`, ... that is free.
    pub(crate) fn claim(&mut self, name: &str) -> String {
        if self.try_claim(name) {
            return name.to_string();
        }
        (2..)
            .map(|counter| format!("{name}{counter}"))
            .find(|candidate| self.try_claim(candidate))
            .unwrap_or_else(|| unreachable!("the counter never runs out"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn keywords() {
        assert_eq!(name_to_ident("type").to_string(), "r#type");
        assert_eq!(name_to_ident("self").to_string(), "self_");
        assert_eq!(name_to_ident("Self").to_string(), "Self_");
        assert_eq!(name_to_ident("value").to_string(), "value");
    }

    #[test]
    fn type_names() {
        assert_eq!(type_name("Direction"), "Direction");
        assert_eq!(type_name("my-type.v2"), "MyTypeV2");
        assert_eq!(type_name("ComponentGroupRef"), "ComponentGroupRef");
    }

    #[test]
    fn member_names() {
        assert_eq!(member_name("Id"), "id");
        assert_eq!(member_name("KeyPath"), "key_path");
        assert_eq!(member_name("xml-lang"), "xml_lang");
    }

    #[test]
    fn variant_names() {
        assert_eq!(variant_name("North"), "North");
        assert_eq!(variant_name("read-only"), "ReadOnly");
        assert_eq!(variant_name("1.0"), "_10");
        assert_eq!(variant_name(""), "Empty");
        assert_eq!(variant_name("+"), "Value");
    }

    #[test]
    fn flag_names() {
        assert_eq!(flag_name("read"), "READ");
        assert_eq!(flag_name("readOnly"), "READ_ONLY");
        assert_eq!(flag_name("64"), "_64");
    }

    #[test]
    fn module_paths() {
        let path = module_path("WixToolset.Data")
            .into_iter()
            .map(|ident| ident.to_string())
            .collect::<Vec<_>>();
        assert_eq!(path, vec!["wix_toolset", "data"]);
        assert_eq!(module_path("a::b").len(), 2);
    }

    #[test]
    fn claims_unique_names() {
        let mut names = NameSet::with_reserved(&["Enums"]);
        assert!(names.is_taken("Enums"));
        assert_eq!(names.claim("Enums"), "Enums2");
        assert_eq!(names.claim("Foo"), "Foo");
        assert_eq!(names.claim("Foo"), "Foo2");
        assert_eq!(names.claim("Foo"), "Foo3");
    }
}
