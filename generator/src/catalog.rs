use crate::naming::{self, NameSet};
use proc_macro2::TokenStream;
use quote::quote;
use std::collections::HashMap;
use syn::{parse_quote, Expr, Ident, Type};

/// Rust representation of a built-in XSD datatype.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub(crate) enum Primitive {
    String,
    Bool,
    I8,
    I16,
    I32,
    I64,
    U8,
    U16,
    U32,
    U64,
    F32,
    F64,
    DateTime,
    Date,
    Time,
}

impl Primitive {
    /// Every built-in without a closer Rust counterpart maps to `String`.
    pub(crate) fn from_builtin(local_name: &str) -> Self {
        match local_name {
            "boolean" => Self::Bool,
            "byte" => Self::I8,
            "short" => Self::I16,
            "int" => Self::I32,
            "long" | "integer" | "nonPositiveInteger" | "negativeInteger" => Self::I64,
            "unsignedByte" => Self::U8,
            "unsignedShort" => Self::U16,
            "unsignedInt" => Self::U32,
            "unsignedLong" | "nonNegativeInteger" | "positiveInteger" => Self::U64,
            "float" => Self::F32,
            "double" | "decimal" => Self::F64,
            "dateTime" | "dateTimeStamp" => Self::DateTime,
            "date" => Self::Date,
            "time" => Self::Time,
            _ => Self::String,
        }
    }

    pub(crate) fn rust_type(self) -> Type {
        match self {
            Self::String => parse_quote!(String),
            Self::Bool => parse_quote!(bool),
            Self::I8 => parse_quote!(i8),
            Self::I16 => parse_quote!(i16),
            Self::I32 => parse_quote!(i32),
            Self::I64 => parse_quote!(i64),
            Self::U8 => parse_quote!(u8),
            Self::U16 => parse_quote!(u16),
            Self::U32 => parse_quote!(u32),
            Self::U64 => parse_quote!(u64),
            Self::F32 => parse_quote!(f32),
            Self::F64 => parse_quote!(f64),
            Self::DateTime => parse_quote!(meta::NaiveDateTime),
            Self::Date => parse_quote!(meta::NaiveDate),
            Self::Time => parse_quote!(meta::NaiveTime),
        }
    }

    pub(crate) fn is_copy(self) -> bool {
        self != Self::String
    }

    /// Text for `value`, which is bound to `&String` for strings and to the value itself
    /// otherwise.
    pub(crate) fn format_expr(self, value: &Ident) -> Expr {
        match self {
            Self::String => parse_quote!(#value),
            Self::Bool => parse_quote!(meta::format_bool(#value)),
            Self::F32 | Self::F64 => parse_quote!(meta::format_float(#value)),
            Self::DateTime => parse_quote!(meta::format_date_time(&#value)),
            Self::Date => parse_quote!(meta::format_date(&#value)),
            Self::Time => parse_quote!(meta::format_time(&#value)),
            _ => parse_quote!(#value.to_string()),
        }
    }

    /// Converts the `&str` bound to `value`; failures name the attribute bound to `name`.
    pub(crate) fn parse_expr(self, name: &Ident, value: &Ident) -> Expr {
        let parse: TokenStream = match self {
            Self::String => return parse_quote!(#value.to_string()),
            Self::Bool => quote!(meta::parse_bool(#name, #value)),
            Self::F32 | Self::F64 => {
                let ty = self.rust_type();
                quote!(meta::parse_float::<#ty>(#name, #value))
            }
            Self::DateTime => quote!(meta::parse_date_time(#name, #value)),
            Self::Date => quote!(meta::parse_date(#name, #value)),
            Self::Time => quote!(meta::parse_time(#name, #value)),
            _ => {
                let ty = self.rust_type();
                quote!(meta::parse_number::<#ty>(#name, #value))
            }
        };
        parse_quote!(#parse?)
    }
}

pub(crate) type EnumId = usize;

/// What a simple type resolves to: a primitive or one of the synthesized enums.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub(crate) enum FieldType {
    Primitive(Primitive),
    Enum(EnumId),
}

#[derive(Clone, Debug)]
pub(crate) struct ComplexEntry {
    /// Struct name, or marker trait name for abstract types.
    pub(crate) rust_name: String,
    pub(crate) is_abstract: bool,
}

/// Names given out during one run, and what schema types resolved to.
#[derive(Debug)]
pub(crate) struct TypeCatalog {
    names: NameSet,
    simple_types: HashMap<String, FieldType>,
    complex_types: HashMap<String, ComplexEntry>,
    elements: HashMap<String, String>,
    /// Local elements of a named type, keyed by (element name, type name), so that recursive
    /// content models reuse one struct.
    typed_local_elements: HashMap<(String, String), String>,
    /// Local elements with an inline type, keyed by (declaring complex type, element name).
    inline_local_elements: HashMap<(String, String), String>,
    /// Anonymous attribute types, keyed by (scope, attribute name).
    attribute_types: HashMap<(String, String), FieldType>,
}

/// Name of the unit struct holding the parse helpers of shared enums.
pub(crate) const ENUMS_CONTAINER: &str = "Enums";

/// Names generated code refers to unqualified, which schema types must not shadow.
const RESERVED_TYPE_NAMES: &[&str] = &[
    ENUMS_CONTAINER,
    "Any",
    "Rc",
    "Weak",
    "RefCell",
    "Option",
    "Some",
    "None",
    "Result",
    "Ok",
    "Err",
    "String",
    "Vec",
];

impl Default for TypeCatalog {
    fn default() -> Self {
        Self {
            names: NameSet::with_reserved(RESERVED_TYPE_NAMES),
            simple_types: HashMap::new(),
            complex_types: HashMap::new(),
            elements: HashMap::new(),
            typed_local_elements: HashMap::new(),
            inline_local_elements: HashMap::new(),
            attribute_types: HashMap::new(),
        }
    }
}

impl TypeCatalog {
    /// Gives out a Rust type name derived from `preferred`, trying `alternative` (if any) before
    /// falling back to a numeric suffix.
    pub(crate) fn reserve(&mut self, preferred: &str, alternative: Option<&str>) -> String {
        let preferred = naming::type_name(preferred);
        if self.names.try_claim(&preferred) {
            return preferred;
        }
        if let Some(alternative) = alternative.map(naming::type_name) {
            if self.names.try_claim(&alternative) {
                return alternative;
            }
        }
        self.names.claim(&preferred)
    }

    pub(crate) fn simple_type(&self, name: &str) -> Option<FieldType> {
        self.simple_types.get(name).copied()
    }

    pub(crate) fn insert_simple_type(&mut self, name: &str, field_type: FieldType) {
        self.simple_types.insert(name.to_string(), field_type);
    }

    pub(crate) fn complex_type(&self, name: &str) -> Option<&ComplexEntry> {
        self.complex_types.get(name)
    }

    pub(crate) fn declare_complex_type(&mut self, name: &str, is_abstract: bool) -> String {
        let rust_name = self.reserve(name, None);
        self.complex_types.insert(
            name.to_string(),
            ComplexEntry {
                rust_name: rust_name.clone(),
                is_abstract,
            },
        );
        rust_name
    }

    pub(crate) fn element(&self, name: &str) -> Option<&str> {
        self.elements.get(name).map(String::as_str)
    }

    pub(crate) fn declare_element(&mut self, name: &str) -> String {
        let rust_name = self.reserve(name, Some(&format!("{name}Element")));
        self.elements.insert(name.to_string(), rust_name.clone());
        rust_name
    }

    pub(crate) fn typed_local_element(&self, name: &str, type_name: &str) -> Option<&str> {
        self.typed_local_elements
            .get(&(name.to_string(), type_name.to_string()))
            .map(String::as_str)
    }

    pub(crate) fn insert_typed_local_element(&mut self, name: &str, type_name: &str, rust_name: &str) {
        self.typed_local_elements.insert(
            (name.to_string(), type_name.to_string()),
            rust_name.to_string(),
        );
    }

    pub(crate) fn inline_local_element(&self, type_name: &str, name: &str) -> Option<&str> {
        self.inline_local_elements
            .get(&(type_name.to_string(), name.to_string()))
            .map(String::as_str)
    }

    pub(crate) fn insert_inline_local_element(&mut self, type_name: &str, name: &str, rust_name: &str) {
        self.inline_local_elements.insert(
            (type_name.to_string(), name.to_string()),
            rust_name.to_string(),
        );
    }

    pub(crate) fn attribute_type(&self, scope: &str, attribute: &str) -> Option<FieldType> {
        self.attribute_types
            .get(&(scope.to_string(), attribute.to_string()))
            .copied()
    }

    pub(crate) fn insert_attribute_type(&mut self, scope: &str, attribute: &str, field_type: FieldType) {
        self.attribute_types
            .insert((scope.to_string(), attribute.to_string()), field_type);
    }
}
