use super::{builtins, xstypes::QName};
use std::fmt;

/// A reference to a type definition by name.
///
/// Names in the `xs` namespace that denote a built-in datatype are kept apart from names of
/// definitions in the schema being mapped; only the local name of the latter is kept, since a
/// single schema document has a single target namespace.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum TypeName {
    Builtin(String),
    Schema(String),
}

impl TypeName {
    pub fn local_name(&self) -> &str {
        match self {
            Self::Builtin(name) | Self::Schema(name) => name,
        }
    }

    pub fn is_builtin(&self) -> bool {
        matches!(self, Self::Builtin(_))
    }

    /// Whether this names `xs:anyType`, the ur-type.
    pub fn is_any_type(&self) -> bool {
        matches!(self, Self::Builtin(name) if name == "anyType")
    }
}

impl From<QName> for TypeName {
    fn from(name: QName) -> Self {
        if name.is_in_namespace(builtins::XS_NAMESPACE) && builtins::is_builtin_name(&name.local_name)
        {
            Self::Builtin(name.local_name)
        } else {
            Self::Schema(name.local_name)
        }
    }
}

impl fmt::Display for TypeName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Builtin(name) => write!(f, "xs:{name}"),
            Self::Schema(name) => f.write_str(name),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::builtins::XS_NAMESPACE;

    #[test]
    fn classifies_names() {
        assert_eq!(
            TypeName::from(QName::new(Some(XS_NAMESPACE), "int")),
            TypeName::Builtin("int".into())
        );
        assert_eq!(
            TypeName::from(QName::new(Some("urn:test"), "int")),
            TypeName::Schema("int".into())
        );
        // A schema whose default namespace is the xs namespace may still name its own types
        // without a prefix.
        assert_eq!(
            TypeName::from(QName::new(Some(XS_NAMESPACE), "Direction")),
            TypeName::Schema("Direction".into())
        );
        assert!(TypeName::Builtin("anyType".into()).is_any_type());
    }
}
