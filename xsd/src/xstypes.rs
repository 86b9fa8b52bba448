use super::error::XsdError;
use std::fmt;

pub type NCName = String;
pub type AnyURI = String;

/// An expanded name: a namespace name (possibly absent) plus a local name.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct QName {
    pub namespace_name: Option<AnyURI>,
    pub local_name: NCName,
}

impl fmt::Display for QName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.namespace_name.as_ref() {
            Some(namespace_name) => write!(f, "{{{namespace_name}}}{}", self.local_name),
            None => f.write_str(&self.local_name),
        }
    }
}

impl QName {
    pub fn new(namespace_name: Option<&str>, local_name: impl Into<String>) -> Self {
        Self {
            namespace_name: namespace_name.map(str::to_string),
            local_name: local_name.into(),
        }
    }

    /// Resolves `prefix` against the namespace declarations in scope at `context`.
    pub fn qualified(
        prefix: &str,
        local_name: &str,
        context: roxmltree::Node,
    ) -> Result<Self, XsdError> {
        let namespace_name = if prefix == "xml" {
            // The xml prefix is bound by definition (Namespaces in XML 1.0, §3)
            "http://www.w3.org/XML/1998/namespace"
        } else {
            context
                .lookup_namespace_uri(Some(prefix))
                .ok_or_else(|| XsdError::NamePrefixNotResolved(prefix.into()))?
        };
        Ok(Self::new(Some(namespace_name), local_name))
    }

    /// An unprefixed name takes the default namespace in scope, if any (Namespaces in XML 1.0,
    /// §6.2).
    pub fn unqualified(local_name: &str, context: roxmltree::Node) -> Self {
        Self::new(context.lookup_namespace_uri(None), local_name)
    }

    pub fn parse(source: &str, context: roxmltree::Node) -> Result<Self, XsdError> {
        match source.split_once(':') {
            Some((prefix, local_name)) => Self::qualified(prefix, local_name, context),
            None => Ok(Self::unqualified(source, context)),
        }
    }

    pub fn is_in_namespace(&self, namespace_name: &str) -> bool {
        self.namespace_name.as_deref() == Some(namespace_name)
    }
}
