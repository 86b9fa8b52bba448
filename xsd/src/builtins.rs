use lazy_static::lazy_static;
use std::collections::HashSet;

// Namespace of the XSD specification (pt. 1, §1.3.1)
pub const XS_NAMESPACE: &str = "http://www.w3.org/2001/XMLSchema";

lazy_static! {
    /// Local names of the built-in datatypes in the `xs` namespace (pt. 2, §3)
    static ref BUILTIN_TYPE_NAMES: HashSet<&'static str> = [
        "anyType",
        "anySimpleType",
        "anyAtomicType",
        // primitive
        "string",
        "boolean",
        "decimal",
        "float",
        "double",
        "duration",
        "dateTime",
        "time",
        "date",
        "gYearMonth",
        "gYear",
        "gMonthDay",
        "gDay",
        "gMonth",
        "hexBinary",
        "base64Binary",
        "anyURI",
        "QName",
        "NOTATION",
        // ordinary
        "normalizedString",
        "token",
        "language",
        "NMTOKEN",
        "NMTOKENS",
        "Name",
        "NCName",
        "ID",
        "IDREF",
        "IDREFS",
        "ENTITY",
        "ENTITIES",
        "integer",
        "nonPositiveInteger",
        "negativeInteger",
        "long",
        "int",
        "short",
        "byte",
        "nonNegativeInteger",
        "unsignedLong",
        "unsignedInt",
        "unsignedShort",
        "unsignedByte",
        "positiveInteger",
        "yearMonthDuration",
        "dayTimeDuration",
        "dateTimeStamp",
    ]
    .into_iter()
    .collect();
}

/// Whether `local_name` names one of the built-in datatypes of the `xs` namespace.
pub fn is_builtin_name(local_name: &str) -> bool {
    BUILTIN_TYPE_NAMES.contains(local_name)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn knows_builtin_names() {
        assert!(is_builtin_name("string"));
        assert!(is_builtin_name("unsignedShort"));
        assert!(is_builtin_name("anyType"));
        assert!(!is_builtin_name("String"));
        assert!(!is_builtin_name("Direction"));
    }
}
