use thiserror::Error;

#[derive(Debug, Error)]
pub enum XsdError {
    #[error("failed to resolve prefix {0:?} to a namespace URI")]
    NamePrefixNotResolved(String),

    #[error("the document element is <{0}>, expected <schema>")]
    NotASchema(String),

    #[error("<{element}> is missing the required attribute {attribute:?}")]
    MissingAttribute { element: String, attribute: String },

    #[error("<{element}> has an invalid value {value:?} for {attribute:?}: {reason}")]
    InvalidAttributeValue {
        element: String,
        attribute: String,
        value: String,
        reason: String,
    },

    #[error("<{element}> must contain one of {expected}")]
    MissingContent {
        element: String,
        expected: &'static str,
    },

    #[error("unexpected <{child}> inside <{parent}>")]
    UnexpectedElement { parent: String, child: String },

    #[error("duplicate {kind} {name:?}")]
    DuplicateComponent { kind: &'static str, name: String },

    #[error("xsdgen does not understand <{0}>")]
    Unsupported(String),

    #[error(transparent)]
    Xml(#[from] roxmltree::Error),
}

impl XsdError {
    pub(crate) fn unexpected(parent: roxmltree::Node, child: roxmltree::Node) -> Self {
        Self::UnexpectedElement {
            parent: parent.tag_name().name().to_string(),
            child: child.tag_name().name().to_string(),
        }
    }
}
