use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error("invalid value {value:?} for {name}: {reason}")]
    InvalidValue {
        name: String,
        value: String,
        reason: String,
    },

    #[error("{child} is not a valid child name for {parent}")]
    InvalidChildName { parent: String, child: String },

    #[error("{0} cannot be added: another branch of an exclusive choice is already occupied")]
    ChoiceViolation(String),

    #[error("{0} cannot be added: the maximum number of occurrences is reached")]
    MaxOccursExceeded(String),

    #[error("{0} is not a child of this element")]
    NotAChild(String),

    #[error("the document has no root element")]
    NoRootElement,

    #[error("XML element {0} does not have a corresponding type")]
    NoCorrespondingType(String),

    #[error("{0} cannot create child elements")]
    NotAChildFactory(String),

    #[error("{0} cannot hold child elements")]
    NotAParent(String),

    #[error("attribute {0} written outside of a start tag")]
    AttributeOutsideStartTag(String),

    #[error("end_element called without an open element")]
    UnbalancedEndElement,

    #[error(transparent)]
    Parse(#[from] roxmltree::Error),

    #[error(transparent)]
    Write(#[from] quick_xml::Error),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Utf8(#[from] std::string::FromUtf8Error),
}

impl Error {
    pub fn invalid_child_name(parent: &str, child: &str) -> Self {
        Self::InvalidChildName {
            parent: parent.to_string(),
            child: child.to_string(),
        }
    }

    /// Names `parent` in an [Error::InvalidChildName] raised without knowing it.
    pub fn in_parent(self, parent: &str) -> Self {
        match self {
            Self::InvalidChildName { parent: known, child } if known.is_empty() => {
                Self::InvalidChildName {
                    parent: parent.to_string(),
                    child,
                }
            }
            other => other,
        }
    }

    pub fn invalid_value(name: &str, value: &str, reason: impl ToString) -> Self {
        Self::InvalidValue {
            name: name.to_string(),
            value: value.to_string(),
            reason: reason.to_string(),
        }
    }
}
