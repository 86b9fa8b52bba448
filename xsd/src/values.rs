use crate::{error::XsdError, xstypes::QName};
use roxmltree::Node;

/// Conversion from the normalized value of a schema attribute to its actual value.
pub(crate) trait ActualValue: Sized {
    fn convert(src: &str, parent: Node) -> Result<Self, String>;
}

impl ActualValue for String {
    fn convert(src: &str, _parent: Node) -> Result<Self, String> {
        Ok(src.to_string())
    }
}

impl ActualValue for QName {
    fn convert(src: &str, parent: Node) -> Result<Self, String> {
        QName::parse(src, parent).map_err(|error| error.to_string())
    }
}

impl ActualValue for bool {
    fn convert(src: &str, _parent: Node) -> Result<Self, String> {
        match src.trim() {
            "true" | "1" => Ok(true),
            "false" | "0" => Ok(false),
            _ => Err("expected a boolean".into()),
        }
    }
}

impl ActualValue for u64 {
    fn convert(src: &str, _parent: Node) -> Result<Self, String> {
        src.trim().parse().map_err(|_| "expected a non-negative integer".into())
    }
}

impl<T: ActualValue> ActualValue for Vec<T> {
    fn convert(src: &str, parent: Node) -> Result<Self, String> {
        src.split_ascii_whitespace()
            .map(|item| T::convert(item, parent))
            .collect()
    }
}

/// Reads and converts the attribute `name` of `node`, if present.
pub(crate) fn attribute<T: ActualValue>(node: Node, name: &str) -> Result<Option<T>, XsdError> {
    node.attribute(name)
        .map(|value| {
            T::convert(value, node).map_err(|reason| XsdError::InvalidAttributeValue {
                element: node.tag_name().name().to_string(),
                attribute: name.to_string(),
                value: value.to_string(),
                reason,
            })
        })
        .transpose()
}

pub(crate) fn required_attribute<T: ActualValue>(node: Node, name: &str) -> Result<T, XsdError> {
    attribute(node, name)?.ok_or_else(|| XsdError::MissingAttribute {
        element: node.tag_name().name().to_string(),
        attribute: name.to_string(),
    })
}

/// The element children of `node`, skipping text, comments and processing instructions.
pub(crate) fn element_children<'a, 'input: 'a>(
    node: Node<'a, 'input>,
) -> impl Iterator<Item = Node<'a, 'input>> {
    node.children().filter(Node::is_element)
}
