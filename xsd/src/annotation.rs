use crate::values::element_children;
use roxmltree::{Node, NodeType};

/// Schema Component: Annotation (§3.15)
///
/// Only the user information is kept, flattened to plain text since it ends up in doc comments.
#[derive(Clone, Debug, Default)]
pub struct Annotation {
    pub documentation: Vec<String>,
}

impl Annotation {
    pub const TAG_NAME: &'static str = "annotation";

    fn content_to_text(node: Node, text: &mut String) {
        for child in node.children() {
            match child.node_type() {
                NodeType::Text => text.push_str(child.text().unwrap_or_default()),
                NodeType::Element => Self::content_to_text(child, text),
                _ => {}
            }
        }
    }

    /// Collapses runs of whitespace inside each line and drops blank lines at either end.
    fn normalize(text: &str) -> String {
        let lines = text
            .lines()
            .map(|line| line.split_whitespace().collect::<Vec<_>>().join(" "))
            .collect::<Vec<_>>();
        let first = lines.iter().position(|line| !line.is_empty());
        let last = lines.iter().rposition(|line| !line.is_empty());
        match (first, last) {
            (Some(first), Some(last)) => lines[first..=last].join("\n"),
            _ => String::new(),
        }
    }

    pub fn map_from_xml(annotation: Node) -> Self {
        let documentation = element_children(annotation)
            .filter(|child| child.tag_name().name() == "documentation")
            .map(|child| {
                let mut text = String::new();
                Self::content_to_text(child, &mut text);
                Self::normalize(&text)
            })
            .filter(|text| !text.is_empty())
            .collect();
        Self { documentation }
    }

    /// The documentation of the `<annotation>` child of `node`, if it has any.
    pub fn documentation_of(node: Node) -> Option<String> {
        let documentation = element_children(node)
            .filter(|child| child.tag_name().name() == Self::TAG_NAME)
            .flat_map(|annotation| Self::map_from_xml(annotation).documentation)
            .collect::<Vec<_>>();
        (!documentation.is_empty()).then(|| documentation.join("\n\n"))
    }
}
