use crate::{
    element::{add_child, ElementRef},
    error::Error,
    registry::Registry,
};
use roxmltree::{Document, Node, ParsingOptions};
use std::{fs, path::Path};

/// Name under which text content is handed to [SetAttributes](crate::SetAttributes).
pub const CONTENT_NAME: &str = "Content";

/// Attributes in this namespace (`xsi:type`, `xsi:schemaLocation`, ...) address the schema
/// processor and are not handed to elements.
pub const XSI_NAMESPACE: &str = "http://www.w3.org/2001/XMLSchema-instance";

/// Builds an element tree from an XML document using the registries of generated modules.
///
/// Elements are matched by local name only. A child is first offered to its parent's
/// [ChildFactory](crate::ChildFactory); names the parent does not declare (wildcard content) are
/// looked up in the registries, in the order given.
pub struct Loader {
    registries: Vec<Registry>,
    allow_dtd: bool,
}

impl Loader {
    pub fn new(registries: impl IntoIterator<Item = Registry>) -> Self {
        Self {
            registries: registries.into_iter().collect(),
            allow_dtd: false,
        }
    }

    pub fn allow_dtd(mut self, allow_dtd: bool) -> Self {
        self.allow_dtd = allow_dtd;
        self
    }

    pub fn load_file(&self, path: impl AsRef<Path>) -> Result<ElementRef, Error> {
        let text = fs::read_to_string(path.as_ref())?;
        self.load_str(&text)
    }

    pub fn load_str(&self, text: &str) -> Result<ElementRef, Error> {
        let options = ParsingOptions {
            allow_dtd: self.allow_dtd,
            ..Default::default()
        };
        // A second root element is already a parse error
        let document = Document::parse_with_options(text, options)?;
        let root = document
            .root()
            .children()
            .find(Node::is_element)
            .ok_or(Error::NoRootElement)?;

        let element = self.create(root.tag_name().name())?;
        self.load_element(&element, root)?;
        Ok(element)
    }

    /// Creates an element from the registries: exact XML-name matches across all registries
    /// first, then suffix matches.
    pub fn create(&self, name: &str) -> Result<ElementRef, Error> {
        self.registries
            .iter()
            .find_map(|registry| registry.find_exact(name))
            .or_else(|| {
                self.registries
                    .iter()
                    .find_map(|registry| registry.find_suffix(name))
            })
            .map(|entry| (entry.factory)())
            .ok_or_else(|| Error::NoCorrespondingType(name.to_string()))
    }

    fn create_child(&self, parent: &ElementRef, name: &str) -> Result<ElementRef, Error> {
        let created = {
            let parent = parent.borrow();
            let factory = parent
                .as_child_factory()
                .ok_or_else(|| Error::NotAChildFactory(parent.element_name().to_string()))?;
            factory.create_child(name)
        };
        match created {
            Err(Error::InvalidChildName { .. }) => {
                tracing::trace!(name, "not declared by the parent, trying the registries");
                self.create(name)
            }
            result => result,
        }
    }

    fn load_element(&self, element: &ElementRef, node: Node) -> Result<(), Error> {
        for attribute in node
            .attributes()
            .filter(|attribute| attribute.namespace() != Some(XSI_NAMESPACE))
        {
            let mut target = element.borrow_mut();
            if let Some(target) = target.as_set_attributes() {
                target.set_attribute(attribute.name(), attribute.value())?;
            }
        }

        let mut text = None::<String>;
        let mut has_children = false;
        for child in node.children() {
            if child.is_element() {
                has_children = true;
                let child_element = self.create_child(element, child.tag_name().name())?;
                add_child(element, child_element.clone())?;
                self.load_element(&child_element, child)?;
            } else if child.is_text() {
                text.get_or_insert_with(String::new)
                    .push_str(child.text().unwrap_or_default());
            }
        }

        // Whitespace between child elements is layout, without children it is the content
        let text = text.filter(|text| !has_children || !text.trim().is_empty());
        if let Some(text) = text {
            if let Some(target) = element.borrow_mut().as_set_attributes() {
                target.set_attribute(CONTENT_NAME, &text)?;
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        element::downcast_ref,
        test_support::{Branch, Leaf},
    };
    use std::{
        io::Write,
        rc::{Rc, Weak},
    };

    fn loader() -> Loader {
        Loader::new([Registry::new()
            .with("Branch", "Branch", Branch::new)
            .with("Stray", "Stray", || Leaf::new("Stray"))])
    }

    #[test]
    fn builds_tree() {
        let root = loader()
            .load_str(
                r#"<?xml version="1.0"?>
                <!-- comment -->
                <Branch Name="root">
                    <Leaf Id="1"/>
                    <?pi ignored?>
                    <Stray>text</Stray>
                </Branch>"#,
            )
            .unwrap();

        let branch = downcast_ref::<Branch>(&root).unwrap();
        assert_eq!(branch.attributes, vec![("Name".to_string(), "root".to_string())]);

        let children = branch.children.iter().cloned().collect::<Vec<_>>();
        assert_eq!(children.len(), 2);

        let leaf = downcast_ref::<Leaf>(&children[0]).unwrap();
        assert_eq!(leaf.name, "Leaf");
        assert_eq!(leaf.attributes, vec![("Id".to_string(), "1".to_string())]);
        assert!(Rc::ptr_eq(&leaf.parent.as_ref().and_then(Weak::upgrade).unwrap(), &root));

        // Created through the registry fallback
        let stray = downcast_ref::<Leaf>(&children[1]).unwrap();
        assert_eq!(stray.name, "Stray");
        assert_eq!(
            stray.attributes,
            vec![(CONTENT_NAME.to_string(), "text".to_string())]
        );
    }

    #[test]
    fn unknown_root() {
        assert!(matches!(
            loader().load_str("<Unknown/>"),
            Err(Error::NoCorrespondingType(name)) if name == "Unknown"
        ));
    }

    #[test]
    fn unknown_child() {
        assert!(matches!(
            loader().load_str("<Branch><Nowhere/></Branch>"),
            Err(Error::NoCorrespondingType(name)) if name == "Nowhere"
        ));
    }

    #[test]
    fn leaf_cannot_have_children() {
        assert!(matches!(
            loader().load_str("<Stray><Leaf/></Stray>"),
            Err(Error::NotAChildFactory(name)) if name == "Stray"
        ));
    }

    #[test]
    fn whitespace_is_content_only_without_children() {
        let root = loader()
            .load_str("<Branch>\n  <Stray>  </Stray>\n  <Leaf/>\n</Branch>")
            .unwrap();
        let branch = downcast_ref::<Branch>(&root).unwrap();
        assert!(branch.attributes.is_empty());

        let children = branch.children.iter().cloned().collect::<Vec<_>>();
        let stray = downcast_ref::<Leaf>(&children[1]).unwrap();
        assert_eq!(
            stray.attributes,
            vec![(CONTENT_NAME.to_string(), "  ".to_string())]
        );
        assert!(downcast_ref::<Leaf>(&children[0])
            .unwrap()
            .attributes
            .is_empty());
    }

    #[test]
    fn schema_instance_attributes_are_skipped() {
        let root = loader()
            .load_str(&format!(
                r#"<Branch xmlns:xsi="{XSI_NAMESPACE}" xsi:schemaLocation="urn:a a.xsd" Name="b"/>"#
            ))
            .unwrap();
        assert_eq!(
            downcast_ref::<Branch>(&root).unwrap().attributes,
            vec![("Name".to_string(), "b".to_string())]
        );
    }

    #[test]
    fn second_root_is_a_parse_error() {
        assert!(matches!(
            loader().load_str("<Branch/><Branch/>"),
            Err(Error::Parse(_))
        ));
    }

    #[test]
    fn malformed_document() {
        assert!(matches!(
            loader().load_str("<Branch>"),
            Err(Error::Parse(_))
        ));
    }

    #[test]
    fn loads_files() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "<Branch><Leaf/></Branch>").unwrap();
        let root = loader().load_file(file.path()).unwrap();
        assert_eq!(downcast_ref::<Branch>(&root).unwrap().children.len(), 1);
    }
}
