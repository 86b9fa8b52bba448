use crate::element::ElementRef;

/// Creates a fresh, parentless instance of a generated type.
pub type Factory = fn() -> ElementRef;

#[derive(Clone, Debug)]
pub struct RegistryEntry {
    pub xml_name: &'static str,
    pub type_name: &'static str,
    pub factory: Factory,
}

/// The instantiable types of one generated module, in generation order.
///
/// Generated code exposes its registry as `registry()`; a
/// [Loader](crate::loader::Loader) consults one or more of them to create elements that no
/// parent knows how to create.
#[derive(Clone, Debug, Default)]
pub struct Registry {
    entries: Vec<RegistryEntry>,
}

impl Registry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, xml_name: &'static str, type_name: &'static str, factory: Factory) -> Self {
        self.register(xml_name, type_name, factory);
        self
    }

    pub fn register(&mut self, xml_name: &'static str, type_name: &'static str, factory: Factory) {
        self.entries.push(RegistryEntry {
            xml_name,
            type_name,
            factory,
        });
    }

    pub fn entries(&self) -> &[RegistryEntry] {
        &self.entries
    }

    /// The entry whose XML name is exactly `name`.
    pub fn find_exact(&self, name: &str) -> Option<&RegistryEntry> {
        self.entries.iter().find(|entry| entry.xml_name == name)
    }

    /// The first entry whose type name or XML name ends with `name`.
    pub fn find_suffix(&self, name: &str) -> Option<&RegistryEntry> {
        self.entries
            .iter()
            .find(|entry| entry.type_name.ends_with(name) || entry.xml_name.ends_with(name))
    }

    /// Exact XML-name matches win over suffix matches.
    pub fn lookup(&self, name: &str) -> Option<&RegistryEntry> {
        self.find_exact(name).or_else(|| self.find_suffix(name))
    }

    pub fn create(&self, name: &str) -> Option<ElementRef> {
        self.lookup(name).map(|entry| (entry.factory)())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::Leaf;

    fn registry() -> Registry {
        Registry::new()
            .with("ItemFoo", "ItemFoo", || Leaf::new("ItemFoo"))
            .with("Foo", "FooElement", || Leaf::new("Foo"))
    }

    #[test]
    fn exact_match_wins() {
        let registry = registry();
        assert_eq!(registry.lookup("Foo").map(|entry| entry.type_name), Some("FooElement"));
    }

    #[test]
    fn falls_back_to_suffix() {
        let registry = registry();
        assert_eq!(registry.lookup("Element").map(|entry| entry.xml_name), Some("Foo"));
        assert_eq!(registry.lookup("mFoo").map(|entry| entry.xml_name), Some("ItemFoo"));
        assert!(registry.lookup("Bar").is_none());
    }

    #[test]
    fn creates_instances() {
        let element = registry().create("Foo").unwrap();
        assert_eq!(element.borrow().element_name(), "Foo");
    }
}
