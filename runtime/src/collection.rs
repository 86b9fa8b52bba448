use crate::{
    element::{Element, ElementRef},
    error::Error,
};
use std::rc::Rc;

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Compositor {
    Sequence,
    Choice,
}

/// Ordered child storage of a parent element, shaped after its content model.
///
/// Each slot holds the children of one element name (or of a wildcard) in insertion order;
/// nested collections stand for nested sequences and choices. Iteration follows slot order, so
/// children come out in schema order regardless of the order they were added in.
#[derive(Debug)]
pub struct ElementCollection {
    compositor: Compositor,
    min_occurs: usize,
    max_occurs: Option<usize>,
    entries: Vec<Entry>,
}

#[derive(Debug)]
enum Entry {
    Slot(Slot),
    Collection(ElementCollection),
}

#[derive(Debug)]
struct Slot {
    /// `None` for a wildcard.
    name: Option<String>,
    max_occurs: Option<usize>,
    elements: Vec<ElementRef>,
}

/// Why a collection did not take an element, ordered from least to most specific.
#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord)]
enum Rejection {
    NotAccepted,
    Full,
    ChoiceOccupied,
}

impl Slot {
    fn accepts(&self, name: &str) -> bool {
        self.name.as_deref().map_or(true, |slot_name| slot_name == name)
    }

    fn is_full(&self) -> bool {
        self.max_occurs
            .is_some_and(|max_occurs| self.elements.len() >= max_occurs)
    }
}

impl Entry {
    fn accepts(&self, name: &str) -> bool {
        match self {
            Self::Slot(slot) => slot.accepts(name),
            Self::Collection(collection) => collection.accepts(name),
        }
    }

    fn is_empty(&self) -> bool {
        match self {
            Self::Slot(slot) => slot.elements.is_empty(),
            Self::Collection(collection) => collection.is_empty(),
        }
    }
}

impl ElementCollection {
    pub fn new(compositor: Compositor, min_occurs: usize, max_occurs: Option<usize>) -> Self {
        Self {
            compositor,
            min_occurs,
            max_occurs,
            entries: Vec::new(),
        }
    }

    pub fn sequence(min_occurs: usize, max_occurs: Option<usize>) -> Self {
        Self::new(Compositor::Sequence, min_occurs, max_occurs)
    }

    pub fn choice(min_occurs: usize, max_occurs: Option<usize>) -> Self {
        Self::new(Compositor::Choice, min_occurs, max_occurs)
    }

    /// Adds a slot for elements named `name`.
    pub fn with_element(mut self, name: &str, max_occurs: Option<usize>) -> Self {
        self.entries.push(Entry::Slot(Slot {
            name: Some(name.to_string()),
            max_occurs,
            elements: Vec::new(),
        }));
        self
    }

    /// Adds a slot accepting elements of any name.
    pub fn with_any(mut self, max_occurs: Option<usize>) -> Self {
        self.entries.push(Entry::Slot(Slot {
            name: None,
            max_occurs,
            elements: Vec::new(),
        }));
        self
    }

    pub fn with_collection(mut self, collection: ElementCollection) -> Self {
        self.entries.push(Entry::Collection(collection));
        self
    }

    pub fn compositor(&self) -> Compositor {
        self.compositor
    }

    pub fn min_occurs(&self) -> usize {
        self.min_occurs
    }

    pub fn max_occurs(&self) -> Option<usize> {
        self.max_occurs
    }

    /// A choice that may occur at most once admits children of a single branch only.
    pub fn is_exclusive(&self) -> bool {
        self.compositor == Compositor::Choice && self.max_occurs == Some(1)
    }

    /// Whether some slot, at any depth, takes elements named `name`.
    pub fn accepts(&self, name: &str) -> bool {
        self.entries.iter().any(|entry| entry.accepts(name))
    }

    pub fn is_empty(&self) -> bool {
        self.entries.iter().all(Entry::is_empty)
    }

    pub fn len(&self) -> usize {
        self.iter().count()
    }

    /// Places `element` into the first slot that accepts its name and has room.
    ///
    /// Fails with [Error::ChoiceViolation] when the only accepting slots lie in another branch
    /// of an occupied exclusive choice, [Error::MaxOccursExceeded] when every accepting slot is
    /// full, and [Error::InvalidChildName] when no slot accepts the name at all; the parent name
    /// of the latter is left for the caller to fill in with [Error::in_parent].
    pub fn add_element(&mut self, element: ElementRef) -> Result<(), Error> {
        let name = element.borrow().element_name().to_string();
        self.try_add(&name, &element).map_err(|rejection| match rejection {
            Rejection::NotAccepted => Error::InvalidChildName {
                parent: String::new(),
                child: name,
            },
            Rejection::Full => Error::MaxOccursExceeded(name),
            Rejection::ChoiceOccupied => Error::ChoiceViolation(name),
        })
    }

    fn try_add(&mut self, name: &str, element: &ElementRef) -> Result<(), Rejection> {
        let mut rejection = Rejection::NotAccepted;
        let exclusive = self.is_exclusive();
        for index in 0..self.entries.len() {
            if !self.entries[index].accepts(name) {
                continue;
            }
            if exclusive
                && self
                    .entries
                    .iter()
                    .enumerate()
                    .any(|(other, entry)| other != index && !entry.is_empty())
            {
                rejection = rejection.max(Rejection::ChoiceOccupied);
                continue;
            }
            match &mut self.entries[index] {
                Entry::Slot(slot) if slot.is_full() => rejection = rejection.max(Rejection::Full),
                Entry::Slot(slot) => {
                    slot.elements.push(Rc::clone(element));
                    return Ok(());
                }
                Entry::Collection(collection) => match collection.try_add(name, element) {
                    Ok(()) => return Ok(()),
                    Err(nested) => rejection = rejection.max(nested),
                },
            }
        }
        Err(rejection)
    }

    /// Removes `element` (compared by identity); [Error::NotAChild] if it is not held here.
    pub fn remove_element(&mut self, element: &ElementRef) -> Result<(), Error> {
        if self.remove(element) {
            Ok(())
        } else {
            Err(Error::NotAChild(element.borrow().element_name().to_string()))
        }
    }

    fn remove(&mut self, element: &ElementRef) -> bool {
        self.entries.iter_mut().any(|entry| match entry {
            Entry::Slot(slot) => {
                match slot
                    .elements
                    .iter()
                    .position(|held| Rc::ptr_eq(held, element))
                {
                    Some(position) => {
                        slot.elements.remove(position);
                        true
                    }
                    None => false,
                }
            }
            Entry::Collection(collection) => collection.remove(element),
        })
    }

    /// All children in slot order.
    pub fn iter(&self) -> Box<dyn Iterator<Item = &ElementRef> + '_> {
        Box::new(self.entries.iter().flat_map(|entry| match entry {
            Entry::Slot(slot) => {
                Box::new(slot.elements.iter()) as Box<dyn Iterator<Item = &ElementRef> + '_>
            }
            Entry::Collection(collection) => collection.iter(),
        }))
    }

    /// The children whose concrete type is `T`, in slot order.
    pub fn of_type<T: Element>(&self) -> Vec<ElementRef> {
        self.iter()
            .filter(|element| element.borrow().as_any().is::<T>())
            .cloned()
            .collect()
    }

    /// The children named `name`, in slot order.
    pub fn named(&self, name: &str) -> Vec<ElementRef> {
        self.iter()
            .filter(|element| element.borrow().element_name() == name)
            .cloned()
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::Leaf;

    #[test]
    fn sequence_keeps_slot_order() {
        let mut collection = ElementCollection::sequence(1, Some(1))
            .with_element("A", None)
            .with_element("B", Some(1));

        let b = Leaf::new("B");
        let a1 = Leaf::new("A");
        let a2 = Leaf::new("A");
        collection.add_element(b.clone()).unwrap();
        collection.add_element(a1.clone()).unwrap();
        collection.add_element(a2.clone()).unwrap();

        let order = collection.iter().cloned().collect::<Vec<_>>();
        assert_eq!(order.len(), 3);
        assert!(Rc::ptr_eq(&order[0], &a1));
        assert!(Rc::ptr_eq(&order[1], &a2));
        assert!(Rc::ptr_eq(&order[2], &b));
    }

    #[test]
    fn enforces_max_occurs() {
        let mut collection = ElementCollection::sequence(1, Some(1)).with_element("A", Some(1));
        collection.add_element(Leaf::new("A")).unwrap();
        assert!(matches!(
            collection.add_element(Leaf::new("A")),
            Err(Error::MaxOccursExceeded(name)) if name == "A"
        ));
    }

    #[test]
    fn rejects_unknown_names() {
        let mut collection = ElementCollection::sequence(1, Some(1)).with_element("A", None);
        assert!(matches!(
            collection.add_element(Leaf::new("Z")),
            Err(Error::InvalidChildName { child, .. }) if child == "Z"
        ));
    }

    #[test]
    fn exclusive_choice_admits_one_branch() {
        let mut collection = ElementCollection::choice(1, Some(1))
            .with_element("Foo", Some(1))
            .with_element("Bar", Some(1));
        assert!(collection.is_exclusive());

        collection.add_element(Leaf::new("Foo")).unwrap();
        assert!(matches!(
            collection.add_element(Leaf::new("Bar")),
            Err(Error::ChoiceViolation(name)) if name == "Bar"
        ));
    }

    #[test]
    fn repeating_choice_mixes_branches() {
        let mut collection = ElementCollection::sequence(1, Some(1)).with_collection(
            ElementCollection::choice(0, None)
                .with_element("Foo", None)
                .with_element("Bar", None),
        );
        collection.add_element(Leaf::new("Foo")).unwrap();
        collection.add_element(Leaf::new("Bar")).unwrap();
        collection.add_element(Leaf::new("Foo")).unwrap();
        assert_eq!(collection.len(), 3);
        assert_eq!(collection.named("Foo").len(), 2);
    }

    #[test]
    fn wildcard_takes_unclaimed_names() {
        let mut collection = ElementCollection::sequence(1, Some(1))
            .with_element("A", Some(1))
            .with_any(None);
        collection.add_element(Leaf::new("A")).unwrap();
        collection.add_element(Leaf::new("Anything")).unwrap();
        // The named slot is full, the wildcard still has room
        collection.add_element(Leaf::new("A")).unwrap();
        assert_eq!(collection.len(), 3);
    }

    #[test]
    fn removes_by_identity() {
        let mut collection = ElementCollection::sequence(1, Some(1)).with_element("A", None);
        let first = Leaf::new("A");
        let second = Leaf::new("A");
        collection.add_element(first.clone()).unwrap();
        collection.add_element(second.clone()).unwrap();

        collection.remove_element(&first).unwrap();
        let remaining = collection.iter().cloned().collect::<Vec<_>>();
        assert_eq!(remaining.len(), 1);
        assert!(Rc::ptr_eq(&remaining[0], &second));

        assert!(matches!(
            collection.remove_element(&first),
            Err(Error::NotAChild(_))
        ));
    }

    #[test]
    fn filters_by_type() {
        let mut collection = ElementCollection::sequence(1, Some(1)).with_any(None);
        collection.add_element(Leaf::new("A")).unwrap();
        assert_eq!(collection.of_type::<Leaf>().len(), 1);
    }
}
