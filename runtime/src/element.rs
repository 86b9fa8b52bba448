use crate::{collection::ElementCollection, error::Error, writer::XmlWriter};
use std::{
    any::Any,
    cell::{Ref, RefCell, RefMut},
    fmt,
    rc::{Rc, Weak},
};

/// Shared handle to a generated element.
pub type ElementRef = Rc<RefCell<dyn Element>>;

/// Non-owning back-reference, used from a child to its parent.
pub type WeakElementRef = Weak<RefCell<dyn Element>>;

/// Erases the concrete type of a freshly created element.
pub fn into_element_ref<T: Element>(element: Rc<RefCell<T>>) -> ElementRef {
    element
}

/// Common capability of every generated element type.
///
/// The `as_*` accessors expose the optional capabilities; generated types override the ones they
/// implement.
pub trait Element: Any + fmt::Debug {
    fn element_name(&self) -> &str;

    /// Namespace the element is serialized in.
    fn namespace(&self) -> Option<&str>;

    /// The element this one was added to, if it is still alive.
    fn parent(&self) -> Option<ElementRef>;

    fn set_parent(&mut self, parent: Option<WeakElementRef>);

    /// Serializes the element, its set attributes, its content and its children in order.
    fn output_xml(&self, writer: &mut XmlWriter) -> Result<(), Error>;

    fn as_any(&self) -> &dyn Any;

    fn as_any_mut(&mut self) -> &mut dyn Any;

    fn as_parent(&self) -> Option<&dyn Parent> {
        None
    }

    fn as_parent_mut(&mut self) -> Option<&mut dyn Parent> {
        None
    }

    fn as_child_factory(&self) -> Option<&dyn ChildFactory> {
        None
    }

    fn as_set_attributes(&mut self) -> Option<&mut dyn SetAttributes> {
        None
    }
}

/// An element with child elements.
pub trait Parent: Element {
    fn children(&self) -> &ElementCollection;

    /// Places `child` into the first slot accepting it and makes `self` its parent.
    fn add_child(&mut self, child: ElementRef) -> Result<(), Error>;

    /// Removes `child` and clears its parent.
    fn remove_child(&mut self, child: &ElementRef) -> Result<(), Error>;
}

/// Creates children from their XML element names.
pub trait ChildFactory {
    /// Fails with [Error::InvalidChildName] for names the element does not declare.
    fn create_child(&self, name: &str) -> Result<ElementRef, Error>;
}

/// Accepts attribute values (and text content, under the name `Content`) as strings.
pub trait SetAttributes {
    /// Unknown names are ignored; values that do not parse are an error.
    fn set_attribute(&mut self, name: &str, value: &str) -> Result<(), Error>;
}

/// Borrows `element` as its concrete type `T`.
pub fn downcast_ref<T: Element>(element: &ElementRef) -> Option<Ref<'_, T>> {
    Ref::filter_map(element.borrow(), |element| element.as_any().downcast_ref::<T>()).ok()
}

/// Mutably borrows `element` as its concrete type `T`.
pub fn downcast_mut<T: Element>(element: &ElementRef) -> Option<RefMut<'_, T>> {
    RefMut::filter_map(element.borrow_mut(), |element| {
        element.as_any_mut().downcast_mut::<T>()
    })
    .ok()
}

/// Whether `element` is of the concrete type `T`.
pub fn is<T: Element>(element: &ElementRef) -> bool {
    element.borrow().as_any().is::<T>()
}

/// Adds `child` to `parent` through the [Parent] capability.
pub fn add_child(parent: &ElementRef, child: ElementRef) -> Result<(), Error> {
    let mut parent = parent.borrow_mut();
    let name = parent.element_name().to_string();
    parent
        .as_parent_mut()
        .ok_or(Error::NotAParent(name))?
        .add_child(child)
}

/// Removes `child` from `parent` through the [Parent] capability.
pub fn remove_child(parent: &ElementRef, child: &ElementRef) -> Result<(), Error> {
    let mut parent = parent.borrow_mut();
    let name = parent.element_name().to_string();
    parent
        .as_parent_mut()
        .ok_or(Error::NotAParent(name))?
        .remove_child(child)
}
