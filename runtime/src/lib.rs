//! Runtime support for code generated by xsdgen.
//!
//! Generated modules import this crate as `meta` and build on:
//!
//! - the [Element], [Parent], [ChildFactory] and [SetAttributes] capabilities,
//! - [ElementCollection], which stores children the way the content model lays them out,
//! - [XmlWriter] and the value helpers for serialization,
//! - [Registry] and [Loader] for reading documents back.

mod collection;
mod element;
mod error;
mod loader;
mod registry;
mod values;
mod writer;

pub use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
pub use collection::{Compositor, ElementCollection};
pub use element::{
    add_child, downcast_mut, downcast_ref, into_element_ref, is, remove_child, ChildFactory,
    Element, ElementRef, Parent, SetAttributes, WeakElementRef,
};
pub use error::Error;
pub use loader::{Loader, CONTENT_NAME, XSI_NAMESPACE};
pub use registry::{Factory, Registry, RegistryEntry};
pub use values::*;
pub use writer::{to_xml_string, XmlWriter};
