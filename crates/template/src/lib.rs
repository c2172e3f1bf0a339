//! Certificate page templates.
//!
//! A [`Template`] is parsed from JSON and structurally validated up front:
//! every font alias and binding an element uses must be declared, every path
//! must compile, and every failure carries a [`Locator`] naming the page,
//! element and field at fault. [`bind`] then resolves the template's
//! bindings against one record, producing a [`BoundTemplate`] for layout.

pub mod bind;
pub mod element;
pub mod error;
pub mod model;
mod parse;
pub mod registry;

pub use bind::{BoundContent, BoundTemplate, bind};
pub use element::{
    Align, Column, Element, ImageElement, Leader, Overflow, Padding, RuleElement, TableElement,
    TextBoxElement, TextElement,
};
pub use error::{BindError, Locator, TemplateError};
pub use model::{BaselineGrid, Binding, DocumentMetadata, PageDef, Template, VerificationRegion};
pub use registry::TemplateRegistry;

#[cfg(test)]
mod bind_test;
#[cfg(test)]
mod test_utils;
