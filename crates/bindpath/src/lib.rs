//! Binding paths: a small, closed expression language for selecting values
//! from a structured record.
//!
//! ```text
//! path     := "." | "/" segments | segments
//! segments := segment ("/" segment)*
//! segment  := name [ "[" ( "*" | index ) "]" ]
//! ```
//!
//! Paths are compiled once with [`parse_path`] and then evaluated any number
//! of times. Evaluation never mutates the record, so repeated resolution of
//! the same path yields identical results.

pub mod ast;
pub mod coerce;
pub mod error;
mod parser;
pub mod resolve;

// --- Public API ---
pub use ast::{BindingPath, Segment, Selector};
pub use coerce::{Coercion, DateFormat, NumberFormat};
pub use error::{BindingError, PathError};
pub use parser::parse_path;
pub use resolve::{BindingKind, Resolved};
