//! Structured certificate records.
//!
//! A [`Record`] is an immutable tree of sections, repeated sections and
//! scalars. Its canonical serialization (compact JSON in document order) is
//! hashed with SHA-256 to produce the [`ContentHash`] that identifies every
//! document rendered from it.
//!
//! Records reach the renderer only as [`ValidatedRecord`]s, which require a
//! passing [`ValidationVerdict`] from the external schema validator.

pub mod error;
pub mod hash;
pub mod node;
pub mod record;
pub mod verdict;

pub use error::RecordError;
pub use hash::ContentHash;
pub use node::{RecordNode, Scalar};
pub use record::Record;
pub use verdict::{Acceptance, AcceptancePolicy, Provenance, ValidatedRecord, ValidationVerdict};
