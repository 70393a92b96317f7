//! # xmlpp
//!
//! Keyed, chainable construction of XML documents. Elements are addressed by
//! tag name and created on first access, scalar values are written through
//! `Display` and read back through lenient or strict coercion.
//!
//! ## Quick Start
//!
//! ```
//! use xmlpp::KeyedDocument;
//!
//! let mut doc = KeyedDocument::with_declaration("1.0", "utf-8", None);
//! doc.child("root").child("name").set("archer");
//! doc.child("root").child("age").set(10);
//!
//! let age: i32 = doc.child("root").child("age").as_i32();
//! assert_eq!(age, 10);
//! assert!(doc.serialize().contains("<age>10</age>"));
//! ```
//!
//! The [`tree`] and [`serial`] modules hold the arena tree and the printer
//! the keyed layer is built on; they are usable directly.

pub mod error;
pub mod keyed;
pub mod serial;
pub mod tree;

// Re-export primary types at the crate root for convenience.
pub use error::ValueError;
pub use keyed::{FromText, Handle, KeyedDocument, NodeMut, NodeRef};
pub use serial::PrintOptions;
