//! XML printing.
//!
//! This module renders a `Document` tree back to XML text, with proper
//! escaping and either indented or compact layout.

pub mod xml;

pub use xml::{to_string, write_document, PrintOptions, Printer};
