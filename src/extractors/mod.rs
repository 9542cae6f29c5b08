// src/extractors/mod.rs
pub mod elements;
pub mod section;

// Re-export key extraction types for convenience
pub use elements::{parse_document_elements, DocumentElement};
pub use section::{extract_sections, FilingRow, FilingTable, SectionMap};
