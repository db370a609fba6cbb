//! Input data model for the evidence viewport engine.

mod verification;

pub use verification::{CitationKind, DocumentImage, PageRecord, TextItem, Verification};
