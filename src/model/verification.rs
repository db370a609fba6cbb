//! The verification record consumed by the engine.
//!
//! A `Verification` is the upstream snapshot describing every candidate
//! proof image for a single citation: per-page search records, a hosted
//! proof URL, an inline screenshot for URL citations, and a baseline
//! document image. The engine never fetches or decodes any of these; it
//! only selects among them (see [`crate::source`]).

use serde::{Deserialize, Serialize};

use crate::geometry::{Region, RenderScale, Size};

/// What kind of citation this verification backs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CitationKind {
    /// Citation into a source document (PDF page images, etc.)
    #[default]
    Document,
    /// Citation of a web page (screenshot evidence)
    Url,
}

/// A text region found on a searched page.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TextItem {
    /// Bounding region of the text, in the page's source coordinate space
    pub region: Region,
    /// The recognized text content
    pub text: String,
}

/// One searched page of a source document.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct PageRecord {
    /// URI of the rendered page image
    pub image_src: String,

    /// Natural pixel dimensions of the page image, when recorded
    #[serde(default)]
    pub dimensions: Option<Size>,

    /// Dimensions of the rasterization the highlight coordinates were
    /// measured against, when it differs from the page image itself
    #[serde(default)]
    pub source_dimensions: Option<Size>,

    /// Whether this page was identified as the one matching the citation
    #[serde(default)]
    pub is_match: bool,

    /// Bounding box of the matched content, in source-document coordinates
    #[serde(default)]
    pub highlight: Option<Region>,

    /// Factor converting source-document coordinates into image pixels
    #[serde(default)]
    pub render_scale: Option<RenderScale>,

    /// Searchable text regions on the page
    #[serde(default)]
    pub text_items: Vec<TextItem>,
}

/// The baseline single-image fallback with its recorded dimensions.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DocumentImage {
    /// URI of the document image
    pub src: String,

    /// Recorded natural dimensions, when known
    #[serde(default)]
    pub dimensions: Option<Size>,
}

/// A verification snapshot for a single citation.
///
/// Produced upstream once per verification change; the engine treats it as
/// immutable input and resolves it deterministically.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Verification {
    /// What kind of citation this verification backs
    #[serde(default)]
    pub citation_kind: CitationKind,

    /// Per-page search records, in search order
    #[serde(default)]
    pub pages: Vec<PageRecord>,

    /// Generically hosted proof image URL (no highlight or scale data)
    #[serde(default)]
    pub proof_url: Option<String>,

    /// Inline screenshot for URL citations: raw base64 or a data URI
    #[serde(default)]
    pub screenshot: Option<String>,

    /// Baseline document image fallback
    #[serde(default)]
    pub document: Option<DocumentImage>,
}

impl Verification {
    /// The page record flagged as the citation match, if any.
    pub fn matched_page(&self) -> Option<&PageRecord> {
        self.pages.iter().find(|page| page.is_match)
    }

    /// The first searched page, matched or not.
    pub fn first_page(&self) -> Option<&PageRecord> {
        self.pages.first()
    }
}
