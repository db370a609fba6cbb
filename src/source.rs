//! Proof-image resolution.
//!
//! A verification snapshot can carry several candidate proof images of
//! varying richness. [`resolve`] walks them as an ordered list of tiers,
//! first match wins: a candidate must both exist and pass the external
//! `is_valid_src` predicate (the security boundary — disallowed schemes,
//! script-capable formats, untrusted hosts). A rejected or malformed
//! candidate is skipped, never propagated; if every tier fails the
//! caller renders a no-evidence state.

use crate::constants::SCALE_TOLERANCE;
use crate::error::EvidenceError;
use crate::geometry::{Region, RenderScale, Size};
use crate::mapper::scale_region;
use crate::model::{CitationKind, TextItem, Verification};

/// The resolved proof image handed to the viewport.
///
/// Produced once per verification change and owned by the viewport
/// instance that resolved it; never mutated afterwards.
#[derive(Debug, Clone, PartialEq)]
pub struct ImageSource {
    /// URI accepted by the validity predicate
    pub src: String,
    /// Natural pixel dimensions, when recorded upstream
    pub natural: Option<Size>,
    /// Highlight box in image-pixel space, when the match carries one
    pub highlight: Option<Region>,
    /// Source-to-pixel conversion factor, when recorded
    pub render_scale: Option<RenderScale>,
    /// Searchable text regions on the resolved page
    pub text_items: Vec<TextItem>,
}

/// Normalize a raw screenshot payload into a renderable image reference.
///
/// An existing `data:` URI passes through unchanged. A bare base64 payload
/// gets the `data:image/jpeg;base64,` prefix. Errors on empty input or when
/// the opening bytes are not base64-alphabet characters.
pub fn normalize_screenshot(raw: &str) -> Result<String, EvidenceError> {
    if raw.is_empty() {
        return Err(EvidenceError::EmptyScreenshot);
    }
    if raw.starts_with("data:") {
        return Ok(raw.to_string());
    }

    // Checking the opening bytes is enough to reject markup or binary
    // payloads without scanning megabytes of base64.
    const HEAD_LEN: usize = 16;
    let head = &raw.as_bytes()[..raw.len().min(HEAD_LEN)];
    if let Some(bad) = head
        .iter()
        .find(|b| !(b.is_ascii_alphanumeric() || **b == b'+' || **b == b'/'))
    {
        return Err(EvidenceError::malformed_encoding(format!(
            "leading byte {:#04x} is not base64",
            bad
        )));
    }

    Ok(format!("data:image/jpeg;base64,{raw}"))
}

/// One resolution tier: extracts a candidate source from the snapshot,
/// or `None` when the snapshot does not carry this tier's data.
type Tier = fn(&Verification) -> Option<ImageSource>;

/// The page record flagged as the citation match (richest candidate).
fn tier_matched_page(verification: &Verification) -> Option<ImageSource> {
    let page = verification.matched_page()?;

    // Highlight coordinates may come from a different rasterization of
    // the page; normalize them into the page image's pixel space.
    let highlight = match (page.highlight, page.dimensions) {
        (Some(region), Some(dims)) => Some(scale_region(
            region,
            page.source_dimensions,
            dims,
            SCALE_TOLERANCE,
        )),
        (highlight, _) => highlight,
    };

    Some(ImageSource {
        src: page.image_src.clone(),
        natural: page.dimensions,
        highlight,
        render_scale: page.render_scale,
        text_items: page.text_items.clone(),
    })
}

/// A generically hosted proof image URL (no highlight or scale data).
fn tier_proof_url(verification: &Verification) -> Option<ImageSource> {
    let src = verification.proof_url.clone()?;
    Some(ImageSource {
        src,
        natural: None,
        highlight: None,
        render_scale: None,
        text_items: Vec::new(),
    })
}

/// The first searched page even if unmatched, so the user still sees a
/// searched page. No highlight: nothing matched on it.
fn tier_first_page(verification: &Verification) -> Option<ImageSource> {
    let page = verification.first_page()?;
    Some(ImageSource {
        src: page.image_src.clone(),
        natural: page.dimensions,
        highlight: None,
        render_scale: page.render_scale,
        text_items: page.text_items.clone(),
    })
}

/// A normalized inline screenshot, for URL citations only. A malformed
/// payload makes the tier absent rather than failing resolution.
fn tier_screenshot(verification: &Verification) -> Option<ImageSource> {
    if verification.citation_kind != CitationKind::Url {
        return None;
    }
    let raw = verification.screenshot.as_deref()?;
    let src = match normalize_screenshot(raw) {
        Ok(src) => src,
        Err(err) => {
            log::debug!("skipping screenshot tier: {err}");
            return None;
        }
    };
    Some(ImageSource {
        src,
        natural: None,
        highlight: None,
        render_scale: None,
        text_items: Vec::new(),
    })
}

/// The baseline single-image fallback with its recorded dimensions.
fn tier_document(verification: &Verification) -> Option<ImageSource> {
    let document = verification.document.as_ref()?;
    Some(ImageSource {
        src: document.src.clone(),
        natural: document.dimensions,
        highlight: None,
        render_scale: None,
        text_items: Vec::new(),
    })
}

/// Resolution tiers in priority order, first match wins.
const TIERS: [Tier; 5] = [
    tier_matched_page,
    tier_proof_url,
    tier_first_page,
    tier_screenshot,
    tier_document,
];

/// Select the best available proof image for a verification snapshot.
///
/// Every candidate passes through `is_valid_src` before acceptance;
/// rejected candidates are skipped. Deterministic and pure given the same
/// snapshot and predicate.
pub fn resolve(
    verification: &Verification,
    is_valid_src: impl Fn(&str) -> bool,
) -> Option<ImageSource> {
    for (index, tier) in TIERS.iter().enumerate() {
        let Some(candidate) = tier(verification) else {
            continue;
        };
        if is_valid_src(&candidate.src) {
            log::debug!("resolved proof image from tier {index}");
            return Some(candidate);
        }
        log::debug!("tier {index} candidate rejected by validator");
    }
    None
}
