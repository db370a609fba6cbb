//! Keyhole window: a fixed-height cropped strip view of a proof image.
//!
//! The keyhole never scales content. The image keeps its displayed size;
//! the window only clips it and positions the crop so the highlighted
//! region sits as close to center as the scroll range allows, with a fade
//! on each edge that still has content beyond it.

use crate::geometry::Region;

/// Declarative two-sided edge fade descriptor.
///
/// A side's fade width is zero when there is no further content in that
/// direction. Recompute only when the scrollable-edge booleans flip, not
/// on every scroll tick, so the crop illusion stays crisp.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct EdgeMask {
    /// Fade width on the left edge, in pixels
    pub left: f32,
    /// Fade width on the right edge, in pixels
    pub right: f32,
}

/// Compute the crop offset for a keyhole strip.
///
/// Without a highlight the image is centered. With one, the highlight
/// center is brought to the container center, clamped to the valid
/// scroll range.
pub fn compute_offset(
    displayed_width: f32,
    container_width: f32,
    highlight: Option<&Region>,
) -> f32 {
    let max_scroll = (displayed_width - container_width).max(0.0);
    match highlight {
        None => max_scroll / 2.0,
        Some(hl) => (hl.center_x() - container_width / 2.0).clamp(0.0, max_scroll),
    }
}

/// Which edges currently have clipped content beyond them.
pub fn scrollable_edges(
    scroll_left: f32,
    displayed_width: f32,
    container_width: f32,
) -> (bool, bool) {
    let max_scroll = (displayed_width - container_width).max(0.0);
    (scroll_left > 0.0, scroll_left < max_scroll)
}

/// Build the edge fade mask from the scrollable-edge booleans.
pub fn build_edge_mask(can_scroll_left: bool, can_scroll_right: bool, fade_width: f32) -> EdgeMask {
    EdgeMask {
        left: if can_scroll_left { fade_width } else { 0.0 },
        right: if can_scroll_right { fade_width } else { 0.0 },
    }
}
