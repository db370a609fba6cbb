//! Coordinate mapping between source-document space and image-pixel space.
//!
//! Upstream annotation coordinates may originate from a different
//! rasterization of the same page than the proof image we ended up with.
//! Blind scaling of mismatched inputs silently produces off-screen boxes,
//! so the scaled result is accepted only when it lands plausibly inside
//! the target image; otherwise the region is assumed to already be in
//! target space and is returned unchanged.

use crate::geometry::{Region, Size};

/// Rescale `item` from `source_dims` into `target_dims` pixel space.
///
/// The horizontal scale comes from the width ratio; the vertical scale
/// from the height ratio when the source height is known, else the
/// horizontal scale is reused. The scaled region is accepted only if
/// `scaled_x >= 0` and `scaled_x + scaled_width <= target.width *
/// tolerance`; otherwise `item` is returned unchanged.
///
/// Pure and total: always returns a region, never fails.
pub fn scale_region(
    item: Region,
    source_dims: Option<Size>,
    target_dims: Size,
    tolerance: f32,
) -> Region {
    let Some(source) = source_dims else {
        return item;
    };
    if source.width <= 0.0 {
        return item;
    }

    let scale_x = target_dims.width / source.width;
    let scale_y = if source.height > 0.0 {
        target_dims.height / source.height
    } else {
        scale_x
    };

    let scaled = Region {
        x: item.x * scale_x,
        y: item.y * scale_y,
        width: item.width * scale_x,
        height: item.height * scale_y,
    };

    // Sanity gate: a plausible box starts inside the image and does not
    // extend past the tolerance-padded right edge.
    if scaled.x >= 0.0 && scaled.x + scaled.width <= target_dims.width * tolerance {
        scaled
    } else {
        item
    }
}
