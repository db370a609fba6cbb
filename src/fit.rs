//! Fit-to-viewport sizing.
//!
//! Computes the initial zoom and the minimum allowed zoom ("floor") for a
//! proof image given its natural size and the available display space.
//! Width-priority fit: the image width is constrained to the viewport and
//! vertical overflow is handled by scrolling.

use crate::constants::{DEFAULT_ZOOM_FLOOR, MIN_READABLE_ZOOM, ZOOM_MIN};
use crate::geometry::Size;

/// Layout parameters feeding the fit computation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FitParams {
    /// Horizontal margin outside the viewer shell
    pub outer_margin: f32,
    /// Horizontal padding inside the viewer shell
    pub shell_padding: f32,
    /// Lower bound for the initial zoom so text stays legible
    pub min_readable_zoom: f32,
}

impl Default for FitParams {
    fn default() -> Self {
        Self {
            outer_margin: 0.0,
            shell_padding: 0.0,
            min_readable_zoom: MIN_READABLE_ZOOM,
        }
    }
}

/// Result of a fit computation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FitZoom {
    /// Initial zoom: full-width fit raised to the readable minimum
    pub zoom: f32,
    /// Minimum allowed zoom; may sit below the readable minimum so the
    /// user can always zoom out to a full-width fit
    pub floor: f32,
}

/// Compute the initial zoom and floor for an image.
///
/// `fit_zoom_width` is the zoom at which the image width exactly fills the
/// available space. The initial zoom is that value clamped into
/// `[min_readable_zoom, 1]`; the floor is `min(DEFAULT_ZOOM_FLOOR,
/// fit_zoom)` with `fit_zoom` clamped into `[ZOOM_MIN, 1]`.
///
/// Returns `None` for degenerate natural sizes or non-positive available
/// width. Callers re-evaluate on every container/viewport change but must
/// apply the result only while the zoom is still system-committed, so a
/// resize never fights a manual zoom.
pub fn compute_initial_zoom(
    natural: Size,
    container: Option<Size>,
    viewport_width: f32,
    params: &FitParams,
) -> Option<FitZoom> {
    if !natural.is_valid() {
        return None;
    }

    let mut available = viewport_width - params.outer_margin - params.shell_padding;
    if let Some(container) = container {
        if container.width > 0.0 {
            available = available.min(container.width);
        }
    }
    if available <= 0.0 || !available.is_finite() {
        return None;
    }

    let fit_zoom_width = available / natural.width;
    let fit_zoom = fit_zoom_width.clamp(ZOOM_MIN, 1.0);
    // `min_readable_zoom` is a public field; cap it so an out-of-range
    // value cannot panic the clamp.
    let readable_zoom = fit_zoom_width.clamp(params.min_readable_zoom.min(1.0), 1.0);

    log::trace!(
        "fit: available={available:.1} fit={fit_zoom_width:.3} readable={readable_zoom:.3}"
    );

    Some(FitZoom {
        zoom: readable_zoom,
        floor: DEFAULT_ZOOM_FLOOR.min(fit_zoom),
    })
}
