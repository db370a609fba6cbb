//! Annotation scroll targeting and locate-drift tracking.
//!
//! Centers an annotated region within the viewport at the current zoom,
//! then watches subsequent scroll events for drift: once the user pans
//! away from the last programmatic target, a "return to annotation"
//! affordance is surfaced via the dirty bit.

use crate::constants::LOCATE_THRESHOLD;
use crate::geometry::{Region, RenderScale, Size};

/// Scroll offsets centering an annotation at a given zoom.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScrollTarget {
    pub scroll_left: f32,
    pub scroll_top: f32,
}

/// Compute the scroll offset centering `region` within the viewport.
///
/// `region` is in source-document coordinates; `render_scale` maps it into
/// image pixels, then the zoom projects it into displayed coordinates.
/// Clamped to the valid scroll range. Returns `None` when the render scale
/// is absent or the geometry is degenerate.
pub fn compute_target(
    region: Region,
    render_scale: Option<RenderScale>,
    natural: Size,
    zoom: f32,
    viewport_width: f32,
    viewport_height: f32,
) -> Option<ScrollTarget> {
    let scale = render_scale?;
    if !natural.is_valid() || !zoom.is_finite() || zoom <= 0.0 {
        return None;
    }

    let pixel_region = scale.apply(region);
    let displayed_width = natural.width * zoom;
    let displayed_height = natural.height * zoom;

    let scroll_left = (pixel_region.center_x() * zoom - viewport_width / 2.0)
        .clamp(0.0, (displayed_width - viewport_width).max(0.0));
    let scroll_top = (pixel_region.center_y() * zoom - viewport_height / 2.0)
        .clamp(0.0, (displayed_height - viewport_height).max(0.0));

    Some(ScrollTarget { scroll_left, scroll_top })
}

/// Tracks whether the user has panned away from the last programmatic
/// scroll target.
///
/// After a re-center the view animates toward the target; during that
/// settling window scroll events only check for arrival and never mark
/// the state dirty. Once settled, any per-axis delta beyond the threshold
/// flips the dirty bit.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct LocateState {
    /// Last programmatic scroll target, x
    pub target_scroll_left: f32,
    /// Last programmatic scroll target, y
    pub target_scroll_top: f32,
    /// The user has scrolled away from the target
    pub dirty: bool,
    /// A programmatic scroll toward the target is still settling
    pub animating: bool,
    /// A target has been recorded at least once
    has_target: bool,
}

impl LocateState {
    /// Create a fresh state with no recorded target.
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a programmatic scroll target and enter the settling window.
    /// Clears the dirty bit: the view is on its way back.
    pub fn begin(&mut self, target: ScrollTarget) {
        self.target_scroll_left = target.scroll_left;
        self.target_scroll_top = target.scroll_top;
        self.dirty = false;
        self.animating = true;
        self.has_target = true;
    }

    /// Feed a scroll event. Returns the (possibly updated) dirty bit.
    pub fn on_scroll(&mut self, scroll_left: f32, scroll_top: f32) -> bool {
        if !self.has_target {
            return false;
        }
        let dx = (scroll_left - self.target_scroll_left).abs();
        let dy = (scroll_top - self.target_scroll_top).abs();

        if self.animating {
            // Settling window: only check for arrival, never mark dirty.
            if dx <= LOCATE_THRESHOLD && dy <= LOCATE_THRESHOLD {
                self.animating = false;
            }
        } else if dx > LOCATE_THRESHOLD || dy > LOCATE_THRESHOLD {
            self.dirty = true;
        }
        self.dirty
    }

    /// Reset for a newly resolved image: no target, nothing dirty.
    pub fn reset(&mut self) {
        *self = Self::default();
    }
}
