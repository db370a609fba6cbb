//! Centralized constants for the evidence viewport engine.
//!
//! All magic numbers and repeated tunables are defined here for consistency
//! and easy maintenance.

// =============================================================================
// Zoom
// =============================================================================

/// Hard lower bound for any fit-derived zoom value
pub const ZOOM_MIN: f32 = 0.1;

/// Hard upper bound for committed zoom
pub const ZOOM_MAX: f32 = 2.0;

/// Default zoom floor; the effective floor may drop below this so the user
/// can always zoom out to a full-width fit (see `fit::compute_initial_zoom`)
pub const DEFAULT_ZOOM_FLOOR: f32 = 0.5;

/// Increment used by discrete zoom controls (buttons, keyboard)
pub const ZOOM_STEP: f32 = 0.1;

/// Multiplicative factor applied per wheel tick (inverted for zoom-out)
pub const ZOOM_WHEEL_FACTOR: f32 = 1.1;

/// Default lower bound for the initial "readable" zoom
pub const MIN_READABLE_ZOOM: f32 = 0.5;

// =============================================================================
// Gestures
// =============================================================================

/// Minimum pinch span in pixels; spans below this are treated as degenerate
/// and the gesture is ignored rather than producing an unstable zoom
pub const MIN_PINCH_SPAN: f32 = 10.0;

// =============================================================================
// Coordinate mapping
// =============================================================================

/// Tolerance factor for accepting a rescaled annotation region; a scaled box
/// extending past `target_width * SCALE_TOLERANCE` is assumed to already be
/// in target space and is returned unscaled
pub const SCALE_TOLERANCE: f32 = 1.05;

// =============================================================================
// Locate / drift detection
// =============================================================================

/// Per-axis pixel threshold both for settling onto a programmatic scroll
/// target and for marking the view as drifted away from it
pub const LOCATE_THRESHOLD: f32 = 15.0;

// =============================================================================
// Keyhole window
// =============================================================================

/// Width in pixels of the edge fade applied to a scrollable keyhole side
pub const EDGE_FADE_WIDTH: f32 = 24.0;
