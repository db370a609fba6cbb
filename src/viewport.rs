//! Zoom/pan gesture state machine.
//!
//! A gesture (wheel run, pinch, slider drag) goes `Idle -> Gesturing ->
//! Committing -> Idle`. While gesturing, every input event produces a
//! cheap visual-only [`PreviewTransform`] around the gesture anchor; the
//! authoritative [`ZoomState`] is untouched until [`ZoomPanController::commit`],
//! which clamps the final zoom and computes the scroll correction that
//! keeps the content point under the anchor visually stationary.
//!
//! Discrete controls (buttons, slider) have no gesture phase; they anchor
//! on the viewport center and commit directly.

use crate::constants::{
    DEFAULT_ZOOM_FLOOR, MIN_PINCH_SPAN, ZOOM_MAX, ZOOM_STEP, ZOOM_WHEEL_FACTOR,
};
use crate::fit::FitZoom;

/// Authoritative zoom state for a single viewport instance.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ZoomState {
    /// Committed zoom level (1.0 = natural size)
    pub zoom: f32,
    /// Minimum allowed zoom
    pub floor: f32,
    /// Maximum allowed zoom
    pub max: f32,
    /// Increment for discrete zoom controls
    pub step: f32,
    /// True until the user manually commits a zoom; suppresses automatic
    /// re-fitting on resize once false
    pub committed_by_system: bool,
}

impl Default for ZoomState {
    fn default() -> Self {
        Self {
            zoom: 1.0,
            floor: DEFAULT_ZOOM_FLOOR,
            max: ZOOM_MAX,
            step: ZOOM_STEP,
            committed_by_system: true,
        }
    }
}

impl ZoomState {
    /// Clamp a candidate zoom into `[floor, max]`.
    pub fn clamp(&self, zoom: f32) -> f32 {
        zoom.clamp(self.floor, self.max)
    }

    /// Apply a fit result as a system commit: updates the floor and, since
    /// the zoom is still system-owned, the zoom itself.
    pub fn apply_fit(&mut self, fit: FitZoom) {
        self.floor = fit.floor.min(self.max);
        if self.committed_by_system {
            self.zoom = self.clamp(fit.zoom);
        } else {
            // Manual zoom survives the refit but must stay in bounds.
            self.zoom = self.clamp(self.zoom);
        }
    }
}

/// Snapshot taken when a gesture begins; consumed and discarded at commit.
///
/// `pointer_x`/`pointer_y` are offsets within the container's content box.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GestureAnchor {
    pub pointer_x: f32,
    pub pointer_y: f32,
    pub scroll_x_at_start: f32,
    pub scroll_y_at_start: f32,
}

/// Phase of the zoom gesture state machine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum GesturePhase {
    /// No gesture in progress
    #[default]
    Idle,
    /// Input events are producing visual-only previews
    Gesturing,
    /// A final zoom is being clamped and written with scroll correction
    Committing,
}

/// Visual-only scale-about-a-point transform applied during a gesture.
///
/// The renderer applies this on top of the committed layout; it never
/// feeds back into [`ZoomState`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PreviewTransform {
    /// Scale factor relative to the committed zoom
    pub scale: f32,
    /// Transform origin within the container, x
    pub origin_x: f32,
    /// Transform origin within the container, y
    pub origin_y: f32,
}

/// Scroll offsets keeping the anchored content point in place after a
/// committed zoom change.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScrollCorrection {
    pub scroll_left: f32,
    pub scroll_top: f32,
}

/// Geometry of a two-finger pinch.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PinchGeometry {
    /// Midpoint between the touch points, x
    pub mid_x: f32,
    /// Midpoint between the touch points, y
    pub mid_y: f32,
    /// Distance between the touch points
    pub span: f32,
}

/// Compute pinch geometry from two touch points.
///
/// Returns `None` for degenerate input: coincident or near-coincident
/// points, or non-finite coordinates. Such gestures are ignored rather
/// than producing an infinite or NaN zoom.
pub fn pinch_geometry(a: (f32, f32), b: (f32, f32)) -> Option<PinchGeometry> {
    let span = ((b.0 - a.0).powi(2) + (b.1 - a.1).powi(2)).sqrt();
    if !span.is_finite() || span < MIN_PINCH_SPAN {
        return None;
    }
    Some(PinchGeometry {
        mid_x: (a.0 + b.0) / 2.0,
        mid_y: (a.1 + b.1) / 2.0,
        span,
    })
}

/// Pan drag bookkeeping: last pointer position while dragging.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum PanDragState {
    /// Not dragging
    #[default]
    Idle,
    /// Dragging with last pointer position
    Dragging { last_pos: (f32, f32) },
}

impl PanDragState {
    /// Check if currently dragging.
    pub fn is_dragging(&self) -> bool {
        matches!(self, PanDragState::Dragging { .. })
    }

    /// Start dragging at the given position.
    pub fn start(&mut self, pos: (f32, f32)) {
        *self = PanDragState::Dragging { last_pos: pos };
    }

    /// Update the drag position and return the delta since the last event.
    pub fn update(&mut self, pos: (f32, f32)) -> Option<(f32, f32)> {
        match self {
            PanDragState::Dragging { last_pos } => {
                let delta = (pos.0 - last_pos.0, pos.1 - last_pos.1);
                *last_pos = pos;
                Some(delta)
            }
            PanDragState::Idle => None,
        }
    }

    /// Stop dragging.
    pub fn end(&mut self) {
        *self = PanDragState::Idle;
    }
}

/// The zoom gesture controller owning one viewport's [`ZoomState`].
#[derive(Debug, Clone, Default)]
pub struct ZoomPanController {
    state: ZoomState,
    phase: GesturePhase,
    anchor: Option<GestureAnchor>,
    /// Raw zoom of the latest preview, used as the base for successive
    /// wheel ticks within one gesture
    preview_zoom: Option<f32>,
}

impl ZoomPanController {
    /// Create a controller with default zoom bounds.
    pub fn new() -> Self {
        Self::default()
    }

    /// The authoritative zoom state.
    pub fn state(&self) -> &ZoomState {
        &self.state
    }

    /// The committed zoom level.
    pub fn zoom(&self) -> f32 {
        self.state.zoom
    }

    /// Current phase of the gesture state machine.
    pub fn phase(&self) -> GesturePhase {
        self.phase
    }

    /// Whether a gesture is in progress.
    pub fn is_gesturing(&self) -> bool {
        self.phase == GesturePhase::Gesturing
    }

    /// Apply a fit-to-viewport result (system commit path).
    pub fn apply_fit(&mut self, fit: FitZoom) {
        self.state.apply_fit(fit);
    }

    /// Reset zoom and gesture state for a newly resolved image.
    pub fn reset(&mut self) {
        *self = Self::default();
    }

    /// Begin a gesture, snapshotting the anchor. Ignored unless idle.
    pub fn begin(&mut self, pointer_x: f32, pointer_y: f32, scroll_left: f32, scroll_top: f32) {
        if self.phase != GesturePhase::Idle {
            return;
        }
        self.anchor = Some(GestureAnchor {
            pointer_x,
            pointer_y,
            scroll_x_at_start: scroll_left,
            scroll_y_at_start: scroll_top,
        });
        self.phase = GesturePhase::Gesturing;
        self.preview_zoom = None;
    }

    /// Produce the visual-only preview for a raw zoom value.
    ///
    /// Cheap enough to run on every wheel tick or pinch move. Never
    /// mutates the committed zoom. Returns `None` when no gesture is in
    /// progress.
    pub fn update(&mut self, raw_zoom: f32) -> Option<PreviewTransform> {
        if self.phase != GesturePhase::Gesturing {
            return None;
        }
        let anchor = self.anchor?;
        if !raw_zoom.is_finite() || raw_zoom <= 0.0 {
            return None;
        }
        self.preview_zoom = Some(raw_zoom);
        Some(PreviewTransform {
            scale: raw_zoom / self.state.zoom,
            origin_x: anchor.pointer_x,
            origin_y: anchor.pointer_y,
        })
    }

    /// The base zoom for the next incremental input event: the live
    /// preview zoom while gesturing, else the committed zoom.
    pub fn effective_zoom(&self) -> f32 {
        self.preview_zoom.unwrap_or(self.state.zoom)
    }

    /// Target zoom for one wheel tick (positive delta zooms in).
    pub fn wheel_target(&self, delta: f32) -> f32 {
        let factor = if delta > 0.0 {
            ZOOM_WHEEL_FACTOR
        } else {
            1.0 / ZOOM_WHEEL_FACTOR
        };
        self.effective_zoom() * factor
    }

    /// Target zoom for a discrete zoom-in step.
    pub fn step_in_target(&self) -> f32 {
        self.state.clamp(self.state.zoom + self.state.step)
    }

    /// Target zoom for a discrete zoom-out step.
    pub fn step_out_target(&self) -> f32 {
        self.state.clamp(self.state.zoom - self.state.step)
    }

    /// Commit the gesture's final zoom and compute the scroll correction.
    ///
    /// Clamps into `[floor, max]` at 1% granularity, then corrects the
    /// scroll offsets so the content point that was under the anchor at
    /// gesture start stays under it. Returns `None` when no gesture is in
    /// progress (nothing to commit).
    pub fn commit(&mut self, final_zoom: f32) -> Option<ScrollCorrection> {
        if self.phase != GesturePhase::Gesturing {
            return None;
        }
        let anchor = self.anchor.take()?;
        self.phase = GesturePhase::Committing;
        let correction = self.commit_at(final_zoom, anchor);
        self.phase = GesturePhase::Idle;
        self.preview_zoom = None;
        Some(correction)
    }

    /// Commit a zoom anchored on the viewport center (slider/button path;
    /// no gesture phase).
    pub fn commit_centered(
        &mut self,
        final_zoom: f32,
        viewport_width: f32,
        viewport_height: f32,
        scroll_left: f32,
        scroll_top: f32,
    ) -> Option<ScrollCorrection> {
        if self.phase != GesturePhase::Idle {
            return None;
        }
        let anchor = GestureAnchor {
            pointer_x: viewport_width / 2.0,
            pointer_y: viewport_height / 2.0,
            scroll_x_at_start: scroll_left,
            scroll_y_at_start: scroll_top,
        };
        self.phase = GesturePhase::Committing;
        let correction = self.commit_at(final_zoom, anchor);
        self.phase = GesturePhase::Idle;
        Some(correction)
    }

    /// Abort an in-progress gesture: the preview transform is discarded
    /// and the committed state is left exactly as before the gesture.
    pub fn cancel(&mut self) {
        self.anchor = None;
        self.preview_zoom = None;
        self.phase = GesturePhase::Idle;
    }

    fn commit_at(&mut self, final_zoom: f32, anchor: GestureAnchor) -> ScrollCorrection {
        // A non-finite target would poison the authoritative zoom; fall
        // back to the current zoom (the commit becomes scroll-neutral).
        let target = if final_zoom.is_finite() {
            final_zoom
        } else {
            self.state.zoom
        };
        // Rounding can push a value sitting at an unaligned floor back
        // below it, so clamp again after rounding.
        let new_zoom = self.state.clamp(round_to_percent(self.state.clamp(target)));

        // The old zoom must be captured before the state write; the
        // correction ratio is computed from this local, never re-read.
        let old_zoom = self.state.zoom;
        self.state.zoom = new_zoom;
        self.state.committed_by_system = false;

        let ratio = if old_zoom > 0.0 { new_zoom / old_zoom } else { 1.0 };
        log::debug!("zoom commit: {old_zoom:.2} -> {new_zoom:.2} (ratio {ratio:.3})");

        ScrollCorrection {
            scroll_left: (anchor.pointer_x + anchor.scroll_x_at_start) * ratio - anchor.pointer_x,
            scroll_top: (anchor.pointer_y + anchor.scroll_y_at_start) * ratio - anchor.pointer_y,
        }
    }
}

/// Round a zoom value to 1% granularity.
fn round_to_percent(zoom: f32) -> f32 {
    (zoom * 100.0).round() / 100.0
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPSILON: f32 = 1e-4;

    /// Screen-space x of a natural-coordinate content point.
    fn on_screen_x(content_x: f32, zoom: f32, scroll_left: f32) -> f32 {
        content_x * zoom - scroll_left
    }

    #[test]
    fn test_gesture_phases() {
        let mut controller = ZoomPanController::new();
        assert_eq!(controller.phase(), GesturePhase::Idle);

        controller.begin(150.0, 80.0, 40.0, 20.0);
        assert_eq!(controller.phase(), GesturePhase::Gesturing);

        controller.update(1.3).unwrap();
        assert_eq!(controller.phase(), GesturePhase::Gesturing);

        controller.commit(1.3).unwrap();
        assert_eq!(controller.phase(), GesturePhase::Idle);
    }

    #[test]
    fn test_update_is_visual_only() {
        let mut controller = ZoomPanController::new();
        controller.begin(150.0, 80.0, 40.0, 20.0);

        let preview = controller.update(1.5).unwrap();
        assert!((preview.scale - 1.5).abs() < EPSILON);
        assert_eq!(preview.origin_x, 150.0);
        assert_eq!(preview.origin_y, 80.0);
        // Authoritative zoom unchanged until commit
        assert!((controller.zoom() - 1.0).abs() < EPSILON);
    }

    #[test]
    fn test_commit_clamps_and_rounds() {
        let mut controller = ZoomPanController::new();
        controller.begin(0.0, 0.0, 0.0, 0.0);
        controller.commit(9.0).unwrap();
        assert!((controller.zoom() - ZOOM_MAX).abs() < EPSILON);

        controller.begin(0.0, 0.0, 0.0, 0.0);
        controller.commit(1.2345).unwrap();
        assert!((controller.zoom() - 1.23).abs() < EPSILON);
    }

    #[test]
    fn test_committed_zoom_always_within_bounds() {
        let mut controller = ZoomPanController::new();
        for raw in [-3.0_f32, 0.0, 0.01, 0.49, 1.0, 1.99, 2.5, 100.0] {
            controller.begin(10.0, 10.0, 0.0, 0.0);
            controller.commit(raw).unwrap();
            let state = controller.state();
            assert!(state.zoom >= state.floor && state.zoom <= state.max, "raw {raw}");
        }
    }

    #[test]
    fn test_commit_respects_unaligned_floor() {
        let mut controller = ZoomPanController::new();
        // Fit floors are rarely 1%-aligned (e.g. a full-width fit of a
        // 1700px page in a 528px viewport).
        controller.apply_fit(crate::fit::FitZoom { zoom: 0.5, floor: 0.3106 });

        for raw in [0.0_f32, 0.25, 0.31, 0.3106] {
            controller.begin(10.0, 10.0, 0.0, 0.0);
            controller.commit(raw).unwrap();
            let state = controller.state();
            assert!(
                state.zoom >= state.floor && state.zoom <= state.max,
                "raw {raw} committed {} outside [{}, {}]",
                state.zoom,
                state.floor,
                state.max
            );
        }
    }

    #[test]
    fn test_non_finite_commit_keeps_current_zoom() {
        let mut controller = ZoomPanController::new();
        for bad in [f32::NAN, f32::INFINITY, f32::NEG_INFINITY] {
            controller.begin(10.0, 10.0, 0.0, 0.0);
            let correction = controller.commit(bad).unwrap();
            assert!(controller.zoom().is_finite());
            assert!((controller.zoom() - 1.0).abs() < EPSILON);
            // Zoom unchanged, so the commit is scroll-neutral
            assert!((correction.scroll_left - 0.0).abs() < EPSILON);
            assert!((correction.scroll_top - 0.0).abs() < EPSILON);
        }

        let mut controller = ZoomPanController::new();
        controller
            .commit_centered(f32::NAN, 600.0, 400.0, 100.0, 50.0)
            .unwrap();
        assert!(controller.zoom().is_finite());
        assert!((controller.zoom() - 1.0).abs() < EPSILON);
    }

    #[test]
    fn test_anchor_preservation_within_one_pixel() {
        let mut controller = ZoomPanController::new();
        let (pointer_x, scroll_left) = (150.0, 40.0);

        // Content point under the pointer before the gesture
        let content_x = (pointer_x + scroll_left) / controller.zoom();
        let before = on_screen_x(content_x, controller.zoom(), scroll_left);

        controller.begin(pointer_x, 80.0, scroll_left, 20.0);
        let correction = controller.commit(1.53).unwrap();
        let after = on_screen_x(content_x, controller.zoom(), correction.scroll_left);

        assert!((after - before).abs() <= 1.0);
    }

    #[test]
    fn test_cancel_restores_pre_gesture_state() {
        let mut controller = ZoomPanController::new();
        let before = *controller.state();

        controller.begin(150.0, 80.0, 40.0, 20.0);
        controller.update(1.8);
        controller.cancel();

        assert_eq!(*controller.state(), before);
        assert_eq!(controller.phase(), GesturePhase::Idle);
        assert!(controller.commit(1.8).is_none());
    }

    #[test]
    fn test_commit_centered_skips_gesturing() {
        let mut controller = ZoomPanController::new();
        let correction = controller
            .commit_centered(1.5, 600.0, 400.0, 100.0, 50.0)
            .unwrap();

        assert!((controller.zoom() - 1.5).abs() < EPSILON);
        // Anchored at (300, 200): (300 + 100) * 1.5 - 300 = 300
        assert!((correction.scroll_left - 300.0).abs() < EPSILON);
        assert!((correction.scroll_top - 175.0).abs() < EPSILON);
        assert!(!controller.state().committed_by_system);
    }

    #[test]
    fn test_pinch_preview_from_span_ratio() {
        let mut controller = ZoomPanController::new();
        let start = pinch_geometry((100.0, 100.0), (200.0, 100.0)).unwrap();
        assert!((start.span - 100.0).abs() < EPSILON);

        controller.begin(start.mid_x, start.mid_y, 0.0, 0.0);
        let current = pinch_geometry((75.0, 100.0), (225.0, 100.0)).unwrap();
        let raw = controller.zoom() * current.span / start.span;
        let preview = controller.update(raw).unwrap();

        assert!((preview.scale - 1.5).abs() < EPSILON);
    }

    #[test]
    fn test_degenerate_pinch_is_ignored() {
        assert!(pinch_geometry((100.0, 100.0), (100.0, 100.0)).is_none());
        assert!(pinch_geometry((100.0, 100.0), (104.0, 103.0)).is_none());
        assert!(pinch_geometry((f32::NAN, 100.0), (200.0, 100.0)).is_none());
    }

    #[test]
    fn test_wheel_target_compounds_during_gesture() {
        let mut controller = ZoomPanController::new();
        controller.begin(0.0, 0.0, 0.0, 0.0);

        let first = controller.wheel_target(1.0);
        assert!((first - 1.1).abs() < EPSILON);
        controller.update(first);

        let second = controller.wheel_target(1.0);
        assert!((second - 1.21).abs() < 1e-3);
    }

    #[test]
    fn test_step_targets_clamp() {
        let mut controller = ZoomPanController::new();
        assert!((controller.step_in_target() - 1.1).abs() < EPSILON);
        assert!((controller.step_out_target() - 0.9).abs() < EPSILON);

        controller
            .commit_centered(ZOOM_MAX, 600.0, 400.0, 0.0, 0.0)
            .unwrap();
        assert!((controller.step_in_target() - ZOOM_MAX).abs() < EPSILON);
    }

    #[test]
    fn test_refit_respects_manual_zoom() {
        let mut controller = ZoomPanController::new();
        controller.apply_fit(crate::fit::FitZoom { zoom: 0.8, floor: 0.4 });
        assert!((controller.zoom() - 0.8).abs() < EPSILON);

        // Manual commit takes ownership of the zoom
        controller.commit_centered(1.2, 600.0, 400.0, 0.0, 0.0).unwrap();
        controller.apply_fit(crate::fit::FitZoom { zoom: 0.6, floor: 0.3 });
        assert!((controller.zoom() - 1.2).abs() < EPSILON);
        assert!((controller.state().floor - 0.3).abs() < EPSILON);
    }

    #[test]
    fn test_pan_drag_delta() {
        let mut drag = PanDragState::default();
        assert!(drag.update((10.0, 10.0)).is_none());

        drag.start((100.0, 100.0));
        assert_eq!(drag.update((110.0, 105.0)), Some((10.0, 5.0)));
        assert_eq!(drag.update((112.0, 100.0)), Some((2.0, -5.0)));

        drag.end();
        assert!(!drag.is_dragging());
    }
}
