//! Per-viewport composition of the engine's components.
//!
//! An [`EvidenceViewport`] owns everything mutable for one proof image:
//! the resolved source, the zoom gesture controller, scroll offsets,
//! locate-drift state, and resize coalescing. Instances are independent;
//! multiple concurrent viewports never share state.
//!
//! The rendering layer consumes [`Frame`] snapshots and paints without
//! further computation.

use crate::constants::EDGE_FADE_WIDTH;
use crate::fit::{compute_initial_zoom, FitParams};
use crate::geometry::{RenderScale, Size};
use crate::keyhole::{build_edge_mask, compute_offset, scrollable_edges, EdgeMask};
use crate::locate::{compute_target, LocateState, ScrollTarget};
use crate::model::Verification;
use crate::source::{resolve, ImageSource};
use crate::viewport::{PanDragState, PreviewTransform, ZoomPanController};

/// Container and viewport dimensions, refreshed by an external resize
/// observer.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ViewportMetrics {
    /// Visible width of the image container
    pub container_width: f32,
    /// Visible height of the image container
    pub container_height: f32,
    /// Width of the surrounding viewport (drives fit-to-width)
    pub viewport_width: f32,
}

/// Everything a presentation layer needs to paint one frame.
#[derive(Debug, Clone, PartialEq)]
pub struct Frame {
    pub src: String,
    pub natural_width: f32,
    pub natural_height: f32,
    pub zoom: f32,
    pub scroll_left: f32,
    pub scroll_top: f32,
    pub edge_mask: EdgeMask,
    pub locate_dirty: bool,
}

/// A single evidence viewport instance.
#[derive(Debug, Clone, Default)]
pub struct EvidenceViewport {
    source: Option<ImageSource>,
    controller: ZoomPanController,
    locate: LocateState,
    pan_drag: PanDragState,
    metrics: Option<ViewportMetrics>,
    /// Latest unapplied resize notification; bursts coalesce here
    pending_resize: Option<ViewportMetrics>,
    scroll_left: f32,
    scroll_top: f32,
    fit_params: FitParams,
}

impl EvidenceViewport {
    /// Create a viewport with default fit parameters.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a viewport with explicit fit parameters.
    pub fn with_fit_params(fit_params: FitParams) -> Self {
        Self {
            fit_params,
            ..Self::default()
        }
    }

    /// The currently resolved proof image, if any.
    pub fn source(&self) -> Option<&ImageSource> {
        self.source.as_ref()
    }

    /// The zoom controller (read access for hosts driving gestures).
    pub fn controller(&self) -> &ZoomPanController {
        &self.controller
    }

    /// Current committed zoom.
    pub fn zoom(&self) -> f32 {
        self.controller.zoom()
    }

    /// Current scroll offsets.
    pub fn scroll(&self) -> (f32, f32) {
        (self.scroll_left, self.scroll_top)
    }

    /// Re-resolve the proof image for a new verification snapshot.
    ///
    /// A changed `src` resets zoom, gesture, scroll, and locate state to
    /// initial values; re-resolution to the same image keeps them.
    pub fn set_verification(
        &mut self,
        verification: &Verification,
        is_valid_src: impl Fn(&str) -> bool,
    ) {
        let resolved = resolve(verification, is_valid_src);
        let src_changed = match (&self.source, &resolved) {
            (Some(old), Some(new)) => old.src != new.src,
            (None, None) => false,
            _ => true,
        };
        self.source = resolved;

        if src_changed {
            log::debug!("proof image changed, resetting viewport state");
            self.controller.reset();
            self.locate.reset();
            self.pan_drag.end();
            self.scroll_left = 0.0;
            self.scroll_top = 0.0;
            self.refit();
        }
    }

    // -------------------------------------------------------------------
    // Resize
    // -------------------------------------------------------------------

    /// Record a resize notification. Bursts coalesce to one pending
    /// recomputation; call [`Self::apply_pending_resize`] once input has
    /// settled.
    pub fn notify_resize(&mut self, metrics: ViewportMetrics) {
        self.pending_resize = Some(metrics);
    }

    /// Apply the latest pending resize, if any. Refits (unless the user
    /// owns the zoom) and re-clamps zoom and scroll.
    pub fn apply_pending_resize(&mut self) {
        let Some(metrics) = self.pending_resize.take() else {
            return;
        };
        self.metrics = Some(metrics);
        self.refit();
    }

    fn refit(&mut self) {
        let (Some(source), Some(metrics)) = (&self.source, self.metrics) else {
            return;
        };
        let Some(natural) = source.natural else {
            return;
        };
        let container = Size::new(metrics.container_width, metrics.container_height);
        if let Some(fit) = compute_initial_zoom(
            natural,
            Some(container),
            metrics.viewport_width,
            &self.fit_params,
        ) {
            self.controller.apply_fit(fit);
        }
        self.clamp_scroll();
    }

    // -------------------------------------------------------------------
    // Zoom gestures
    // -------------------------------------------------------------------

    /// Begin an anchored zoom gesture at a pointer position (container-
    /// relative), snapshotting the current scroll.
    pub fn begin_gesture(&mut self, pointer_x: f32, pointer_y: f32) {
        self.controller
            .begin(pointer_x, pointer_y, self.scroll_left, self.scroll_top);
    }

    /// Feed a wheel tick into the current gesture, starting one at the
    /// pointer if none is active. Returns the visual-only preview.
    pub fn wheel_tick(
        &mut self,
        delta: f32,
        pointer_x: f32,
        pointer_y: f32,
    ) -> Option<PreviewTransform> {
        if !self.controller.is_gesturing() {
            self.begin_gesture(pointer_x, pointer_y);
        }
        let target = self.controller.wheel_target(delta);
        self.controller.update(target)
    }

    /// Feed a pinch-derived raw zoom into the current gesture.
    pub fn pinch_update(&mut self, raw_zoom: f32) -> Option<PreviewTransform> {
        self.controller.update(raw_zoom)
    }

    /// Commit the in-progress gesture at its latest previewed zoom.
    pub fn end_gesture(&mut self) {
        let final_zoom = self.controller.effective_zoom();
        if let Some(correction) = self.controller.commit(final_zoom) {
            self.scroll_left = correction.scroll_left;
            self.scroll_top = correction.scroll_top;
            self.clamp_scroll();
            self.locate.on_scroll(self.scroll_left, self.scroll_top);
        }
    }

    /// Abort the in-progress gesture, clearing the preview and leaving
    /// all committed state untouched.
    pub fn cancel_gesture(&mut self) {
        self.controller.cancel();
    }

    /// Commit a slider/button zoom anchored on the container center.
    pub fn set_zoom(&mut self, zoom: f32) {
        let (width, height) = match self.metrics {
            Some(m) => (m.container_width, m.container_height),
            None => (0.0, 0.0),
        };
        if let Some(correction) =
            self.controller
                .commit_centered(zoom, width, height, self.scroll_left, self.scroll_top)
        {
            self.scroll_left = correction.scroll_left;
            self.scroll_top = correction.scroll_top;
            self.clamp_scroll();
            self.locate.on_scroll(self.scroll_left, self.scroll_top);
        }
    }

    /// Discrete zoom-in (button/keyboard).
    pub fn zoom_in(&mut self) {
        self.set_zoom(self.controller.step_in_target());
    }

    /// Discrete zoom-out (button/keyboard).
    pub fn zoom_out(&mut self) {
        self.set_zoom(self.controller.step_out_target());
    }

    // -------------------------------------------------------------------
    // Pan & scroll
    // -------------------------------------------------------------------

    /// Start a pan drag at a pointer position.
    pub fn start_pan(&mut self, pos: (f32, f32)) {
        self.pan_drag.start(pos);
    }

    /// Update a pan drag; the content follows the pointer.
    pub fn pan_move(&mut self, pos: (f32, f32)) {
        if let Some((dx, dy)) = self.pan_drag.update(pos) {
            self.scroll_left -= dx;
            self.scroll_top -= dy;
            self.clamp_scroll();
            self.locate.on_scroll(self.scroll_left, self.scroll_top);
        }
    }

    /// End a pan drag.
    pub fn end_pan(&mut self) {
        self.pan_drag.end();
    }

    /// Record an externally driven scroll position (native scrollbars,
    /// momentum). Feeds drift detection.
    pub fn set_scroll(&mut self, scroll_left: f32, scroll_top: f32) {
        self.scroll_left = scroll_left;
        self.scroll_top = scroll_top;
        self.clamp_scroll();
        self.locate.on_scroll(self.scroll_left, self.scroll_top);
    }

    fn clamp_scroll(&mut self) {
        let (Some(source), Some(metrics)) = (&self.source, self.metrics) else {
            self.scroll_left = self.scroll_left.max(0.0);
            self.scroll_top = self.scroll_top.max(0.0);
            return;
        };
        let Some(natural) = source.natural else {
            self.scroll_left = self.scroll_left.max(0.0);
            self.scroll_top = self.scroll_top.max(0.0);
            return;
        };
        let zoom = self.controller.zoom();
        let max_left = (natural.width * zoom - metrics.container_width).max(0.0);
        let max_top = (natural.height * zoom - metrics.container_height).max(0.0);
        self.scroll_left = self.scroll_left.clamp(0.0, max_left);
        self.scroll_top = self.scroll_top.clamp(0.0, max_top);
    }

    // -------------------------------------------------------------------
    // Locate
    // -------------------------------------------------------------------

    /// Whether the user has panned away from the located annotation.
    pub fn locate_dirty(&self) -> bool {
        self.locate.dirty
    }

    /// Scroll so the resolved highlight is centered, entering the
    /// settling flow. Returns the target, or `None` when the source has
    /// no locatable highlight.
    pub fn locate_annotation(&mut self) -> Option<ScrollTarget> {
        let source = self.source.as_ref()?;
        let highlight = source.highlight?;
        let natural = source.natural?;
        let metrics = self.metrics?;

        // The resolver already normalized the highlight into pixel space.
        let target = compute_target(
            highlight,
            Some(RenderScale::identity()),
            natural,
            self.controller.zoom(),
            metrics.container_width,
            metrics.container_height,
        )?;

        self.locate.begin(target);
        self.scroll_left = target.scroll_left;
        self.scroll_top = target.scroll_top;
        Some(target)
    }

    // -------------------------------------------------------------------
    // Output
    // -------------------------------------------------------------------

    /// Crop offset for a keyhole strip of the current image at the
    /// current zoom.
    pub fn keyhole_offset(&self) -> Option<f32> {
        let source = self.source.as_ref()?;
        let natural = source.natural?;
        let metrics = self.metrics?;
        let zoom = self.controller.zoom();

        let highlight = source.highlight.map(|region| {
            crate::geometry::Region::new(
                region.x * zoom,
                region.y * zoom,
                region.width * zoom,
                region.height * zoom,
            )
        });
        Some(compute_offset(
            natural.width * zoom,
            metrics.container_width,
            highlight.as_ref(),
        ))
    }

    /// Snapshot everything the presentation layer needs to paint.
    /// `None` while no proof image is resolved (no-evidence state).
    pub fn frame(&self) -> Option<Frame> {
        let source = self.source.as_ref()?;
        let natural = source.natural.unwrap_or_default();
        let zoom = self.controller.zoom();

        let edge_mask = match self.metrics {
            Some(metrics) => {
                let (left, right) = scrollable_edges(
                    self.scroll_left,
                    natural.width * zoom,
                    metrics.container_width,
                );
                build_edge_mask(left, right, EDGE_FADE_WIDTH)
            }
            None => EdgeMask::default(),
        };

        Some(Frame {
            src: source.src.clone(),
            natural_width: natural.width,
            natural_height: natural.height,
            zoom,
            scroll_left: self.scroll_left,
            scroll_top: self.scroll_top,
            edge_mask,
            locate_dirty: self.locate.dirty,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::Region;
    use crate::model::PageRecord;

    const EPSILON: f32 = 1e-3;

    fn accept_all(_src: &str) -> bool {
        true
    }

    fn page_verification() -> Verification {
        Verification {
            pages: vec![PageRecord {
                image_src: "page.png".into(),
                dimensions: Some(Size::new(1700.0, 2200.0)),
                is_match: true,
                highlight: Some(Region::new(400.0, 900.0, 200.0, 100.0)),
                render_scale: Some(RenderScale::identity()),
                ..PageRecord::default()
            }],
            ..Verification::default()
        }
    }

    fn metrics() -> ViewportMetrics {
        ViewportMetrics {
            container_width: 600.0,
            container_height: 400.0,
            viewport_width: 672.0,
        }
    }

    fn sized_viewport() -> EvidenceViewport {
        let mut viewport = EvidenceViewport::with_fit_params(FitParams {
            outer_margin: 32.0,
            shell_padding: 40.0,
            min_readable_zoom: 0.5,
        });
        viewport.notify_resize(metrics());
        viewport.apply_pending_resize();
        viewport.set_verification(&page_verification(), accept_all);
        viewport
    }

    #[test]
    fn test_initial_fit_after_resolution() {
        let viewport = sized_viewport();
        // (672 - 72) / 1700 = 0.3529 lifted to the readable minimum
        assert!((viewport.zoom() - 0.5).abs() < EPSILON);
        assert!(viewport.controller().state().committed_by_system);
    }

    #[test]
    fn test_frame_output_contract() {
        let mut viewport = sized_viewport();
        viewport.set_scroll(30.0, 40.0);

        let frame = viewport.frame().unwrap();
        assert_eq!(frame.src, "page.png");
        assert_eq!(frame.natural_width, 1700.0);
        assert_eq!(frame.natural_height, 2200.0);
        assert!((frame.scroll_left - 30.0).abs() < EPSILON);
        assert!((frame.scroll_top - 40.0).abs() < EPSILON);
        // Scrolled off the left edge, content remains on both sides
        assert!(frame.edge_mask.left > 0.0);
        assert!(frame.edge_mask.right > 0.0);
        assert!(!frame.locate_dirty);
    }

    #[test]
    fn test_no_evidence_state() {
        let mut viewport = EvidenceViewport::new();
        viewport.set_verification(&Verification::default(), accept_all);
        assert!(viewport.frame().is_none());
    }

    #[test]
    fn test_aspect_ratio_preserved_at_every_zoom() {
        let mut viewport = sized_viewport();
        for zoom in [0.4_f32, 0.5, 0.75, 1.0, 1.5, 2.0] {
            viewport.set_zoom(zoom);
            let frame = viewport.frame().unwrap();
            let displayed_ratio =
                (frame.natural_width * frame.zoom) / (frame.natural_height * frame.zoom);
            let natural_ratio = frame.natural_width / frame.natural_height;
            assert!((displayed_ratio - natural_ratio).abs() < EPSILON);
        }
    }

    #[test]
    fn test_resize_bursts_coalesce_to_final_size() {
        let mut viewport = sized_viewport();
        for width in [640.0_f32, 700.0, 820.0, 900.0] {
            viewport.notify_resize(ViewportMetrics {
                container_width: width,
                container_height: 400.0,
                viewport_width: width + 72.0,
            });
        }
        viewport.apply_pending_resize();

        // Only the final size applies: (972 - 72) / 1700 = 0.529
        assert!((viewport.zoom() - 900.0 / 1700.0).abs() < EPSILON);
        // Slot consumed; a second apply is a no-op
        viewport.apply_pending_resize();
        assert!((viewport.zoom() - 900.0 / 1700.0).abs() < EPSILON);
    }

    #[test]
    fn test_resize_does_not_fight_manual_zoom() {
        let mut viewport = sized_viewport();
        viewport.set_zoom(1.4);
        assert!(!viewport.controller().state().committed_by_system);

        viewport.notify_resize(ViewportMetrics {
            container_width: 900.0,
            container_height: 400.0,
            viewport_width: 972.0,
        });
        viewport.apply_pending_resize();
        assert!((viewport.zoom() - 1.4).abs() < EPSILON);
    }

    #[test]
    fn test_new_src_resets_state() {
        let mut viewport = sized_viewport();
        viewport.set_zoom(1.5);
        viewport.set_scroll(300.0, 200.0);
        viewport.locate_annotation();

        let mut other = page_verification();
        other.pages[0].image_src = "other-page.png".into();
        viewport.set_verification(&other, accept_all);

        assert_eq!(viewport.scroll(), (0.0, 0.0));
        assert!(viewport.controller().state().committed_by_system);
        assert!(!viewport.locate_dirty());
        // Fit re-applied for the new image
        assert!((viewport.zoom() - 0.5).abs() < EPSILON);
    }

    #[test]
    fn test_same_src_preserves_state() {
        let mut viewport = sized_viewport();
        viewport.set_zoom(1.5);
        viewport.set_scroll(300.0, 200.0);

        viewport.set_verification(&page_verification(), accept_all);
        assert!((viewport.zoom() - 1.5).abs() < EPSILON);
        assert_eq!(viewport.scroll(), (300.0, 200.0));
    }

    #[test]
    fn test_wheel_gesture_preview_then_commit() {
        let mut viewport = sized_viewport();
        let preview = viewport.wheel_tick(1.0, 200.0, 150.0).unwrap();
        assert!((preview.scale - 1.1).abs() < EPSILON);
        assert!(viewport.controller().is_gesturing());
        // Committed zoom untouched during the gesture
        assert!((viewport.zoom() - 0.5).abs() < EPSILON);

        viewport.wheel_tick(1.0, 200.0, 150.0);
        viewport.end_gesture();
        assert!((viewport.zoom() - 0.61).abs() < EPSILON);
    }

    #[test]
    fn test_cancelled_gesture_leaves_no_trace() {
        let mut viewport = sized_viewport();
        let before = viewport.frame().unwrap();

        viewport.wheel_tick(1.0, 200.0, 150.0);
        viewport.cancel_gesture();

        assert_eq!(viewport.frame().unwrap(), before);
    }

    #[test]
    fn test_locate_then_drift_then_relocate() {
        let mut viewport = sized_viewport();
        viewport.set_zoom(1.0);

        let target = viewport.locate_annotation().unwrap();
        // Highlight center (500, 950) at zoom 1: 500-300=200, 950-200=750
        assert!((target.scroll_left - 200.0).abs() < EPSILON);
        assert!((target.scroll_top - 750.0).abs() < EPSILON);

        // Settle on target, then drift past the threshold on one axis
        viewport.set_scroll(target.scroll_left, target.scroll_top);
        assert!(!viewport.locate_dirty());
        viewport.set_scroll(target.scroll_left + 20.0, target.scroll_top);
        assert!(viewport.locate_dirty());

        // Relocating clears the dirty bit and re-enters settling
        viewport.locate_annotation().unwrap();
        assert!(!viewport.locate_dirty());
        viewport.set_scroll(target.scroll_left - 4.0, target.scroll_top);
        assert!(!viewport.locate_dirty());
    }

    #[test]
    fn test_pan_moves_content_and_clamps() {
        let mut viewport = sized_viewport();
        viewport.set_zoom(1.0);

        // Centered zoom 0.5 -> 1.0 left the scroll at (300, 200)
        assert_eq!(viewport.scroll(), (300.0, 200.0));

        viewport.start_pan((300.0, 300.0));
        viewport.pan_move((250.0, 280.0));
        let (left, top) = viewport.scroll();
        assert!((left - 350.0).abs() < EPSILON);
        assert!((top - 220.0).abs() < EPSILON);

        // Panning far past the origin clamps at zero
        viewport.pan_move((5000.0, 5000.0));
        assert_eq!(viewport.scroll(), (0.0, 0.0));
        viewport.end_pan();
    }

    #[test]
    fn test_scroll_never_negative_without_natural_dims() {
        // Proof-URL tier carries no dimensions
        let verification = Verification {
            proof_url: Some("https://cdn.example/proof.png".into()),
            ..Verification::default()
        };
        let mut viewport = EvidenceViewport::new();
        viewport.notify_resize(metrics());
        viewport.apply_pending_resize();
        viewport.set_verification(&verification, accept_all);

        viewport.set_scroll(-50.0, -10.0);
        assert_eq!(viewport.scroll(), (0.0, 0.0));

        viewport.start_pan((0.0, 0.0));
        viewport.pan_move((500.0, 500.0));
        assert_eq!(viewport.scroll(), (0.0, 0.0));
    }

    #[test]
    fn test_keyhole_offset_centers_highlight() {
        let mut viewport = sized_viewport();
        viewport.set_zoom(1.0);
        // Highlight center 500, container 600: raw -... 500 - 300 = 200
        let offset = viewport.keyhole_offset().unwrap();
        assert!((offset - 200.0).abs() < EPSILON);
    }
}
