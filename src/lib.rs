//! evidence-viewport - the evidence viewport engine for citation verification
//!
//! Resolves which proof image backs a citation, maps annotation
//! coordinates between a source document's coordinate space and the
//! rendered image's pixel space, and drives pan/zoom interaction with
//! anchor preservation, fit-to-viewport sizing, keyhole cropping, and
//! locate-drift tracking.
//!
//! Rendering is an external collaborator: the engine only computes what
//! to show and where. Each [`EvidenceViewport`] instance owns its own
//! mutable state; nothing is shared across viewports.

pub mod constants;
pub mod engine;
pub mod error;
pub mod fit;
pub mod geometry;
pub mod keyhole;
pub mod locate;
pub mod mapper;
pub mod model;
pub mod source;
pub mod viewport;

pub use engine::{EvidenceViewport, Frame, ViewportMetrics};
pub use error::EvidenceError;
pub use fit::{compute_initial_zoom, FitParams, FitZoom};
pub use geometry::{Region, RenderScale, Size};
pub use keyhole::{build_edge_mask, compute_offset, scrollable_edges, EdgeMask};
pub use locate::{compute_target, LocateState, ScrollTarget};
pub use mapper::scale_region;
pub use model::{CitationKind, DocumentImage, PageRecord, TextItem, Verification};
pub use source::{normalize_screenshot, resolve, ImageSource};
pub use viewport::{
    pinch_geometry, GestureAnchor, GesturePhase, PanDragState, PinchGeometry, PreviewTransform,
    ScrollCorrection, ZoomPanController, ZoomState,
};
