//! scrollreel plays a pre-rendered image sequence in step with page scrolling.
//!
//! The crate is headless. A host (browser shell, native window, test harness) forwards its
//! events and provides a drawing surface; scrollreel decides which frame to show and how to
//! crop it so it covers the surface.
//!
//! # Pipeline overview
//!
//! 1. **Load**: [`FrameStore::build`] issues one background load per `frame_NNNN.webp` resource.
//! 2. **Map**: [`map_scroll_to_frame`] turns a scroll position into a 1-based [`FrameIndex`].
//! 3. **Fit**: [`fit_cover`] computes the source crop that fills the surface around an [`Anchor`].
//! 4. **Draw**: [`RenderDriver`] coalesces scroll draws per display refresh, redraws
//!    synchronously on resize, and skips frames that are not loaded yet.
//!
//! [`VisibilityFader`] runs alongside and flags page sections as visible once they scroll into
//! view.
//!
//! - **No unsafe**: `unsafe` is forbidden in this crate.
//! - **Premultiplied RGBA8** end-to-end: decoded frames and surface readbacks are premultiplied.
#![forbid(unsafe_code)]

mod assets;
mod config;
mod fade;
mod fit;
mod foundation;
mod reel;
mod render;
mod scroll;

pub use assets::decode::{PreparedImage, decode_image};
pub use assets::frames::{Frame, FrameNaming, FrameState, FrameStats, FrameStore, LoadOptions};
pub use assets::source::{DirSource, FrameSource, MemorySource, normalize_rel_path};
pub use config::{DEFAULT_FRAME_COUNT, LOAD_THREADS_ENV, ReelConfig, SurfaceConfig};
pub use fade::visibility::{DEFAULT_THRESHOLD, FadeOptions, VisibilityChange, VisibilityFader};
pub use fit::cover::{FitRequest, FitResult, fit_cover, fit_cover_viewport};
pub use foundation::core::{
    Affine, Anchor, FrameIndex, Point, Rect, ScrollMetrics, Size, Vec2, Viewport,
};
pub use foundation::error::{ReelError, ReelResult};
pub use reel::{ScrollReel, Still, render_still};
pub use render::cpu::{CpuSurface, CpuSurfaceOpts};
pub use render::driver::{DrawOutcome, DriverStats, RenderDriver};
pub use render::scheduler::RefreshSlot;
pub use render::surface::{DrawSurface, FrameRGBA};
pub use scroll::mapper::{frame_for_scroll, map_scroll_to_frame};
