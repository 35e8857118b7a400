use crate::{
    assets::frames::{FrameState, FrameStore},
    fit::cover::fit_cover_viewport,
    foundation::core::{Anchor, FrameIndex, ScrollMetrics, Viewport},
    foundation::error::ReelResult,
    render::scheduler::RefreshSlot,
    render::surface::DrawSurface,
    scroll::mapper::frame_for_scroll,
};

/// What a draw attempt did.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DrawOutcome {
    /// The frame was blitted onto the surface.
    Drawn(FrameIndex),
    /// The frame is still loading; nothing was drawn.
    NotReady(FrameIndex),
    /// The frame failed to load; nothing was drawn.
    Failed(FrameIndex),
    /// The surface has not been sized yet; nothing was drawn.
    Uninitialized,
    /// A refresh tick with no pending draw.
    Idle,
}

impl DrawOutcome {
    pub fn is_drawn(self) -> bool {
        matches!(self, DrawOutcome::Drawn(_))
    }
}

/// Counters over the driver's lifetime.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize)]
pub struct DriverStats {
    pub drawn: u64,
    pub not_ready: u64,
    pub failed: u64,
}

/// Owns the frame sequence and the drawing surface and turns host events into draws.
///
/// Scroll events only compute a frame and park it in a [`RefreshSlot`]; the draw happens on the
/// next [`RenderDriver::on_refresh`]. Resize events resize and redraw synchronously.
#[derive(Debug)]
pub struct RenderDriver<S: DrawSurface> {
    frames: FrameStore,
    surface: S,
    anchor: Anchor,
    viewport: Viewport,
    current: FrameIndex,
    slot: RefreshSlot,
    initialized: bool,
    stats: DriverStats,
}

impl<S: DrawSurface> RenderDriver<S> {
    /// `window` is the host window size at startup. The surface stays unsized until the first
    /// frame is ready or the window is resized.
    pub fn new(frames: FrameStore, surface: S, window: Viewport, anchor: Anchor) -> Self {
        Self {
            frames,
            surface,
            anchor,
            viewport: window,
            current: FrameIndex::FIRST,
            slot: RefreshSlot::new(),
            initialized: false,
            stats: DriverStats::default(),
        }
    }

    /// First-frame completion: size the surface to the window and draw frame 1.
    #[tracing::instrument(level = "debug", skip(self))]
    pub fn on_first_frame_ready(&mut self) -> ReelResult<DrawOutcome> {
        self.surface.resize(self.viewport)?;
        self.initialized = true;
        self.draw(FrameIndex::FIRST)
    }

    /// Scroll event: map to a frame and defer the draw to the next refresh.
    pub fn on_scroll(&mut self, scroll: ScrollMetrics) -> FrameIndex {
        let index = self.frame_for(scroll);
        self.current = index;
        if self.slot.request(index) {
            tracing::trace!(frame = %index, "coalesced scroll draw");
        }
        index
    }

    /// Display-refresh tick: perform the pending scroll draw, if any.
    pub fn on_refresh(&mut self) -> ReelResult<DrawOutcome> {
        match self.slot.take() {
            None => Ok(DrawOutcome::Idle),
            Some(index) => self.draw(index),
        }
    }

    /// Resize event: adopt the new window size and redraw the current scroll frame now.
    #[tracing::instrument(level = "debug", skip(self, scroll))]
    pub fn on_resize(&mut self, window: Viewport, scroll: ScrollMetrics) -> ReelResult<DrawOutcome> {
        self.viewport = window;
        self.surface.resize(window)?;
        self.initialized = true;

        let index = self.frame_for(scroll);
        self.current = index;
        if self.slot.peek() == Some(index) {
            self.slot.take();
        }
        self.draw(index)
    }

    /// Draw `index` (clamped into the sequence) if its image is ready; skip silently otherwise.
    pub fn draw(&mut self, index: FrameIndex) -> ReelResult<DrawOutcome> {
        if !self.initialized {
            return Ok(DrawOutcome::Uninitialized);
        }
        let index = index.clamp_to(self.frames.count());
        let Some(frame) = self.frames.get(index) else {
            self.stats.not_ready += 1;
            return Ok(DrawOutcome::NotReady(index));
        };

        match frame.state() {
            FrameState::Loading => {
                tracing::trace!(frame = %index, "frame not loaded yet, skipping draw");
                self.stats.not_ready += 1;
                Ok(DrawOutcome::NotReady(index))
            }
            FrameState::Failed(_) => {
                self.stats.failed += 1;
                Ok(DrawOutcome::Failed(index))
            }
            FrameState::Ready(image) => {
                let fit = fit_cover_viewport(image.size(), self.surface.size(), self.anchor);
                self.surface.draw_image(image, &fit)?;
                self.stats.drawn += 1;
                Ok(DrawOutcome::Drawn(index))
            }
        }
    }

    fn frame_for(&self, scroll: ScrollMetrics) -> FrameIndex {
        frame_for_scroll(scroll, f64::from(self.viewport.height), self.frames.count())
    }

    /// Frame selected by the most recent scroll or resize.
    pub fn current_frame(&self) -> FrameIndex {
        self.current
    }

    pub fn viewport(&self) -> Viewport {
        self.viewport
    }

    pub fn anchor(&self) -> Anchor {
        self.anchor
    }

    pub fn set_anchor(&mut self, anchor: Anchor) {
        self.anchor = anchor;
    }

    pub fn is_initialized(&self) -> bool {
        self.initialized
    }

    pub fn has_pending_draw(&self) -> bool {
        self.slot.is_pending()
    }

    pub fn stats(&self) -> DriverStats {
        self.stats
    }

    pub fn frames(&self) -> &FrameStore {
        &self.frames
    }

    pub fn surface(&self) -> &S {
        &self.surface
    }

    pub fn surface_mut(&mut self) -> &mut S {
        &mut self.surface
    }

    pub fn into_parts(self) -> (FrameStore, S) {
        (self.frames, self.surface)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/render/driver.rs"]
mod tests;
