use std::sync::Arc;

use crate::{
    assets::frames::{FrameState, FrameStore},
    assets::source::FrameSource,
    config::ReelConfig,
    fade::visibility::{VisibilityChange, VisibilityFader},
    foundation::core::{FrameIndex, ScrollMetrics, Viewport},
    foundation::error::{ReelError, ReelResult},
    render::cpu::CpuSurface,
    render::driver::{DrawOutcome, RenderDriver},
    render::surface::{DrawSurface, FrameRGBA},
};

/// A running scroll reel: the render driver plus the section fader, fed by host events.
#[derive(Debug)]
pub struct ScrollReel<S: DrawSurface> {
    driver: RenderDriver<S>,
    fader: VisibilityFader,
}

impl<S: DrawSurface> ScrollReel<S> {
    /// Validate `config`, issue every frame load and register `sections` with the fader.
    ///
    /// Returns immediately; call [`ScrollReel::wait_until_ready`] (or feed
    /// [`ScrollReel::on_first_frame_ready`] from the host) once the first frame is in.
    pub fn start<I, T>(
        config: &ReelConfig,
        source: Arc<dyn FrameSource>,
        surface: S,
        window: Viewport,
        sections: I,
    ) -> ReelResult<Self>
    where
        I: IntoIterator<Item = T>,
        T: Into<String>,
    {
        config.validate()?;
        let frames = FrameStore::build(
            config.frame_count,
            config.naming.clone(),
            source,
            config.load,
        )?;
        let fader = VisibilityFader::new(sections, config.fade)?;
        Ok(Self {
            driver: RenderDriver::new(frames, surface, window, config.anchor),
            fader,
        })
    }

    /// Block until frame 1 has loaded, then initialize the surface and draw it.
    ///
    /// A first frame that failed to load is reported as a load error; the reel stays usable
    /// and later frames still draw once a resize initializes the surface.
    pub fn wait_until_ready(&mut self) -> ReelResult<DrawOutcome> {
        if let FrameState::Failed(reason) = self.driver.frames().wait_first() {
            return Err(ReelError::load(format!("first frame failed to load: {reason}")));
        }
        self.driver.on_first_frame_ready()
    }

    pub fn on_first_frame_ready(&mut self) -> ReelResult<DrawOutcome> {
        self.driver.on_first_frame_ready()
    }

    pub fn on_scroll(&mut self, scroll: ScrollMetrics) -> FrameIndex {
        self.driver.on_scroll(scroll)
    }

    pub fn on_refresh(&mut self) -> ReelResult<DrawOutcome> {
        self.driver.on_refresh()
    }

    pub fn on_resize(&mut self, window: Viewport, scroll: ScrollMetrics) -> ReelResult<DrawOutcome> {
        self.driver.on_resize(window, scroll)
    }

    pub fn on_section_visibility(
        &mut self,
        id: &str,
        visible_fraction: f64,
    ) -> ReelResult<VisibilityChange> {
        self.fader.update(id, visible_fraction)
    }

    pub fn driver(&self) -> &RenderDriver<S> {
        &self.driver
    }

    pub fn driver_mut(&mut self) -> &mut RenderDriver<S> {
        &mut self.driver
    }

    pub fn fader(&self) -> &VisibilityFader {
        &self.fader
    }

    pub fn into_parts(self) -> (RenderDriver<S>, VisibilityFader) {
        (self.driver, self.fader)
    }
}

/// A single rendered still.
#[derive(Clone, Debug)]
pub struct Still {
    pub frame: FrameIndex,
    pub outcome: DrawOutcome,
    pub image: FrameRGBA,
}

/// Load the whole sequence, then render the frame shown at `scroll` in a `window`-sized CPU
/// surface.
#[tracing::instrument(skip(config, source))]
pub fn render_still(
    config: &ReelConfig,
    source: Arc<dyn FrameSource>,
    window: Viewport,
    scroll: ScrollMetrics,
) -> ReelResult<Still> {
    if window.is_empty() {
        return Err(ReelError::validation("window must be non-empty"));
    }
    let surface = CpuSurface::new(config.surface_opts());
    let mut reel = ScrollReel::start(config, source, surface, window, std::iter::empty::<String>())?;
    let stats = reel.driver().frames().wait_all();
    tracing::debug!(?stats, "sequence loaded");

    reel.on_first_frame_ready()?;
    let frame = reel.on_scroll(scroll);
    let outcome = reel.on_refresh()?;
    let image = reel.driver().surface().readback();
    Ok(Still {
        frame,
        outcome,
        image,
    })
}

#[cfg(test)]
#[path = "../tests/unit/reel.rs"]
mod tests;
