use std::sync::{Arc, OnceLock};

use crate::{
    assets::decode::{PreparedImage, decode_image},
    assets::source::FrameSource,
    foundation::core::FrameIndex,
    foundation::error::{ReelError, ReelResult},
};

/// How frame resources are named: `{prefix}{index:0digits}.{extension}`.
#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct FrameNaming {
    pub prefix: String,
    pub digits: u8,
    pub extension: String,
}

impl Default for FrameNaming {
    fn default() -> Self {
        Self {
            prefix: "frame_".to_string(),
            digits: 4,
            extension: "webp".to_string(),
        }
    }
}

impl FrameNaming {
    /// Resource name for a 1-based frame index, e.g. `frame_0001.webp`.
    pub fn name_for(&self, index: FrameIndex) -> String {
        format!(
            "{}{:0width$}.{}",
            self.prefix,
            index.0,
            self.extension,
            width = usize::from(self.digits)
        )
    }

    /// Reject naming schemes that cannot name `count` frames unambiguously.
    pub fn validate(&self, count: u32) -> ReelResult<()> {
        if self.digits == 0 {
            return Err(ReelError::validation("frame naming digits must be >= 1"));
        }
        if self.extension.is_empty() || self.extension.contains(['/', '\\', '.']) {
            return Err(ReelError::validation(
                "frame naming extension must be a bare, non-empty extension",
            ));
        }
        let needed = count.max(1).to_string().len();
        if needed > usize::from(self.digits) {
            return Err(ReelError::validation(format!(
                "{count} frames need {needed} digits, naming allows {}",
                self.digits
            )));
        }
        Ok(())
    }
}

type LoadSlot = OnceLock<Result<Arc<PreparedImage>, String>>;

/// Observable load state of one frame.
#[derive(Clone, Copy, Debug)]
pub enum FrameState<'a> {
    /// The load has been issued and has not completed.
    Loading,
    /// Decoded and ready to draw.
    Ready(&'a PreparedImage),
    /// Fetch or decode failed. Drawn like `Loading`: skipped.
    Failed(&'a str),
}

/// One element of the sequence. Immutable apart from its write-once load slot.
#[derive(Debug)]
pub struct Frame {
    index: FrameIndex,
    name: String,
    slot: Arc<LoadSlot>,
}

impl Frame {
    pub fn index(&self) -> FrameIndex {
        self.index
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn state(&self) -> FrameState<'_> {
        match self.slot.get() {
            None => FrameState::Loading,
            Some(Ok(img)) => FrameState::Ready(img),
            Some(Err(e)) => FrameState::Failed(e),
        }
    }

    /// The decoded image, if the load already succeeded.
    pub fn image(&self) -> Option<&PreparedImage> {
        match self.slot.get() {
            Some(Ok(img)) => Some(img),
            _ => None,
        }
    }

    pub fn is_ready(&self) -> bool {
        self.image().is_some()
    }

    /// Block until the load completes either way.
    pub fn wait(&self) -> FrameState<'_> {
        self.slot.wait();
        self.state()
    }
}

/// Loader pool controls.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct LoadOptions {
    /// Worker thread count; `None` lets rayon pick one per core.
    pub threads: Option<usize>,
}

/// Counts of frames per load state.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize)]
pub struct FrameStats {
    pub total: usize,
    pub loading: usize,
    pub ready: usize,
    pub failed: usize,
}

/// Fixed, ordered sequence of frames `1..=count`, all loading in the background.
pub struct FrameStore {
    frames: Vec<Frame>,
    naming: FrameNaming,
    _pool: Arc<rayon::ThreadPool>,
}

impl std::fmt::Debug for FrameStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FrameStore")
            .field("naming", &self.naming)
            .field("stats", &self.stats())
            .finish()
    }
}

impl FrameStore {
    /// Create `count` frames and immediately issue one load per frame.
    ///
    /// Loads are fire-and-forget: nothing throttles them beyond the worker pool, and none are
    /// cancelled. Only the first frame's completion is meant to be awaited
    /// ([`FrameStore::wait_first`]); the draw path polls the rest.
    #[tracing::instrument(skip(naming, source, opts))]
    pub fn build(
        count: u32,
        naming: FrameNaming,
        source: Arc<dyn FrameSource>,
        opts: LoadOptions,
    ) -> ReelResult<Self> {
        if count == 0 {
            return Err(ReelError::validation("frame count must be >= 1"));
        }
        naming.validate(count)?;

        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(opts.threads.unwrap_or(0))
            .thread_name(|i| format!("scrollreel-load-{i}"))
            .build()
            .map_err(|e| ReelError::Other(anyhow::anyhow!("build loader pool: {e}")))?;

        let mut frames = Vec::with_capacity(count as usize);
        for i in 1..=count {
            let index = FrameIndex(i);
            let name = naming.name_for(index);
            let slot = Arc::new(LoadSlot::new());

            let job_slot = Arc::clone(&slot);
            let job_source = Arc::clone(&source);
            let job_name = name.clone();
            pool.spawn(move || load_into(index, &job_name, job_source.as_ref(), &job_slot));

            frames.push(Frame { index, name, slot });
        }
        tracing::debug!(count, "issued frame loads");

        Ok(Self {
            frames,
            naming,
            _pool: Arc::new(pool),
        })
    }

    pub fn len(&self) -> usize {
        self.frames.len()
    }

    pub fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }

    /// Number of frames as a 1-based upper bound.
    pub fn count(&self) -> u32 {
        self.frames.len() as u32
    }

    pub fn naming(&self) -> &FrameNaming {
        &self.naming
    }

    pub fn get(&self, index: FrameIndex) -> Option<&Frame> {
        if index.0 == 0 {
            return None;
        }
        self.frames.get(index.to_zero_based())
    }

    /// Ready image for `index`, or `None` while loading, after a failure, or out of range.
    pub fn ready(&self, index: FrameIndex) -> Option<&PreparedImage> {
        self.get(index).and_then(Frame::image)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Frame> {
        self.frames.iter()
    }

    /// Block until the first frame finished loading.
    pub fn wait_first(&self) -> FrameState<'_> {
        self.frames[0].wait()
    }

    /// Block until every frame finished loading.
    pub fn wait_all(&self) -> FrameStats {
        for f in &self.frames {
            f.wait();
        }
        self.stats()
    }

    pub fn stats(&self) -> FrameStats {
        let mut st = FrameStats {
            total: self.frames.len(),
            ..FrameStats::default()
        };
        for f in &self.frames {
            match f.state() {
                FrameState::Loading => st.loading += 1,
                FrameState::Ready(_) => st.ready += 1,
                FrameState::Failed(_) => st.failed += 1,
            }
        }
        st
    }
}

fn load_into(index: FrameIndex, name: &str, source: &dyn FrameSource, slot: &LoadSlot) {
    let outcome = source
        .fetch(name)
        .and_then(|bytes| decode_image(&bytes))
        .map(Arc::new)
        .map_err(|e| format!("{e:#}"));

    match &outcome {
        Ok(img) => tracing::trace!(frame = %index, name, w = img.width, h = img.height, "frame ready"),
        Err(e) => tracing::warn!(frame = %index, name, error = %e, "frame failed to load"),
    }
    let _ = slot.set(outcome);
}

#[cfg(test)]
#[path = "../../tests/unit/assets/frames.rs"]
mod tests;
