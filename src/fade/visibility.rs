use crate::foundation::error::{ReelError, ReelResult};

/// Visible fraction at which a section is marked visible.
pub const DEFAULT_THRESHOLD: f64 = 0.1;

/// What an [`VisibilityFader::update`] did to a section's visible flag.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum VisibilityChange {
    Shown,
    Hidden,
    Unchanged,
}

/// Fader controls.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct FadeOptions {
    /// Visible fraction in `[0, 1]` that counts as "in view".
    pub threshold: f64,
    /// Clear the visible flag again when a section drops below the threshold.
    pub fade_out: bool,
}

impl Default for FadeOptions {
    fn default() -> Self {
        Self {
            threshold: DEFAULT_THRESHOLD,
            fade_out: false,
        }
    }
}

impl FadeOptions {
    pub fn validate(&self) -> ReelResult<()> {
        if !self.threshold.is_finite() || !(0.0..=1.0).contains(&self.threshold) {
            return Err(ReelError::validation(format!(
                "fade threshold must be within [0, 1], got {}",
                self.threshold
            )));
        }
        Ok(())
    }
}

#[derive(Debug)]
struct Section {
    id: String,
    visible: bool,
    above: bool,
}

/// Tracks a fixed set of page sections and their one-way "visible" flag.
///
/// A section becomes visible when its visible fraction crosses the threshold from below.
/// Repeated reports above the threshold change nothing. Unless `fade_out` is set, dropping
/// back below the threshold also changes nothing.
#[derive(Debug)]
pub struct VisibilityFader {
    opts: FadeOptions,
    sections: Vec<Section>,
}

impl VisibilityFader {
    pub fn new<I, S>(ids: I, opts: FadeOptions) -> ReelResult<Self>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        opts.validate()?;
        let mut sections: Vec<Section> = Vec::new();
        for id in ids {
            let id = id.into();
            if sections.iter().any(|s| s.id == id) {
                return Err(ReelError::validation(format!("duplicate section id '{id}'")));
            }
            sections.push(Section {
                id,
                visible: false,
                above: false,
            });
        }
        Ok(Self { opts, sections })
    }

    pub fn options(&self) -> FadeOptions {
        self.opts
    }

    /// Report the current visible fraction of section `id`.
    pub fn update(&mut self, id: &str, visible_fraction: f64) -> ReelResult<VisibilityChange> {
        let threshold = self.opts.threshold;
        let fade_out = self.opts.fade_out;
        let section = self
            .sections
            .iter_mut()
            .find(|s| s.id == id)
            .ok_or_else(|| ReelError::validation(format!("unknown section id '{id}'")))?;

        let fraction = if visible_fraction.is_nan() {
            0.0
        } else {
            visible_fraction.clamp(0.0, 1.0)
        };
        let above = fraction >= threshold;
        let crossed_up = above && !section.above;
        section.above = above;

        if crossed_up && !section.visible {
            section.visible = true;
            tracing::debug!(section = id, fraction, "section shown");
            return Ok(VisibilityChange::Shown);
        }
        if !above && fade_out && section.visible {
            section.visible = false;
            tracing::debug!(section = id, fraction, "section hidden");
            return Ok(VisibilityChange::Hidden);
        }
        Ok(VisibilityChange::Unchanged)
    }

    pub fn is_visible(&self, id: &str) -> Option<bool> {
        self.sections.iter().find(|s| s.id == id).map(|s| s.visible)
    }

    pub fn visible_count(&self) -> usize {
        self.sections.iter().filter(|s| s.visible).count()
    }

    pub fn len(&self) -> usize {
        self.sections.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sections.is_empty()
    }

    /// Section ids in registration order, paired with their visible flag.
    pub fn iter(&self) -> impl Iterator<Item = (&str, bool)> {
        self.sections.iter().map(|s| (s.id.as_str(), s.visible))
    }
}

#[cfg(test)]
#[path = "../../tests/unit/fade/visibility.rs"]
mod tests;
