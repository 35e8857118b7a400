use crate::foundation::error::{ReelError, ReelResult};

pub use kurbo::{Affine, Point, Rect, Size, Vec2};

/// 1-based position in a frame sequence.
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, serde::Serialize, serde::Deserialize,
)]
pub struct FrameIndex(pub u32);

impl FrameIndex {
    /// The first frame of every sequence.
    pub const FIRST: FrameIndex = FrameIndex(1);

    /// Build a 1-based index, rejecting `0`.
    pub fn new(one_based: u32) -> ReelResult<Self> {
        if one_based == 0 {
            return Err(ReelError::validation("FrameIndex is 1-based and must be >= 1"));
        }
        Ok(Self(one_based))
    }

    /// Build from a 0-based slot position.
    pub fn from_zero_based(slot: usize) -> Self {
        Self(u32::try_from(slot).unwrap_or(u32::MAX - 1).saturating_add(1))
    }

    /// 0-based slot position, for indexing into storage.
    pub fn to_zero_based(self) -> usize {
        self.0.saturating_sub(1) as usize
    }

    /// Clamp into `[1, count]`. A zero count clamps to the first frame.
    pub fn clamp_to(self, count: u32) -> Self {
        Self(self.0.clamp(1, count.max(1)))
    }
}

impl std::fmt::Display for FrameIndex {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Size of the drawing surface in whole pixels.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct Viewport {
    pub width: u32,
    pub height: u32,
}

impl Viewport {
    pub fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    pub fn is_empty(self) -> bool {
        self.width == 0 || self.height == 0
    }

    /// Full-surface rectangle at the origin.
    pub fn rect(self) -> Rect {
        Rect::new(0.0, 0.0, f64::from(self.width), f64::from(self.height))
    }
}

/// Normalized point in the source image kept in view when cropping.
///
/// `(0, 0)` keeps the top-left corner, `(1, 1)` the bottom-right. Components are always in
/// `[0, 1]`: out-of-range inputs are clamped, non-finite inputs fall back to the center.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(from = "AnchorRepr", into = "AnchorRepr")]
pub struct Anchor {
    x: f64,
    y: f64,
}

impl Anchor {
    pub const CENTER: Anchor = Anchor { x: 0.5, y: 0.5 };

    pub fn new(x: f64, y: f64) -> Self {
        Self {
            x: clamp_unit(x),
            y: clamp_unit(y),
        }
    }

    pub fn x(self) -> f64 {
        self.x
    }

    pub fn y(self) -> f64 {
        self.y
    }
}

impl Default for Anchor {
    fn default() -> Self {
        Self::CENTER
    }
}

#[derive(serde::Serialize, serde::Deserialize)]
struct AnchorRepr {
    x: f64,
    y: f64,
}

impl From<AnchorRepr> for Anchor {
    fn from(r: AnchorRepr) -> Self {
        Anchor::new(r.x, r.y)
    }
}

impl From<Anchor> for AnchorRepr {
    fn from(a: Anchor) -> Self {
        AnchorRepr { x: a.x, y: a.y }
    }
}

fn clamp_unit(v: f64) -> f64 {
    if v.is_nan() {
        return 0.5;
    }
    v.clamp(0.0, 1.0)
}

/// Document scroll state as reported by the host on each event.
#[derive(Clone, Copy, Debug, Default, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct ScrollMetrics {
    /// Distance scrolled from the top of the document, in CSS pixels.
    pub scroll_top: f64,
    /// Full scrollable height of the document.
    pub scroll_height: f64,
}

impl ScrollMetrics {
    pub fn new(scroll_top: f64, scroll_height: f64) -> Self {
        Self {
            scroll_top,
            scroll_height,
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/core.rs"]
mod tests;
