use crate::foundation::core::{Affine, Anchor, Rect, Size, Vec2, Viewport};

/// Tolerance used when deciding whether the first gap correction already applied.
const GAP_EPSILON: f64 = 1e-14;

/// One draw's worth of fitting input: where to draw and which part of the source to keep.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct FitRequest {
    /// Destination rectangle on the drawing surface.
    pub dest: Rect,
    /// Anchor kept in view when the source overflows the destination.
    #[serde(default)]
    pub anchor: Anchor,
}

impl FitRequest {
    pub fn new(dest: Rect, anchor: Anchor) -> Self {
        Self { dest, anchor }
    }

    /// Whole surface, centered anchor.
    pub fn full(viewport: Viewport) -> Self {
        Self::new(viewport.rect(), Anchor::CENTER)
    }
}

/// Crop-and-place result of a cover fit.
///
/// Drawing `src` (in source pixel space) scaled into `dst` (in surface space) fills `dst`
/// completely with the source's aspect ratio preserved.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct FitResult {
    pub src: Rect,
    pub dst: Rect,
}

impl FitResult {
    /// Per-axis scale from source pixels to surface pixels.
    pub fn scale(&self) -> Vec2 {
        let sw = self.src.width();
        let sh = self.src.height();
        Vec2::new(
            if sw > 0.0 { self.dst.width() / sw } else { 0.0 },
            if sh > 0.0 { self.dst.height() / sh } else { 0.0 },
        )
    }

    /// Transform mapping source pixel space onto the surface so that `src` lands on `dst`.
    pub fn to_affine(&self) -> Affine {
        let s = self.scale();
        Affine::translate(self.dst.origin().to_vec2())
            * Affine::scale_non_uniform(s.x, s.y)
            * Affine::translate(-self.src.origin().to_vec2())
    }

    /// `true` when nothing would be drawn.
    pub fn is_empty(&self) -> bool {
        self.dst.width() <= 0.0 || self.dst.height() <= 0.0
    }
}

/// Cover-fit a `source` image into `req.dest`.
///
/// The source is scaled uniformly until it covers the destination on both axes; the overflow
/// is cropped away, positioned by `req.anchor`. The returned crop rectangle always lies inside
/// `[0, source.width] x [0, source.height]`.
///
/// `source` must have positive width and height. A destination with no area returns the full
/// source mapped onto that empty destination.
pub fn fit_cover(source: Size, req: FitRequest) -> FitResult {
    let iw = source.width;
    let ih = source.height;
    debug_assert!(
        iw > 0.0 && ih > 0.0,
        "fit_cover requires a non-empty source, got {iw}x{ih}"
    );

    let dest = req.dest.abs();
    let w = dest.width();
    let h = dest.height();
    if !(w > 0.0 && h > 0.0) {
        return FitResult {
            src: Rect::new(0.0, 0.0, iw, ih),
            dst: dest,
        };
    }

    // Contain ratio: the whole source fits inside the destination.
    let r = (w / iw).min(h / ih);
    let mut nw = iw * r;
    let mut nh = ih * r;

    // Grow along whichever axis still leaves a gap.
    let mut ar = 1.0;
    if nw < w {
        ar = w / nw;
    }
    if (ar - 1.0).abs() < GAP_EPSILON && nh < h {
        ar = h / nh;
    }
    nw *= ar;
    nh *= ar;

    let mut cw = iw / (nw / w);
    let mut ch = ih / (nh / h);
    let mut cx = (iw - cw) * req.anchor.x();
    let mut cy = (ih - ch) * req.anchor.y();

    if cx < 0.0 {
        cx = 0.0;
    }
    if cy < 0.0 {
        cy = 0.0;
    }
    if cw > iw {
        cw = iw;
    }
    if ch > ih {
        ch = ih;
    }

    FitResult {
        src: Rect::new(cx, cy, (cx + cw).min(iw), (cy + ch).min(ih)),
        dst: dest,
    }
}

/// Cover-fit onto the whole surface with the given anchor.
pub fn fit_cover_viewport(source: Size, viewport: Viewport, anchor: Anchor) -> FitResult {
    fit_cover(source, FitRequest::new(viewport.rect(), anchor))
}

#[cfg(test)]
#[path = "../../tests/unit/fit/cover.rs"]
mod tests;
