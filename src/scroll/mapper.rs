use crate::foundation::core::{FrameIndex, ScrollMetrics};

/// Map a scroll position onto a 1-based frame index in `[1, frame_count]`.
///
/// The scroll fraction is `scroll_top / (scroll_height - viewport_height)`. Selection rounds up
/// (`ceil(fraction * frame_count)`, capped at the last frame), so only the very top of the page
/// shows the first frame and every later position is biased toward the next frame.
///
/// A document that does not overflow the viewport has no scroll range and always shows the
/// first frame. Overscroll outside `[0, max_scroll]` is clamped.
pub fn map_scroll_to_frame(
    scroll_top: f64,
    scroll_height: f64,
    viewport_height: f64,
    frame_count: u32,
) -> FrameIndex {
    if frame_count <= 1 {
        return FrameIndex::FIRST;
    }

    let max_scroll = scroll_height - viewport_height;
    if !max_scroll.is_finite() || max_scroll <= 0.0 || !scroll_top.is_finite() {
        return FrameIndex::FIRST;
    }

    let fraction = (scroll_top / max_scroll).clamp(0.0, 1.0);
    let last0 = f64::from(frame_count - 1);
    let index0 = (fraction * f64::from(frame_count)).ceil().min(last0);
    FrameIndex(index0 as u32 + 1)
}

/// [`map_scroll_to_frame`] over a host-reported [`ScrollMetrics`].
pub fn frame_for_scroll(scroll: ScrollMetrics, viewport_height: f64, frame_count: u32) -> FrameIndex {
    map_scroll_to_frame(
        scroll.scroll_top,
        scroll.scroll_height,
        viewport_height,
        frame_count,
    )
}

#[cfg(test)]
#[path = "../../tests/unit/scroll/mapper.rs"]
mod tests;
