use std::collections::{HashMap, VecDeque};
use std::sync::Arc;

use crate::{
    assets::decode::PreparedImage,
    fit::cover::FitResult,
    foundation::core::{Affine, Rect, Viewport},
    foundation::error::{ReelError, ReelResult},
    render::surface::{DrawSurface, FrameRGBA},
};

/// Options for the CPU surface.
#[derive(Clone, Copy, Debug)]
pub struct CpuSurfaceOpts {
    /// Straight RGBA8 color the surface is cleared to on resize. `None` clears to transparent.
    pub clear_rgba: Option<[u8; 4]>,
    /// Number of decoded frames kept as ready-to-draw paints.
    pub paint_cache_capacity: usize,
}

impl Default for CpuSurfaceOpts {
    fn default() -> Self {
        Self {
            clear_rgba: None,
            paint_cache_capacity: 16,
        }
    }
}

struct CachedPaint {
    // Held so the keyed allocation outlives the cache entry.
    _pixels: Arc<Vec<u8>>,
    paint: vello_cpu::Image,
}

/// Software drawing surface backed by a `vello_cpu` pixmap.
pub struct CpuSurface {
    opts: CpuSurfaceOpts,
    size: Viewport,
    pixmap: Option<vello_cpu::Pixmap>,
    scratch: Option<vello_cpu::Pixmap>,
    ctx: Option<vello_cpu::RenderContext>,
    paints: HashMap<usize, CachedPaint>,
    lru: VecDeque<usize>,
    draws: u64,
}

impl std::fmt::Debug for CpuSurface {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CpuSurface")
            .field("size", &self.size)
            .field("cached_paints", &self.paints.len())
            .field("draws", &self.draws)
            .finish()
    }
}

impl Default for CpuSurface {
    fn default() -> Self {
        Self::new(CpuSurfaceOpts::default())
    }
}

impl CpuSurface {
    /// A zero-sized surface; call [`DrawSurface::resize`] before drawing.
    pub fn new(opts: CpuSurfaceOpts) -> Self {
        Self {
            opts,
            size: Viewport::default(),
            pixmap: None,
            scratch: None,
            ctx: None,
            paints: HashMap::new(),
            lru: VecDeque::new(),
            draws: 0,
        }
    }

    /// Number of blits that reached the pixmap.
    pub fn draw_count(&self) -> u64 {
        self.draws
    }

    /// Copy the current contents out as premultiplied RGBA8.
    pub fn readback(&self) -> FrameRGBA {
        FrameRGBA {
            width: self.size.width,
            height: self.size.height,
            data: self
                .pixmap
                .as_ref()
                .map(|p| p.data_as_u8_slice().to_vec())
                .unwrap_or_default(),
            premultiplied: true,
        }
    }

    fn paint_for(&mut self, image: &PreparedImage) -> ReelResult<vello_cpu::Image> {
        let key = Arc::as_ptr(&image.rgba8_premul) as usize;
        if let Some(hit) = self.paints.get(&key) {
            let paint = hit.paint.clone();
            self.touch(key);
            return Ok(paint);
        }

        let pixmap = pixmap_from_premul_bytes(&image.rgba8_premul, image.width, image.height)?;
        let paint = vello_cpu::Image {
            image: vello_cpu::ImageSource::Pixmap(Arc::new(pixmap)),
            sampler: vello_cpu::peniko::ImageSampler::default(),
        };
        if self.opts.paint_cache_capacity > 0 {
            self.paints.insert(
                key,
                CachedPaint {
                    _pixels: Arc::clone(&image.rgba8_premul),
                    paint: paint.clone(),
                },
            );
            self.touch(key);
            while self.lru.len() > self.opts.paint_cache_capacity {
                if let Some(old) = self.lru.pop_front() {
                    self.paints.remove(&old);
                }
            }
        }
        Ok(paint)
    }

    fn touch(&mut self, key: usize) {
        if let Some(pos) = self.lru.iter().position(|&k| k == key) {
            self.lru.remove(pos);
        }
        self.lru.push_back(key);
    }
}

impl DrawSurface for CpuSurface {
    fn size(&self) -> Viewport {
        self.size
    }

    fn resize(&mut self, size: Viewport) -> ReelResult<()> {
        self.size = size;
        self.scratch = None;
        if size.is_empty() {
            self.pixmap = None;
            return Ok(());
        }

        let (w, h) = dims_u16(size)?;
        let mut pixmap = vello_cpu::Pixmap::new(w, h);
        match self.opts.clear_rgba {
            Some(rgba) => clear_pixmap(&mut pixmap, premul_rgba8(rgba)),
            None => pixmap.data_as_u8_slice_mut().fill(0),
        }
        self.pixmap = Some(pixmap);
        tracing::debug!(width = size.width, height = size.height, "surface resized");
        Ok(())
    }

    fn draw_image(&mut self, image: &PreparedImage, fit: &FitResult) -> ReelResult<()> {
        if fit.is_empty() || self.pixmap.is_none() {
            return Ok(());
        }
        let (w, h) = dims_u16(self.size)?;
        let paint = self.paint_for(image)?;

        let mut ctx = match self.ctx.take() {
            Some(ctx) if ctx.width() == w && ctx.height() == h => ctx,
            _ => vello_cpu::RenderContext::new(w, h),
        };
        ctx.reset();
        ctx.set_transform(affine_to_cpu(fit.to_affine()));
        ctx.set_paint_transform(vello_cpu::kurbo::Affine::IDENTITY);
        ctx.set_paint(paint);
        ctx.fill_rect(&rect_to_cpu(fit.src));
        ctx.flush();

        // `vello_cpu` renders into a fresh buffer, so render into scratch and blend over.
        let mut scratch = match self.scratch.take() {
            Some(p) if p.width() == w && p.height() == h => p,
            _ => vello_cpu::Pixmap::new(w, h),
        };
        scratch.data_as_u8_slice_mut().fill(0);
        ctx.render_to_pixmap(&mut scratch);
        self.ctx = Some(ctx);

        let dst = self
            .pixmap
            .as_mut()
            .ok_or_else(|| ReelError::render("surface pixmap missing"))?;
        premul_over_in_place(dst.data_as_u8_slice_mut(), scratch.data_as_u8_slice())?;
        self.scratch = Some(scratch);
        self.draws += 1;
        Ok(())
    }
}

fn dims_u16(size: Viewport) -> ReelResult<(u16, u16)> {
    let w: u16 = size
        .width
        .try_into()
        .map_err(|_| ReelError::render(format!("surface width exceeds u16: {}", size.width)))?;
    let h: u16 = size
        .height
        .try_into()
        .map_err(|_| ReelError::render(format!("surface height exceeds u16: {}", size.height)))?;
    Ok((w, h))
}

fn affine_to_cpu(a: Affine) -> vello_cpu::kurbo::Affine {
    vello_cpu::kurbo::Affine::new(a.as_coeffs())
}

fn rect_to_cpu(r: Rect) -> vello_cpu::kurbo::Rect {
    vello_cpu::kurbo::Rect::new(r.x0, r.y0, r.x1, r.y1)
}

fn pixmap_from_premul_bytes(
    bytes: &[u8],
    width: u32,
    height: u32,
) -> ReelResult<vello_cpu::Pixmap> {
    let w: u16 = width
        .try_into()
        .map_err(|_| ReelError::render("frame width exceeds u16"))?;
    let h: u16 = height
        .try_into()
        .map_err(|_| ReelError::render("frame height exceeds u16"))?;
    if bytes.len()
        != (width as usize)
            .saturating_mul(height as usize)
            .saturating_mul(4)
    {
        return Err(ReelError::render("frame byte len mismatch"));
    }
    let mut pixels = Vec::<vello_cpu::peniko::color::PremulRgba8>::with_capacity(
        (width as usize) * (height as usize),
    );
    for px in bytes.chunks_exact(4) {
        pixels.push(vello_cpu::peniko::color::PremulRgba8::from_u8_array([
            px[0], px[1], px[2], px[3],
        ]));
    }
    Ok(vello_cpu::Pixmap::from_parts_with_opacity(
        pixels, w, h, true,
    ))
}

fn premul_rgba8([r, g, b, a]: [u8; 4]) -> [u8; 4] {
    let premul = |c: u8| -> u8 { mul_div255(c as u16, a as u16) };
    [premul(r), premul(g), premul(b), a]
}

fn clear_pixmap(pixmap: &mut vello_cpu::Pixmap, rgba: [u8; 4]) {
    for px in pixmap.data_as_u8_slice_mut().chunks_exact_mut(4) {
        px.copy_from_slice(&rgba);
    }
}

fn premul_over_in_place(dst: &mut [u8], src: &[u8]) -> ReelResult<()> {
    if dst.len() != src.len() || !dst.len().is_multiple_of(4) {
        return Err(ReelError::render(
            "premul_over_in_place expects equal-length rgba8 buffers",
        ));
    }
    for (d, s) in dst.chunks_exact_mut(4).zip(src.chunks_exact(4)) {
        let sa = s[3] as u16;
        if sa == 0 {
            continue;
        }
        if sa == 255 {
            d.copy_from_slice(s);
            continue;
        }
        let inv = 255u16 - sa;
        d[3] = (sa as u8).saturating_add(mul_div255(d[3] as u16, inv));
        for c in 0..3 {
            d[c] = s[c].saturating_add(mul_div255(d[c] as u16, inv));
        }
    }
    Ok(())
}

fn mul_div255(x: u16, y: u16) -> u8 {
    (((u32::from(x) * u32::from(y)) + 127) / 255) as u8
}

#[cfg(test)]
#[path = "../../tests/unit/render/cpu.rs"]
mod tests;
