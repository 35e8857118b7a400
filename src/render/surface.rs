use crate::{
    assets::decode::PreparedImage,
    fit::cover::FitResult,
    foundation::core::Viewport,
    foundation::error::ReelResult,
};

/// A rendered surface read back as RGBA8 pixels.
#[derive(Clone, Debug)]
pub struct FrameRGBA {
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
    /// RGBA8 bytes, tightly packed, row-major.
    pub data: Vec<u8>,
    /// Whether the `data` is premultiplied alpha.
    pub premultiplied: bool,
}

impl FrameRGBA {
    /// Straight-alpha copy, suitable for PNG encoders.
    pub fn to_straight(&self) -> FrameRGBA {
        if !self.premultiplied {
            return self.clone();
        }
        let mut data = self.data.clone();
        for px in data.chunks_exact_mut(4) {
            let a = px[3] as u16;
            if a == 0 || a == 255 {
                continue;
            }
            for c in &mut px[..3] {
                *c = ((*c as u16 * 255 + a / 2) / a).min(255) as u8;
            }
        }
        FrameRGBA {
            width: self.width,
            height: self.height,
            data,
            premultiplied: false,
        }
    }

    /// RGBA8 pixel at `(x, y)`, or `None` outside the frame.
    pub fn pixel(&self, x: u32, y: u32) -> Option<[u8; 4]> {
        if x >= self.width || y >= self.height {
            return None;
        }
        let i = ((y as usize) * (self.width as usize) + (x as usize)) * 4;
        let px = self.data.get(i..i + 4)?;
        Some([px[0], px[1], px[2], px[3]])
    }
}

/// The host's 2D drawing context.
///
/// Mirrors the small slice of a canvas API the player needs: a settable pixel size and an
/// image blit with a source crop and a destination rectangle.
pub trait DrawSurface {
    /// Current pixel size.
    fn size(&self) -> Viewport;

    /// Set the pixel size. Like resizing a canvas, this discards existing contents.
    fn resize(&mut self, size: Viewport) -> ReelResult<()>;

    /// Draw `fit.src` of `image` scaled into `fit.dst`.
    fn draw_image(&mut self, image: &PreparedImage, fit: &FitResult) -> ReelResult<()>;
}

impl<S: DrawSurface + ?Sized> DrawSurface for Box<S> {
    fn size(&self) -> Viewport {
        (**self).size()
    }

    fn resize(&mut self, size: Viewport) -> ReelResult<()> {
        (**self).resize(size)
    }

    fn draw_image(&mut self, image: &PreparedImage, fit: &FitResult) -> ReelResult<()> {
        (**self).draw_image(image, fit)
    }
}
