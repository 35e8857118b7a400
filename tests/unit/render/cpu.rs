use super::*;
use crate::fit::cover::{FitRequest, fit_cover};
use crate::foundation::core::Anchor;

fn solid(w: u32, h: u32, rgba: [u8; 4]) -> PreparedImage {
    let mut data = Vec::with_capacity((w * h * 4) as usize);
    for _ in 0..w * h {
        data.extend_from_slice(&rgba);
    }
    PreparedImage {
        width: w,
        height: h,
        rgba8_premul: Arc::new(data),
    }
}

/// 20x10, left half red, right half blue.
fn split_red_blue() -> PreparedImage {
    let mut data = Vec::with_capacity(20 * 10 * 4);
    for _y in 0..10 {
        for x in 0..20 {
            if x < 10 {
                data.extend_from_slice(&[255, 0, 0, 255]);
            } else {
                data.extend_from_slice(&[0, 0, 255, 255]);
            }
        }
    }
    PreparedImage {
        width: 20,
        height: 10,
        rgba8_premul: Arc::new(data),
    }
}

fn surface(w: u32, h: u32) -> CpuSurface {
    let mut s = CpuSurface::default();
    s.resize(Viewport::new(w, h)).unwrap();
    s
}

#[test]
fn resize_clears_to_configured_color() {
    let mut s = CpuSurface::new(CpuSurfaceOpts {
        clear_rgba: Some([10, 20, 30, 255]),
        ..CpuSurfaceOpts::default()
    });
    s.resize(Viewport::new(4, 3)).unwrap();
    let out = s.readback();
    assert_eq!((out.width, out.height), (4, 3));
    assert_eq!(out.data.len(), 4 * 3 * 4);
    assert_eq!(out.pixel(3, 2), Some([10, 20, 30, 255]));
}

#[test]
fn oversized_surface_is_rejected() {
    let mut s = CpuSurface::default();
    assert!(s.resize(Viewport::new(70_000, 10)).is_err());
}

#[test]
fn cover_fill_paints_whole_surface_interior() {
    let mut s = surface(8, 6);
    let img = solid(3, 2, [200, 10, 10, 255]);
    let fit = fit_cover(img.size(), FitRequest::full(s.size()));
    s.draw_image(&img, &fit).unwrap();

    let out = s.readback();
    assert_eq!(out.pixel(4, 3), Some([200, 10, 10, 255]));
    assert_eq!(s.draw_count(), 1);
}

#[test]
fn anchor_decides_visible_half() {
    let img = split_red_blue();

    let mut centered = surface(10, 10);
    let fit = fit_cover(img.size(), FitRequest::full(centered.size()));
    centered.draw_image(&img, &fit).unwrap();
    let out = centered.readback();
    assert_eq!(out.pixel(2, 5), Some([255, 0, 0, 255]));
    assert_eq!(out.pixel(7, 5), Some([0, 0, 255, 255]));

    let mut left = surface(10, 10);
    let fit = fit_cover(
        img.size(),
        FitRequest::new(left.size().rect(), Anchor::new(0.0, 0.5)),
    );
    left.draw_image(&img, &fit).unwrap();
    assert_eq!(left.readback().pixel(7, 5), Some([255, 0, 0, 255]));
}

#[test]
fn drawing_on_empty_surface_is_a_noop() {
    let mut s = CpuSurface::default();
    let img = solid(2, 2, [1, 2, 3, 255]);
    let fit = fit_cover(img.size(), FitRequest::full(s.size()));
    s.draw_image(&img, &fit).unwrap();
    assert_eq!(s.draw_count(), 0);
    assert!(s.readback().data.is_empty());
}

#[test]
fn paint_cache_is_bounded() {
    let mut s = CpuSurface::new(CpuSurfaceOpts {
        paint_cache_capacity: 2,
        ..CpuSurfaceOpts::default()
    });
    s.resize(Viewport::new(4, 4)).unwrap();

    let a = solid(2, 2, [255, 0, 0, 255]);
    let b = solid(2, 2, [0, 255, 0, 255]);
    let c = solid(2, 2, [0, 0, 255, 255]);
    for img in [&a, &a, &b, &c] {
        let fit = fit_cover(img.size(), FitRequest::full(s.size()));
        s.draw_image(img, &fit).unwrap();
    }
    assert_eq!(s.paints.len(), 2);
    assert_eq!(s.lru.len(), 2);
    assert_eq!(s.draw_count(), 4);
}

#[test]
fn over_blend_respects_source_alpha() {
    let mut dst = vec![0u8, 0, 200, 255];
    premul_over_in_place(&mut dst, &[128, 0, 0, 128]).unwrap();
    assert_eq!(dst[3], 255);
    assert_eq!(dst[0], 128);
    assert_eq!(dst[2], mul_div255(200, 127));
    assert!(premul_over_in_place(&mut [0u8; 4], &[0u8; 8]).is_err());
}
