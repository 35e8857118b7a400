use std::io::Cursor;

use super::*;

fn encode(img: image::RgbaImage, format: image::ImageFormat) -> Vec<u8> {
    let mut buf = Vec::new();
    image::DynamicImage::ImageRgba8(img)
        .write_to(&mut Cursor::new(&mut buf), format)
        .unwrap();
    buf
}

#[test]
fn decode_image_png_dimensions_and_premul() {
    let img = image::RgbaImage::from_raw(1, 1, vec![100u8, 50u8, 200u8, 128u8]).unwrap();
    let prepared = decode_image(&encode(img, image::ImageFormat::Png)).unwrap();
    assert_eq!(prepared.width, 1);
    assert_eq!(prepared.height, 1);
    assert_eq!(
        prepared.rgba8_premul.as_slice(),
        &[
            ((100u16 * 128 + 127) / 255) as u8,
            ((50u16 * 128 + 127) / 255) as u8,
            ((200u16 * 128 + 127) / 255) as u8,
            128u8
        ]
    );
}

#[test]
fn decode_image_webp_lossless() {
    let img = image::RgbaImage::from_pixel(4, 3, image::Rgba([10, 20, 30, 255]));
    let prepared = decode_image(&encode(img, image::ImageFormat::WebP)).unwrap();
    assert_eq!((prepared.width, prepared.height), (4, 3));
    assert_eq!(prepared.size(), Size::new(4.0, 3.0));
    assert_eq!(&prepared.rgba8_premul[..4], &[10, 20, 30, 255]);
}

#[test]
fn decode_garbage_is_an_error() {
    assert!(matches!(
        decode_image(b"definitely not an image"),
        Err(ReelError::Decode(_))
    ));
}
