use std::io::Cursor;

use super::*;
use crate::assets::source::MemorySource;

fn png(w: u32, h: u32) -> Vec<u8> {
    let img = image::RgbaImage::from_pixel(w, h, image::Rgba([200, 100, 50, 255]));
    let mut buf = Vec::new();
    image::DynamicImage::ImageRgba8(img)
        .write_to(&mut Cursor::new(&mut buf), image::ImageFormat::Png)
        .unwrap();
    buf
}

fn single_thread() -> LoadOptions {
    LoadOptions { threads: Some(1) }
}

#[test]
fn default_naming_is_zero_padded_webp() {
    let n = FrameNaming::default();
    assert_eq!(n.name_for(FrameIndex(1)), "frame_0001.webp");
    assert_eq!(n.name_for(FrameIndex(42)), "frame_0042.webp");
    assert_eq!(n.name_for(FrameIndex(150)), "frame_0150.webp");
}

#[test]
fn naming_rejects_counts_that_overflow_digits() {
    let n = FrameNaming::default();
    assert!(n.validate(9999).is_ok());
    assert!(n.validate(10_000).is_err());
    let bad = FrameNaming {
        extension: ".webp".to_string(),
        ..FrameNaming::default()
    };
    assert!(bad.validate(1).is_err());
}

#[test]
fn build_150_names_every_frame_in_order() {
    let store = FrameStore::build(
        150,
        FrameNaming::default(),
        Arc::new(MemorySource::new()),
        single_thread(),
    )
    .unwrap();
    assert_eq!(store.len(), 150);
    assert_eq!(store.count(), 150);
    for (i, frame) in store.iter().enumerate() {
        assert_eq!(frame.index(), FrameIndex(i as u32 + 1));
        assert_eq!(frame.name(), format!("frame_{:04}.webp", i + 1));
    }
    assert_eq!(store.iter().next().unwrap().name(), "frame_0001.webp");
    assert_eq!(store.iter().last().unwrap().name(), "frame_0150.webp");
}

#[test]
fn build_rejects_empty_sequence() {
    let err = FrameStore::build(
        0,
        FrameNaming::default(),
        Arc::new(MemorySource::new()),
        single_thread(),
    )
    .unwrap_err();
    assert!(err.to_string().contains("validation error:"));
}

#[test]
fn first_frame_can_be_awaited() {
    let src = MemorySource::new().with("frame_0001.webp", png(8, 6));
    let store =
        FrameStore::build(3, FrameNaming::default(), Arc::new(src), single_thread()).unwrap();

    let FrameState::Ready(img) = store.wait_first() else {
        panic!("expected first frame to be ready");
    };
    assert_eq!((img.width, img.height), (8, 6));
    assert!(store.ready(FrameIndex(1)).is_some());
}

#[test]
fn failures_are_recorded_and_never_ready() {
    let src = MemorySource::new()
        .with("frame_0001.webp", png(2, 2))
        .with("frame_0002.webp", b"garbage".to_vec());
    let store =
        FrameStore::build(3, FrameNaming::default(), Arc::new(src), single_thread()).unwrap();

    let stats = store.wait_all();
    assert_eq!(
        stats,
        FrameStats {
            total: 3,
            loading: 0,
            ready: 1,
            failed: 2
        }
    );
    assert!(store.ready(FrameIndex(2)).is_none());
    assert!(matches!(
        store.get(FrameIndex(3)).unwrap().state(),
        FrameState::Failed(msg) if msg.contains("frame_0003.webp")
    ));
}

#[test]
fn out_of_range_lookups_are_none() {
    let store = FrameStore::build(
        2,
        FrameNaming::default(),
        Arc::new(MemorySource::new()),
        single_thread(),
    )
    .unwrap();
    assert!(store.get(FrameIndex(0)).is_none());
    assert!(store.get(FrameIndex(3)).is_none());
    assert!(store.ready(FrameIndex(3)).is_none());
}

#[test]
fn custom_naming_flows_into_fetches() {
    let naming = FrameNaming {
        prefix: "hero/f".to_string(),
        digits: 2,
        extension: "png".to_string(),
    };
    let src = MemorySource::new().with("hero/f01.png", png(1, 1));
    let store = FrameStore::build(1, naming, Arc::new(src), single_thread()).unwrap();
    assert!(matches!(store.wait_first(), FrameState::Ready(_)));
}
