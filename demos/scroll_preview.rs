use std::{io::Cursor, path::PathBuf, sync::Arc};

use anyhow::Context as _;

const FRAMES: u32 = 48;
const WINDOW: (u32, u32) = (320, 180);
const PAGE_HEIGHT: f64 = 2400.0;

/// A 256x144 frame whose color band slides with the frame number.
fn synth_frame(n: u32) -> anyhow::Result<Vec<u8>> {
    let (w, h) = (256u32, 144u32);
    let band = (n * w / FRAMES) as i64;
    let img = image::RgbaImage::from_fn(w, h, |x, y| {
        let d = (x as i64 - band).unsigned_abs() as u32;
        let hot = 255u32.saturating_sub(d * 4) as u8;
        image::Rgba([hot, (y * 255 / h) as u8, 255 - hot, 255])
    });
    let mut buf = Vec::new();
    image::DynamicImage::ImageRgba8(img)
        .write_to(&mut Cursor::new(&mut buf), image::ImageFormat::Png)
        .context("encode synthetic frame")?;
    Ok(buf)
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt::init();

    let config = scrollreel::ReelConfig {
        frame_count: FRAMES,
        surface: scrollreel::SurfaceConfig {
            clear_rgba: Some([18, 20, 28, 255]),
            ..scrollreel::SurfaceConfig::default()
        },
        ..scrollreel::ReelConfig::default()
    };

    let mut source = scrollreel::MemorySource::new();
    for n in 1..=FRAMES {
        source.insert(
            config.naming.name_for(scrollreel::FrameIndex(n)),
            synth_frame(n)?,
        );
    }

    let window = scrollreel::Viewport::new(WINDOW.0, WINDOW.1);
    let surface = scrollreel::CpuSurface::new(config.surface_opts());
    let mut reel = scrollreel::ScrollReel::start(
        &config,
        Arc::new(source),
        surface,
        window,
        ["intro", "details", "footer"],
    )?;
    reel.wait_until_ready()?;
    let stats = reel.driver().frames().wait_all();
    eprintln!("loaded {} / {} frames", stats.ready, stats.total);

    // Three scroll events land between each refresh; only the last one is drawn.
    let max_scroll = PAGE_HEIGHT - f64::from(WINDOW.1);
    let mut top = 0.0;
    while top < max_scroll {
        for _ in 0..3 {
            top = (top + 37.0).min(max_scroll);
            reel.on_scroll(scrollreel::ScrollMetrics::new(top, PAGE_HEIGHT));
        }
        let outcome = reel.on_refresh()?;
        let intro = 1.0 - (top / 400.0).min(1.0);
        let footer = ((top - (max_scroll - 400.0)) / 400.0).clamp(0.0, 1.0);
        reel.on_section_visibility("intro", intro)?;
        reel.on_section_visibility("details", (top / max_scroll).min(1.0))?;
        reel.on_section_visibility("footer", footer)?;
        tracing::info!(top, ?outcome, "refresh");
    }

    let scroll = scrollreel::ScrollMetrics::new(top, PAGE_HEIGHT);
    let outcome = reel.on_resize(scrollreel::Viewport::new(480, WINDOW.1), scroll)?;
    eprintln!("resize redraw: {outcome:?}");

    for (id, visible) in reel.fader().iter() {
        eprintln!("section {id}: visible={visible}");
    }
    eprintln!("driver stats: {:?}", reel.driver().stats());

    let out = PathBuf::from("target").join("scroll_preview.png");
    if let Some(parent) = out.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let frame = reel.driver().surface().readback().to_straight();
    image::save_buffer_with_format(
        &out,
        &frame.data,
        frame.width,
        frame.height,
        image::ColorType::Rgba8,
        image::ImageFormat::Png,
    )
    .with_context(|| format!("write png '{}'", out.display()))?;
    eprintln!("wrote {}", out.display());
    Ok(())
}
