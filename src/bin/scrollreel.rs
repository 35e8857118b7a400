use std::{collections::BTreeSet, path::PathBuf, sync::Arc};

use anyhow::Context as _;
use clap::{Args, Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(name = "scrollreel", version)]
struct Cli {
    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Render the frame shown at a scroll position as a PNG.
    Frame(FrameArgs),
    /// Print the cover-fit crop and placement as JSON.
    Fit(FitArgs),
    /// Print the frame resource names in order.
    Names(NamesArgs),
    /// Load every frame in a directory and report missing or undecodable ones.
    Check(CheckArgs),
}

#[derive(Args, Debug)]
struct ConfigArg {
    /// Reel config JSON. Defaults to the stock 150-frame sequence.
    #[arg(long)]
    config: Option<PathBuf>,
}

#[derive(Parser, Debug)]
struct FrameArgs {
    #[command(flatten)]
    config: ConfigArg,

    /// Directory containing the frame images.
    #[arg(long)]
    frames: PathBuf,

    /// Distance scrolled from the top of the page, in pixels.
    #[arg(long, default_value_t = 0.0)]
    scroll_top: f64,

    /// Full scrollable height of the page, in pixels.
    #[arg(long)]
    scroll_height: f64,

    /// Window width in pixels.
    #[arg(long)]
    width: u32,

    /// Window height in pixels.
    #[arg(long)]
    height: u32,

    /// Override the configured frame count.
    #[arg(long)]
    count: Option<u32>,

    /// Output PNG path.
    #[arg(long)]
    out: PathBuf,
}

#[derive(Parser, Debug)]
struct FitArgs {
    #[arg(long)]
    src_width: f64,
    #[arg(long)]
    src_height: f64,
    #[arg(long)]
    dst_width: f64,
    #[arg(long)]
    dst_height: f64,
    /// Horizontal anchor in [0, 1]; out-of-range values are clamped.
    #[arg(long, default_value_t = 0.5, allow_negative_numbers = true)]
    anchor_x: f64,
    /// Vertical anchor in [0, 1]; out-of-range values are clamped.
    #[arg(long, default_value_t = 0.5, allow_negative_numbers = true)]
    anchor_y: f64,
}

#[derive(Parser, Debug)]
struct NamesArgs {
    #[command(flatten)]
    config: ConfigArg,

    /// Override the configured frame count.
    #[arg(long)]
    count: Option<u32>,
}

#[derive(Parser, Debug)]
struct CheckArgs {
    #[command(flatten)]
    config: ConfigArg,

    /// Directory containing the frame images.
    #[arg(long)]
    frames: PathBuf,

    /// Override the configured frame count.
    #[arg(long)]
    count: Option<u32>,
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    match cli.cmd {
        Command::Frame(args) => cmd_frame(args),
        Command::Fit(args) => cmd_fit(args),
        Command::Names(args) => cmd_names(args),
        Command::Check(args) => cmd_check(args),
    }
}

fn load_config(arg: &ConfigArg, count: Option<u32>) -> anyhow::Result<scrollreel::ReelConfig> {
    let mut cfg = match &arg.config {
        Some(path) => scrollreel::ReelConfig::from_path(path)?,
        None => scrollreel::ReelConfig::default(),
    };
    if let Some(count) = count {
        cfg.frame_count = count;
    }
    cfg.apply_env();
    cfg.validate()?;
    Ok(cfg)
}

fn frame_source(dir: &std::path::Path) -> anyhow::Result<Arc<dyn scrollreel::FrameSource>> {
    anyhow::ensure!(
        dir.is_dir(),
        "frames directory '{}' does not exist",
        dir.display()
    );
    Ok(Arc::new(scrollreel::DirSource::new(dir)))
}

fn cmd_frame(args: FrameArgs) -> anyhow::Result<()> {
    let cfg = load_config(&args.config, args.count)?;
    let source = frame_source(&args.frames)?;

    let still = scrollreel::render_still(
        &cfg,
        source,
        scrollreel::Viewport::new(args.width, args.height),
        scrollreel::ScrollMetrics::new(args.scroll_top, args.scroll_height),
    )?;
    if !still.outcome.is_drawn() {
        anyhow::bail!("frame {} could not be drawn: {:?}", still.frame, still.outcome);
    }

    if let Some(parent) = args.out.parent() {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("create output dir '{}'", parent.display()))?;
    }

    let straight = still.image.to_straight();
    image::save_buffer_with_format(
        &args.out,
        &straight.data,
        straight.width,
        straight.height,
        image::ColorType::Rgba8,
        image::ImageFormat::Png,
    )
    .with_context(|| format!("write png '{}'", args.out.display()))?;

    eprintln!("wrote {} (frame {})", args.out.display(), still.frame);
    Ok(())
}

fn cmd_fit(args: FitArgs) -> anyhow::Result<()> {
    anyhow::ensure!(
        args.src_width > 0.0 && args.src_height > 0.0,
        "source dimensions must be positive"
    );
    anyhow::ensure!(
        args.dst_width >= 0.0 && args.dst_height >= 0.0,
        "destination dimensions must be non-negative"
    );

    let req = scrollreel::FitRequest::new(
        scrollreel::Rect::new(0.0, 0.0, args.dst_width, args.dst_height),
        scrollreel::Anchor::new(args.anchor_x, args.anchor_y),
    );
    let fit = scrollreel::fit_cover(scrollreel::Size::new(args.src_width, args.src_height), req);
    let json = serde_json::to_string_pretty(&fit).context("serialize fit result")?;
    println!("{json}");
    Ok(())
}

fn cmd_names(args: NamesArgs) -> anyhow::Result<()> {
    let cfg = load_config(&args.config, args.count)?;
    for i in 1..=cfg.frame_count {
        println!("{}", cfg.naming.name_for(scrollreel::FrameIndex(i)));
    }
    Ok(())
}

#[derive(serde::Serialize)]
struct CheckReport {
    stats: scrollreel::FrameStats,
    dimensions: BTreeSet<(u32, u32)>,
    failures: Vec<CheckFailure>,
}

#[derive(serde::Serialize)]
struct CheckFailure {
    name: String,
    reason: String,
}

fn cmd_check(args: CheckArgs) -> anyhow::Result<()> {
    let cfg = load_config(&args.config, args.count)?;
    let source = frame_source(&args.frames)?;

    let store = scrollreel::FrameStore::build(cfg.frame_count, cfg.naming.clone(), source, cfg.load)?;
    let stats = store.wait_all();

    let mut dimensions = BTreeSet::new();
    let mut failures = Vec::new();
    for frame in store.iter() {
        match frame.state() {
            scrollreel::FrameState::Ready(img) => {
                dimensions.insert((img.width, img.height));
            }
            scrollreel::FrameState::Failed(reason) => failures.push(CheckFailure {
                name: frame.name().to_string(),
                reason: reason.to_string(),
            }),
            scrollreel::FrameState::Loading => {}
        }
    }

    let report = CheckReport {
        stats,
        dimensions,
        failures,
    };
    let json = serde_json::to_string_pretty(&report).context("serialize check report")?;
    println!("{json}");

    if report.stats.failed > 0 {
        anyhow::bail!(
            "{} of {} frames failed to load",
            report.stats.failed,
            report.stats.total
        );
    }
    if report.dimensions.len() > 1 {
        tracing::warn!(
            distinct = report.dimensions.len(),
            "frames have mixed dimensions"
        );
    }
    Ok(())
}
