pub mod check;

use std::path::{Path, PathBuf};
use std::time::Instant;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use scrollreel_core::{hash_frame, ScrollreelConfig, SurfaceSize, Timestamp};
use scrollreel_playback::{ScrollDriver, ScrollEvent};
use scrollreel_render::image_loader::save_png;
use scrollreel_render::{ImageSet, ImageSetLoader, LoadEvent, RasterCanvas};

#[derive(Parser)]
#[command(
    name = "scrollreel",
    version,
    about = "scrollreel: scroll-scrubbed frame sequence playback",
    long_about = "scrollreel paints a numbered still-image sequence in step with scroll position.\nScrub a sequence offline, or check a site before deploying it."
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Simulate scrolling through a frame sequence and write PNG snapshots
    Scrub {
        /// Path to a scrollreel.toml (defaults apply when omitted)
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Frames directory (overrides sequence.directory)
        #[arg(long)]
        frames: Option<PathBuf>,

        /// Number of scroll updates between progress 0 and 1
        #[arg(long, default_value_t = 10)]
        steps: u32,

        /// Surface width in pixels (overrides surface.width)
        #[arg(long)]
        width: Option<u32>,

        /// Surface height in pixels (overrides surface.height)
        #[arg(long)]
        height: Option<u32>,

        /// Directory for the PNG snapshots
        #[arg(short, long, default_value = "output/scrub")]
        output: PathBuf,
    },

    /// Check that a site is ready to deploy
    Check {
        /// Site root directory
        #[arg(long, default_value = ".")]
        root: PathBuf,

        /// Path to a scrollreel.toml (defaults to <root>/scrollreel.toml if present)
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Print the report as JSON
        #[arg(long)]
        json: bool,
    },

    /// Display version and default settings
    Info,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    match cli.command {
        Commands::Scrub {
            config,
            frames,
            steps,
            width,
            height,
            output,
        } => {
            let mut config = load_config(config.as_deref())?;
            if let Some(frames) = frames {
                config.sequence.directory = frames;
            }
            if let Some(width) = width {
                config.surface.width = width;
            }
            if let Some(height) = height {
                config.surface.height = height;
            }
            run_async(cmd_scrub(config, steps, output))
        }
        Commands::Check { root, config, json } => {
            let config = match config {
                Some(path) => load_config(Some(&path))?,
                None => {
                    let default_path = root.join(ScrollreelConfig::FILE_NAME);
                    load_config(default_path.is_file().then_some(default_path.as_path()))?
                }
            };
            cmd_check(&root, &config, json)
        }
        Commands::Info => cmd_info(),
    }
}

fn run_async<F>(future: F) -> Result<()>
where
    F: std::future::Future<Output = Result<()>>,
{
    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
        .context("failed to initialize async runtime")?;
    runtime.block_on(future)
}

fn load_config(path: Option<&Path>) -> Result<ScrollreelConfig> {
    match path {
        Some(path) => ScrollreelConfig::load_from_file(path)
            .with_context(|| format!("failed to load config: {}", path.display())),
        None => Ok(ScrollreelConfig::default()),
    }
}

async fn load_sequence(config: &ScrollreelConfig) -> ImageSet {
    let sources = config.sequence.sources();
    let mut last_label = String::new();
    ImageSetLoader::new()
        .load(sources, |event| match event {
            LoadEvent::Progress(progress) => {
                let label = progress.label();
                if label != last_label {
                    tracing::debug!("loading {}", label);
                    last_label = label;
                }
            }
            LoadEvent::Complete(progress) => {
                tracing::info!("loaded {}/{} frame slots", progress.completed, progress.total);
            }
            _ => {}
        })
        .await
}

async fn cmd_scrub(config: ScrollreelConfig, steps: u32, output: PathBuf) -> Result<()> {
    config.validate()?;
    let start = Instant::now();
    let size = config.surface.size();

    println!("🎞  Scrubbing {}", config.sequence.directory.display());
    println!("   Frames:  {}", config.sequence.frame_count);
    println!("   Surface: {}", size);

    let images = load_sequence(&config).await;
    println!(
        "   ✓ Loaded {} of {} ({} failed)",
        images.loaded_count(),
        images.len(),
        images.failed_count()
    );
    if images.is_empty() {
        println!("   Nothing to scrub.");
        return Ok(());
    }

    std::fs::create_dir_all(&output)
        .with_context(|| format!("failed to create output directory: {}", output.display()))?;

    let mut driver = ScrollDriver::new(RasterCanvas::new(size), &config.playback);
    let settle = config.playback.settle_delay();
    let refresh = scrollreel_core::Duration::from_millis(16.0);
    let mut now = Timestamp::zero();

    driver.handle(&images, ScrollEvent::Enter(0.0), now);
    now = now + settle;
    driver.animation_frame(&images, now);

    let steps = steps.max(1);
    for step in 0..=steps {
        let progress = step as f64 / steps as f64;
        driver.handle(&images, ScrollEvent::Update(progress), now);
        now = now + refresh;
        let report = driver.animation_frame(&images, now);
        snapshot(
            &driver,
            &output.join(format!("step_{:03}.png", step)),
            &format!("{:>5.1}%", progress * 100.0),
            report.painted.is_empty(),
        )?;
    }

    driver.handle(&images, ScrollEvent::Complete, now);
    driver.handle(&images, ScrollEvent::Leave, now);
    driver.handle(&images, ScrollEvent::EnterBack(1.0), now);
    now = now + settle;
    driver.animation_frame(&images, now);
    snapshot(&driver, &output.join("recovery.png"), "recover", false)?;

    println!();
    if size.is_empty() {
        println!("   ✅ Scrubbed a zero-area surface in {:.2}s", start.elapsed().as_secs_f64());
        return Ok(());
    }
    println!(
        "   ✅ Wrote {} snapshots to {} in {:.2}s",
        steps + 2,
        output.display(),
        start.elapsed().as_secs_f64()
    );
    Ok(())
}

fn snapshot(
    driver: &ScrollDriver<RasterCanvas>,
    path: &Path,
    label: &str,
    held: bool,
) -> Result<()> {
    let controller = driver.controller();
    if controller.surface_size().is_empty() {
        println!("   {}  empty surface, nothing to write", label);
        return Ok(());
    }
    let pixels = controller.canvas().pixels();
    save_png(pixels, path).with_context(|| format!("failed to write {}", path.display()))?;
    let frame = controller
        .displayed_frame()
        .map(|f| f.get().to_string())
        .unwrap_or_else(|| "-".to_string());
    println!(
        "   {}  frame {:>4}  {}{}",
        label,
        frame,
        hash_frame(pixels).short(),
        if held { "  (held)" } else { "" }
    );
    Ok(())
}

fn cmd_check(root: &Path, config: &ScrollreelConfig, json: bool) -> Result<()> {
    let report = check::run_check(root, &config.sequence, &config.deploy)?;

    if json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        print_check_report(&report);
    }

    if !report.is_ready() {
        anyhow::bail!("site is not ready to deploy");
    }
    Ok(())
}

fn print_check_report(report: &check::CheckReport) {
    println!("🔍 Checking {}", report.root.display());

    println!();
    println!("📁 Required files:");
    for file in &report.required {
        if file.present {
            println!("   ✅ {}", file.name);
        } else {
            println!("   ❌ {} (missing)", file.name);
        }
    }

    println!();
    println!("🖼  Frames ({}):", report.frames.directory.display());
    let frames = &report.frames;
    if !frames.present {
        println!("   ❌ directory not found");
    } else if frames.images.is_empty() {
        println!("   ❌ no .jpg or .png files");
    } else {
        println!("   ✅ {} images", frames.images.len());
        println!("   first: {}", frames.first().unwrap_or_default());
        println!("   last:  {}", frames.last().unwrap_or_default());
        if !frames.invalid_names.is_empty() {
            println!("   ⚠️  {} badly named files:", frames.invalid_names.len());
            for name in frames.listed_invalid_names() {
                println!("      - {}", name);
            }
            if frames.unlisted_invalid_count() > 0 {
                println!("      ... and {} more", frames.unlisted_invalid_count());
            }
        }
    }

    println!();
    println!("📊 File sizes (limit {} MB):", report.max_file_size_mb);
    for size in &report.sizes {
        let icon = if size.over_limit { "⚠️ " } else { "✅" };
        println!("   {} {}: {:.2} MB", icon, size.name, size.size_mb);
    }

    println!();
    println!("⚙️  CI workflow:");
    if report.workflow_present {
        println!("   ✅ {}", report.workflow.display());
    } else {
        println!("   ❌ {} (missing)", report.workflow.display());
    }

    println!();
    println!("{}", "=".repeat(50));
    if report.is_ready() {
        println!("🎉 Ready to deploy.");
    } else {
        println!("❌ Fix the problems above before deploying.");
    }
}

fn cmd_info() -> Result<()> {
    let defaults = ScrollreelConfig::default();
    let surface: SurfaceSize = defaults.surface.size();
    println!("🎞  scrollreel");
    println!("   Version:      {}", env!("CARGO_PKG_VERSION"));
    println!("   Renderer:     CPU raster, cover fit");
    println!(
        "   Sequence:     {} frames, {}",
        defaults.sequence.frame_count,
        defaults
            .sequence
            .source_path(scrollreel_core::FrameIndex::FIRST)
            .display()
    );
    println!("   Surface:      {}", surface);
    println!("   Settle delay: {}", defaults.playback.settle_delay());
    println!("   Config file:  {}", ScrollreelConfig::FILE_NAME);
    Ok(())
}
