use std::path::PathBuf;
use std::process;

use clap::Parser;

use facepreview_core::capture::domain::capture_session::CaptureSession;
use facepreview_core::capture::infrastructure::synthetic_camera::SyntheticCamera;
use facepreview_core::detection::domain::scan_options::ScanOptions;
use facepreview_core::detection::infrastructure::model_resolver;
use facepreview_core::detection::infrastructure::seeta_detector::SeetaDetector;
use facepreview_core::overlay::domain::overlay_renderer::{OverlayRenderer, OverlayScene};
use facepreview_core::overlay::infrastructure::image_annotator::ImageAnnotator;
use facepreview_core::pipeline::detection_pipeline::DetectionPipeline;
use facepreview_core::pipeline::infrastructure::threaded_preview_executor::ThreadedPreviewExecutor;
use facepreview_core::shared::constants::{CASCADE_MODEL_NAME, CASCADE_MODEL_URL};

/// Face preview demo: replay an image as a camera feed, detect the largest
/// face, and draw its bounding box at viewport scale.
#[derive(Parser)]
#[command(name = "facepreview")]
struct Cli {
    /// Input image used as the simulated camera feed.
    input: PathBuf,

    /// Annotated output image.
    #[arg(short, long)]
    output: PathBuf,

    /// Directory containing a bundled cascade model (skips cache/download).
    #[arg(long)]
    model_dir: Option<PathBuf>,

    /// Number of frames to replay through the threaded pipeline.
    #[arg(long, default_value = "30")]
    frames: usize,

    /// Viewport size as WxH for the overlay projection.
    #[arg(long, default_value = "800x600")]
    viewport: String,
}

fn main() {
    env_logger::init();

    if let Err(e) = run() {
        eprintln!("Error: {e}");
        process::exit(1);
    }
}

fn run() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    if !cli.input.exists() {
        return Err(format!("Input file not found: {}", cli.input.display()).into());
    }
    if cli.frames == 0 {
        return Err("Frame count must be at least 1".into());
    }
    let (viewport_w, viewport_h) = parse_viewport(&cli.viewport)?;

    log::info!("Resolving model: {CASCADE_MODEL_NAME}");
    let model_path = model_resolver::resolve(
        CASCADE_MODEL_NAME,
        CASCADE_MODEL_URL,
        cli.model_dir.as_deref(),
        Some(Box::new(download_progress)),
    )?;
    let detector = SeetaDetector::new(&model_path)?;

    let source = image::open(&cli.input)?;
    let luma = source.to_luma8();
    let (width, height) = luma.dimensions();
    let camera = SyntheticCamera::new(luma.into_raw(), width, height, cli.frames);

    let mut session = CaptureSession::open(camera, viewport_w, viewport_h)?;
    let mut pipeline = DetectionPipeline::new(Box::new(detector), ScanOptions::default());
    let stats = ThreadedPreviewExecutor::new().run(&mut session, &mut pipeline)?;
    drop(session);
    log::info!(
        "processed {} of {} delivered frames ({} dropped)",
        stats.frames_processed,
        stats.frames_delivered,
        stats.frames_dropped
    );

    let snapshot = pipeline.latest();
    match snapshot.face {
        Some(face) => log::info!(
            "largest face at ({}, {}) {}x{} in the {}x{} search image",
            face.x,
            face.y,
            face.width,
            face.height,
            snapshot.gray_width,
            snapshot.gray_height
        ),
        None => log::info!("no face found"),
    }

    let scene = OverlayScene::compose(&snapshot, viewport_w, viewport_h);
    let canvas = image::imageops::resize(
        &source.to_rgb8(),
        viewport_w,
        viewport_h,
        image::imageops::FilterType::Triangle,
    );
    let mut annotator = ImageAnnotator::new(canvas);
    annotator.render(&scene)?;
    eprintln!("{}", scene.label.text);
    annotator.into_canvas().save(&cli.output)?;
    log::info!("Output written to {}", cli.output.display());

    Ok(())
}

fn parse_viewport(spec: &str) -> Result<(u32, u32), Box<dyn std::error::Error>> {
    let (w, h) = spec
        .split_once('x')
        .ok_or_else(|| format!("Viewport must be WxH, got '{spec}'"))?;
    let width: u32 = w.parse()?;
    let height: u32 = h.parse()?;
    if width == 0 || height == 0 {
        return Err(format!("Viewport must be non-zero, got '{spec}'").into());
    }
    Ok((width, height))
}

fn download_progress(downloaded: u64, total: u64) {
    if total > 0 {
        let pct = (downloaded as f64 / total as f64 * 100.0) as u32;
        eprint!("\rDownloading cascade model... {pct}%");
    } else {
        eprint!("\rDownloading cascade model... {downloaded} bytes");
    }
}
