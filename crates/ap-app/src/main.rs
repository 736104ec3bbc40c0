use std::path::PathBuf;
use anyhow::Context as _;
use clap::{Args, Parser, Subcommand};
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::warn;
use tracing_subscriber::EnvFilter;
use ap_app::events::{self, EventReceiver};
use ap_app::generator::backend::config::GenBackendConfig;
use ap_app::{source_image, GenEvent, Generator, ImageRequest, ImageState, VideoRequest, VideoState};
use ap_core::{prompt, BackgroundStyle, CameraAngle, VisualizationGeometry};

#[derive(Parser, Debug)]
#[command(name = "anglephoto", version, about = "Render a subject from a chosen camera angle")]
struct Cli {
    /// Backend base URL, overrides ANGLEPHOTO_BACKEND_URL.
    #[arg(long, global = true)]
    backend: Option<String>,

    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Print the preview geometry and the prompt for an angle.
    Preview(PreviewArgs),
    /// Generate a single image from the chosen angle.
    Image(ImageArgs),
    /// Generate a 360° turntable video.
    Video(VideoArgs),
}

#[derive(Args, Debug)]
struct AngleArgs {
    /// Horizontal angle in degrees, wraps into [0, 360).
    #[arg(long, default_value_t = 0.0, allow_negative_numbers = true)]
    azimuth: f32,

    /// Vertical angle in degrees, clamped to [-30, 60].
    #[arg(long, default_value_t = 0.0, allow_negative_numbers = true)]
    elevation: f32,

    /// Distance multiplier, clamped to [0.5, 2.0].
    #[arg(long, default_value_t = 1.0)]
    distance: f32,

    /// default, white_studio, green_screen or dark_studio.
    #[arg(long, default_value = "default")]
    background: String,
}

impl AngleArgs {
    fn angle(&self) -> CameraAngle {
        CameraAngle::new(self.azimuth, self.elevation, self.distance)
    }

    fn background(&self) -> BackgroundStyle {
        BackgroundStyle::from_id_lossy(&self.background)
    }
}

#[derive(Args, Debug)]
struct PreviewArgs {
    #[command(flatten)]
    angle: AngleArgs,

    /// Dump the full geometry as JSON.
    #[arg(long)]
    json: bool,
}

#[derive(Args, Debug)]
struct ImageArgs {
    #[command(flatten)]
    angle: AngleArgs,

    /// Subject image to send along.
    #[arg(long)]
    source: Option<PathBuf>,

    /// Where to write the generated image.
    #[arg(long)]
    out: Option<PathBuf>,
}

#[derive(Args, Debug)]
struct VideoArgs {
    #[command(flatten)]
    angle: AngleArgs,

    /// Video length in seconds, clamped to [1, 10].
    #[arg(long, default_value_t = 3.0)]
    duration: f32,

    /// Subject image to send along.
    #[arg(long)]
    source: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let cli = Cli::parse();

    let mut conf = GenBackendConfig::load()?;
    if let Some(url) = cli.backend {
        conf.base_url = url.trim_end_matches('/').to_string();
    }

    match cli.cmd {
        Command::Preview(args) => preview(&args),
        Command::Image(args) => generate_image(conf, args).await,
        Command::Video(args) => generate_video(conf, args).await,
    }
}

fn preview(args: &PreviewArgs) -> anyhow::Result<()> {
    let angle = args.angle.angle();
    let geometry = VisualizationGeometry::from_angle(angle);

    if args.json {
        println!("{}", serde_json::to_string_pretty(&geometry)?);
        return Ok(());
    }

    println!(
        "angle      az {:.1}° el {:.1}° dist {:.2}x",
        angle.azimuth(),
        angle.elevation(),
        angle.distance()
    );
    println!("camera     [{:.3}, {:.3}, {:.3}]", geometry.camera.x, geometry.camera.y, geometry.camera.z);
    println!("ring       {} points", geometry.orbit_ring.len());
    println!("arc        {} points", geometry.elevation_arc.len());
    println!("prompt     {}", prompt::single_image_prompt(angle, args.angle.background()));
    Ok(())
}

async fn generate_image(conf: GenBackendConfig, args: ImageArgs) -> anyhow::Result<()> {
    let mut request = ImageRequest::new(args.angle.angle()).with_background(args.angle.background());
    if let Some(path) = &args.source {
        request = request.with_image(source_image::load_data_url(path)?);
    }
    println!("prompt preview: {}", request.prompt_preview());

    let (tx, rx) = events::channel();
    let generator = Generator::from_config(conf, tx)?;
    let printer = spawn_printer(rx);
    let cancel = cancel_on_ctrl_c();

    let outcome = generator.generate_image(&request, &cancel).await;
    drop(generator);
    join_printer(printer).await;

    let Some(result) = outcome? else {
        println!("cancelled");
        return Ok(());
    };

    match (&args.out, result.is_data_url()) {
        (Some(out), true) => {
            let bytes = source_image::decode_data_url(&result.image)?;
            std::fs::write(out, bytes).with_context(|| format!("failed to write {}", out.display()))?;
            println!("saved {}", out.display());
        }
        (_, false) => println!("{}", result.image),
        (None, true) => println!("image received ({} bytes of data URL)", result.image.len()),
    }
    Ok(())
}

async fn generate_video(conf: GenBackendConfig, args: VideoArgs) -> anyhow::Result<()> {
    let mut request = VideoRequest::new(args.angle.angle(), args.duration)
        .with_background(args.angle.background());
    if let Some(path) = &args.source {
        request = request.with_image(source_image::load_data_url(path)?);
    }
    println!("rendering {} frames at {} fps", request.frame_count(), request.fps());

    let (tx, rx) = events::channel();
    let generator = Generator::from_config(conf, tx)?;
    let printer = spawn_printer(rx);
    let cancel = cancel_on_ctrl_c();

    let outcome = generator.generate_video(&request, &cancel).await;
    drop(generator);
    join_printer(printer).await;

    match outcome? {
        Some(result) => println!("{}", result.video_url),
        None => println!("cancelled"),
    }
    Ok(())
}

fn spawn_printer(mut rx: EventReceiver) -> JoinHandle<()> {
    tokio::spawn(async move {
        while let Some(event) = rx.recv().await {
            match event {
                GenEvent::Image(ImageState::Requesting) => println!("requesting image..."),
                GenEvent::Image(ImageState::Failed(err)) | GenEvent::Video(VideoState::Failed(err)) => {
                    eprintln!("failed: {err}")
                }
                GenEvent::Video(VideoState::Submitting) => println!("submitting video..."),
                GenEvent::Video(VideoState::Polling { job_id, attempt, status }) => {
                    println!("{} job {job_id} is {status} (check {attempt})", status.icon())
                }
                GenEvent::Image(ImageState::Succeeded { constructed_prompt, .. }) => {
                    println!("done: {constructed_prompt}")
                }
                GenEvent::Video(VideoState::Succeeded { .. }) => println!("done"),
                GenEvent::Image(ImageState::Idle) | GenEvent::Video(VideoState::Idle) => {}
            }
        }
    })
}

/// Waits for the printer to drain the event channel. Returns false if it died
/// instead of finishing.
async fn join_printer(printer: JoinHandle<()>) -> bool {
    match printer.await {
        Ok(()) => true,
        Err(err) => {
            warn!(error = %err, "Event printer stopped before the channel closed");
            false
        }
    }
}

fn cancel_on_ctrl_c() -> CancellationToken {
    let cancel = CancellationToken::new();
    let token = cancel.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            token.cancel();
        }
    });
    cancel
}
