use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;
use video_ad_segments_lib::console::{Console, FixedViewport, LoggingPlayer};
use video_ad_segments_lib::{
    ClientConfig, HttpTransport, SegmentRenderer, UploadController, UploadPage, UploadRequest,
};

/// Upload a video for scene segmentation and print the suggested ads per segment
#[derive(Parser, Debug)]
#[command(name = "video-ad-segments", version)]
struct Args {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Upload a video file and print the returned segments
    Upload {
        /// Video file to upload
        file: PathBuf,

        /// JSON config file (missing file means defaults)
        #[arg(long)]
        config: Option<PathBuf>,

        /// Upload endpoint, overrides config and environment
        #[arg(long)]
        endpoint: Option<String>,

        /// After a successful upload, jump to this segment (1-based)
        #[arg(long)]
        seek: Option<usize>,

        /// Also print the rendered segments as JSON
        #[arg(long)]
        json: bool,
    },
}

fn init_logging(level: &str) -> Result<()> {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(level))
        .context("invalid log filter")?;

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
    Ok(())
}

#[tokio::main]
async fn main() -> Result<ExitCode> {
    // Load environment variables from .env file
    let _ = dotenvy::dotenv();

    let args = Args::parse();

    match args.command {
        Commands::Upload {
            file,
            config,
            endpoint,
            seek,
            json,
        } => {
            let mut config = ClientConfig::load(config.as_deref())?;
            if let Some(endpoint) = endpoint {
                config.endpoint = endpoint;
            }
            init_logging(&config.log_level)?;

            let transport = HttpTransport::new(&config)?;
            let controller = UploadController::new(Box::new(transport));
            let renderer = SegmentRenderer::from_config(&config);
            let mut page = UploadPage::new(controller, renderer, Console::stdout());

            let request = UploadRequest::from_path(&file)
                .await
                .with_context(|| format!("failed to read {}", file.display()))?;
            page.select_file(Some(request));

            let outcome = page.submit().await;
            if !outcome.is_success() {
                return Ok(ExitCode::FAILURE);
            }

            if let Some(number) = seek {
                let index = number
                    .checked_sub(1)
                    .context("segments are numbered from 1")?;
                let mut player = LoggingPlayer::default();
                page.activate_segment(index, &mut player, &mut FixedViewport)
                    .with_context(|| format!("cannot seek to segment {}", number))?;
            }

            if json {
                let dump = serde_json::to_string_pretty(page.segments().views())
                    .context("failed to serialize segments")?;
                println!("{}", dump);
            }

            Ok(ExitCode::SUCCESS)
        }
    }
}
