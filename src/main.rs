use anyhow::{Context, Result};
use clap::Parser;
use photo_tagger::models::{validate_quality, Config, PhotoAnalysis};
use photo_tagger::pipeline::Pipeline;
use std::path::PathBuf;
use tracing::{error, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Debug, Parser)]
#[command(name = "photo-tagger")]
#[command(about = "Upload a photo to Imagga and print its tags and colors")]
struct CliArgs {
    /// Path to the photo to analyze.
    #[arg(value_name = "IMAGE")]
    image: PathBuf,

    /// Print the result as JSON.
    #[arg(long)]
    json: bool,

    /// JPEG quality (1-100) used for the upload; overrides JPEG_QUALITY.
    #[arg(long, value_parser = parse_quality_arg)]
    quality: Option<u8>,
}

fn parse_quality_arg(input: &str) -> std::result::Result<u8, String> {
    input
        .parse::<u8>()
        .ok()
        .and_then(|quality| validate_quality(quality).ok())
        .ok_or_else(|| format!("Invalid quality '{}'. Expected 1-100", input))
}

fn render_text(analysis: &PhotoAnalysis) -> String {
    let mut out = String::new();
    out.push_str(&format!("Tags ({}):\n", analysis.tags.len()));
    for tag in &analysis.tags {
        out.push_str(&format!("  {}\n", tag));
    }
    out.push_str(&format!("Colors ({}):\n", analysis.colors.len()));
    for color in &analysis.colors {
        out.push_str(&format!(
            "  {} rgb({}, {}, {}) {}\n",
            color.hex(),
            color.red,
            color.green,
            color.blue,
            color.color_name
        ));
    }
    out
}

async fn run(args: CliArgs) -> Result<()> {
    let mut config = Config::from_env().context("Failed to load configuration")?;
    if let Some(quality) = args.quality {
        config.jpeg_quality = quality;
    }

    let image_data = tokio::fs::read(&args.image)
        .await
        .with_context(|| format!("Failed to read {}", args.image.display()))?;
    info!(
        "Read {} bytes from {}",
        image_data.len(),
        args.image.display()
    );

    let pipeline = Pipeline::new(&config)?;
    let analysis = pipeline
        .analyze(&image_data, |fraction| {
            info!("Upload progress: {:.0}%", fraction * 100.0)
        })
        .await?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&analysis)?);
    } else {
        print!("{}", render_text(&analysis));
    }
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "photo_tagger=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let args = CliArgs::parse();

    match run(args).await {
        Ok(()) => Ok(()),
        Err(e) => {
            error!("Photo tagging failed: {:#}", e);
            std::process::exit(1);
        }
    }
}
