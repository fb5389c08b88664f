//! Demo client: submit a prompt (optionally with a source image) and watch
//! the job until it completes or fails.
//!
//! Usage: `generate_video <prompt> [image-file]`, with the server address in
//! `VIDEOGEN_AGENT_URL`.

use anyhow::{Context, Result};
use base64::{engine::general_purpose::STANDARD, Engine as _};
use reqwest::Url;
use std::env;
use std::path::Path;
use std::time::Duration;

use videogen_agent::client::{JobPoller, JobStatus, JobStore, VideoGenClient};
use videogen_agent::videogen::GenerationMode;

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt::init();

    let mut args = env::args().skip(1);
    let prompt = args
        .next()
        .context("usage: generate_video <prompt> [image-file]")?;
    let image_path = args.next();

    let base_url = env::var("VIDEOGEN_AGENT_URL").unwrap_or_else(|_| {
        eprintln!("VIDEOGEN_AGENT_URL not set, using http://127.0.0.1:3000");
        "http://127.0.0.1:3000".to_string()
    });
    let base_url = Url::parse(&base_url).context("invalid VIDEOGEN_AGENT_URL")?;

    let (mode, image) = match &image_path {
        Some(path) => (
            GenerationMode::ImageToVideo,
            Some(file_to_data_uri(Path::new(path))?),
        ),
        None => (GenerationMode::TextToVideo, None),
    };

    let store = JobStore::new();
    let poller = JobPoller::new(VideoGenClient::new(base_url), store.clone());

    let job = poller.submit(prompt, mode, image).await;
    println!("job {} submitted ({})", job.id, job.status);

    loop {
        let Some(current) = store.get(&job.id).await else {
            anyhow::bail!("job {} vanished from the store", job.id);
        };
        match current.status {
            JobStatus::Completed => {
                println!(
                    "video ready: {}",
                    current.video_url.unwrap_or_default()
                );
                return Ok(());
            }
            JobStatus::Failed => {
                anyhow::bail!(current
                    .error
                    .unwrap_or_else(|| "unknown failure".to_string()));
            }
            JobStatus::Processing => tokio::time::sleep(Duration::from_millis(500)).await,
        }
    }
}

/// Mirror of the browser-side file reader: raw bytes in, base64 data URI out.
fn file_to_data_uri(path: &Path) -> Result<String> {
    let bytes =
        std::fs::read(path).with_context(|| format!("failed to read {}", path.display()))?;
    let mime = match path.extension().and_then(|ext| ext.to_str()) {
        Some("png") => "image/png",
        Some("gif") => "image/gif",
        Some("webp") => "image/webp",
        _ => "image/jpeg",
    };
    Ok(format!("data:{mime};base64,{}", STANDARD.encode(bytes)))
}
