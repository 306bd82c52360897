//! CDN Upload Example
//!
//! Uploads an image, reads back its stats, then deletes it.
//! Needs an API token in IDEVISION_TOKEN.
//!
//! Run with: cargo run --example cdn_upload -- path/to/image.png

use anyhow::Context;
use devision_rs::{Client, ImageFormat};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("devision_rs=debug"));
    tracing_subscriber::registry()
        .with(env_filter)
        .with(tracing_subscriber::fmt::layer().with_target(false))
        .try_init()?;

    let path = std::env::args().nth(1).context("usage: cdn_upload <image>")?;
    let token = std::env::var("IDEVISION_TOKEN").context("IDEVISION_TOKEN is not set")?;

    let image = std::fs::read(&path).with_context(|| format!("failed to read {path}"))?;
    let format = ImageFormat::sniff(&image).context("not a recognized image")?;
    println!("Uploading {path} as {format}");

    let client = Client::new(Some(&token))?;

    let upload = client.cdn_upload(image).await?;
    println!("✅ Uploaded: {} (node {}, slug {})", upload.url, upload.node, upload.slug);

    let stats = client.get_upload_stats(&upload.node, &upload.slug).await?;
    println!(
        "   {} bytes, {} views, uploaded {} by {}",
        stats.size, stats.views, stats.timestamp, stats.author
    );

    let totals = client.cdn_stats().await?;
    println!(
        "   CDN totals: {} uploads, {} today",
        totals.upload_count, totals.uploaded_today
    );

    let confirmation = client.delete_upload(&upload.node, &upload.slug).await?;
    println!("🗑  {confirmation}");

    client.close();
    Ok(())
}
