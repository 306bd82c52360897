//! Source and Documentation Lookup Example
//!
//! Searches a library's source and its Sphinx docs for the same symbol.
//!
//! Run with: cargo run --example rtfs_lookup -- [config.json]

use devision_rs::{Client, Config, RtfsFormat};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("devision_rs=debug"));
    tracing_subscriber::registry()
        .with(env_filter)
        .with(tracing_subscriber::fmt::layer().with_target(false))
        .try_init()?;

    let config = match std::env::args().nth(1) {
        Some(path) => Config::load(&path)?,
        None => Config::default(),
    };
    let client = Client::with_config(config)?;
    println!("Using {}\n", client.base_url());

    let rtfs = client
        .lookup_source(Some("Client.connect"), "discord.py", RtfsFormat::Links)
        .await?;
    println!("🔍 Source for 'Client.connect' ({:.3}s):", rtfs.query_time);
    for (symbol, link) in &rtfs.nodes {
        println!("   {symbol}: {link}");
    }

    let rtfm = client
        .lookup_docs(Some("Client"), "https://discordpy.readthedocs.io/en/latest")
        .await?;
    println!("\n📚 Docs for 'Client' ({:.3}s):", rtfm.query_time);
    for (symbol, link) in &rtfm.nodes {
        println!("   {symbol}: {link}");
    }
    println!(
        "   (indexed {}, refreshed after {})",
        rtfm.cache_indexed, rtfm.cache_expires
    );

    let comic = client.lookup_xkcd("python").await?;
    println!("\n🖼  xkcd #{}: {} ({})", comic.num, comic.title, comic.url);

    client.close();
    Ok(())
}
