// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
use anyhow::Result;
use clap::Parser;
use image_analyzer::{
    api::{start_server, AppState},
    config::{prepare_environment, ServerArgs},
    pipeline::Analyzer,
};

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env before the tracing subscriber reads RUST_LOG
    prepare_environment(None, "info");
    tracing_subscriber::fmt::init();

    println!("🖼️  Starting Image Analyzer v{}...\n", env!("CARGO_PKG_VERSION"));

    let (vision_config, server_config) = ServerArgs::parse().resolve()?;
    println!("🔗 Vision endpoint: {}", vision_config.endpoint);
    println!("⏱️  Request timeout: {}s", vision_config.timeout.as_secs());
    println!(
        "📦 Upload limit: {} MiB",
        server_config.max_upload_bytes / (1024 * 1024)
    );

    let analyzer = Analyzer::new(&vision_config)?;
    let state = AppState::new(analyzer, server_config.max_upload_bytes);

    println!("🌐 Serving on http://{}\n", server_config.listen_addr);
    start_server(state, &server_config).await?;

    println!("👋 Image Analyzer stopped");
    Ok(())
}
