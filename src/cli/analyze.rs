// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
use anyhow::{Context, Result};
use clap::Args;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::info;

use crate::config::{VisionConfig, DEFAULT_TIMEOUT_SECS};
use crate::pipeline::{normalize_upload, AnalysisOutcome, Analyzer};
use crate::vision::{DescriptionView, Listing};

/// Arguments for the analyze command
#[derive(Args, Debug)]
pub struct AnalyzeArgs {
    /// Image file to analyze (jpg, jpeg or png)
    pub path: PathBuf,

    /// Print the full outcome as JSON
    #[arg(long)]
    pub json: bool,

    /// Computer Vision endpoint (can also be set via AZURE_VISION_ENDPOINT)
    #[arg(long, env = "AZURE_VISION_ENDPOINT")]
    pub endpoint: Option<String>,

    /// Subscription key (can also be set via AZURE_VISION_API_KEY)
    #[arg(long, env = "AZURE_VISION_API_KEY", hide_env_values = true)]
    pub api_key: Option<String>,

    /// Timeout of the analyze call, in seconds
    #[arg(long, default_value_t = DEFAULT_TIMEOUT_SECS)]
    pub timeout_secs: u64,
}

/// Arguments for the normalize command
#[derive(Args, Debug)]
pub struct NormalizeArgs {
    /// Image file to normalize
    pub path: PathBuf,

    /// Where to write the JPEG
    #[arg(long, short)]
    pub output: PathBuf,
}

/// Analyze a local image file
pub async fn analyze_file(args: AnalyzeArgs) -> Result<()> {
    let config = VisionConfig::from_parts(
        args.endpoint,
        args.api_key,
        Duration::from_secs(args.timeout_secs),
    )?;
    let analyzer = Analyzer::new(&config)?;

    let bytes = tokio::fs::read(&args.path)
        .await
        .with_context(|| format!("Failed to read {}", args.path.display()))?;
    let file_name = file_name_of(&args.path);

    if !args.json {
        println!("🔍 Analyzing {}...", args.path.display());
    }
    let outcome = analyzer.analyze(&file_name, bytes).await?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&outcome)?);
    } else {
        println!("{}", format_outcome(&outcome));
    }

    Ok(())
}

/// Normalize a local image file without contacting the service
pub async fn normalize_file(args: NormalizeArgs) -> Result<()> {
    let bytes = tokio::fs::read(&args.path)
        .await
        .with_context(|| format!("Failed to read {}", args.path.display()))?;

    let normalized = normalize_upload(bytes).await?;
    let info = normalized.info().clone();
    let jpeg = normalized.into_bytes();

    tokio::fs::write(&args.output, &jpeg)
        .await
        .with_context(|| format!("Failed to write {}", args.output.display()))?;

    info!(
        "Normalized {} ({}x{}) to {}",
        args.path.display(),
        info.width,
        info.height,
        args.output.display()
    );
    println!(
        "✅ Wrote {} bytes of JPEG to {}",
        jpeg.len(),
        args.output.display()
    );
    Ok(())
}

fn file_name_of(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().to_string())
        .unwrap_or_default()
}

/// Plain-text rendering of an outcome for the terminal
pub fn format_outcome(outcome: &AnalysisOutcome) -> String {
    let summary = &outcome.summary;
    let mut lines = Vec::new();

    lines.push("📄 Image Description".to_string());
    match &summary.description {
        DescriptionView::Described { caption, narrative } => {
            lines.push(format!("  {} (Confidence: {})", caption.text, caption.confidence));
            lines.push(String::new());
            lines.push("🗒️  Summary".to_string());
            lines.push(format!("  {}", narrative));
        }
        DescriptionView::NoDescription => lines.push("  No description detected".to_string()),
    }

    lines.push(String::new());
    lines.push("🎯 Detected Objects".to_string());
    match &summary.objects {
        Listing::Detected(cards) => {
            for card in cards {
                lines.push(format!("  {} ({})", card.label, card.confidence));
            }
        }
        Listing::NoneDetected => lines.push("  No objects detected".to_string()),
    }

    lines.push(String::new());
    lines.push("🏷️  Image Tags".to_string());
    match &summary.tags {
        Listing::Detected(chips) => {
            let tags: Vec<String> = chips
                .iter()
                .map(|chip| format!("{} ({})", chip.name, chip.confidence))
                .collect();
            lines.push(format!("  {}", tags.join(", ")));
        }
        Listing::NoneDetected => lines.push("  No tags detected".to_string()),
    }

    lines.join("\n")
}
