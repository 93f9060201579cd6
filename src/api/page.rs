// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Server-rendered upload form and result page
//!
//! Every piece of text that comes from the user or the vision service goes
//! through [`escape`] before it reaches the markup.

use base64::{engine::general_purpose::STANDARD, Engine as _};
use image::ImageFormat;
use std::fmt::Write as _;

use crate::api::errors::ApiError;
use crate::pipeline::AnalysisOutcome;
use crate::vision::{detect_format, DescriptionView, Listing, ObjectCard, TagChip};

const STYLE: &str = r#"
body { background-color:#0b1220; color:#e5e7eb; font-family:system-ui,sans-serif; margin:0; }
.block-container { max-width:900px; margin:0 auto; padding:2rem 1rem; }
.header { text-align:center; margin-bottom:2.5rem; }
.header h1 { font-size:2.4rem; margin-bottom:0.2rem; }
.header p { color:#9ca3af; font-size:1rem; }
.section { margin-top:2.2rem; }
.card { background:#111827; border:1px solid #1f2937; border-radius:14px; padding:1.2rem; }
.image-box { display:flex; justify-content:center; margin-top:1.2rem; }
.image-box img { width:520px; max-width:100%; border-radius:10px; }
.tag { display:inline-block; padding:6px 14px; border-radius:999px; background:#0f172a;
       border:1px solid #334155; margin:4px; font-size:0.9rem; color:#e5e7eb; }
.objects { display:grid; grid-template-columns:1fr 1fr; column-gap:0.8rem; }
.object-card { background:#0f172a; border:1px solid #334155; border-radius:12px;
               padding:0.9rem; margin-bottom:0.8rem; }
.warning { background:#3b2f0b; border:1px solid #854d0e; border-radius:10px; padding:0.8rem; color:#fde68a; }
.error { background:#3b0b0b; border:1px solid #991b1b; border-radius:10px; padding:0.8rem;
         color:#fecaca; white-space:pre-wrap; word-break:break-word; }
.summary { color:#e5e7eb; line-height:1.6; }
pre { background:#111827; border:1px solid #1f2937; border-radius:10px; padding:1rem; overflow:auto; }
small { color:#9ca3af; }
hr { border:0; border-top:1px solid #1f2937; margin:3rem 0; }
footer { text-align:center; color:#6b7280; font-size:0.85rem; }
"#;

/// What the result page shows for one submission
pub struct ResultPage<'a> {
    pub file_name: &'a str,
    /// `data:` URL of the upload, when it could be previewed
    pub preview: Option<String>,
    pub result: Result<&'a AnalysisOutcome, &'a ApiError>,
}

/// Escape text for inclusion in HTML
pub fn escape(text: &str) -> String {
    ammonia::clean_text(text)
}

/// Build a `data:` URL for previewing an upload in the page.
///
/// Returns `None` for bytes that are not a recognizable image.
pub fn preview_data_url(bytes: &[u8]) -> Option<String> {
    let mime = match detect_format(bytes).ok()? {
        ImageFormat::Png => "image/png",
        ImageFormat::Jpeg => "image/jpeg",
        ImageFormat::Gif => "image/gif",
        ImageFormat::WebP => "image/webp",
        ImageFormat::Bmp => "image/bmp",
        _ => return None,
    };
    Some(format!("data:{};base64,{}", mime, STANDARD.encode(bytes)))
}

/// The empty upload form
pub fn render_index() -> String {
    layout("")
}

/// The upload form followed by the analysis of one submission
pub fn render_result(page: &ResultPage<'_>) -> String {
    let mut body = String::new();

    if let Some(preview) = &page.preview {
        let _ = write!(
            body,
            r#"<div class="image-box"><img src="{}" alt="{}"></div>"#,
            preview,
            escape(page.file_name)
        );
    }

    match page.result {
        Ok(outcome) => {
            body.push_str(&render_description(&outcome.summary.description));
            body.push_str(&render_objects(&outcome.summary.objects));
            body.push_str(&render_tags(&outcome.summary.tags));
            body.push_str(&render_raw(&outcome.raw));
        }
        Err(err) => {
            let _ = write!(
                body,
                r#"<div class="section"><div class="error">{}</div></div>"#,
                escape(&err.message())
            );
        }
    }

    layout(&body)
}

fn layout(results: &str) -> String {
    format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
<meta charset="utf-8">
<meta name="viewport" content="width=device-width, initial-scale=1">
<title>Image Analyzer</title>
<style>{style}</style>
</head>
<body>
<div class="block-container">
<div class="header">
    <h1>🖼️ Image Analyzer</h1>
    <p>Analyze images using Azure Computer Vision</p>
</div>
<h2>Upload Image</h2>
<form action="/analyze" method="post" enctype="multipart/form-data">
    <label for="image">Select an image file (JPG / PNG)</label><br>
    <input id="image" name="image" type="file" accept=".jpg,.jpeg,.png" required>
    <button type="submit">🔍 Analyze Image</button>
</form>
{results}
<hr>
<footer>Powered by Azure Computer Vision • AI results are probabilistic</footer>
</div>
</body>
</html>
"#,
        style = STYLE,
        results = results
    )
}

fn warning(text: &str) -> String {
    format!(r#"<div class="warning">{}</div>"#, escape(text))
}

fn render_description(description: &DescriptionView) -> String {
    let content = match description {
        DescriptionView::Described { caption, narrative } => format!(
            r#"<div class="card">
    <h3>{}</h3>
    <small>Confidence: {}</small>
</div>
<h4>🗒️ Summary (within 100 words)</h4>
<p class="summary">{}</p>"#,
            escape(&caption.text),
            escape(&caption.confidence),
            escape(narrative)
        ),
        DescriptionView::NoDescription => warning("No description detected"),
    };
    format!(
        r#"<div class="section"><h2>📄 Image Description</h2>{}</div>"#,
        content
    )
}

fn render_objects(objects: &Listing<ObjectCard>) -> String {
    let content = match objects {
        Listing::Detected(cards) => {
            let mut grid = String::from(r#"<div class="objects">"#);
            for card in cards {
                let _ = write!(
                    grid,
                    r#"<div class="object-card"><strong>{}</strong><br><small>Confidence: {}</small></div>"#,
                    escape(&card.label),
                    escape(&card.confidence)
                );
            }
            grid.push_str("</div>");
            grid
        }
        Listing::NoneDetected => warning("No objects detected"),
    };
    format!(
        r#"<div class="section"><h2>🎯 Detected Objects</h2>{}</div>"#,
        content
    )
}

fn render_tags(tags: &Listing<TagChip>) -> String {
    let content = match tags {
        Listing::Detected(chips) => chips
            .iter()
            .map(|chip| {
                format!(
                    r#"<span class="tag">{} ({})</span>"#,
                    escape(&chip.name),
                    escape(&chip.confidence)
                )
            })
            .collect::<Vec<_>>()
            .join("\n"),
        Listing::NoneDetected => warning("No tags detected"),
    };
    format!(
        r#"<div class="section"><h2>🏷️ Image Tags</h2>{}</div>"#,
        content
    )
}

fn render_raw(raw: &serde_json::Value) -> String {
    let pretty = serde_json::to_string_pretty(raw).unwrap_or_else(|_| raw.to_string());
    format!(
        r#"<div class="section"><details><summary>📄 Raw API Response</summary><pre>{}</pre></details></div>"#,
        escape(&pretty)
    )
}
