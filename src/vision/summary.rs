// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Summary derived from an analysis result
//!
//! The summary is plain data. Rendering it (HTML page, CLI output, JSON) is
//! left to the caller.

use serde::Serialize;

use super::analysis::AnalysisResult;

/// Number of objects and tags mentioned in the narrative paragraph
pub const NARRATIVE_ITEM_LIMIT: usize = 5;

/// Maximum number of words in the narrative paragraph
pub const NARRATIVE_WORD_LIMIT: usize = 100;

const TRUNCATION_MARKER: &str = "...";

/// The primary caption with its rendered confidence
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CaptionView {
    pub text: String,
    /// e.g. "91.0%"
    pub confidence: String,
}

/// Description state of a summary
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum DescriptionView {
    Described {
        caption: CaptionView,
        narrative: String,
    },
    NoDescription,
}

/// One detected object, ready for display
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ObjectCard {
    /// Title-cased label
    pub label: String,
    /// e.g. "95.0%"
    pub confidence: String,
}

/// One tag, ready for display
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TagChip {
    pub name: String,
    /// e.g. "99%"
    pub confidence: String,
}

/// A listing that is either populated or explicitly empty
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "status", content = "items", rename_all = "snake_case")]
pub enum Listing<T> {
    Detected(Vec<T>),
    NoneDetected,
}

impl<T> Listing<T> {
    fn from_vec(items: Vec<T>) -> Self {
        if items.is_empty() {
            Listing::NoneDetected
        } else {
            Listing::Detected(items)
        }
    }

    /// Items of the listing, empty for `NoneDetected`
    pub fn items(&self) -> &[T] {
        match self {
            Listing::Detected(items) => items,
            Listing::NoneDetected => &[],
        }
    }
}

/// Human-readable summary of one analysis
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Summary {
    pub description: DescriptionView,
    pub objects: Listing<ObjectCard>,
    pub tags: Listing<TagChip>,
}

/// Derive a summary from an analysis result.
///
/// Only the first caption is used. The narrative mentions at most the first
/// five objects and tags in API order, while the listings keep every entry.
pub fn summarize(result: &AnalysisResult) -> Summary {
    let description = match result.captions().first() {
        None => DescriptionView::NoDescription,
        Some(caption) => {
            let objects: Vec<&str> = result
                .objects()
                .iter()
                .take(NARRATIVE_ITEM_LIMIT)
                .map(|o| o.label.as_str())
                .collect();
            let tags: Vec<&str> = result
                .tags()
                .iter()
                .take(NARRATIVE_ITEM_LIMIT)
                .map(|t| t.name.as_str())
                .collect();

            DescriptionView::Described {
                caption: CaptionView {
                    text: caption.text.clone(),
                    confidence: percent_one_decimal(caption.confidence),
                },
                narrative: build_narrative(&caption.text, &objects, &tags),
            }
        }
    };

    let objects = result
        .objects()
        .iter()
        .map(|o| ObjectCard {
            label: title_case(&o.label),
            confidence: percent_one_decimal(o.confidence),
        })
        .collect();

    let tags = result
        .tags()
        .iter()
        .map(|t| TagChip {
            name: t.name.clone(),
            confidence: percent_whole(t.confidence),
        })
        .collect();

    Summary {
        description,
        objects: Listing::from_vec(objects),
        tags: Listing::from_vec(tags),
    }
}

/// Build the word-capped narrative paragraph
pub fn build_narrative(caption: &str, objects: &[&str], tags: &[&str]) -> String {
    let mut details = Vec::new();
    if !objects.is_empty() {
        details.push(format!("It seems to show {}", objects.join(", ")));
    }
    if !tags.is_empty() {
        details.push(format!("The scene relates to {}", tags.join(", ")));
    }

    let mut paragraph = format!("The AI thinks this image is about {}.", caption);
    if !details.is_empty() {
        paragraph.push(' ');
        paragraph.push_str(&details.join(". "));
        paragraph.push('.');
    }

    cap_words(paragraph.trim(), NARRATIVE_WORD_LIMIT)
}

/// Keep at most `limit` whitespace-separated words, marking any cut with "..."
pub fn cap_words(text: &str, limit: usize) -> String {
    let words: Vec<&str> = text.split_whitespace().collect();
    if words.len() <= limit {
        return text.to_string();
    }
    let mut capped = words[..limit].join(" ");
    capped.push_str(TRUNCATION_MARKER);
    capped
}

/// Render a fraction as a percentage with one decimal ("87.3%")
pub fn percent_one_decimal(fraction: f64) -> String {
    format!("{:.1}%", fraction * 100.0)
}

/// Render a fraction as a whole percentage ("87%")
pub fn percent_whole(fraction: f64) -> String {
    format!("{:.0}%", fraction * 100.0)
}

/// Upper-case the first letter of every alphabetic run, lower-case the rest
pub fn title_case(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut in_word = false;
    for c in text.chars() {
        if c.is_alphabetic() {
            if in_word {
                out.extend(c.to_lowercase());
            } else {
                out.extend(c.to_uppercase());
            }
            in_word = true;
        } else {
            out.push(c);
            in_word = false;
        }
    }
    out
}
