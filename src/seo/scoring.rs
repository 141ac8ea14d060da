//! SEO score computation.

use serde::{Deserialize, Serialize};

use crate::parse::{Content, Headings, ImageInventory, LinkInventory, Metadata};
use crate::utils::char_len;

const TITLE_MIN_CHARS: usize = 30;
const TITLE_MAX_CHARS: usize = 60;
const DESCRIPTION_MIN_CHARS: usize = 120;
const DESCRIPTION_MAX_CHARS: usize = 160;
const CONTENT_MIN_CHARS: usize = 300;
const INTERNAL_LINKS_THRESHOLD: usize = 3;

const TITLE_POINTS: i64 = 25;
const DESCRIPTION_POINTS: i64 = 25;
const SINGLE_H1_POINTS: i64 = 20;
const CONTENT_POINTS: i64 = 15;
const MISSING_ALT_PENALTY: i64 = 10;
const FEW_INTERNAL_LINKS_POINTS: i64 = 5;

/// Letter grade derived from the clamped score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[allow(missing_docs)]
pub enum Grade {
    A,
    B,
    C,
    D,
    F,
}

impl Grade {
    /// Maps a score to a grade: 80+ A, 70+ B, 60+ C, 50+ D, otherwise F.
    pub fn from_score(score: u32) -> Self {
        match score {
            80.. => Grade::A,
            70..=79 => Grade::B,
            60..=69 => Grade::C,
            50..=59 => Grade::D,
            _ => Grade::F,
        }
    }

    /// Returns the grade letter.
    pub fn as_str(&self) -> &'static str {
        match self {
            Grade::A => "A",
            Grade::B => "B",
            Grade::C => "C",
            Grade::D => "D",
            Grade::F => "F",
        }
    }
}

impl std::fmt::Display for Grade {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Outcome of scoring a page.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SeoReport {
    /// Score clamped at zero. There is no upper clamp.
    pub score: u32,
    /// Grade for `score`.
    pub grade: Grade,
    /// Problems found, in rule order.
    pub issues: Vec<String>,
    /// Suggested fixes, in rule order.
    pub recommendations: Vec<String>,
}

/// Scores a page from its extraction results.
///
/// Each rule applies independently. Lengths are measured in characters of the
/// trimmed value; content length is the un-truncated cleaned text length.
/// Fewer than three internal links *adds* five points alongside the
/// recommendation; callers comparing scores across tools should expect it.
pub fn score_page(
    metadata: &Metadata,
    content: &Content,
    headings: Option<&Headings>,
    images: Option<&ImageInventory>,
    links: Option<&LinkInventory>,
) -> SeoReport {
    let mut score: i64 = 0;
    let mut issues = Vec::new();
    let mut recommendations = Vec::new();

    let title_len = char_len(metadata.title.trim());
    if title_len == 0 {
        issues.push("Missing page title".to_string());
    } else if title_len < TITLE_MIN_CHARS {
        issues.push("Title too short (should be 30-60 characters)".to_string());
        recommendations.push("Expand title to 30-60 characters for better SEO".to_string());
    } else if title_len > TITLE_MAX_CHARS {
        issues.push("Title too long (should be 30-60 characters)".to_string());
        recommendations.push("Shorten title to under 60 characters".to_string());
    } else {
        score += TITLE_POINTS;
    }

    let description_len = metadata
        .description
        .as_deref()
        .map(|d| char_len(d.trim()))
        .unwrap_or(0);
    if description_len == 0 {
        issues.push("Missing meta description".to_string());
        recommendations.push("Add meta description (120-160 characters)".to_string());
    } else if description_len < DESCRIPTION_MIN_CHARS {
        issues.push("Meta description too short".to_string());
        recommendations.push("Expand meta description to 120-160 characters".to_string());
    } else if description_len > DESCRIPTION_MAX_CHARS {
        issues.push("Meta description too long".to_string());
        recommendations.push("Shorten meta description to under 160 characters".to_string());
    } else {
        score += DESCRIPTION_POINTS;
    }

    match headings.map(|h| h.h1.len()).unwrap_or(0) {
        0 => {
            issues.push("Missing H1 tag".to_string());
            recommendations.push("Add an H1 tag with your main keyword".to_string());
        }
        1 => score += SINGLE_H1_POINTS,
        _ => {
            issues.push("Multiple H1 tags found".to_string());
            recommendations.push("Use only one H1 tag per page".to_string());
        }
    }

    if content.length < CONTENT_MIN_CHARS {
        issues.push("Content too short for good SEO".to_string());
        recommendations.push("Add more content (aim for 300+ characters)".to_string());
    } else {
        score += CONTENT_POINTS;
    }

    if images.map(|i| i.without_alt).unwrap_or(0) > 0 {
        score -= MISSING_ALT_PENALTY;
        recommendations.push("Add descriptive alt text to all images".to_string());
    }

    if links.map(|l| l.total_internal).unwrap_or(0) < INTERNAL_LINKS_THRESHOLD {
        score += FEW_INTERNAL_LINKS_POINTS;
        recommendations.push("Add more internal links to improve site structure".to_string());
    }

    let score = u32::try_from(score.max(0)).unwrap_or(u32::MAX);
    SeoReport {
        score,
        grade: Grade::from_score(score),
        issues,
        recommendations,
    }
}
