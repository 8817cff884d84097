//! Pure parser for the free-form classifier response. No network, no state;
//! everything here is unit-testable with plain strings.

use crate::qualification::domain::IntentLevel;

const REASONING_TRUNCATE_CHARS: usize = 200;
const SENTENCE_FRAGMENT_MIN_CHARS: usize = 10;

/// Keyword families scanned when no explicit `Intent:` tag is present;
/// checked in this order, first family with a hit wins.
const HIGH_KEYWORDS: &[&str] = &["high", "strong", "excellent", "very likely"];
const MEDIUM_KEYWORDS: &[&str] = &["medium", "moderate", "some", "possible"];
const LOW_KEYWORDS: &[&str] = &["low", "weak", "poor", "unlikely"];

const CONFIDENT_MARKERS: &[&str] = &[
    "clearly",
    "definitely",
    "obviously",
    "certainly",
    "strong",
    "excellent",
    "perfect",
    "ideal",
    "exactly",
    "precisely",
];
const HEDGING_MARKERS: &[&str] = &[
    "might",
    "maybe",
    "possibly",
    "unclear",
    "limited",
    "insufficient",
    "uncertain",
    "difficult",
    "hard to determine",
];

/// Result of parsing a raw response. `Unparsed` means no intent signal was
/// found anywhere in the text; callers substitute the fallback analysis
/// instead of retrying the remote call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParseOutcome {
    Parsed {
        level: IntentLevel,
        reasoning: String,
    },
    Unparsed,
}

pub fn parse_response(raw: &str) -> ParseOutcome {
    let Some(level) = extract_level(raw) else {
        return ParseOutcome::Unparsed;
    };

    ParseOutcome::Parsed {
        level,
        reasoning: extract_reasoning(raw),
    }
}

fn extract_level(raw: &str) -> Option<IntentLevel> {
    if let Some(tagged) = tag_value(raw, "intent:") {
        if let Some(level) = leading_level(tagged) {
            return Some(level);
        }
    }

    let lower = raw.to_lowercase();
    for (keywords, level) in [
        (HIGH_KEYWORDS, IntentLevel::High),
        (MEDIUM_KEYWORDS, IntentLevel::Medium),
        (LOW_KEYWORDS, IntentLevel::Low),
    ] {
        if keywords.iter().any(|keyword| lower.contains(keyword)) {
            return Some(level);
        }
    }

    None
}

fn leading_level(value: &str) -> Option<IntentLevel> {
    let token = value
        .trim_start_matches(|c: char| !c.is_ascii_alphabetic())
        .to_ascii_lowercase();
    if token.starts_with("high") {
        Some(IntentLevel::High)
    } else if token.starts_with("medium") {
        Some(IntentLevel::Medium)
    } else if token.starts_with("low") {
        Some(IntentLevel::Low)
    } else {
        None
    }
}

fn extract_reasoning(raw: &str) -> String {
    if let Some(tagged) = tag_value(raw, "reasoning:") {
        let line = tagged.lines().next().unwrap_or(tagged).trim();
        if !line.is_empty() {
            return line.to_string();
        }
    }

    // No tag: use the last sentence-like fragment, then a raw truncation.
    if let Some(fragment) = raw
        .split(['.', '!', '?'])
        .map(str::trim)
        .filter(|fragment| fragment.len() > SENTENCE_FRAGMENT_MIN_CHARS)
        .last()
    {
        return fragment.to_string();
    }

    raw.chars().take(REASONING_TRUNCATE_CHARS).collect()
}

/// Case-insensitive tag search, returning the remainder of the text after
/// the first occurrence. ASCII lowercasing keeps byte offsets stable even
/// when the surrounding text is not ASCII.
fn tag_value<'a>(raw: &'a str, tag: &str) -> Option<&'a str> {
    let lower = raw.to_ascii_lowercase();
    lower.find(tag).map(|pos| raw[pos + tag.len()..].trim_start())
}

/// Heuristic hedging signal: 0.5 base, +0.1 per high-certainty marker
/// occurrence, -0.1 per hedging marker occurrence, clamped to [0, 1].
pub fn estimate_confidence(raw: &str) -> f32 {
    let lower = raw.to_lowercase();
    let confident: usize = CONFIDENT_MARKERS
        .iter()
        .map(|marker| lower.matches(marker).count())
        .sum();
    let hedging: usize = HEDGING_MARKERS
        .iter()
        .map(|marker| lower.matches(marker).count())
        .sum();

    (0.5 + 0.1 * confident as f32 - 0.1 * hedging as f32).clamp(0.0, 1.0)
}
