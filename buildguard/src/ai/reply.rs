//! Arbiter reply parsing
//!
//! The first non-empty line carries the compatibility marker. Issues and
//! warnings follow under their headings as hyphen-prefixed items.

use serde::{Deserialize, Serialize};

use crate::ai::AIError;

const INCOMPATIBLE_MARKERS: &[&str] = &["❌", "호환 안됨", "호환안됨", "INCOMPATIBLE", "NOT COMPATIBLE"];
const COMPATIBLE_MARKERS: &[&str] = &["✅", "호환됨", "COMPATIBLE"];

const ISSUE_HEADINGS: &[&str] = &["문제점", "issues", "issue"];
const WARNING_HEADINGS: &[&str] = &["경고사항", "warnings", "warning"];
const EMPTY_ITEMS: &[&str] = &["없음", "none", "n/a"];

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ArbiterReply {
    pub compatible: bool,
    pub issues: Vec<String>,
    pub warnings: Vec<String>,
}

#[derive(Clone, Copy, PartialEq)]
enum Section {
    Issues,
    Warnings,
}

pub fn parse_reply(text: &str) -> Result<ArbiterReply, AIError> {
    let first_line = text
        .lines()
        .map(str::trim)
        .find(|l| !l.is_empty())
        .ok_or_else(|| AIError::MalformedReply("empty reply".to_string()))?;

    let compatible = marker_in(first_line)
        .ok_or_else(|| AIError::MalformedReply(truncate(first_line, 80)))?;

    let mut reply = ArbiterReply {
        compatible,
        issues: Vec::new(),
        warnings: Vec::new(),
    };

    let mut section: Option<Section> = None;
    let mut seen_item = false;

    for line in text.lines().skip_while(|l| l.trim().is_empty()).skip(1) {
        let trimmed = line.trim();

        if trimmed.is_empty() {
            // A blank line closes a section once it has items
            if seen_item {
                section = None;
                seen_item = false;
            }
            continue;
        }

        if let Some((heading, inline)) = heading_in(trimmed) {
            section = Some(heading);
            seen_item = false;
            if let Some(item) = inline {
                push_item(&mut reply, heading, item);
                seen_item = true;
            }
            continue;
        }

        let Some(current) = section else { continue };
        if let Some(item) = trimmed.strip_prefix('-').or_else(|| trimmed.strip_prefix('•')) {
            push_item(&mut reply, current, item);
            seen_item = true;
        }
    }

    Ok(reply)
}

/// `Some(false)` for an incompatible marker, `Some(true)` for a compatible one
fn marker_in(line: &str) -> Option<bool> {
    let upper = line.to_uppercase();
    if INCOMPATIBLE_MARKERS.iter().any(|m| upper.contains(m)) {
        Some(false)
    } else if COMPATIBLE_MARKERS.iter().any(|m| upper.contains(m)) {
        Some(true)
    } else {
        None
    }
}

/// Heading lines look like `Issues:`, `**문제점:**`, `## Warnings` or `Issues: none`
fn heading_in(line: &str) -> Option<(Section, Option<&str>)> {
    let stripped = line.trim_start_matches(|c: char| c == '#' || c == '*' || c.is_whitespace());
    let (name, rest) = match stripped.find([':', '：']) {
        Some(idx) => {
            let sep_len = stripped[idx..].chars().next().map_or(1, char::len_utf8);
            (&stripped[..idx], Some(&stripped[idx + sep_len..]))
        }
        None => (stripped, None),
    };
    let name = name.trim_end_matches(|c: char| c == '*' || c.is_whitespace());

    let section = if ISSUE_HEADINGS.iter().any(|h| name.eq_ignore_ascii_case(h)) {
        Section::Issues
    } else if WARNING_HEADINGS.iter().any(|h| name.eq_ignore_ascii_case(h)) {
        Section::Warnings
    } else {
        return None;
    };

    let inline = rest
        .map(|r| r.trim_matches(|c: char| c == '*' || c.is_whitespace()))
        .filter(|r| !r.is_empty());
    Some((section, inline))
}

fn push_item(reply: &mut ArbiterReply, section: Section, raw: &str) {
    let item = raw.trim();
    if item.is_empty() || EMPTY_ITEMS.iter().any(|e| item.eq_ignore_ascii_case(e)) {
        return;
    }
    match section {
        Section::Issues => reply.issues.push(item.to_string()),
        Section::Warnings => reply.warnings.push(item.to_string()),
    }
}

fn truncate(text: &str, max_chars: usize) -> String {
    text.chars().take(max_chars).collect()
}
