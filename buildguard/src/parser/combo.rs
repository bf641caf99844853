//! Combo Normalizer
//!
//! Turns either a structured category → record mapping or a semi-structured
//! quote text into a canonical [`Combo`]. Text scanning favors precision: a
//! line is only taken when its label is a known category marker.

use std::collections::BTreeMap;

use crate::catalog::Catalog;
use crate::parser::attributes::{decode_attributes, scalar_to_string};
use crate::parser::schema::{Category, Combo, ComboInput, ComponentRecord, RawRecord};

/// A combo needs at least this many distinct categories to be evaluated
pub const MIN_CATEGORIES: usize = 3;

/// Horizontal rule separating candidate combinations in one text
pub const CANDIDATE_SEPARATOR: &str = "━━━━━━━━━━━━━━━━━━━━";

/// Candidate fragments shorter than this (in characters) are noise
const MIN_CANDIDATE_CHARS: usize = 30;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error(
    "Component information is incomplete or could not be parsed: recognized {recovered} of the required {} categories",
    MIN_CATEGORIES
)]
pub struct NormalizationError {
    pub recovered: usize,
}

/// Normalizes combo input against a catalog's category markers
pub struct ComboNormalizer<'a> {
    catalog: &'a Catalog,
}

impl<'a> ComboNormalizer<'a> {
    pub fn new(catalog: &'a Catalog) -> Self {
        Self { catalog }
    }

    /// Single entry point for both input shapes
    pub fn normalize(&self, input: &ComboInput) -> Result<Combo, NormalizationError> {
        let combo = match input {
            ComboInput::Structured(records) => self.normalize_structured(records),
            ComboInput::FreeText(text) => self.normalize_text(text),
        };

        if combo.len() < MIN_CATEGORIES {
            tracing::debug!("Normalization recovered only {} categories", combo.len());
            return Err(NormalizationError {
                recovered: combo.len(),
            });
        }
        Ok(combo)
    }

    /// Accept structured records as-is after validating their names
    pub fn normalize_structured(&self, records: &BTreeMap<String, RawRecord>) -> Combo {
        let mut combo = Combo::new();

        for (key, raw) in records {
            let Some(category) = self.resolve_key(key) else {
                tracing::warn!("Ignoring record with unknown category key {:?}", key);
                continue;
            };

            let name = raw.name.trim();
            if name.is_empty() {
                tracing::warn!("Ignoring {} record with an empty name", category);
                continue;
            }

            let mut attributes = decode_attributes(raw.attributes.as_ref());
            for (k, v) in &raw.extra {
                if let Some(text) = scalar_to_string(v) {
                    attributes.entry(k.clone()).or_insert(text);
                }
            }

            combo.insert(ComponentRecord {
                category,
                name: name.to_string(),
                price: raw.price.as_ref().and_then(price_from_value),
                attributes,
            });
        }

        combo
    }

    /// Scan quote text line by line; unrecognized lines are ignored
    pub fn normalize_text(&self, text: &str) -> Combo {
        let mut combo = Combo::new();
        for line in text.lines() {
            if let Some(record) = self.parse_line(line) {
                tracing::debug!("Recognized {}: {}", record.category, record.name);
                combo.insert(record);
            }
        }
        combo
    }

    /// Parse one `marker: name (price)` line
    pub fn parse_line(&self, line: &str) -> Option<ComponentRecord> {
        let line = line
            .trim()
            .trim_start_matches(|c: char| !c.is_alphanumeric());

        let sep = line.find([':', '：'])?;
        let label = line[..sep].trim_end_matches(|c: char| !c.is_alphanumeric());
        let category = self.catalog.category_for_label(label)?;

        let sep_len = line[sep..].chars().next().map_or(1, char::len_utf8);
        let value = line[sep + sep_len..].trim();
        let (name, price) = strip_price(value);
        if name.is_empty() {
            return None;
        }

        let mut record = ComponentRecord::new(category, name);
        record.price = price;
        Some(record)
    }

    fn resolve_key(&self, key: &str) -> Option<Category> {
        self.catalog.category_for_label(key).or_else(|| {
            serde_json::from_value::<Category>(serde_json::Value::String(
                key.trim().to_lowercase(),
            ))
            .ok()
        })
    }
}

/// Split a trailing parenthetical price off a product name.
///
/// Parentheses that do not hold a price ("(B650M)", "(정품)") are kept.
pub fn strip_price(value: &str) -> (String, Option<u64>) {
    let value = value.trim();
    if value.ends_with(')') {
        if let Some(open) = value.rfind('(') {
            let inner = &value[open + 1..value.len() - 1];
            if let Some(price) = parse_price(inner) {
                return (value[..open].trim().to_string(), Some(price));
            }
        }
    }
    (value.to_string(), None)
}

/// Parse "189,000원", "45만원", "₩79,000", "$329.99", "129000 KRW".
/// A currency marker is required.
pub fn parse_price(text: &str) -> Option<u64> {
    let mut body = text.trim().to_string();
    let mut has_currency = false;

    for prefix in ["$", "₩", "￦"] {
        if let Some(rest) = body.strip_prefix(prefix) {
            body = rest.trim().to_string();
            has_currency = true;
        }
    }
    for suffix in ["원", "won", "krw"] {
        if let Some(rest) = strip_suffix_ignore_ascii_case(&body, suffix) {
            body = rest.trim().to_string();
            has_currency = true;
            break;
        }
    }
    if !has_currency {
        return None;
    }

    let mut multiplier = 1.0;
    if let Some(rest) = body.strip_suffix('만') {
        body = rest.trim().to_string();
        multiplier = 10_000.0;
    }

    let digits: String = body.chars().filter(|c| !matches!(c, ',' | ' ')).collect();
    if digits.is_empty() || !digits.chars().all(|c| c.is_ascii_digit() || c == '.') {
        return None;
    }
    let amount = digits.parse::<f64>().ok()?;
    Some((amount * multiplier).round() as u64)
}

fn strip_suffix_ignore_ascii_case<'a>(text: &'a str, suffix: &str) -> Option<&'a str> {
    let cut = text.len().checked_sub(suffix.len())?;
    if !text.is_char_boundary(cut) || !text[cut..].eq_ignore_ascii_case(suffix) {
        return None;
    }
    Some(&text[..cut])
}

fn price_from_value(value: &serde_json::Value) -> Option<u64> {
    match value {
        serde_json::Value::Number(n) => n
            .as_u64()
            .or_else(|| n.as_f64().filter(|f| *f >= 0.0).map(|f| f.round() as u64)),
        serde_json::Value::String(s) => parse_price(s).or_else(|| {
            let digits: String = s.chars().filter(|c| *c != ',').collect();
            digits.trim().parse::<u64>().ok()
        }),
        _ => None,
    }
}

/// Split a text holding several candidate combinations.
///
/// Candidates are separated by [`CANDIDATE_SEPARATOR`] or start at a
/// "조합 N" / "Combo N" heading line. Short fragments are dropped.
pub fn split_candidates(text: &str) -> Vec<String> {
    let mut candidates = Vec::new();

    for block in text.split(CANDIDATE_SEPARATOR) {
        let mut current = String::new();
        for line in block.lines() {
            if is_candidate_heading(line) && !current.trim().is_empty() {
                candidates.push(std::mem::take(&mut current));
            }
            current.push_str(line);
            current.push('\n');
        }
        candidates.push(current);
    }

    candidates
        .into_iter()
        .map(|c| c.trim().to_string())
        .filter(|c| c.chars().count() >= MIN_CANDIDATE_CHARS)
        .collect()
}

fn is_candidate_heading(line: &str) -> bool {
    let line = line.trim_start_matches(|c: char| c.is_whitespace() || matches!(c, '#' | '*'));
    let rest = if let Some(rest) = line.strip_prefix("조합") {
        rest
    } else if line.get(..5).map_or(false, |head| head.eq_ignore_ascii_case("combo")) {
        &line[5..]
    } else {
        return false;
    };
    rest.trim_start()
        .chars()
        .next()
        .map_or(false, |c| c.is_ascii_digit())
}
