//! Wattage token extraction

/// Largest integer found in a power string.
///
/// Ranges and multi-value ratings resolve to their worst case:
/// `"125-159W"` → 159, `"PBP 65W / MTP 148W"` → 148. Values past `u32::MAX`
/// saturate.
pub fn parse_power_value(text: &str) -> Option<u32> {
    digit_runs(text)
        .into_iter()
        .map(|(_, run)| saturating_watts(&run))
        .max()
}

/// The wattage immediately preceding a watt marker (`850W`, `1000 W`, `750Watt`).
///
/// Bare numbers such as the "80" in "80PLUS" are not wattages.
pub fn parse_psu_wattage(text: &str) -> Option<u32> {
    for (end, run) in digit_runs(text) {
        let rest = text[end..].trim_start();
        let mut chars = rest.chars();
        if !matches!(chars.next(), Some('W' | 'w')) {
            continue;
        }
        let after = chars.next();
        let is_marker = match after {
            None => true,
            Some(c) if !c.is_alphabetic() => true,
            Some(_) => rest.to_uppercase().starts_with("WATT"),
        };
        if is_marker {
            return Some(saturating_watts(&run));
        }
    }
    None
}

/// A digit run only fails to parse by overflowing
fn saturating_watts(run: &str) -> u32 {
    run.parse::<u32>().unwrap_or(u32::MAX)
}

/// ASCII digit runs paired with the byte offset just past each run
fn digit_runs(text: &str) -> Vec<(usize, String)> {
    let mut runs = Vec::new();
    let mut current = String::new();
    for (idx, ch) in text.char_indices() {
        if ch.is_ascii_digit() {
            current.push(ch);
        } else if !current.is_empty() {
            runs.push((idx, std::mem::take(&mut current)));
        }
    }
    if !current.is_empty() {
        runs.push((text.len(), current));
    }
    runs
}
