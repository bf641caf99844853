//! Attribute map decoding
//!
//! Upstream records carry their detail map either as a JSON object or as a
//! string. Strings are tried as JSON first, then as a Python-style dict
//! literal (`{'PPT': '162W', 'cores': 8}`), which is what the scraped
//! product database emits. Anything else decodes to an empty map.

use serde_json::Value;
use std::collections::BTreeMap;

/// Decode an attributes field. Malformed input yields an empty map.
pub fn decode_attributes(value: Option<&Value>) -> BTreeMap<String, String> {
    match value {
        Some(Value::Object(map)) => map
            .iter()
            .filter_map(|(k, v)| scalar_to_string(v).map(|s| (k.clone(), s)))
            .collect(),
        Some(Value::String(encoded)) => decode_encoded(encoded).unwrap_or_else(|| {
            tracing::debug!("Attribute string could not be decoded; treating as empty");
            BTreeMap::new()
        }),
        _ => BTreeMap::new(),
    }
}

/// Decode an encoded attribute string; `None` when it is not a flat mapping.
pub fn decode_encoded(encoded: &str) -> Option<BTreeMap<String, String>> {
    let trimmed = encoded.trim();
    if trimmed.is_empty() {
        return Some(BTreeMap::new());
    }

    if let Ok(Value::Object(map)) = serde_json::from_str::<Value>(trimmed) {
        return Some(
            map.iter()
                .filter_map(|(k, v)| scalar_to_string(v).map(|s| (k.clone(), s)))
                .collect(),
        );
    }

    DictLiteral::new(trimmed).parse()
}

/// Render a JSON scalar as attribute text. Nulls are dropped.
pub fn scalar_to_string(value: &Value) -> Option<String> {
    match value {
        Value::Null => None,
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        other => Some(other.to_string()),
    }
}

/// Minimal parser for a flat `{key: value, ...}` literal with quoted or bare
/// scalars. Nested containers are rejected.
struct DictLiteral<'a> {
    chars: std::iter::Peekable<std::str::Chars<'a>>,
}

impl<'a> DictLiteral<'a> {
    fn new(text: &'a str) -> Self {
        Self {
            chars: text.chars().peekable(),
        }
    }

    fn parse(mut self) -> Option<BTreeMap<String, String>> {
        let mut map = BTreeMap::new();
        self.skip_ws();
        if self.chars.next()? != '{' {
            return None;
        }

        loop {
            self.skip_ws();
            if *self.chars.peek()? == '}' {
                self.chars.next();
                break;
            }

            let key = self.scalar()?;
            self.skip_ws();
            if self.chars.next()? != ':' {
                return None;
            }
            self.skip_ws();
            let value = self.scalar()?;
            if value != "None" {
                map.insert(key, value);
            }

            self.skip_ws();
            match self.chars.next()? {
                ',' => continue,
                '}' => break,
                _ => return None,
            }
        }

        self.skip_ws();
        if self.chars.next().is_some() {
            return None;
        }
        Some(map)
    }

    fn skip_ws(&mut self) {
        while matches!(self.chars.peek(), Some(c) if c.is_whitespace()) {
            self.chars.next();
        }
    }

    fn scalar(&mut self) -> Option<String> {
        match *self.chars.peek()? {
            quote @ ('\'' | '"') => {
                self.chars.next();
                let mut out = String::new();
                loop {
                    match self.chars.next()? {
                        '\\' => out.push(self.chars.next()?),
                        c if c == quote => return Some(out),
                        c => out.push(c),
                    }
                }
            }
            '{' | '[' | '(' => None,
            _ => {
                let mut out = String::new();
                while let Some(&c) = self.chars.peek() {
                    if matches!(c, ',' | '}' | ':') {
                        break;
                    }
                    if matches!(c, '{' | '[' | '(') {
                        return None;
                    }
                    out.push(c);
                    self.chars.next();
                }
                let out = out.trim().to_string();
                if out.is_empty() {
                    None
                } else {
                    Some(out)
                }
            }
        }
    }
}
