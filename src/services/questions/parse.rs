use crate::error::{ForgeError, Result};
use regex::Regex;
use serde_json::Value;
use tracing::debug;

/// Finds the question array inside free-form model output.
pub struct JsonArrayScanner {
    greedy_array: Regex,
}

impl JsonArrayScanner {
    pub fn new() -> Self {
        Self {
            greedy_array: Regex::new(r"\[[\s\S]*\]").expect("static pattern"),
        }
    }

    /// The outermost `[ ... ]` span is tried first. When it does not decode,
    /// every bracket-balanced candidate holding at least one object is tried
    /// in order of appearance.
    pub fn parse_response(&self, raw: &str) -> Result<Vec<Value>> {
        if let Some(span) = self.greedy_array.find(raw) {
            if let Some(items) = decode_array(span.as_str()) {
                return Ok(items);
            }
            debug!("Greedy array span did not decode, scanning balanced candidates");
        }

        for candidate in balanced_arrays(raw) {
            match decode_array(candidate) {
                Some(items) if items.iter().any(Value::is_object) => return Ok(items),
                _ => {}
            }
        }

        Err(ForgeError::MalformedResponse {
            reason: "no non-empty JSON array found in model output".to_string(),
        })
    }
}

impl Default for JsonArrayScanner {
    fn default() -> Self {
        Self::new()
    }
}

fn decode_array(candidate: &str) -> Option<Vec<Value>> {
    match serde_json::from_str::<Value>(candidate) {
        Ok(Value::Array(items)) if !items.is_empty() => Some(items),
        _ => None,
    }
}

/// Every `[` that opens a balanced span, paired with its matching `]`.
/// Brackets inside JSON strings are ignored.
fn balanced_arrays(raw: &str) -> Vec<&str> {
    raw.char_indices()
        .filter(|(_, c)| *c == '[')
        .filter_map(|(start, _)| matching_close(raw, start).map(|end| &raw[start..=end]))
        .collect()
}

fn matching_close(raw: &str, start: usize) -> Option<usize> {
    let mut depth = 0usize;
    let mut in_string = false;
    let mut escaped = false;

    for (offset, c) in raw[start..].char_indices() {
        if in_string {
            if escaped {
                escaped = false;
            } else if c == '\\' {
                escaped = true;
            } else if c == '"' {
                in_string = false;
            }
            continue;
        }

        match c {
            '"' => in_string = true,
            '[' => depth += 1,
            ']' => {
                depth -= 1;
                if depth == 0 {
                    return Some(start + offset);
                }
            }
            _ => {}
        }
    }

    None
}
