use std::sync::OnceLock;

use hydrosense_core::{numeric, Field, SensorReadings};
use regex::Regex;

/// Characters dropped from the joined OCR text before matching. Removal is
/// per character, so a `c` inside a word disappears as well.
const STRIPPED_CHARS: [char; 4] = ['=', ':', 'c', '%'];

/// How many arbitrary characters may sit between a label and its number.
const LOOKAHEAD_WINDOW: usize = 10;

// ── Compiled regex cache ─────────────────────────────────────────────────────

/// Alias, a lazy gap, then a number. Only a fractional number may carry a
/// sign; a bare integer is read unsigned, so `-5` yields 5. Digits are ASCII
/// to match `numeric::recognize`.
fn alias_regex(alias: &str) -> Result<Regex, regex::Error> {
    Regex::new(&format!(
        r"{}[\s\S]{{0,{LOOKAHEAD_WINDOW}}}?([-+]?[0-9]*\.[0-9]+|[0-9]+)",
        regex::escape(alias)
    ))
}

fn field_patterns(field: Field) -> &'static [Regex] {
    static R: OnceLock<Vec<Vec<Regex>>> = OnceLock::new();
    let table = R.get_or_init(|| {
        Field::ALL
            .iter()
            .map(|f| {
                f.aliases()
                    .iter()
                    .map(|a| alias_regex(a).expect("invalid alias regex"))
                    .collect()
            })
            .collect()
    });
    let idx = Field::ALL.iter().position(|f| *f == field).unwrap_or_default();
    &table[idx]
}

// ── Public extraction API ─────────────────────────────────────────────────────

/// Join grouped lines into the single search string values are matched in.
pub fn normalize_text<S: AsRef<str>>(grouped_lines: &[S]) -> String {
    let joined = grouped_lines
        .iter()
        .map(AsRef::as_ref)
        .collect::<Vec<_>>()
        .join(" ");
    joined
        .to_lowercase()
        .chars()
        .filter(|c| !STRIPPED_CHARS.contains(c))
        .collect()
}

/// Look up the value of `field` by name (`"Body Temp"`, `"GSR"`, ...).
///
/// Names outside the alias table are searched for literally, lower-cased.
pub fn extract_value<S: AsRef<str>>(grouped_lines: &[S], field: &str) -> Option<f64> {
    let text = normalize_text(grouped_lines);
    match Field::from_key(field) {
        Some(f) => first_match(&text, field_patterns(f)),
        None => {
            let alias = field.to_lowercase();
            let re = alias_regex(&alias).ok()?;
            first_match(&text, std::slice::from_ref(&re))
        }
    }
}

pub fn extract_field<S: AsRef<str>>(grouped_lines: &[S], field: Field) -> Option<f64> {
    first_match(&normalize_text(grouped_lines), field_patterns(field))
}

/// Extract all four fields from one OCR pass.
pub fn extract_all<S: AsRef<str>>(grouped_lines: &[S]) -> SensorReadings {
    let text = normalize_text(grouped_lines);
    let mut readings = SensorReadings::default();
    for field in Field::ALL {
        readings.set(field, first_match(&text, field_patterns(field)));
    }
    readings
}

/// The first alias (in table order) with any hit decides; within it the
/// leftmost occurrence wins.
fn first_match(text: &str, patterns: &[Regex]) -> Option<f64> {
    patterns.iter().find_map(|re| {
        let token = re.captures(text)?.get(1)?.as_str();
        numeric::recognize(token).map(|t| t.value)
    })
}

// ── Tests ─────────────────────────────────────────────────────────────────────
