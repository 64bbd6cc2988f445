use hydrosense_core::is_unsigned_decimal;

/// Substrings that mark a raw OCR line as part of a label/value pair.
const CONTINUATION_MARKERS: [&str; 4] = ["temp", "gsr", "humidity", "="];

/// Reassemble raw OCR lines into logical label/value lines.
///
/// OCR engines tend to split `Body Temp = 36.5 C` into separate regions
/// (`Body Temp`, `= 36.5 C`). Any line that mentions a sensor keyword or `=`,
/// or that is a bare unsigned number, is glued onto the line being built;
/// every other line closes the current group and opens a new one.
pub fn group_lines<S: AsRef<str>>(raw_lines: &[S]) -> Vec<String> {
    let mut grouped = Vec::new();
    let mut current = String::new();

    for line in raw_lines {
        let line = line.as_ref().trim();
        if line.is_empty() {
            continue;
        }

        if is_continuation(line) {
            if !current.is_empty() {
                current.push(' ');
            }
            current.push_str(line);
        } else {
            if !current.is_empty() {
                grouped.push(current.trim().to_string());
            }
            current = line.to_string();
        }
    }

    if !current.is_empty() {
        grouped.push(current.trim().to_string());
    }
    grouped
}

/// A bare number with no label is still treated as a continuation, so an
/// unrelated number between two readings is absorbed into the preceding group.
fn is_continuation(line: &str) -> bool {
    let lower = line.to_lowercase();
    CONTINUATION_MARKERS.iter().any(|m| lower.contains(m)) || is_unsigned_decimal(line)
}
