//! Recognizer for the small numeric grammar found on sensor readouts:
//! an optional `+`/`-`, ASCII digits, and at most one decimal point, with at
//! least one digit somewhere (`5`, `36.5`, `.5`, `5.`, `-3.2`).

/// A string that matched the numeric grammar in full.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NumericToken<'a> {
    pub text: &'a str,
    pub signed: bool,
    pub has_decimal_point: bool,
    pub value: f64,
}

/// Recognize `s` as a whole numeric token, or `None` if any character falls
/// outside the grammar.
pub fn recognize(s: &str) -> Option<NumericToken<'_>> {
    let bytes = s.as_bytes();
    let signed = matches!(bytes.first(), Some(b'+') | Some(b'-'));
    let body = if signed { &bytes[1..] } else { bytes };

    let mut digits = 0usize;
    let mut points = 0usize;
    for &b in body {
        match b {
            b'0'..=b'9' => digits += 1,
            b'.' => points += 1,
            _ => return None,
        }
    }
    if digits == 0 || points > 1 {
        return None;
    }

    let value = s.parse::<f64>().ok()?;
    Some(NumericToken {
        text: s,
        signed,
        has_decimal_point: points == 1,
        value,
    })
}

/// True for digits with at most one decimal point and no sign.
pub fn is_unsigned_decimal(s: &str) -> bool {
    recognize(s).is_some_and(|t| !t.signed)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn plain_integer_and_decimal() {
        let t = recognize("512").unwrap();
        assert_eq!(t.value, 512.0);
        assert!(!t.signed && !t.has_decimal_point);

        let t = recognize("36.5").unwrap();
        assert_eq!(t.value, 36.5);
        assert!(t.has_decimal_point);
    }

    #[test]
    fn bare_leading_or_trailing_point() {
        assert_eq!(recognize(".5").unwrap().value, 0.5);
        assert_eq!(recognize("5.").unwrap().value, 5.0);
        assert!(recognize(".").is_none());
    }

    #[test]
    fn sign_is_recognized_but_not_unsigned() {
        let t = recognize("-3.25").unwrap();
        assert!(t.signed);
        assert_eq!(t.value, -3.25);
        assert!(!is_unsigned_decimal("-3.25"));
        assert!(!is_unsigned_decimal("+7"));
        assert!(is_unsigned_decimal("7"));
    }

    #[test]
    fn rejects_everything_else() {
        for s in ["", "-", "1.2.3", "12a", " 12", "1e5", "36,5", "--1"] {
            assert!(recognize(s).is_none(), "{s:?} should not be numeric");
        }
    }
}
