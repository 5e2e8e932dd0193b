//! Key string alphabet and key capacity.
//!
//! STRING keys are rendered over [`STRING_ALPHABET`] and end with the key's
//! own base-`STRING_ALPHABET.len()` digits, so a column can hold as many
//! distinct keys as its shortest string has digit combinations.

/// Characters of generated strings.
pub const STRING_ALPHABET: &[u8] =
    b"abcdefghijklmnopqrstuvwxyzABCDEFGHIJKLMNOPQRSTUVWXYZ0123456789,.-#'?!";

/// Shortest variable-length string.
pub const MIN_VARIABLE_LENGTH: u16 = 6;

/// Shortest string a column renders.
pub fn min_string_length(length: u16, var_length: bool) -> u16 {
    if var_length && length > MIN_VARIABLE_LENGTH {
        MIN_VARIABLE_LENGTH
    } else {
        length
    }
}

/// Number of distinct keys a STRING column of this shape can render.
pub fn string_key_capacity(length: u16, var_length: bool) -> u64 {
    let base = STRING_ALPHABET.len() as u64;
    base.checked_pow(u32::from(min_string_length(length, var_length)))
        .unwrap_or(u64::MAX)
}

/// Smallest `alpha` with `alpha^columns >= 4 · rows`: the digit range of
/// each column of an independent composite key.
pub fn composite_radix(columns: u32, rows: u64) -> Option<u64> {
    if columns == 0 {
        return None;
    }
    let target = rows.checked_mul(4)?;
    let estimate = (target as f64).powf(1.0 / f64::from(columns)).ceil() as u64;
    let mut alpha = estimate.max(1);
    while alpha > 1 && (alpha - 1).checked_pow(columns).is_some_and(|p| p >= target) {
        alpha -= 1;
    }
    while alpha.checked_pow(columns)? < target {
        alpha += 1;
    }
    Some(alpha)
}

/// Whether `c` can separate fields of an unquoted flat file: a printable
/// ASCII character that never occurs inside a generated value.
pub fn is_valid_delimiter(c: char) -> bool {
    c.is_ascii_graphic()
        && !STRING_ALPHABET.contains(&(c as u8))
        && !matches!(c, ':' | '"')
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_capacity() {
        let base = STRING_ALPHABET.len() as u64;
        assert_eq!(string_key_capacity(1, false), base);
        assert_eq!(string_key_capacity(2, true), base * base);
        // Variable length is bounded by the shortest string.
        assert_eq!(string_key_capacity(40, true), base.pow(6));
        assert_eq!(string_key_capacity(4000, false), u64::MAX);
    }

    #[test]
    fn test_radix_is_exact() {
        assert_eq!(composite_radix(2, 100), Some(20));
        assert_eq!(composite_radix(3, 250), Some(10));
        assert_eq!(composite_radix(1, 7), Some(28));
        assert_eq!(composite_radix(2, 101), Some(21));
        assert_eq!(composite_radix(0, 5), None);
    }

    #[test]
    fn test_delimiters() {
        assert!(is_valid_delimiter('|'));
        assert!(is_valid_delimiter(';'));
        assert!(is_valid_delimiter('~'));
        for c in [',', '.', '-', '#', '\'', '?', '!', 'a', '7', ' ', '\t', '"', ':', 'é'] {
            assert!(!is_valid_delimiter(c), "{c:?}");
        }
    }
}
