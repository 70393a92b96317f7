//! Text-to-scalar conversion for element values.
//!
//! Element text is read back through [`FromText`]. Each implementation has
//! two modes:
//!
//! - **lenient** (`from_text`): C library semantics. Leading whitespace is
//!   skipped and the longest numeric prefix is used, so `"42px"` reads as
//!   42 and `"abc"` reads as 0. Integer overflow saturates. Floats also
//!   accept hexadecimal prefixes such as `0x1.8p3`.
//! - **strict** (`parse_text`): the whole text, minus surrounding
//!   whitespace, must be a valid value in Rust's decimal syntax.
//!
//! Absent text is handled by the caller: lenient reads produce
//! [`FromText::absent`], strict reads report it as an error.

/// A value that can be read from an element's text.
pub trait FromText: Sized {
    /// Type name used in error messages.
    const TYPE_NAME: &'static str;

    /// The value used when the element has no text.
    fn absent() -> Self;

    /// Lenient conversion. Never fails.
    fn from_text(text: &str) -> Self;

    /// Strict conversion. Returns `None` when `text` is not exactly a value.
    fn parse_text(text: &str) -> Option<Self>;
}

impl FromText for String {
    const TYPE_NAME: &'static str = "string";

    fn absent() -> Self {
        String::new()
    }

    fn from_text(text: &str) -> Self {
        text.to_string()
    }

    fn parse_text(text: &str) -> Option<Self> {
        Some(text.to_string())
    }
}

macro_rules! impl_from_text_int {
    ($($ty:ty),*) => {$(
        impl FromText for $ty {
            const TYPE_NAME: &'static str = stringify!($ty);

            fn absent() -> Self {
                0
            }

            fn from_text(text: &str) -> Self {
                let value = leading_integer(text);
                <$ty>::try_from(value).unwrap_or(if value < 0 { <$ty>::MIN } else { <$ty>::MAX })
            }

            fn parse_text(text: &str) -> Option<Self> {
                text.trim().parse().ok()
            }
        }
    )*};
}

impl_from_text_int!(i32, i64, isize);

impl FromText for f64 {
    const TYPE_NAME: &'static str = "f64";

    fn absent() -> Self {
        0.0
    }

    fn from_text(text: &str) -> Self {
        let s = text.trim_start_matches(is_c_space);
        if let Some(value) = hex_float_prefix(s) {
            return value;
        }
        let end = float_prefix_len(s);
        s[..end].parse().unwrap_or(0.0)
    }

    fn parse_text(text: &str) -> Option<Self> {
        text.trim().parse().ok()
    }
}

/// Whitespace as C's `isspace` sees it in the "C" locale.
fn is_c_space(c: char) -> bool {
    matches!(c, ' ' | '\t' | '\n' | '\x0B' | '\x0C' | '\r')
}

/// Parses the leading decimal integer of `text` like `strtoll`, saturating
/// at the `i64` bounds. Returns 0 when there is no digit.
fn leading_integer(text: &str) -> i64 {
    let s = text.trim_start_matches(is_c_space);
    let (negative, digits) = match s.as_bytes().first() {
        Some(b'-') => (true, &s[1..]),
        Some(b'+') => (false, &s[1..]),
        _ => (false, s),
    };
    let mut value: i64 = 0;
    for b in digits.bytes().take_while(u8::is_ascii_digit) {
        let digit = i64::from(b - b'0');
        value = value.saturating_mul(10);
        value = if negative {
            value.saturating_sub(digit)
        } else {
            value.saturating_add(digit)
        };
    }
    value
}

/// Reads a leading hexadecimal float (`0x10`, `-0x1.8p1`) the way `strtod`
/// does. Returns `None` when `s` has no hex digits after the `0x`.
fn hex_float_prefix(s: &str) -> Option<f64> {
    let (negative, rest) = match s.as_bytes().first() {
        Some(b'-') => (true, &s[1..]),
        Some(b'+') => (false, &s[1..]),
        _ => (false, s),
    };
    let digits = rest
        .strip_prefix("0x")
        .or_else(|| rest.strip_prefix("0X"))?;
    let bytes = digits.as_bytes();
    let hex_digit = |i: usize| bytes.get(i).and_then(|&b| char::from(b).to_digit(16));

    let mut mantissa = 0.0_f64;
    let mut exponent: i32 = 0;
    let mut seen = false;
    let mut i = 0;
    while let Some(d) = hex_digit(i) {
        mantissa = mantissa * 16.0 + f64::from(d);
        seen = true;
        i += 1;
    }
    if bytes.get(i) == Some(&b'.') {
        i += 1;
        while let Some(d) = hex_digit(i) {
            mantissa = mantissa * 16.0 + f64::from(d);
            exponent = exponent.saturating_sub(4);
            seen = true;
            i += 1;
        }
    }
    if !seen {
        return None;
    }

    if matches!(bytes.get(i), Some(b'p' | b'P')) {
        let mut j = i + 1;
        let exp_negative = match bytes.get(j) {
            Some(b'-') => {
                j += 1;
                true
            }
            Some(b'+') => {
                j += 1;
                false
            }
            _ => false,
        };
        let start = j;
        let mut value: i32 = 0;
        while let Some(b) = bytes.get(j).filter(|b| b.is_ascii_digit()) {
            value = value.saturating_mul(10).saturating_add(i32::from(b - b'0'));
            j += 1;
        }
        if j > start {
            exponent = if exp_negative {
                exponent.saturating_sub(value)
            } else {
                exponent.saturating_add(value)
            };
        }
    }

    let value = mantissa * 2.0_f64.powi(exponent);
    Some(if negative { -value } else { value })
}

/// Returns the byte length of the longest decimal prefix of `s` that `strtod`
/// would consume: an optional sign, then `inf`/`infinity`/`nan`, or a
/// decimal mantissa with an optional exponent.
fn float_prefix_len(s: &str) -> usize {
    let bytes = s.as_bytes();
    let mut i = 0;
    if matches!(bytes.first(), Some(b'+' | b'-')) {
        i += 1;
    }

    let rest = &s[i..];
    for word in ["infinity", "inf", "nan"] {
        if rest
            .get(..word.len())
            .is_some_and(|head| head.eq_ignore_ascii_case(word))
        {
            return i + word.len();
        }
    }

    let mantissa_start = i;
    while bytes.get(i).is_some_and(u8::is_ascii_digit) {
        i += 1;
    }
    let mut digits = i - mantissa_start;
    if bytes.get(i) == Some(&b'.') {
        let frac_start = i + 1;
        let mut j = frac_start;
        while bytes.get(j).is_some_and(u8::is_ascii_digit) {
            j += 1;
        }
        digits += j - frac_start;
        if digits > 0 {
            i = j;
        }
    }
    if digits == 0 {
        return 0;
    }

    if matches!(bytes.get(i), Some(b'e' | b'E')) {
        let mut j = i + 1;
        if matches!(bytes.get(j), Some(b'+' | b'-')) {
            j += 1;
        }
        let exp_start = j;
        while bytes.get(j).is_some_and(u8::is_ascii_digit) {
            j += 1;
        }
        if j > exp_start {
            i = j;
        }
    }
    i
}
