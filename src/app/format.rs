//! Text helpers shared by the banner and the report.
use std::borrow::Cow;
use std::cmp::Ordering;
use std::time::Duration;

use crossterm::style::{Color, Stylize};

/// `1234567` -> `1,234,567`.
#[must_use]
pub fn format_with_commas(value: u64) -> String {
    let digits = value.to_string();
    let mut out = String::with_capacity(digits.len().saturating_add(digits.len() / 3));
    let len = digits.len();
    for (idx, ch) in digits.chars().enumerate() {
        if idx > 0 && len.saturating_sub(idx) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}

/// Seconds with two decimals from one second up, whole milliseconds below.
#[must_use]
pub fn format_elapsed(elapsed: Duration) -> String {
    let ms = elapsed.as_millis();
    if ms >= 1_000 {
        let secs = ms / 1_000;
        let hundredths = (ms % 1_000) / 10;
        format!("{}.{:02}s", secs, hundredths)
    } else {
        format!("{}ms", ms)
    }
}

#[must_use]
pub const fn plural_suffix(count: u64) -> &'static str {
    if count > 1 { "s" } else { "" }
}

fn hex_digits(body: &str) -> Option<&str> {
    let trimmed = body.trim_matches('"');
    let digits = trimmed.strip_prefix("0x").unwrap_or(trimmed);
    if digits.is_empty() || !digits.chars().all(|ch| ch.is_ascii_hexdigit()) {
        return None;
    }
    Some(digits)
}

/// Numeric value of a hex-quantity body such as `"0x1b4"`.
#[must_use]
pub fn hex_number(body: &str) -> Option<u64> {
    hex_digits(body).and_then(|digits| u64::from_str_radix(digits, 16).ok())
}

/// Human form of a hex body: the number with separators, or the bytes as
/// text when the value is too wide for a number.
#[must_use]
pub fn decode_hex_body(body: &str) -> Option<String> {
    if let Some(number) = hex_number(body) {
        return Some(format_with_commas(number));
    }
    let digits = hex_digits(body)?;
    if digits.len() % 2 != 0 {
        return None;
    }
    let bytes = digits
        .as_bytes()
        .chunks(2)
        .map(|pair| {
            let text = std::str::from_utf8(pair).ok()?;
            u8::from_str_radix(text, 16).ok()
        })
        .collect::<Option<Vec<u8>>>()?;
    Some(String::from_utf8_lossy(&bytes).into_owned())
}

/// Hex numbers first in numeric order, then everything else by text.
#[must_use]
pub fn compare_bodies(left: &str, right: &str) -> Ordering {
    match (hex_number(left), hex_number(right)) {
        (Some(a), Some(b)) => a.cmp(&b).then_with(|| left.cmp(right)),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => left.cmp(right),
    }
}

/// Success counts: >=99% green, >=95% yellow, otherwise red.
#[must_use]
pub const fn success_color(rate_x100: u64) -> Color {
    if rate_x100 >= 9_900 {
        Color::Green
    } else if rate_x100 >= 9_500 {
        Color::Yellow
    } else {
        Color::Red
    }
}

/// Failure counts: >5% red, >1% yellow, otherwise uncoloured.
#[must_use]
pub const fn failure_color(rate_x100: u64) -> Option<Color> {
    if rate_x100 > 500 {
        Some(Color::Red)
    } else if rate_x100 > 100 {
        Some(Color::Yellow)
    } else {
        None
    }
}

#[must_use]
pub const fn latency_color(latency_ms: u64) -> Color {
    if latency_ms > 800 {
        Color::Red
    } else if latency_ms > 250 {
        Color::Yellow
    } else if latency_ms > 90 {
        Color::Green
    } else {
        Color::Blue
    }
}

pub(crate) fn paint(text: &str, color: Option<Color>, use_color: bool) -> Cow<'_, str> {
    match color {
        Some(color) if use_color => Cow::Owned(text.with(color).to_string()),
        Some(_) | None => Cow::Borrowed(text),
    }
}
