//! Formatting utilities for terminal output
//!
//! Amounts are stored at full precision; rounding to two decimals happens
//! here and nowhere else.

/// Format an amount with two decimals and thousands separators
///
/// `1234.5` becomes `"1,234.50"`, `-0.001` becomes `"0.00"`. Totals that
/// overflowed render as `"inf"` / `"-inf"`.
pub fn format_amount(value: f64) -> String {
    if !value.is_finite() {
        return value.to_string();
    }

    let fixed = format!("{:.2}", value.abs());
    let (int_part, frac_part) = match fixed.split_once('.') {
        Some(parts) => parts,
        None => (fixed.as_str(), "00"),
    };

    let sign = if value < 0.0 && fixed != "0.00" { "-" } else { "" };
    format!("{}{}.{}", sign, group_thousands(int_part), frac_part)
}

/// Format a change, with an explicit `+` for increases
pub fn format_change(delta: f64) -> String {
    let formatted = format_amount(delta);
    if delta > 0.0 && formatted != "0.00" {
        format!("+{}", formatted)
    } else {
        formatted
    }
}

fn group_thousands(digits: &str) -> String {
    let len = digits.len();
    let mut out = String::with_capacity(len + len / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (len - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}

/// Format a separator line
pub fn separator(ch: char, width: usize) -> String {
    std::iter::repeat(ch).take(width).collect()
}

/// Truncate a string to a maximum number of characters with ellipsis
pub fn truncate(s: &str, max_len: usize) -> String {
    if s.chars().count() <= max_len {
        s.to_string()
    } else if max_len <= 3 {
        ".".repeat(max_len)
    } else {
        let kept: String = s.chars().take(max_len - 3).collect();
        format!("{}...", kept)
    }
}

/// Left-align text in a field of given width, truncating if it overflows
pub fn left_align(s: &str, width: usize) -> String {
    let s = truncate(s, width);
    format!("{:<width$}", s, width = width)
}

/// Join two blocks of lines into columns separated by `" | "`
///
/// The shorter block is padded with empty lines.
pub fn side_by_side(left: &[String], right: &[String], width: usize) -> Vec<String> {
    let rows = left.len().max(right.len());
    (0..rows)
        .map(|i| {
            let l = left.get(i).map(String::as_str).unwrap_or("");
            let r = right.get(i).map(String::as_str).unwrap_or("");
            format!("{} | {}", left_align(l, width), r)
                .trim_end()
                .to_string()
        })
        .collect()
}
