//! Duration parsing and formatting (seconds based).

use crate::errors::{AppError, AppResult};

/// Parse `90`, `90s`, `45m`, `2h`, `1h30m`, `1h30m15s` into seconds.
pub fn parse_duration(input: &str) -> AppResult<i64> {
    let s = input.trim().to_lowercase();
    if s.is_empty() {
        return Err(AppError::InvalidDuration(input.to_string()));
    }

    if let Ok(secs) = s.parse::<i64>() {
        return if secs >= 0 {
            Ok(secs)
        } else {
            Err(AppError::InvalidDuration(input.to_string()))
        };
    }

    let mut total: i64 = 0;
    let mut digits = String::new();
    let mut last_unit = 0; // h=3, m=2, s=1; units must appear in that order

    for c in s.chars() {
        if c.is_ascii_digit() {
            digits.push(c);
            continue;
        }

        let (rank, factor) = match c {
            'h' => (3, 3600),
            'm' => (2, 60),
            's' => (1, 1),
            _ => return Err(AppError::InvalidDuration(input.to_string())),
        };
        if digits.is_empty() || (last_unit != 0 && rank >= last_unit) {
            return Err(AppError::InvalidDuration(input.to_string()));
        }

        total = digits
            .parse::<i64>()
            .ok()
            .and_then(|n| n.checked_mul(factor))
            .and_then(|secs| total.checked_add(secs))
            .ok_or_else(|| AppError::InvalidDuration(input.to_string()))?;
        digits.clear();
        last_unit = rank;
    }

    if !digits.is_empty() {
        return Err(AppError::InvalidDuration(input.to_string()));
    }

    Ok(total)
}

/// `HH:MM:SS`, hours growing past 99 when needed; negative values get a `-`.
pub fn format_seconds(secs: i64) -> String {
    let sign = if secs < 0 { "-" } else { "" };
    let s = secs.abs();
    format!("{}{:02}:{:02}:{:02}", sign, s / 3600, (s % 3600) / 60, s % 60)
}

/// Compact human form: `1h 05m`, `12m 30s`, `45s`.
pub fn humanize_seconds(secs: i64) -> String {
    let sign = if secs < 0 { "-" } else { "" };
    let s = secs.abs();
    let (h, m, sec) = (s / 3600, (s % 3600) / 60, s % 60);

    if h > 0 {
        format!("{}{}h {:02}m", sign, h, m)
    } else if m > 0 {
        format!("{}{}m {:02}s", sign, m, sec)
    } else {
        format!("{}{}s", sign, sec)
    }
}
