// Elapsed-time formatting and duration parsing

use anyhow::Result;

/// Format elapsed milliseconds as `HH:MM:SS`
///
/// Truncates to whole seconds. Hours are zero-padded to two digits and grow
/// without bound past 99 (`100:00:00`). Negative input renders as zero.
pub fn format_elapsed(ms: i64) -> String {
    let total_secs = ms.max(0) / 1000;
    let hours = total_secs / 3600;
    let minutes = (total_secs % 3600) / 60;
    let seconds = total_secs % 60;

    format!("{:02}:{:02}:{:02}", hours, minutes, seconds)
}

/// Parse a duration expression and return milliseconds
///
/// Supports unit-suffixed components in any combination: 30s, 10m, 2h, 1d, 1h30m.
pub fn parse_duration(expr: &str) -> Result<i64> {
    let expr = expr.trim();
    if expr.is_empty() {
        anyhow::bail!("Invalid duration format: '{}'", expr);
    }

    let mut total_secs = 0i64;
    let mut digits = String::new();

    for c in expr.chars() {
        if c.is_ascii_digit() {
            digits.push(c);
            continue;
        }

        let multiplier = match c {
            'd' => 86400,
            'h' => 3600,
            'm' => 60,
            's' => 1,
            _ => anyhow::bail!("Invalid duration format: '{}' (unknown unit '{}')", expr, c),
        };
        if digits.is_empty() {
            anyhow::bail!("Invalid duration format: '{}' (missing number before '{}')", expr, c);
        }
        let value: i64 = digits.parse()
            .map_err(|_| anyhow::anyhow!("Invalid duration format: '{}'", expr))?;
        total_secs = value
            .checked_mul(multiplier)
            .and_then(|secs| total_secs.checked_add(secs))
            .ok_or_else(|| anyhow::anyhow!("Invalid duration format: '{}' (too large)", expr))?;
        digits.clear();
    }

    if !digits.is_empty() {
        anyhow::bail!("Invalid duration format: '{}' (missing unit)", expr);
    }

    if total_secs == 0 {
        anyhow::bail!("Duration must be greater than 0");
    }

    total_secs
        .checked_mul(1000)
        .ok_or_else(|| anyhow::anyhow!("Invalid duration format: '{}' (too large)", expr))
}
