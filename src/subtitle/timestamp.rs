use crate::error::{SubcueError, SubcueResult};

/// Absorbs binary representation error before truncating to whole
/// milliseconds (`1.001 * 1000.0` is `1000.999...`).
const MS_EPSILON: f64 = 1e-6;

/// Format seconds as an SRT timestamp: "HH:MM:SS,mmm".
///
/// Milliseconds are truncated, not rounded. Hours grow past two digits
/// rather than wrapping.
pub fn format_timestamp(secs: f64) -> SubcueResult<String> {
    if !secs.is_finite() || secs < 0.0 {
        return Err(SubcueError::InvalidTimestamp(secs));
    }
    let total_ms = (secs * 1000.0 + MS_EPSILON).floor() as u64;
    let ms = total_ms % 1000;
    let total_s = total_ms / 1000;
    let s = total_s % 60;
    let total_m = total_s / 60;
    let m = total_m % 60;
    let h = total_m / 60;
    Ok(format!("{h:02}:{m:02}:{s:02},{ms:03}"))
}

/// Parse "HH:MM:SS,mmm" (or with a '.' before the milliseconds) into seconds.
pub fn parse_timestamp(text: &str) -> SubcueResult<f64> {
    let text = text.trim();
    let err = || SubcueError::TimestampParse(text.to_string());

    let (clock, millis) = text.rsplit_once([',', '.']).ok_or_else(err)?;
    let mut parts = clock.split(':');
    let (Some(h), Some(m), Some(s), None) = (parts.next(), parts.next(), parts.next(), parts.next())
    else {
        return Err(err());
    };

    let field = |v: &str| -> SubcueResult<u64> {
        if v.is_empty() || !v.bytes().all(|b| b.is_ascii_digit()) {
            return Err(err());
        }
        v.parse().map_err(|_| err())
    };
    let hours = field(h)?;
    let minutes = field(m)?;
    let seconds = field(s)?;
    if millis.len() != 3 {
        return Err(err());
    }
    let ms = field(millis)?;

    if minutes >= 60 || seconds >= 60 {
        return Err(err());
    }

    let total_ms = hours * 3_600_000 + minutes * 60_000 + seconds * 1_000 + ms;
    Ok(total_ms as f64 / 1000.0)
}
