//! Human-readable byte-size formatting for UI labels and log lines.

const UNITS: &[&str] = &["B", "KB", "MB", "GB", "TB"];

/// Formats a byte count with a 1024 divisor and one decimal place.
///
/// Whole bytes carry no decimal; larger units drop a trailing `.0`
/// (`1536` → `"1.5 KB"`, `1048576` → `"1 MB"`).
pub fn format_bytes(bytes: u64) -> String {
    if bytes < 1024 {
        return format!("{} B", bytes);
    }

    let mut value = bytes as f64;
    let mut unit = 0;
    while value >= 1024.0 && unit < UNITS.len() - 1 {
        value /= 1024.0;
        unit += 1;
    }

    let rounded = (value * 10.0).round() / 10.0;
    if (rounded - rounded.trunc()).abs() < f64::EPSILON {
        format!("{} {}", rounded as u64, UNITS[unit])
    } else {
        format!("{:.1} {}", rounded, UNITS[unit])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bytes_below_one_kilobyte() {
        assert_eq!(format_bytes(0), "0 B");
        assert_eq!(format_bytes(512), "512 B");
        assert_eq!(format_bytes(1023), "1023 B");
    }

    #[test]
    fn kilobyte_boundary() {
        assert_eq!(format_bytes(1024), "1 KB");
        assert_eq!(format_bytes(1536), "1.5 KB");
    }

    #[test]
    fn megabytes_and_gigabytes() {
        assert_eq!(format_bytes(1_048_576), "1 MB");
        assert_eq!(format_bytes(2_411_724), "2.3 MB");
        assert_eq!(format_bytes(1_181_116_006), "1.1 GB");
    }

    #[test]
    fn rounds_to_one_decimal() {
        // 1.25 KB rounds to 1.3
        assert_eq!(format_bytes(1280), "1.3 KB");
    }
}
