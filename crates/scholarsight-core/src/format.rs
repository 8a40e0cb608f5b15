const UNITS: [&str; 4] = ["Bytes", "KB", "MB", "GB"];

/// Format a byte count for display using binary units (base 1024).
///
/// Values are rounded to two decimals and trailing zeros are dropped, so
/// `1536` renders as `1.5 KB` and `1024` as `1 KB`. Anything past gigabytes
/// is still expressed in GB.
pub fn format_file_size(bytes: u64) -> String {
    if bytes == 0 {
        return "0 Bytes".to_string();
    }

    let mut unit = 0;
    let mut divisor = 1u64;
    while unit + 1 < UNITS.len() && bytes >= divisor * 1024 {
        divisor *= 1024;
        unit += 1;
    }

    let value = (bytes as f64 / divisor as f64 * 100.0).round() / 100.0;
    let mut number = format!("{value:.2}");
    if number.contains('.') {
        let trimmed = number.trim_end_matches('0').trim_end_matches('.').len();
        number.truncate(trimmed);
    }
    format!("{number} {}", UNITS[unit])
}
