//! Human-readable sizes.

const UNITS: [&str; 4] = ["Bytes", "KB", "MB", "GB"];

/// `0 Bytes`, `512 Bytes`, `1.5 KB`, `12.35 MB`: base 1024, at most two
/// decimals, trailing zeros dropped. Anything past gigabytes stays in GB.
pub fn format_file_size(bytes: u64) -> String {
    if bytes == 0 {
        return "0 Bytes".to_string();
    }

    let mut unit = 0;
    let mut scale = 1u64;
    while unit + 1 < UNITS.len() && bytes >= scale * 1024 {
        scale *= 1024;
        unit += 1;
    }

    let fixed = format!("{:.2}", bytes as f64 / scale as f64);
    let trimmed = fixed.trim_end_matches('0').trim_end_matches('.');
    format!("{} {}", trimmed, UNITS[unit])
}

/// The admin panel's "data size" figure: kilobytes with two decimals.
pub fn format_kib(bytes: usize) -> String {
    format!("{:.2} KB", bytes as f64 / 1024.0)
}
