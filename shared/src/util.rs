/// Current UTC timestamp in milliseconds
pub fn now_millis() -> i64 {
    chrono::Utc::now().timestamp_millis()
}

/// Render a byte count as kilobytes with two decimals (`12.50 KB`)
pub fn format_kb(bytes: u64) -> String {
    format!("{:.2} KB", bytes as f64 / 1024.0)
}

/// Render a byte count as megabytes with two decimals (`1.25 MB`)
pub fn format_mb(bytes: u64) -> String {
    format!("{:.2} MB", bytes as f64 / 1024.0 / 1024.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_size_formatting() {
        assert_eq!(format_kb(0), "0.00 KB");
        assert_eq!(format_kb(1536), "1.50 KB");
        assert_eq!(format_mb(5 * 1024 * 1024), "5.00 MB");
        assert_eq!(format_mb(1024 * 1024 + 512 * 1024), "1.50 MB");
    }

    #[test]
    fn test_now_millis_is_recent() {
        // 2024-01-01T00:00:00Z
        assert!(now_millis() > 1_704_067_200_000);
    }
}
