const UNITS: [&str; 8] = ["", "K", "M", "G", "T", "P", "E", "Z"];

/// 把字节数换算成带单位的可读字符串
///
/// 依次尝试 "", K, M, G ... Z，第一个小于 `factor` 的单位即为结果；
/// 超过 Z 时使用 Y。
///
/// # 示例
/// `format_size(1536, 1024.0, "B") == "1.50KB"`
pub fn format_size(bytes: u64, factor: f64, suffix: &str) -> String {
    let mut value = bytes as f64;
    for unit in UNITS {
        if value < factor {
            return format!("{:.2}{}{}", value, unit, suffix);
        }
        value /= factor;
    }
    format!("{:.2}Y{}", value, suffix)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bytes_below_factor() {
        assert_eq!(format_size(8, 1024.0, "B"), "8.00B");
        assert_eq!(format_size(16, 1024.0, "B"), "16.00B");
        assert_eq!(format_size(0, 1024.0, "B"), "0.00B");
    }

    #[test]
    fn test_unit_steps() {
        assert_eq!(format_size(1536, 1024.0, "B"), "1.50KB");
        assert_eq!(format_size(1024, 1024.0, "B"), "1.00KB");
        assert_eq!(format_size(5 * 1024 * 1024, 1024.0, "B"), "5.00MB");
        assert_eq!(format_size(2_000, 1000.0, "b"), "2.00Kb");
    }

    #[test]
    fn test_beyond_zetta() {
        assert_eq!(format_size(u64::MAX, 2.0, "B"), format!("{:.2}Y{}", u64::MAX as f64 / 256.0, "B"));
    }
}
