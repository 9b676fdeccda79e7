pub const MB: u64 = 1024 * 1024;
pub const GB: u64 = 1024 * 1024 * 1024;

pub fn bytes_to_mb(bytes: u64) -> f64 {
    round2(bytes as f64 / MB as f64)
}

pub fn bytes_to_gb(bytes: u64) -> f64 {
    round2(bytes as f64 / GB as f64)
}

pub fn round1(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

pub fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rounding() {
        assert_eq!(round1(42.37), 42.4);
        assert_eq!(round2(42.375), 42.38);
        assert_eq!(round2(0.0), 0.0);
    }

    #[test]
    fn unit_conversion() {
        assert_eq!(bytes_to_mb(MB), 1.0);
        assert_eq!(bytes_to_mb(MB + MB / 2), 1.5);
        assert_eq!(bytes_to_gb(3 * GB), 3.0);
        assert_eq!(bytes_to_gb(GB / 4), 0.25);
    }
}
