//! Compass Heading

/// Heading in whole degrees from the horizontal field components
///
/// `atan2(y, x)` converted to degrees and truncated toward zero, so the
/// result lies in -180..=180.
pub fn heading_degrees(x: i16, y: i16) -> i32 {
    f64::from(y).atan2(f64::from(x)).to_degrees() as i32
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cardinal_directions() {
        assert_eq!(heading_degrees(100, 0), 0);
        assert_eq!(heading_degrees(0, 100), 90);
        assert_eq!(heading_degrees(-100, 0), 180);
        assert_eq!(heading_degrees(0, -100), -90);
    }

    #[test]
    fn test_truncation() {
        // atan2(1, 2) = 26.56 degrees
        assert_eq!(heading_degrees(200, 100), 26);
        assert_eq!(heading_degrees(200, -100), -26);
    }

    #[test]
    fn test_zero_field() {
        assert_eq!(heading_degrees(0, 0), 0);
    }
}
