use std::fmt::{Debug, Display, Formatter};

/// Signed ratio rendered as a percentage.
pub struct FormattedPercentage(pub f64);

impl Debug for FormattedPercentage {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        Display::fmt(self, f)
    }
}

impl Display for FormattedPercentage {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:+.1}%", self.0 * 100.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display() {
        assert_eq!(FormattedPercentage(0.2).to_string(), "+20.0%");
        assert_eq!(FormattedPercentage(-0.05).to_string(), "-5.0%");
    }
}
