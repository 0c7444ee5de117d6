use std::{
    fmt::{Debug, Display, Formatter},
    ops::Div,
};

use crate::quantity::{Quantity, energy::KilowattHours, rate::KilowattHourRate};

/// Euro.
pub type Cost = Quantity<0, 0, 1>;

impl Display for Cost {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:.2} €", self.0)
    }
}

impl Debug for Cost {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:.4}€", self.0)
    }
}

impl Div<KilowattHours> for Cost {
    type Output = KilowattHourRate;

    fn div(self, rhs: KilowattHours) -> Self::Output {
        Quantity(self.0 / rhs.0)
    }
}

#[cfg(test)]
mod tests {
    use approx::assert_abs_diff_eq;

    use super::*;

    #[test]
    fn test_average_rate() {
        let rate = Cost::from(12.0) / KilowattHours::from(100.0);
        assert_abs_diff_eq!(rate.0, 0.12);
    }

    #[test]
    fn test_display() {
        assert_eq!(Cost::from(-1.5).to_string(), "-1.50 €");
        assert_eq!(Cost::from(7.0).to_string(), "7.00 €");
    }
}
