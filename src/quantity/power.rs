use std::{
    fmt::{Debug, Display, Formatter},
    ops::Mul,
};

use crate::quantity::{
    Quantity,
    cost::Cost,
    energy::KilowattHours,
    rate::KilowattRate,
    time::Hours,
};

pub type Kilowatts = Quantity<1, 0, 0>;

impl Display for Kilowatts {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:.2} kW", self.0)
    }
}

impl Debug for Kilowatts {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:.3}kW", self.0)
    }
}

impl Mul<Hours> for Kilowatts {
    type Output = KilowattHours;

    fn mul(self, rhs: Hours) -> Self::Output {
        Quantity(self.0 * rhs.0)
    }
}

/// Yearly capacity charge for the given peak.
impl Mul<KilowattRate> for Kilowatts {
    type Output = Cost;

    fn mul(self, rhs: KilowattRate) -> Self::Output {
        Quantity(self.0 * rhs.0)
    }
}

#[cfg(test)]
mod tests {
    use approx::assert_abs_diff_eq;

    use super::*;

    #[test]
    fn test_quarter_hour_energy() {
        assert_abs_diff_eq!((Kilowatts::from(2.0) * Hours::QUARTER).0, 0.5);
    }

    #[test]
    fn test_display() {
        assert_eq!(Kilowatts::from(3.456).to_string(), "3.46 kW");
    }
}
