use std::fmt::{Debug, Display, Formatter};

use crate::quantity::Quantity;

/// Euro per kilowatt-hour.
pub type KilowattHourRate = Quantity<-1, -1, 1>;

impl Display for KilowattHourRate {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:.4} €/kWh", self.0)
    }
}

impl Debug for KilowattHourRate {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:.5}€/kWh", self.0)
    }
}

/// Euro per kilowatt of monthly peak, billed yearly.
pub type KilowattRate = Quantity<-1, 0, 1>;

impl Display for KilowattRate {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:.2} €/kW/year", self.0)
    }
}

impl Debug for KilowattRate {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:.2}€/kW/year", self.0)
    }
}
