use std::fmt::{Debug, Display, Formatter};

use crate::quantity::Quantity;

pub type Hours = Quantity<0, 1, 0>;

impl Hours {
    /// Duration of a single metering interval.
    pub const QUARTER: Self = Self(0.25);
}

impl Display for Hours {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:.2} h", self.0)
    }
}

impl Debug for Hours {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:.2}h", self.0)
    }
}
