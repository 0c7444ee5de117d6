use std::fmt::{Debug, Display, Formatter};

use serde::{Deserialize, Serialize};

/// Wholesale day-ahead price in euro per megawatt-hour.
///
/// Kept apart from [`crate::quantity::rate::KilowattHourRate`] because tariff formulas
/// take it as is, without rescaling to kilowatt-hours.
#[derive(
    Clone,
    Copy,
    Default,
    Deserialize,
    PartialEq,
    PartialOrd,
    Serialize,
    derive_more::From,
    derive_more::FromStr,
)]
#[serde(transparent)]
#[must_use]
pub struct MegawattHourPrice(pub f64);

impl MegawattHourPrice {
    pub const ZERO: Self = Self(0.0);
}

impl Display for MegawattHourPrice {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:.2} €/MWh", self.0)
    }
}

impl Debug for MegawattHourPrice {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:.2}€/MWh", self.0)
    }
}
