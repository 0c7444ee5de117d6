use std::collections::HashMap;

use chrono::NaiveDateTime;
use serde::Serialize;

use crate::{
    core::interval::{WallClock, floor_to_interval},
    quantity::{energy::KilowattHours, power::Kilowatts, price::MegawattHourPrice, time::Hours},
};

/// Average power over the quarter-hour starting at [`IntervalReading::timestamp`].
///
/// The timestamp is floored to the interval grid on construction.
#[derive(Copy, Clone, Debug, PartialEq, Serialize)]
#[must_use]
pub struct IntervalReading {
    timestamp: NaiveDateTime,
    power: Kilowatts,
}

impl IntervalReading {
    pub fn new(timestamp: impl WallClock, power: Kilowatts) -> Self {
        Self { timestamp: floor_to_interval(timestamp), power }
    }

    #[must_use]
    pub const fn timestamp(&self) -> NaiveDateTime {
        self.timestamp
    }

    pub const fn power(&self) -> Kilowatts {
        self.power
    }

    pub fn energy(&self) -> KilowattHours {
        self.power * Hours::QUARTER
    }
}

/// Wholesale price of the quarter-hour starting at [`PricePoint::timestamp`].
#[derive(Copy, Clone, Debug, PartialEq, Serialize)]
#[must_use]
pub struct PricePoint {
    timestamp: NaiveDateTime,
    price: MegawattHourPrice,
}

impl PricePoint {
    pub fn new(timestamp: impl WallClock, price: MegawattHourPrice) -> Self {
        Self { timestamp: floor_to_interval(timestamp), price }
    }

    #[must_use]
    pub const fn timestamp(&self) -> NaiveDateTime {
        self.timestamp
    }

    pub const fn price(&self) -> MegawattHourPrice {
        self.price
    }
}

/// Prices keyed by interval start.
///
/// Collecting from points keeps the last price of a duplicate timestamp.
#[derive(Clone, Debug, Default)]
#[must_use]
pub struct PriceSeries(HashMap<NaiveDateTime, MegawattHourPrice>);

impl PriceSeries {
    #[must_use]
    pub fn get(&self, timestamp: NaiveDateTime) -> Option<MegawattHourPrice> {
        self.0.get(&timestamp).copied()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl FromIterator<PricePoint> for PriceSeries {
    fn from_iter<T: IntoIterator<Item = PricePoint>>(iter: T) -> Self {
        Self(iter.into_iter().map(|point| (point.timestamp, point.price)).collect())
    }
}

/// Everything a tariff needs to bill one month.
#[derive(Clone, Debug, Default)]
#[must_use]
pub struct Readings {
    pub consumption: Vec<IntervalReading>,
    pub injection: Vec<IntervalReading>,

    /// Left empty for tariffs that do not look at prices.
    pub prices: PriceSeries,
}
