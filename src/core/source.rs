use crate::{
    core::{
        interval::Interval,
        reading::{IntervalReading, PricePoint},
    },
    prelude::*,
};

/// Meter readings over a half-open interval, timestamps already on the interval grid.
pub trait ReadingSource {
    fn get_consumption_readings(&self, interval: Interval) -> Result<Vec<IntervalReading>>;

    fn get_injection_readings(&self, interval: Interval) -> Result<Vec<IntervalReading>>;
}

/// Wholesale prices over a half-open interval.
pub trait PriceSource {
    fn get_prices(&self, interval: Interval) -> Result<Vec<PricePoint>>;
}

/// Both at once, so that the sources can be picked at runtime.
pub trait DataSource: ReadingSource + PriceSource {}

impl<T: ReadingSource + PriceSource> DataSource for T {}
