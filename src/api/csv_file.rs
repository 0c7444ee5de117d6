//! Offline source: a directory of `timestamp,value` files.

use std::path::{Path, PathBuf};

use chrono::NaiveDateTime;
use itertools::Itertools;
use serde::Deserialize;

use crate::{
    api::parse_timestamp,
    core::{
        interval::Interval,
        reading::{IntervalReading, PricePoint},
        source::{PriceSource, ReadingSource},
    },
    prelude::*,
    quantity::{power::Kilowatts, price::MegawattHourPrice},
};

pub struct CsvFiles {
    directory: PathBuf,
}

impl CsvFiles {
    pub const CONSUMPTION: &'static str = "consumption.csv";
    pub const INJECTION: &'static str = "injection.csv";
    pub const PRICES: &'static str = "prices.csv";

    pub fn in_directory(directory: impl Into<PathBuf>) -> Self {
        Self { directory: directory.into() }
    }

    /// Rows within the interval, timestamps on the interval grid.
    #[instrument(skip_all, fields(file_name = file_name))]
    fn read<T>(
        &self,
        file_name: &str,
        interval: Interval,
        wrap: impl Fn(NaiveDateTime, f64) -> T,
    ) -> Result<Vec<T>> {
        let path = self.directory.join(file_name);
        let rows = read_rows(&path)?;
        let n_rows = rows.len();
        let values: Vec<_> = rows
            .into_iter()
            .map(|row| -> Result<_> { Ok((parse_timestamp(&row.timestamp)?, row.value)) })
            .filter_ok(|(timestamp, _)| interval.contains(*timestamp))
            .map_ok(|(timestamp, value)| wrap(timestamp, value))
            .collect::<Result<_>>()
            .with_context(|| format!("bad row in `{}`", path.display()))?;
        info!(n_rows, n_selected = values.len(), "read");
        Ok(values)
    }
}

impl ReadingSource for CsvFiles {
    fn get_consumption_readings(&self, interval: Interval) -> Result<Vec<IntervalReading>> {
        self.read(Self::CONSUMPTION, interval, |timestamp, value| {
            IntervalReading::new(timestamp, Kilowatts::from(value))
        })
    }

    fn get_injection_readings(&self, interval: Interval) -> Result<Vec<IntervalReading>> {
        self.read(Self::INJECTION, interval, |timestamp, value| {
            IntervalReading::new(timestamp, Kilowatts::from(value))
        })
    }
}

impl PriceSource for CsvFiles {
    fn get_prices(&self, interval: Interval) -> Result<Vec<PricePoint>> {
        self.read(Self::PRICES, interval, |timestamp, value| {
            PricePoint::new(timestamp, MegawattHourPrice(value))
        })
    }
}

#[derive(Deserialize)]
struct Row {
    timestamp: String,
    value: f64,
}

fn read_rows(path: &Path) -> Result<Vec<Row>> {
    csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_path(path)
        .with_context(|| format!("failed to open `{}`", path.display()))?
        .deserialize()
        .collect::<Result<Vec<Row>, _>>()
        .with_context(|| format!("failed to read `{}`", path.display()))
}
