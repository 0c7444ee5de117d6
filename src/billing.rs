use bon::Builder;

use crate::{
    core::{
        breakdown::MonthlyCostBreakdown,
        interval::Month,
        reading::{PriceSeries, Readings},
        source::{PriceSource, ReadingSource},
        tariff::Tariff,
    },
    prelude::*,
};

/// Pulls one month of data out of the sources and bills it.
#[derive(Builder)]
pub struct Billing<'a> {
    readings: &'a dyn ReadingSource,
    prices: &'a dyn PriceSource,
}

impl Billing<'_> {
    /// Prices are only fetched when asked for.
    #[instrument(skip_all, fields(month = %month, with_prices = with_prices))]
    pub fn fetch(&self, month: Month, with_prices: bool) -> Result<Readings> {
        let interval = month.interval();
        let consumption = self
            .readings
            .get_consumption_readings(interval)
            .context("failed to fetch the consumption readings")?;
        let injection = self
            .readings
            .get_injection_readings(interval)
            .context("failed to fetch the injection readings")?;
        let prices = if with_prices {
            self.prices.get_prices(interval).context("failed to fetch the prices")?.into_iter().collect()
        } else {
            PriceSeries::default()
        };
        let readings = Readings { consumption, injection, prices };
        info!(
            n_consumption = readings.consumption.len(),
            n_injection = readings.injection.len(),
            n_prices = readings.prices.len(),
            "fetched",
        );
        Ok(readings)
    }

    #[instrument(skip_all, fields(tariff = tariff.name(), month = %month))]
    pub fn calculate(&self, tariff: &dyn Tariff, month: Month) -> Result<MonthlyCostBreakdown> {
        let readings = self.fetch(month, tariff.requires_prices())?;
        let breakdown = tariff.calculate(month, &readings);
        info!(total_cost = %breakdown.total_cost(), "calculated");
        Ok(breakdown)
    }
}
