//! Ecopower dynamic tariff, indexed on the EPEX day-ahead price of every quarter-hour.

use serde::{Deserialize, Serialize};

use crate::{
    core::{
        aggregate::EnergyAggregate,
        breakdown::MonthlyCostBreakdown,
        interval::Month,
        reading::{IntervalReading, PriceSeries, Readings},
        tariff::{Tariff, grid::GridFees},
    },
    prelude::*,
    quantity::{cost::Cost, price::MegawattHourPrice, rate::KilowattHourRate},
};

/// Affine map from the wholesale price to a kilowatt-hour rate.
#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
#[must_use]
pub struct PriceFormula {
    /// Euro per kilowatt-hour for every euro per megawatt-hour.
    pub coefficient: f64,

    pub offset: KilowattHourRate,
}

impl PriceFormula {
    pub fn apply(&self, price: MegawattHourPrice) -> KilowattHourRate {
        KilowattHourRate::from(self.coefficient * price.0) + self.offset
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
#[must_use]
pub struct DynamicTariff {
    /// Supplier subscription per month.
    pub supplier_subscription: Cost,

    /// Network operator subscription per month.
    pub network_subscription: Cost,

    /// What a delivered kilowatt-hour costs.
    pub consumption: PriceFormula,

    /// What an injected kilowatt-hour pays back.
    pub injection: PriceFormula,

    pub grid: GridFees,
}

impl Default for DynamicTariff {
    fn default() -> Self {
        Self {
            supplier_subscription: Cost::from(5.0),
            network_subscription: Cost::from(2.0),
            consumption: PriceFormula {
                coefficient: 0.001_02,
                offset: KilowattHourRate::from(0.004),
            },
            injection: PriceFormula {
                coefficient: 0.000_98,
                offset: KilowattHourRate::from(-0.015),
            },
            grid: GridFees::default(),
        }
    }
}

impl DynamicTariff {
    pub fn fixed_cost(&self) -> Cost {
        self.supplier_subscription + self.network_subscription
    }

    pub fn cost_per_kwh(&self, price: MegawattHourPrice) -> KilowattHourRate {
        self.consumption.apply(price)
    }

    pub fn revenue_per_kwh(&self, price: MegawattHourPrice) -> KilowattHourRate {
        self.injection.apply(price)
    }

    #[instrument(skip_all, fields(year = year, month = month))]
    pub fn calculate_monthly_cost(
        &self,
        year: i32,
        month: u32,
        consumption: &[IntervalReading],
        injection: &[IntervalReading],
        prices: &PriceSeries,
    ) -> MonthlyCostBreakdown {
        let mut n_missing_prices = 0_usize;
        let mut price_at = |reading: &IntervalReading| {
            prices.get(reading.timestamp()).unwrap_or_else(|| {
                n_missing_prices += 1;
                MegawattHourPrice::ZERO
            })
        };

        let energy_cost: Cost = consumption
            .iter()
            .map(|reading| reading.energy() * self.cost_per_kwh(price_at(reading)))
            .sum();
        let energy_revenue: Cost = injection
            .iter()
            .map(|reading| reading.energy() * self.revenue_per_kwh(price_at(reading)))
            .sum();
        if n_missing_prices != 0 {
            warn!(n_missing_prices, "no price for some intervals, billed at zero price");
        }

        let energy = EnergyAggregate::aggregate(consumption, injection);
        let grid = self.grid.apply(&energy);
        MonthlyCostBreakdown::builder()
            .year(year)
            .month(month)
            .fixed_cost(self.fixed_cost())
            .energy_cost(energy_cost)
            .energy_revenue(energy_revenue)
            .distribution_cost(grid.distribution_cost)
            .injection_cost(grid.injection_cost)
            .gsc_cost(grid.gsc_cost)
            .wkk_cost(grid.wkk_cost)
            .capacity_cost(grid.capacity_cost)
            .total_kwh_delivered(energy.total_kwh_delivered)
            .total_kwh_returned(energy.total_kwh_returned)
            .peak_power_kw(energy.peak_power_kw)
            .build()
    }
}

impl Tariff for DynamicTariff {
    fn name(&self) -> &'static str {
        "dynamic"
    }

    fn requires_prices(&self) -> bool {
        true
    }

    fn calculate(&self, month: Month, readings: &Readings) -> MonthlyCostBreakdown {
        self.calculate_monthly_cost(
            month.year(),
            month.month(),
            &readings.consumption,
            &readings.injection,
            &readings.prices,
        )
    }
}

#[cfg(test)]
mod tests {
    use approx::assert_abs_diff_eq;
    use chrono::{NaiveDate, NaiveDateTime};

    use super::*;
    use crate::{core::reading::PricePoint, quantity::power::Kilowatts};

    fn at(hour: u32, minute: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2025, 10, 1).unwrap().and_hms_opt(hour, minute, 0).unwrap()
    }

    fn reading(hour: u32, minute: u32, power: f64) -> IntervalReading {
        IntervalReading::new(at(hour, minute), Kilowatts::from(power))
    }

    fn prices(points: &[(u32, u32, f64)]) -> PriceSeries {
        points
            .iter()
            .map(|&(hour, minute, price)| PricePoint::new(at(hour, minute), MegawattHourPrice(price)))
            .collect()
    }

    #[test]
    fn test_fixed_cost() {
        assert_abs_diff_eq!(DynamicTariff::default().fixed_cost().0, 7.0);
    }

    #[test]
    fn test_rates_at_100() {
        let tariff = DynamicTariff::default();
        assert_abs_diff_eq!(tariff.cost_per_kwh(MegawattHourPrice(100.0)).0, 0.106, epsilon = 1e-12);
        assert_abs_diff_eq!(tariff.revenue_per_kwh(MegawattHourPrice(100.0)).0, 0.083, epsilon = 1e-12);
    }

    #[test]
    fn test_rates_increase_with_price() {
        let tariff = DynamicTariff::default();
        for (lower, higher) in [(-50.0, 0.0), (0.0, 0.01), (50.0, 150.0), (150.0, 500.0)] {
            let (lower, higher) = (MegawattHourPrice(lower), MegawattHourPrice(higher));
            assert!(tariff.cost_per_kwh(lower) < tariff.cost_per_kwh(higher));
            assert!(tariff.revenue_per_kwh(lower) < tariff.revenue_per_kwh(higher));
        }
    }

    #[test]
    fn test_calculate_monthly_cost() {
        let consumption = [reading(0, 0, 2.0), reading(0, 15, 4.0)];
        let injection = [reading(12, 0, 8.0)];
        let prices = prices(&[(0, 0, 100.0), (0, 15, 50.0), (12, 0, 20.0)]);

        let breakdown = DynamicTariff::default()
            .calculate_monthly_cost(2025, 10, &consumption, &injection, &prices);

        assert_eq!(breakdown.year, 2025);
        assert_eq!(breakdown.month, 10);
        assert_abs_diff_eq!(breakdown.total_kwh_delivered.0, 1.5);
        assert_abs_diff_eq!(breakdown.total_kwh_returned.0, 2.0);
        assert_abs_diff_eq!(breakdown.peak_power_kw.0, 4.0);
        assert_abs_diff_eq!(breakdown.fixed_cost.0, 7.0);
        // 0.5 kWh at 0.106 plus 1 kWh at 0.055:
        assert_abs_diff_eq!(breakdown.energy_cost.0, 0.053 + 0.055, epsilon = 1e-12);
        // 2 kWh at 0.0046:
        assert_abs_diff_eq!(breakdown.energy_revenue.0, 0.0092, epsilon = 1e-12);
        assert_abs_diff_eq!(breakdown.distribution_cost.0, 1.5 * 0.070_438_6, epsilon = 1e-12);
        assert_abs_diff_eq!(breakdown.injection_cost.0, 2.0 * 0.001_751, epsilon = 1e-12);
        assert_abs_diff_eq!(breakdown.gsc_cost.0, 1.5 * 0.011, epsilon = 1e-12);
        assert_abs_diff_eq!(breakdown.wkk_cost.0, 1.5 * 0.003_92, epsilon = 1e-12);
        assert_abs_diff_eq!(breakdown.capacity_cost.0, 4.0 * 56.93 / 12.0, epsilon = 1e-12);
    }

    #[test]
    fn test_missing_price_is_zero() {
        let consumption = [reading(0, 0, 4.0)];
        let breakdown = DynamicTariff::default().calculate_monthly_cost(
            2025,
            10,
            &consumption,
            &[],
            &PriceSeries::default(),
        );
        // 1 kWh at the bare offset:
        assert_abs_diff_eq!(breakdown.energy_cost.0, 0.004, epsilon = 1e-12);
    }

    #[test]
    fn test_injection_uses_its_own_timestamps() {
        let injection = [reading(12, 0, 4.0)];
        let prices = prices(&[(0, 0, 1000.0), (12, 0, 100.0)]);
        let breakdown =
            DynamicTariff::default().calculate_monthly_cost(2025, 10, &[], &injection, &prices);
        assert_abs_diff_eq!(breakdown.energy_revenue.0, 0.083, epsilon = 1e-12);
    }

    #[test]
    fn test_empty_readings() {
        let breakdown = DynamicTariff::default().calculate_monthly_cost(
            2025,
            10,
            &[],
            &[],
            &PriceSeries::default(),
        );
        assert_abs_diff_eq!(breakdown.total_kwh_delivered.0, 0.0);
        assert_abs_diff_eq!(breakdown.total_kwh_returned.0, 0.0);
        assert_abs_diff_eq!(breakdown.peak_power_kw.0, 0.0);
        assert_abs_diff_eq!(breakdown.energy_cost.0, 0.0);
        assert_abs_diff_eq!(breakdown.total_cost().0, breakdown.fixed_cost.0);
    }

    #[test]
    fn test_total_cost_identity() {
        let consumption = [reading(7, 0, 1.3), reading(7, 15, 2.7), reading(19, 45, 5.1)];
        let injection = [reading(13, 0, 3.3)];
        let prices = prices(&[(7, 0, 87.5), (7, 15, 92.1), (13, 0, -4.0), (19, 45, 210.0)]);
        let breakdown = DynamicTariff::default()
            .calculate_monthly_cost(2025, 10, &consumption, &injection, &prices);
        let expected = breakdown.fixed_cost.0
            + breakdown.energy_cost.0
            + breakdown.distribution_cost.0
            + breakdown.injection_cost.0
            + breakdown.gsc_cost.0
            + breakdown.wkk_cost.0
            + breakdown.capacity_cost.0
            - breakdown.energy_revenue.0;
        assert_abs_diff_eq!(breakdown.total_cost().0, expected, epsilon = 1e-12);
    }

    #[test]
    fn test_tariff_trait() -> Result {
        let readings = Readings {
            consumption: vec![reading(0, 0, 4.0)],
            injection: Vec::new(),
            prices: prices(&[(0, 0, 100.0)]),
        };
        let tariff = DynamicTariff::default();
        assert!(tariff.requires_prices());
        let breakdown = tariff.calculate(Month::try_new(2025, 10)?, &readings);
        assert_eq!((breakdown.year, breakdown.month), (2025, 10));
        assert_abs_diff_eq!(breakdown.energy_cost.0, 0.106, epsilon = 1e-12);
        Ok(())
    }
}
