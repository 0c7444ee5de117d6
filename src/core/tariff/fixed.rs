//! Ecopower fixed tariff («Groene Burgerstroom»): flat rates plus the excise duty.

use serde::{Deserialize, Serialize};

use crate::{
    core::{
        aggregate::EnergyAggregate,
        breakdown::MonthlyCostBreakdown,
        interval::Month,
        reading::{IntervalReading, Readings},
        tariff::{Tariff, excise::ExciseSchedule, grid::GridFees},
    },
    prelude::*,
    quantity::{cost::Cost, energy::KilowattHours, rate::KilowattHourRate},
};

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
#[must_use]
pub struct FixedTariff {
    /// Supplier subscription per month.
    pub supplier_subscription: Cost,

    /// Network operator subscription per month.
    pub network_subscription: Cost,

    /// Energy fund levy per month.
    pub energy_fund: Cost,

    /// Per delivered kilowatt-hour.
    pub energy_rate: KilowattHourRate,

    /// Paid back per injected kilowatt-hour.
    pub injection_rate: KilowattHourRate,

    /// Federal energy contribution per delivered kilowatt-hour.
    pub energy_contribution: KilowattHourRate,

    pub excise: ExciseSchedule,

    pub grid: GridFees,
}

impl Default for FixedTariff {
    fn default() -> Self {
        Self {
            supplier_subscription: Cost::from(5.0),
            network_subscription: Cost::from(2.0),
            energy_fund: Cost::from(0.005),
            energy_rate: KilowattHourRate::from(0.1187),
            injection_rate: KilowattHourRate::from(0.0200),
            energy_contribution: KilowattHourRate::from(0.001_926_1),
            excise: ExciseSchedule::default(),
            grid: GridFees::default(),
        }
    }
}

impl FixedTariff {
    pub fn fixed_cost(&self) -> Cost {
        self.supplier_subscription + self.network_subscription + self.energy_fund
    }

    /// Per-kilowatt-hour part of the energy cost, the excise being progressive on the month.
    pub fn flat_rate(&self) -> KilowattHourRate {
        self.energy_rate + self.energy_contribution
    }

    /// Energy cost of the delivered energy, excise included.
    pub fn energy_cost(&self, delivered: KilowattHours) -> Cost {
        delivered * self.flat_rate() + self.excise.excise(delivered)
    }

    pub fn energy_revenue(&self, returned: KilowattHours) -> Cost {
        returned * self.injection_rate
    }

    #[instrument(skip_all, fields(year = year, month = month))]
    pub fn calculate_monthly_cost(
        &self,
        year: i32,
        month: u32,
        consumption: &[IntervalReading],
        injection: &[IntervalReading],
    ) -> MonthlyCostBreakdown {
        let energy = EnergyAggregate::aggregate(consumption, injection);
        let grid = self.grid.apply(&energy);
        MonthlyCostBreakdown::builder()
            .year(year)
            .month(month)
            .fixed_cost(self.fixed_cost())
            .energy_cost(self.energy_cost(energy.total_kwh_delivered))
            .energy_revenue(self.energy_revenue(energy.total_kwh_returned))
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

impl Tariff for FixedTariff {
    fn name(&self) -> &'static str {
        "fixed"
    }

    fn calculate(&self, month: Month, readings: &Readings) -> MonthlyCostBreakdown {
        self.calculate_monthly_cost(
            month.year(),
            month.month(),
            &readings.consumption,
            &readings.injection,
        )
    }
}
