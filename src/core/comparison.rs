use crate::{
    core::{breakdown::MonthlyCostBreakdown, tariff::fixed::FixedTariff},
    quantity::{cost::Cost, energy::KilowattHours, rate::KilowattHourRate},
};

/// The two tariffs billed over the same month.
#[derive(Copy, Clone, Debug)]
#[must_use]
pub struct Comparison {
    pub dynamic: MonthlyCostBreakdown,
    pub fixed: MonthlyCostBreakdown,

    /// Flat energy rate of the fixed tariff, to hold the dynamic average against.
    pub fixed_energy_rate: KilowattHourRate,
}

impl Comparison {
    pub const fn new(
        dynamic: MonthlyCostBreakdown,
        fixed: MonthlyCostBreakdown,
        fixed_tariff: &FixedTariff,
    ) -> Self {
        Self { dynamic, fixed, fixed_energy_rate: fixed_tariff.energy_rate }
    }

    /// Positive when the fixed tariff is more expensive.
    pub fn difference(&self) -> Cost {
        self.fixed.total_cost() - self.dynamic.total_cost()
    }

    /// Difference relative to the dynamic total, `None` if that total is zero.
    #[must_use]
    pub fn relative_difference(&self) -> Option<f64> {
        let dynamic = self.dynamic.total_cost();
        (dynamic != Cost::ZERO).then(|| self.difference() / dynamic)
    }

    /// Dynamic energy cost per delivered kilowatt-hour, grid fees excluded.
    pub fn average_dynamic_energy_rate(&self) -> KilowattHourRate {
        if self.dynamic.total_kwh_delivered == KilowattHours::ZERO {
            KilowattHourRate::ZERO
        } else {
            self.dynamic.energy_cost / self.dynamic.total_kwh_delivered
        }
    }
}
