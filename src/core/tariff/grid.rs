use serde::{Deserialize, Serialize};

use crate::{
    core::aggregate::EnergyAggregate,
    quantity::{
        cost::Cost,
        rate::{KilowattHourRate, KilowattRate},
    },
};

/// Network operator fees and levies proportional to the monthly totals.
#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
#[must_use]
pub struct GridFees {
    /// Per delivered kilowatt-hour.
    pub distribution: KilowattHourRate,

    /// Per injected kilowatt-hour.
    pub injection: KilowattHourRate,

    /// Green power certificates, per delivered kilowatt-hour.
    pub gsc: KilowattHourRate,

    /// Combined heat and power certificates, per delivered kilowatt-hour.
    pub wkk: KilowattHourRate,

    /// Per kilowatt of the monthly consumption peak, per year.
    pub capacity: KilowattRate,
}

impl Default for GridFees {
    fn default() -> Self {
        Self {
            distribution: KilowattHourRate::from(0.070_438_6),
            injection: KilowattHourRate::from(0.001_751_0),
            gsc: KilowattHourRate::from(0.011),
            wkk: KilowattHourRate::from(0.003_92),
            capacity: KilowattRate::from(56.93),
        }
    }
}

#[derive(Copy, Clone, Debug, PartialEq)]
#[must_use]
pub struct GridCosts {
    pub distribution_cost: Cost,
    pub injection_cost: Cost,
    pub gsc_cost: Cost,
    pub wkk_cost: Cost,
    pub capacity_cost: Cost,
}

impl GridFees {
    pub fn apply(&self, energy: &EnergyAggregate) -> GridCosts {
        GridCosts {
            distribution_cost: energy.total_kwh_delivered * self.distribution,
            injection_cost: energy.total_kwh_returned * self.injection,
            gsc_cost: energy.total_kwh_delivered * self.gsc,
            wkk_cost: energy.total_kwh_delivered * self.wkk,
            capacity_cost: self.monthly_capacity_cost(energy),
        }
    }

    fn monthly_capacity_cost(&self, energy: &EnergyAggregate) -> Cost {
        (energy.peak_power_kw * self.capacity) / 12.0
    }
}
