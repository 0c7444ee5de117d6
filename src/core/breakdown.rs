use bon::Builder;
use serde::{Serialize, Serializer, ser::SerializeStruct};

use crate::quantity::{
    cost::Cost,
    energy::KilowattHours,
    power::Kilowatts,
    rate::KilowattHourRate,
};

/// Flat VAT on electricity for residential customers.
pub const VAT_RATE: f64 = 0.06;

/// Itemized bill of one month, the same shape for every tariff.
#[derive(Copy, Clone, Debug, PartialEq, Builder)]
#[must_use]
pub struct MonthlyCostBreakdown {
    pub year: i32,
    pub month: u32,

    /// Subscriptions and monthly levies.
    pub fixed_cost: Cost,

    pub energy_cost: Cost,

    /// Paid back for the injected energy, subtracted from the total.
    pub energy_revenue: Cost,

    pub distribution_cost: Cost,
    pub injection_cost: Cost,

    /// Green power certificates.
    pub gsc_cost: Cost,

    /// Combined heat and power certificates.
    pub wkk_cost: Cost,

    pub capacity_cost: Cost,

    pub total_kwh_delivered: KilowattHours,
    pub total_kwh_returned: KilowattHours,
    pub peak_power_kw: Kilowatts,
}

impl MonthlyCostBreakdown {
    pub fn total_cost(&self) -> Cost {
        self.fixed_cost
            + self.energy_cost
            + self.distribution_cost
            + self.injection_cost
            + self.gsc_cost
            + self.wkk_cost
            + self.capacity_cost
            - self.energy_revenue
    }

    /// Zero when nothing was delivered.
    pub fn average_price_per_kwh_ex_vat(&self) -> KilowattHourRate {
        if self.total_kwh_delivered == KilowattHours::ZERO {
            KilowattHourRate::ZERO
        } else {
            self.total_cost() / self.total_kwh_delivered
        }
    }

    /// Zero when nothing was delivered.
    pub fn average_price_per_kwh_incl_vat(&self) -> KilowattHourRate {
        self.average_price_per_kwh_ex_vat() * (1.0 + VAT_RATE)
    }
}

/// Includes the derived totals so that consumers need not recompute them.
impl Serialize for MonthlyCostBreakdown {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut state = serializer.serialize_struct("MonthlyCostBreakdown", 16)?;
        state.serialize_field("year", &self.year)?;
        state.serialize_field("month", &self.month)?;
        state.serialize_field("fixed_cost", &self.fixed_cost)?;
        state.serialize_field("energy_cost", &self.energy_cost)?;
        state.serialize_field("energy_revenue", &self.energy_revenue)?;
        state.serialize_field("distribution_cost", &self.distribution_cost)?;
        state.serialize_field("injection_cost", &self.injection_cost)?;
        state.serialize_field("gsc_cost", &self.gsc_cost)?;
        state.serialize_field("wkk_cost", &self.wkk_cost)?;
        state.serialize_field("capacity_cost", &self.capacity_cost)?;
        state.serialize_field("total_kwh_delivered", &self.total_kwh_delivered)?;
        state.serialize_field("total_kwh_returned", &self.total_kwh_returned)?;
        state.serialize_field("peak_power_kw", &self.peak_power_kw)?;
        state.serialize_field("total_cost", &self.total_cost())?;
        state.serialize_field(
            "average_price_per_kwh_ex_vat",
            &self.average_price_per_kwh_ex_vat(),
        )?;
        state.serialize_field(
            "average_price_per_kwh_incl_vat",
            &self.average_price_per_kwh_incl_vat(),
        )?;
        state.end()
    }
}
