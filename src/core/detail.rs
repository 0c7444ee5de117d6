//! Per-interval view of a month, for checking a bill line by line.

use std::collections::BTreeMap;

use chrono::NaiveDateTime;

use crate::{
    core::{
        reading::Readings,
        tariff::{dynamic::DynamicTariff, fixed::FixedTariff},
    },
    quantity::{
        cost::Cost,
        energy::KilowattHours,
        power::Kilowatts,
        price::MegawattHourPrice,
        time::Hours,
    },
};

#[derive(Copy, Clone, Debug, PartialEq)]
#[must_use]
pub struct IntervalDetail {
    pub timestamp: NaiveDateTime,
    pub consumption: Kilowatts,
    pub injection: Kilowatts,

    /// `None` when the price is missing, billed at zero.
    pub price: Option<MegawattHourPrice>,

    pub dynamic_cost: Cost,
    pub dynamic_revenue: Cost,

    /// Flat rate only: the excise depends on the monthly total.
    pub fixed_cost: Cost,

    pub fixed_revenue: Cost,
}

impl IntervalDetail {
    pub fn delivered(&self) -> KilowattHours {
        self.consumption * Hours::QUARTER
    }

    pub fn returned(&self) -> KilowattHours {
        self.injection * Hours::QUARTER
    }

    pub fn dynamic_net(&self) -> Cost {
        self.dynamic_cost - self.dynamic_revenue
    }

    pub fn fixed_net(&self) -> Cost {
        self.fixed_cost - self.fixed_revenue
    }

    /// Every interval with any consumption or injection, in chronological order.
    pub fn collect(
        readings: &Readings,
        dynamic: &DynamicTariff,
        fixed: &FixedTariff,
    ) -> Vec<Self> {
        let mut powers: BTreeMap<NaiveDateTime, (Kilowatts, Kilowatts)> = BTreeMap::new();
        for reading in &readings.consumption {
            powers.entry(reading.timestamp()).or_default().0 = reading.power();
        }
        for reading in &readings.injection {
            powers.entry(reading.timestamp()).or_default().1 = reading.power();
        }
        powers
            .into_iter()
            .filter(|(_, (consumption, injection))| {
                *consumption > Kilowatts::ZERO || *injection > Kilowatts::ZERO
            })
            .map(|(timestamp, (consumption, injection))| {
                let price = readings.prices.get(timestamp);
                let wholesale = price.unwrap_or(MegawattHourPrice::ZERO);
                let mut detail = Self {
                    timestamp,
                    consumption,
                    injection,
                    price,
                    dynamic_cost: Cost::ZERO,
                    dynamic_revenue: Cost::ZERO,
                    fixed_cost: Cost::ZERO,
                    fixed_revenue: Cost::ZERO,
                };
                let (delivered, returned) = (detail.delivered(), detail.returned());
                detail.dynamic_cost = delivered * dynamic.cost_per_kwh(wholesale);
                detail.dynamic_revenue = returned * dynamic.revenue_per_kwh(wholesale);
                detail.fixed_cost = delivered * fixed.flat_rate();
                detail.fixed_revenue = returned * fixed.injection_rate;
                detail
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use approx::assert_abs_diff_eq;
    use chrono::NaiveDate;

    use super::*;
    use crate::core::reading::{IntervalReading, PricePoint};

    fn at(hour: u32, minute: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, 1, 10).unwrap().and_hms_opt(hour, minute, 0).unwrap()
    }

    fn readings() -> Readings {
        Readings {
            consumption: vec![
                IntervalReading::new(at(10, 15), Kilowatts::from(4.0)),
                IntervalReading::new(at(10, 0), Kilowatts::from(2.0)),
                IntervalReading::new(at(10, 30), Kilowatts::ZERO),
            ],
            injection: vec![IntervalReading::new(at(10, 15), Kilowatts::from(8.0))],
            prices: [
                PricePoint::new(at(10, 0), MegawattHourPrice(100.0)),
                PricePoint::new(at(10, 30), MegawattHourPrice(100.0)),
            ]
            .into_iter()
            .collect(),
        }
    }

    #[test]
    fn test_collect() {
        let details =
            IntervalDetail::collect(&readings(), &DynamicTariff::default(), &FixedTariff::default());
        assert_eq!(details.len(), 2);

        let first = details[0];
        assert_eq!(first.timestamp, at(10, 0));
        assert_eq!(first.price, Some(MegawattHourPrice(100.0)));
        assert_abs_diff_eq!(first.dynamic_cost.0, 0.5 * 0.106, epsilon = 1e-12);
        assert_abs_diff_eq!(first.fixed_cost.0, 0.5 * (0.1187 + 0.001_926_1), epsilon = 1e-12);
        assert_abs_diff_eq!(first.dynamic_revenue.0, 0.0);

        let second = details[1];
        assert_eq!(second.timestamp, at(10, 15));
        assert_eq!(second.price, None);
        assert_abs_diff_eq!(second.dynamic_cost.0, 1.0 * 0.004, epsilon = 1e-12);
        assert_abs_diff_eq!(second.dynamic_revenue.0, 2.0 * -0.015, epsilon = 1e-12);
        assert_abs_diff_eq!(second.fixed_revenue.0, 2.0 * 0.02, epsilon = 1e-12);
    }

    #[test]
    fn test_dynamic_totals_match_the_bill() {
        let readings = readings();
        let tariff = DynamicTariff::default();
        let details = IntervalDetail::collect(&readings, &tariff, &FixedTariff::default());
        let breakdown = tariff.calculate_monthly_cost(
            2024,
            1,
            &readings.consumption,
            &readings.injection,
            &readings.prices,
        );
        let energy_cost: Cost = details.iter().map(|detail| detail.dynamic_cost).sum();
        let energy_revenue: Cost = details.iter().map(|detail| detail.dynamic_revenue).sum();
        assert_abs_diff_eq!(energy_cost.0, breakdown.energy_cost.0, epsilon = 1e-12);
        assert_abs_diff_eq!(energy_revenue.0, breakdown.energy_revenue.0, epsilon = 1e-12);
    }
}
