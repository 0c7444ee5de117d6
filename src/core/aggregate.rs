use crate::{
    core::reading::IntervalReading,
    quantity::{energy::KilowattHours, power::Kilowatts},
};

/// Energy totals of a billing period.
#[derive(Copy, Clone, Debug, Default, PartialEq)]
#[must_use]
pub struct EnergyAggregate {
    pub total_kwh_delivered: KilowattHours,
    pub total_kwh_returned: KilowattHours,

    /// Highest consumption power. Injection peaks are not billed and not tracked.
    pub peak_power_kw: Kilowatts,
}

impl EnergyAggregate {
    /// Sum up the quarter-hour energies of both streams.
    ///
    /// Order does not matter, and duplicate timestamps count as separate samples.
    /// The peak starts at zero, so a stream of negative readings yields a zero peak.
    pub fn aggregate(consumption: &[IntervalReading], injection: &[IntervalReading]) -> Self {
        Self {
            total_kwh_delivered: consumption.iter().map(IntervalReading::energy).sum(),
            total_kwh_returned: injection.iter().map(IntervalReading::energy).sum(),
            peak_power_kw: consumption
                .iter()
                .map(IntervalReading::power)
                .fold(Kilowatts::ZERO, Kilowatts::max),
        }
    }
}
