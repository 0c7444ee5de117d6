pub mod dynamic;
pub mod excise;
pub mod fixed;
pub mod grid;

use crate::core::{breakdown::MonthlyCostBreakdown, interval::Month, reading::Readings};

/// A way to turn a month of readings into a bill.
pub trait Tariff {
    fn name(&self) -> &'static str;

    /// Whether [`Tariff::calculate`] looks at [`Readings::prices`].
    fn requires_prices(&self) -> bool {
        false
    }

    fn calculate(&self, month: Month, readings: &Readings) -> MonthlyCostBreakdown;
}
