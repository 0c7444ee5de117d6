//! Progressive excise duty on the delivered energy.

use serde::{Deserialize, Serialize};

use crate::{
    prelude::*,
    quantity::{Quantity, cost::Cost, energy::KilowattHours, rate::KilowattHourRate},
};

#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
#[must_use]
pub struct Bracket {
    /// Inclusive upper bound of the bracket, `None` for the top one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub up_to: Option<KilowattHours>,

    /// Marginal rate inside the bracket.
    pub rate: KilowattHourRate,
}

impl Bracket {
    pub const fn bounded(up_to: f64, rate: f64) -> Self {
        Self { up_to: Some(Quantity(up_to)), rate: Quantity(rate) }
    }

    pub const fn unbounded(rate: f64) -> Self {
        Self { up_to: None, rate: Quantity(rate) }
    }
}

/// Brackets ordered by their bounds, the last one unbounded.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "Vec<Bracket>", into = "Vec<Bracket>")]
#[must_use]
pub struct ExciseSchedule(Vec<Bracket>);

impl Default for ExciseSchedule {
    fn default() -> Self {
        Self(vec![
            Bracket::bounded(3_000.0, 0.047_48),
            Bracket::bounded(20_000.0, 0.047_48),
            Bracket::bounded(50_000.0, 0.045_46),
            Bracket::unbounded(0.044_78),
        ])
    }
}

impl TryFrom<Vec<Bracket>> for ExciseSchedule {
    type Error = Error;

    fn try_from(brackets: Vec<Bracket>) -> Result<Self> {
        let Some((last, bounded)) = brackets.split_last() else {
            bail!("the excise schedule needs at least one bracket");
        };
        ensure!(last.up_to.is_none(), "the last excise bracket must be unbounded");
        let mut lower = KilowattHours::ZERO;
        for bracket in bounded {
            let Some(upper) = bracket.up_to else {
                bail!("only the last excise bracket may be unbounded");
            };
            ensure!(upper > lower, "excise bracket bounds must increase, got {upper} after {lower}");
            lower = upper;
        }
        Ok(Self(brackets))
    }
}

impl From<ExciseSchedule> for Vec<Bracket> {
    fn from(schedule: ExciseSchedule) -> Self {
        schedule.0
    }
}

impl ExciseSchedule {
    /// Duty on the total: every lower bracket in full, plus the part of the total that falls
    /// into its own bracket.
    ///
    /// A total right at a bound is taxed entirely within the lower bracket.
    pub fn excise(&self, total: KilowattHours) -> Cost {
        let mut excise = Cost::ZERO;
        let mut lower = KilowattHours::ZERO;
        for bracket in &self.0 {
            match bracket.up_to {
                Some(upper) if total > upper => {
                    excise += (upper - lower) * bracket.rate;
                    lower = upper;
                }
                _ => return excise + (total - lower) * bracket.rate,
            }
        }
        excise
    }

    pub fn brackets(&self) -> &[Bracket] {
        &self.0
    }
}
