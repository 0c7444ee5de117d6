mod billing;
mod breakdown;
mod compare;
mod cost;
mod rates;
mod source;

use clap::{Parser, Subcommand};

use crate::{
    cli::{breakdown::BreakdownArgs, compare::CompareArgs, cost::CostArgs, rates::RatesArgs},
    prelude::*,
};

#[derive(Parser)]
#[command(author, version, about, propagate_version = true)]
#[must_use]
pub struct Args {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand)]
pub enum Command {
    /// Bill the month under one tariff.
    #[clap(name = "cost")]
    Cost(Box<CostArgs>),

    /// Bill the month under both tariffs and tell which one is cheaper.
    #[clap(name = "compare")]
    Compare(Box<CompareArgs>),

    /// Show every quarter-hour of the month.
    #[clap(name = "breakdown")]
    Breakdown(Box<BreakdownArgs>),

    /// Show the effective rate tables.
    #[clap(name = "rates")]
    Rates(RatesArgs),
}

impl Command {
    pub fn run(self) -> Result {
        match self {
            Self::Cost(args) => args.run(),
            Self::Compare(args) => args.run(),
            Self::Breakdown(args) => args.run(),
            Self::Rates(args) => args.run(),
        }
    }
}

#[cfg(test)]
mod tests {
    use clap::CommandFactory;

    use super::*;

    #[test]
    fn test_verify_args() {
        Args::command().debug_assert();
    }

    #[test]
    fn test_parse_cost() -> Result {
        let args = Args::try_parse_from([
            "ecopower",
            "cost",
            "--tariff",
            "fixed",
            "--month",
            "2024-02",
            "--from-csv",
            "/tmp/ecopower",
            "--json",
        ])?;
        assert!(matches!(args.command, Command::Cost(_)));
        Ok(())
    }

    #[test]
    fn test_parse_invalid_month() {
        let result = Args::try_parse_from(["ecopower", "compare", "--month", "2024-13"]);
        assert!(result.is_err());
    }
}
