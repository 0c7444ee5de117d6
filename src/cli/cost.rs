use clap::{Parser, ValueEnum};

use crate::{
    billing::Billing,
    cli::billing::BillingArgs,
    config::TariffConfig,
    core::tariff::Tariff,
    prelude::*,
    tables::build_breakdown_table,
};

#[derive(Parser)]
pub struct CostArgs {
    #[clap(flatten)]
    billing: BillingArgs,

    #[clap(long, value_enum, default_value = "dynamic", env = "TARIFF")]
    tariff: TariffKind,

    /// Print JSON instead of a table.
    #[clap(long)]
    json: bool,
}

impl CostArgs {
    #[instrument(skip_all)]
    pub fn run(self) -> Result {
        let config = self.billing.tariff_config.load()?;
        let month = self.billing.month()?;
        let source = self.billing.connect()?;
        let tariff = self.tariff.select(&config);
        let breakdown =
            Billing::builder().readings(&*source).prices(&*source).build().calculate(tariff, month)?;
        if self.json {
            println!("{}", serde_json::to_string_pretty(&breakdown)?);
        } else {
            println!("{}", build_breakdown_table(&[(tariff.name(), breakdown)]));
        }
        Ok(())
    }
}

#[derive(Copy, Clone, Debug, Eq, PartialEq, ValueEnum)]
pub enum TariffKind {
    Dynamic,
    Fixed,
}

impl TariffKind {
    pub fn select(self, config: &TariffConfig) -> &dyn Tariff {
        match self {
            Self::Dynamic => &config.dynamic,
            Self::Fixed => &config.fixed,
        }
    }
}
