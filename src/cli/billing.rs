use std::path::PathBuf;

use clap::Parser;

use crate::{
    cli::source::SourceArgs,
    config::TariffConfig,
    core::{interval::Month, source::DataSource},
    prelude::*,
};

/// What every billing command needs: the month, the rates, and the data.
#[derive(Parser)]
pub struct BillingArgs {
    /// Month to bill as `YYYY-MM`, defaults to the current one.
    #[clap(long, env = "MONTH")]
    month: Option<Month>,

    #[clap(flatten)]
    pub tariff_config: TariffConfigArgs,

    #[clap(flatten)]
    source: SourceArgs,
}

impl BillingArgs {
    pub fn month(&self) -> Result<Month> {
        self.month.map_or_else(Month::current, Ok)
    }

    pub fn connect(&self) -> Result<Box<dyn DataSource>> {
        self.source.connect()
    }
}

#[derive(Parser)]
pub struct TariffConfigArgs {
    /// TOML file overriding the default rates.
    #[clap(long = "tariff-config", env = "TARIFF_CONFIG")]
    path: Option<PathBuf>,
}

impl TariffConfigArgs {
    pub fn load(&self) -> Result<TariffConfig> {
        TariffConfig::load(self.path.as_ref())
    }
}
