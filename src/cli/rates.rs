use clap::Parser;

use crate::{cli::billing::TariffConfigArgs, prelude::*, tables::build_rates_table};

#[derive(Parser)]
pub struct RatesArgs {
    #[clap(flatten)]
    tariff_config: TariffConfigArgs,

    /// Print the merged configuration as TOML, ready to be edited.
    #[clap(long)]
    toml: bool,
}

impl RatesArgs {
    pub fn run(self) -> Result {
        let config = self.tariff_config.load()?;
        if self.toml {
            print!("{}", config.to_toml()?);
        } else {
            println!("{}", build_rates_table(&config));
        }
        Ok(())
    }
}
