use clap::Parser;

use crate::{
    billing::Billing,
    cli::billing::BillingArgs,
    core::{detail::IntervalDetail, tariff::Tariff},
    prelude::*,
    tables::{build_breakdown_table, build_intervals_table},
};

#[derive(Parser)]
pub struct BreakdownArgs {
    #[clap(flatten)]
    billing: BillingArgs,
}

impl BreakdownArgs {
    #[instrument(skip_all)]
    pub fn run(self) -> Result {
        let config = self.billing.tariff_config.load()?;
        let month = self.billing.month()?;
        let source = self.billing.connect()?;
        let readings =
            Billing::builder().readings(&*source).prices(&*source).build().fetch(month, true)?;

        let details = IntervalDetail::collect(&readings, &config.dynamic, &config.fixed);
        let n_missing_prices = details.iter().filter(|detail| detail.price.is_none()).count();
        info!(n_intervals = details.len(), n_missing_prices, "collected");
        println!("{}", build_intervals_table(&details));

        println!(
            "{}",
            build_breakdown_table(&[
                ("Dynamic", config.dynamic.calculate(month, &readings)),
                ("Fixed", config.fixed.calculate(month, &readings)),
            ])
        );
        Ok(())
    }
}
