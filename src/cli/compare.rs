use clap::Parser;

use crate::{
    billing::Billing,
    cli::billing::BillingArgs,
    core::comparison::Comparison,
    prelude::*,
    tables::{build_breakdown_table, build_comparison_table},
};

#[derive(Parser)]
pub struct CompareArgs {
    #[clap(flatten)]
    billing: BillingArgs,
}

impl CompareArgs {
    #[instrument(skip_all)]
    pub fn run(self) -> Result {
        let config = self.billing.tariff_config.load()?;
        let month = self.billing.month()?;
        let source = self.billing.connect()?;
        let billing = Billing::builder().readings(&*source).prices(&*source).build();
        let comparison = Comparison::new(
            billing.calculate(&config.dynamic, month)?,
            billing.calculate(&config.fixed, month)?,
            &config.fixed,
        );
        println!("{month}");
        println!(
            "{}",
            build_breakdown_table(&[("Dynamic", comparison.dynamic), ("Fixed", comparison.fixed)])
        );
        println!("{}", build_comparison_table(&comparison));
        Ok(())
    }
}
