use std::path::PathBuf;

use clap::Parser;

use crate::{
    api::{CsvFiles, InfluxDb},
    core::source::DataSource,
    prelude::*,
};

#[derive(Parser)]
pub struct SourceArgs {
    /// Read the CSV files in the directory instead of querying InfluxDB.
    #[clap(long = "from-csv", env = "FROM_CSV")]
    csv_directory: Option<PathBuf>,

    #[clap(flatten)]
    influxdb: InfluxDbArgs,
}

impl SourceArgs {
    pub fn connect(&self) -> Result<Box<dyn DataSource>> {
        match &self.csv_directory {
            Some(directory) => {
                info!(directory = %directory.display(), "reading CSV files");
                Ok(Box::new(CsvFiles::in_directory(directory.clone())))
            }
            None => self.influxdb.connect(),
        }
    }
}

#[derive(Parser)]
pub struct InfluxDbArgs {
    #[clap(long = "influxdb-url", env = "INFLUXDB_URL", default_value = "http://localhost:8086")]
    url: String,

    /// API token with read access to both buckets.
    #[clap(long = "influxdb-token", env = "INFLUXDB_TOKEN", hide_env_values = true)]
    token: Option<String>,

    #[clap(long = "influxdb-org", env = "INFLUXDB_ORG")]
    org: Option<String>,

    /// Bucket with the P1 meter power readings.
    #[clap(long = "metering-bucket", env = "METERING_BUCKET", default_value = "metering")]
    metering_bucket: String,

    /// Bucket with the EPEX day-ahead prices.
    #[clap(long = "prices-bucket", env = "PRICES_BUCKET", default_value = "energy_prices")]
    prices_bucket: String,
}

impl InfluxDbArgs {
    fn connect(&self) -> Result<Box<dyn DataSource>> {
        let token = self.token.as_deref().context("InfluxDB token is not set")?;
        let org = self.org.as_deref().context("InfluxDB organization is not set")?;
        info!(url = %self.url, org, "querying InfluxDB");
        Ok(Box::new(
            InfluxDb::builder()
                .url(&self.url)
                .token(token)
                .org(org)
                .metering_bucket(&self.metering_bucket)
                .prices_bucket(&self.prices_bucket)
                .build(),
        ))
    }
}
