//! [InfluxDB v2](https://docs.influxdata.com/influxdb/v2/api/) query client.

use std::time::Duration;

use chrono::NaiveDateTime;
use serde::Serialize;
use ureq::Agent;

use crate::{
    api::parse_timestamp,
    core::{
        interval::Interval,
        reading::{IntervalReading, PricePoint},
        source::{PriceSource, ReadingSource},
    },
    prelude::*,
    quantity::{power::Kilowatts, price::MegawattHourPrice},
};

pub struct Api {
    client: Agent,
    url: String,
    token: String,
    org: String,
    metering_bucket: String,
    prices_bucket: String,
}

#[bon::bon]
impl Api {
    #[builder]
    pub fn new(
        #[builder(into)] url: String,
        #[builder(into)] token: String,
        #[builder(into)] org: String,
        #[builder(into)] metering_bucket: String,
        #[builder(into)] prices_bucket: String,
    ) -> Self {
        let client =
            Agent::config_builder().timeout_global(Some(Duration::from_secs(10))).build().into();
        Self { client, url, token, org, metering_bucket, prices_bucket }
    }

    /// Run the Flux query and return `(_time, _value)` of every record.
    #[instrument(skip_all)]
    fn query(&self, query: &str) -> Result<Vec<(NaiveDateTime, f64)>> {
        debug!(query, "querying…");
        let body = self
            .client
            .post(format!("{}/api/v2/query", self.url.trim_end_matches('/')))
            .query("org", &self.org)
            .header("Authorization", format!("Token {}", self.token))
            .header("Accept", "application/csv")
            .send_json(Request::new(query))
            .context("failed to query InfluxDB")?
            .body_mut()
            .read_to_string()
            .context("failed to read the InfluxDB response")?;
        parse_annotated_csv(&body)
    }

    fn query_metering(&self, field: &str, interval: Interval) -> Result<Vec<IntervalReading>> {
        let query = flux_query(&self.metering_bucket, interval, "energy", Some("p1meter"), field);
        let readings: Vec<_> = self
            .query(&query)?
            .into_iter()
            .map(|(timestamp, value)| IntervalReading::new(timestamp, Kilowatts::from(value)))
            .collect();
        info!(field, n_readings = readings.len(), "fetched");
        Ok(readings)
    }
}

impl ReadingSource for Api {
    fn get_consumption_readings(&self, interval: Interval) -> Result<Vec<IntervalReading>> {
        self.query_metering("PowerDelivered", interval)
    }

    fn get_injection_readings(&self, interval: Interval) -> Result<Vec<IntervalReading>> {
        self.query_metering("PowerReturned", interval)
    }
}

impl PriceSource for Api {
    fn get_prices(&self, interval: Interval) -> Result<Vec<PricePoint>> {
        let query =
            flux_query(&self.prices_bucket, interval, "electricity_price", None, "price_eur_mwh");
        let prices: Vec<_> = self
            .query(&query)?
            .into_iter()
            .map(|(timestamp, value)| PricePoint::new(timestamp, MegawattHourPrice(value)))
            .collect();
        info!(n_prices = prices.len(), "fetched");
        Ok(prices)
    }
}

#[derive(Serialize)]
struct Request<'a> {
    query: &'a str,

    #[serde(rename = "type")]
    type_: &'static str,
}

impl<'a> Request<'a> {
    const fn new(query: &'a str) -> Self {
        Self { query, type_: "flux" }
    }
}

fn flux_query(
    bucket: &str,
    interval: Interval,
    measurement: &str,
    device: Option<&str>,
    field: &str,
) -> String {
    const FORMAT: &str = "%Y-%m-%dT%H:%M:%SZ";
    let device_filter = device
        .map(|device| format!("\n  |> filter(fn: (r) => r[\"device\"] == \"{device}\")"))
        .unwrap_or_default();
    format!(
        r#"from(bucket: "{bucket}")
  |> range(start: {start}, stop: {stop})
  |> filter(fn: (r) => r["_measurement"] == "{measurement}"){device_filter}
  |> filter(fn: (r) => r["_field"] == "{field}")
  |> aggregateWindow(every: 15m, fn: mean, createEmpty: false)"#,
        start = interval.start.format(FORMAT),
        stop = interval.end.format(FORMAT),
    )
}

/// Pull `_time` and `_value` out of the annotated CSV.
///
/// Every table repeats its header row, and the columns are located anew for each.
fn parse_annotated_csv(body: &str) -> Result<Vec<(NaiveDateTime, f64)>> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .comment(Some(b'#'))
        .from_reader(body.as_bytes());
    let mut columns: Option<(usize, usize)> = None;
    let mut records = Vec::new();
    for record in reader.records() {
        let record = record.context("malformed InfluxDB response")?;
        let time_index = record.iter().position(|field| field == "_time");
        let value_index = record.iter().position(|field| field == "_value");
        if let (Some(time_index), Some(value_index)) = (time_index, value_index) {
            columns = Some((time_index, value_index));
            continue;
        }
        if record.iter().all(str::is_empty) {
            continue;
        }
        let Some((time_index, value_index)) = columns else {
            bail!("InfluxDB response has no `_time` and `_value` header");
        };
        let (Some(time), Some(value)) = (record.get(time_index), record.get(value_index)) else {
            bail!("InfluxDB record is too short: {record:?}");
        };
        if value.is_empty() {
            trace!(time, "skipped an empty value");
            continue;
        }
        let value = value.parse().with_context(|| format!("invalid `_value`: `{value}`"))?;
        records.push((parse_timestamp(time)?, value));
    }
    Ok(records)
}
