#![allow(clippy::doc_markdown)]
#![doc = include_str!("../README.md")]

mod api;
mod billing;
mod cli;
mod config;
mod core;
mod fmt;
mod prelude;
mod quantity;
mod tables;

use clap::{Parser, crate_version};

use crate::{cli::Args, prelude::*};

fn main() -> Result {
    let _ = dotenvy::dotenv();
    tracing_subscriber::fmt().without_time().compact().with_writer(std::io::stderr).init();
    info!(version = crate_version!(), "starting…");

    Args::parse().command.run()?;

    info!("done!");
    Ok(())
}
