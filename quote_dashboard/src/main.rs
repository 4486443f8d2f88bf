//! Quote Dashboard — a terminal dashboard over a public stock-quote HTTP API.
//! It fetches quotes for one symbol or a comma-separated list, prints them as a
//! table, and offers typeahead symbol suggestions while you type.
//!
//! Usage example (CLI):
//! ```bash
//! ALPHAVANTAGE_API_KEY=... quote_dashboard --symbols AAPL,MSFT --mode auto
//! ```
//!
//! Type text to get suggestions, press Enter on an empty line (or `:go`) to
//! search, `:pick N` to choose a suggestion, `:quit` to exit. See `commands`
//! for the full list.
#![warn(missing_docs)]
mod api;
mod args;
mod commands;
mod controller;
mod fetch;
mod model;
mod render;
mod runtime;

use crate::api::HttpApi;
use crate::args::Args;
use crate::commands::spawn_stdin_reader;
use crate::controller::QueryController;
use crate::fetch::FetchDispatcher;
use crate::runtime::EventLoop;
use clap::Parser;
use crossbeam_channel::{bounded, unbounded};
use log::{error, info};
use quote_common::QuoteError;
use quote_common::Result;
use std::io::{self, BufReader};
use std::sync::Arc;

fn main() -> Result<(), QuoteError> {
    init_logger();
    let args = Args::parse();

    let (shutdown_tx, shutdown_rx) = bounded::<()>(1);
    ctrlc::set_handler(move || {
        info!("Ctrl+C received. Shutting down dashboard...");
        let _ = shutdown_tx.try_send(());
    })
    .map_err(|e| QuoteError::Io(io::Error::other(e)))?;

    let query = args.initial_query()?;
    info!("Starting on {} (mode: {})", query, args.mode);

    let api = Arc::new(HttpApi::new(
        &args.base_url,
        &args.api_key,
        args.request_timeout(),
    )?);
    let (outcome_tx, outcome_rx) = unbounded();
    let dispatcher = FetchDispatcher::new(api, outcome_tx, args.suggest_timeout());

    let controller = QueryController::new(&query, args.controller_config());
    let mut event_loop = EventLoop::new(controller, dispatcher, io::stdout(), args.output);
    event_loop.start(&query)?;

    let (cmd_tx, cmd_rx) = unbounded();
    spawn_stdin_reader(BufReader::new(io::stdin()), cmd_tx);

    info!("Dashboard is running. Type a symbol, Enter to search, :quit to exit.");
    match event_loop.run(cmd_rx, outcome_rx, shutdown_rx) {
        Ok(_) => Ok(()),
        Err(e) => {
            error!("Event loop failed [{}]: {}", e.kind(), e);
            Err(e)
        }
    }
}

fn init_logger() {
    env_logger::Builder::new()
        .filter_level(log::LevelFilter::Info)
        .parse_default_env()
        .init();
}
