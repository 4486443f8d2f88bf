//! Text rendering of `QueryState` snapshots.
use std::fmt::{self, Write};

use clap::ValueEnum;
use quote_common::Result;
use strum_macros::Display;

use crate::model::state::{QueryState, Status};

/// How snapshots are printed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum, Display)]
#[clap(rename_all = "lower")]
#[strum(serialize_all = "lowercase")]
pub enum OutputFormat {
    /// Human-readable table.
    #[default]
    Table,
    /// One pretty-printed JSON document per snapshot.
    Json,
}

/// Render `state` in the requested format.
pub fn render(state: &QueryState, format: OutputFormat) -> Result<String> {
    match format {
        OutputFormat::Table => Ok(render_table(state)),
        OutputFormat::Json => Ok(serde_json::to_string_pretty(state)?),
    }
}

fn render_table(state: &QueryState) -> String {
    let mut out = String::new();
    // Writing into a String cannot fail.
    let _ = write_table(&mut out, state);
    out
}

fn write_table(out: &mut String, state: &QueryState) -> fmt::Result {
    writeln!(out, "Search: {}  [{}]", state.raw_input, state.status)?;

    match state.status {
        Status::Error => {
            let message = state.error_message.as_deref().unwrap_or_default();
            writeln!(out, "Error: {}", message)?;
        }
        Status::Loading => writeln!(out, "Loading...")?,
        Status::Idle | Status::Ready => {}
    }

    if !state.quotes.is_empty() {
        writeln!(out, "{:<10} {:>12}", "Symbol", "Price ($)")?;
        for quote in &state.quotes {
            writeln!(out, "{:<10} {:>12.2}", quote.symbol, quote.price)?;
        }
    }

    if !state.suggestions.is_empty() {
        writeln!(out, "Suggestions:")?;
        for (i, item) in state.suggestions.iter().enumerate() {
            writeln!(out, "  {}. {:<8} {}", i + 1, item.symbol, item.name)?;
        }
    }
    Ok(())
}
