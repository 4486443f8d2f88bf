//! Single-threaded event loop.
//!
//! The loop owns the `QueryController` and multiplexes three sources with
//! `crossbeam_channel::select!`: user commands, fetch outcomes, and shutdown.
//! All state changes happen here, one event at a time; workers only ever
//! send outcomes back.
//!
//! When the command channel closes (stdin EOF) the loop keeps running until
//! the pending quote fetch, if any, has resolved.
use std::io::Write;

use crossbeam_channel::{Receiver, never, select};
use log::{debug, info, warn};
use quote_common::{QuoteError, Result};

use crate::commands::UserCommand;
use crate::controller::{Effect, FetchKind, QueryController};
use crate::fetch::{FetchDispatcher, FetchOutcome};
use crate::render::{OutputFormat, render};

/// Event loop wiring.
pub struct EventLoop<W: Write> {
    controller: QueryController,
    dispatcher: FetchDispatcher,
    output: W,
    format: OutputFormat,
}

impl<W: Write> EventLoop<W> {
    /// Assemble a loop printing snapshots to `output`.
    pub fn new(
        controller: QueryController,
        dispatcher: FetchDispatcher,
        output: W,
        format: OutputFormat,
    ) -> Self {
        Self {
            controller,
            dispatcher,
            output,
            format,
        }
    }

    /// Issue the start-up fetch for `query`.
    pub fn start(&mut self, query: &str) -> Result<()> {
        let effect = self.controller.fetch_quote(query);
        self.run_effect(effect);
        self.print()
    }

    /// Process events until quit, shutdown, or input end with nothing pending.
    ///
    /// Returns the controller so callers can inspect the final state.
    pub fn run(
        mut self,
        commands: Receiver<UserCommand>,
        outcomes: Receiver<FetchOutcome>,
        shutdown: Receiver<()>,
    ) -> Result<QueryController> {
        let mut input_open = true;

        loop {
            if !input_open && self.controller.is_settled() {
                info!("Input finished, no fetch pending");
                break;
            }
            let command_rx = if input_open { commands.clone() } else { never() };
            select! {
                recv(shutdown) -> _ => {
                    info!("Shutdown requested");
                    break;
                },
                recv(command_rx) -> msg => match msg {
                    Ok(UserCommand::Quit) => break,
                    Ok(command) => self.handle_command(command)?,
                    Err(_) => {
                        debug!("Command channel closed");
                        input_open = false;
                    }
                },
                recv(outcomes) -> msg => match msg {
                    Ok(outcome) => self.handle_outcome(outcome)?,
                    Err(e) => return Err(QuoteError::ChannelRecv(e.to_string())),
                },
            }
        }
        info!("Event loop stopping...");
        Ok(self.controller)
    }

    fn handle_command(&mut self, command: UserCommand) -> Result<()> {
        let effect = match command {
            UserCommand::Input(text) => self.controller.set_input(&text),
            UserCommand::Submit => self.controller.submit_on_enter(),
            UserCommand::Pick(position) => {
                let suggestions = &self.controller.state().suggestions;
                let picked = position
                    .checked_sub(1)
                    .and_then(|i| suggestions.get(i))
                    .map(|item| item.symbol.clone());
                match picked {
                    Some(symbol) => self.controller.select_suggestion(&symbol),
                    None => {
                        warn!("No suggestion #{}", position);
                        return Ok(());
                    }
                }
            }
            UserCommand::Show | UserCommand::Quit => None,
        };
        self.run_effect(effect);
        self.print()
    }

    fn handle_outcome(&mut self, outcome: FetchOutcome) -> Result<()> {
        let FetchOutcome { ticket, result } = outcome;
        let applied = match ticket.kind {
            FetchKind::Quote => self.controller.apply_quote_response(ticket, result),
            FetchKind::Suggestion => self.controller.apply_suggestion_response(ticket, result),
        };
        if applied { self.print() } else { Ok(()) }
    }

    fn run_effect(&self, effect: Option<Effect>) {
        if let Some(effect) = effect {
            self.dispatcher.dispatch(effect);
        }
    }

    fn print(&mut self) -> Result<()> {
        let text = render(self.controller.state(), self.format)?;
        writeln!(self.output, "{}", text)?;
        self.output.flush()?;
        Ok(())
    }
}
