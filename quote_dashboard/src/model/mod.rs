//! Data model types owned by the dashboard.
//!
//! This module groups the UI-facing state:
//! - `state` — the `QueryState` snapshot, its `Status`, and the reducer transitions.
pub mod state;
