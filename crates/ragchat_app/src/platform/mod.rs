//! Terminal front-end: wires the core state machine to the engine and stdin/stdout.
mod app;
pub mod cli;
mod effects;
mod persistence;
mod ui;

pub use app::run_app;
