//! Output formats for completed and failed cycles.

mod json;
mod terminal;

pub use json::JsonPresenter;
pub use terminal::TerminalPresenter;

use std::io::{self, Stdout};

use rkvhealth_core::analysis::Warning;
use rkvhealth_core::collector::CollectError;
use rkvhealth_core::model::HealthSnapshot;
use rkvhealth_core::scheduler::Presenter;

/// Presenter chosen with `--format`.
pub enum Output {
    Text(TerminalPresenter<Stdout>),
    Json(JsonPresenter<Stdout>),
}

impl Presenter for Output {
    fn present(&mut self, snapshot: &HealthSnapshot, warnings: &[Warning]) -> io::Result<()> {
        match self {
            Output::Text(p) => p.present(snapshot, warnings),
            Output::Json(p) => p.present(snapshot, warnings),
        }
    }

    fn unavailable(&mut self, timestamp: i64, error: &CollectError) -> io::Result<()> {
        match self {
            Output::Text(p) => p.unavailable(timestamp, error),
            Output::Json(p) => p.unavailable(timestamp, error),
        }
    }
}
