//! Recorded conversation turns.

use chrono::{DateTime, Local};
use serde::Serialize;

use super::speaker::Seat;

/// One prompt/response exchange.
///
/// `prompt` is what the other party said (or the initial prompt), without the
/// speaker's personality preamble.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Turn {
    pub round: u32,
    pub seat: Seat,
    pub speaker: String,
    pub prompt: String,
    pub response: String,
    pub timestamp: DateTime<Local>,
}
