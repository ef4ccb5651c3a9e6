use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;

/// Appointment availability of a single consulate page.
///
/// Serialized as `no_slots` / `possible_slots` / `unknown`, the literal
/// strings the state file has always used.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Availability {
    NoSlots,
    PossibleSlots,
    Unknown,
}

impl Availability {
    pub fn as_str(&self) -> &'static str {
        match self {
            Availability::NoSlots => "no_slots",
            Availability::PossibleSlots => "possible_slots",
            Availability::Unknown => "unknown",
        }
    }
}

impl fmt::Display for Availability {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One checked page: what we saw and when.
#[derive(Debug, Clone, PartialEq)]
pub struct Observation {
    pub url: String,
    pub status: Availability,
    pub checked_at: DateTime<Utc>,
}

/// A page whose availability differs from the last stored status.
#[derive(Debug, Clone, PartialEq)]
pub struct StatusChange {
    pub url: String,
    pub previous: Availability,
    pub current: Availability,
}

/// Output of the diff stage: everything observed this sweep, the subset
/// that changed, and the state map to persist if anything did.
#[derive(Debug, Clone)]
pub struct SweepDelta {
    pub observations: Vec<Observation>,
    pub changes: Vec<StatusChange>,
    pub next_state: StatusMap,
}

/// What a completed sweep did.
#[derive(Debug, Clone, PartialEq)]
pub struct SweepSummary {
    pub urls_checked: usize,
    pub changes: usize,
    pub alert_sent: bool,
}

/// Last-known status of a page as persisted in the state file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StatusRecord {
    pub status: Availability,
    pub checked_at: DateTime<Utc>,
}

pub type StatusMap = HashMap<String, StatusRecord>;
