use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

pub mod catalog;
pub mod helpers;
pub mod prep;

pub use helpers::{
    classify_relationship_verb, extract_domain, format_currency_abbreviated, format_date_compact,
    format_date_verbose, parse_iso_date, select_most_recent, slugify, Dated,
};

/// One row of the application tracker.
///
/// Date fields are kept as the ISO-8601 strings they were stored with so a
/// load/migrate/persist cycle reproduces the stored bytes exactly.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct TrackedOpportunity {
    pub id: String,
    pub name: String,
    pub label: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    pub created_on: String,
    #[serde(default)]
    pub status: TrackingStatus,
    #[serde(default)]
    pub flagged: bool,
    pub deadline: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub next_step_on: Option<String>,
}

impl TrackedOpportunity {
    /// Shallow-merges every field the patch carries.
    pub fn apply(&mut self, patch: &OpportunityPatch) {
        if let Some(name) = &patch.name {
            self.name = name.clone();
        }
        if let Some(label) = &patch.label {
            self.label = label.clone();
        }
        if let Some(location) = &patch.location {
            self.location = location.clone();
        }
        if let Some(created_on) = &patch.created_on {
            self.created_on = created_on.clone();
        }
        if let Some(status) = patch.status {
            self.status = status;
        }
        if let Some(flagged) = patch.flagged {
            self.flagged = flagged;
        }
        if let Some(deadline) = &patch.deadline {
            self.deadline = deadline.clone();
        }
        if let Some(next_step_on) = &patch.next_step_on {
            self.next_step_on = next_step_on.clone();
        }
    }
}

/// Partial update for a [`TrackedOpportunity`]. `None` leaves a field alone;
/// the nested options on `location` and `next_step_on` allow clearing them.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OpportunityPatch {
    pub name: Option<String>,
    pub label: Option<String>,
    pub location: Option<Option<String>>,
    pub created_on: Option<String>,
    pub status: Option<TrackingStatus>,
    pub flagged: Option<bool>,
    pub deadline: Option<String>,
    pub next_step_on: Option<Option<String>>,
}

impl OpportunityPatch {
    pub fn status(status: TrackingStatus) -> Self {
        Self {
            status: Some(status),
            ..Self::default()
        }
    }

    pub fn flagged(flagged: bool) -> Self {
        Self {
            flagged: Some(flagged),
            ..Self::default()
        }
    }

    pub fn next_step_on(date: Option<String>) -> Self {
        Self {
            next_step_on: Some(date),
            ..Self::default()
        }
    }
}

/// Interview pipeline stage. Any stage may follow any other.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum TrackingStatus {
    #[serde(rename = "Not applied")]
    NotApplied,
    Phone,
    Superday,
    Offer,
}

impl Default for TrackingStatus {
    fn default() -> Self {
        Self::NotApplied
    }
}

impl TrackingStatus {
    pub const ALL: [TrackingStatus; 4] = [
        TrackingStatus::NotApplied,
        TrackingStatus::Phone,
        TrackingStatus::Superday,
        TrackingStatus::Offer,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            TrackingStatus::NotApplied => "Not applied",
            TrackingStatus::Phone => "Phone",
            TrackingStatus::Superday => "Superday",
            TrackingStatus::Offer => "Offer",
        }
    }

    /// Reads a stored status value, including values written by older
    /// versions of the tracker. Never fails: the legacy `Applied` status and
    /// anything unrecognised land on the first stage.
    pub fn from_legacy(input: &str) -> Self {
        match input.trim() {
            "Applied" => TrackingStatus::NotApplied,
            other => other.parse().unwrap_or_default(),
        }
    }
}

impl fmt::Display for TrackingStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TrackingStatus {
    type Err = String;

    fn from_str(input: &str) -> Result<Self, Self::Err> {
        let normalized = input.trim().to_lowercase().replace(['_', ' '], "-");
        match normalized.as_str() {
            "not-applied" | "not-started" => Ok(TrackingStatus::NotApplied),
            "phone" => Ok(TrackingStatus::Phone),
            "superday" | "final-round" => Ok(TrackingStatus::Superday),
            "offer" | "outcome" => Ok(TrackingStatus::Offer),
            other => Err(format!("Unknown status: {other}")),
        }
    }
}
