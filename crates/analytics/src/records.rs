use std::str::FromStr;

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum PrState {
    Open,
    Merged,
    Closed,
}

impl PrState {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Open => "open",
            Self::Merged => "merged",
            Self::Closed => "closed",
        }
    }
}

impl FromStr for PrState {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "open" => Ok(Self::Open),
            "merged" => Ok(Self::Merged),
            "closed" => Ok(Self::Closed),
            _ => Err(format!("unknown pull request state: {value}")),
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum ReviewState {
    Commented,
    Approved,
    ChangesRequested,
    Dismissed,
    Pending,
}

impl ReviewState {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Commented => "commented",
            Self::Approved => "approved",
            Self::ChangesRequested => "changes_requested",
            Self::Dismissed => "dismissed",
            Self::Pending => "pending",
        }
    }
}

impl FromStr for ReviewState {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "commented" => Ok(Self::Commented),
            "approved" => Ok(Self::Approved),
            "changes_requested" => Ok(Self::ChangesRequested),
            "dismissed" => Ok(Self::Dismissed),
            "pending" => Ok(Self::Pending),
            _ => Err(format!("unknown review state: {value}")),
        }
    }
}

/// One member's assistant usage for one calendar day.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct UsageRecord {
    pub member_id: String,
    pub date: NaiveDate,
    pub suggestions_shown: u32,
    pub suggestions_accepted: u32,
    pub acceptance_rate: Option<f64>,
}

impl UsageRecord {
    /// Acceptance rate for the day: the reported rate when present,
    /// otherwise derived from accepted/shown. None on days where nothing
    /// was shown.
    pub fn effective_acceptance_rate(&self) -> Option<f64> {
        if self.suggestions_shown == 0 {
            return None;
        }
        match self.acceptance_rate {
            Some(rate) => Some(rate),
            None => Some(
                self.suggestions_accepted as f64 / self.suggestions_shown as f64 * 100.0,
            ),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PullRequestRecord {
    pub id: Uuid,
    pub author_id: String,
    pub state: PrState,
    pub created_at: DateTime<Utc>,
    /// Set iff `state == Merged`.
    pub merged_at: Option<DateTime<Utc>>,
    pub cycle_time_hours: Option<f64>,
    pub review_time_hours: Option<f64>,
    pub additions: i64,
    pub deletions: i64,
    pub is_revert: bool,
    pub is_hotfix: bool,
    /// Linked issue key; empty string means unlinked.
    pub jira_key: String,
}

impl PullRequestRecord {
    pub fn is_merged(&self) -> bool {
        self.state == PrState::Merged
    }

    /// Total changed lines, the size axis for distribution bucketing.
    pub fn total_changes(&self) -> i64 {
        self.additions + self.deletions
    }

    /// Calendar day the merge landed, for weekly bucketing.
    pub fn merged_on(&self) -> Option<NaiveDate> {
        self.merged_at.map(|t| t.date_naive())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReviewRecord {
    pub pull_request_id: Uuid,
    pub reviewer_id: String,
    pub state: ReviewState,
    pub submitted_at: DateTime<Utc>,
}

/// Story-point estimate linked to a pull request via its issue key.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EstimateRecord {
    pub jira_key: String,
    pub story_points: f64,
}
