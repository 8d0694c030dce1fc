use std::collections::{BTreeMap, HashMap, HashSet};

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::config::AnalyticsConfig;
use crate::records::{PrState, PullRequestRecord, ReviewRecord, ReviewState};

/// A reviewer whose outstanding load is anomalously high. Absence of an
/// alert means the team's review load is balanced.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BottleneckAlert {
    pub reviewer_id: String,
    pub pending_count: usize,
    pub team_avg: f64,
}

/// Flag the reviewer with the most outstanding reviews, if their load
/// exceeds the configured multiple of the team average.
///
/// Pending work is a point-in-time liability: it is evaluated over all
/// currently open pull requests, never filtered by a query date range.
/// For each (PR, reviewer) pair only the latest review by `submitted_at`
/// counts, and the PR is pending for that reviewer iff that latest state
/// is not `approved`.
pub fn detect_bottleneck(
    config: &AnalyticsConfig,
    team_id: Uuid,
    prs: &[PullRequestRecord],
    reviews: &[ReviewRecord],
) -> Option<BottleneckAlert> {
    tracing::debug!(
        team = %team_id,
        pull_requests = prs.len(),
        reviews = reviews.len(),
        "evaluating review load"
    );

    let open_prs: HashSet<Uuid> = prs
        .iter()
        .filter(|pr| pr.state == PrState::Open)
        .map(|pr| pr.id)
        .collect();

    // Latest review state wins per (PR, reviewer).
    let mut latest: HashMap<(Uuid, &str), &ReviewRecord> = HashMap::new();
    for review in reviews {
        if !open_prs.contains(&review.pull_request_id) {
            continue;
        }
        let key = (review.pull_request_id, review.reviewer_id.as_str());
        match latest.get(&key) {
            Some(existing) if existing.submitted_at >= review.submitted_at => {}
            _ => {
                latest.insert(key, review);
            }
        }
    }

    // Every reviewer with any review on an open PR counts toward the team
    // average, including those with nothing pending.
    let mut pending: BTreeMap<&str, usize> = BTreeMap::new();
    for ((_, reviewer), review) in &latest {
        let entry = pending.entry(reviewer).or_insert(0);
        if review.state != ReviewState::Approved {
            *entry += 1;
        }
    }

    if pending.len() < config.bottleneck.min_reviewers {
        return None;
    }

    let total: usize = pending.values().sum();
    let team_avg = total as f64 / pending.len() as f64;
    let threshold = config.bottleneck.load_multiplier * team_avg;

    // Ascending iteration makes the lowest reviewer id win exact ties.
    let mut worst: Option<(&str, usize)> = None;
    for (&reviewer, &count) in &pending {
        if count as f64 > threshold && worst.map_or(true, |(_, best)| count > best) {
            worst = Some((reviewer, count));
        }
    }

    worst.map(|(reviewer, count)| BottleneckAlert {
        reviewer_id: reviewer.to_string(),
        pending_count: count,
        team_avg,
    })
}
