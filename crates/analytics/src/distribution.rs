use std::collections::HashMap;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::records::{EstimateRecord, PullRequestRecord};
use crate::stats::mean;

/// One ordered range bucket. A value lands in the first bucket whose
/// `upper` it does not exceed, so boundary values belong to the lower
/// bucket; `upper: None` marks the final unbounded bucket.
#[derive(Debug, Clone, Copy)]
pub struct BucketBound {
    pub label: &'static str,
    pub upper: Option<f64>,
}

/// PR size classes over additions + deletions.
pub const PR_SIZE_BUCKETS: &[BucketBound] = &[
    BucketBound { label: "XS", upper: Some(10.0) },
    BucketBound { label: "S", upper: Some(50.0) },
    BucketBound { label: "M", upper: Some(200.0) },
    BucketBound { label: "L", upper: Some(500.0) },
    BucketBound { label: "XL", upper: None },
];

/// Story-point estimate classes.
pub const STORY_POINT_BUCKETS: &[BucketBound] = &[
    BucketBound { label: "1-2", upper: Some(2.0) },
    BucketBound { label: "3-5", upper: Some(5.0) },
    BucketBound { label: "5-8", upper: Some(8.0) },
    BucketBound { label: "8-13", upper: Some(13.0) },
    BucketBound { label: "13+", upper: None },
];

/// One row of a distribution table. Every defined bucket is emitted,
/// zero counts included; the average is None for empty buckets.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BucketRow {
    pub label: String,
    pub count: usize,
    pub avg_cycle_time_hours: Option<f64>,
}

fn bucket_index(buckets: &[BucketBound], value: f64) -> usize {
    for (i, bucket) in buckets.iter().enumerate() {
        match bucket.upper {
            Some(upper) if value <= upper => return i,
            None => return i,
            _ => {}
        }
    }
    buckets.len() - 1
}

fn bucketize<I>(buckets: &[BucketBound], observations: I) -> Vec<BucketRow>
where
    I: Iterator<Item = (f64, Option<f64>)>,
{
    let mut counts = vec![0usize; buckets.len()];
    let mut cycles: Vec<Vec<f64>> = vec![Vec::new(); buckets.len()];

    for (value, cycle) in observations {
        let i = bucket_index(buckets, value);
        counts[i] += 1;
        if let Some(cycle) = cycle {
            cycles[i].push(cycle);
        }
    }

    buckets
        .iter()
        .zip(counts)
        .zip(cycles)
        .map(|((bucket, count), cycle_values)| BucketRow {
            label: bucket.label.to_string(),
            count,
            avg_cycle_time_hours: mean(&cycle_values),
        })
        .collect()
}

fn merged_in_window<'a>(
    prs: &'a [PullRequestRecord],
    start: NaiveDate,
    end: NaiveDate,
) -> impl Iterator<Item = &'a PullRequestRecord> {
    prs.iter().filter(move |pr| {
        pr.is_merged()
            && pr
                .merged_on()
                .map_or(false, |d| d >= start && d <= end)
    })
}

/// Merged-PR size distribution over the window, with the average cycle
/// time per size class.
pub fn pr_size_distribution(
    team_id: Uuid,
    start: NaiveDate,
    end: NaiveDate,
    prs: &[PullRequestRecord],
) -> Vec<BucketRow> {
    tracing::debug!(team = %team_id, pull_requests = prs.len(), "computing size distribution");

    bucketize(
        PR_SIZE_BUCKETS,
        merged_in_window(prs, start, end)
            .map(|pr| (pr.total_changes() as f64, pr.cycle_time_hours)),
    )
}

/// Cycle time by story-point estimate, joining merged PRs to estimates
/// through their issue key. Unlinked PRs (empty key) and PRs without a
/// matching estimate are excluded.
pub fn story_point_distribution(
    team_id: Uuid,
    start: NaiveDate,
    end: NaiveDate,
    prs: &[PullRequestRecord],
    estimates: &[EstimateRecord],
) -> Vec<BucketRow> {
    tracing::debug!(
        team = %team_id,
        pull_requests = prs.len(),
        estimates = estimates.len(),
        "computing story point distribution"
    );

    let points_by_key: HashMap<&str, f64> = estimates
        .iter()
        .map(|e| (e.jira_key.as_str(), e.story_points))
        .collect();

    bucketize(
        STORY_POINT_BUCKETS,
        merged_in_window(prs, start, end).filter_map(|pr| {
            if pr.jira_key.is_empty() {
                return None;
            }
            points_by_key
                .get(pr.jira_key.as_str())
                .map(|&points| (points, pr.cycle_time_hours))
        }),
    )
}
