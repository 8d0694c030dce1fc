use std::collections::{BTreeMap, HashSet};

use chrono::{Datelike, Duration, NaiveDate};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::records::{PullRequestRecord, UsageRecord};
use crate::stats::mean;

/// One weekly aggregate. `value` is None when the week has matching
/// records but none carry the averaged metric.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TrendPoint {
    pub week_start: NaiveDate,
    pub value: Option<f64>,
    pub record_count: usize,
}

/// Monday of the week containing `date`.
pub fn week_start(date: NaiveDate) -> NaiveDate {
    date - Duration::days(date.weekday().num_days_from_monday() as i64)
}

/// Group items into Monday-start calendar weeks by the date `date_of`
/// extracts. Items mapping to None are skipped; weeks with no matching
/// items are simply absent (callers needing dense series fill gaps
/// themselves).
pub fn group_by_week<'a, T, F>(items: &'a [T], date_of: F) -> BTreeMap<NaiveDate, Vec<&'a T>>
where
    F: Fn(&T) -> Option<NaiveDate>,
{
    let mut weeks: BTreeMap<NaiveDate, Vec<&'a T>> = BTreeMap::new();
    for item in items {
        if let Some(date) = date_of(item) {
            weeks.entry(week_start(date)).or_default().push(item);
        }
    }
    weeks
}

fn in_window(date: NaiveDate, start: NaiveDate, end: NaiveDate) -> bool {
    date >= start && date <= end
}

/// Distinct members with any assistant activity, per week.
pub fn ai_adoption_trend(
    team_id: Uuid,
    start: NaiveDate,
    end: NaiveDate,
    usage: &[UsageRecord],
) -> Vec<TrendPoint> {
    tracing::debug!(team = %team_id, records = usage.len(), "computing adoption trend");

    let weeks = group_by_week(usage, |u| in_window(u.date, start, end).then_some(u.date));
    weeks
        .into_iter()
        .map(|(week, records)| {
            let members: HashSet<&str> =
                records.iter().map(|u| u.member_id.as_str()).collect();
            TrendPoint {
                week_start: week,
                value: Some(members.len() as f64),
                record_count: records.len(),
            }
        })
        .collect()
}

/// Weekly suggestion acceptance as a 0-100 ratio of accepted over shown.
/// A week where nothing was shown reports 0.00 rather than dividing by
/// zero.
pub fn acceptance_trend(
    team_id: Uuid,
    start: NaiveDate,
    end: NaiveDate,
    usage: &[UsageRecord],
) -> Vec<TrendPoint> {
    tracing::debug!(team = %team_id, records = usage.len(), "computing acceptance trend");

    let weeks = group_by_week(usage, |u| in_window(u.date, start, end).then_some(u.date));
    weeks
        .into_iter()
        .map(|(week, records)| {
            let shown: u64 = records.iter().map(|u| u.suggestions_shown as u64).sum();
            let accepted: u64 = records.iter().map(|u| u.suggestions_accepted as u64).sum();
            let rate = if shown == 0 {
                0.0
            } else {
                accepted as f64 / shown as f64 * 100.0
            };
            TrendPoint {
                week_start: week,
                value: Some(rate),
                record_count: records.len(),
            }
        })
        .collect()
}

/// Average cycle time of PRs merged each week.
pub fn cycle_time_trend(
    team_id: Uuid,
    start: NaiveDate,
    end: NaiveDate,
    prs: &[PullRequestRecord],
) -> Vec<TrendPoint> {
    tracing::debug!(team = %team_id, pull_requests = prs.len(), "computing cycle time trend");
    merged_average_trend(start, end, prs, |pr| pr.cycle_time_hours)
}

/// Average review time of PRs merged each week.
pub fn review_time_trend(
    team_id: Uuid,
    start: NaiveDate,
    end: NaiveDate,
    prs: &[PullRequestRecord],
) -> Vec<TrendPoint> {
    tracing::debug!(team = %team_id, pull_requests = prs.len(), "computing review time trend");
    merged_average_trend(start, end, prs, |pr| pr.review_time_hours)
}

fn merged_average_trend<F>(
    start: NaiveDate,
    end: NaiveDate,
    prs: &[PullRequestRecord],
    metric: F,
) -> Vec<TrendPoint>
where
    F: Fn(&PullRequestRecord) -> Option<f64>,
{
    let weeks = group_by_week(prs, |pr| {
        if !pr.is_merged() {
            return None;
        }
        pr.merged_on().filter(|&d| in_window(d, start, end))
    });

    weeks
        .into_iter()
        .map(|(week, records)| {
            let values: Vec<f64> = records.iter().filter_map(|pr| metric(pr)).collect();
            TrendPoint {
                week_start: week,
                value: mean(&values),
                record_count: records.len(),
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::records::PrState;
    use chrono::{TimeZone, Utc};
    use uuid::Uuid;

    fn day(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn usage_on(member: &str, date: NaiveDate, shown: u32, accepted: u32) -> UsageRecord {
        UsageRecord {
            member_id: member.to_string(),
            date,
            suggestions_shown: shown,
            suggestions_accepted: accepted,
            acceptance_rate: None,
        }
    }

    fn merged_pr_on(date: NaiveDate, cycle: Option<f64>, review: Option<f64>) -> PullRequestRecord {
        let merged_at = Utc
            .with_ymd_and_hms(date.year(), date.month(), date.day(), 15, 0, 0)
            .unwrap();
        PullRequestRecord {
            id: Uuid::new_v4(),
            author_id: "dev".to_string(),
            state: PrState::Merged,
            created_at: merged_at - Duration::hours(24),
            merged_at: Some(merged_at),
            cycle_time_hours: cycle,
            review_time_hours: review,
            additions: 50,
            deletions: 5,
            is_revert: false,
            is_hotfix: false,
            jira_key: String::new(),
        }
    }

    #[test]
    fn week_start_is_monday() {
        // 2026-03-04 is a Wednesday; its week starts Monday 2026-03-02.
        assert_eq!(week_start(day(2026, 3, 4)), day(2026, 3, 2));
        // A Monday maps to itself.
        assert_eq!(week_start(day(2026, 3, 2)), day(2026, 3, 2));
        // Sunday belongs to the preceding Monday's week.
        assert_eq!(week_start(day(2026, 3, 8)), day(2026, 3, 2));
    }

    #[test]
    fn empty_weeks_are_omitted() {
        let usage = vec![
            usage_on("ana", day(2026, 3, 3), 10, 5),
            // Two-week gap.
            usage_on("ana", day(2026, 3, 24), 10, 5),
        ];
        let trend = ai_adoption_trend(Uuid::new_v4(), day(2026, 3, 1), day(2026, 3, 31), &usage);
        assert_eq!(trend.len(), 2);
        assert_eq!(trend[0].week_start, day(2026, 3, 2));
        assert_eq!(trend[1].week_start, day(2026, 3, 23));
    }

    #[test]
    fn adoption_counts_distinct_members() {
        let usage = vec![
            usage_on("ana", day(2026, 3, 2), 10, 5),
            usage_on("ana", day(2026, 3, 3), 10, 5),
            usage_on("ben", day(2026, 3, 4), 0, 0),
        ];
        let trend = ai_adoption_trend(Uuid::new_v4(), day(2026, 3, 1), day(2026, 3, 31), &usage);
        assert_eq!(trend.len(), 1);
        assert_eq!(trend[0].value, Some(2.0));
        assert_eq!(trend[0].record_count, 3);
    }

    #[test]
    fn acceptance_is_a_ratio_of_totals() {
        let usage = vec![
            usage_on("ana", day(2026, 3, 2), 100, 30),
            usage_on("ben", day(2026, 3, 3), 100, 50),
        ];
        let trend = acceptance_trend(Uuid::new_v4(), day(2026, 3, 1), day(2026, 3, 31), &usage);
        assert_eq!(trend.len(), 1);
        // (30 + 50) / (100 + 100) = 40%
        assert_eq!(trend[0].value, Some(40.0));
    }

    #[test]
    fn acceptance_with_nothing_shown_is_zero() {
        let usage = vec![usage_on("ana", day(2026, 3, 2), 0, 0)];
        let trend = acceptance_trend(Uuid::new_v4(), day(2026, 3, 1), day(2026, 3, 31), &usage);
        assert_eq!(trend.len(), 1);
        assert_eq!(trend[0].value, Some(0.0));
    }

    #[test]
    fn records_outside_the_window_are_dropped() {
        let usage = vec![
            usage_on("ana", day(2026, 2, 25), 10, 5),
            usage_on("ana", day(2026, 3, 3), 10, 5),
            usage_on("ana", day(2026, 4, 2), 10, 5),
        ];
        let trend = ai_adoption_trend(Uuid::new_v4(), day(2026, 3, 1), day(2026, 3, 31), &usage);
        assert_eq!(trend.len(), 1);
        assert_eq!(trend[0].week_start, day(2026, 3, 2));
    }

    #[test]
    fn cycle_trend_averages_merged_prs_per_week() {
        let prs = vec![
            merged_pr_on(day(2026, 3, 2), Some(10.0), None),
            merged_pr_on(day(2026, 3, 5), Some(20.0), None),
            merged_pr_on(day(2026, 3, 10), Some(40.0), None),
        ];
        let trend = cycle_time_trend(Uuid::new_v4(), day(2026, 3, 1), day(2026, 3, 31), &prs);
        assert_eq!(trend.len(), 2);
        assert_eq!(trend[0].value, Some(15.0));
        assert_eq!(trend[0].record_count, 2);
        assert_eq!(trend[1].value, Some(40.0));
    }

    #[test]
    fn open_prs_never_reach_the_cycle_trend() {
        let mut pr = merged_pr_on(day(2026, 3, 2), Some(10.0), None);
        pr.state = PrState::Open;
        pr.merged_at = None;
        let trend = cycle_time_trend(Uuid::new_v4(), day(2026, 3, 1), day(2026, 3, 31), &[pr]);
        assert!(trend.is_empty());
    }

    #[test]
    fn missing_metric_values_leave_value_none() {
        let prs = vec![
            merged_pr_on(day(2026, 3, 2), None, None),
            merged_pr_on(day(2026, 3, 3), None, None),
        ];
        let trend = cycle_time_trend(Uuid::new_v4(), day(2026, 3, 1), day(2026, 3, 31), &prs);
        assert_eq!(trend.len(), 1);
        assert_eq!(trend[0].value, None);
        assert_eq!(trend[0].record_count, 2);
    }

    #[test]
    fn review_trend_uses_review_time() {
        let prs = vec![
            merged_pr_on(day(2026, 3, 2), Some(50.0), Some(4.0)),
            merged_pr_on(day(2026, 3, 3), Some(70.0), Some(8.0)),
        ];
        let trend = review_time_trend(Uuid::new_v4(), day(2026, 3, 1), day(2026, 3, 31), &prs);
        assert_eq!(trend.len(), 1);
        assert_eq!(trend[0].value, Some(6.0));
    }

    #[test]
    fn trend_points_are_ordered_by_week() {
        let usage: Vec<UsageRecord> = (0..30)
            .map(|i| usage_on("ana", day(2026, 3, 2) + Duration::days(i), 10, 5))
            .collect();
        let trend = acceptance_trend(Uuid::new_v4(), day(2026, 3, 1), day(2026, 4, 5), &usage);
        for pair in trend.windows(2) {
            assert!(pair[0].week_start < pair[1].week_start);
        }
    }
}
