use chrono::{Duration, NaiveDate};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::records::PullRequestRecord;
use crate::stats::mean;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PeriodStats {
    pub start: NaiveDate,
    pub end: NaiveDate,
    pub merged_count: usize,
    pub avg_cycle_time_hours: Option<f64>,
    pub avg_review_time_hours: Option<f64>,
}

/// Current window vs the equal-length window immediately before it.
///
/// Percent changes are None whenever the comparison is undefined (empty
/// previous window, missing averages). For the time metrics a negative
/// change means faster, i.e. improvement.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PeriodComparison {
    pub current: PeriodStats,
    pub previous: PeriodStats,
    pub throughput_pct_change: Option<f64>,
    pub cycle_time_pct_change: Option<f64>,
    pub review_time_pct_change: Option<f64>,
}

/// Compare `[start, end]` against `[start - len, start - 1 day]` on
/// throughput, cycle time, and review time.
pub fn compare_periods(
    team_id: Uuid,
    start: NaiveDate,
    end: NaiveDate,
    prs: &[PullRequestRecord],
) -> PeriodComparison {
    let len_days = (end - start).num_days() + 1;
    let prev_start = start - Duration::days(len_days);
    let prev_end = start - Duration::days(1);

    tracing::debug!(
        team = %team_id,
        %start,
        %end,
        %prev_start,
        %prev_end,
        "comparing periods"
    );

    let current = aggregate_window(start, end, prs);
    let previous = aggregate_window(prev_start, prev_end, prs);

    PeriodComparison {
        throughput_pct_change: count_pct_change(current.merged_count, previous.merged_count),
        cycle_time_pct_change: avg_pct_change(
            current.avg_cycle_time_hours,
            previous.avg_cycle_time_hours,
        ),
        review_time_pct_change: avg_pct_change(
            current.avg_review_time_hours,
            previous.avg_review_time_hours,
        ),
        current,
        previous,
    }
}

fn aggregate_window(start: NaiveDate, end: NaiveDate, prs: &[PullRequestRecord]) -> PeriodStats {
    let mut merged_count = 0usize;
    let mut cycles = Vec::new();
    let mut reviews = Vec::new();

    for pr in prs {
        if !pr.is_merged() {
            continue;
        }
        let Some(merged_on) = pr.merged_on() else {
            continue;
        };
        if merged_on < start || merged_on > end {
            continue;
        }
        merged_count += 1;
        if let Some(cycle) = pr.cycle_time_hours {
            cycles.push(cycle);
        }
        if let Some(review) = pr.review_time_hours {
            reviews.push(review);
        }
    }

    PeriodStats {
        start,
        end,
        merged_count,
        avg_cycle_time_hours: mean(&cycles),
        avg_review_time_hours: mean(&reviews),
    }
}

/// None when the previous count is zero — a change from nothing is
/// undefined, not infinite. A collapse to zero from a nonzero previous
/// reads as exactly -100.
fn count_pct_change(current: usize, previous: usize) -> Option<f64> {
    if previous == 0 {
        return None;
    }
    Some((current as f64 - previous as f64) / previous as f64 * 100.0)
}

fn avg_pct_change(current: Option<f64>, previous: Option<f64>) -> Option<f64> {
    match (current, previous) {
        (Some(current), Some(previous)) if previous != 0.0 => {
            Some((current - previous) / previous * 100.0)
        }
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::records::PrState;
    use chrono::{Datelike, TimeZone, Utc};

    fn day(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn merged_pr_on(date: NaiveDate, cycle: Option<f64>, review: Option<f64>) -> PullRequestRecord {
        let merged_at = Utc
            .with_ymd_and_hms(date.year(), date.month(), date.day(), 12, 0, 0)
            .unwrap();
        PullRequestRecord {
            id: Uuid::new_v4(),
            author_id: "dev".to_string(),
            state: PrState::Merged,
            created_at: merged_at - Duration::hours(12),
            merged_at: Some(merged_at),
            cycle_time_hours: cycle,
            review_time_hours: review,
            additions: 30,
            deletions: 3,
            is_revert: false,
            is_hotfix: false,
            jira_key: String::new(),
        }
    }

    #[test]
    fn previous_window_is_adjacent_and_equal_length() {
        let comparison = compare_periods(Uuid::new_v4(), day(2026, 3, 15), day(2026, 3, 28), &[]);
        assert_eq!(comparison.previous.start, day(2026, 3, 1));
        assert_eq!(comparison.previous.end, day(2026, 3, 14));
        let current_len = comparison.current.end - comparison.current.start;
        let previous_len = comparison.previous.end - comparison.previous.start;
        assert_eq!(current_len, previous_len);
    }

    #[test]
    fn throughput_change_is_computed_per_window() {
        let mut prs: Vec<_> = (0..5)
            .map(|i| merged_pr_on(day(2026, 3, 1) + Duration::days(i), Some(20.0), Some(5.0)))
            .collect();
        prs.extend((0..8).map(|i| {
            merged_pr_on(day(2026, 3, 15) + Duration::days(i), Some(10.0), Some(4.0))
        }));

        let comparison = compare_periods(Uuid::new_v4(), day(2026, 3, 15), day(2026, 3, 28), &prs);
        assert_eq!(comparison.current.merged_count, 8);
        assert_eq!(comparison.previous.merged_count, 5);
        // (8 - 5) / 5 * 100 = 60
        assert_eq!(comparison.throughput_pct_change, Some(60.0));
        // (10 - 20) / 20 * 100 = -50, i.e. cycle time halved: improvement.
        assert_eq!(comparison.cycle_time_pct_change, Some(-50.0));
        // (4 - 5) / 5 * 100 = -20
        assert_eq!(comparison.review_time_pct_change, Some(-20.0));
    }

    #[test]
    fn collapse_to_zero_throughput_is_minus_one_hundred() {
        let prs: Vec<_> = (0..5)
            .map(|i| merged_pr_on(day(2026, 3, 1) + Duration::days(i), Some(20.0), None))
            .collect();

        let comparison = compare_periods(Uuid::new_v4(), day(2026, 3, 15), day(2026, 3, 28), &prs);
        assert_eq!(comparison.current.merged_count, 0);
        assert_eq!(comparison.throughput_pct_change, Some(-100.0));
    }

    #[test]
    fn zero_previous_throughput_is_undefined() {
        let prs: Vec<_> = (0..3)
            .map(|i| merged_pr_on(day(2026, 3, 15) + Duration::days(i), Some(20.0), None))
            .collect();

        let comparison = compare_periods(Uuid::new_v4(), day(2026, 3, 15), day(2026, 3, 28), &prs);
        assert_eq!(comparison.previous.merged_count, 0);
        assert_eq!(comparison.throughput_pct_change, None);
    }

    #[test]
    fn empty_both_windows_is_undefined_not_zero() {
        let comparison = compare_periods(Uuid::new_v4(), day(2026, 3, 15), day(2026, 3, 28), &[]);
        assert_eq!(comparison.throughput_pct_change, None);
        assert_eq!(comparison.cycle_time_pct_change, None);
        assert_eq!(comparison.review_time_pct_change, None);
    }

    #[test]
    fn missing_average_makes_change_undefined() {
        // Current PRs carry no review time at all.
        let mut prs: Vec<_> = (0..3)
            .map(|i| merged_pr_on(day(2026, 3, 1) + Duration::days(i), Some(20.0), Some(5.0)))
            .collect();
        prs.extend(
            (0..3).map(|i| merged_pr_on(day(2026, 3, 15) + Duration::days(i), Some(10.0), None)),
        );

        let comparison = compare_periods(Uuid::new_v4(), day(2026, 3, 15), day(2026, 3, 28), &prs);
        assert_eq!(comparison.cycle_time_pct_change, Some(-50.0));
        assert_eq!(comparison.review_time_pct_change, None);
    }

    #[test]
    fn open_prs_do_not_count_toward_throughput() {
        let mut pr = merged_pr_on(day(2026, 3, 20), Some(10.0), None);
        pr.state = PrState::Open;
        pr.merged_at = None;

        let comparison = compare_periods(Uuid::new_v4(), day(2026, 3, 15), day(2026, 3, 28), &[pr]);
        assert_eq!(comparison.current.merged_count, 0);
    }
}
