use std::cmp::Ordering;
use std::collections::{BTreeMap, HashSet};

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::config::AnalyticsConfig;
use crate::records::{PullRequestRecord, UsageRecord};
use crate::stats::{composite_score, mean, percentile_rank, ScoreAxes};

/// A ranked member with the raw stats behind the score.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChampionEntry {
    pub member_id: String,
    pub overall_score: f64,
    pub avg_acceptance_rate: f64,
    pub merged_prs: usize,
    pub avg_cycle_time_hours: f64,
    pub revert_rate: f64,
}

#[derive(Debug, Default)]
struct MemberAggregate {
    active_days: HashSet<NaiveDate>,
    day_rates: Vec<f64>,
    merged_count: usize,
    revert_count: usize,
    cycle_times: Vec<f64>,
}

impl MemberAggregate {
    fn avg_acceptance_rate(&self) -> f64 {
        mean(&self.day_rates).unwrap_or(0.0)
    }

    fn avg_cycle_time(&self) -> f64 {
        mean(&self.cycle_times).unwrap_or(0.0)
    }

    fn revert_rate(&self) -> f64 {
        if self.merged_count == 0 {
            0.0
        } else {
            self.revert_count as f64 / self.merged_count as f64
        }
    }
}

/// Rank the team's top assistant-powered shippers.
///
/// Members must clear every qualification threshold (active days, merged
/// PRs, acceptance rate) before being scored; the surviving set is ranked
/// by a weighted composite of per-metric percentiles within that set.
/// Ties are broken by ascending member id so identical inputs always
/// produce identical output.
pub fn find_champions(
    config: &AnalyticsConfig,
    team_id: Uuid,
    start: NaiveDate,
    end: NaiveDate,
    usage: &[UsageRecord],
    prs: &[PullRequestRecord],
) -> Vec<ChampionEntry> {
    tracing::debug!(
        team = %team_id,
        usage_records = usage.len(),
        pull_requests = prs.len(),
        "ranking champions"
    );

    let mut aggregates: BTreeMap<&str, MemberAggregate> = BTreeMap::new();

    for record in usage {
        if record.date < start || record.date > end {
            continue;
        }
        let entry = aggregates.entry(&record.member_id).or_default();
        entry.active_days.insert(record.date);
        if let Some(rate) = record.effective_acceptance_rate() {
            entry.day_rates.push(rate);
        }
    }

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
        let entry = aggregates.entry(&pr.author_id).or_default();
        entry.merged_count += 1;
        if pr.is_revert {
            entry.revert_count += 1;
        }
        if let Some(cycle) = pr.cycle_time_hours {
            entry.cycle_times.push(cycle);
        }
    }

    let thresholds = &config.qualification;
    let qualified: Vec<(&str, &MemberAggregate)> = aggregates
        .iter()
        .filter(|(_, agg)| {
            agg.active_days.len() >= thresholds.min_active_days
                && agg.merged_count >= thresholds.min_merged_prs
                && agg.avg_acceptance_rate() >= thresholds.min_acceptance_rate
        })
        .map(|(id, agg)| (*id, agg))
        .collect();

    if qualified.is_empty() {
        return Vec::new();
    }

    let acceptance_peers: Vec<f64> = qualified.iter().map(|(_, a)| a.avg_acceptance_rate()).collect();
    let cycle_peers: Vec<f64> = qualified.iter().map(|(_, a)| a.avg_cycle_time()).collect();
    let revert_peers: Vec<f64> = qualified.iter().map(|(_, a)| a.revert_rate()).collect();

    let mut champions: Vec<ChampionEntry> = qualified
        .iter()
        .map(|(member_id, agg)| {
            let acceptance = agg.avg_acceptance_rate();
            let cycle = agg.avg_cycle_time();
            let reverts = agg.revert_rate();
            let axes = ScoreAxes {
                capability: percentile_rank(acceptance, &acceptance_peers),
                // Lower cycle time and revert rate are better, so invert.
                speed: 100.0 - percentile_rank(cycle, &cycle_peers),
                quality: 100.0 - percentile_rank(reverts, &revert_peers),
            };
            ChampionEntry {
                member_id: member_id.to_string(),
                overall_score: composite_score(axes, &config.weights),
                avg_acceptance_rate: acceptance,
                merged_prs: agg.merged_count,
                avg_cycle_time_hours: cycle,
                revert_rate: reverts,
            }
        })
        .collect();

    champions.sort_by(|a, b| {
        b.overall_score
            .partial_cmp(&a.overall_score)
            .unwrap_or(Ordering::Equal)
            .then_with(|| a.member_id.cmp(&b.member_id))
    });
    champions.truncate(config.top_n);
    champions
}
