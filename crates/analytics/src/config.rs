use serde::{Deserialize, Serialize};

/// Weights for the three composite score axes. Must sum to 1.0.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScoreWeights {
    pub capability: f64,
    pub speed: f64,
    pub quality: f64,
}

impl Default for ScoreWeights {
    fn default() -> Self {
        Self {
            capability: 0.40,
            speed: 0.35,
            quality: 0.25,
        }
    }
}

/// Minimum activity a member must show before being ranked at all.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QualificationThresholds {
    pub min_active_days: usize,
    pub min_merged_prs: usize,
    pub min_acceptance_rate: f64,
}

impl Default for QualificationThresholds {
    fn default() -> Self {
        Self {
            min_active_days: 5,
            min_merged_prs: 3,
            min_acceptance_rate: 20.0,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BottleneckPolicy {
    /// A reviewer is flagged when pending load exceeds this multiple of
    /// the team average (strict inequality).
    pub load_multiplier: f64,
    /// Below this many distinct reviewers there is no team to compare
    /// against and no alert is raised.
    pub min_reviewers: usize,
}

impl Default for BottleneckPolicy {
    fn default() -> Self {
        Self {
            load_multiplier: 3.0,
            min_reviewers: 2,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalyticsConfig {
    pub weights: ScoreWeights,
    pub qualification: QualificationThresholds,
    pub bottleneck: BottleneckPolicy,
    /// How many champions to return.
    pub top_n: usize,
}

impl Default for AnalyticsConfig {
    fn default() -> Self {
        Self {
            weights: ScoreWeights::default(),
            qualification: QualificationThresholds::default(),
            bottleneck: BottleneckPolicy::default(),
            top_n: 3,
        }
    }
}
