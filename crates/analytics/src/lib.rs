pub mod bottleneck;
pub mod champions;
pub mod config;
pub mod distribution;
pub mod periods;
pub mod records;
pub mod scenario;
pub mod stats;
pub mod trends;

pub use bottleneck::{detect_bottleneck, BottleneckAlert};
pub use champions::{find_champions, ChampionEntry};
pub use config::AnalyticsConfig;
pub use distribution::{pr_size_distribution, story_point_distribution, BucketRow};
pub use periods::{compare_periods, PeriodComparison};
pub use scenario::{generate_usage, Scenario};
pub use trends::{
    acceptance_trend, ai_adoption_trend, cycle_time_trend, review_time_trend, TrendPoint,
};
