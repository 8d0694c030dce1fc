use anyhow::Context;
use chrono::{Duration, Utc};
use clap::Parser;

use cadence_analytics::scenario::{generate_usage, Scenario};
use cadence_common::init_tracing;

#[derive(Parser)]
#[command(name = "cadence-seed")]
#[command(about = "Generate deterministic demo usage data", long_about = None)]
struct Cli {
    /// Scenario profile to generate
    #[arg(long, default_value = "high_adoption")]
    scenario: String,

    /// RNG seed; identical seeds reproduce identical output
    #[arg(long, default_value_t = 42)]
    seed: u64,

    /// Number of synthetic members
    #[arg(long, default_value_t = 8)]
    members: usize,

    /// Number of days, ending today
    #[arg(long, default_value_t = 28)]
    days: i64,

    /// Pretty-print the JSON output
    #[arg(long, default_value_t = false)]
    pretty: bool,
}

fn main() -> anyhow::Result<()> {
    init_tracing("info");
    let cli = Cli::parse();

    let scenario = cli.scenario.parse::<Scenario>()?;
    let until = Utc::now().date_naive();
    let since = until - Duration::days(cli.days.max(1) - 1);
    let member_ids: Vec<String> = (1..=cli.members.max(1))
        .map(|i| format!("member-{i:02}"))
        .collect();

    let records = generate_usage(cli.seed, scenario, &member_ids, since, until)
        .context("failed to generate usage records")?;
    tracing::info!(
        scenario = scenario.as_str(),
        seed = cli.seed,
        records = records.len(),
        "generated usage records"
    );

    let output = if cli.pretty {
        serde_json::to_string_pretty(&records)?
    } else {
        serde_json::to_string(&records)?
    };
    println!("{output}");

    Ok(())
}
