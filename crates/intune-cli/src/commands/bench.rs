//! `intune bench` -- repeat pipeline runs and report latency percentiles.
//!
//! Each iteration runs one utterance through the same [`Pipeline`] and
//! records its `total_ms`. Without `--text` the runs cycle through a fixed
//! set of everyday utterances. The run meets its target when p95 is strictly
//! below the configured total budget.
//!
//! ```text
//! intune bench
//! intune bench -n 20 -t "요즘 잠을 못 자요"
//! intune bench --no-latency --json
//! ```

use std::fmt::Write as _;

use anyhow::bail;
use clap::Args;
use comfy_table::{Table, presets::UTF8_FULL};
use serde::Serialize;
use tracing::{info, warn};

use intune_core::{Pipeline, build_pipeline};
use intune_types::{PipelineMode, Utterance};

/// Utterances cycled through when `--text` is not given.
pub const BENCH_SAMPLES: &[&str] = &[
    "안녕하세요, 오늘 기분이 어떠세요?",
    "요즘 너무 힘들고 우울해요",
    "직장 스트레스로 잠을 못 자고 있어요",
    "가족과의 관계가 어려워요",
    "미래가 불안해요",
];

/// Arguments for `intune bench`.
#[derive(Args, Debug)]
pub struct BenchArgs {
    /// Number of pipeline runs.
    #[arg(short = 'n', long, default_value_t = 100, value_parser = clap::value_parser!(u32).range(1..))]
    pub iterations: u32,

    /// Utterance used for every run instead of the built-in samples.
    #[arg(short, long)]
    pub text: Option<String>,

    /// Collaborator mode: simulation (alias mock) or live. Overrides config.
    #[arg(short, long)]
    pub mode: Option<PipelineMode>,

    /// Print the statistics as JSON.
    #[arg(short, long)]
    pub json: bool,

    /// Config file path (overrides auto-discovery).
    #[arg(short, long)]
    pub config: Option<String>,

    /// Skip the simulated collaborator latencies.
    #[arg(long)]
    pub no_latency: bool,
}

/// Latency statistics over the successful runs, in milliseconds.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LatencyStats {
    pub total_requests: usize,
    pub successful_requests: usize,
    pub failed_requests: usize,
    pub min: f64,
    pub max: f64,
    pub mean: f64,
    pub median: f64,
    /// Sample standard deviation; 0 for a single run.
    pub stdev: f64,
    pub p50: f64,
    pub p75: f64,
    pub p90: f64,
    pub p95: f64,
    pub p99: f64,
    pub target_ms: u64,
    pub meets_target: bool,
}

impl LatencyStats {
    /// Summarize `samples`. Returns `None` when no run succeeded.
    pub fn from_samples(samples: &[u64], failed: usize, target_ms: u64) -> Option<Self> {
        if samples.is_empty() {
            return None;
        }
        let mut sorted: Vec<f64> = samples.iter().map(|&ms| ms as f64).collect();
        sorted.sort_by(f64::total_cmp);

        let n = sorted.len() as f64;
        let mean = sorted.iter().sum::<f64>() / n;
        let stdev = if sorted.len() > 1 {
            let var = sorted.iter().map(|x| (x - mean).powi(2)).sum::<f64>() / (n - 1.0);
            var.sqrt()
        } else {
            0.0
        };
        let p95 = percentile(&sorted, 95.0);

        Some(Self {
            total_requests: samples.len() + failed,
            successful_requests: samples.len(),
            failed_requests: failed,
            min: sorted[0],
            max: sorted[sorted.len() - 1],
            mean,
            median: percentile(&sorted, 50.0),
            stdev,
            p50: percentile(&sorted, 50.0),
            p75: percentile(&sorted, 75.0),
            p90: percentile(&sorted, 90.0),
            p95,
            p99: percentile(&sorted, 99.0),
            target_ms,
            meets_target: p95 < target_ms as f64,
        })
    }
}

/// Linear-interpolated percentile of an ascending, non-empty slice.
pub fn percentile(sorted: &[f64], pct: f64) -> f64 {
    let rank = (pct / 100.0) * (sorted.len() - 1) as f64;
    let lo = rank.floor() as usize;
    let hi = rank.ceil() as usize;
    sorted[lo] + (sorted[hi] - sorted[lo]) * (rank - lo as f64)
}

/// Run the pipeline `iterations` times, returning the `total_ms` of each
/// successful run and the number of failed runs.
pub async fn collect(pipeline: &Pipeline, texts: &[String], iterations: usize) -> (Vec<u64>, usize) {
    let mut samples = Vec::with_capacity(iterations);
    let mut failed = 0;
    for (i, text) in texts.iter().cycle().take(iterations).enumerate() {
        match pipeline.run(&Utterance::new(text.as_str())).await {
            Ok(result) => samples.push(result.total_ms),
            Err(e) => {
                warn!(iteration = i, stage = %e.stage(), error = %e, "bench run failed");
                failed += 1;
            }
        }
    }
    (samples, failed)
}

/// Execute `intune bench`.
pub async fn run(args: BenchArgs) -> anyhow::Result<()> {
    let config = super::load_run_config(args.config.as_deref(), args.mode, args.no_latency)?;
    let pipeline = build_pipeline(&config)?;
    let texts: Vec<String> = match args.text {
        Some(text) => vec![text],
        None => BENCH_SAMPLES.iter().map(|s| s.to_string()).collect(),
    };

    info!(iterations = args.iterations, mode = %config.mode, "starting latency benchmark");
    let (samples, failed) = collect(&pipeline, &texts, args.iterations as usize).await;
    let Some(stats) =
        LatencyStats::from_samples(&samples, failed, pipeline.budgets().total_target_ms)
    else {
        bail!("all {failed} benchmark runs failed");
    };

    if args.json {
        println!("{}", serde_json::to_string_pretty(&stats)?);
    } else {
        print!("{}", render_stats(&stats));
    }
    Ok(())
}

/// Human-readable summary with a percentile table.
pub fn render_stats(stats: &LatencyStats) -> String {
    let mut out = String::new();
    let _ = writeln!(
        out,
        "requests: {} ({} failed)",
        stats.total_requests, stats.failed_requests
    );

    let mut table = Table::new();
    table.load_preset(UTF8_FULL);
    table.set_header(["METRIC", "LATENCY"]);
    for (name, value) in [
        ("min", stats.min),
        ("max", stats.max),
        ("mean", stats.mean),
        ("median", stats.median),
        ("stdev", stats.stdev),
        ("p50", stats.p50),
        ("p75", stats.p75),
        ("p90", stats.p90),
        ("p95", stats.p95),
        ("p99", stats.p99),
    ] {
        table.add_row([name.to_string(), format!("{value:.0}ms")]);
    }
    let _ = writeln!(out, "{table}");

    let _ = writeln!(
        out,
        "p95 {:.0}ms vs target {}ms: {}",
        stats.p95,
        stats.target_ms,
        if stats.meets_target {
            "meets target"
        } else {
            "misses target"
        }
    );
    out
}
