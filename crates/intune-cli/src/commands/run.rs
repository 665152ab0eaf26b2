//! `intune run` -- push one utterance through the pipeline.
//!
//! Prints a readable report by default, or the full [`PipelineResult`] as
//! JSON with `--json`. Stage failures and config errors exit non-zero with
//! the stage and cause on stderr.
//!
//! ```text
//! intune run -t "요즘 잠을 못 자요"
//! intune run -t "불안해요" --json
//! intune run -m live -c ./intune.json
//! intune run --history-user "안녕" --history-assistant "안녕하세요" -t "오늘 힘들었어요"
//! ```

use std::fmt::Write as _;

use anyhow::bail;
use clap::Args;
use comfy_table::{Table, presets::UTF8_FULL};
use tracing::debug;

use intune_core::build_pipeline;
use intune_types::config::LatencyBudget;
use intune_types::{Exchange, PipelineMode, PipelineResult, Stage, Utterance};

/// Utterance used when `--text` is not given.
pub const DEFAULT_TEXT: &str = "안녕하세요, 오늘 기분이 어떠세요?";

/// Arguments for `intune run`.
#[derive(Args, Debug)]
pub struct RunArgs {
    /// Utterance text to process.
    #[arg(short, long, default_value = DEFAULT_TEXT)]
    pub text: String,

    /// Collaborator mode: simulation (alias mock) or live. Overrides config.
    #[arg(short, long)]
    pub mode: Option<PipelineMode>,

    /// Print the full result as JSON.
    #[arg(short, long)]
    pub json: bool,

    /// Config file path (overrides auto-discovery).
    #[arg(short, long)]
    pub config: Option<String>,

    /// Earlier user turn. Pair each with a --history-assistant.
    #[arg(long = "history-user", value_name = "TEXT")]
    pub history_user: Vec<String>,

    /// Earlier assistant reply, matched in order with --history-user.
    #[arg(long = "history-assistant", value_name = "TEXT")]
    pub history_assistant: Vec<String>,

    /// Skip the simulated collaborator latencies.
    #[arg(long)]
    pub no_latency: bool,
}

/// Execute `intune run`.
pub async fn run(args: RunArgs) -> anyhow::Result<()> {
    let config = super::load_run_config(args.config.as_deref(), args.mode, args.no_latency)?;

    let history = pair_history(&args.history_user, &args.history_assistant)?;
    debug!(mode = %config.mode, history = history.len(), "running utterance");
    let pipeline = build_pipeline(&config)?;
    let utterance = Utterance::new(args.text).with_history(history);
    let result = pipeline.run(&utterance).await?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&result)?);
    } else {
        print!("{}", render_report(&result, pipeline.budgets()));
    }
    Ok(())
}

fn pair_history(users: &[String], assistants: &[String]) -> anyhow::Result<Vec<Exchange>> {
    if users.len() != assistants.len() {
        bail!(
            "--history-user given {} time(s) but --history-assistant {} time(s)",
            users.len(),
            assistants.len()
        );
    }
    Ok(users
        .iter()
        .zip(assistants)
        .map(|(user, assistant)| Exchange::new(user.as_str(), assistant.as_str()))
        .collect())
}

/// Human-readable report: summary lines followed by the stage timeline.
pub fn render_report(result: &PipelineResult, budgets: &LatencyBudget) -> String {
    let mut out = String::new();
    let safety = &result.safety;

    let _ = writeln!(out, "input:      {}", result.input);
    let _ = writeln!(out, "transcript: {}", result.transcript);
    let _ = writeln!(
        out,
        "emotion:    {} ({:.2})",
        result.emotion.primary.as_str(),
        result.emotion.confidence
    );
    let _ = writeln!(
        out,
        "risk:       {} (score {:.2}, intervention {})",
        safety.tier.as_str(),
        safety.overall_score,
        safety.intervention.as_str()
    );
    let _ = writeln!(out, "reply:      {}", result.response);
    for resource in &safety.resources {
        let _ = writeln!(
            out,
            "resource:   {} {} ({})",
            resource.name, resource.number, resource.available
        );
    }
    let _ = writeln!(out, "audio:      {}", result.audio.as_str());
    let _ = writeln!(out);

    let mut table = Table::new();
    table.load_preset(UTF8_FULL);
    table.set_header(["STAGE", "ELAPSED", "BUDGET", "STATUS"]);
    for stage in Stage::ALL {
        let budget = budgets.for_stage(stage);
        let (elapsed, status) = match result.timings.get(stage) {
            Some(ms) if result.budget_overruns.contains(&stage) => (format!("{ms}ms"), "over"),
            Some(ms) => (format!("{ms}ms"), "ok"),
            None => ("-".to_string(), "skipped"),
        };
        table.add_row([
            stage.as_str().to_string(),
            elapsed,
            format!("{budget}ms"),
            status.to_string(),
        ]);
    }
    let _ = writeln!(out, "{table}");

    let _ = writeln!(
        out,
        "total: {}ms / {}ms ({})",
        result.total_ms,
        result.total_target_ms,
        if result.within_budget {
            "within budget"
        } else {
            "over budget"
        }
    );
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use intune_core::build_pipeline;
    use intune_types::PipelineConfig;

    fn quiet_config() -> PipelineConfig {
        let mut config = PipelineConfig::default();
        config.simulation.emulate_latency = false;
        config
    }

    #[test]
    fn history_pairs_in_order() {
        let users = vec!["a".to_string(), "c".to_string()];
        let assistants = vec!["b".to_string(), "d".to_string()];
        let history = pair_history(&users, &assistants).unwrap();
        assert_eq!(history, vec![Exchange::new("a", "b"), Exchange::new("c", "d")]);
    }

    #[test]
    fn unbalanced_history_is_rejected() {
        let err = pair_history(&["a".to_string()], &[]).unwrap_err();
        assert!(err.to_string().contains("--history-assistant"));
    }

    #[tokio::test]
    async fn report_lists_every_stage() {
        let pipeline = build_pipeline(&quiet_config()).unwrap();
        let result = pipeline.run(&Utterance::new(DEFAULT_TEXT)).await.unwrap();
        let report = render_report(&result, pipeline.budgets());

        for stage in Stage::ALL {
            assert!(report.contains(stage.as_str()), "missing {stage}");
        }
        assert!(report.contains("risk:       low"));
        assert!(report.contains("within budget"));
        assert!(!report.contains("skipped"));
    }

    #[tokio::test]
    async fn report_marks_skipped_stages_on_crisis() {
        let pipeline = build_pipeline(&quiet_config()).unwrap();
        let result = pipeline
            .run(&Utterance::new("죽고 싶어요"))
            .await
            .unwrap();
        let report = render_report(&result, pipeline.budgets());

        assert!(report.contains("risk:       critical"));
        assert!(report.contains("skipped"));
        assert!(report.contains("109"));
    }
}
