//! The per-utterance run: transcribe, assess safety, then either escalate
//! or generate and sanitize a reply, and finally synthesize voice.

use std::sync::Arc;

use tracing::{debug, info, warn};

use intune_types::config::{CrisisEmotion, LatencyBudget};
use intune_types::{
    CollaboratorError, ConfigError, EmotionSignal, PipelineConfig, PipelineError, PipelineResult,
    RiskAssessment, Stage, Utterance,
};

use super::budget::BudgetLedger;
use super::emotion::KeywordEmotionDetector;
use super::escalation::{EMERGENCY_REPLY, EscalationPolicy};
use super::lexicon::CrisisLexicon;
use super::risk::RiskScorer;
use super::sanitizer::TextSanitizer;
use super::selector::ResponseSelector;
use super::traits::{EmotionDetector, ReplyGenerator, Sanitizer, Transcriber, VoiceSynthesizer};

/// The three external collaborators a pipeline is built around.
#[derive(Clone)]
pub struct Collaborators {
    pub transcriber: Arc<dyn Transcriber>,
    pub generator: Arc<dyn ReplyGenerator>,
    pub synthesizer: Arc<dyn VoiceSynthesizer>,
}

/// A configured pipeline. Holds no per-run state, so one instance can
/// serve concurrent runs through `&self`.
pub struct Pipeline {
    transcriber: Arc<dyn Transcriber>,
    selector: ResponseSelector,
    synthesizer: Arc<dyn VoiceSynthesizer>,
    detector: Arc<dyn EmotionDetector>,
    sanitizer: Arc<dyn Sanitizer>,
    scorer: RiskScorer,
    budgets: LatencyBudget,
    enforce_deadlines: bool,
    crisis_emotion: CrisisEmotion,
}

impl Pipeline {
    /// Validate `config`, load the crisis lexicon and wire the stages.
    pub fn new(collaborators: Collaborators, config: &PipelineConfig) -> Result<Self, ConfigError> {
        config.validate()?;

        let lexicon = match config.safety.resolved_lexicon_path() {
            Some(path) => {
                debug!(path = %path.display(), "loading crisis lexicon");
                CrisisLexicon::from_path(&path)?
            }
            None => CrisisLexicon::builtin(),
        };
        let scorer = RiskScorer::new(
            lexicon.compile()?,
            EscalationPolicy::from_config(&config.safety),
        );

        Ok(Self {
            transcriber: collaborators.transcriber,
            selector: ResponseSelector::new(collaborators.generator),
            synthesizer: collaborators.synthesizer,
            detector: Arc::new(KeywordEmotionDetector::new()),
            sanitizer: Arc::new(TextSanitizer::new()?),
            scorer,
            budgets: config.budgets,
            enforce_deadlines: config.enforce_stage_deadlines,
            crisis_emotion: config.safety.crisis_emotion,
        })
    }

    pub fn with_emotion_detector(mut self, detector: Arc<dyn EmotionDetector>) -> Self {
        self.detector = detector;
        self
    }

    pub fn with_sanitizer(mut self, sanitizer: Arc<dyn Sanitizer>) -> Self {
        self.sanitizer = sanitizer;
        self
    }

    pub fn budgets(&self) -> &LatencyBudget {
        &self.budgets
    }

    /// Process one utterance end to end.
    ///
    /// Any collaborator failure aborts the run with
    /// [`PipelineError::StageFailed`]; no partial result is returned.
    pub async fn run(&self, utterance: &Utterance) -> intune_types::Result<PipelineResult> {
        let mut ledger = BudgetLedger::new(&self.budgets, self.enforce_deadlines);

        // ── transcribe ──────────────────────────────────────────────────
        let transcript = ledger
            .measure_collaborator(Stage::Transcribe, self.transcriber.transcribe(utterance))
            .await
            .map_err(|cause| stage_failed(Stage::Transcribe, cause))?;

        // ── assess_safety ───────────────────────────────────────────────
        let (safety, detected) = ledger
            .measure(Stage::AssessSafety, async {
                tokio::join!(self.scorer.score(&transcript), async {
                    self.detector.detect(&transcript)
                })
            })
            .await;

        // ── branch ──────────────────────────────────────────────────────
        let (response, voice_emotion) = if safety.is_critical() {
            warn!(
                score = safety.overall_score,
                intervention = %safety.intervention,
                "crisis detected, escalating"
            );
            (emergency_reply(&safety), self.crisis_voice(detected))
        } else {
            let draft = ledger
                .measure_collaborator(
                    Stage::GenerateReply,
                    self.selector
                        .select(&transcript, &detected, &safety, utterance.history()),
                )
                .await
                .map_err(|cause| stage_failed(Stage::GenerateReply, cause))?;

            let clean = ledger
                .measure(Stage::Sanitize, async { self.sanitizer.sanitize(&draft) })
                .await;
            (clean, detected)
        };

        // ── synthesize_voice ────────────────────────────────────────────
        let audio = ledger
            .measure_collaborator(
                Stage::SynthesizeVoice,
                self.synthesizer.synthesize(&response, &voice_emotion),
            )
            .await
            .map_err(|cause| stage_failed(Stage::SynthesizeVoice, cause))?;

        let report = ledger.finish();
        info!(
            generator = self.selector.generator_name(),
            tier = %safety.tier,
            emotion = %voice_emotion.primary,
            total_ms = report.total_ms,
            target_ms = report.total_target_ms,
            within_budget = report.within_budget,
            "pipeline run complete"
        );

        Ok(PipelineResult {
            input: utterance.text().to_string(),
            transcript,
            response,
            emotion: voice_emotion,
            safety,
            audio,
            timings: report.timings,
            total_ms: report.total_ms,
            total_target_ms: report.total_target_ms,
            within_budget: report.within_budget,
            budget_overruns: report.overruns,
        })
    }

    fn crisis_voice(&self, detected: EmotionSignal) -> EmotionSignal {
        match self.crisis_emotion {
            CrisisEmotion::Override => detected.crisis_override(),
            CrisisEmotion::Detected => detected,
        }
    }
}

impl std::fmt::Debug for Pipeline {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Pipeline")
            .field("transcriber", &self.transcriber.name())
            .field("selector", &self.selector)
            .field("synthesizer", &self.synthesizer.name())
            .field("budgets", &self.budgets)
            .field("enforce_deadlines", &self.enforce_deadlines)
            .finish_non_exhaustive()
    }
}

fn emergency_reply(safety: &RiskAssessment) -> String {
    safety
        .emergency_reply
        .clone()
        .unwrap_or_else(|| EMERGENCY_REPLY.to_string())
}

fn stage_failed(stage: Stage, cause: CollaboratorError) -> PipelineError {
    warn!(stage = %stage, error = %cause, "stage failed, aborting run");
    PipelineError::StageFailed { stage, cause }
}
