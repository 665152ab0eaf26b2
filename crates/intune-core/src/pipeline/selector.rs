//! Reply selection for the non-critical path.

use std::sync::Arc;

use intune_types::{CollaboratorError, EmotionSignal, Exchange, RiskAssessment};

use super::traits::{ReplyContext, ReplyGenerator};

/// Chooses a reply through the injected [`ReplyGenerator`].
///
/// Whether that is a canned table or a language model is decided once at
/// bootstrap; the selector only enforces that the reply is not blank.
#[derive(Clone)]
pub struct ResponseSelector {
    generator: Arc<dyn ReplyGenerator>,
}

impl ResponseSelector {
    pub fn new(generator: Arc<dyn ReplyGenerator>) -> Self {
        Self { generator }
    }

    pub fn generator_name(&self) -> &str {
        self.generator.name()
    }

    pub async fn select(
        &self,
        transcript: &str,
        emotion: &EmotionSignal,
        risk: &RiskAssessment,
        history: &[Exchange],
    ) -> Result<String, CollaboratorError> {
        let context = ReplyContext {
            transcript,
            emotion,
            risk,
            history,
        };
        let reply = self.generator.generate(&context).await?;
        let reply = reply.trim();
        if reply.is_empty() {
            return Err(CollaboratorError::generation(format!(
                "{} returned an empty reply",
                self.generator.name()
            )));
        }
        Ok(reply.to_string())
    }
}

impl std::fmt::Debug for ResponseSelector {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ResponseSelector")
            .field("generator", &self.generator_name())
            .finish()
    }
}
