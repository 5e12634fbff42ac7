mod config;
mod policy;
mod rules;

pub use config::TriageThresholds;
pub use policy::{SeverityTier, SuggestedAction};

use super::catalog::SymptomCatalog;
use super::domain::{AnswerSignal, AnswerValue, AssessmentError, ComplaintId};
use super::session::AssessmentSession;
use policy::decide_tier;
use serde::{Deserialize, Serialize};

/// Stateless engine turning a completed session into a triage outcome.
#[derive(Debug, Clone, Default)]
pub struct RecommendationEngine {
    thresholds: TriageThresholds,
}

impl RecommendationEngine {
    pub fn new(thresholds: TriageThresholds) -> Self {
        Self { thresholds }
    }

    pub fn thresholds(&self) -> &TriageThresholds {
        &self.thresholds
    }

    /// Same complaint and answers always produce the same outcome.
    pub fn recommend(
        &self,
        catalog: &SymptomCatalog,
        session: &AssessmentSession,
    ) -> Result<RecommendationOutcome, AssessmentError> {
        let (components, score) = rules::weigh_answers(catalog, session)?;
        let severity_tier = decide_tier(score, &self.thresholds);

        Ok(RecommendationOutcome {
            complaint_id: session.complaint_id(),
            severity_tier,
            suggested_action: severity_tier.suggested_action(),
            message: severity_tier.message().to_string(),
            score,
            components,
        })
    }
}

/// Weight contributed by a single recorded answer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoreComponent {
    pub question_index: usize,
    pub answer: AnswerValue,
    pub signal: AnswerSignal,
    pub weight: f64,
}

/// Triage result rendered to the patient. Never mutated once produced.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecommendationOutcome {
    pub complaint_id: ComplaintId,
    pub severity_tier: SeverityTier,
    pub suggested_action: SuggestedAction,
    pub message: String,
    pub score: f64,
    pub components: Vec<ScoreComponent>,
}
