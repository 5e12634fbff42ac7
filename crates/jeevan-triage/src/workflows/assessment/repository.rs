use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::domain::{ComplaintId, Question, SessionId, SessionState};
use super::recommendation::{RecommendationOutcome, SeverityTier, SuggestedAction};
use super::session::AssessmentSession;

/// Repository record wrapping a session with its outcome and bookkeeping.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AssessmentRecord {
    pub session_id: SessionId,
    pub session: AssessmentSession,
    pub outcome: Option<RecommendationOutcome>,
    pub notes: Vec<String>,
    pub revision: u64,
    pub started_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub completed_at: Option<DateTime<Utc>>,
}

impl AssessmentRecord {
    pub fn new(session_id: SessionId, session: AssessmentSession, now: DateTime<Utc>) -> Self {
        Self {
            session_id,
            session,
            outcome: None,
            notes: Vec::new(),
            revision: 0,
            started_at: now,
            updated_at: now,
            completed_at: None,
        }
    }

    /// Bumps the revision so the repository can reject stale writes.
    pub(crate) fn touch(&mut self, now: DateTime<Utc>) {
        self.revision += 1;
        self.updated_at = now;
    }
}

/// Storage abstraction so the service can be exercised in isolation.
///
/// `update` must reject a record whose revision is not exactly one past the stored
/// revision with [`RepositoryError::Conflict`].
pub trait AssessmentRepository: Send + Sync {
    fn insert(&self, record: AssessmentRecord) -> Result<AssessmentRecord, RepositoryError>;
    fn update(&self, record: AssessmentRecord) -> Result<(), RepositoryError>;
    fn fetch(&self, id: &SessionId) -> Result<Option<AssessmentRecord>, RepositoryError>;
    /// Completed assessments, newest first.
    fn completed(&self, limit: usize) -> Result<Vec<AssessmentRecord>, RepositoryError>;
}

#[derive(Debug, thiserror::Error)]
pub enum RepositoryError {
    #[error("record conflicts with the stored revision")]
    Conflict,
    #[error("record not found")]
    NotFound,
    #[error("repository unavailable: {0}")]
    Unavailable(String),
}

/// Outbound hook asking the doctor-discovery screen to open with a filter hint.
pub trait ReferralPublisher: Send + Sync {
    fn publish(&self, referral: DoctorReferral) -> Result<(), ReferralError>;
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DoctorReferral {
    pub session_id: SessionId,
    pub complaint_id: ComplaintId,
    pub severity_tier: SeverityTier,
    pub suggested_action: SuggestedAction,
}

#[derive(Debug, thiserror::Error)]
pub enum ReferralError {
    #[error("doctor discovery unavailable: {0}")]
    Transport(String),
}

/// Public view of an assessment for API responses.
#[derive(Debug, Clone, Serialize)]
pub struct AssessmentStatusView {
    pub session_id: SessionId,
    pub complaint_id: ComplaintId,
    pub state: SessionState,
    pub answered: usize,
    pub total_questions: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub current_question: Option<QuestionView>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub outcome: Option<RecommendationOutcome>,
    pub started_at: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub completed_at: Option<DateTime<Utc>>,
}

/// Question as presented to the patient, with answer values and labels.
#[derive(Debug, Clone, Serialize)]
pub struct QuestionView {
    pub index: usize,
    pub text: String,
    pub options: Vec<AnswerOptionView>,
}

#[derive(Debug, Clone, Serialize)]
pub struct AnswerOptionView {
    pub value: String,
    pub label: String,
}

impl QuestionView {
    pub fn from_question(index: usize, question: &Question) -> Self {
        Self {
            index,
            text: question.text.clone(),
            options: question
                .allowed_answers
                .iter()
                .map(|option| AnswerOptionView {
                    value: option.value.to_string(),
                    label: option.label.clone(),
                })
                .collect(),
        }
    }
}
