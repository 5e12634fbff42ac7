use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use chrono::Utc;
use tracing::{debug, info, warn};

use super::catalog::SymptomCatalog;
use super::domain::{
    AnswerValue, AssessmentError, ComplaintId, ComplaintSummary, Question, SessionId,
    SessionState,
};
use super::recommendation::{RecommendationEngine, RecommendationOutcome, TriageThresholds};
use super::repository::{
    AssessmentRecord, AssessmentRepository, AssessmentStatusView, DoctorReferral, QuestionView,
    ReferralPublisher, RepositoryError,
};
use super::session::AssessmentSession;
use crate::voice::{Language, Speaker, Utterance};

/// Flow controller composing the catalog, session store, engine and outbound hooks.
///
/// Each stored session is advanced only through this service, which writes it back with a
/// bumped revision so concurrent callers cannot both advance the same position.
pub struct AssessmentService<R, P> {
    catalog: Arc<SymptomCatalog>,
    repository: Arc<R>,
    referrals: Arc<P>,
    engine: Arc<RecommendationEngine>,
    speaker: Option<Arc<dyn Speaker>>,
    language: Language,
    sequence: AtomicU64,
}

impl<R, P> AssessmentService<R, P>
where
    R: AssessmentRepository + 'static,
    P: ReferralPublisher + 'static,
{
    pub fn new(repository: Arc<R>, referrals: Arc<P>, thresholds: TriageThresholds) -> Self {
        Self::with_catalog(
            Arc::new(SymptomCatalog::standard()),
            repository,
            referrals,
            thresholds,
        )
    }

    pub fn with_catalog(
        catalog: Arc<SymptomCatalog>,
        repository: Arc<R>,
        referrals: Arc<P>,
        thresholds: TriageThresholds,
    ) -> Self {
        Self {
            catalog,
            repository,
            referrals,
            engine: Arc::new(RecommendationEngine::new(thresholds)),
            speaker: None,
            language: Language::default(),
            sequence: AtomicU64::new(1),
        }
    }

    /// Reads the current question and final message aloud through `speaker`.
    pub fn with_speaker(mut self, speaker: Arc<dyn Speaker>, language: Language) -> Self {
        self.speaker = Some(speaker);
        self.language = language;
        self
    }

    pub fn catalog(&self) -> &SymptomCatalog {
        &self.catalog
    }

    pub fn list_complaints(&self) -> Vec<ComplaintSummary> {
        self.catalog.list_complaints()
    }

    pub fn questions(
        &self,
        complaint_id: ComplaintId,
    ) -> Result<&[Question], AssessmentServiceError> {
        Ok(self.catalog.questions(complaint_id)?)
    }

    /// Start a new assessment and persist it as in progress.
    pub fn start(
        &self,
        complaint_id: ComplaintId,
    ) -> Result<AssessmentRecord, AssessmentServiceError> {
        let session = AssessmentSession::start(&self.catalog, complaint_id)?;
        let record = AssessmentRecord::new(self.next_session_id(), session, Utc::now());
        let stored = self.repository.insert(record)?;

        info!(session_id = %stored.session_id, complaint = %complaint_id, "assessment started");
        self.speak_current_question(&stored);

        Ok(stored)
    }

    pub fn current_question(
        &self,
        session_id: &SessionId,
    ) -> Result<QuestionView, AssessmentServiceError> {
        let record = self.load(session_id)?;
        let question = record.session.current_question(&self.catalog)?;
        Ok(QuestionView::from_question(
            record.session.position(),
            question,
        ))
    }

    /// Record one answer. Completing the last question also produces the outcome and, for
    /// medium or high tiers, a best-effort doctor referral.
    pub fn record_answer(
        &self,
        session_id: &SessionId,
        answer: AnswerValue,
    ) -> Result<AssessmentRecord, AssessmentServiceError> {
        let mut record = self.load(session_id)?;
        let question_index = record.session.position();
        let state = record.session.record_answer(&self.catalog, answer.clone())?;

        let now = Utc::now();
        record.touch(now);
        if state == SessionState::Completed {
            let outcome = self.engine.recommend(&self.catalog, &record.session)?;
            record.outcome = Some(outcome);
            record.completed_at = Some(now);
        }

        self.repository.update(record.clone())?;
        debug!(%session_id, question_index, %answer, "answer recorded");

        match &record.outcome {
            Some(outcome) => {
                info!(
                    %session_id,
                    tier = ?outcome.severity_tier,
                    score = outcome.score,
                    "assessment completed"
                );
                self.speak(&outcome.message);
                self.refer(&record.session_id, outcome);
            }
            None => self.speak_current_question(&record),
        }

        Ok(record)
    }

    /// Free text is kept on the transcript but never scored. Blank notes are rejected.
    pub fn add_note(
        &self,
        session_id: &SessionId,
        text: &str,
    ) -> Result<AssessmentRecord, AssessmentServiceError> {
        let mut record = self.load(session_id)?;
        if record.session.state().is_terminal() {
            return Err(AssessmentError::invalid_state(
                SessionState::InProgress,
                record.session.state(),
            )
            .into());
        }

        let note = text.trim();
        if note.is_empty() {
            return Err(AssessmentError::EmptyNote.into());
        }

        let note = note.to_string();
        debug!(%session_id, note = %note, "free-text note received");
        record.notes.push(note);
        record.touch(Utc::now());
        self.repository.update(record.clone())?;

        Ok(record)
    }

    pub fn abandon(
        &self,
        session_id: &SessionId,
    ) -> Result<AssessmentRecord, AssessmentServiceError> {
        let mut record = self.load(session_id)?;
        record.session.abandon()?;
        record.touch(Utc::now());
        self.repository.update(record.clone())?;

        info!(%session_id, answered = record.session.answers().len(), "assessment abandoned");
        Ok(record)
    }

    /// Outcome of a completed assessment; any other state is rejected.
    pub fn recommendation(
        &self,
        session_id: &SessionId,
    ) -> Result<RecommendationOutcome, AssessmentServiceError> {
        let record = self.load(session_id)?;
        match record.outcome {
            Some(outcome) => Ok(outcome),
            None => Ok(self.engine.recommend(&self.catalog, &record.session)?),
        }
    }

    pub fn get(&self, session_id: &SessionId) -> Result<AssessmentRecord, AssessmentServiceError> {
        self.load(session_id)
    }

    /// Completed assessments, newest first.
    pub fn history(&self, limit: usize) -> Result<Vec<AssessmentRecord>, AssessmentServiceError> {
        Ok(self.repository.completed(limit)?)
    }

    pub fn status_view(&self, record: &AssessmentRecord) -> AssessmentStatusView {
        let session = &record.session;
        let (answered, total_questions) = session
            .progress(&self.catalog)
            .unwrap_or((session.answers().len(), 0));
        let current_question = session
            .current_question(&self.catalog)
            .ok()
            .map(|question| QuestionView::from_question(session.position(), question));

        AssessmentStatusView {
            session_id: record.session_id.clone(),
            complaint_id: session.complaint_id(),
            state: session.state(),
            answered,
            total_questions,
            current_question,
            outcome: record.outcome.clone(),
            started_at: record.started_at,
            completed_at: record.completed_at,
        }
    }

    fn load(&self, session_id: &SessionId) -> Result<AssessmentRecord, AssessmentServiceError> {
        let record = self
            .repository
            .fetch(session_id)?
            .ok_or(RepositoryError::NotFound)?;
        Ok(record)
    }

    fn next_session_id(&self) -> SessionId {
        let id = self.sequence.fetch_add(1, Ordering::Relaxed);
        SessionId(format!("asmt-{id:06}"))
    }

    fn refer(&self, session_id: &SessionId, outcome: &RecommendationOutcome) {
        if !outcome.severity_tier.warrants_referral() {
            return;
        }

        let referral = DoctorReferral {
            session_id: session_id.clone(),
            complaint_id: outcome.complaint_id,
            severity_tier: outcome.severity_tier,
            suggested_action: outcome.suggested_action,
        };

        if let Err(err) = self.referrals.publish(referral) {
            warn!(%session_id, error = %err, "doctor referral could not be delivered");
        }
    }

    fn speak_current_question(&self, record: &AssessmentRecord) {
        if let Ok(question) = record.session.current_question(&self.catalog) {
            self.speak(&question.text);
        }
    }

    fn speak(&self, text: &str) {
        if let Some(speaker) = &self.speaker {
            speaker.speak(&Utterance::new(text, self.language));
        }
    }
}

/// Error raised by the assessment service.
#[derive(Debug, thiserror::Error)]
pub enum AssessmentServiceError {
    #[error(transparent)]
    Assessment(#[from] AssessmentError),
    #[error(transparent)]
    Repository(#[from] RepositoryError),
}
