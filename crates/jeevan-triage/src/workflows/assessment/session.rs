use serde::{Deserialize, Serialize};

use super::catalog::SymptomCatalog;
use super::domain::{
    AnswerValue, AssessmentError, ComplaintId, Question, RecordedAnswer, SessionState,
};

/// One run through a complaint's question sequence.
///
/// The session is a plain value owned by whoever drives the flow. Every operation takes the
/// catalog explicitly so no global lookup table is involved.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AssessmentSession {
    complaint_id: ComplaintId,
    position: usize,
    answers: Vec<RecordedAnswer>,
    state: SessionState,
}

impl AssessmentSession {
    pub fn start(
        catalog: &SymptomCatalog,
        complaint_id: ComplaintId,
    ) -> Result<Self, AssessmentError> {
        catalog.node(complaint_id)?;

        Ok(Self {
            complaint_id,
            position: 0,
            answers: Vec::new(),
            state: SessionState::InProgress,
        })
    }

    pub fn complaint_id(&self) -> ComplaintId {
        self.complaint_id
    }

    pub fn position(&self) -> usize {
        self.position
    }

    pub fn answers(&self) -> &[RecordedAnswer] {
        &self.answers
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    pub fn current_question<'c>(
        &self,
        catalog: &'c SymptomCatalog,
    ) -> Result<&'c Question, AssessmentError> {
        self.ensure_in_progress()?;
        let questions = catalog.questions(self.complaint_id)?;
        questions
            .get(self.position)
            .ok_or_else(|| AssessmentError::invalid_state(SessionState::InProgress, "exhausted"))
    }

    /// Records the answer to the current question and advances by exactly one step.
    ///
    /// Replaying the same answer records it twice, so a single user action must map to a
    /// single call. Rejected answers leave the session untouched.
    pub fn record_answer(
        &mut self,
        catalog: &SymptomCatalog,
        answer: AnswerValue,
    ) -> Result<SessionState, AssessmentError> {
        let question = self.current_question(catalog)?;
        if !question.allows(&answer) {
            return Err(AssessmentError::InvalidAnswer {
                answer,
                question_index: self.position,
            });
        }

        let total = catalog.questions(self.complaint_id)?.len();

        self.answers.push(RecordedAnswer {
            question_index: self.position,
            value: answer,
        });
        self.position += 1;

        if self.position == total {
            self.state = SessionState::Completed;
        }

        Ok(self.state)
    }

    pub fn abandon(&mut self) -> Result<(), AssessmentError> {
        self.ensure_in_progress()?;
        self.state = SessionState::Abandoned;
        Ok(())
    }

    /// `(answered, total)` for "question n of m" style progress displays.
    pub fn progress(&self, catalog: &SymptomCatalog) -> Result<(usize, usize), AssessmentError> {
        let total = catalog.questions(self.complaint_id)?.len();
        Ok((self.answers.len(), total))
    }

    fn ensure_in_progress(&self) -> Result<(), AssessmentError> {
        if self.state == SessionState::InProgress {
            Ok(())
        } else {
            Err(AssessmentError::invalid_state(
                SessionState::InProgress,
                self.state,
            ))
        }
    }
}
