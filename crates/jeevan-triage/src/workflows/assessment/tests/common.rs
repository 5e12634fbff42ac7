use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use axum::response::Response;
use serde_json::Value;

use crate::voice::{Speaker, Utterance};
use crate::workflows::assessment::catalog::SymptomCatalog;
use crate::workflows::assessment::domain::{
    AnswerValue, ComplaintCategory, ComplaintId, Question, SessionId, SessionState, SymptomNode,
};
use crate::workflows::assessment::recommendation::TriageThresholds;
use crate::workflows::assessment::repository::{
    AssessmentRecord, AssessmentRepository, DoctorReferral, ReferralError, ReferralPublisher,
    RepositoryError,
};
use crate::workflows::assessment::session::AssessmentSession;
use crate::workflows::assessment::{assessment_router, AssessmentService};

pub(super) fn catalog() -> SymptomCatalog {
    SymptomCatalog::standard()
}

/// Custom catalog whose headache node carries only two questions.
pub(super) fn two_question_headache_catalog() -> SymptomCatalog {
    SymptomCatalog::from_nodes(vec![
        SymptomNode {
            id: ComplaintId::Headache,
            display_name: "Headache".to_string(),
            category: ComplaintCategory::Pain,
            questions: vec![
                Question::yes_no("Does your head hurt?"),
                Question::yes_no("Do you feel dizzy?"),
            ],
        },
        SymptomNode {
            id: ComplaintId::Fever,
            display_name: "Fever".to_string(),
            category: ComplaintCategory::General,
            questions: vec![Question::yes_no("Do you have high temperature?")],
        },
    ])
    .expect("valid custom catalog")
}

pub(super) fn answers(values: &[&str]) -> Vec<AnswerValue> {
    values.iter().map(|value| AnswerValue::from(*value)).collect()
}

/// Drives a fresh session through every answer, asserting each one is accepted.
pub(super) fn completed_session(
    catalog: &SymptomCatalog,
    complaint_id: ComplaintId,
    values: &[&str],
) -> AssessmentSession {
    let mut session = AssessmentSession::start(catalog, complaint_id).expect("session starts");
    for answer in answers(values) {
        session
            .record_answer(catalog, answer)
            .expect("answer accepted");
    }
    assert_eq!(session.state(), SessionState::Completed);
    session
}

pub(super) fn build_service() -> (
    AssessmentService<MemoryRepository, MemoryReferrals>,
    Arc<MemoryRepository>,
    Arc<MemoryReferrals>,
) {
    let repository = Arc::new(MemoryRepository::default());
    let referrals = Arc::new(MemoryReferrals::default());
    let service = AssessmentService::new(
        repository.clone(),
        referrals.clone(),
        TriageThresholds::default(),
    );
    (service, repository, referrals)
}

pub(super) fn assessment_router_with_service(
    service: AssessmentService<MemoryRepository, MemoryReferrals>,
) -> axum::Router {
    assessment_router(Arc::new(service))
}

pub(super) async fn read_json_body(response: Response) -> Value {
    let body = axum::body::to_bytes(response.into_body(), 64 * 1024)
        .await
        .expect("read body");
    serde_json::from_slice(&body).expect("json payload")
}

#[derive(Default, Clone)]
pub(super) struct MemoryRepository {
    pub(super) records: Arc<Mutex<HashMap<SessionId, AssessmentRecord>>>,
}

impl AssessmentRepository for MemoryRepository {
    fn insert(&self, record: AssessmentRecord) -> Result<AssessmentRecord, RepositoryError> {
        let mut guard = self.records.lock().expect("repository mutex poisoned");
        if guard.contains_key(&record.session_id) {
            return Err(RepositoryError::Conflict);
        }
        guard.insert(record.session_id.clone(), record.clone());
        Ok(record)
    }

    fn update(&self, record: AssessmentRecord) -> Result<(), RepositoryError> {
        let mut guard = self.records.lock().expect("repository mutex poisoned");
        let stored = guard
            .get(&record.session_id)
            .ok_or(RepositoryError::NotFound)?;
        if stored.revision + 1 != record.revision {
            return Err(RepositoryError::Conflict);
        }
        guard.insert(record.session_id.clone(), record);
        Ok(())
    }

    fn fetch(&self, id: &SessionId) -> Result<Option<AssessmentRecord>, RepositoryError> {
        let guard = self.records.lock().expect("repository mutex poisoned");
        Ok(guard.get(id).cloned())
    }

    fn completed(&self, limit: usize) -> Result<Vec<AssessmentRecord>, RepositoryError> {
        let guard = self.records.lock().expect("repository mutex poisoned");
        let mut records: Vec<AssessmentRecord> = guard
            .values()
            .filter(|record| record.session.state() == SessionState::Completed)
            .cloned()
            .collect();
        records.sort_by(|a, b| b.completed_at.cmp(&a.completed_at));
        records.truncate(limit);
        Ok(records)
    }
}

#[derive(Default, Clone)]
pub(super) struct MemoryReferrals {
    events: Arc<Mutex<Vec<DoctorReferral>>>,
}

impl MemoryReferrals {
    pub(super) fn events(&self) -> Vec<DoctorReferral> {
        self.events.lock().expect("referral mutex poisoned").clone()
    }
}

impl ReferralPublisher for MemoryReferrals {
    fn publish(&self, referral: DoctorReferral) -> Result<(), ReferralError> {
        self.events
            .lock()
            .expect("referral mutex poisoned")
            .push(referral);
        Ok(())
    }
}

pub(super) struct OfflineReferrals;

impl ReferralPublisher for OfflineReferrals {
    fn publish(&self, _referral: DoctorReferral) -> Result<(), ReferralError> {
        Err(ReferralError::Transport("no connectivity".to_string()))
    }
}

pub(super) struct UnavailableRepository;

impl AssessmentRepository for UnavailableRepository {
    fn insert(&self, _record: AssessmentRecord) -> Result<AssessmentRecord, RepositoryError> {
        Err(RepositoryError::Unavailable("cache offline".to_string()))
    }

    fn update(&self, _record: AssessmentRecord) -> Result<(), RepositoryError> {
        Err(RepositoryError::Unavailable("cache offline".to_string()))
    }

    fn fetch(&self, _id: &SessionId) -> Result<Option<AssessmentRecord>, RepositoryError> {
        Err(RepositoryError::Unavailable("cache offline".to_string()))
    }

    fn completed(&self, _limit: usize) -> Result<Vec<AssessmentRecord>, RepositoryError> {
        Err(RepositoryError::Unavailable("cache offline".to_string()))
    }
}

#[derive(Default)]
pub(super) struct RecordingSpeaker {
    spoken: Mutex<Vec<Utterance>>,
}

impl RecordingSpeaker {
    pub(super) fn spoken(&self) -> Vec<Utterance> {
        self.spoken.lock().expect("speaker mutex poisoned").clone()
    }
}

impl Speaker for RecordingSpeaker {
    fn speak(&self, utterance: &Utterance) {
        self.spoken
            .lock()
            .expect("speaker mutex poisoned")
            .push(utterance.clone());
    }
}
