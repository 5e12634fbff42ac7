use jeevan_triage::config::TriageConfig;
use jeevan_triage::voice::{Speaker, Utterance};
use jeevan_triage::workflows::assessment::{
    AssessmentRecord, AssessmentRepository, AssessmentService, DoctorReferral, ReferralError,
    ReferralPublisher, RepositoryError, SessionId, SessionState,
};
use metrics_exporter_prometheus::PrometheusHandle;
use std::collections::HashMap;
use std::sync::atomic::AtomicBool;
use std::sync::{Arc, Mutex};
use tracing::info;

pub(crate) type TriageService =
    AssessmentService<InMemoryAssessmentRepository, InMemoryReferralPublisher>;

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) readiness: Arc<AtomicBool>,
    pub(crate) metrics: Arc<PrometheusHandle>,
}

/// Process-local session store. Sessions do not survive a restart, and in-progress or
/// abandoned records are never evicted, so memory grows with every session started.
#[derive(Default, Clone)]
pub(crate) struct InMemoryAssessmentRepository {
    records: Arc<Mutex<HashMap<SessionId, AssessmentRecord>>>,
}

impl AssessmentRepository for InMemoryAssessmentRepository {
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
        match guard.get(&record.session_id) {
            Some(stored) if stored.revision + 1 == record.revision => {
                guard.insert(record.session_id.clone(), record);
                Ok(())
            }
            Some(_) => Err(RepositoryError::Conflict),
            None => Err(RepositoryError::NotFound),
        }
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
        records.sort_by(|a, b| {
            b.completed_at
                .cmp(&a.completed_at)
                .then_with(|| b.session_id.cmp(&a.session_id))
        });
        records.truncate(limit);
        Ok(records)
    }
}

/// Stands in for the doctor-discovery screen: referrals are logged and kept in memory.
#[derive(Default, Clone)]
pub(crate) struct InMemoryReferralPublisher {
    events: Arc<Mutex<Vec<DoctorReferral>>>,
}

impl ReferralPublisher for InMemoryReferralPublisher {
    fn publish(&self, referral: DoctorReferral) -> Result<(), ReferralError> {
        info!(
            session_id = %referral.session_id,
            complaint = %referral.complaint_id,
            tier = referral.severity_tier.label(),
            action = referral.suggested_action.label(),
            "doctor referral opened"
        );
        let mut guard = self.events.lock().expect("referral mutex poisoned");
        guard.push(referral);
        Ok(())
    }
}

impl InMemoryReferralPublisher {
    pub(crate) fn events(&self) -> Vec<DoctorReferral> {
        self.events.lock().expect("referral mutex poisoned").clone()
    }
}

/// Speech output for headless deployments.
#[derive(Debug, Default, Clone, Copy)]
pub(crate) struct TracingSpeaker;

impl Speaker for TracingSpeaker {
    fn speak(&self, utterance: &Utterance) {
        info!(locale = utterance.locale, text = %utterance.text, "speaking");
    }
}

pub(crate) fn build_service(
    triage: &TriageConfig,
    speaker: Arc<dyn Speaker>,
) -> (Arc<TriageService>, Arc<InMemoryReferralPublisher>) {
    let referrals = Arc::new(InMemoryReferralPublisher::default());
    let service = AssessmentService::new(
        Arc::new(InMemoryAssessmentRepository::default()),
        referrals.clone(),
        triage.thresholds,
    )
    .with_speaker(speaker, triage.voice_language);

    (Arc::new(service), referrals)
}
