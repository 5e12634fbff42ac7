//! Symptom assessment: catalog of complaints, the per-session state machine, and the
//! recommendation engine that turns a completed session into a triage outcome.

pub mod catalog;
pub mod domain;
pub mod recommendation;
pub mod repository;
pub mod router;
pub mod service;
pub mod session;

#[cfg(test)]
mod tests;

pub use catalog::{CatalogError, SymptomCatalog};
pub use domain::{
    AnswerOption, AnswerSignal, AnswerValue, AssessmentError, ComplaintCategory, ComplaintId,
    ComplaintSummary, Question, RecordedAnswer, SessionId, SessionState, SymptomNode,
};
pub use recommendation::{
    RecommendationEngine, RecommendationOutcome, ScoreComponent, SeverityTier, SuggestedAction,
    TriageThresholds,
};
pub use repository::{
    AnswerOptionView, AssessmentRecord, AssessmentRepository, AssessmentStatusView,
    DoctorReferral, QuestionView, ReferralError, ReferralPublisher, RepositoryError,
};
pub use router::{assessment_router, status_for};
pub use service::{AssessmentService, AssessmentServiceError};
pub use session::AssessmentSession;
