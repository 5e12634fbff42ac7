use serde::{Deserialize, Serialize};

use super::config::TriageThresholds;

/// Assessed urgency of the complaint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SeverityTier {
    Low,
    Medium,
    High,
}

impl SeverityTier {
    pub const fn label(self) -> &'static str {
        match self {
            Self::Low => "Low Priority",
            Self::Medium => "Medium Priority",
            Self::High => "High Priority",
        }
    }

    pub const fn suggested_action(self) -> SuggestedAction {
        match self {
            Self::High => SuggestedAction::ConsultNow,
            Self::Medium => SuggestedAction::ScheduleConsultation,
            Self::Low => SuggestedAction::SelfCare,
        }
    }

    pub const fn message(self) -> &'static str {
        match self {
            Self::High => "Based on your symptoms, we recommend consulting a doctor immediately.",
            Self::Medium => "Your symptoms suggest you should see a doctor for proper diagnosis.",
            Self::Low => {
                "Your symptoms appear mild. Monitor and consider consulting if they persist."
            }
        }
    }

    /// Medium and high outcomes hand the patient over to doctor discovery.
    pub const fn warrants_referral(self) -> bool {
        matches!(self, Self::Medium | Self::High)
    }
}

/// Next step offered to the patient alongside the tier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SuggestedAction {
    SelfCare,
    ScheduleConsultation,
    ConsultNow,
}

impl SuggestedAction {
    pub const fn label(self) -> &'static str {
        match self {
            Self::SelfCare => "Get First Aid Tips",
            Self::ScheduleConsultation => "Schedule Consultation",
            Self::ConsultNow => "Consult Doctor Now",
        }
    }
}

/// Thresholds are inclusive on their lower bound.
pub(crate) fn decide_tier(score: f64, thresholds: &TriageThresholds) -> SeverityTier {
    if score >= thresholds.high {
        SeverityTier::High
    } else if score >= thresholds.medium {
        SeverityTier::Medium
    } else {
        SeverityTier::Low
    }
}
