use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Closed set of primary complaints a patient can start an assessment from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ComplaintId {
    Fever,
    Cough,
    BodyPain,
    Headache,
    Diarrhea,
    SkinInfection,
    StomachPain,
    SeasonalFlu,
    Dengue,
}

impl ComplaintId {
    pub const fn ordered() -> [Self; 9] {
        [
            Self::Fever,
            Self::Cough,
            Self::BodyPain,
            Self::Headache,
            Self::Diarrhea,
            Self::SkinInfection,
            Self::StomachPain,
            Self::SeasonalFlu,
            Self::Dengue,
        ]
    }

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Fever => "fever",
            Self::Cough => "cough",
            Self::BodyPain => "body_pain",
            Self::Headache => "headache",
            Self::Diarrhea => "diarrhea",
            Self::SkinInfection => "skin_infection",
            Self::StomachPain => "stomach_pain",
            Self::SeasonalFlu => "seasonal_flu",
            Self::Dengue => "dengue",
        }
    }
}

impl fmt::Display for ComplaintId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ComplaintId {
    type Err = AssessmentError;

    /// Accepts `body_pain`, `bodyPain` and `body-pain` for the same complaint.
    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        let key: String = raw
            .trim()
            .chars()
            .filter(|c| *c != '_' && *c != '-')
            .map(|c| c.to_ascii_lowercase())
            .collect();

        Self::ordered()
            .into_iter()
            .find(|id| id.as_str().replace('_', "") == key)
            .ok_or_else(|| AssessmentError::NotFound {
                complaint: raw.to_string(),
            })
    }
}

/// Grouping used by the presentation layer to colour and sort complaints.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ComplaintCategory {
    General,
    Respiratory,
    Pain,
    Digestive,
    Dermatological,
    VectorBorne,
}

impl ComplaintCategory {
    pub const fn label(self) -> &'static str {
        match self {
            Self::General => "General",
            Self::Respiratory => "Respiratory",
            Self::Pain => "Pain",
            Self::Digestive => "Digestive",
            Self::Dermatological => "Dermatological",
            Self::VectorBorne => "Vector-borne",
        }
    }
}

/// How a given answer bears on the urgency of the complaint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AnswerSignal {
    Concerning,
    Absent,
    Unsure,
}

impl AnswerSignal {
    /// Uncertainty counts as partial positive signal.
    pub const fn weight(self) -> f64 {
        match self {
            Self::Concerning => 1.0,
            Self::Absent => 0.0,
            Self::Unsure => 0.5,
        }
    }
}

/// Discrete answer value selected by the patient.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AnswerValue(pub String);

impl AnswerValue {
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for AnswerValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for AnswerValue {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

/// One permitted answer to a question, tagged with its scoring signal.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnswerOption {
    pub value: AnswerValue,
    pub label: String,
    pub signal: AnswerSignal,
}

impl AnswerOption {
    pub fn new(value: &str, label: &str, signal: AnswerSignal) -> Self {
        Self {
            value: AnswerValue::new(value),
            label: label.to_string(),
            signal,
        }
    }
}

/// Prompt with a closed, non-empty answer set.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Question {
    pub text: String,
    pub allowed_answers: Vec<AnswerOption>,
}

impl Question {
    /// Builds the standard yes / no / not sure question.
    pub fn yes_no(text: &str) -> Self {
        Self {
            text: text.to_string(),
            allowed_answers: vec![
                AnswerOption::new("yes", "Yes", AnswerSignal::Concerning),
                AnswerOption::new("no", "No", AnswerSignal::Absent),
                AnswerOption::new("unsure", "Not sure", AnswerSignal::Unsure),
            ],
        }
    }

    pub fn with_options(text: &str, options: Vec<AnswerOption>) -> Self {
        Self {
            text: text.to_string(),
            allowed_answers: options,
        }
    }

    pub fn option(&self, value: &AnswerValue) -> Option<&AnswerOption> {
        self.allowed_answers
            .iter()
            .find(|option| &option.value == value)
    }

    pub fn allows(&self, value: &AnswerValue) -> bool {
        self.option(value).is_some()
    }
}

/// Catalog entry for a primary complaint and its ordered follow-up questions.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SymptomNode {
    pub id: ComplaintId,
    pub display_name: String,
    pub category: ComplaintCategory,
    pub questions: Vec<Question>,
}

impl SymptomNode {
    pub fn summary(&self) -> ComplaintSummary {
        ComplaintSummary {
            id: self.id,
            display_name: self.display_name.clone(),
            category: self.category,
            question_count: self.questions.len(),
        }
    }
}

/// Presentation summary returned when listing complaints.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ComplaintSummary {
    pub id: ComplaintId,
    pub display_name: String,
    pub category: ComplaintCategory,
    pub question_count: usize,
}

/// Identifier wrapper for assessment sessions held by the service.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SessionId(pub String);

impl fmt::Display for SessionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SessionState {
    InProgress,
    Completed,
    Abandoned,
}

impl SessionState {
    pub const fn label(self) -> &'static str {
        match self {
            Self::InProgress => "in_progress",
            Self::Completed => "completed",
            Self::Abandoned => "abandoned",
        }
    }

    pub const fn is_terminal(self) -> bool {
        !matches!(self, Self::InProgress)
    }
}

impl fmt::Display for SessionState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Answer captured against the question index it was given for.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecordedAnswer {
    pub question_index: usize,
    pub value: AnswerValue,
}

/// Usage errors raised by the catalog, session and recommendation engine.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum AssessmentError {
    #[error("unknown complaint '{complaint}'")]
    NotFound { complaint: String },
    #[error("operation requires a session that is {expected}, but it is {actual}")]
    InvalidState {
        expected: &'static str,
        actual: String,
    },
    #[error("answer '{answer}' is not allowed for question {question_index}")]
    InvalidAnswer {
        answer: AnswerValue,
        question_index: usize,
    },
    #[error("note text must not be blank")]
    EmptyNote,
}

impl AssessmentError {
    pub(crate) fn invalid_state(expected: SessionState, actual: impl fmt::Display) -> Self {
        Self::InvalidState {
            expected: expected.label(),
            actual: actual.to_string(),
        }
    }
}
