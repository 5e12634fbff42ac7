use std::collections::{BTreeMap, HashSet};

use super::domain::{
    AnswerOption, AnswerSignal, AssessmentError, ComplaintCategory, ComplaintId,
    ComplaintSummary, Question, SymptomNode,
};

/// Read-only registry of complaints and their question sequences.
///
/// Built once at startup; there is no mutation API after construction.
#[derive(Debug, Clone)]
pub struct SymptomCatalog {
    order: Vec<ComplaintId>,
    nodes: BTreeMap<ComplaintId, SymptomNode>,
}

impl SymptomCatalog {
    /// Catalog shipped with the application release.
    pub fn standard() -> Self {
        let nodes = standard_nodes();
        Self {
            order: nodes.iter().map(|node| node.id).collect(),
            nodes: nodes.into_iter().map(|node| (node.id, node)).collect(),
        }
    }

    /// Builds a catalog from custom nodes, keeping their order for listings.
    pub fn from_nodes(nodes: Vec<SymptomNode>) -> Result<Self, CatalogError> {
        if nodes.is_empty() {
            return Err(CatalogError::Empty);
        }

        let mut order = Vec::with_capacity(nodes.len());
        let mut indexed = BTreeMap::new();

        for node in nodes {
            validate_node(&node)?;
            if indexed.contains_key(&node.id) {
                return Err(CatalogError::DuplicateComplaint(node.id));
            }
            order.push(node.id);
            indexed.insert(node.id, node);
        }

        Ok(Self {
            order,
            nodes: indexed,
        })
    }

    pub fn list_complaints(&self) -> Vec<ComplaintSummary> {
        self.order
            .iter()
            .filter_map(|id| self.nodes.get(id))
            .map(SymptomNode::summary)
            .collect()
    }

    pub fn node(&self, complaint_id: ComplaintId) -> Result<&SymptomNode, AssessmentError> {
        self.nodes
            .get(&complaint_id)
            .ok_or_else(|| AssessmentError::NotFound {
                complaint: complaint_id.to_string(),
            })
    }

    pub fn questions(&self, complaint_id: ComplaintId) -> Result<&[Question], AssessmentError> {
        self.node(complaint_id).map(|node| node.questions.as_slice())
    }

    /// Parses a loosely-typed key and confirms this catalog carries it.
    pub fn resolve(&self, raw: &str) -> Result<ComplaintId, AssessmentError> {
        let id: ComplaintId = raw.parse()?;
        if self.nodes.contains_key(&id) {
            Ok(id)
        } else {
            Err(AssessmentError::NotFound {
                complaint: raw.to_string(),
            })
        }
    }

    pub fn contains(&self, complaint_id: ComplaintId) -> bool {
        self.nodes.contains_key(&complaint_id)
    }
}

impl Default for SymptomCatalog {
    fn default() -> Self {
        Self::standard()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CatalogError {
    #[error("catalog must contain at least one complaint")]
    Empty,
    #[error("complaint {0} is registered twice")]
    DuplicateComplaint(ComplaintId),
    #[error("complaint {0} has no questions")]
    NoQuestions(ComplaintId),
    #[error("question {question_index} of {complaint} has no allowed answers")]
    NoAnswers {
        complaint: ComplaintId,
        question_index: usize,
    },
    #[error("question {question_index} of {complaint} repeats answer '{value}'")]
    DuplicateAnswer {
        complaint: ComplaintId,
        question_index: usize,
        value: String,
    },
}

fn validate_node(node: &SymptomNode) -> Result<(), CatalogError> {
    if node.questions.is_empty() {
        return Err(CatalogError::NoQuestions(node.id));
    }

    for (question_index, question) in node.questions.iter().enumerate() {
        if question.allowed_answers.is_empty() {
            return Err(CatalogError::NoAnswers {
                complaint: node.id,
                question_index,
            });
        }

        let mut seen = HashSet::new();
        for option in &question.allowed_answers {
            if !seen.insert(option.value.as_str()) {
                return Err(CatalogError::DuplicateAnswer {
                    complaint: node.id,
                    question_index,
                    value: option.value.to_string(),
                });
            }
        }
    }

    Ok(())
}

fn node(
    id: ComplaintId,
    display_name: &str,
    category: ComplaintCategory,
    questions: Vec<Question>,
) -> SymptomNode {
    SymptomNode {
        id,
        display_name: display_name.to_string(),
        category,
        questions,
    }
}

fn standard_nodes() -> Vec<SymptomNode> {
    use AnswerSignal::{Absent, Concerning, Unsure};

    vec![
        node(
            ComplaintId::Fever,
            "Fever",
            ComplaintCategory::General,
            vec![
                Question::yes_no("Do you have high temperature?"),
                Question::yes_no("Are you feeling hot?"),
                Question::yes_no("Do you have chills?"),
            ],
        ),
        node(
            ComplaintId::Cough,
            "Cold & Cough",
            ComplaintCategory::Respiratory,
            vec![
                Question::yes_no("Are you coughing?"),
                Question::yes_no("Do you have runny nose?"),
                Question::yes_no("Is your throat sore?"),
                Question::with_options(
                    "Tell me about your cough. What type is it?",
                    vec![
                        AnswerOption::new("dry_cough", "Dry cough", Absent),
                        AnswerOption::new("wet_cough", "Wet cough", Unsure),
                        AnswerOption::new("with_blood", "With blood", Concerning),
                        AnswerOption::new("persistent", "Persistent", Concerning),
                    ],
                ),
            ],
        ),
        node(
            ComplaintId::BodyPain,
            "Body Pain",
            ComplaintCategory::Pain,
            vec![
                Question::yes_no("Do you feel pain in your body?"),
                Question::yes_no("Are your muscles aching?"),
                Question::yes_no("Do you feel weak?"),
                Question::with_options(
                    "Which part of your body is paining?",
                    vec![
                        AnswerOption::new("back_pain", "Back pain", Absent),
                        AnswerOption::new("joint_pain", "Joint pain", Unsure),
                        AnswerOption::new("muscle_pain", "Muscle pain", Absent),
                        AnswerOption::new("all_over_body", "All over body", Concerning),
                    ],
                ),
            ],
        ),
        node(
            ComplaintId::Headache,
            "Headache",
            ComplaintCategory::Pain,
            vec![
                Question::yes_no("Does your head hurt?"),
                Question::yes_no("Do you feel dizzy?"),
                Question::yes_no("Is the pain severe?"),
                Question::with_options(
                    "I understand you have a headache. Can you tell me more about it?",
                    vec![
                        AnswerOption::new("mild_pain", "Mild pain", Absent),
                        AnswerOption::new("severe_pain", "Severe pain", Concerning),
                        AnswerOption::new("with_nausea", "With nausea", Unsure),
                        AnswerOption::new("with_fever", "With fever", Concerning),
                    ],
                ),
            ],
        ),
        node(
            ComplaintId::Diarrhea,
            "Diarrhea",
            ComplaintCategory::Digestive,
            vec![
                Question::yes_no("Do you have loose motions?"),
                Question::yes_no("Are you going to toilet frequently?"),
                Question::yes_no("Do you feel dehydrated?"),
            ],
        ),
        node(
            ComplaintId::SkinInfection,
            "Skin Infection",
            ComplaintCategory::Dermatological,
            vec![
                Question::yes_no("Do you have rashes on skin?"),
                Question::yes_no("Is your skin itching?"),
                Question::yes_no("Do you see any wounds?"),
            ],
        ),
        node(
            ComplaintId::StomachPain,
            "Stomach Pain",
            ComplaintCategory::Digestive,
            vec![
                Question::yes_no("Does your stomach hurt?"),
                Question::yes_no("Do you feel nauseous?"),
                Question::yes_no("Have you vomited?"),
                Question::with_options(
                    "Where exactly is your stomach pain located?",
                    vec![
                        AnswerOption::new("upper_abdomen", "Upper abdomen", Unsure),
                        AnswerOption::new("lower_abdomen", "Lower abdomen", Unsure),
                        AnswerOption::new("all_over", "All over", Concerning),
                        AnswerOption::new("with_nausea", "With nausea", Concerning),
                    ],
                ),
            ],
        ),
        node(
            ComplaintId::SeasonalFlu,
            "Seasonal Flu",
            ComplaintCategory::Respiratory,
            vec![
                Question::yes_no("Do you have flu symptoms?"),
                Question::yes_no("Are you sneezing frequently?"),
                Question::yes_no("Do you feel tired?"),
            ],
        ),
        node(
            ComplaintId::Dengue,
            "Dengue/Malaria",
            ComplaintCategory::VectorBorne,
            vec![
                Question::yes_no("Do you have high fever?"),
                Question::yes_no("Do you see red spots on skin?"),
                Question::yes_no("Are you feeling very weak?"),
            ],
        ),
    ]
}
