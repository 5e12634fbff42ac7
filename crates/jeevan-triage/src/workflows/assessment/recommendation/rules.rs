use super::super::catalog::SymptomCatalog;
use super::super::domain::{AssessmentError, SessionState};
use super::super::session::AssessmentSession;
use super::ScoreComponent;

/// Rejects anything but a well-formed completed session, then weighs every answer.
pub(crate) fn weigh_answers(
    catalog: &SymptomCatalog,
    session: &AssessmentSession,
) -> Result<(Vec<ScoreComponent>, f64), AssessmentError> {
    if session.state() != SessionState::Completed {
        return Err(AssessmentError::invalid_state(
            SessionState::Completed,
            session.state(),
        ));
    }

    let questions = catalog.questions(session.complaint_id())?;
    let answers = session.answers();

    if answers.is_empty() {
        return Err(AssessmentError::invalid_state(
            SessionState::Completed,
            "completed without answers",
        ));
    }
    if answers.len() != questions.len() {
        return Err(AssessmentError::invalid_state(
            SessionState::Completed,
            format!(
                "completed with {} answers for {} questions",
                answers.len(),
                questions.len()
            ),
        ));
    }

    let mut components = Vec::with_capacity(answers.len());
    let mut total = 0.0;

    for (expected_index, (recorded, question)) in answers.iter().zip(questions).enumerate() {
        if recorded.question_index != expected_index {
            return Err(AssessmentError::invalid_state(
                SessionState::Completed,
                format!(
                    "answer for question {} recorded at position {}",
                    recorded.question_index, expected_index
                ),
            ));
        }

        let option =
            question
                .option(&recorded.value)
                .ok_or_else(|| AssessmentError::InvalidAnswer {
                    answer: recorded.value.clone(),
                    question_index: expected_index,
                })?;

        let weight = option.signal.weight();
        total += weight;
        components.push(ScoreComponent {
            question_index: expected_index,
            answer: recorded.value.clone(),
            signal: option.signal,
            weight,
        });
    }

    let score = total / answers.len() as f64;
    Ok((components, score))
}
