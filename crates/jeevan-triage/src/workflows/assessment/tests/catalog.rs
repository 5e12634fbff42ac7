use super::common::*;
use crate::workflows::assessment::catalog::{CatalogError, SymptomCatalog};
use crate::workflows::assessment::domain::{
    AnswerOption, AnswerSignal, AssessmentError, ComplaintCategory, ComplaintId, Question,
    SymptomNode,
};
use crate::workflows::assessment::session::AssessmentSession;

#[test]
fn every_complaint_has_questions_and_starts_at_zero() {
    let catalog = catalog();

    for summary in catalog.list_complaints() {
        let questions = catalog.questions(summary.id).expect("listed complaint resolves");
        assert!(!questions.is_empty(), "{} has no questions", summary.id);
        assert_eq!(questions.len(), summary.question_count);
        assert!(questions
            .iter()
            .all(|question| !question.allowed_answers.is_empty()));

        let session = AssessmentSession::start(&catalog, summary.id).expect("session starts");
        assert_eq!(session.position(), 0);
        assert!(session.answers().is_empty());
    }
}

#[test]
fn standard_catalog_lists_complaints_in_release_order() {
    let ids: Vec<ComplaintId> = catalog()
        .list_complaints()
        .into_iter()
        .map(|summary| summary.id)
        .collect();

    assert_eq!(ids, ComplaintId::ordered().to_vec());
}

#[test]
fn fever_keeps_three_yes_no_questions() {
    let catalog = catalog();
    let questions = catalog.questions(ComplaintId::Fever).expect("fever exists");

    assert_eq!(questions.len(), 3);
    assert_eq!(questions[0].text, "Do you have high temperature?");
    let values: Vec<&str> = questions[2]
        .allowed_answers
        .iter()
        .map(|option| option.value.as_str())
        .collect();
    assert_eq!(values, vec!["yes", "no", "unsure"]);
}

#[test]
fn chat_options_are_allowed_answers() {
    let catalog = catalog();
    let questions = catalog.questions(ComplaintId::Cough).expect("cough exists");
    let detail = questions.last().expect("cough has questions");

    let with_blood = detail
        .option(&"with_blood".into())
        .expect("chat option present");
    assert_eq!(with_blood.label, "With blood");
    assert_eq!(with_blood.signal, AnswerSignal::Concerning);
    assert!(!detail.allows(&"yes".into()));
}

#[test]
fn resolve_accepts_original_key_spellings() {
    let catalog = catalog();

    assert_eq!(catalog.resolve("bodyPain"), Ok(ComplaintId::BodyPain));
    assert_eq!(catalog.resolve("stomach-pain"), Ok(ComplaintId::StomachPain));
    assert_eq!(catalog.resolve(" skin_infection "), Ok(ComplaintId::SkinInfection));
}

#[test]
fn resolve_rejects_unknown_keys() {
    let catalog = catalog();

    match catalog.resolve("toothache") {
        Err(AssessmentError::NotFound { complaint }) => assert_eq!(complaint, "toothache"),
        other => panic!("expected not found, got {other:?}"),
    }
}

#[test]
fn custom_catalog_only_serves_its_own_complaints() {
    let catalog = two_question_headache_catalog();

    assert!(catalog.contains(ComplaintId::Headache));
    assert!(matches!(
        catalog.questions(ComplaintId::Dengue),
        Err(AssessmentError::NotFound { .. })
    ));
    assert!(matches!(
        catalog.resolve("dengue"),
        Err(AssessmentError::NotFound { .. })
    ));
    assert!(matches!(
        AssessmentSession::start(&catalog, ComplaintId::Dengue),
        Err(AssessmentError::NotFound { .. })
    ));
}

#[test]
fn from_nodes_validates_structure() {
    assert_eq!(
        SymptomCatalog::from_nodes(Vec::new()).unwrap_err(),
        CatalogError::Empty
    );

    let empty_questions = SymptomNode {
        id: ComplaintId::Fever,
        display_name: "Fever".to_string(),
        category: ComplaintCategory::General,
        questions: Vec::new(),
    };
    assert_eq!(
        SymptomCatalog::from_nodes(vec![empty_questions]).unwrap_err(),
        CatalogError::NoQuestions(ComplaintId::Fever)
    );

    let no_answers = SymptomNode {
        id: ComplaintId::Cough,
        display_name: "Cough".to_string(),
        category: ComplaintCategory::Respiratory,
        questions: vec![Question::with_options("Are you coughing?", Vec::new())],
    };
    assert!(matches!(
        SymptomCatalog::from_nodes(vec![no_answers]),
        Err(CatalogError::NoAnswers {
            complaint: ComplaintId::Cough,
            question_index: 0
        })
    ));

    let repeated = SymptomNode {
        id: ComplaintId::Dengue,
        display_name: "Dengue".to_string(),
        category: ComplaintCategory::VectorBorne,
        questions: vec![Question::with_options(
            "Do you have high fever?",
            vec![
                AnswerOption::new("yes", "Yes", AnswerSignal::Concerning),
                AnswerOption::new("yes", "Definitely", AnswerSignal::Concerning),
            ],
        )],
    };
    assert!(matches!(
        SymptomCatalog::from_nodes(vec![repeated]),
        Err(CatalogError::DuplicateAnswer { .. })
    ));

    let fever = || SymptomNode {
        id: ComplaintId::Fever,
        display_name: "Fever".to_string(),
        category: ComplaintCategory::General,
        questions: vec![Question::yes_no("Are you feeling hot?")],
    };
    assert_eq!(
        SymptomCatalog::from_nodes(vec![fever(), fever()]).unwrap_err(),
        CatalogError::DuplicateComplaint(ComplaintId::Fever)
    );
}
