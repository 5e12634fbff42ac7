use crate::infra::{build_service, TracingSpeaker, TriageService};
use clap::Args;
use jeevan_triage::config::{AppConfig, TriageConfig};
use jeevan_triage::error::AppError;
use jeevan_triage::voice::{Language, Speaker, Utterance};
use jeevan_triage::workflows::assessment::{
    AnswerValue, AssessmentError, AssessmentRecord, AssessmentServiceError, ComplaintId,
    SessionId, SessionState, SymptomCatalog,
};
use std::io::{self, BufRead, Write};
use std::sync::Arc;

#[derive(Args, Debug)]
pub(crate) struct AssessArgs {
    /// Complaint key, e.g. fever, bodyPain or stomach_pain
    #[arg(long)]
    pub(crate) complaint: String,
    /// Comma-separated answers; remaining questions are read from stdin
    #[arg(long, value_delimiter = ',')]
    pub(crate) answers: Vec<String>,
    /// Voice prompt language (punjabi, hindi, english)
    #[arg(long)]
    pub(crate) language: Option<Language>,
}

#[derive(Args, Debug, Default)]
pub(crate) struct DemoArgs {
    /// Voice prompt language (punjabi, hindi, english)
    #[arg(long)]
    pub(crate) language: Option<Language>,
    /// Echo every voice prompt to the terminal
    #[arg(long)]
    pub(crate) voice: bool,
}

/// Prints voice prompts instead of synthesizing them.
struct ConsoleSpeaker;

impl Speaker for ConsoleSpeaker {
    fn speak(&self, utterance: &Utterance) {
        println!("    [voice {}] {}", utterance.locale, utterance.text);
    }
}

pub(crate) fn list_complaints() {
    println!("Available complaints");
    for summary in SymptomCatalog::standard().list_complaints() {
        println!(
            "  {:<16} {:<18} {:<15} {} questions",
            summary.id.as_str(),
            summary.display_name,
            summary.category.label(),
            summary.question_count
        );
    }
}

pub(crate) fn run_assessment(args: AssessArgs) -> Result<(), AppError> {
    let AssessArgs {
        complaint,
        answers,
        language,
    } = args;

    let mut triage = AppConfig::load()?.triage;
    if let Some(language) = language {
        triage.voice_language = language;
    }

    let (service, _referrals) = build_service(&triage, Arc::new(TracingSpeaker));
    let complaint_id = service.catalog().resolve(&complaint)?;

    let stdin = io::stdin();
    let stdout = io::stdout();
    let mut input = stdin.lock();
    let mut out = stdout.lock();

    let record = start_and_drive(&service, complaint_id, answers, &mut input, &mut out)?;
    render_result(&mut out, &record)?;
    Ok(())
}

pub(crate) fn run_demo(args: DemoArgs) -> Result<(), AppError> {
    let mut triage = TriageConfig::default();
    if let Some(language) = args.language {
        triage.voice_language = language;
    }
    let speaker: Arc<dyn Speaker> = if args.voice {
        Arc::new(ConsoleSpeaker)
    } else {
        Arc::new(TracingSpeaker)
    };
    let (service, referrals) = build_service(&triage, speaker);

    let scripted: [(ComplaintId, &[&str]); 3] = [
        (ComplaintId::Fever, &["yes", "yes", "no"]),
        (ComplaintId::Dengue, &["yes", "yes", "unsure"]),
        (ComplaintId::Cough, &["no", "no", "unsure", "dry_cough"]),
    ];

    let stdout = io::stdout();
    let mut out = stdout.lock();
    let mut no_input = io::empty();

    writeln!(
        out,
        "Symptom assessment demo (voice: {}, {})",
        triage.voice_language.native_name(),
        triage.voice_language.locale()
    )?;

    for (complaint_id, answers) in scripted {
        writeln!(out, "\n== {complaint_id} ==")?;
        let answers = answers.iter().map(|answer| answer.to_string()).collect();
        let record = start_and_drive(&service, complaint_id, answers, &mut no_input, &mut out)?;
        render_result(&mut out, &record)?;
    }

    writeln!(out, "\n== headache (abandoned) ==")?;
    let record = service.start(ComplaintId::Headache)?;
    service.record_answer(&record.session_id, AnswerValue::new("yes"))?;
    let abandoned = service.abandon(&record.session_id)?;
    render_result(&mut out, &abandoned)?;
    if let Err(err) = service.record_answer(&record.session_id, AnswerValue::new("no")) {
        writeln!(out, "  further answers are refused: {err}")?;
    }

    let history = service.history(10)?;
    writeln!(
        out,
        "\n{} completed assessments, {} doctor referrals opened",
        history.len(),
        referrals.events().len()
    )?;
    Ok(())
}

fn start_and_drive<I: BufRead, O: Write>(
    service: &TriageService,
    complaint_id: ComplaintId,
    answers: Vec<String>,
    input: &mut I,
    out: &mut O,
) -> Result<AssessmentRecord, AppError> {
    let record = service.start(complaint_id)?;
    drive_session(service, &record.session_id, answers, input, out)
}

/// Feeds scripted answers first, then prompts on `input`. End of input abandons the session.
fn drive_session<I: BufRead, O: Write>(
    service: &TriageService,
    session_id: &SessionId,
    scripted: Vec<String>,
    input: &mut I,
    out: &mut O,
) -> Result<AssessmentRecord, AppError> {
    let mut scripted = scripted.into_iter();

    loop {
        let record = service.get(session_id)?;
        let view = service.status_view(&record);
        let Some(question) = view.current_question else {
            return Ok(record);
        };

        writeln!(
            out,
            "Question {} of {}: {}",
            question.index + 1,
            view.total_questions,
            question.text
        )?;
        let choices: Vec<String> = question
            .options
            .iter()
            .map(|option| format!("{} ({})", option.value, option.label))
            .collect();
        writeln!(out, "  options: {}", choices.join(", "))?;

        let (answer, interactive) = match scripted.next() {
            Some(answer) => {
                writeln!(out, "> {answer}")?;
                (answer.trim().to_string(), false)
            }
            None => {
                write!(out, "> ")?;
                out.flush()?;
                let mut line = String::new();
                if input.read_line(&mut line)? == 0 {
                    writeln!(out)?;
                    return Ok(service.abandon(session_id)?);
                }
                (line.trim().to_ascii_lowercase(), true)
            }
        };

        match service.record_answer(session_id, AnswerValue::new(answer)) {
            Ok(_) => {}
            Err(AssessmentServiceError::Assessment(AssessmentError::InvalidAnswer {
                answer, ..
            })) if interactive => {
                writeln!(out, "  '{answer}' is not one of the options, please try again")?;
            }
            Err(err) => return Err(err.into()),
        }
    }
}

fn render_result<O: Write>(out: &mut O, record: &AssessmentRecord) -> Result<(), AppError> {
    match (record.session.state(), &record.outcome) {
        (SessionState::Completed, Some(outcome)) => {
            writeln!(
                out,
                "  {} (score {:.2})",
                outcome.severity_tier.label(),
                outcome.score
            )?;
            writeln!(out, "  {}", outcome.message)?;
            writeln!(out, "  next step: {}", outcome.suggested_action.label())?;
            if outcome.severity_tier.warrants_referral() {
                writeln!(
                    out,
                    "  doctor discovery opened for {}",
                    outcome.complaint_id
                )?;
            }
        }
        (state, _) => {
            writeln!(
                out,
                "  assessment {} after {} answers",
                state,
                record.session.answers().len()
            )?;
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use jeevan_triage::workflows::assessment::SeverityTier;
    use std::io::Cursor;

    fn service() -> Arc<TriageService> {
        build_service(&TriageConfig::default(), Arc::new(TracingSpeaker)).0
    }

    fn scripted(values: &[&str]) -> Vec<String> {
        values.iter().map(|value| value.to_string()).collect()
    }

    #[test]
    fn scripted_answers_complete_the_session() {
        let service = service();
        let mut out = Vec::new();

        let record = start_and_drive(
            &service,
            ComplaintId::Fever,
            scripted(&["yes", "yes", "no"]),
            &mut io::empty(),
            &mut out,
        )
        .expect("session completes");

        let outcome = record.outcome.expect("outcome stored");
        assert_eq!(outcome.severity_tier, SeverityTier::Medium);
        let transcript = String::from_utf8(out).expect("utf8");
        assert!(transcript.contains("Question 3 of 3: Do you have chills?"));
    }

    #[test]
    fn interactive_input_retries_invalid_answers() {
        let service = service();
        let mut input = Cursor::new("maybe\nNO\nno\nno\n");
        let mut out = Vec::new();

        let record = start_and_drive(
            &service,
            ComplaintId::Diarrhea,
            Vec::new(),
            &mut input,
            &mut out,
        )
        .expect("session completes");

        assert_eq!(record.session.state(), SessionState::Completed);
        assert_eq!(record.session.answers().len(), 3);
        let transcript = String::from_utf8(out).expect("utf8");
        assert!(transcript.contains("'maybe' is not one of the options"));
    }

    #[test]
    fn invalid_scripted_answer_is_an_error() {
        let service = service();
        let mut out = Vec::new();

        let result = start_and_drive(
            &service,
            ComplaintId::Fever,
            scripted(&["perhaps"]),
            &mut io::empty(),
            &mut out,
        );

        assert!(matches!(
            result,
            Err(AppError::Assessment(AssessmentServiceError::Assessment(
                AssessmentError::InvalidAnswer { .. }
            )))
        ));
    }

    #[test]
    fn end_of_input_abandons() {
        let service = service();
        let mut out = Vec::new();

        let record = start_and_drive(
            &service,
            ComplaintId::Cough,
            scripted(&["yes"]),
            &mut io::empty(),
            &mut out,
        )
        .expect("session ends");

        assert_eq!(record.session.state(), SessionState::Abandoned);
        assert_eq!(record.session.answers().len(), 1);

        let mut rendered = Vec::new();
        render_result(&mut rendered, &record).expect("renders");
        assert_eq!(
            String::from_utf8(rendered).expect("utf8"),
            "  assessment abandoned after 1 answers\n"
        );
    }
}
