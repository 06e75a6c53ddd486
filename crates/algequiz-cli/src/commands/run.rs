//! The `algequiz run` command.

use std::io::{BufRead, Write};
use std::path::PathBuf;
use std::time::Duration;

use anyhow::{Context, Result};

use algequiz_core::parser;
use algequiz_core::prompt::build_feedback_prompt;
use algequiz_core::session::{QuestionState, QuizSession};
use algequiz_core::traits::FeedbackRequest;
use algequiz_tutor::config::{create_provider, load_config_from, ProviderConfig};

pub async fn execute(
    questions: Option<PathBuf>,
    take: Option<usize>,
    model: Option<String>,
    provider: Option<String>,
    config_path: Option<PathBuf>,
    no_feedback: bool,
) -> Result<()> {
    let config = load_config_from(config_path.as_deref())?;

    let bank_path = questions.unwrap_or_else(|| config.question_file.clone());
    let bank = parser::load_question_bank(&bank_path)?;
    for w in parser::validate_question_bank(&bank) {
        tracing::warn!(question = ?w.question_index, "{}", w.message);
    }

    let n = take.unwrap_or(config.question_count);
    anyhow::ensure!(n >= 1, "question count must be at least 1");

    let selected = bank.sample(n);
    anyhow::ensure!(
        !selected.is_empty(),
        "question bank is empty: {}",
        bank_path.display()
    );

    let mut session = QuizSession::new(selected);
    tracing::info!(
        session = %session.id(),
        started = %session.started_at(),
        questions = session.questions().len(),
        "starting quiz session"
    );

    println!("Algebra quiz — difference of squares");
    println!("Answer each question and press Enter.\n");

    let stdin = std::io::stdin();
    let mut lines = stdin.lock().lines();

    for i in 0..session.questions().len() {
        println!("{}. {}", i + 1, session.questions()[i].prompt);
        print!("> ");
        std::io::stdout().flush()?;

        let answer = lines
            .next()
            .transpose()
            .context("failed to read answer")?
            .ok_or_else(|| anyhow::anyhow!("input ended before all questions were answered"))?;

        let correct = session.grade_answer(i, answer.trim_end())?;
        println!("{}\n", if correct { "Correct" } else { "Incorrect" });
    }

    let percent = session.percent_score().context("session incomplete")?;
    println!("Final score: {percent:.0}%");
    print_summary(&session);

    if no_feedback {
        return Ok(());
    }

    print!("\nShow tutor recommendations? [y/N] ");
    std::io::stdout().flush()?;
    let wants_feedback = matches!(
        lines.next().transpose().context("failed to read input")?,
        Some(line) if line.trim().eq_ignore_ascii_case("y") || line.trim().eq_ignore_ascii_case("yes")
    );
    if !wants_feedback || !session.begin_feedback() {
        return Ok(());
    }

    let provider_name = provider.unwrap_or_else(|| config.default_provider.clone());
    let provider_config = match config.providers.get(&provider_name) {
        Some(p) => p.clone(),
        // Without a config file the default provider resolves to the local
        // LM Studio endpoint.
        None if provider_name == config.default_provider => ProviderConfig::OpenAI {
            base_url: None,
            api_key: None,
        },
        None => anyhow::bail!(
            "provider '{}' not found in config. Available: {:?}",
            provider_name,
            config.providers.keys().collect::<Vec<_>>()
        ),
    };

    let tutor = create_provider(&provider_config, Duration::from_secs(config.timeout_secs))?;
    let request = FeedbackRequest {
        model: model.unwrap_or_else(|| config.default_model.clone()),
        prompt: build_feedback_prompt(&session).context("session incomplete")?,
        system_prompt: None,
        temperature: config.temperature,
        max_tokens: config.max_tokens,
    };

    println!("\nRequesting tutor feedback from {}...", tutor.name());

    // Single attempt; an endpoint failure becomes the displayed feedback
    // text and the session stays usable.
    let feedback = match tutor.request_feedback(&request).await {
        Ok(response) => {
            tracing::info!(latency_ms = response.latency_ms, "feedback received");
            response.cleaned
        }
        Err(e) => format!("Tutor feedback unavailable: {e:#}"),
    };

    println!("\n{feedback}");

    Ok(())
}

fn print_summary(session: &QuizSession) {
    use comfy_table::{Cell, Table};

    let mut table = Table::new();
    table.set_header(vec!["#", "Question", "Your answer", "Result"]);

    for (i, (question, state)) in session
        .questions()
        .iter()
        .zip(session.states())
        .enumerate()
    {
        let (submitted, result) = match state {
            QuestionState::Graded { submitted, correct } => {
                (submitted.as_str(), if *correct { "Correct" } else { "Incorrect" })
            }
            QuestionState::Unanswered => ("", "-"),
        };
        table.add_row(vec![
            Cell::new(i + 1),
            Cell::new(&question.prompt),
            Cell::new(submitted),
            Cell::new(result),
        ]);
    }

    println!("\n{table}");
}
