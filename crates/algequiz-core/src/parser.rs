//! JSON question-bank parser.
//!
//! Loads the question bank from a JSON file and validates it. A missing or
//! malformed file is a hard error: the bank is operator-controlled
//! configuration, not user input, so startup fails loudly.

use std::path::Path;

use anyhow::{Context, Result};
use serde::Deserialize;

use crate::model::{Question, QuestionBank};
use crate::normalize::normalize;

/// Intermediate JSON structure for the question file.
///
/// The file is a document with a single top-level `questions` key holding an
/// ordered sequence of prompt/answer objects.
#[derive(Debug, Deserialize)]
struct JsonQuestionFile {
    questions: Vec<JsonQuestion>,
}

#[derive(Debug, Deserialize)]
struct JsonQuestion {
    prompt: String,
    answer: String,
}

/// Parse a question file into a `QuestionBank`.
pub fn load_question_bank(path: &Path) -> Result<QuestionBank> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read question file: {}", path.display()))?;

    parse_question_bank_str(&content, path)
}

/// Parse a JSON string into a `QuestionBank` (useful for testing).
pub fn parse_question_bank_str(content: &str, source_path: &Path) -> Result<QuestionBank> {
    let parsed: JsonQuestionFile = serde_json::from_str(content)
        .with_context(|| format!("failed to parse question file: {}", source_path.display()))?;

    let questions = parsed
        .questions
        .into_iter()
        .map(|q| Question {
            prompt: q.prompt,
            answer: q.answer,
        })
        .collect();

    Ok(QuestionBank { questions })
}

/// A warning from question-bank validation.
#[derive(Debug, Clone)]
pub struct ValidationWarning {
    /// Zero-based index of the offending question, if applicable.
    pub question_index: Option<usize>,
    /// Warning message.
    pub message: String,
}

/// Validate a question bank for common issues.
///
/// Warnings are advisory; a bank with warnings still loads and grades.
pub fn validate_question_bank(bank: &QuestionBank) -> Vec<ValidationWarning> {
    let mut warnings = Vec::new();

    if bank.is_empty() {
        warnings.push(ValidationWarning {
            question_index: None,
            message: "question bank is empty".into(),
        });
    }

    for (i, q) in bank.questions.iter().enumerate() {
        if q.prompt.trim().is_empty() {
            warnings.push(ValidationWarning {
                question_index: Some(i),
                message: "prompt is empty".into(),
            });
        }
        if q.answer.trim().is_empty() {
            warnings.push(ValidationWarning {
                question_index: Some(i),
                message: "expected answer is empty".into(),
            });
        }
        // Grading splits the expected answer into parenthesized factors;
        // a single-factor answer grades fine but is usually a typo in a
        // difference-of-squares bank.
        if !q.answer.trim().is_empty() && normalize(&q.answer).factors().len() < 2 {
            warnings.push(ValidationWarning {
                question_index: Some(i),
                message: format!(
                    "expected answer '{}' is not a product of parenthesized factors",
                    q.answer
                ),
            });
        }
    }

    // Duplicate prompts make the sampled subset ambiguous for the student.
    let mut seen = std::collections::HashSet::new();
    for (i, q) in bank.questions.iter().enumerate() {
        if !seen.insert(q.prompt.trim()) {
            warnings.push(ValidationWarning {
                question_index: Some(i),
                message: format!("duplicate prompt: {}", q.prompt),
            });
        }
    }

    warnings
}
