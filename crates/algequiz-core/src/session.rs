//! Per-run quiz session state machine.
//!
//! A session holds the sampled questions and per-question grading state.
//! Each question moves `Unanswered -> Graded` exactly once; the session is
//! terminal when every question is graded, at which point the percentage
//! score and the feedback prompt become available.

use chrono::{DateTime, Utc};
use thiserror::Error;
use uuid::Uuid;

use crate::model::Question;
use crate::normalize::grade;

/// Grading state of a single question row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum QuestionState {
    /// No answer submitted yet.
    Unanswered,
    /// Answer submitted and graded. Terminal.
    Graded {
        /// The text the student submitted.
        submitted: String,
        /// Whether the submitted answer matched the expected one.
        correct: bool,
    },
}

/// Shape of a completed session's outcome, selecting the feedback branch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionOutcome {
    /// Every answer was correct.
    AllCorrect,
    /// Every answer was incorrect.
    AllIncorrect,
    /// Some correct, some incorrect.
    Mixed,
}

/// A wrong answer recorded by the session, in question order.
#[derive(Debug, Clone)]
pub struct WrongAnswer<'a> {
    /// Zero-based position of the question in the session.
    pub index: usize,
    /// The question that was answered incorrectly.
    pub question: &'a Question,
    /// The text the student submitted.
    pub submitted: &'a str,
}

/// Errors from driving the session state machine.
#[derive(Debug, Error)]
pub enum SessionError {
    /// The question index does not exist in this session.
    #[error("no question at index {0}")]
    UnknownQuestion(usize),

    /// The question was already graded; each question is graded at most once.
    #[error("question {0} is already graded")]
    AlreadyGraded(usize),
}

/// One run of N questions from selection through final score and feedback.
#[derive(Debug, Clone)]
pub struct QuizSession {
    id: Uuid,
    started_at: DateTime<Utc>,
    questions: Vec<Question>,
    states: Vec<QuestionState>,
    feedback_requested: bool,
}

impl QuizSession {
    /// Create a session over an already-sampled ordered set of questions.
    pub fn new(questions: Vec<Question>) -> Self {
        let states = vec![QuestionState::Unanswered; questions.len()];
        Self {
            id: Uuid::new_v4(),
            started_at: Utc::now(),
            questions,
            states,
            feedback_requested: false,
        }
    }

    /// Unique identifier of this run, used for log correlation.
    pub fn id(&self) -> Uuid {
        self.id
    }

    /// When the session started.
    pub fn started_at(&self) -> DateTime<Utc> {
        self.started_at
    }

    /// The selected questions, in presentation order.
    pub fn questions(&self) -> &[Question] {
        &self.questions
    }

    /// Per-question grading states, parallel to `questions()`.
    pub fn states(&self) -> &[QuestionState] {
        &self.states
    }

    /// Grade the answer for question `index`.
    ///
    /// Returns whether the answer was correct. A question can be graded at
    /// most once; a second submission is rejected.
    pub fn grade_answer(&mut self, index: usize, submitted: &str) -> Result<bool, SessionError> {
        let question = self
            .questions
            .get(index)
            .ok_or(SessionError::UnknownQuestion(index))?;

        if matches!(self.states[index], QuestionState::Graded { .. }) {
            return Err(SessionError::AlreadyGraded(index));
        }

        let correct = grade(submitted, &question.answer);
        self.states[index] = QuestionState::Graded {
            submitted: submitted.to_string(),
            correct,
        };

        tracing::debug!(
            session = %self.id,
            question = index,
            correct,
            "graded answer"
        );
        Ok(correct)
    }

    /// Number of questions graded so far.
    pub fn graded_count(&self) -> usize {
        self.states
            .iter()
            .filter(|s| matches!(s, QuestionState::Graded { .. }))
            .count()
    }

    /// Number of correct answers so far.
    pub fn score(&self) -> usize {
        self.states
            .iter()
            .filter(|s| matches!(s, QuestionState::Graded { correct: true, .. }))
            .count()
    }

    /// The wrong answers recorded so far, in question order.
    pub fn wrong_answers(&self) -> Vec<WrongAnswer<'_>> {
        self.states
            .iter()
            .enumerate()
            .filter_map(|(i, s)| match s {
                QuestionState::Graded {
                    submitted,
                    correct: false,
                } => Some(WrongAnswer {
                    index: i,
                    question: &self.questions[i],
                    submitted,
                }),
                _ => None,
            })
            .collect()
    }

    /// Whether every question has been graded.
    pub fn is_complete(&self) -> bool {
        self.graded_count() == self.questions.len()
    }

    /// Final percentage score (`correct / N * 100`). `None` until complete.
    pub fn percent_score(&self) -> Option<f64> {
        if !self.is_complete() || self.questions.is_empty() {
            return None;
        }
        Some(100.0 * self.score() as f64 / self.questions.len() as f64)
    }

    /// Outcome shape of a completed session. `None` until complete.
    pub fn outcome(&self) -> Option<SessionOutcome> {
        if !self.is_complete() || self.questions.is_empty() {
            return None;
        }
        let wrong = self.questions.len() - self.score();
        Some(match wrong {
            0 => SessionOutcome::AllCorrect,
            n if n == self.questions.len() => SessionOutcome::AllIncorrect,
            _ => SessionOutcome::Mixed,
        })
    }

    /// Arm the feedback request.
    ///
    /// Returns `true` the first time it is called on a completed session and
    /// `false` on every later call, so a second trigger while feedback is
    /// pending or already displayed is a no-op.
    pub fn begin_feedback(&mut self) -> bool {
        if !self.is_complete() || self.feedback_requested {
            return false;
        }
        self.feedback_requested = true;
        true
    }
}
