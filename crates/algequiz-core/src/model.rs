//! Core data model types for algequiz.
//!
//! These are the fundamental types the entire algequiz system uses to
//! represent questions and the bank they are drawn from.

use rand::seq::SliceRandom;
use serde::{Deserialize, Serialize};

/// A single quiz question with its expected answer.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Question {
    /// The question text shown to the student.
    pub prompt: String,
    /// The expected answer in its reference spelling, e.g. `(x-3)(x+3)`.
    pub answer: String,
}

/// An ordered collection of questions loaded from the question file.
///
/// Immutable once loaded; lives for the process duration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QuestionBank {
    /// The questions in file order.
    pub questions: Vec<Question>,
}

impl QuestionBank {
    /// Number of questions in the bank.
    pub fn len(&self) -> usize {
        self.questions.len()
    }

    /// Returns `true` if the bank holds no questions.
    pub fn is_empty(&self) -> bool {
        self.questions.is_empty()
    }

    /// Draw up to `n` distinct questions in random order.
    ///
    /// Asking for more questions than the bank holds returns the whole bank
    /// (shuffled).
    pub fn sample(&self, n: usize) -> Vec<Question> {
        let mut picked = self.questions.clone();
        picked.as_mut_slice().shuffle(&mut rand::rng());
        picked.truncate(n);
        picked
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bank(n: usize) -> QuestionBank {
        QuestionBank {
            questions: (0..n)
                .map(|i| Question {
                    prompt: format!("Factor x^2 - {}", (i + 1) * (i + 1)),
                    answer: format!("(x-{0})(x+{0})", i + 1),
                })
                .collect(),
        }
    }

    #[test]
    fn sample_draws_distinct_questions() {
        let bank = bank(6);
        let picked = bank.sample(4);
        assert_eq!(picked.len(), 4);

        let mut prompts: Vec<&str> = picked.iter().map(|q| q.prompt.as_str()).collect();
        prompts.sort_unstable();
        prompts.dedup();
        assert_eq!(prompts.len(), 4, "sampled questions must be distinct");
    }

    #[test]
    fn sample_caps_at_bank_size() {
        let bank = bank(2);
        assert_eq!(bank.sample(10).len(), 2);
    }

    #[test]
    fn sample_from_empty_bank() {
        let bank = QuestionBank { questions: vec![] };
        assert!(bank.sample(3).is_empty());
    }

    #[test]
    fn question_serde_roundtrip() {
        let q = Question {
            prompt: "Factor x^2 - 9".into(),
            answer: "(x-3)(x+3)".into(),
        };
        let json = serde_json::to_string(&q).unwrap();
        let back: Question = serde_json::from_str(&json).unwrap();
        assert_eq!(back.prompt, q.prompt);
        assert_eq!(back.answer, q.answer);
    }
}
