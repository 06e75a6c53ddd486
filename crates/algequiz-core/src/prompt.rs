//! Feedback prompt construction.
//!
//! Builds the user-turn prompt sent to the tutor endpoint once a session is
//! complete. Three mutually exclusive templates, selected by the session's
//! outcome shape.

use crate::session::{QuizSession, SessionOutcome};

/// Short supplementary video on the difference of squares (~3 min).
pub const VIDEO_LINK: &str = "https://www.youtube.com/watch?v=dmUjA2V_vOQ";

/// Directive telling the reference model family to skip extended reasoning.
pub const NO_THINK_DIRECTIVE: &str = "/no_think";

/// Build the feedback prompt for a completed session.
///
/// Pure function of session state. `None` while any question is ungraded.
pub fn build_feedback_prompt(session: &QuizSession) -> Option<String> {
    let outcome = session.outcome()?;

    Some(match outcome {
        SessionOutcome::AllCorrect => all_correct_prompt(),
        SessionOutcome::AllIncorrect => all_incorrect_prompt(),
        SessionOutcome::Mixed => mixed_prompt(session),
    })
}

fn all_correct_prompt() -> String {
    format!(
        "Every answer was correct. \
         Congratulate the student and suggest more challenging factoring exercises. \
         Conclude with {NO_THINK_DIRECTIVE}."
    )
}

fn all_incorrect_prompt() -> String {
    format!(
        "Every answer was incorrect.\n\n\
         Remind the student of the difference-of-squares theory:\n\
         The general form is a^2 - b^2 = (a - b)(a + b). Explain clearly how to\n\
         recognize the perfect squares, take their roots, and apply the formula\n\
         step by step.\n\n\
         Include one fully worked example (for instance, x^2 - 25) with numbered\n\
         steps.\n\n\
         At the end, suggest watching this short video: {VIDEO_LINK}\n\
         Do NOT use Markdown or LaTeX. Conclude with {NO_THINK_DIRECTIVE}."
    )
}

fn mixed_prompt(session: &QuizSession) -> String {
    let detail = session
        .wrong_answers()
        .iter()
        .map(|w| {
            format!(
                "Question {}: {}\nSubmitted answer: {}\nCorrect answer: {}",
                w.index + 1,
                w.question.prompt,
                w.submitted,
                w.question.answer
            )
        })
        .collect::<Vec<_>>()
        .join("\n");

    format!(
        "Errors were found while solving difference-of-squares exercises.\n\n\
         For each one, produce a block with EXACTLY this format, without Markdown:\n\n\
         An error was made in question X: [question text]. \
         Answer given: [submitted answer].\n\
         Error description:\n\
         - Error 1: ...\n\
         - Error 2: ... (if applicable)\n\
         How it should have been solved:\n\
         1. Step a...\n\
         2. Step b...\n\
         Practical tips to avoid similar mistakes:\n\
         1. ...\n\
         2. ...\n\
         3. ...\n\n\
         Errors to analyze:\n\n\
         {detail}\n\n\
         - Do NOT use Markdown or LaTeX.\n\
         - Conclude with {NO_THINK_DIRECTIVE}."
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Question;

    fn session_with_answers(answers: &[&str]) -> QuizSession {
        let mut session = QuizSession::new(vec![
            Question {
                prompt: "Factor x^2 - 9".into(),
                answer: "(x-3)(x+3)".into(),
            },
            Question {
                prompt: "Factor x^2 - 25".into(),
                answer: "(x-5)(x+5)".into(),
            },
        ]);
        for (i, a) in answers.iter().enumerate() {
            session.grade_answer(i, a).unwrap();
        }
        session
    }

    #[test]
    fn incomplete_session_has_no_prompt() {
        let session = session_with_answers(&[]);
        assert!(build_feedback_prompt(&session).is_none());
    }

    #[test]
    fn all_correct_branch() {
        let session = session_with_answers(&["(x+3)(x-3)", "(x-5)(x+5)"]);
        assert_eq!(session.percent_score(), Some(100.0));

        let prompt = build_feedback_prompt(&session).unwrap();
        assert!(prompt.contains("Congratulate"));
        assert!(prompt.contains("more challenging"));
        assert!(prompt.contains(NO_THINK_DIRECTIVE));
        assert!(!prompt.contains(VIDEO_LINK));
    }

    #[test]
    fn all_incorrect_branch_includes_video_link_once() {
        let session = session_with_answers(&["wrong", "also wrong"]);

        let prompt = build_feedback_prompt(&session).unwrap();
        assert!(prompt.contains("a^2 - b^2 = (a - b)(a + b)"));
        assert!(prompt.contains("x^2 - 25"));
        assert_eq!(prompt.matches(VIDEO_LINK).count(), 1);
        assert!(prompt.contains("Do NOT use Markdown"));
        assert!(prompt.contains(NO_THINK_DIRECTIVE));
    }

    #[test]
    fn mixed_branch_details_wrong_question_only() {
        let session = session_with_answers(&["(x-3)(x+3)", "(x-4)(x+4)"]);

        let prompt = build_feedback_prompt(&session).unwrap();
        // The wrong question appears with the exact submitted and expected text.
        assert!(prompt.contains("Question 2: Factor x^2 - 25"));
        assert!(prompt.contains("Submitted answer: (x-4)(x+4)"));
        assert!(prompt.contains("Correct answer: (x-5)(x+5)"));
        // The correctly answered question is not detailed.
        assert!(!prompt.contains("Question 1:"));
        assert!(prompt.contains("Do NOT use Markdown"));
        assert!(prompt.contains(NO_THINK_DIRECTIVE));
    }

    #[test]
    fn mixed_branch_lists_every_wrong_answer() {
        let mut session = QuizSession::new(vec![
            Question {
                prompt: "Factor x^2 - 1".into(),
                answer: "(x-1)(x+1)".into(),
            },
            Question {
                prompt: "Factor x^2 - 4".into(),
                answer: "(x-2)(x+2)".into(),
            },
            Question {
                prompt: "Factor x^2 - 16".into(),
                answer: "(x-4)(x+4)".into(),
            },
        ]);
        session.grade_answer(0, "bad").unwrap();
        session.grade_answer(1, "(x-2)(x+2)").unwrap();
        session.grade_answer(2, "worse").unwrap();

        let prompt = build_feedback_prompt(&session).unwrap();
        assert!(prompt.contains("Question 1: Factor x^2 - 1"));
        assert!(prompt.contains("Question 3: Factor x^2 - 16"));
        assert!(!prompt.contains("Question 2:"));
    }
}
