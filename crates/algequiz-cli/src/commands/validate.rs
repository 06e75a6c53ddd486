//! The `algequiz validate` command.

use std::path::PathBuf;

use anyhow::Result;

pub fn execute(questions_path: PathBuf) -> Result<()> {
    let bank = algequiz_core::parser::load_question_bank(&questions_path)?;

    println!("Question bank: {} questions", bank.len());

    let warnings = algequiz_core::parser::validate_question_bank(&bank);
    for w in &warnings {
        let prefix = w
            .question_index
            .map(|i| format!("  [{i}]"))
            .unwrap_or_else(|| "  ".to_string());
        println!("{prefix} WARNING: {}", w.message);
    }

    if warnings.is_empty() {
        println!("Question bank valid.");
    } else {
        println!("\n{} warning(s) found.", warnings.len());
    }

    Ok(())
}
